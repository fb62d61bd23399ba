pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod notes;

use std::sync::{Arc, Mutex, MutexGuard};
use api::models::GenerateResponse;
use cache::ResponseCache;
use config::Config;
use generator::StudyGenerator;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<dyn StudyGenerator>,
    pub cache: Arc<Mutex<ResponseCache>>,
}

impl AppState {
    /// Picks the generator from the configuration.
    pub fn new(config: Config) -> Self {
        let generator = generator::from_config(&config);
        Self::with_generator(config, generator)
    }

    pub fn with_generator(config: Config, generator: Arc<dyn StudyGenerator>) -> Self {
        let cache = ResponseCache::new(config.cache_ttl, config.cache_max_entries);
        AppState {
            config: Arc::new(config),
            generator,
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn cached(&self, notes: &str) -> Option<GenerateResponse> {
        self.lock_cache().get(notes)
    }

    pub fn store(&self, notes: String, response: GenerateResponse) {
        self.lock_cache().insert(notes, response);
    }

    // A panic mid-insert leaves the map itself intact, so poisoning is ignored
    fn lock_cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
