use std::collections::HashMap;
use chrono::{DateTime, Duration, Utc};

use crate::api::models::GenerateResponse;

#[derive(Clone, Debug)]
pub struct CachedResponse {
    pub response: GenerateResponse,
    pub timestamp: DateTime<Utc>,
}

/// In-memory responses keyed by normalized notes, bounded by age and count.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    max_entries: usize,
    entries: HashMap<String, CachedResponse>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl > Duration::zero() && self.max_entries > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<GenerateResponse> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<GenerateResponse> {
        if !self.is_enabled() {
            return None;
        }
        self.entries
            .get(key)
            .filter(|cached| now - cached.timestamp < self.ttl)
            .map(|cached| cached.response.clone())
    }

    pub fn insert(&mut self, key: String, response: GenerateResponse) {
        self.insert_at(key, response, Utc::now());
    }

    pub fn insert_at(&mut self, key: String, response: GenerateResponse, now: DateTime<Utc>) {
        if !self.is_enabled() {
            return;
        }
        // Expired entries are only ever replaced, so sweep them on write
        let ttl = self.ttl;
        self.entries.retain(|_, cached| now - cached.timestamp < ttl);
        while self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict_oldest();
        }
        self.entries.insert(key, CachedResponse { response, timestamp: now });
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, cached)| cached.timestamp)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
