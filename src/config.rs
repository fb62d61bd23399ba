use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use axum::http::HeaderValue;
use crate::error::{AppError, Result};
use crate::llm::DEFAULT_BASE_URL;

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// When unset the service answers with placeholder content.
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub openrouter_base_url: String,
    pub request_timeout: Duration,
    /// Zero disables caching.
    pub cache_ttl: chrono::Duration,
    /// Oldest entries are evicted past this count.
    pub cache_max_entries: usize,
    pub max_text_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            openrouter_api_key: None,
            openrouter_model: DEFAULT_MODEL.to_string(),
            openrouter_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(90),
            cache_ttl: chrono::Duration::hours(24),
            cache_max_entries: 1_000,
            max_text_chars: 20_000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let host = lookup("HOST").unwrap_or_else(|| defaults.server_addr.ip().to_string());
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;
        let port = parse_or(&lookup, "PORT", defaults.server_addr.port())?;

        let openrouter_api_key = lookup("OPENROUTER_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let timeout_secs = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults.request_timeout.as_secs())?;
        if timeout_secs == 0 {
            return Err(AppError::Config("REQUEST_TIMEOUT_SECS must be positive".to_string()));
        }
        let ttl_hours: i64 = parse_or(&lookup, "CACHE_TTL_HOURS", defaults.cache_ttl.num_hours())?;
        let cache_ttl = chrono::Duration::try_hours(ttl_hours)
            .filter(|ttl| *ttl >= chrono::Duration::zero())
            .ok_or_else(|| AppError::Config(format!("Invalid CACHE_TTL_HOURS: {}", ttl_hours)))?;
        let cache_max_entries = parse_or(&lookup, "CACHE_MAX_ENTRIES", defaults.cache_max_entries)?;
        if cache_max_entries == 0 {
            return Err(AppError::Config("CACHE_MAX_ENTRIES must be positive".to_string()));
        }

        let cors_origin = match lookup("CORS_ORIGIN") {
            Some(origin) => HeaderValue::from_str(origin.trim())
                .map_err(|e| AppError::Config(format!("Invalid CORS_ORIGIN: {}", e)))?,
            None => defaults.cors_origin,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            cors_origin,
            openrouter_api_key,
            openrouter_model: lookup("OPENROUTER_MODEL").unwrap_or(defaults.openrouter_model),
            openrouter_base_url: lookup("OPENROUTER_BASE_URL").unwrap_or(defaults.openrouter_base_url),
            request_timeout: Duration::from_secs(timeout_secs),
            cache_ttl,
            cache_max_entries,
            max_text_chars: parse_or(&lookup, "MAX_TEXT_CHARS", defaults.max_text_chars)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
