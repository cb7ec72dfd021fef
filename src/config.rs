use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::controllers::carousel::CarouselPolicy;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_STORAGE_PATH: &str = ".carhop/storage.json";
pub const DEFAULT_CAROUSEL_LIMIT: usize = 12;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_SESSION_IDLE_MINS: u64 = 120;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

pub fn get_storage_path() -> PathBuf {
    let raw = env::var("CARHOP_STORAGE").unwrap_or_default();
    if raw.trim().is_empty() {
        PathBuf::from(DEFAULT_STORAGE_PATH)
    } else {
        PathBuf::from(raw.trim())
    }
}

/// `CARHOP_CAROUSEL_LIMIT=0` shows every available car.
pub fn get_carousel_policy() -> CarouselPolicy {
    let limit = env::var("CARHOP_CAROUSEL_LIMIT")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_CAROUSEL_LIMIT);
    if limit == 0 {
        CarouselPolicy::AllAvailable
    } else {
        CarouselPolicy::TopByPrice(limit)
    }
}

pub fn get_debounce_delay() -> Duration {
    let ms = env::var("CARHOP_DEBOUNCE_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_DEBOUNCE_MS);
    Duration::from_millis(ms)
}

/// How long an idle web session keeps its store before it is dropped.
pub fn get_session_idle() -> Duration {
    let mins = env::var("CARHOP_SESSION_IDLE_MINS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SESSION_IDLE_MINS);
    Duration::from_secs(mins * 60)
}

/// Trailing slashes removed; blank input falls back to the default backend.
pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
