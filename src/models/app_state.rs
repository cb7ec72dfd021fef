use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::api::ApiClient;
use crate::controllers::{CarouselPolicy, CatalogState};
use crate::storage::MemoryStore;
use crate::utils::hostname_from_url;

/// Everything one browser session keeps between requests.
#[derive(Clone, Debug)]
pub struct Session {
    /// Client-local storage: selected car and reservation draft.
    pub store: MemoryStore,
    /// Last catalog that loaded successfully, shown again when a reload fails.
    pub catalog: Option<CatalogState>,
    pub flash: Vec<String>,
    pub last_seen: Instant,
}

impl Session {
    fn new(now: Instant) -> Self {
        Self {
            store: MemoryStore::new(),
            catalog: None,
            flash: Vec::new(),
            last_seen: now,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub carousel_policy: CarouselPolicy,
    /// Sessions untouched for longer than this are dropped.
    pub session_idle: Duration,
    pub api_hostname: String,
}

impl AppState {
    pub fn new(api: ApiClient, carousel_policy: CarouselPolicy) -> Self {
        let api_hostname = hostname_from_url(api.base_url());
        Self {
            api,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            carousel_policy,
            session_idle: crate::config::get_session_idle(),
            api_hostname,
        }
    }

    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.session_idle = idle;
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on the session `sid`, creating it if needed and marking it seen.
    fn with_session<T>(&self, sid: &str, f: impl FnOnce(&mut Session) -> T) -> T {
        let now = Instant::now();
        let mut sessions = self.lock();
        let session = sessions.entry(sid.to_string()).or_insert_with(|| Session::new(now));
        session.last_seen = now;
        f(session)
    }

    /// Snapshot of a session's store. Handlers work on the copy across
    /// awaits and write it back with `save_session_store`.
    pub fn session_store(&self, sid: &str) -> MemoryStore {
        let sessions = self.lock();
        sessions.get(sid).map(|s| s.store.clone()).unwrap_or_default()
    }

    pub fn save_session_store(&self, sid: &str, store: MemoryStore) {
        self.evict_idle(Instant::now());
        self.with_session(sid, |s| s.store = store);
    }

    pub fn last_catalog(&self, sid: &str) -> Option<CatalogState> {
        let sessions = self.lock();
        sessions.get(sid).and_then(|s| s.catalog.clone())
    }

    pub fn save_catalog(&self, sid: &str, catalog: CatalogState) {
        self.evict_idle(Instant::now());
        self.with_session(sid, |s| s.catalog = Some(catalog));
    }

    pub fn push_flash(&self, sid: &str, message: impl Into<String>) {
        self.with_session(sid, |s| s.flash.push(message.into()));
    }

    pub fn take_flash(&self, sid: &str) -> Vec<String> {
        let mut sessions = self.lock();
        sessions
            .get_mut(sid)
            .map(|s| std::mem::take(&mut s.flash))
            .unwrap_or_default()
    }

    /// Drop sessions idle for longer than `session_idle` as of `now`.
    /// Returns how many were removed.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let idle = self.session_idle;
        let mut sessions = self.lock();
        let before = sessions.len();
        sessions.retain(|_, s| now.saturating_duration_since(s.last_seen) <= idle);
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(removed, "Evicted idle sessions");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.lock().len()
    }
}
