//! Session-scoped API usage counter.
//!
//! The counter survives restarts within one session because every increment
//! is written through a [`SessionStore`]. Nothing ever resets it besides a
//! fresh store.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::SessionError;

/// Fixed key the counter is stored under.
pub const USAGE_KEY: &str = "formfillSuggestUsage";

/// Key/value storage scoped to one browsing session.
pub trait SessionStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`SessionError`] when the value cannot be persisted.
    fn store(&self, key: &str, value: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn store(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Session store backed by a small JSON object on disk.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<HashMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(SessionError::Io {
                path: self.path.display().to_string(),
                source: e,
            }),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, key: &str) -> Option<String> {
        match self.read_map() {
            Ok(map) => map.get(key).cloned(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable session file; starting empty");
                None
            }
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        // An unreadable file is left alone; a corrupt one is replaced.
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(SessionError::Serialize(e)) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file is not valid JSON; replacing it");
                HashMap::new()
            }
            Err(e) => return Err(e),
        };
        map.insert(key.to_owned(), value.to_owned());
        let body = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, body).map_err(|e| SessionError::Io {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// Counts suggest API calls for the current session.
pub struct UsageCounter {
    store: Arc<dyn SessionStore>,
    count: AtomicU64,
    soft_limit: Option<u64>,
}

impl fmt::Debug for UsageCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageCounter")
            .field("count", &self.count())
            .field("soft_limit", &self.soft_limit)
            .finish_non_exhaustive()
    }
}

impl UsageCounter {
    /// Loads the persisted count; a missing or unparsable value starts at zero.
    ///
    /// `soft_limit` only produces a warning once exceeded, calls are never
    /// refused.
    pub fn new(store: Arc<dyn SessionStore>, soft_limit: Option<u64>) -> Self {
        let initial = store
            .load(USAGE_KEY)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Self {
            store,
            count: AtomicU64::new(initial),
            soft_limit,
        }
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    /// Records one API call and persists the new total.
    pub fn increment(&self) -> u64 {
        let count = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Err(e) = self.store.store(USAGE_KEY, &count.to_string()) {
            tracing::warn!(error = %e, "failed to persist usage counter");
        }
        if let Some(limit) = self.soft_limit {
            if count > limit {
                tracing::warn!(count, limit, "suggest API usage above per-session ceiling");
            }
        }
        count
    }
}

/// Snapshot shown by the usage indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageSummary {
    pub api_calls: u64,
    pub cached_queries: usize,
}

impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API: {} | Cache: {}", self.api_calls, self.cached_queries)
    }
}
