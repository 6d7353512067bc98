// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable session store.
//!
//! A thin key/value wrapper over host storage. Production keeps a single
//! JSON object on disk; tests use the in-memory fake. Keys are the typed
//! [`StoreEntry`] names, never raw strings, so callers cannot disagree on
//! spelling.

use gantry_core::StoreEntry;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors from session store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no data directory available on this platform")]
    Unavailable,
}

/// Durable per-session key/value storage.
pub trait SessionStore: Clone + Send + Sync + 'static {
    fn get(&self, entry: &StoreEntry) -> Result<Option<String>, StoreError>;
    fn set(&self, entry: &StoreEntry, value: &str) -> Result<(), StoreError>;
    fn remove(&self, entry: &StoreEntry) -> Result<(), StoreError>;
}

/// File-backed store: one JSON object per session file.
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<FileStoreInner>,
}

struct FileStoreInner {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Store at the default location under the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::data_dir().ok_or(StoreError::Unavailable)?.join("gantry");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::at(dir.join("session.json")))
    }

    /// Store at an explicit path (tests, alternate profiles).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { inner: Arc::new(FileStoreInner { path: path.into(), lock: Mutex::new(()) }) }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.inner.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.inner.path)?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn flush(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.inner.path, raw)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, entry: &StoreEntry) -> Result<Option<String>, StoreError> {
        let _guard = self.inner.lock.lock();
        Ok(self.load()?.remove(&entry.key()))
    }

    fn set(&self, entry: &StoreEntry, value: &str) -> Result<(), StoreError> {
        let _guard = self.inner.lock.lock();
        let mut map = self.load()?;
        map.insert(entry.key(), value.to_string());
        self.flush(&map)
    }

    fn remove(&self, entry: &StoreEntry) -> Result<(), StoreError> {
        let _guard = self.inner.lock.lock();
        let mut map = self.load()?;
        if map.remove(&entry.key()).is_some() {
            self.flush(&map)?;
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{SessionStore, StoreError};
    use gantry_core::StoreEntry;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// In-memory session store for tests.
    #[derive(Clone, Default)]
    pub struct FakeStore {
        inner: Arc<Mutex<HashMap<String, String>>>,
    }

    impl FakeStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed an entry without going through the trait.
        pub fn seed(&self, entry: &StoreEntry, value: &str) {
            self.inner.lock().insert(entry.key(), value.to_string());
        }

        /// Snapshot of all stored pairs.
        pub fn snapshot(&self) -> HashMap<String, String> {
            self.inner.lock().clone()
        }

        pub fn contains(&self, entry: &StoreEntry) -> bool {
            self.inner.lock().contains_key(&entry.key())
        }
    }

    impl SessionStore for FakeStore {
        fn get(&self, entry: &StoreEntry) -> Result<Option<String>, StoreError> {
            Ok(self.inner.lock().get(&entry.key()).cloned())
        }

        fn set(&self, entry: &StoreEntry, value: &str) -> Result<(), StoreError> {
            self.inner.lock().insert(entry.key(), value.to_string());
            Ok(())
        }

        fn remove(&self, entry: &StoreEntry) -> Result<(), StoreError> {
            self.inner.lock().remove(&entry.key());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeStore;

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
