// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for testing without filesystem I/O.

use quill_app_core::config::{ConfigError, ConfigStore};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// [`ConfigStore`] over a shared map, standing in for browser local storage.
///
/// Clones share state, so a test can hand one clone to the code under test
/// and inspect the other. Besides call counts it can simulate a size quota
/// and a bounded run of failing writes.
///
/// # Example
///
/// ```
/// use quill_app_core::config::ConfigService;
/// use quill_app_core::config_port::PrefsPort;
/// use quill_dry_tests::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let prefs = ConfigService::new(store.clone());
///
/// assert!(prefs.load_prefs().is_none());
/// prefs.save_prefs(&Default::default());
/// assert!(store.contains_key("prefs"));
/// assert_eq!((store.load_count(), store.save_count()), (1, 1));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryConfigStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    data: HashMap<String, Vec<u8>>,
    load_count: usize,
    save_count: usize,
    fail_on_load: bool,
    failing_saves: usize,
    quota: Option<usize>,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with raw blobs.
    pub fn with_data(data: HashMap<String, Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                data,
                ..Inner::default()
            })),
        }
    }

    /// Create a store holding `value` as JSON under `key`.
    pub fn with_json<T: Serialize>(key: &str, value: &T) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(value)?;
        Ok(Self::with_data(HashMap::from([(key.to_owned(), bytes)])))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every read fail, as when storage access is denied.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.lock().fail_on_load = fail;
    }

    /// Make the next `n` saves fail, then succeed again.
    pub fn fail_next_saves(&self, n: usize) {
        self.lock().failing_saves = n;
    }

    /// Reject any single write larger than `bytes` with [`ConfigError::Quota`].
    pub fn set_quota(&self, bytes: Option<usize>) {
        self.lock().quota = bytes;
    }

    /// Number of `load_raw` calls, failed ones included.
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// Number of `save_raw` calls, failed ones included.
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// Keys currently holding a blob, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().data.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Whether a blob is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().data.contains_key(key)
    }

    /// Raw bytes stored under `key`.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().data.get(key).cloned()
    }

    /// Stored value under `key` parsed as JSON.
    pub fn json(&self, key: &str) -> Option<serde_json::Value> {
        self.raw(key)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut inner = self.lock();
        inner.load_count += 1;

        if inner.fail_on_load {
            return Err(ConfigError::Other("storage unavailable".into()));
        }
        inner.data.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.save_count += 1;

        if inner.failing_saves > 0 {
            inner.failing_saves -= 1;
            return Err(ConfigError::Other("storage write rejected".into()));
        }
        if let Some(limit) = inner.quota {
            if data.len() > limit {
                return Err(ConfigError::Quota {
                    needed: data.len(),
                    limit,
                });
            }
        }

        inner.data.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}
