// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Storage port and JSON config service for Quill.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Storage port for raw blobs keyed by logical name.
///
/// This is the durable local storage the application persists into. One key
/// maps to one blob; writes replace the whole blob.
pub trait ConfigStore {
    /// Load a raw blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw blob, replacing any previous value.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        (**self).save_raw(key, data)
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for Box<S> {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        (**self).load_raw(key)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        (**self).save_raw(key, data)
    }
}

/// Why a blob could not be read or written.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Nothing stored under the key yet.
    #[error("no stored value")]
    NotFound,
    /// The write would exceed the store's size budget.
    #[error("storage quota exceeded: {needed} bytes > {limit} bytes")]
    Quota {
        /// Bytes the write needed.
        needed: usize,
        /// Configured limit.
        limit: usize,
    },
    /// The backing medium failed.
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    /// The blob is not the JSON shape the caller asked for.
    #[error("malformed stored json: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store-specific failure (bad key, unavailable backend).
    #[error("{0}")]
    Other(String),
}

/// JSON codec over a [`ConfigStore`]: one serde value per key.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwraps the store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Decodes the value under `key`; a missing or empty blob is `Ok(None)`.
    pub fn load<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: DeserializeOwned,
    {
        let bytes = match self.store.load_raw(key) {
            Ok(bytes) if bytes.is_empty() => return Ok(None),
            Ok(bytes) => bytes,
            Err(ConfigError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Like [`load`](Self::load) but any failure or absence yields `T::default()`.
    ///
    /// Failures are logged, never returned.
    pub fn load_or_default<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(err) => {
                tracing::warn!(key, error = %err, "unreadable stored value; using defaults");
                T::default()
            }
        }
    }

    /// Encodes `value` as compact JSON and replaces the blob under `key`.
    pub fn save<T>(&self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        T: Serialize,
    {
        let blob = serde_json::to_vec(value)?;
        self.store.save_raw(key, &blob)
    }
}
