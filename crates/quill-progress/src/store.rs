// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Local watch-progress store with age and size retention.
//!
//! The whole map lives under one storage key and is rewritten on every
//! mutation. Storage failures never reach callers: a failed write forces a
//! cleanup and retries once, and a second failure leaves the store running
//! from memory for the rest of its life.

use crate::clock::{Clock, SystemClock};
use crate::normalize::normalize_url;
use crate::record::{ProgressMap, VideoProgress};
use quill_app_core::config::{ConfigError, ConfigService, ConfigStore};
use quill_app_core::prefs::ProgressPrefs;
use std::collections::HashSet;

/// Storage key of the persisted progress map.
pub const STORAGE_KEY: &str = "quill-space-video-progress";

/// What [`ProgressStore::save`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was written.
    Saved,
    /// The video counts as finished; its record was removed.
    Finished,
    /// The video is shorter than the tracking threshold.
    TooShort,
    /// The position moved less than the minimum delta since the last save.
    Unchanged,
    /// Empty URL or negative/non-finite time.
    Ignored,
}

/// Watch-progress records keyed by normalized URL.
pub struct ProgressStore<S, C = SystemClock> {
    config: ConfigService<S>,
    clock: C,
    prefs: ProgressPrefs,
    records: ProgressMap,
    degraded: bool,
}

impl<S: ConfigStore> ProgressStore<S, SystemClock> {
    /// Opens the store with the system clock.
    pub fn open(store: S, prefs: ProgressPrefs) -> Self {
        Self::with_clock(store, SystemClock, prefs)
    }
}

impl<S: ConfigStore, C: Clock> ProgressStore<S, C> {
    /// Opens the store, loading the persisted map and dropping expired records.
    ///
    /// Unreadable or malformed data is logged and treated as empty.
    pub fn with_clock(store: S, clock: C, prefs: ProgressPrefs) -> Self {
        let config = ConfigService::new(store);
        let (records, loaded) = match config.load::<ProgressMap>(STORAGE_KEY) {
            Ok(Some(map)) => (map, true),
            Ok(None) => (ProgressMap::new(), false),
            Err(err) => {
                tracing::warn!(error = %err, "unreadable watch progress; starting empty");
                (ProgressMap::new(), false)
            }
        };
        let mut this = Self {
            config,
            clock,
            prefs,
            records,
            degraded: false,
        };
        if loaded && this.prune(false) > 0 {
            this.persist();
        }
        tracing::debug!(records = this.records.len(), "opened progress store");
        this
    }

    /// Retention and autosave policy in use.
    pub fn prefs(&self) -> &ProgressPrefs {
        &self.prefs
    }

    /// Whether writes have been abandoned after repeated storage failures.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records a playback position for `url`.
    pub fn save(
        &mut self,
        url: &str,
        time: f64,
        duration: Option<f64>,
        title: Option<&str>,
    ) -> SaveOutcome {
        if url.is_empty() || !time.is_finite() || time < 0.0 {
            return SaveOutcome::Ignored;
        }
        let key = normalize_url(url);
        let duration = duration.filter(|d| d.is_finite() && *d > 0.0);
        if let Some(d) = duration {
            if d < self.prefs.min_duration_secs {
                return SaveOutcome::TooShort;
            }
            if time >= d * self.prefs.finished_ratio {
                self.clear(&key);
                return SaveOutcome::Finished;
            }
        }
        if let Some(prev) = self.records.get(&key) {
            if (time - prev.timestamp).abs() < self.prefs.min_delta_secs {
                return SaveOutcome::Unchanged;
            }
        }
        let record = VideoProgress {
            url: key.clone(),
            timestamp: time,
            last_updated: self.clock.now_ms(),
            duration,
            title: title.map(str::to_owned),
        };
        self.records.insert(key, record);
        self.prune(false);
        self.persist();
        SaveOutcome::Saved
    }

    /// Record for `url` (any URL form).
    pub fn get(&self, url: &str) -> Option<&VideoProgress> {
        self.records.get(&normalize_url(url))
    }

    /// Removes the record for `url`; returns whether one existed.
    pub fn clear(&mut self, url: &str) -> bool {
        let removed = self.records.remove(&normalize_url(url)).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    /// Removes every record.
    pub fn clear_all(&mut self) {
        self.records.clear();
        self.persist();
    }

    /// Records, most recently updated first.
    pub fn records(&self) -> Vec<&VideoProgress> {
        let mut out: Vec<&VideoProgress> = self.records.values().collect();
        out.sort_by(|a, b| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| a.url.cmp(&b.url))
        });
        out
    }

    /// Drops expired records and, when `force`, everything past the size cap.
    ///
    /// Returns the number of records removed.
    pub fn cleanup(&mut self, force: bool) -> usize {
        let removed = self.prune(force);
        self.persist();
        removed
    }

    fn prune(&mut self, force: bool) -> usize {
        let now = self.clock.now_ms();
        let max_age = self.prefs.max_age_ms();
        let cap = self.prefs.max_items;
        let mut entries: Vec<(&String, &VideoProgress)> = self.records.iter().collect();
        entries.sort_by(|a, b| {
            b.1.last_updated
                .cmp(&a.1.last_updated)
                .then_with(|| a.0.cmp(b.0))
        });
        let keep: HashSet<String> = entries
            .into_iter()
            .enumerate()
            .filter(|(i, (_, r))| {
                now.saturating_sub(r.last_updated) <= max_age && (!force || *i < cap)
            })
            .map(|(_, (k, _))| k.clone())
            .collect();
        let before = self.records.len();
        self.records.retain(|k, _| keep.contains(k));
        let removed = before - self.records.len();
        if removed > 0 {
            tracing::debug!(removed, force, "pruned watch progress");
        }
        removed
    }

    fn write(&self) -> Result<(), ConfigError> {
        self.config.save(STORAGE_KEY, &self.records)
    }

    fn persist(&mut self) {
        if self.degraded {
            return;
        }
        let Err(err) = self.write() else {
            return;
        };
        tracing::warn!(error = %err, "saving watch progress failed; forcing cleanup");
        self.prune(true);
        if let Err(err) = self.write() {
            tracing::error!(error = %err, "watch progress kept in memory only");
            self.degraded = true;
        }
    }
}
