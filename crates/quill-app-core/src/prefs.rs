// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tunable preferences shared by Quill views (section tracking + watch progress).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Saved preferences for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppPrefs {
    /// Active-section tracking parameters.
    pub tracker: TrackerPrefs,
    /// Video watch-progress parameters.
    pub progress: ProgressPrefs,
}

/// Geometry and timing used by the active-section tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerPrefs {
    /// Fraction of viewport height added above and below when deciding visibility.
    pub buffer_ratio: f64,
    /// Height of the middle band as a fraction of viewport height.
    pub band_ratio: f64,
    /// Minimum visible fraction of a block's own height for secondary highlighting.
    pub substantial_ratio: f64,
    /// Resize debounce delay in milliseconds.
    pub resize_debounce_ms: u64,
    /// Gap kept above a block when scrolling to it from the TOC.
    pub scroll_offset_px: f64,
}

impl Default for TrackerPrefs {
    fn default() -> Self {
        Self {
            buffer_ratio: 0.1,
            band_ratio: 0.1,
            substantial_ratio: 0.3,
            resize_debounce_ms: 50,
            scroll_offset_px: 80.0,
        }
    }
}

impl TrackerPrefs {
    /// Resize debounce as a `Duration`.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

/// Retention and autosave policy for watch progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressPrefs {
    /// Videos shorter than this (seconds) are never tracked.
    pub min_duration_secs: f64,
    /// Autosave period while playing (seconds).
    pub save_interval_secs: u64,
    /// Seek to the saved position when a video is opened.
    pub auto_resume: bool,
    /// Records not updated for this many days are dropped on cleanup.
    pub max_age_days: u64,
    /// Record cap enforced by a forced cleanup.
    pub max_items: usize,
    /// Watched fraction at which a video counts as finished.
    pub finished_ratio: f64,
    /// Saves closer than this (seconds) to the last saved time are skipped.
    pub min_delta_secs: f64,
}

impl Default for ProgressPrefs {
    fn default() -> Self {
        Self {
            min_duration_secs: 180.0,
            save_interval_secs: 5,
            auto_resume: true,
            max_age_days: 30,
            max_items: 100,
            finished_ratio: 0.95,
            min_delta_secs: 1.0,
        }
    }
}

impl ProgressPrefs {
    /// Autosave period as a `Duration`.
    pub fn save_interval(&self) -> Duration {
        Duration::from_secs(self.save_interval_secs)
    }

    /// Maximum record age in milliseconds.
    pub fn max_age_ms(&self) -> u64 {
        self.max_age_days.saturating_mul(24 * 60 * 60 * 1000)
    }
}
