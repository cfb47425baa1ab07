// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Coalesces scroll and resize notifications into tracker recomputations.

use quill_app_core::prefs::TrackerPrefs;
use std::time::{Duration, Instant};

/// Scroll events request at most one pending frame; resize events arm a
/// debounce deadline that later resizes push back.
#[derive(Debug, Clone)]
pub struct ScrollScheduler {
    debounce: Duration,
    frame_pending: bool,
    resize_deadline: Option<Instant>,
}

impl Default for ScrollScheduler {
    fn default() -> Self {
        Self::from(&TrackerPrefs::default())
    }
}

impl From<&TrackerPrefs> for ScrollScheduler {
    fn from(p: &TrackerPrefs) -> Self {
        Self::new(p.resize_debounce())
    }
}

impl ScrollScheduler {
    /// Scheduler with the given resize debounce.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            frame_pending: false,
            resize_deadline: None,
        }
    }

    /// Records a scroll. Returns `true` when a new frame must be requested.
    pub fn on_scroll(&mut self) -> bool {
        if self.frame_pending {
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Frame callback. Returns `true` when a recomputation should run.
    pub fn frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    /// Records a resize at `now`, (re)arming the debounce deadline.
    pub fn on_resize(&mut self, now: Instant) {
        self.resize_deadline = Some(now + self.debounce);
    }

    /// Returns `true` once when the resize deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.resize_deadline {
            Some(deadline) if now >= deadline => {
                self.resize_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a frame is requested and not yet run.
    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Pending resize deadline.
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize_deadline
    }
}
