// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-video player lifecycle with interval autosave.
//!
//! The session never owns the store; callers pass it to the operations that
//! read or write progress. Autosave is armed only while playing.

use crate::clock::Clock;
use crate::normalize::normalize_url;
use crate::store::{ProgressStore, SaveOutcome};
use quill_app_core::config::ConfigStore;
use quill_app_core::prefs::ProgressPrefs;
use std::time::{Duration, Instant};

/// Player state as seen by the progress layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// Loaded, not started.
    #[default]
    Idle,
    /// Playing; autosave armed.
    Playing,
    /// Paused by the viewer.
    Paused,
    /// Reached the end.
    Ended,
    /// The player reported an error.
    Failed {
        /// Error text shown with the retry action.
        message: String,
    },
}

/// Per-session tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Videos shorter than this (seconds) are never saved.
    pub min_duration: f64,
    /// Autosave period.
    pub save_interval: Duration,
    /// Offer the saved position on open.
    pub auto_resume: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&ProgressPrefs::default())
    }
}

impl From<&ProgressPrefs> for SessionOptions {
    fn from(p: &ProgressPrefs) -> Self {
        Self {
            min_duration: p.min_duration_secs,
            save_interval: p.save_interval(),
            auto_resume: p.auto_resume,
        }
    }
}

/// Player readings taken at a tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackSample {
    /// Current position in seconds.
    pub time: f64,
    /// Duration in seconds, once the player knows it.
    pub duration: Option<f64>,
    /// Video title, when available.
    pub title: Option<String>,
}

/// Progress controller for one embedded video.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    url: String,
    options: SessionOptions,
    saved_position: Option<f64>,
    state: PlayerState,
    next_save: Option<Instant>,
}

impl PlaybackSession {
    /// Opens a session for `url`, picking up the saved position when auto-resume is on.
    pub fn open<S: ConfigStore, C: Clock>(
        url: &str,
        options: SessionOptions,
        store: &ProgressStore<S, C>,
    ) -> Self {
        let url = normalize_url(url);
        let saved_position = if options.auto_resume {
            store.get(&url).map(|r| r.timestamp)
        } else {
            None
        };
        Self {
            url,
            options,
            saved_position,
            state: PlayerState::Idle,
            next_save: None,
        }
    }

    /// Normalized URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current player state.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Position to seek to on start.
    pub fn saved_position(&self) -> Option<f64> {
        self.saved_position
    }

    /// Session tuning.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Whether an autosave deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.next_save.is_some()
    }

    /// Starts playback and arms autosave.
    pub fn play(&mut self, now: Instant) {
        self.state = PlayerState::Playing;
        self.next_save = Some(now + self.options.save_interval);
    }

    /// Saves when the autosave interval has elapsed; `None` when nothing was due.
    pub fn tick<S: ConfigStore, C: Clock>(
        &mut self,
        now: Instant,
        sample: &PlaybackSample,
        store: &mut ProgressStore<S, C>,
    ) -> Option<SaveOutcome> {
        let due = self.next_save.filter(|d| now >= *d)?;
        self.next_save = Some(due.max(now) + self.options.save_interval);
        Some(self.save_now(sample, store))
    }

    /// Saves immediately, honouring this session's minimum duration.
    pub fn save_now<S: ConfigStore, C: Clock>(
        &self,
        sample: &PlaybackSample,
        store: &mut ProgressStore<S, C>,
    ) -> SaveOutcome {
        if sample
            .duration
            .is_some_and(|d| d > 0.0 && d < self.options.min_duration)
        {
            return SaveOutcome::TooShort;
        }
        store.save(
            &self.url,
            sample.time,
            sample.duration,
            sample.title.as_deref(),
        )
    }

    /// Pauses playback and disarms autosave.
    pub fn pause(&mut self) {
        self.state = PlayerState::Paused;
        self.next_save = None;
    }

    /// Marks the video finished and forgets its saved position.
    pub fn end<S: ConfigStore, C: Clock>(&mut self, store: &mut ProgressStore<S, C>) {
        self.state = PlayerState::Ended;
        self.next_save = None;
        self.saved_position = None;
        store.clear(&self.url);
    }

    /// Records a player error and disarms autosave.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(url = %self.url, %message, "player failed");
        self.state = PlayerState::Failed { message };
        self.next_save = None;
    }

    /// Leaves the failed state; returns whether it did.
    pub fn retry(&mut self) -> bool {
        if matches!(self.state, PlayerState::Failed { .. }) {
            self.state = PlayerState::Idle;
            true
        } else {
            false
        }
    }

    /// Stops offering the saved position.
    pub fn disable_auto_resume(&mut self) {
        self.options.auto_resume = false;
        self.saved_position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_app_core::config::ConfigError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStore(RefCell<HashMap<String, Vec<u8>>>);

    impl ConfigStore for MapStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.0.borrow().get(key).cloned().ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.0.borrow_mut().insert(key.to_owned(), data.to_vec());
            Ok(())
        }
    }

    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

    fn sample(time: f64) -> PlaybackSample {
        PlaybackSample {
            time,
            duration: Some(600.0),
            title: None,
        }
    }

    #[test]
    fn autosave_fires_on_interval_only_while_playing() {
        let mut store = ProgressStore::open(MapStore::default(), ProgressPrefs::default());
        let mut session = PlaybackSession::open(URL, SessionOptions::default(), &store);
        let t0 = Instant::now();
        assert_eq!(session.tick(t0, &sample(1.0), &mut store), None);

        session.play(t0);
        assert_eq!(session.tick(t0 + Duration::from_secs(2), &sample(2.0), &mut store), None);
        assert_eq!(
            session.tick(t0 + Duration::from_secs(5), &sample(5.0), &mut store),
            Some(SaveOutcome::Saved)
        );

        session.pause();
        assert!(!session.is_armed());
        assert_eq!(session.tick(t0 + Duration::from_secs(60), &sample(9.0), &mut store), None);
        assert_eq!(store.get(URL).map(|r| r.timestamp), Some(5.0));
    }

    #[test]
    fn reopen_resumes_unless_disabled() {
        let mut store = ProgressStore::open(MapStore::default(), ProgressPrefs::default());
        store.save(URL, 42.0, Some(600.0), None);
        let mut session = PlaybackSession::open(URL, SessionOptions::default(), &store);
        assert_eq!(session.saved_position(), Some(42.0));
        session.disable_auto_resume();
        assert_eq!(session.saved_position(), None);
    }

    #[test]
    fn end_clears_record_and_failure_can_retry() {
        let mut store = ProgressStore::open(MapStore::default(), ProgressPrefs::default());
        store.save(URL, 42.0, Some(600.0), None);
        let mut session = PlaybackSession::open(URL, SessionOptions::default(), &store);
        session.play(Instant::now());
        session.fail("network error");
        assert!(!session.is_armed());
        assert!(session.retry());
        assert_eq!(session.state(), &PlayerState::Idle);
        assert!(!session.retry());
        session.end(&mut store);
        assert!(store.get(URL).is_none());
    }

    #[test]
    fn session_threshold_applies_before_store() {
        let mut store = ProgressStore::open(MapStore::default(), ProgressPrefs::default());
        let options = SessionOptions {
            min_duration: 1000.0,
            ..SessionOptions::default()
        };
        let session = PlaybackSession::open(URL, options, &store);
        assert_eq!(session.save_now(&sample(30.0), &mut store), SaveOutcome::TooShort);
        assert!(store.is_empty());
    }
}
