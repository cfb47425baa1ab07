// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prefs port shared across Quill front-ends (CLI, web shell).

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::AppPrefs;

/// Storage key for [`AppPrefs`].
pub const PREFS_KEY: &str = "prefs";

/// Config-facing port for loading/saving application preferences.
pub trait PrefsPort {
    /// Load preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<AppPrefs>;
    /// Persist preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &AppPrefs);
}

impl<S: ConfigStore> PrefsPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<AppPrefs> {
        match self.load(PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load prefs");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &AppPrefs) {
        if let Err(err) = self.save(PREFS_KEY, prefs) {
            tracing::warn!(error = %err, "failed to save prefs");
        }
    }
}
