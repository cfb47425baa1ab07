// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted watch-progress record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Saved playback position of one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgress {
    /// Normalized URL; also the record's key.
    pub url: String,
    /// Playback position in seconds.
    pub timestamp: f64,
    /// Milliseconds since the Unix epoch of the last write.
    pub last_updated: u64,
    /// Total duration in seconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Video title, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl VideoProgress {
    /// Watched fraction in `0.0..=1.0`, when the duration is known.
    pub fn fraction(&self) -> Option<f64> {
        self.duration
            .filter(|d| *d > 0.0)
            .map(|d| (self.timestamp / d).clamp(0.0, 1.0))
    }
}

/// Persisted blob: normalized URL to record.
pub type ProgressMap = BTreeMap<String, VideoProgress>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn field_names_are_camel_case_and_optionals_skip() {
        let rec = VideoProgress {
            url: "https://youtube.com/watch?v=dQw4w9WgXcQ".into(),
            timestamp: 42.5,
            last_updated: 1_700_000_000_000,
            duration: None,
            title: Some("Intro".into()),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["lastUpdated"], 1_700_000_000_000_u64);
        assert!(json.get("duration").is_none());
        assert_eq!(json["title"], "Intro");
    }

    #[test]
    fn fraction_needs_positive_duration() {
        let mut rec = VideoProgress {
            url: "u".into(),
            timestamp: 300.0,
            last_updated: 0,
            duration: Some(600.0),
            title: None,
        };
        assert_eq!(rec.fraction(), Some(0.5));
        rec.duration = Some(0.0);
        assert_eq!(rec.fraction(), None);
    }
}
