// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Video chapter lists: `[H:]MM:SS - label` lines, formatting, and per-section state.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static LINE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}:)?(\d{1,2}):(\d{2})\s*-\s*(.+)$").ok());

/// One chapter marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamp {
    /// Offset in whole seconds.
    pub time: u64,
    /// Trimmed label.
    pub label: String,
    /// `time` rendered by [`format_time`].
    pub formatted_time: String,
}

/// Progress of one chapter relative to the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionState {
    /// Playhead before the chapter.
    Incomplete,
    /// Playhead inside the chapter.
    InProgress,
    /// Playhead at or past the chapter end.
    Completed,
}

impl fmt::Display for SectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Incomplete => "incomplete",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
        })
    }
}

/// Parses one marker per line; lines that do not match are dropped.
pub fn parse_timestamps(text: &str) -> Vec<Timestamp> {
    let Some(re) = LINE.as_ref() else {
        return Vec::new();
    };
    text.lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let hours: u64 = caps
                .get(1)
                .and_then(|h| h.as_str().trim_end_matches(':').parse().ok())
                .unwrap_or(0);
            let minutes: u64 = caps.get(2)?.as_str().parse().ok()?;
            let seconds: u64 = caps.get(3)?.as_str().parse().ok()?;
            let time = hours * 3600 + minutes * 60 + seconds;
            Some(Timestamp {
                time,
                label: caps.get(4)?.as_str().trim().to_owned(),
                formatted_time: format_time(time),
            })
        })
        .collect()
}

/// `H:MM:SS` when there are hours, otherwise `MM:SS`.
pub fn format_time(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// `M:SS` with unbounded minutes, for chapter lengths.
pub fn format_duration(secs: f64) -> String {
    let secs = secs.max(0.0) as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn bounds(stamps: &[Timestamp], i: usize, total: f64) -> Option<(f64, f64)> {
    let start = stamps.get(i)?.time as f64;
    let end = stamps.get(i + 1).map_or(total, |n| n.time as f64);
    Some((start, end))
}

/// Index of the chapter containing `t`.
pub fn active_index(stamps: &[Timestamp], t: f64) -> Option<usize> {
    (0..stamps.len()).find(|&i| {
        let start = stamps[i].time as f64;
        t >= start && stamps.get(i + 1).is_none_or(|n| t < n.time as f64)
    })
}

/// State of chapter `i` for playhead `t`; the last chapter ends at `total`.
pub fn section_state(
    stamps: &[Timestamp],
    i: usize,
    t: f64,
    total: f64,
) -> Option<SectionState> {
    let (start, end) = bounds(stamps, i, total)?;
    Some(if t < start {
        SectionState::Incomplete
    } else if t >= end {
        SectionState::Completed
    } else {
        SectionState::InProgress
    })
}

/// Percentage (0..=100) of chapter `i` covered by playhead `t`.
pub fn section_progress(stamps: &[Timestamp], i: usize, t: f64, total: f64) -> Option<u8> {
    let (start, end) = bounds(stamps, i, total)?;
    let len = end - start;
    let pct = if len <= 0.0 {
        if t >= start {
            100.0
        } else {
            0.0
        }
    } else {
        ((t - start) / len * 100.0).clamp(0.0, 100.0)
    };
    Some(pct.round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAPTERS: &str = "0:00 - Intro\n\
                            02:30 -   Setup  \n\
                            not a chapter\n\
                            1:02:03 - Deep dive";

    #[test]
    fn parses_and_drops_noise() {
        let stamps = parse_timestamps(CHAPTERS);
        let times: Vec<u64> = stamps.iter().map(|s| s.time).collect();
        assert_eq!(times, [0, 150, 3723]);
        assert_eq!(stamps[1].label, "Setup");
        assert_eq!(stamps[2].formatted_time, "1:02:03");
        assert_eq!(stamps[0].formatted_time, "00:00");
    }

    #[test]
    fn formatting() {
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(3600), "1:00:00");
        assert_eq!(format_duration(754.9), "12:34");
        assert_eq!(format_duration(-3.0), "0:00");
    }

    #[test]
    fn states_follow_playhead() {
        let stamps = parse_timestamps(CHAPTERS);
        let total = 4000.0;
        assert_eq!(active_index(&stamps, 200.0), Some(1));
        assert_eq!(active_index(&stamps, 3900.0), Some(2));
        assert_eq!(section_state(&stamps, 0, 200.0, total), Some(SectionState::Completed));
        assert_eq!(section_state(&stamps, 1, 200.0, total), Some(SectionState::InProgress));
        assert_eq!(section_state(&stamps, 2, 200.0, total), Some(SectionState::Incomplete));
        assert_eq!(section_state(&stamps, 3, 200.0, total), None);
        assert_eq!(section_progress(&stamps, 0, 75.0, total), Some(50));
        assert_eq!(section_progress(&stamps, 2, 4000.0, total), Some(100));
    }

    #[test]
    fn no_chapter_before_first_marker() {
        let stamps = parse_timestamps("00:10 - Late start");
        assert_eq!(active_index(&stamps, 5.0), None);
        assert_eq!(SectionState::InProgress.to_string(), "inProgress");
    }
}
