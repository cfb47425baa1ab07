// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Course content, block geometry and watch-progress fixtures.

use crate::config::InMemoryConfigStore;
use quill_geom::Rect;
use quill_outline::block::{Difficulty, MediaType, NoteTone};
use quill_outline::{BlockId, BlockKind, BlockSpec, ChallengeKind};
use quill_progress::{ProgressMap, VideoProgress, STORAGE_KEY};
use std::collections::HashMap;

/// YouTube URL used by the sample course's video block.
pub const SAMPLE_VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

/// Chapter list attached to the sample video.
pub const SAMPLE_CHAPTERS: &str = "0:00 - Intro\n02:30 - useState\n1:02:03 - Wrap up";

/// A small React course exercising nesting, hidden blocks, explicit parents and challenges.
///
/// Document order (titles):
/// `Introduction`, `Components`, `Props`, `Build a button`, `Todo app`,
/// `Hooks`, `Heads up`, `Hooks walkthrough`, `Custom hooks`, `Appendix`.
/// `Custom hooks` is authored at the root but re-parented under `Hooks`.
/// `Appendix` is hidden from the TOC.
pub fn react_course() -> Vec<BlockSpec> {
    vec![
        BlockSpec::classic("Introduction").with_anchor("intro"),
        BlockSpec::classic("Components")
            .with_anchor("components")
            .with_features()
            .child(BlockSpec::new(
                "Props",
                BlockKind::Markdown {
                    content: "Props flow down.".into(),
                },
            ))
            .child(BlockSpec::challenge("Build a button", ChallengeKind::Exercise))
            .child(
                BlockSpec::challenge("Todo app", ChallengeKind::Project).with_anchor("todo-app"),
            ),
        BlockSpec::classic("Hooks")
            .with_anchor("hooks")
            .child(BlockSpec::new(
                "Heads up",
                BlockKind::Note {
                    note_type: NoteTone::Warning,
                    content: Some("Rules of hooks apply.".into()),
                },
            ))
            .child(BlockSpec::new(
                "Hooks walkthrough",
                BlockKind::Media {
                    url: SAMPLE_VIDEO_URL.into(),
                    media_type: MediaType::Video,
                    timestamps: Some(SAMPLE_CHAPTERS.into()),
                },
            )),
        BlockSpec {
            parent_id: Some("hooks".into()),
            ..BlockSpec::new(
                "Custom hooks",
                BlockKind::Challenge {
                    difficulty: Difficulty::Advanced,
                    challenge_type: ChallengeKind::Exercise,
                    tech: vec!["React".into()],
                    estimated_time: Some("1h".into()),
                },
            )
        },
        BlockSpec::classic("Appendix").hidden(),
    ]
}

/// Stacked rectangles keyed by block, for [`LayoutSource`](quill_outline::LayoutSource) fakes.
///
/// Each entry is `(id, top, height)` in viewport coordinates.
pub fn rects(entries: &[(BlockId, f64, f64)]) -> HashMap<BlockId, Rect> {
    entries
        .iter()
        .map(|&(id, top, height)| (id, Rect::from_top_height(top, height)))
        .collect()
}

/// `count` records for distinct CDN URLs, the first updated at `newest_ms`
/// and each next one `step_ms` older.
pub fn progress_records(count: usize, newest_ms: u64, step_ms: u64) -> ProgressMap {
    (0..count)
        .map(|i| {
            let url = format!("https://cdn.example.com/video-{i:03}.mp4");
            let rec = VideoProgress {
                url: url.clone(),
                timestamp: 60.0,
                last_updated: newest_ms.saturating_sub(step_ms * i as u64),
                duration: Some(600.0),
                title: Some(format!("Video {i}")),
            };
            (url, rec)
        })
        .collect()
}

/// Config store already holding `records` under the progress storage key.
pub fn seeded_progress_store(
    records: &ProgressMap,
) -> Result<InMemoryConfigStore, serde_json::Error> {
    InMemoryConfigStore::with_json(STORAGE_KEY, records)
}
