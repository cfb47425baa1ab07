// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Video watch progress for Quill.
//!
//! [`ProgressStore`] keeps one record per normalized video URL behind any
//! [`ConfigStore`](quill_app_core::config::ConfigStore), ages records out and
//! caps their number when storage pushes back. [`PlaybackSession`] drives
//! interval autosave and resume for a single player, and [`timestamps`]
//! handles chapter lists shown next to a video.

pub mod clock;
pub mod normalize;
pub mod record;
pub mod session;
pub mod store;
pub mod timestamps;

pub use clock::{Clock, SystemClock};
pub use normalize::{normalize_url, youtube_id};
pub use record::{ProgressMap, VideoProgress};
pub use session::{PlaybackSample, PlaybackSession, PlayerState, SessionOptions};
pub use store::{ProgressStore, SaveOutcome, STORAGE_KEY};
pub use timestamps::{parse_timestamps, SectionState, Timestamp};
