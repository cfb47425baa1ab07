// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Quill crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake with quota and failure injection
//! - [`clock`] - Manually advanced clock for retention tests
//! - [`fixtures`] - Sample course, block rectangles and seeded progress records

pub mod clock;
pub mod config;
pub mod fixtures;

// Re-export commonly used items at crate root for convenience
pub use clock::{ManualClock, DAY_MS};
pub use config::InMemoryConfigStore;
pub use fixtures::{
    progress_records, react_course, rects, seeded_progress_store, SAMPLE_CHAPTERS,
    SAMPLE_VIDEO_URL,
};
