// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `quill` developer CLI.
//!
//! Loads authored course JSON and drives the outline, tracker and feature
//! logic headlessly, parses chapter lists, and inspects the watch-progress
//! store kept under the config directory.
//!
//! # Usage
//! ```text
//! quill [--config-dir DIR] <command> [options]
//! ```
//!
//! The CLI exits with code `0` on success and non-zero on error. `RUST_LOG`
//! controls diagnostics on stderr (default `warn`).

pub mod cli;
pub mod render;

pub use cli::{entrypoint, run, Cli, Commands, ProgressCommand};
