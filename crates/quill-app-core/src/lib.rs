// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Quill (storage port, config, prefs).
//! Keeps view and persistence adapters thin and framework-agnostic.

pub mod config;
pub mod config_port;
pub mod prefs;
