// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Content-block tree, table of contents and scroll-synced section tracking.
//!
//! Blocks are mounted into a [`BlockTree`] arena from authored
//! [`BlockSpec`]s. [`TocWatcher`] rebuilds the outline whenever the tree's
//! revision moves, [`ActiveSectionTracker`] picks highlighted sections from a
//! [`LayoutSource`], and [`navigator::reduce`] folds TOC clicks, block toggles
//! and highlight changes into a [`NavState`].

pub mod block;
pub mod course;
pub mod expanded;
pub mod features;
pub mod file_tree;
pub mod glossary;
pub mod layout;
pub mod navigator;
pub mod schedule;
pub mod toc;
pub mod tracker;
pub mod tree;

pub use block::{BlockId, BlockKind, BlockSpec, BlockTag, ChallengeKind, ColorToken};
pub use course::{Course, CourseError};
pub use expanded::ExpandedState;
pub use features::{FeatureAggregator, FeatureItem, FeatureKind, FeatureStats};
pub use layout::{StackLayout, StackMetrics};
pub use navigator::{NavEffect, NavEvent, NavState};
pub use schedule::ScrollScheduler;
pub use toc::{Toc, TocBuilder, TocFilter, TocNode, TocWatcher};
pub use tracker::{ActiveSectionTracker, ActiveSections, LayoutSource, TrackerConfig};
pub use tree::{Block, BlockTree, BlockTreeError};
