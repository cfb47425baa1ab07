// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scroll-driven active-section selection.
//!
//! A block is *visible* when its rect intersects the viewport grown by the
//! buffer ratio, and a *candidate* when it also crosses the middle band. The
//! primary section is the deepest candidate, then the one closest to the
//! viewport centre, then the earliest in document order. Secondary sections
//! are substantially visible blocks plus visible TOC ancestors of anything
//! visible.

use crate::block::BlockId;
use crate::toc::Toc;
use crate::tree::BlockTree;
use quill_app_core::prefs::TrackerPrefs;
use quill_geom::{Rect, Viewport};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Supplies each mounted block's rect in viewport coordinates.
pub trait LayoutSource {
    /// Rect of `id`, or `None` when the block has no layout.
    fn rect(&self, id: BlockId) -> Option<Rect>;
}

impl LayoutSource for HashMap<BlockId, Rect> {
    fn rect(&self, id: BlockId) -> Option<Rect> {
        self.get(&id).copied()
    }
}

impl<L: LayoutSource + ?Sized> LayoutSource for &L {
    fn rect(&self, id: BlockId) -> Option<Rect> {
        (**self).rect(id)
    }
}

/// Geometry ratios used by [`ActiveSectionTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Viewport fraction added above and below for visibility.
    pub buffer_ratio: f64,
    /// Middle band height as a viewport fraction.
    pub band_ratio: f64,
    /// Visible fraction of a block's own height needed for secondary status.
    pub substantial_ratio: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::from(&TrackerPrefs::default())
    }
}

impl From<&TrackerPrefs> for TrackerConfig {
    fn from(p: &TrackerPrefs) -> Self {
        Self {
            buffer_ratio: p.buffer_ratio,
            band_ratio: p.band_ratio,
            substantial_ratio: p.substantial_ratio,
        }
    }
}

/// Current highlight state of the outline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSections {
    /// The single primary section.
    pub primary: Option<BlockId>,
    /// Secondary sections; never contains `primary`.
    pub secondary: BTreeSet<BlockId>,
}

impl ActiveSections {
    /// Whether nothing is highlighted.
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: BlockId,
    depth: usize,
    distance: f64,
    position: usize,
}

impl Candidate {
    /// `Greater` means `self` wins.
    fn rank(&self, other: &Self) -> Ordering {
        self.depth
            .cmp(&other.depth)
            .then_with(|| other.distance.total_cmp(&self.distance))
            .then_with(|| other.position.cmp(&self.position))
    }
}

/// Computes [`ActiveSections`] from layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveSectionTracker {
    config: TrackerConfig,
}

impl ActiveSectionTracker {
    /// Tracker with the given ratios.
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    /// Ratios in use.
    pub fn config(&self) -> TrackerConfig {
        self.config
    }

    /// Selects primary and secondary sections for the current layout.
    pub fn compute<L: LayoutSource>(
        &self,
        viewport: Viewport,
        tree: &BlockTree,
        toc: &Toc,
        layout: &L,
    ) -> ActiveSections {
        let window = viewport.extended(self.config.buffer_ratio);
        let band = viewport.middle_band(self.config.band_ratio);

        let mut visible: Vec<(BlockId, Rect)> = Vec::new();
        let mut best: Option<Candidate> = None;
        for (position, id) in tree.document_order().into_iter().enumerate() {
            let Some(rect) = layout.rect(id) else {
                continue;
            };
            if !rect.intersects(&window) {
                continue;
            }
            visible.push((id, rect));
            if rect.intersects(&band) {
                let cand = Candidate {
                    id,
                    depth: tree.depth(id),
                    distance: viewport.distance_to_center(&rect),
                    position,
                };
                if best.is_none_or(|b| cand.rank(&b) == Ordering::Greater) {
                    best = Some(cand);
                }
            }
        }

        let Some(primary) = best.map(|c| c.id) else {
            return ActiveSections::default();
        };

        let bounds = viewport.bounds();
        let mut secondary: BTreeSet<BlockId> = visible
            .iter()
            .filter(|(_, rect)| {
                rect.overlap_extent(&bounds) >= rect.height() * self.config.substantial_ratio
            })
            .map(|(id, _)| *id)
            .collect();
        let visible_ids: BTreeSet<BlockId> = visible.iter().map(|(id, _)| *id).collect();
        for id in &visible_ids {
            secondary.extend(
                toc.parent_path(*id)
                    .into_iter()
                    .filter(|p| visible_ids.contains(p)),
            );
        }
        secondary.remove(&primary);

        tracing::debug!(%primary, secondary = secondary.len(), "active sections");
        ActiveSections {
            primary: Some(primary),
            secondary,
        }
    }
}
