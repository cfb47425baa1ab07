// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure state transitions for outline navigation (TOC clicks, block toggles, search).

use crate::block::BlockId;
use crate::expanded::ExpandedState;
use crate::toc::Toc;
use crate::tracker::ActiveSections;
use quill_app_core::prefs::TrackerPrefs;
use std::collections::BTreeSet;

/// Everything the outline view needs to draw highlight and disclosure.
#[derive(Debug, Clone, PartialEq)]
pub struct NavState {
    /// Open entries in the TOC panel.
    pub toc_expanded: BTreeSet<BlockId>,
    /// Block disclosure state.
    pub blocks: ExpandedState,
    /// Current highlight.
    pub active: ActiveSections,
    /// Current TOC search text.
    pub query: String,
    /// Gap kept above a block scrolled to from the TOC.
    pub scroll_offset: f64,
}

impl Default for NavState {
    fn default() -> Self {
        Self::new(&TrackerPrefs::default())
    }
}

impl NavState {
    /// Empty state using the prefs' scroll offset.
    pub fn new(prefs: &TrackerPrefs) -> Self {
        Self {
            toc_expanded: BTreeSet::new(),
            blocks: ExpandedState::new(),
            active: ActiveSections::default(),
            query: String::new(),
            scroll_offset: prefs.scroll_offset_px,
        }
    }

    fn open_toc_path(&mut self, toc: &Toc, id: BlockId) {
        self.toc_expanded.extend(toc.parent_path(id));
        self.toc_expanded.insert(id);
    }
}

/// Inputs to [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// A block was mounted.
    BlockMounted(BlockId),
    /// A block was unmounted.
    BlockUnmounted(BlockId),
    /// TOC entry title clicked.
    TocEntryClicked(BlockId),
    /// TOC entry chevron clicked.
    TocEntryToggled(BlockId),
    /// Block header toggled by the reader.
    BlockToggled(BlockId),
    /// Tracker produced a new highlight.
    SectionsChanged(ActiveSections),
    /// TOC search text edited.
    SearchChanged(String),
}

/// Side effects for the host to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEffect {
    /// Scroll so the block's top sits `offset` below the viewport top.
    ScrollTo {
        /// Target block.
        id: BlockId,
        /// Gap above the block.
        offset: f64,
    },
}

/// Applies one event against the current outline.
pub fn reduce(state: &NavState, toc: &Toc, ev: NavEvent) -> (NavState, Vec<NavEffect>) {
    let mut next = state.clone();
    let mut fx = Vec::new();
    match ev {
        NavEvent::BlockMounted(id) => {
            next.blocks.register(id);
            next.blocks.sync(id);
        }
        NavEvent::BlockUnmounted(id) => {
            next.blocks.forget(id);
            next.toc_expanded.remove(&id);
        }
        NavEvent::TocEntryClicked(id) => {
            next.open_toc_path(toc, id);
            next.blocks.force_expand_path(toc, id);
            fx.push(NavEffect::ScrollTo {
                id,
                offset: next.scroll_offset,
            });
        }
        NavEvent::TocEntryToggled(id) => {
            if !next.toc_expanded.remove(&id) {
                next.toc_expanded.insert(id);
            }
        }
        NavEvent::BlockToggled(id) => {
            next.blocks.toggle(id);
        }
        NavEvent::SectionsChanged(active) => {
            if let Some(primary) = active.primary.filter(|p| state.active.primary != Some(*p)) {
                tracing::debug!(%primary, "primary section changed");
                next.open_toc_path(toc, primary);
                next.blocks.force_expand_path(toc, primary);
            }
            next.active = active;
        }
        NavEvent::SearchChanged(query) => {
            next.toc_expanded.extend(toc.filter(&query).expand);
            next.query = query;
        }
    }
    (next, fx)
}
