// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Block disclosure state: per-block local flags plus the shared force set.
//!
//! Navigation adds ids to the force set; a forced block's local flag is set
//! open. Toggling a block only touches its local flag, except that collapsing
//! or expanding a forced block also drops it from the force set.

use crate::block::BlockId;
use crate::toc::Toc;
use std::collections::{BTreeSet, HashMap};

/// Shared expand/collapse state for mounted blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedState {
    forced: BTreeSet<BlockId>,
    local: HashMap<BlockId, bool>,
}

impl ExpandedState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly mounted block (local flag starts open).
    pub fn register(&mut self, id: BlockId) {
        self.local.insert(id, true);
    }

    /// Re-applies the force set to one block's local flag.
    pub fn sync(&mut self, id: BlockId) {
        if self.forced.contains(&id) {
            if let Some(flag) = self.local.get_mut(&id) {
                *flag = true;
            }
        }
    }

    /// Flips the local flag; a forced id leaves the force set.
    ///
    /// Returns the resulting [`Self::is_expanded`] value.
    pub fn toggle(&mut self, id: BlockId) -> bool {
        let flag = self.local.entry(id).or_insert(true);
        *flag = !*flag;
        if self.forced.remove(&id) {
            tracing::trace!(%id, "manual toggle released forced block");
        }
        self.is_expanded(id)
    }

    /// Forces a single block open.
    pub fn force(&mut self, id: BlockId) {
        self.forced.insert(id);
        self.sync(id);
    }

    /// Forces `id` and every TOC ancestor open.
    pub fn force_expand_path(&mut self, toc: &Toc, id: BlockId) {
        for ancestor in toc.parent_path(id) {
            self.force(ancestor);
        }
        self.force(id);
    }

    /// Local flag OR force membership.
    pub fn is_expanded(&self, id: BlockId) -> bool {
        self.forced.contains(&id) || self.local.get(&id).copied().unwrap_or(false)
    }

    /// Whether `id` is in the force set.
    pub fn is_forced(&self, id: BlockId) -> bool {
        self.forced.contains(&id)
    }

    /// The force set.
    pub fn forced(&self) -> &BTreeSet<BlockId> {
        &self.forced
    }

    /// Drops local state of an unmounted block.
    pub fn forget(&mut self, id: BlockId) {
        self.local.remove(&id);
        self.forced.remove(&id);
    }
}
