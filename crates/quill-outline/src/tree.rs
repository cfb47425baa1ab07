// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Owned arena of mounted content blocks.
//!
//! The tree is the single source of truth for hierarchy and document order.
//! Every structural or attribute change bumps [`BlockTree::revision`], which
//! is what outline consumers watch instead of observing rendered output.

use crate::block::{Appearance, BlockId, BlockKind, BlockSpec, BlockTag};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from structural tree edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockTreeError {
    /// The referenced block is not mounted.
    #[error("unknown block {0}")]
    UnknownBlock(BlockId),
    /// Insertion index beyond the sibling list.
    #[error("index {index} out of range for {len} siblings")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Sibling count.
        len: usize,
    },
    /// Moving a block beneath itself or one of its descendants.
    #[error("cannot move {0} beneath itself")]
    Cycle(BlockId),
}

/// A mounted block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: BlockId,
    title: String,
    subtitle: Option<String>,
    kind: BlockKind,
    show_on_toc: bool,
    features: bool,
    anchor: Option<String>,
    explicit_parent: Option<String>,
    parent: Option<BlockId>,
    children: Vec<BlockId>,
}

impl Block {
    /// Stable identifier.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Heading text as authored.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Optional subtitle.
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Kind and payload.
    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    /// Type tag.
    pub fn tag(&self) -> BlockTag {
        self.kind.tag()
    }

    /// Icon and colour metadata.
    pub fn appearance(&self) -> Appearance {
        self.kind.appearance()
    }

    /// Whether the block is listed in the TOC.
    pub fn show_on_toc(&self) -> bool {
        self.show_on_toc
    }

    /// Whether the block shows the feature summary badge.
    pub fn features(&self) -> bool {
        self.features
    }

    /// Author-chosen anchor.
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Explicit parent reference, if any.
    pub fn explicit_parent(&self) -> Option<&str> {
        self.explicit_parent.as_deref()
    }

    /// Structural parent.
    pub fn parent(&self) -> Option<BlockId> {
        self.parent
    }

    /// Structural children in display order.
    pub fn children(&self) -> &[BlockId] {
        &self.children
    }
}

/// Arena of mounted blocks keyed by [`BlockId`].
#[derive(Debug, Clone, Default)]
pub struct BlockTree {
    nodes: HashMap<BlockId, Block>,
    roots: Vec<BlockId>,
    anchors: HashMap<String, BlockId>,
    next_id: u64,
    revision: u64,
}

impl BlockTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts a whole forest of authored roots, in order.
    pub fn from_specs(specs: &[BlockSpec]) -> Self {
        let mut tree = Self::new();
        for spec in specs {
            tree.mount_unchecked(None, None, spec);
        }
        tree.revision += 1;
        tree
    }

    /// Counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of mounted blocks.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` is mounted.
    pub fn contains(&self, id: BlockId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Looks up a mounted block.
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.nodes.get(&id)
    }

    /// Top-level blocks in display order.
    pub fn roots(&self) -> &[BlockId] {
        &self.roots
    }

    /// Children of `id` (empty when unknown).
    pub fn children(&self, id: BlockId) -> &[BlockId] {
        self.nodes.get(&id).map_or(&[], |b| b.children.as_slice())
    }

    /// Structural parent of `id`.
    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.nodes.get(&id).and_then(|b| b.parent)
    }

    /// Resolves a reference to a mounted block: an anchor first, then the id display form.
    pub fn resolve(&self, key: &str) -> Option<BlockId> {
        if key.is_empty() {
            return None;
        }
        self.anchors
            .get(key)
            .copied()
            .or_else(|| BlockId::parse(key))
            .filter(|id| self.nodes.contains_key(id))
    }

    /// Number of structural ancestors.
    pub fn depth(&self, id: BlockId) -> usize {
        self.ancestors(id).len()
    }

    /// Structural ancestors, nearest first.
    pub fn ancestors(&self, id: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            out.push(p);
            cur = self.parent(p);
        }
        out
    }

    /// Every mounted block in document (pre-order) order.
    pub fn document_order(&self) -> Vec<BlockId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<BlockId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Document position of every mounted block.
    pub fn positions(&self) -> HashMap<BlockId, usize> {
        self.document_order()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect()
    }

    /// Mounts `spec` (and its children) as the last child of `parent`, or as a root.
    pub fn mount(
        &mut self,
        parent: Option<BlockId>,
        spec: &BlockSpec,
    ) -> Result<BlockId, BlockTreeError> {
        let len = self.siblings(parent)?.len();
        self.mount_at(parent, len, spec)
    }

    /// Mounts `spec` at position `index` among `parent`'s children.
    pub fn mount_at(
        &mut self,
        parent: Option<BlockId>,
        index: usize,
        spec: &BlockSpec,
    ) -> Result<BlockId, BlockTreeError> {
        let len = self.siblings(parent)?.len();
        if index > len {
            return Err(BlockTreeError::IndexOutOfRange { index, len });
        }
        let id = self.mount_unchecked(parent, Some(index), spec);
        self.revision += 1;
        tracing::trace!(%id, revision = self.revision, "mounted block");
        Ok(id)
    }

    fn mount_unchecked(
        &mut self,
        parent: Option<BlockId>,
        index: Option<usize>,
        spec: &BlockSpec,
    ) -> BlockId {
        self.next_id += 1;
        let id = BlockId(self.next_id);
        if let Some(anchor) = spec.anchor.as_deref().filter(|a| !a.is_empty()) {
            self.anchors.entry(anchor.to_owned()).or_insert(id);
        }
        self.nodes.insert(
            id,
            Block {
                id,
                title: spec.title.clone(),
                subtitle: spec.subtitle.clone(),
                kind: spec.kind.clone(),
                show_on_toc: spec.show_on_toc,
                features: spec.features,
                anchor: spec.anchor.clone(),
                explicit_parent: spec.parent_id.clone().filter(|p| !p.is_empty()),
                parent,
                children: Vec::new(),
            },
        );
        let siblings = match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(p) => &mut p.children,
            None => &mut self.roots,
        };
        match index {
            Some(i) => siblings.insert(i.min(siblings.len()), id),
            None => siblings.push(id),
        }
        for child in &spec.children {
            self.mount_unchecked(Some(id), None, child);
        }
        id
    }

    /// Unmounts `id` and its subtree; returns the removed ids in document order.
    pub fn unmount(&mut self, id: BlockId) -> Result<Vec<BlockId>, BlockTreeError> {
        let parent = self
            .nodes
            .get(&id)
            .ok_or(BlockTreeError::UnknownBlock(id))?
            .parent;
        self.siblings_mut(parent).retain(|c| *c != id);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(block) = self.nodes.remove(&cur) {
                stack.extend(block.children.iter().rev().copied());
                removed.push(cur);
            }
        }
        self.anchors.retain(|_, v| !removed.contains(v));
        self.repoint_anchors();
        self.revision += 1;
        tracing::trace!(%id, removed = removed.len(), "unmounted subtree");
        Ok(removed)
    }

    /// Points every unclaimed anchor at its first remaining holder in document order.
    fn repoint_anchors(&mut self) {
        for id in self.document_order() {
            if let Some(anchor) = self.nodes.get(&id).and_then(|b| b.anchor.as_deref()) {
                if !anchor.is_empty() {
                    self.anchors.entry(anchor.to_owned()).or_insert(id);
                }
            }
        }
    }

    /// Moves `id` under `parent` at `index` (index counted after removal).
    pub fn move_to(
        &mut self,
        id: BlockId,
        parent: Option<BlockId>,
        index: usize,
    ) -> Result<(), BlockTreeError> {
        if !self.contains(id) {
            return Err(BlockTreeError::UnknownBlock(id));
        }
        if let Some(p) = parent {
            if p == id || self.ancestors(p).contains(&id) {
                return Err(BlockTreeError::Cycle(id));
            }
        }
        let old_parent = self.parent(id);
        let len = self.siblings(parent)?.len() - usize::from(old_parent == parent);
        if index > len {
            return Err(BlockTreeError::IndexOutOfRange { index, len });
        }
        self.siblings_mut(old_parent).retain(|c| *c != id);
        self.siblings_mut(parent).insert(index, id);
        if let Some(block) = self.nodes.get_mut(&id) {
            block.parent = parent;
        }
        self.revision += 1;
        Ok(())
    }

    /// Replaces the title.
    pub fn set_title(
        &mut self,
        id: BlockId,
        title: impl Into<String>,
    ) -> Result<(), BlockTreeError> {
        let title = title.into();
        self.update(id, |b| b.title = title)
    }

    /// Shows or hides the block in the TOC.
    pub fn set_show_on_toc(&mut self, id: BlockId, show: bool) -> Result<(), BlockTreeError> {
        self.update(id, |b| b.show_on_toc = show)
    }

    /// Sets or clears the explicit parent reference (empty strings clear it).
    pub fn set_explicit_parent(
        &mut self,
        id: BlockId,
        parent: Option<String>,
    ) -> Result<(), BlockTreeError> {
        let parent = parent.filter(|p| !p.is_empty());
        self.update(id, |b| b.explicit_parent = parent)
    }

    /// Replaces the kind and payload.
    pub fn set_kind(&mut self, id: BlockId, kind: BlockKind) -> Result<(), BlockTreeError> {
        self.update(id, |b| b.kind = kind)
    }

    fn update(
        &mut self,
        id: BlockId,
        f: impl FnOnce(&mut Block),
    ) -> Result<(), BlockTreeError> {
        let block = self
            .nodes
            .get_mut(&id)
            .ok_or(BlockTreeError::UnknownBlock(id))?;
        f(block);
        self.revision += 1;
        Ok(())
    }

    fn siblings(&self, parent: Option<BlockId>) -> Result<&Vec<BlockId>, BlockTreeError> {
        match parent {
            Some(p) => self
                .nodes
                .get(&p)
                .map(|b| &b.children)
                .ok_or(BlockTreeError::UnknownBlock(p)),
            None => Ok(&self.roots),
        }
    }

    fn siblings_mut(&mut self, parent: Option<BlockId>) -> &mut Vec<BlockId> {
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(p) => &mut p.children,
            None => &mut self.roots,
        }
    }
}
