// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Deterministic vertical stacking layout.
//!
//! Stands in for a renderer when driving the tracker headlessly: every block
//! gets a header, a kind-dependent body, then its children (unless
//! collapsed), with a fixed gap between siblings.

use crate::block::{BlockId, BlockKind};
use crate::expanded::ExpandedState;
use crate::tracker::LayoutSource;
use crate::tree::BlockTree;
use quill_geom::Rect;
use std::collections::HashMap;

/// Pixel sizes used by [`StackLayout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackMetrics {
    /// Header height of every block.
    pub header: f64,
    /// Height of one line of text or code.
    pub line: f64,
    /// Height of an embedded media player.
    pub media: f64,
    /// Vertical gap after each block.
    pub gap: f64,
}

impl Default for StackMetrics {
    fn default() -> Self {
        Self {
            header: 48.0,
            line: 24.0,
            media: 360.0,
            gap: 16.0,
        }
    }
}

impl StackMetrics {
    fn body(&self, kind: &BlockKind) -> f64 {
        let lines = |s: &str| s.lines().count().max(1) as f64 * self.line;
        match kind {
            BlockKind::Markdown { content } => lines(content),
            BlockKind::Code { code, .. } => lines(code),
            BlockKind::Note { content, .. } => content.as_deref().map_or(0.0, lines),
            BlockKind::Media { .. } => self.media,
            BlockKind::FileStructureView { structure } => {
                structure.folder_paths().len().max(1) as f64 * self.line
            }
            BlockKind::Glossary { dictionary } => dictionary.entries().len() as f64 * self.line,
            BlockKind::Classic | BlockKind::Generic { .. } | BlockKind::Challenge { .. } => 0.0,
        }
    }
}

/// Document-space rects for every mounted block plus a scroll position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackLayout {
    rects: HashMap<BlockId, Rect>,
    document_height: f64,
    scroll: f64,
}

impl StackLayout {
    /// Lays out `tree`; blocks collapsed in `expanded` hide their children.
    pub fn measure(
        tree: &BlockTree,
        expanded: Option<&ExpandedState>,
        metrics: StackMetrics,
    ) -> Self {
        let mut rects = HashMap::with_capacity(tree.len());
        let mut cursor = 0.0;
        for root in tree.roots() {
            cursor = place(tree, expanded, &metrics, *root, cursor, &mut rects);
        }
        Self {
            rects,
            document_height: cursor,
            scroll: 0.0,
        }
    }

    /// Total stacked height.
    pub fn document_height(&self) -> f64 {
        self.document_height
    }

    /// Current scroll offset.
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Scrolls to `y` (clamped at zero).
    pub fn set_scroll(&mut self, y: f64) {
        self.scroll = y.max(0.0);
    }

    /// Document-space rect of `id`.
    pub fn document_rect(&self, id: BlockId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }

    /// Scroll offset that puts `id`'s top `offset` pixels below the viewport top.
    pub fn scroll_target(&self, id: BlockId, offset: f64) -> Option<f64> {
        self.document_rect(id).map(|r| (r.top() - offset).max(0.0))
    }

    /// Percentage of the scrollable distance covered, in `0..=100`.
    ///
    /// A document no taller than the viewport reads as 0.
    pub fn reading_progress(&self, viewport_height: f64) -> f64 {
        let scrollable = self.document_height - viewport_height;
        if scrollable > 0.0 {
            (self.scroll / scrollable * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

fn place(
    tree: &BlockTree,
    expanded: Option<&ExpandedState>,
    metrics: &StackMetrics,
    id: BlockId,
    top: f64,
    rects: &mut HashMap<BlockId, Rect>,
) -> f64 {
    let Some(block) = tree.get(id) else {
        return top;
    };
    let mut cursor = top + metrics.header;
    let open = expanded.is_none_or(|e| e.is_expanded(id));
    if open {
        cursor += metrics.body(block.kind());
        for child in block.children() {
            cursor = place(tree, expanded, metrics, *child, cursor, rects);
        }
    }
    rects.insert(id, Rect::new(top, cursor));
    cursor + metrics.gap
}

impl LayoutSource for StackLayout {
    fn rect(&self, id: BlockId) -> Option<Rect> {
        self.rects.get(&id).map(|r| r.translate(-self.scroll))
    }
}
