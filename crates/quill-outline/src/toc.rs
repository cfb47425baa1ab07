// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Table of contents derived from the mounted block tree.
//!
//! The outline is rebuilt whole from a [`BlockTree`]. A block's TOC parent is
//! its explicit parent reference when one resolves, otherwise its nearest
//! structural ancestor (visible in the TOC or not). Blocks whose parent is
//! not part of the outline become roots. Sibling lists follow document order.

use crate::block::{BlockId, BlockTag, ColorToken};
use crate::tree::BlockTree;
use std::collections::{BTreeSet, HashMap, HashSet};

/// One entry of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocNode {
    /// Block the entry points at.
    pub id: BlockId,
    /// Trimmed title.
    pub title: String,
    /// Block type tag.
    pub tag: BlockTag,
    /// Icon name.
    pub icon: &'static str,
    /// Icon colour.
    pub color: ColorToken,
    /// Nested entries in document order.
    pub children: Vec<TocNode>,
}

/// Built outline plus a child → parent index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toc {
    roots: Vec<TocNode>,
    parents: HashMap<BlockId, BlockId>,
}

/// Result of a title search over the outline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TocFilter {
    /// Matching entries together with every ancestor of a match.
    pub nodes: Vec<TocNode>,
    /// Entries to open in the TOC so every match is reachable.
    pub expand: BTreeSet<BlockId>,
}

impl Toc {
    /// Top-level entries.
    pub fn roots(&self) -> &[TocNode] {
        &self.roots
    }

    /// Whether the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    /// Whether `id` is in the outline.
    pub fn contains(&self, id: BlockId) -> bool {
        self.find(id).is_some()
    }

    /// Entry for `id`.
    pub fn find(&self, id: BlockId) -> Option<&TocNode> {
        let mut stack: Vec<&TocNode> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// TOC parent of `id`.
    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.parents.get(&id).copied()
    }

    /// Ancestors of `id`, root first, excluding `id` itself.
    pub fn parent_path(&self, id: BlockId) -> Vec<BlockId> {
        let mut path = Vec::new();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            path.push(p);
            cur = self.parent(p);
        }
        path.reverse();
        path
    }

    /// Every entry with its nesting depth, in pre-order.
    pub fn flatten(&self) -> Vec<(usize, &TocNode)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, &TocNode)> =
            self.roots.iter().rev().map(|n| (0, n)).collect();
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, node));
            stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        }
        out
    }

    /// Case-insensitive title search.
    ///
    /// An empty query keeps the whole outline and expands nothing.
    pub fn filter(&self, query: &str) -> TocFilter {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return TocFilter {
                nodes: self.roots.clone(),
                expand: BTreeSet::new(),
            };
        }
        let mut expand = BTreeSet::new();
        let nodes = self.filter_nodes(&self.roots, &needle, &mut expand);
        TocFilter { nodes, expand }
    }

    fn filter_nodes(
        &self,
        nodes: &[TocNode],
        needle: &str,
        expand: &mut BTreeSet<BlockId>,
    ) -> Vec<TocNode> {
        let mut out = Vec::new();
        for node in nodes {
            let matches = node.title.to_lowercase().contains(needle);
            let children = self.filter_nodes(&node.children, needle, expand);
            if matches || !children.is_empty() {
                if matches {
                    expand.extend(self.parent_path(node.id));
                    expand.insert(node.id);
                }
                out.push(TocNode {
                    children,
                    ..node.clone()
                });
            }
        }
        out
    }
}

/// Builds a [`Toc`] from the mounted blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TocBuilder;

impl TocBuilder {
    /// Rebuilds the outline from scratch.
    pub fn build(tree: &BlockTree) -> Toc {
        let order = tree.document_order();
        let included: HashSet<BlockId> = order
            .iter()
            .copied()
            .filter(|id| {
                tree.get(*id)
                    .is_some_and(|b| b.show_on_toc() && !b.title().trim().is_empty())
            })
            .collect();

        let mut parents: HashMap<BlockId, BlockId> = HashMap::new();
        for id in order.iter().copied().filter(|id| included.contains(id)) {
            // A set explicit parent replaces nesting even when it does not resolve.
            let parent = match tree.get(id).and_then(|b| b.explicit_parent()) {
                Some(key) => tree.resolve(key),
                None => tree.parent(id),
            };
            if let Some(p) = parent.filter(|p| *p != id && included.contains(p)) {
                parents.insert(id, p);
            }
        }
        break_cycles(&order, &mut parents);

        let mut children: HashMap<BlockId, Vec<BlockId>> = HashMap::new();
        let mut roots = Vec::new();
        for id in order.iter().copied().filter(|id| included.contains(id)) {
            match parents.get(&id) {
                Some(p) => children.entry(*p).or_default().push(id),
                None => roots.push(id),
            }
        }

        let roots: Vec<TocNode> = roots
            .into_iter()
            .filter_map(|id| assemble(tree, &children, id))
            .collect();
        tracing::debug!(
            roots = roots.len(),
            linked = parents.len(),
            revision = tree.revision(),
            "rebuilt toc"
        );
        Toc { roots, parents }
    }
}

/// Explicit parent references can form loops; the first member of a loop in
/// document order is detached and becomes a root.
fn break_cycles(order: &[BlockId], parents: &mut HashMap<BlockId, BlockId>) {
    for id in order {
        let mut seen = HashSet::new();
        let mut cur = parents.get(id).copied();
        while let Some(p) = cur {
            if p == *id {
                parents.remove(id);
                break;
            }
            if !seen.insert(p) {
                break;
            }
            cur = parents.get(&p).copied();
        }
    }
}

fn assemble(
    tree: &BlockTree,
    children: &HashMap<BlockId, Vec<BlockId>>,
    id: BlockId,
) -> Option<TocNode> {
    let block = tree.get(id)?;
    let appearance = block.appearance();
    Some(TocNode {
        id,
        title: block.title().trim().to_owned(),
        tag: block.tag(),
        icon: appearance.icon,
        color: appearance.color,
        children: children
            .get(&id)
            .map(|kids| {
                kids.iter()
                    .filter_map(|c| assemble(tree, children, *c))
                    .collect()
            })
            .unwrap_or_default(),
    })
}

/// Holds the latest outline and rebuilds it only when the tree changed.
#[derive(Debug, Clone, Default)]
pub struct TocWatcher {
    toc: Toc,
    revision: Option<u64>,
}

impl TocWatcher {
    /// Watcher with an empty outline that rebuilds on the first refresh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current outline.
    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Rebuilds when the tree revision moved; returns whether it did.
    pub fn refresh(&mut self, tree: &BlockTree) -> bool {
        if self.revision == Some(tree.revision()) {
            return false;
        }
        self.toc = TocBuilder::build(tree);
        self.revision = Some(tree.revision());
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::block::{BlockSpec, ChallengeKind};

    fn titles(nodes: &[TocNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.title.as_str()).collect()
    }

    #[test]
    fn hidden_parent_lifts_children_to_roots() {
        let tree = BlockTree::from_specs(&[
            BlockSpec::classic("Wrapper")
                .hidden()
                .child(BlockSpec::classic("A"))
                .child(BlockSpec::classic("B")),
            BlockSpec::classic("C"),
        ]);
        let toc = TocBuilder::build(&tree);
        assert_eq!(titles(toc.roots()), ["A", "B", "C"]);
    }

    #[test]
    fn blank_titles_are_skipped_and_titles_are_trimmed() {
        let tree = BlockTree::from_specs(&[
            BlockSpec::classic("   "),
            BlockSpec::classic("  Hooks  "),
        ]);
        let toc = TocBuilder::build(&tree);
        assert_eq!(titles(toc.roots()), ["Hooks"]);
    }

    #[test]
    fn explicit_parent_reparents_and_keeps_document_order() {
        let mut late = BlockSpec::classic("Late");
        late.parent_id = Some("intro".into());
        let tree = BlockTree::from_specs(&[
            BlockSpec::classic("Intro")
                .with_anchor("intro")
                .child(BlockSpec::classic("Early")),
            BlockSpec::classic("Other"),
            late,
        ]);
        let toc = TocBuilder::build(&tree);
        assert_eq!(titles(toc.roots()), ["Intro", "Other"]);
        assert_eq!(titles(&toc.roots()[0].children), ["Early", "Late"]);
    }

    #[test]
    fn dangling_explicit_parent_makes_a_root() {
        let mut orphan = BlockSpec::classic("Orphan");
        orphan.parent_id = Some("missing".into());
        let tree = BlockTree::from_specs(&[BlockSpec::classic("Top").child(orphan)]);
        let toc = TocBuilder::build(&tree);
        assert_eq!(titles(toc.roots()), ["Top", "Orphan"]);
        assert!(toc.roots()[0].children.is_empty());
    }

    #[test]
    fn explicit_parent_hidden_from_toc_makes_a_root() {
        let mut child = BlockSpec::classic("Child");
        child.parent_id = Some("hidden".into());
        let tree = BlockTree::from_specs(&[
            BlockSpec::classic("Top").child(child),
            BlockSpec::classic("Hidden").with_anchor("hidden").hidden(),
        ]);
        let toc = TocBuilder::build(&tree);
        assert_eq!(titles(toc.roots()), ["Top", "Child"]);
    }

    #[test]
    fn explicit_parent_loop_is_broken_deterministically() {
        let mut a = BlockSpec::classic("A").with_anchor("a");
        a.parent_id = Some("b".into());
        let mut b = BlockSpec::classic("B").with_anchor("b");
        b.parent_id = Some("a".into());
        let tree = BlockTree::from_specs(&[a, b]);
        let toc = TocBuilder::build(&tree);
        assert_eq!(titles(toc.roots()), ["A"]);
        assert_eq!(toc.len(), 2);
    }

    #[test]
    fn parent_path_is_root_first() {
        let tree = BlockTree::from_specs(&[BlockSpec::classic("L0")
            .child(BlockSpec::classic("L1").child(BlockSpec::classic("L2")))]);
        let toc = TocBuilder::build(&tree);
        let flat = toc.flatten();
        let ids: Vec<BlockId> = flat.iter().map(|(_, n)| n.id).collect();
        assert_eq!(flat.iter().map(|(d, _)| *d).collect::<Vec<_>>(), [0, 1, 2]);
        assert_eq!(toc.parent_path(ids[2]), [ids[0], ids[1]]);
        assert!(toc.parent_path(ids[0]).is_empty());
    }

    #[test]
    fn filter_keeps_ancestors_and_expands_their_path() {
        let tree = BlockTree::from_specs(&[
            BlockSpec::classic("Hooks")
                .child(BlockSpec::classic("useState"))
                .child(BlockSpec::challenge("Counter", ChallengeKind::Exercise)),
            BlockSpec::classic("Routing"),
        ]);
        let toc = TocBuilder::build(&tree);
        let result = toc.filter("usestate");
        assert_eq!(titles(&result.nodes), ["Hooks"]);
        assert_eq!(titles(&result.nodes[0].children), ["useState"]);
        let hooks = toc.roots()[0].id;
        let use_state = toc.roots()[0].children[0].id;
        assert_eq!(result.expand, [hooks, use_state].into_iter().collect());
        assert_eq!(toc.filter("").nodes.len(), 2);
        assert!(toc.filter("zzz").nodes.is_empty());
    }

    #[test]
    fn watcher_rebuilds_only_on_revision_change() {
        let mut tree = BlockTree::from_specs(&[BlockSpec::classic("A")]);
        let mut watcher = TocWatcher::new();
        assert!(watcher.refresh(&tree));
        assert!(!watcher.refresh(&tree));
        let a = tree.roots()[0];
        tree.set_title(a, "Renamed").unwrap();
        assert!(watcher.refresh(&tree));
        assert_eq!(watcher.toc().roots()[0].title, "Renamed");
    }
}
