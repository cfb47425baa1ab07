// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
//! Property tests for outline ordering and active-section selection.

use proptest::prelude::*;
use quill_geom::{Rect, Viewport};
use quill_outline::{
    ActiveSectionTracker, BlockId, BlockKind, BlockSpec, BlockTree, LayoutSource, StackLayout,
    StackMetrics, Toc, TocBuilder, TocWatcher, TrackerConfig,
};
use std::collections::{HashMap, HashSet};

/// Anchors handed out to generated blocks; `missing` never names a block.
const KEYS: [&str; 5] = ["a0", "a1", "a2", "a3", "missing"];

fn spec(title: String, show: bool, lines: usize, children: Vec<BlockSpec>) -> BlockSpec {
    let kind = if lines == 0 {
        BlockKind::Classic
    } else {
        BlockKind::Markdown {
            content: vec!["line"; lines].join("\n"),
        }
    };
    BlockSpec {
        show_on_toc: show,
        children,
        ..BlockSpec::new(title, kind)
    }
}

fn block_tree() -> impl Strategy<Value = Vec<BlockSpec>> {
    let leaf = ("[ a-z]{0,5}", prop::bool::weighted(0.8), 0usize..6)
        .prop_map(|(t, show, lines)| spec(t, show, lines, Vec::new()));
    let node = leaf.prop_recursive(4, 40, 4, |inner| {
        (
            "[a-z]{1,5}",
            prop::bool::weighted(0.8),
            0usize..3,
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(t, show, lines, kids)| spec(t, show, lines, kids))
    });
    prop::collection::vec(node, 1..5)
}

fn key() -> impl Strategy<Value = Option<String>> {
    prop::option::weighted(0.4, prop::sample::select(KEYS.to_vec()).prop_map(str::to_owned))
}

/// A small authored subtree whose blocks may carry anchors and explicit parents.
fn linked_block() -> impl Strategy<Value = BlockSpec> {
    let leaf = ("[a-z]{1,4}", prop::bool::weighted(0.75), key(), key()).prop_map(
        |(t, show, anchor, parent)| BlockSpec {
            anchor: anchor.filter(|a| a != "missing"),
            parent_id: parent,
            ..spec(t, show, 1, Vec::new())
        },
    );
    leaf.prop_recursive(3, 12, 3, |inner| {
        (
            "[a-z]{1,4}",
            prop::bool::weighted(0.75),
            key(),
            key(),
            prop::collection::vec(inner, 0..3),
        )
            .prop_map(|(t, show, anchor, parent, kids)| BlockSpec {
                anchor: anchor.filter(|a| a != "missing"),
                parent_id: parent,
                ..spec(t, show, 0, kids)
            })
    })
}

#[derive(Debug, Clone)]
enum Edit {
    Mount { parent: Option<usize>, index: usize, spec: BlockSpec },
    Unmount(usize),
    Move { block: usize, parent: Option<usize>, index: usize },
    Show(usize, bool),
    Reparent(usize, Option<String>),
}

fn edit() -> impl Strategy<Value = Edit> {
    let pick = 0usize..64;
    prop_oneof![
        (prop::option::of(pick.clone()), 0usize..8, linked_block())
            .prop_map(|(parent, index, spec)| Edit::Mount { parent, index, spec }),
        pick.clone().prop_map(Edit::Unmount),
        (pick.clone(), prop::option::of(pick.clone()), 0usize..8)
            .prop_map(|(block, parent, index)| Edit::Move { block, parent, index }),
        (pick.clone(), any::<bool>()).prop_map(|(b, show)| Edit::Show(b, show)),
        (pick, key()).prop_map(|(b, parent)| Edit::Reparent(b, parent)),
    ]
}

fn nth(order: &[BlockId], pick: usize) -> Option<BlockId> {
    (!order.is_empty()).then(|| order[pick % order.len()])
}

/// Applies one edit; rejected edits (cycles, unknown targets) leave the tree untouched.
fn apply(tree: &mut BlockTree, edit: &Edit) {
    let order = tree.document_order();
    match edit {
        Edit::Mount { parent, index, spec } => {
            let parent = parent.and_then(|p| nth(&order, p));
            let len = parent.map_or(tree.roots().len(), |p| tree.children(p).len());
            let _ = tree.mount_at(parent, index % (len + 1), spec);
        }
        Edit::Unmount(b) => {
            if let Some(id) = nth(&order, *b) {
                let _ = tree.unmount(id);
            }
        }
        Edit::Move { block, parent, index } => {
            if let Some(id) = nth(&order, *block) {
                let parent = parent.and_then(|p| nth(&order, p));
                let _ = tree.move_to(id, parent, *index);
            }
        }
        Edit::Show(b, show) => {
            if let Some(id) = nth(&order, *b) {
                let _ = tree.set_show_on_toc(id, *show);
            }
        }
        Edit::Reparent(b, parent) => {
            if let Some(id) = nth(&order, *b) {
                let _ = tree.set_explicit_parent(id, parent.clone());
            }
        }
    }
}

fn included(tree: &BlockTree, id: BlockId) -> bool {
    tree.get(id)
        .is_some_and(|b| b.show_on_toc() && !b.title().trim().is_empty())
}

/// Parent the outline should use before loop breaking: the explicit reference
/// alone when one is set, the structural parent otherwise.
fn intended_parent(tree: &BlockTree, id: BlockId) -> Option<BlockId> {
    let parent = match tree.get(id)?.explicit_parent() {
        Some(key) => tree.resolve(key),
        None => tree.parent(id),
    };
    parent.filter(|p| *p != id && included(tree, *p))
}

fn on_intended_loop(tree: &BlockTree, id: BlockId) -> bool {
    let mut seen = HashSet::new();
    let mut cur = intended_parent(tree, id);
    while let Some(p) = cur {
        if p == id {
            return true;
        }
        if !seen.insert(p) {
            return false;
        }
        cur = intended_parent(tree, p);
    }
    false
}

fn assert_outline(tree: &BlockTree, toc: &Toc) -> Result<(), TestCaseError> {
    let positions = tree.positions();
    let flat: Vec<BlockId> = toc.flatten().into_iter().map(|(_, n)| n.id).collect();
    let unique: HashSet<BlockId> = flat.iter().copied().collect();
    prop_assert_eq!(unique.len(), flat.len());

    let mut sibling_lists = vec![toc.roots()];
    while let Some(list) = sibling_lists.pop() {
        for pair in list.windows(2) {
            prop_assert!(positions[&pair[0].id] < positions[&pair[1].id]);
        }
        sibling_lists.extend(list.iter().map(|n| n.children.as_slice()));
    }

    let any_explicit = tree
        .document_order()
        .into_iter()
        .any(|id| tree.get(id).is_some_and(|b| b.explicit_parent().is_some()));
    if !any_explicit {
        for pair in flat.windows(2) {
            prop_assert!(positions[&pair[0]] < positions[&pair[1]]);
        }
    }

    for id in tree.document_order() {
        prop_assert_eq!(unique.contains(&id), included(tree, id));
        if !unique.contains(&id) {
            continue;
        }
        let intended = intended_parent(tree, id);
        let actual = toc.parent(id);
        if actual != intended {
            prop_assert_eq!(actual, None);
            prop_assert!(on_intended_loop(tree, id));
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn toc_follows_document_order_without_duplicates(specs in block_tree()) {
        let tree = BlockTree::from_specs(&specs);
        let toc = TocBuilder::build(&tree);
        let positions = tree.positions();

        let flat: Vec<_> = toc.flatten().into_iter().map(|(_, n)| n.id).collect();
        let unique: HashSet<_> = flat.iter().copied().collect();
        prop_assert_eq!(unique.len(), flat.len());
        for pair in flat.windows(2) {
            prop_assert!(positions[&pair[0]] < positions[&pair[1]]);
        }

        for id in tree.document_order() {
            let block = tree.get(id).unwrap();
            let included = block.show_on_toc() && !block.title().trim().is_empty();
            prop_assert_eq!(toc.contains(id), included);
            if included {
                let expected = tree.parent(id).filter(|p| unique.contains(p));
                prop_assert_eq!(toc.parent(id), expected);
            }
        }
    }

    #[test]
    fn watched_outline_tracks_every_edit(
        seed in prop::collection::vec(linked_block(), 0..4),
        edits in prop::collection::vec(edit(), 1..24),
    ) {
        let mut tree = BlockTree::from_specs(&seed);
        let mut watcher = TocWatcher::new();
        prop_assert!(watcher.refresh(&tree));
        assert_outline(&tree, watcher.toc())?;

        for edit in &edits {
            let before = tree.revision();
            apply(&mut tree, edit);
            prop_assert_eq!(watcher.refresh(&tree), tree.revision() != before);
            prop_assert_eq!(watcher.toc(), &TocBuilder::build(&tree));
            assert_outline(&tree, watcher.toc())?;
        }
    }

    #[test]
    fn primary_is_the_deepest_band_candidate(
        specs in block_tree(),
        scroll in 0.0f64..3000.0,
        height in 200.0f64..1200.0,
    ) {
        let tree = BlockTree::from_specs(&specs);
        let toc = TocBuilder::build(&tree);
        let mut layout = StackLayout::measure(&tree, None, StackMetrics::default());
        layout.set_scroll(scroll);
        let viewport = Viewport::new(height);
        let config = TrackerConfig::default();
        let active = ActiveSectionTracker::new(config).compute(viewport, &tree, &toc, &layout);

        let band = viewport.middle_band(config.band_ratio);
        let candidates: Vec<_> = tree
            .document_order()
            .into_iter()
            .filter(|id| layout.rect(*id).is_some_and(|r| r.intersects(&band)))
            .collect();

        match active.primary {
            None => {
                prop_assert!(candidates.is_empty());
                prop_assert!(active.secondary.is_empty());
            }
            Some(primary) => {
                prop_assert!(candidates.contains(&primary));
                let depth = tree.depth(primary);
                prop_assert!(candidates.iter().all(|c| tree.depth(*c) <= depth));
                prop_assert!(!active.secondary.contains(&primary));
            }
        }
    }

    #[test]
    fn equal_depth_candidates_resolve_by_distance_then_order(
        specs in block_tree(),
        edges in prop::collection::vec((-10i32..50, 0i32..20), 64),
    ) {
        let tree = BlockTree::from_specs(&specs);
        let toc = TocBuilder::build(&tree);
        let order = tree.document_order();
        // Coarse 20px steps make equal distances common.
        let layout: HashMap<BlockId, Rect> = order
            .iter()
            .zip(&edges)
            .map(|(id, (top, h))| {
                let top = f64::from(*top) * 20.0;
                (*id, Rect::new(top, top + f64::from(*h) * 20.0))
            })
            .collect();
        let viewport = Viewport::new(800.0);
        let config = TrackerConfig::default();
        let active = ActiveSectionTracker::new(config).compute(viewport, &tree, &toc, &layout);

        let band = viewport.middle_band(config.band_ratio);
        let candidates: Vec<(usize, BlockId, usize, f64)> = order
            .iter()
            .enumerate()
            .filter_map(|(pos, id)| {
                let rect = layout.rect(*id)?;
                rect.intersects(&band)
                    .then(|| (pos, *id, tree.depth(*id), viewport.distance_to_center(&rect)))
            })
            .collect();
        let expected = candidates
            .iter()
            .max_by(|a, b| {
                a.2.cmp(&b.2)
                    .then_with(|| b.3.total_cmp(&a.3))
                    .then_with(|| b.0.cmp(&a.0))
            })
            .map(|c| c.1);
        prop_assert_eq!(active.primary, expected);
    }
}
