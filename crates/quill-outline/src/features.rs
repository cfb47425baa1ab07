// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Challenge/project summary shown on blocks with `features` enabled.

use crate::block::{BlockKind, BlockSpec, ChallengeKind};
use serde::Serialize;

/// Kind of a summarised feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureKind {
    /// Exercise-style challenge.
    Challenge,
    /// Project.
    Project,
}

/// One challenge or project found beneath a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureItem {
    /// Exercise or project.
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    /// Block title.
    pub title: String,
    /// Author anchor, or a generated `challenge-<n>` / `project-<n>`.
    pub id: String,
}

/// Counts and listing of features in a subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureStats {
    /// Number of exercise challenges.
    pub challenges: usize,
    /// Number of projects.
    pub projects: usize,
    /// Items in depth-first order.
    pub items: Vec<FeatureItem>,
}

impl FeatureStats {
    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Badge captions, e.g. `"1 Challenge"`, `"3 Projects"`. Zero counts are omitted.
    pub fn badges(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.challenges > 0 {
            out.push(count_label(self.challenges, "Challenge"));
        }
        if self.projects > 0 {
            out.push(count_label(self.projects, "Project"));
        }
        out
    }
}

fn count_label(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Walks authored block specs and tallies challenges and projects.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureAggregator;

impl FeatureAggregator {
    /// Stats for everything below `block` (the block itself is not counted).
    pub fn for_block(block: &BlockSpec) -> FeatureStats {
        Self::collect(&block.children)
    }

    /// Stats for a forest of specs, depth-first.
    pub fn collect(specs: &[BlockSpec]) -> FeatureStats {
        let mut stats = FeatureStats::default();
        for spec in specs {
            visit(spec, &mut stats);
        }
        stats
    }

    /// Every block with `features` enabled paired with its stats, in document order.
    pub fn summaries(specs: &[BlockSpec]) -> Vec<(&BlockSpec, FeatureStats)> {
        let mut out = Vec::new();
        let mut stack: Vec<&BlockSpec> = specs.iter().rev().collect();
        while let Some(spec) = stack.pop() {
            if spec.features {
                out.push((spec, Self::for_block(spec)));
            }
            stack.extend(spec.children.iter().rev());
        }
        out
    }
}

fn visit(spec: &BlockSpec, stats: &mut FeatureStats) {
    if let BlockKind::Challenge { challenge_type, .. } = &spec.kind {
        let (kind, prefix, n) = match challenge_type {
            ChallengeKind::Project => {
                stats.projects += 1;
                (FeatureKind::Project, "project", stats.projects)
            }
            ChallengeKind::Exercise => {
                stats.challenges += 1;
                (FeatureKind::Challenge, "challenge", stats.challenges)
            }
        };
        let id = spec
            .anchor
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| format!("{prefix}-{n}"));
        stats.items.push(FeatureItem {
            kind,
            title: spec.title.clone(),
            id,
        });
    }
    for child in &spec.children {
        visit(child, stats);
    }
}
