// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text, table and JSON renderings of command results.

use comfy_table::Table;
use quill_outline::{ActiveSections, BlockId, BlockSpec, BlockTree, FeatureStats, TocNode};
use quill_progress::timestamps::{active_index, format_duration, section_progress, section_state};
use quill_progress::{SaveOutcome, Timestamp, VideoProgress};
use serde::Serialize;
use serde_json::{json, Value};

/// Outline as indented lines: `<title> [<type>] <id>`.
pub fn toc_lines(nodes: &[TocNode]) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &TocNode)> = nodes.iter().rev().map(|n| (0, n)).collect();
    while let Some((depth, node)) = stack.pop() {
        out.push(format!(
            "{}{} [{}] {}",
            "  ".repeat(depth),
            node.title,
            node.tag,
            node.id
        ));
        stack.extend(node.children.iter().rev().map(|c| (depth + 1, c)));
    }
    out
}

/// Outline as nested JSON objects carrying the renderer attributes.
pub fn toc_json(nodes: &[TocNode]) -> Value {
    Value::Array(
        nodes
            .iter()
            .map(|n| {
                json!({
                    "id": n.id.to_string(),
                    "title": n.title,
                    "type": n.tag,
                    "icon": n.icon,
                    "iconColor": n.color.as_str(),
                    "children": toc_json(&n.children),
                })
            })
            .collect(),
    )
}

fn block_label(tree: &BlockTree, id: BlockId) -> String {
    tree.get(id)
        .map_or_else(|| id.to_string(), |b| format!("{} ({id})", b.title().trim()))
}

/// `primary:` and `secondary:` report lines.
pub fn active_lines(tree: &BlockTree, active: &ActiveSections) -> Vec<String> {
    let primary = active
        .primary
        .map_or_else(|| "none".to_owned(), |id| block_label(tree, id));
    let mut out = vec![format!("primary: {primary}")];
    if active.secondary.is_empty() {
        out.push("secondary: none".to_owned());
    } else {
        out.extend(
            active
                .secondary
                .iter()
                .map(|id| format!("secondary: {}", block_label(tree, *id))),
        );
    }
    out
}

#[derive(Serialize)]
struct FeatureSummary<'a> {
    block: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    anchor: Option<&'a str>,
    badges: Vec<String>,
    #[serde(flatten)]
    stats: &'a FeatureStats,
}

/// Feature summaries as a JSON array.
pub fn features_json(summaries: &[(&BlockSpec, FeatureStats)]) -> Value {
    let rows: Vec<FeatureSummary<'_>> = summaries
        .iter()
        .map(|(spec, stats)| FeatureSummary {
            block: &spec.title,
            anchor: spec.anchor.as_deref(),
            badges: stats.badges(),
            stats,
        })
        .collect();
    serde_json::to_value(rows).unwrap_or(Value::Null)
}

/// Feature summaries as a table: block, badges, item ids.
pub fn features_table(summaries: &[(&BlockSpec, FeatureStats)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Block", "Badges", "Items"]);
    for (spec, stats) in summaries {
        let badges = stats.badges();
        let items: Vec<String> = stats
            .items
            .iter()
            .map(|i| format!("{} (#{})", i.title, i.id))
            .collect();
        table.add_row(vec![
            spec.title.clone(),
            if badges.is_empty() {
                "-".to_owned()
            } else {
                badges.join(", ")
            },
            items.join("\n"),
        ]);
    }
    table
}

/// Chapter table; state and progress columns appear when a playhead is given.
pub fn timestamps_table(stamps: &[Timestamp], at: Option<f64>, total: Option<f64>) -> Table {
    let end = total.unwrap_or_else(|| stamps.last().map_or(0.0, |s| s.time as f64));
    let current = at.and_then(|t| active_index(stamps, t));
    let mut header = vec!["", "Time", "Label", "Length"];
    if at.is_some() {
        header.extend(["State", "Progress"]);
    }
    let mut table = Table::new();
    table.set_header(header);
    for (i, stamp) in stamps.iter().enumerate() {
        let next = stamps.get(i + 1).map_or(end, |n| n.time as f64);
        let length = if total.is_some() || i + 1 < stamps.len() {
            format_duration(next - stamp.time as f64)
        } else {
            "-".to_owned()
        };
        let marker = if current == Some(i) { ">" } else { "" };
        let mut row = vec![
            marker.to_owned(),
            stamp.formatted_time.clone(),
            stamp.label.clone(),
            length,
        ];
        if let Some(t) = at {
            let state = section_state(stamps, i, t, end)
                .map_or_else(String::new, |s| s.to_string());
            let pct = section_progress(stamps, i, t, end)
                .map_or_else(String::new, |p| format!("{p}%"));
            row.extend([state, pct]);
        }
        table.add_row(row);
    }
    table
}

/// Saved positions, most recent first.
pub fn progress_table(records: &[&VideoProgress]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["URL", "Position", "Duration", "Title", "Updated (ms)"]);
    for rec in records {
        table.add_row(vec![
            rec.url.clone(),
            format_duration(rec.timestamp),
            rec.duration.map_or_else(|| "-".to_owned(), format_duration),
            rec.title.clone().unwrap_or_default(),
            rec.last_updated.to_string(),
        ]);
    }
    table
}

/// Human-readable result of a save.
pub fn outcome_label(outcome: SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Saved => "saved",
        SaveOutcome::Finished => "finished (record cleared)",
        SaveOutcome::TooShort => "skipped: video too short to track",
        SaveOutcome::Unchanged => "skipped: position unchanged",
        SaveOutcome::Ignored => "ignored: invalid url or time",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quill_outline::TocBuilder;
    use quill_progress::parse_timestamps;

    #[test]
    fn toc_lines_indent_children() {
        let tree = BlockTree::from_specs(&[
            BlockSpec::classic("Hooks").child(BlockSpec::classic("useState"))
        ]);
        let toc = TocBuilder::build(&tree);
        let lines = toc_lines(toc.roots());
        assert_eq!(lines, ["Hooks [Classic] :b1:", "  useState [Classic] :b2:"]);
        let json = toc_json(toc.roots());
        assert_eq!(json[0]["children"][0]["title"], "useState");
        assert_eq!(json[0]["iconColor"], "gray");
    }

    #[test]
    fn timestamp_rows_mark_the_current_chapter() {
        let stamps = parse_timestamps("0:00 - Intro\n01:00 - Body");
        let table = timestamps_table(&stamps, Some(90.0), Some(120.0)).to_string();
        assert!(table.contains("inProgress"));
        assert!(table.contains("50%"));
        assert!(table.contains("completed"));
        assert!(table.contains("1:00"));
    }
}
