// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Glossary payload: term entries plus search, category/tag filters and sorting.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Category label used when grouping entries that have none.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One glossary term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryEntry {
    /// The term being defined.
    pub term: String,
    /// Its definition.
    pub definition: String,
    /// Optional category.
    pub category: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

/// Glossary entries in authored order.
///
/// Authored as a JSON object mapping each term to either a definition string
/// or `{definition, category?, tags?}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Glossary {
    entries: Vec<GlossaryEntry>,
}

/// Sort direction for terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// A to Z.
    #[default]
    Ascending,
    /// Z to A.
    Descending,
}

/// Current search and filter selection of a glossary view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlossaryQuery {
    /// Case-insensitive substring matched against term and definition.
    pub text: String,
    /// Only entries in this category.
    pub category: Option<String>,
    /// Entries carrying at least one of these tags.
    pub tags: BTreeSet<String>,
    /// Term ordering.
    pub sort: SortDirection,
}

impl GlossaryQuery {
    /// Flip selection of a tag.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_owned());
        }
    }
}

impl Glossary {
    /// Glossary from already-built entries.
    pub fn from_entries(entries: Vec<GlossaryEntry>) -> Self {
        Self { entries }
    }

    /// All entries in authored order.
    pub fn entries(&self) -> &[GlossaryEntry] {
        &self.entries
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .filter_map(|e| e.category.as_deref())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Distinct tags in first-seen order.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .flat_map(|e| e.tags.iter().map(String::as_str))
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Entries matching `query`, sorted by lowercased term.
    pub fn filter(&self, query: &GlossaryQuery) -> Vec<&GlossaryEntry> {
        let needle = query.text.to_lowercase();
        let mut out: Vec<&GlossaryEntry> = self
            .entries
            .iter()
            .filter(|e| {
                needle.is_empty()
                    || e.term.to_lowercase().contains(&needle)
                    || e.definition.to_lowercase().contains(&needle)
            })
            .filter(|e| match &query.category {
                Some(c) => e.category.as_ref() == Some(c),
                None => true,
            })
            .filter(|e| query.tags.is_empty() || e.tags.iter().any(|t| query.tags.contains(t)))
            .collect();
        out.sort_by_key(|e| e.term.to_lowercase());
        if query.sort == SortDirection::Descending {
            out.reverse();
        }
        out
    }

    /// Filtered entries grouped by category (missing category → [`UNCATEGORIZED`]).
    pub fn grouped(&self, query: &GlossaryQuery) -> Vec<(String, Vec<&GlossaryEntry>)> {
        let mut groups: Vec<(String, Vec<&GlossaryEntry>)> = Vec::new();
        for entry in self.filter(query) {
            let key = entry.category.as_deref().unwrap_or(UNCATEGORIZED);
            match groups.iter_mut().find(|(k, _)| k == key) {
                Some((_, list)) => list.push(entry),
                None => groups.push((key.to_owned(), vec![entry])),
            }
        }
        groups
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDefinition {
    Plain(String),
    Detailed {
        definition: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    },
}

impl Serialize for Glossary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for e in &self.entries {
            let raw = if e.category.is_none() && e.tags.is_empty() {
                RawDefinition::Plain(e.definition.clone())
            } else {
                RawDefinition::Detailed {
                    definition: e.definition.clone(),
                    category: e.category.clone(),
                    tags: e.tags.clone(),
                }
            };
            map.serialize_entry(&e.term, &raw)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Glossary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GlossaryVisitor)
    }
}

struct GlossaryVisitor;

impl<'de> Visitor<'de> for GlossaryVisitor {
    type Value = Glossary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of terms to definitions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Glossary, A::Error> {
        let mut entries = Vec::new();
        while let Some((term, raw)) = access.next_entry::<String, RawDefinition>()? {
            let entry = match raw {
                RawDefinition::Plain(definition) => GlossaryEntry {
                    term,
                    definition,
                    category: None,
                    tags: Vec::new(),
                },
                RawDefinition::Detailed {
                    definition,
                    category,
                    tags,
                } => GlossaryEntry {
                    term,
                    definition,
                    category,
                    tags,
                },
            };
            entries.push(entry);
        }
        Ok(Glossary { entries })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Glossary {
        serde_json::from_str(
            r#"{
                "State": {"definition": "Data that changes", "category": "React", "tags": ["core"]},
                "Closure": "A function with captured scope",
                "Effect": {
                    "definition": "Side work after render",
                    "category": "React",
                    "tags": ["hooks"]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn mixed_definition_shapes_parse_in_order() {
        let g = sample();
        let terms: Vec<&str> = g.entries().iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, ["State", "Closure", "Effect"]);
        assert_eq!(g.categories(), ["React"]);
        assert_eq!(g.tags(), ["core", "hooks"]);
    }

    #[test]
    fn search_matches_definition_text_case_insensitively() {
        let g = sample();
        let q = GlossaryQuery {
            text: "RENDER".into(),
            ..GlossaryQuery::default()
        };
        let hits: Vec<&str> = g.filter(&q).iter().map(|e| e.term.as_str()).collect();
        assert_eq!(hits, ["Effect"]);
    }

    #[test]
    fn sort_and_tag_filters_compose() {
        let g = sample();
        let mut q = GlossaryQuery {
            sort: SortDirection::Descending,
            ..GlossaryQuery::default()
        };
        let all: Vec<&str> = g.filter(&q).iter().map(|e| e.term.as_str()).collect();
        assert_eq!(all, ["State", "Effect", "Closure"]);
        q.toggle_tag("hooks");
        q.toggle_tag("core");
        let tagged: Vec<&str> = g.filter(&q).iter().map(|e| e.term.as_str()).collect();
        assert_eq!(tagged, ["State", "Effect"]);
    }

    #[test]
    fn grouping_uses_uncategorized_bucket() {
        let g = sample();
        let groups = g.grouped(&GlossaryQuery::default());
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["Uncategorized", "React"]);
    }
}
