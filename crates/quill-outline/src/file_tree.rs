// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Folder/file tree payload of `FileStructureView` blocks and its disclosure state.

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One entry in a [`FileTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum FileEntry {
    /// Leaf file.
    File,
    /// Nested folder.
    Folder(FileTree),
}

/// Ordered folder contents, in authored order.
///
/// Authored as a JSON object: object values are folders, any other value is a file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileTree {
    entries: Vec<(String, FileEntry)>,
}

impl FileTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file (builder style).
    #[must_use]
    pub fn file(mut self, name: impl Into<String>) -> Self {
        self.entries.push((name.into(), FileEntry::File));
        self
    }

    /// Adds a folder (builder style).
    #[must_use]
    pub fn folder(mut self, name: impl Into<String>, tree: FileTree) -> Self {
        self.entries.push((name.into(), FileEntry::Folder(tree)));
        self
    }

    /// Entries in authored order.
    pub fn entries(&self) -> &[(String, FileEntry)] {
        &self.entries
    }

    /// Every folder path (`a`, `a/b`, ...) in depth-first authored order.
    pub fn folder_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_folders("", &mut out);
        out
    }

    fn collect_folders(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, entry) in &self.entries {
            if let FileEntry::Folder(sub) = entry {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };
                out.push(path.clone());
                sub.collect_folders(&path, out);
            }
        }
    }
}

/// Lowercased extension of a file name, if any.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Which folders of a rendered tree are open. Starts with every folder open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTreeView {
    expanded: BTreeSet<String>,
}

impl FileTreeView {
    /// View with every folder of `tree` expanded.
    pub fn new(tree: &FileTree) -> Self {
        Self {
            expanded: tree.folder_paths().into_iter().collect(),
        }
    }

    /// Flip a folder open/closed.
    pub fn toggle(&mut self, path: &str) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_owned());
        }
    }

    /// Whether the folder at `path` is open.
    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }
}

impl Serialize for FileTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            match entry {
                FileEntry::File => map.serialize_entry(name, &())?,
                FileEntry::Folder(sub) => map.serialize_entry(name, sub)?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FileTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TreeVisitor)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = FileTree;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of file and folder names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FileTree, A::Error> {
        let mut entries = Vec::new();
        while let Some((name, entry)) = access.next_entry::<String, FileEntry>()? {
            entries.push((name, entry));
        }
        Ok(FileTree { entries })
    }
}

impl<'de> Deserialize<'de> for FileEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = FileEntry;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a folder map or any file marker")
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<FileEntry, A::Error> {
        TreeVisitor.visit_map(access).map(FileEntry::Folder)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<FileEntry, A::Error> {
        while access.next_element::<IgnoredAny>()?.is_some() {}
        Ok(FileEntry::File)
    }

    fn visit_unit<E: de::Error>(self) -> Result<FileEntry, E> {
        Ok(FileEntry::File)
    }

    fn visit_none<E: de::Error>(self) -> Result<FileEntry, E> {
        Ok(FileEntry::File)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<FileEntry, E> {
        Ok(FileEntry::File)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<FileEntry, E> {
        Ok(FileEntry::File)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<FileEntry, E> {
        Ok(FileEntry::File)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<FileEntry, E> {
        Ok(FileEntry::File)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<FileEntry, E> {
        Ok(FileEntry::File)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn authored_order_is_preserved() {
        let tree: FileTree = serde_json::from_str(
            r#"{"src": {"main.tsx": "", "components": {"App.tsx": null}}, "package.json": ""}"#,
        )
        .unwrap();
        let names: Vec<&str> = tree.entries().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["src", "package.json"]);
        assert_eq!(tree.folder_paths(), ["src", "src/components"]);
    }

    #[test]
    fn view_starts_open_and_toggles() {
        let tree = FileTree::new().folder("src", FileTree::new().file("lib.rs"));
        let mut view = FileTreeView::new(&tree);
        assert!(view.is_expanded("src"));
        view.toggle("src");
        assert!(!view.is_expanded("src"));
        view.toggle("src");
        assert!(view.is_expanded("src"));
    }

    #[test]
    fn extensions() {
        assert_eq!(extension_of("App.TSX").as_deref(), Some("tsx"));
        assert_eq!(extension_of(".gitignore"), None);
        assert_eq!(extension_of("Makefile"), None);
    }
}
