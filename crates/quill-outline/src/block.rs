// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Content block model: identifiers, kinds with their payloads, authored specs.

use crate::file_tree::FileTree;
use crate::glossary::Glossary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a mounted block.
///
/// Generated at mount time; unique among blocks mounted in the same tree and
/// stable until the block is unmounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub(crate) u64);

impl BlockId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Parses the display form (`:b12:`).
    pub fn parse(s: &str) -> Option<Self> {
        s.strip_prefix(":b")?
            .strip_suffix(':')?
            .parse()
            .ok()
            .map(Self)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":b{}:", self.0)
    }
}

/// Colour tokens understood by the theme layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    /// Neutral grey.
    Gray,
    /// Red.
    Red,
    /// Yellow.
    Yellow,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Purple.
    Purple,
    /// Cyan.
    Cyan,
    /// Theme primary colour.
    Primary,
}

impl ColorToken {
    /// Lowercase token name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Cyan => "cyan",
            Self::Primary => "primary",
        }
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone of a note block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteTone {
    /// Key reading.
    Primary,
    /// Aside.
    Secondary,
    /// Informational.
    Info,
    /// Caution.
    Warning,
    /// Must-read.
    Critical,
}

/// Difficulty of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Entry level.
    Beginner,
    /// Some experience assumed.
    Intermediate,
    /// Hard.
    Advanced,
}

/// Whether a challenge is a short exercise or a larger project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChallengeKind {
    /// Short exercise.
    #[default]
    Exercise,
    /// Multi-step project.
    Project,
}

/// Kind of embedded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    /// Video player.
    Video,
    /// Audio player.
    Audio,
    /// Still image.
    Image,
    /// Animated image.
    #[serde(rename = "GIF")]
    Gif,
}

/// Block kind with its type-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum BlockKind {
    /// Plain chapter-style container.
    Classic,
    /// Container with an optional accent colour.
    Generic {
        /// Accent colour.
        #[serde(default)]
        color: Option<ColorToken>,
    },
    /// Callout note.
    Note {
        /// Tone of the note.
        note_type: NoteTone,
        /// Optional body text.
        #[serde(default)]
        content: Option<String>,
    },
    /// Folder/file tree illustration.
    FileStructureView {
        /// The tree to display.
        #[serde(rename = "filestructure")]
        structure: FileTree,
    },
    /// Exercise or project.
    Challenge {
        /// Difficulty badge.
        difficulty: Difficulty,
        /// Exercise vs project.
        #[serde(default)]
        challenge_type: ChallengeKind,
        /// Tech-stack badges.
        #[serde(default)]
        tech: Vec<String>,
        /// Free-form time estimate (e.g. "2h").
        #[serde(default)]
        estimated_time: Option<String>,
    },
    /// Source code sample.
    Code {
        /// Source text.
        code: String,
        /// File extension used to pick a highlighter.
        extension: String,
    },
    /// Markdown body.
    Markdown {
        /// Markdown source.
        content: String,
    },
    /// Embedded media player.
    Media {
        /// Source URL.
        url: String,
        /// Media type.
        media_type: MediaType,
        /// Chapter list in `[H:]MM:SS - label` lines.
        #[serde(default)]
        timestamps: Option<String>,
    },
    /// Searchable glossary.
    Glossary {
        /// Term definitions.
        dictionary: Glossary,
    },
}

/// Fieldless discriminant of [`BlockKind`]; the block's type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockTag {
    /// See [`BlockKind::Classic`].
    Classic,
    /// See [`BlockKind::Generic`].
    Generic,
    /// See [`BlockKind::Note`].
    Note,
    /// See [`BlockKind::FileStructureView`].
    FileStructureView,
    /// See [`BlockKind::Challenge`].
    Challenge,
    /// See [`BlockKind::Code`].
    Code,
    /// See [`BlockKind::Markdown`].
    Markdown,
    /// See [`BlockKind::Media`].
    Media,
    /// See [`BlockKind::Glossary`].
    Glossary,
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Classic => "Classic",
            Self::Generic => "Generic",
            Self::Note => "Note",
            Self::FileStructureView => "FileStructureView",
            Self::Challenge => "Challenge",
            Self::Code => "Code",
            Self::Markdown => "Markdown",
            Self::Media => "Media",
            Self::Glossary => "Glossary",
        };
        f.write_str(s)
    }
}

/// Icon name and colour token advertised for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    /// Icon name (Lucide naming).
    pub icon: &'static str,
    /// Icon colour.
    pub color: ColorToken,
}

impl BlockKind {
    /// Type tag for this kind.
    pub fn tag(&self) -> BlockTag {
        match self {
            Self::Classic => BlockTag::Classic,
            Self::Generic { .. } => BlockTag::Generic,
            Self::Note { .. } => BlockTag::Note,
            Self::FileStructureView { .. } => BlockTag::FileStructureView,
            Self::Challenge { .. } => BlockTag::Challenge,
            Self::Code { .. } => BlockTag::Code,
            Self::Markdown { .. } => BlockTag::Markdown,
            Self::Media { .. } => BlockTag::Media,
            Self::Glossary { .. } => BlockTag::Glossary,
        }
    }

    /// Icon and colour metadata the renderer attaches to the block.
    pub fn appearance(&self) -> Appearance {
        let (icon, color) = match self {
            Self::Classic => ("Layout", ColorToken::Gray),
            Self::Generic { color } => ("Box", color.unwrap_or(ColorToken::Gray)),
            Self::Note { note_type, .. } => match note_type {
                NoteTone::Primary => ("Book", ColorToken::Blue),
                NoteTone::Secondary => ("FileText", ColorToken::Gray),
                NoteTone::Info => ("AlertCircle", ColorToken::Cyan),
                NoteTone::Warning => ("AlertTriangle", ColorToken::Yellow),
                NoteTone::Critical => ("AlertOctagon", ColorToken::Red),
            },
            Self::FileStructureView { .. } => ("FolderTree", ColorToken::Green),
            Self::Challenge { challenge_type, .. } => match challenge_type {
                ChallengeKind::Exercise => ("Target", ColorToken::Blue),
                ChallengeKind::Project => ("Rocket", ColorToken::Purple),
            },
            Self::Code { .. } => ("Code", ColorToken::Cyan),
            Self::Markdown { .. } => ("FileText", ColorToken::Gray),
            Self::Media { media_type, .. } => match media_type {
                MediaType::Video => ("Film", ColorToken::Purple),
                MediaType::Audio => ("Music", ColorToken::Blue),
                MediaType::Image => ("Image", ColorToken::Green),
                MediaType::Gif => ("Play", ColorToken::Yellow),
            },
            Self::Glossary { .. } => ("BookOpen", ColorToken::Gray),
        };
        Appearance { icon, color }
    }
}

fn default_true() -> bool {
    true
}

/// Authored description of a block and its children, before mounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSpec {
    /// Heading text.
    pub title: String,
    /// Optional line under the heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Whether the block appears in the table of contents.
    #[serde(rename = "showOnTOC", default = "default_true")]
    pub show_on_toc: bool,
    /// Whether the block shows the challenge/project summary badge.
    #[serde(default)]
    pub features: bool,
    /// Author-chosen anchor, used for quick-jump links and `parentId` references.
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// Explicit parent reference (an anchor or a block id) overriding nesting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Kind and payload.
    #[serde(flatten)]
    pub kind: BlockKind,
    /// Nested blocks in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BlockSpec>,
}

impl BlockSpec {
    /// A spec with the given title and kind, visible in the TOC, no children.
    pub fn new(title: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            show_on_toc: true,
            features: false,
            anchor: None,
            parent_id: None,
            kind,
            children: Vec::new(),
        }
    }

    /// Shorthand for a `Classic` container.
    pub fn classic(title: impl Into<String>) -> Self {
        Self::new(title, BlockKind::Classic)
    }

    /// Shorthand for a challenge of the given kind.
    pub fn challenge(title: impl Into<String>, kind: ChallengeKind) -> Self {
        Self::new(
            title,
            BlockKind::Challenge {
                difficulty: Difficulty::Beginner,
                challenge_type: kind,
                tech: Vec::new(),
                estimated_time: None,
            },
        )
    }

    /// Appends a child (builder style).
    #[must_use]
    pub fn child(mut self, child: BlockSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the anchor (builder style).
    #[must_use]
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Hides the block from the TOC (builder style).
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.show_on_toc = false;
        self
    }

    /// Enables the feature summary badge (builder style).
    #[must_use]
    pub fn with_features(mut self) -> Self {
        self.features = true;
        self
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn block_id_display_round_trips() {
        let id = BlockId(42);
        assert_eq!(id.to_string(), ":b42:");
        assert_eq!(BlockId::parse(":b42:"), Some(id));
        assert_eq!(BlockId::parse("b42"), None);
    }

    #[test]
    fn authored_challenge_json_parses() {
        let json = r#"{
            "title": "Build a counter",
            "type": "Challenge",
            "difficulty": "Intermediate",
            "challengeType": "Project",
            "tech": ["React"],
            "estimatedTime": "2h",
            "id": "counter"
        }"#;
        let spec: BlockSpec = serde_json::from_str(json).unwrap();
        assert!(spec.show_on_toc);
        assert_eq!(spec.anchor.as_deref(), Some("counter"));
        match &spec.kind {
            BlockKind::Challenge {
                challenge_type,
                estimated_time,
                ..
            } => {
                assert_eq!(*challenge_type, ChallengeKind::Project);
                assert_eq!(estimated_time.as_deref(), Some("2h"));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn hidden_flag_and_nested_children_parse() {
        let json = r#"{
            "title": "Hooks",
            "type": "Generic",
            "color": "purple",
            "showOnTOC": false,
            "children": [{"title": "useState", "type": "Note", "noteType": "info"}]
        }"#;
        let spec: BlockSpec = serde_json::from_str(json).unwrap();
        assert!(!spec.show_on_toc);
        assert_eq!(spec.children.len(), 1);
        assert_eq!(spec.kind.appearance().color, ColorToken::Purple);
        assert_eq!(spec.children[0].kind.appearance().icon, "AlertCircle");
    }

    #[test]
    fn appearance_follows_variant_payload() {
        let project = BlockSpec::challenge("p", ChallengeKind::Project);
        assert_eq!(
            project.kind.appearance(),
            Appearance {
                icon: "Rocket",
                color: ColorToken::Purple
            }
        );
        let gif = BlockKind::Media {
            url: "x.gif".into(),
            media_type: MediaType::Gif,
            timestamps: None,
        };
        assert_eq!(gif.appearance().icon, "Play");
        assert_eq!(gif.tag().to_string(), "Media");
    }
}
