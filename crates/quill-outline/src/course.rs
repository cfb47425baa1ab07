// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Authored course documents (JSON block trees).

use crate::block::BlockSpec;
use crate::tree::BlockTree;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a course document.
#[derive(Debug, Error)]
pub enum CourseError {
    /// Reading the file failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not a valid course.
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A course: an optional title and its top-level blocks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Course {
    /// Course title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Top-level blocks in display order.
    pub blocks: Vec<BlockSpec>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCourse {
    Blocks(Vec<BlockSpec>),
    Full(Course),
}

impl Course {
    /// Parses either a bare block array or `{title?, blocks}`.
    pub fn from_json(text: &str) -> Result<Self, CourseError> {
        let raw: RawCourse = serde_json::from_str(text)?;
        Ok(match raw {
            RawCourse::Blocks(blocks) => Self {
                title: None,
                blocks,
            },
            RawCourse::Full(course) => course,
        })
    }

    /// Reads and parses a course file.
    pub fn load(path: &Path) -> Result<Self, CourseError> {
        let text = std::fs::read_to_string(path)?;
        let course = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), roots = course.blocks.len(), "loaded course");
        Ok(course)
    }

    /// Mounts every block into a fresh tree.
    pub fn mount(&self) -> BlockTree {
        BlockTree::from_specs(&self.blocks)
    }
}
