//! Story element domain model.
//!
//! # Responsibility
//! - Define the canonical content unit shared by every outline view.
//! - Normalize and validate element names at construction time.
//!
//! # Invariants
//! - `uuid` is stable, non-nil, and never reused for another element.
//! - `name` is never blank and carries no leading/trailing whitespace.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable identifier for every story element.
///
/// Nodes in different views point at the same element through this id.
pub type ElementId = Uuid;

/// Closed set of element kinds an outline node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryItemType {
    /// Root of a regular view (Explorer or Narrator).
    Root,
    /// Root of the trash view.
    TrashCan,
    /// Grouping node in the Explorer view.
    Folder,
    /// Grouping node in the Narrator view.
    Section,
    Problem,
    Character,
    Setting,
    Scene,
    Notes,
}

impl StoryItemType {
    /// Stable string id used in log events and wire payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::TrashCan => "trash_can",
            Self::Folder => "folder",
            Self::Section => "section",
            Self::Problem => "problem",
            Self::Character => "character",
            Self::Setting => "setting",
            Self::Scene => "scene",
            Self::Notes => "notes",
        }
    }

    /// Whether narrator copies recurse into this kind when it is selected.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Folder | Self::Section)
    }

    /// Whether a node of this kind may be copied into the Narrator view.
    pub fn is_copyable_to_narrator(self) -> bool {
        matches!(self, Self::Scene)
    }
}

impl Display for StoryItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for element construction and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValidationError {
    /// The nil UUID cannot identify an element.
    NilUuid,
    /// Name is empty after whitespace normalization.
    BlankName,
}

impl Display for ElementValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "element uuid must not be nil"),
            Self::BlankName => write!(f, "element name must not be blank"),
        }
    }
}

impl Error for ElementValidationError {}

/// Canonical story content record.
///
/// Owned by the document registry; outline nodes only reference it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStoryElement")]
pub struct StoryElement {
    pub uuid: ElementId,
    /// Serialized as `type` to match the document schema naming.
    #[serde(rename = "type")]
    pub kind: StoryItemType,
    pub name: String,
}

impl StoryElement {
    /// Creates an element with a freshly generated id.
    ///
    /// # Errors
    /// - `BlankName` when `name` normalizes to an empty string.
    pub fn new(
        kind: StoryItemType,
        name: impl Into<String>,
    ) -> Result<Self, ElementValidationError> {
        Self::with_id(Uuid::new_v4(), kind, name)
    }

    /// Creates an element with a caller-provided id.
    ///
    /// Used when identity already exists, e.g. a document being reopened.
    pub fn with_id(
        uuid: ElementId,
        kind: StoryItemType,
        name: impl Into<String>,
    ) -> Result<Self, ElementValidationError> {
        if uuid.is_nil() {
            return Err(ElementValidationError::NilUuid);
        }
        Ok(Self {
            uuid,
            kind,
            name: normalize_name(name.into())?,
        })
    }

    /// Replaces the element name after normalization.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ElementValidationError> {
        self.name = normalize_name(name.into())?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawStoryElement {
    uuid: ElementId,
    #[serde(rename = "type")]
    kind: StoryItemType,
    name: String,
}

impl TryFrom<RawStoryElement> for StoryElement {
    type Error = ElementValidationError;

    fn try_from(value: RawStoryElement) -> Result<Self, Self::Error> {
        Self::with_id(value.uuid, value.kind, value.name)
    }
}

/// Trims a display name and collapses inner whitespace runs.
///
/// # Errors
/// - `BlankName` when nothing printable remains.
pub fn normalize_name(value: String) -> Result<String, ElementValidationError> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        return Err(ElementValidationError::BlankName);
    }
    Ok(collapsed.into_owned())
}
