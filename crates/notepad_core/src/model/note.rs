//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its persisted field names.
//! - Normalize and validate user input before it reaches the store.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `title` and `content` are non-empty after trimming.
//! - `updated_at >= created_at`.

use crate::model::tag::NoteTag;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque note identifier.
///
/// Fresh ids are random v4 UUIDs. Ids loaded from storage are kept verbatim,
/// so snapshots written by older clients with non-UUID ids stay addressable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Allocates a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation failure for note input or persisted note state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    EmptyContent,
    EmptyId,
    UpdatedBeforeCreated { created_at: i64, updated_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "note title cannot be empty"),
            Self::EmptyContent => write!(f, "note content cannot be empty"),
            Self::EmptyId => write!(f, "note id cannot be empty"),
            Self::UpdatedBeforeCreated {
                created_at,
                updated_at,
            } => write!(
                f,
                "note updatedAt ({updated_at}) is earlier than createdAt ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Unvalidated create/update input coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tag: NoteTag) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag,
        }
    }

    /// Trims title and content, rejecting values that end up empty.
    ///
    /// Inner line breaks of `content` are preserved verbatim.
    pub fn normalize(self) -> Result<Self, NoteValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        let content = self.content.trim();
        if content.is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }

        Ok(Self {
            title: title.to_string(),
            content: content.to_string(),
            tag: self.tag,
        })
    }
}

/// Stored note record.
///
/// Field names follow the persisted snapshot format (`createdAt`,
/// `updatedAt`); timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tag: NoteTag,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    /// Builds a new note from already normalized input.
    pub(crate) fn from_draft(id: NoteId, draft: NoteDraft, now_ms: i64) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            tag: draft.tag,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Checks stored-note invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.as_str().is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(NoteValidationError::EmptyContent);
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::UpdatedBeforeCreated {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Case-insensitive substring match against title or content.
    ///
    /// `lowercase_query` must already be trimmed and lowercased.
    pub fn matches_query(&self, lowercase_query: &str) -> bool {
        self.title.to_lowercase().contains(lowercase_query)
            || self.content.to_lowercase().contains(lowercase_query)
    }
}
