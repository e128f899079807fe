//! Note store configuration.
//!
//! # Responsibility
//! - Name the storage key of the snapshot.
//! - Carry the seed notes written when no usable snapshot exists.

use crate::model::note::NoteDraft;
use crate::model::tag::NoteTag;
use crate::storage::note_codec::DEFAULT_STORAGE_KEY;

/// Construction-time settings for a `NoteStore` session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Blob store key holding the whole collection.
    pub storage_key: String,
    /// Notes created on first run or after a corrupt snapshot was dropped.
    ///
    /// Must contain at least one valid draft.
    pub seed_notes: Vec<NoteDraft>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed_notes: default_seed_notes(),
        }
    }
}

/// Welcome content shown on first launch.
pub fn default_seed_notes() -> Vec<NoteDraft> {
    vec![
        NoteDraft::new(
            "Welcome!",
            "This is your first note. Open it to edit, or create a new one.",
            NoteTag::Personal,
        ),
        NoteDraft::new(
            "Project idea",
            "Build a notepad with tag filters and quick search.",
            NoteTag::Ideas,
        ),
    ]
}
