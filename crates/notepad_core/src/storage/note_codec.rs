//! Note snapshot persistence over a blob store.
//!
//! # Responsibility
//! - Define the persistence contract the note store depends on.
//! - Encode the whole note collection as one JSON array under a fixed key.
//!
//! # Invariants
//! - Every field round-trips exactly; timestamps stay JSON numbers.
//! - Malformed snapshots are reported as `LoadOutcome::Malformed`, never as
//!   errors.

use crate::model::note::{Note, NoteId};
use crate::storage::blob_store::{BlobStore, StoreError};
use log::warn;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key used by the original browser widget.
pub const DEFAULT_STORAGE_KEY: &str = "notes_app_v1";

/// Snapshot write failure.
#[derive(Debug)]
pub enum PersistenceError {
    Encode(serde_json::Error),
    Store(StoreError),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode note snapshot: {err}"),
            Self::Store(err) => write!(f, "failed to write note snapshot: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for PersistenceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Result of reading the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot decoded and every record passed validation.
    Loaded(Vec<Note>),
    /// Nothing was ever written under the key.
    Absent,
    /// Snapshot exists but cannot be trusted.
    Malformed(String),
    /// Backend read failed.
    Unavailable(String),
}

/// Persistence collaborator for the note store.
pub trait NotePersistence {
    /// Reads the whole persisted collection.
    fn load(&self) -> LoadOutcome;
    /// Replaces the whole persisted collection.
    fn save(&self, notes: &[Note]) -> Result<(), PersistenceError>;
}

/// JSON snapshot persistence bound to one key of a [`BlobStore`].
pub struct BlobNotePersistence<S: BlobStore> {
    store: S,
    key: String,
}

impl<S: BlobStore> BlobNotePersistence<S> {
    /// Uses [`DEFAULT_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: BlobStore> NotePersistence for BlobNotePersistence<S> {
    fn load(&self) -> LoadOutcome {
        match self.store.load(&self.key) {
            Ok(Some(raw)) => decode_snapshot(&raw),
            Ok(None) => LoadOutcome::Absent,
            Err(err) => {
                warn!(
                    "event=snapshot_load module=storage status=error error_code=store_read_failed error={err}"
                );
                LoadOutcome::Unavailable(err.to_string())
            }
        }
    }

    fn save(&self, notes: &[Note]) -> Result<(), PersistenceError> {
        let raw = encode_snapshot(notes)?;
        self.store.save(&self.key, &raw)?;
        Ok(())
    }
}

/// Serializes notes as a JSON array of raw records.
pub fn encode_snapshot(notes: &[Note]) -> Result<String, serde_json::Error> {
    serde_json::to_string(notes)
}

/// Decodes a raw snapshot, validating every record.
///
/// A JSON `null` is treated as absent, matching what the browser widget
/// stored before its first write.
pub fn decode_snapshot(raw: &str) -> LoadOutcome {
    if raw.trim().is_empty() {
        return LoadOutcome::Absent;
    }

    let parsed: Option<Vec<Note>> = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(err) => return LoadOutcome::Malformed(format!("invalid JSON snapshot: {err}")),
    };
    let Some(notes) = parsed else {
        return LoadOutcome::Absent;
    };

    let mut seen: HashSet<&NoteId> = HashSet::with_capacity(notes.len());
    for note in &notes {
        if let Err(err) = note.validate() {
            return LoadOutcome::Malformed(format!("invalid note `{}`: {err}", note.id));
        }
        if !seen.insert(&note.id) {
            return LoadOutcome::Malformed(format!("duplicate note id `{}`", note.id));
        }
    }

    LoadOutcome::Loaded(notes)
}
