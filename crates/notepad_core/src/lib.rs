//! Core note-taking logic for Notepad.
//! This crate owns the note collection and every rule applied to it;
//! presentation layers only render snapshots and forward intents.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use config::{default_seed_notes, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError};
pub use model::tag::{NoteTag, TagFilter};
pub use service::clock::{Clock, ManualClock, SystemClock};
pub use service::note_store::{MutationOutcome, NoteStore, NoteStoreError, PersistenceFailure};
pub use storage::blob_store::{BlobStore, FileBlobStore, MemoryBlobStore, StoreError, StoreResult};
pub use storage::note_codec::{
    BlobNotePersistence, LoadOutcome, NotePersistence, PersistenceError, DEFAULT_STORAGE_KEY,
};
pub use storage::sqlite_store::SqliteBlobStore;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
