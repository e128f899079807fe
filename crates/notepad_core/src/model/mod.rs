//! Note domain model.
//!
//! # Responsibility
//! - Define the note record, its identifier and the tag vocabulary.
//! - Keep input normalization next to the types it protects.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard removal; there is no tombstone state.

pub mod note;
pub mod tag;
