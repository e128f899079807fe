//! Persistence collaborators for the note store.
//!
//! # Responsibility
//! - Define the string-keyed blob store contract and its backends.
//! - Encode the note collection as a single snapshot under one key.
//!
//! # Invariants
//! - Backends return semantic errors (`QuotaExceeded`, `InvalidKey`) in
//!   addition to transport errors.
//! - Snapshot decoding never fails loudly; corrupt data is reported as such.

pub mod blob_store;
pub mod note_codec;
pub mod sqlite_store;
