//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the note collection and its persistence collaborator.
//! - Keep presentation layers decoupled from storage details.

pub mod clock;
pub mod note_store;
