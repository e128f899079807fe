//! Note store use-case service.
//!
//! # Responsibility
//! - Own the authoritative in-memory note collection for one session.
//! - Apply create/update/delete and write the full snapshot after each one.
//! - Derive the filtered, sorted display list from transient view state.
//!
//! # Invariants
//! - Note ids are unique within the collection.
//! - `updated_at >= created_at`, and an update never moves `updated_at`
//!   backwards.
//! - A failed snapshot write does not roll back the in-memory mutation;
//!   the applied change is returned inside the error.
//! - View state (tag filter, search text) is never persisted.

use crate::config::{default_seed_notes, StoreConfig};
use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::model::tag::{NoteTag, TagFilter};
use crate::service::clock::{Clock, SystemClock};
use crate::storage::blob_store::BlobStore;
use crate::storage::note_codec::{
    BlobNotePersistence, LoadOutcome, NotePersistence, PersistenceError,
};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// In-memory change that was applied before a snapshot write failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Seeded(Vec<Note>),
    Created(Note),
    Updated(Note),
    Deleted(NoteId),
    /// Explicit [`NoteStore::persist`] retry; nothing changed in memory.
    Unchanged,
}

/// Mutation applied in memory whose durability is not guaranteed.
#[derive(Debug)]
pub struct PersistenceFailure {
    pub outcome: MutationOutcome,
    pub error: PersistenceError,
}

/// Service error for note store use-cases.
#[derive(Debug)]
pub enum NoteStoreError {
    /// Input rejected; nothing changed.
    Validation(NoteValidationError),
    /// Target note does not exist; nothing changed.
    NotFound(NoteId),
    /// Change applied in memory, snapshot write failed.
    Persistence(Box<PersistenceFailure>),
}

impl NoteStoreError {
    /// Returns the change that was applied despite the error, if any.
    pub fn applied(&self) -> Option<&MutationOutcome> {
        match self {
            Self::Persistence(failure) => Some(&failure.outcome),
            Self::Validation(_) | Self::NotFound(_) => None,
        }
    }
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Persistence(failure) => {
                write!(f, "change applied but not saved: {}", failure.error)
            }
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persistence(failure) => Some(&failure.error),
        }
    }
}

impl From<NoteValidationError> for NoteStoreError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Authoritative note collection plus display view state.
pub struct NoteStore<P: NotePersistence, C: Clock = SystemClock> {
    persistence: P,
    clock: C,
    seed_notes: Vec<NoteDraft>,
    notes: Vec<Note>,
    active_tag: TagFilter,
    search_text: String,
}

impl<P: NotePersistence> NoteStore<P, SystemClock> {
    /// Creates an empty store using the system clock and default seed notes.
    ///
    /// Call [`NoteStore::initialize`] before serving intents.
    pub fn new(persistence: P) -> Self {
        Self::with_clock(persistence, SystemClock, default_seed_notes())
    }
}

impl<S: BlobStore> NoteStore<BlobNotePersistence<S>, SystemClock> {
    /// Creates a store persisting to `store` under `config.storage_key`.
    pub fn from_config(store: S, config: StoreConfig) -> Self {
        let persistence = BlobNotePersistence::with_key(store, config.storage_key);
        Self::with_clock(persistence, SystemClock, config.seed_notes)
    }
}

impl<P: NotePersistence, C: Clock> NoteStore<P, C> {
    /// Creates an empty store with an explicit clock and seed set.
    ///
    /// An empty or fully invalid seed set falls back to the default seeds.
    pub fn with_clock(persistence: P, clock: C, seed_notes: Vec<NoteDraft>) -> Self {
        Self {
            persistence,
            clock,
            seed_notes,
            notes: Vec::new(),
            active_tag: TagFilter::All,
            search_text: String::new(),
        }
    }

    /// Loads the persisted collection, seeding it when nothing usable exists.
    ///
    /// Malformed or unreadable snapshots are recovered locally: they are
    /// replaced by the seed set, which is written back immediately.
    pub fn initialize(&mut self) -> Result<Vec<Note>, NoteStoreError> {
        let reason = match self.persistence.load() {
            LoadOutcome::Loaded(notes) if !notes.is_empty() => {
                self.notes = notes;
                info!(
                    "event=store_init module=service status=ok source=snapshot count={}",
                    self.notes.len()
                );
                return Ok(self.notes.clone());
            }
            LoadOutcome::Loaded(_) => "empty",
            LoadOutcome::Absent => "absent",
            LoadOutcome::Malformed(_) => "malformed",
            LoadOutcome::Unavailable(_) => "unavailable",
        };

        self.notes = self.build_seed_notes();
        info!(
            "event=store_init module=service status=ok source=seed reason={} count={}",
            reason,
            self.notes.len()
        );
        if reason == "malformed" || reason == "unavailable" {
            warn!("event=store_init module=service status=recovered reason={reason}");
        }

        self.persist_after(|notes| MutationOutcome::Seeded(notes.to_vec()))?;
        Ok(self.notes.clone())
    }

    /// Creates a note from trimmed input and persists the collection.
    pub fn create(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
        tag: NoteTag,
    ) -> Result<Note, NoteStoreError> {
        let draft = NoteDraft::new(title, content, tag)
            .normalize()
            .inspect_err(|err| {
                info!("event=note_create module=service status=rejected reason={err}");
            })?;

        let id = self.fresh_id();
        let note = Note::from_draft(id, draft, self.clock.now_ms());
        self.notes.push(note.clone());
        info!(
            "event=note_create module=service status=ok note_id={} tag={}",
            note.id,
            note.tag.label()
        );

        let created = note.clone();
        self.persist_after(move |_| MutationOutcome::Created(created))?;
        Ok(note)
    }

    /// Replaces title, content and tag of an existing note.
    ///
    /// `id` and `created_at` are preserved; `updated_at` is refreshed.
    pub fn update(
        &mut self,
        id: &NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        tag: NoteTag,
    ) -> Result<Note, NoteStoreError> {
        let Some(index) = self.position(id) else {
            info!("event=note_update module=service status=not_found note_id={id}");
            return Err(NoteStoreError::NotFound(id.clone()));
        };
        let draft = NoteDraft::new(title, content, tag)
            .normalize()
            .inspect_err(|err| {
                info!("event=note_update module=service status=rejected note_id={id} reason={err}");
            })?;

        let now_ms = self.clock.now_ms();
        let note = &mut self.notes[index];
        note.title = draft.title;
        note.content = draft.content;
        note.tag = draft.tag;
        note.updated_at = now_ms.max(note.updated_at);
        let updated = note.clone();
        info!(
            "event=note_update module=service status=ok note_id={} tag={}",
            updated.id,
            updated.tag.label()
        );

        let outcome = updated.clone();
        self.persist_after(move |_| MutationOutcome::Updated(outcome))?;
        Ok(updated)
    }

    /// Removes a note; returns whether one was removed.
    ///
    /// Deleting an unknown id is a no-op and does not touch storage.
    pub fn delete(&mut self, id: &NoteId) -> Result<bool, NoteStoreError> {
        let Some(index) = self.position(id) else {
            info!("event=note_delete module=service status=noop note_id={id}");
            return Ok(false);
        };

        self.notes.remove(index);
        info!("event=note_delete module=service status=ok note_id={id}");
        let deleted = id.clone();
        self.persist_after(move |_| MutationOutcome::Deleted(deleted))?;
        Ok(true)
    }

    /// Rewrites the current collection, e.g. after a failed write.
    pub fn persist(&mut self) -> Result<(), NoteStoreError> {
        self.persist_after(|_| MutationOutcome::Unchanged)
    }

    pub fn set_active_tag(&mut self, filter: impl Into<TagFilter>) {
        self.active_tag = filter.into();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn active_tag(&self) -> TagFilter {
        self.active_tag
    }

    pub fn search_text(&self) -> &str {
        self.search_text.as_str()
    }

    /// Tag preselected for a new note: the active tag, or the default tag
    /// when every tag is shown.
    pub fn suggested_tag(&self) -> NoteTag {
        match self.active_tag {
            TagFilter::Only(tag) => tag,
            TagFilter::All => NoteTag::default(),
        }
    }

    /// Current display list.
    ///
    /// Tag filter first, then case-insensitive search over title and
    /// content, then newest `updated_at` first. Ties keep insertion order.
    pub fn visible_notes(&self) -> Vec<Note> {
        let query = self.search_text.trim().to_lowercase();
        let mut visible = self
            .notes
            .iter()
            .filter(|note| self.active_tag.admits(note.tag))
            .filter(|note| query.is_empty() || note.matches_query(&query))
            .cloned()
            .collect::<Vec<_>>();
        visible.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
        visible
    }

    /// Number of notes filed under each tag, in [`NoteTag::ALL`] order.
    pub fn tag_counts(&self) -> Vec<(NoteTag, usize)> {
        NoteTag::ALL
            .iter()
            .map(|tag| {
                let count = self.notes.iter().filter(|note| note.tag == *tag).count();
                (*tag, count)
            })
            .collect()
    }

    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| &note.id == id)
    }

    /// Whole collection in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|note| &note.id == id)
    }

    fn fresh_id(&self) -> NoteId {
        loop {
            let candidate = NoteId::generate();
            if self.position(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn build_seed_notes(&self) -> Vec<Note> {
        let now_ms = self.clock.now_ms();
        let drafts = self
            .seed_notes
            .iter()
            .cloned()
            .filter_map(|draft| draft.normalize().ok())
            .collect::<Vec<_>>();
        let drafts = if drafts.is_empty() {
            default_seed_notes()
        } else {
            drafts
        };

        drafts
            .into_iter()
            .map(|draft| Note::from_draft(NoteId::generate(), draft, now_ms))
            .collect()
    }

    fn persist_after(
        &self,
        outcome: impl FnOnce(&[Note]) -> MutationOutcome,
    ) -> Result<(), NoteStoreError> {
        match self.persistence.save(&self.notes) {
            Ok(()) => {
                debug!(
                    "event=store_persist module=service status=ok count={}",
                    self.notes.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_persist module=service status=error count={} error={}",
                    self.notes.len(),
                    err
                );
                Err(NoteStoreError::Persistence(Box::new(PersistenceFailure {
                    outcome: outcome(&self.notes),
                    error: err,
                })))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MutationOutcome, NoteStore, NoteStoreError};
    use crate::config::default_seed_notes;
    use crate::model::note::NoteValidationError;
    use crate::model::tag::{NoteTag, TagFilter};
    use crate::service::clock::ManualClock;
    use crate::storage::blob_store::MemoryBlobStore;
    use crate::storage::note_codec::BlobNotePersistence;

    fn store_at(
        clock: &ManualClock,
    ) -> NoteStore<BlobNotePersistence<MemoryBlobStore>, &ManualClock> {
        let persistence = BlobNotePersistence::new(MemoryBlobStore::new());
        NoteStore::with_clock(persistence, clock, default_seed_notes())
    }

    #[test]
    fn update_never_moves_updated_at_backwards() {
        let clock = ManualClock::new(5_000);
        let mut store = store_at(&clock);
        let note = store.create("t", "c", NoteTag::Work).unwrap();

        clock.set(1_000);
        let updated = store.update(&note.id, "t2", "c2", NoteTag::Work).unwrap();
        assert_eq!(updated.updated_at, 5_000);
        assert_eq!(updated.created_at, 5_000);
    }

    #[test]
    fn update_checks_existence_before_validation() {
        let clock = ManualClock::new(1);
        let mut store = store_at(&clock);
        let err = store
            .update(&"missing".into(), "", "", NoteTag::Ideas)
            .unwrap_err();
        assert!(matches!(err, NoteStoreError::NotFound(_)));
        assert!(err.applied().is_none());
    }

    #[test]
    fn create_rejects_blank_content_without_side_effects() {
        let clock = ManualClock::new(1);
        let mut store = store_at(&clock);
        let err = store.create("title", "   ", NoteTag::Ideas).unwrap_err();
        assert!(matches!(
            err,
            NoteStoreError::Validation(NoteValidationError::EmptyContent)
        ));
        assert!(store.notes().is_empty());
        assert_eq!(store.persistence().store().used_bytes(), 0);
    }

    #[test]
    fn suggested_tag_follows_active_filter() {
        let clock = ManualClock::new(1);
        let mut store = store_at(&clock);
        assert_eq!(store.suggested_tag(), NoteTag::Ideas);
        store.set_active_tag(NoteTag::ShoppingList);
        assert_eq!(store.suggested_tag(), NoteTag::ShoppingList);
        store.set_active_tag(TagFilter::All);
        assert_eq!(store.suggested_tag(), NoteTag::Ideas);
    }

    #[test]
    fn empty_seed_set_falls_back_to_default_seeds() {
        let clock = ManualClock::new(1);
        let persistence = BlobNotePersistence::new(MemoryBlobStore::new());
        let mut store = NoteStore::with_clock(persistence, &clock, Vec::new());
        let notes = store.initialize().unwrap();
        assert_eq!(notes.len(), default_seed_notes().len());
    }

    #[test]
    fn persist_retry_reports_unchanged_outcome() {
        let clock = ManualClock::new(1);
        let persistence = BlobNotePersistence::new(MemoryBlobStore::with_quota(4));
        let mut store = NoteStore::with_clock(persistence, &clock, default_seed_notes());
        let err = store.persist().unwrap_err();
        assert_eq!(err.applied(), Some(&MutationOutcome::Unchanged));
    }
}
