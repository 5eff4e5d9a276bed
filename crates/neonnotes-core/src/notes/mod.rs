//! In-memory note collection kept in step with the backend.
//!
//! The collection only changes after the backend confirms an operation; any
//! failure leaves it exactly as it was. Nothing is retried.

use tokio::sync::watch;

use crate::error::Result;
use crate::gateway::SubmitTarget;
use crate::models::{Note, NoteDraft, NoteId};
use crate::search::filter_notes;

/// Remote note operations the collection depends on.
#[allow(async_fn_in_trait)]
pub trait NotesBackend {
    /// All notes visible to the token, newest first.
    async fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>>;

    async fn submit_note(
        &self,
        token: Option<&str>,
        target: SubmitTarget,
        draft: &NoteDraft,
    ) -> Result<Note>;

    async fn delete_note(&self, token: Option<&str>, id: NoteId) -> Result<()>;
}

/// Ordered, newest-first list of notes mirrored from the backend.
pub struct NoteCollection<B: NotesBackend> {
    backend: B,
    notes: Vec<Note>,
    revision: watch::Sender<u64>,
}

impl<B: NotesBackend> NoteCollection<B> {
    pub fn new(backend: B) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            backend,
            notes: Vec::new(),
            revision,
        }
    }

    /// Replace the whole collection with the backend's current list.
    pub async fn load_all(&mut self, token: Option<&str>) -> Result<&[Note]> {
        let notes = self.backend.list_notes(token).await?;
        tracing::debug!("Loaded {} notes", notes.len());
        self.notes = notes;
        self.bump();
        Ok(&self.notes)
    }

    /// Submit a new note and prepend the server's copy once it is confirmed.
    pub async fn create(&mut self, token: Option<&str>, draft: &NoteDraft) -> Result<&Note> {
        draft.validate()?;
        let note = self
            .backend
            .submit_note(token, SubmitTarget::Create, draft)
            .await?;
        tracing::info!("Created note {}", note.id);
        self.notes.insert(0, note);
        self.bump();
        Ok(&self.notes[0])
    }

    /// Fully replace a note and update the matching entry in place.
    ///
    /// Returns the server's copy. When the note is not in the local
    /// collection the collection is left untouched.
    pub async fn update(
        &mut self,
        token: Option<&str>,
        id: NoteId,
        draft: &NoteDraft,
    ) -> Result<Note> {
        draft.validate()?;
        let updated = self
            .backend
            .submit_note(token, SubmitTarget::Update(id), draft)
            .await?;
        tracing::info!("Updated note {}", id);

        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(existing) => {
                existing.apply_update(updated);
                let merged = existing.clone();
                self.bump();
                Ok(merged)
            }
            None => {
                tracing::warn!("Updated note {} is not in the loaded collection", id);
                Ok(updated)
            }
        }
    }

    /// Delete a note remotely, then drop the matching local entry.
    pub async fn delete(&mut self, token: Option<&str>, id: NoteId) -> Result<()> {
        self.backend.delete_note(token, id).await?;
        tracing::info!("Deleted note {}", id);
        if let Some(index) = self.notes.iter().position(|note| note.id == id) {
            self.notes.remove(index);
            self.bump();
        }
        Ok(())
    }

    /// Notes whose title or content contains `query`, ignoring case.
    pub fn filtered(&self, query: &str) -> Vec<&Note> {
        filter_notes(&self.notes, query)
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Receiver whose value increments after every change to the collection.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
