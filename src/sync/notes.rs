use super::mirror::Mirror;
use super::notices::NoticeSender;
use crate::api::ApiClient;
use crate::models::{Block, NewNote, Note, NoteSummary, NoteUpdate};

/// Local mirror of a notebook's notes index. Only summaries are held
/// here; full documents are fetched when a note is opened.
pub struct NoteList {
    api: ApiClient,
    notebook_id: String,
    mirror: Mirror<NoteSummary>,
    notices: NoticeSender,
}

impl NoteList {
    pub fn new(
        api: ApiClient,
        notebook_id: String,
        seed: Vec<NoteSummary>,
        notices: NoticeSender,
    ) -> Self {
        Self {
            api,
            notebook_id,
            mirror: Mirror::new(seed),
            notices,
        }
    }

    pub fn notes(&self) -> &[NoteSummary] {
        self.mirror.items()
    }

    pub fn len(&self) -> usize {
        self.mirror.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.is_empty()
    }

    pub async fn create(&mut self, title: &str, blocks: Vec<Block>) -> Option<Note> {
        let payload = NewNote {
            notebook_id: self.notebook_id.clone(),
            title: title.to_string(),
            blocks,
        };
        match self.api.create_note(&payload).await {
            Ok(note) => {
                self.mirror.prepend(NoteSummary {
                    id: note.id.clone(),
                    title: note.title.clone(),
                });
                Some(note)
            }
            Err(e) => {
                tracing::error!("Failed to create note: {}", e);
                self.notices.error("Failed to create note");
                None
            }
        }
    }

    pub async fn open(&mut self, note_id: &str) -> Option<Note> {
        match self.api.get_note(note_id).await {
            Ok(note) => Some(note),
            Err(e) => {
                tracing::error!("Failed to load note {}: {}", note_id, e);
                self.notices.error("Failed to load note");
                None
            }
        }
    }

    /// Replace a note's title and document. The updated note surfaces
    /// at the front of the index, most recently touched first.
    pub async fn save(&mut self, note_id: &str, title: &str, blocks: Vec<Block>) -> Option<Note> {
        let payload = NoteUpdate {
            title: title.to_string(),
            blocks,
        };
        match self.api.update_note(note_id, &payload).await {
            Ok(note) => {
                self.mirror.promote(NoteSummary {
                    id: note.id.clone(),
                    title: note.title.clone(),
                });
                Some(note)
            }
            Err(e) => {
                tracing::error!("Failed to update note {}: {}", note_id, e);
                self.notices.error("Failed to update note");
                None
            }
        }
    }

    /// Title-only rename, leaving the document and index position
    /// untouched.
    pub async fn rename(&mut self, note_id: &str, title: &str) {
        match self.api.rename_note(note_id, title).await {
            Ok(()) => {
                self.mirror.patch(note_id, |n| n.title = title.to_string());
            }
            Err(e) => {
                tracing::error!("Failed to rename note {}: {}", note_id, e);
                self.notices.error("Failed to rename note");
            }
        }
    }

    pub async fn remove(&mut self, note_id: &str) {
        match self.api.delete_note(note_id).await {
            Ok(()) => {
                self.mirror.remove(note_id);
            }
            Err(e) => {
                tracing::error!("Failed to delete note {}: {}", note_id, e);
                self.notices.error("Failed to delete note");
            }
        }
    }
}
