use super::{expect_success, ApiClient};
use crate::error::Result;
use crate::models::{NewNote, Note, NoteSummary, NoteUpdate};

impl ApiClient {
    pub async fn list_notes(&self, notebook_id: &str) -> Result<Vec<NoteSummary>> {
        let response = self
            .client()
            .get(self.endpoint(&["notes", "getAll", notebook_id]))
            .send()
            .await?;
        let response = expect_success("list notes", response).await?;
        Ok(response.json().await?)
    }

    pub async fn get_note(&self, note_id: &str) -> Result<Note> {
        let response = self
            .client()
            .get(self.endpoint(&["notes", note_id]))
            .send()
            .await?;
        let response = expect_success("load note", response).await?;
        Ok(response.json().await?)
    }

    pub async fn create_note(&self, note: &NewNote) -> Result<Note> {
        let response = self
            .client()
            .post(self.endpoint(&["notes"]))
            .json(note)
            .send()
            .await?;
        let response = expect_success("create note", response).await?;
        Ok(response.json().await?)
    }

    pub async fn update_note(&self, note_id: &str, update: &NoteUpdate) -> Result<Note> {
        let response = self
            .client()
            .patch(self.endpoint(&["notes", note_id]))
            .json(update)
            .send()
            .await?;
        let response = expect_success("update note", response).await?;
        Ok(response.json().await?)
    }

    pub async fn rename_note(&self, note_id: &str, title: &str) -> Result<()> {
        let response = self
            .client()
            .patch(self.endpoint(&["notes", "update_title", note_id]))
            .query(&[("title", title)])
            .send()
            .await?;
        expect_success("rename note", response).await?;
        Ok(())
    }

    pub async fn delete_note(&self, note_id: &str) -> Result<()> {
        let response = self
            .client()
            .delete(self.endpoint(&["notes", "delete", note_id]))
            .send()
            .await?;
        expect_success("delete note", response).await?;
        Ok(())
    }
}
