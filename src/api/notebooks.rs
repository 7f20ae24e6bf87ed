use serde::Deserialize;

use super::{expect_success, ApiClient};
use crate::error::Result;
use crate::models::{NewNotebook, Notebook};

/// Returned when opening a notebook; the backend hands back the
/// conversation to resume.
#[derive(Debug, Clone, Deserialize)]
pub struct NotebookEntry {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedNotebook {
    #[serde(rename = "notebookId")]
    pub notebook_id: String,
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
}

impl ApiClient {
    pub async fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        let response = self.client().get(self.endpoint(&["notebooks"])).send().await?;
        let response = expect_success("list notebooks", response).await?;
        Ok(response.json().await?)
    }

    pub async fn open_notebook(&self, notebook_id: &str) -> Result<NotebookEntry> {
        let response = self
            .client()
            .get(self.endpoint(&["notebooks", notebook_id]))
            .send()
            .await?;
        let response = expect_success("open notebook", response).await?;
        Ok(response.json().await?)
    }

    pub async fn create_notebook(&self, notebook: &NewNotebook) -> Result<CreatedNotebook> {
        let response = self
            .client()
            .post(self.endpoint(&["notebooks", "create"]))
            .json(notebook)
            .send()
            .await?;
        let response = expect_success("create notebook", response).await?;
        Ok(response.json().await?)
    }

    pub async fn rename_notebook(&self, notebook_id: &str, title: &str) -> Result<()> {
        let response = self
            .client()
            .patch(self.endpoint(&["notebooks", "update_title", notebook_id]))
            .query(&[("title", title)])
            .send()
            .await?;
        expect_success("rename notebook", response).await?;
        Ok(())
    }

    /// The avatar id rides in the path so the backend can clean up the
    /// stored cover image; "noAvatar" skips that step.
    pub async fn delete_notebook(&self, notebook_id: &str, avatar_id: Option<&str>) -> Result<()> {
        let avatar = match avatar_id {
            Some(id) if !id.is_empty() => id,
            _ => "noAvatar",
        };
        let response = self
            .client()
            .delete(self.endpoint(&["notebooks", "delete", notebook_id, avatar]))
            .send()
            .await?;
        expect_success("delete notebook", response).await?;
        Ok(())
    }
}
