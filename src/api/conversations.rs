use serde::{Deserialize, Serialize};

use super::{expect_success, ApiClient};
use crate::error::Result;
use crate::models::{Conversation, ConversationSummary, MessageItem};

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    message_item: &'a MessageItem,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_filters: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
struct CreateConversationResponse {
    #[serde(rename = "conversationId")]
    conversation_id: String,
}

/// Answer to a chat query, with the retrieval intent and mode the
/// backend chose for it.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryOutcome {
    #[serde(rename = "response_message")]
    pub message: MessageItem,
    #[serde(default)]
    pub intent: String,
    #[serde(default)]
    pub mode: String,
}

impl ApiClient {
    pub async fn list_conversations(
        &self,
        notebook_id: &str,
    ) -> Result<Vec<ConversationSummary>> {
        let response = self
            .client()
            .get(self.endpoint(&["conversations", "getAll", notebook_id]))
            .send()
            .await?;
        let response = expect_success("list conversations", response).await?;
        Ok(response.json().await?)
    }

    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        let response = self
            .client()
            .get(self.endpoint(&["conversations", conversation_id]))
            .send()
            .await?;
        let response = expect_success("load conversation", response).await?;
        Ok(response.json().await?)
    }

    pub async fn create_conversation(&self, notebook_id: &str) -> Result<String> {
        let response = self
            .client()
            .post(self.endpoint(&["conversations", "create", notebook_id]))
            .send()
            .await?;
        let response = expect_success("create conversation", response).await?;
        let body: CreateConversationResponse = response.json().await?;
        Ok(body.conversation_id)
    }

    /// Ask a question in a conversation. `file_filters` narrows
    /// retrieval to the given source ids; `None` leaves the corpus
    /// unrestricted.
    pub async fn query_conversation(
        &self,
        conversation_id: &str,
        message: &MessageItem,
        query: &str,
        file_filters: Option<&[String]>,
    ) -> Result<QueryOutcome> {
        let request = QueryRequest {
            message_item: message,
            query,
            file_filters,
        };
        let response = self
            .client()
            .post(self.endpoint(&["conversations", "query", conversation_id]))
            .json(&request)
            .send()
            .await?;
        let response = expect_success("query conversation", response).await?;
        Ok(response.json().await?)
    }

    pub async fn rename_conversation(&self, conversation_id: &str, title: &str) -> Result<()> {
        let response = self
            .client()
            .patch(self.endpoint(&["conversations", "update_title", conversation_id]))
            .query(&[("title", title)])
            .send()
            .await?;
        expect_success("rename conversation", response).await?;
        Ok(())
    }

    pub async fn delete_conversation(&self, conversation_id: &str) -> Result<()> {
        let response = self
            .client()
            .delete(self.endpoint(&["conversations", "delete", conversation_id]))
            .send()
            .await?;
        expect_success("delete conversation", response).await?;
        Ok(())
    }
}
