use super::mirror::Mirror;
use super::notices::NoticeSender;
use crate::api::ApiClient;
use crate::models::{Conversation, ConversationSummary};

/// Local mirror of a notebook's conversation history plus the id of
/// the conversation currently open in the chat pane.
pub struct ConversationList {
    api: ApiClient,
    notebook_id: String,
    mirror: Mirror<ConversationSummary>,
    selected_id: Option<String>,
    notices: NoticeSender,
}

impl ConversationList {
    pub fn new(
        api: ApiClient,
        notebook_id: String,
        seed: Vec<ConversationSummary>,
        selected_id: Option<String>,
        notices: NoticeSender,
    ) -> Self {
        Self {
            api,
            notebook_id,
            mirror: Mirror::new(seed),
            selected_id,
            notices,
        }
    }

    pub fn conversations(&self) -> &[ConversationSummary] {
        self.mirror.items()
    }

    pub fn is_empty(&self) -> bool {
        self.mirror.is_empty()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn select(&mut self, conversation_id: &str) {
        self.selected_id = Some(conversation_id.to_string());
    }

    /// Fetch the transcript of the current conversation.
    pub async fn load_selected(&self) -> Option<Conversation> {
        let id = self.selected_id.as_deref()?;
        match self.api.get_conversation(id).await {
            Ok(conversation) => Some(conversation),
            Err(e) => {
                tracing::error!("Failed to load conversation {}: {}", id, e);
                self.notices.error("Failed to load conversation");
                None
            }
        }
    }

    /// Start a fresh conversation and make it current. The backend
    /// assigns the id; the default title is applied client-side until
    /// the first rename.
    pub async fn create(&mut self) -> Option<String> {
        match self.api.create_conversation(&self.notebook_id).await {
            Ok(id) => {
                self.mirror.prepend(ConversationSummary {
                    id: id.clone(),
                    title: "New chat".to_string(),
                });
                self.selected_id = Some(id.clone());
                Some(id)
            }
            Err(e) => {
                tracing::error!("Failed to create conversation: {}", e);
                self.notices.error("Failed to create conversation");
                None
            }
        }
    }

    pub async fn rename(&mut self, conversation_id: &str, title: &str) {
        match self.api.rename_conversation(conversation_id, title).await {
            Ok(()) => {
                self.mirror
                    .patch(conversation_id, |c| c.title = title.to_string());
            }
            Err(e) => {
                tracing::error!("Failed to rename conversation {}: {}", conversation_id, e);
                self.notices.error("Failed to rename conversation");
            }
        }
    }

    /// Delete a conversation. When the current one goes away the
    /// selection moves to the next remaining conversation, or a fresh
    /// one is created so the chat pane is never left without a target.
    pub async fn remove(&mut self, conversation_id: &str) {
        match self.api.delete_conversation(conversation_id).await {
            Ok(()) => {
                self.mirror.remove(conversation_id);
                if self.selected_id.as_deref() == Some(conversation_id) {
                    self.selected_id =
                        self.mirror.items().first().map(|c| c.id.clone());
                    if self.selected_id.is_none() {
                        self.create().await;
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to delete conversation {}: {}", conversation_id, e);
                self.notices.error("Failed to delete conversation");
            }
        }
    }
}
