use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// List entry returned by the conversations index endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "New chat".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Conversation {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<MessageItem>,
}

/// One chat turn. Ids are client-assigned; the backend stores turns
/// verbatim and echoes them back on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageItem {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl MessageItem {
    pub fn user(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            parts: vec![MessagePart {
                kind: "text".to_string(),
                text: text.to_string(),
            }],
        }
    }

    /// Concatenated text of all text parts, for rendering.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| p.kind == "text")
            .map(|p| p.text.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_carries_a_single_text_part() {
        let message = MessageItem::user("what is entropy?");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.text(), "what is entropy?");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["parts"][0]["type"], "text");
    }

    #[test]
    fn conversation_parses_with_missing_title() {
        let json = r#"{"messages": [
            {"id": "m1", "role": "assistant", "parts": [{"type": "text", "text": "hi"}]}
        ]}"#;
        let conversation: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conversation.title, "New chat");
        assert_eq!(conversation.messages[0].text(), "hi");
    }

    #[test]
    fn non_text_parts_are_skipped_when_rendering() {
        let json = r#"{"id": "m2", "role": "assistant", "parts": [
            {"type": "reasoning", "text": "thinking"},
            {"type": "text", "text": "answer"}
        ]}"#;
        let message: MessageItem = serde_json::from_str(json).unwrap();
        assert_eq!(message.text(), "answer");
    }
}
