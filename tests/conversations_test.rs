//! Integration tests for conversation history and chat queries.

use notebook_desk::api::ApiClient;
use notebook_desk::config::Config;
use notebook_desk::models::{ConversationSummary, MessageItem, Role};
use notebook_desk::sync::{notices, ConversationList};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let config = Config {
        api_base_url: server.uri(),
        ..Config::default()
    };
    ApiClient::new(&config).expect("Failed to create API client")
}

fn summary(id: &str, title: &str) -> ConversationSummary {
    ConversationSummary {
        id: id.to_string(),
        title: title.to_string(),
    }
}

/// Passes only when the request body is JSON without a `file_filters`
/// key at the top level.
struct HasNoFileFilters;

impl wiremock::Match for HasNoFileFilters {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<serde_json::Value>(&request.body)
            .map(|body| body.get("file_filters").is_none())
            .unwrap_or(false)
    }
}

#[tokio::test]
async fn queries_carry_the_message_text_and_checked_file_ids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/conversations/query/c-1"))
        .and(body_partial_json(serde_json::json!({
            "query": "what is entropy?",
            "file_filters": ["f-1", "f-3"],
            "message_item": {"role": "user"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response_message": {
                "id": "m-2",
                "role": "assistant",
                "parts": [{"type": "text", "text": "A measure of disorder."}]
            },
            "intent": "qa",
            "mode": "scoped"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = client_for(&mock_server);
    let message = MessageItem::user("what is entropy?");
    let filters = vec!["f-1".to_string(), "f-3".to_string()];

    let outcome = api
        .query_conversation("c-1", &message, "what is entropy?", Some(&filters))
        .await
        .unwrap();

    assert_eq!(outcome.message.role, Role::Assistant);
    assert_eq!(outcome.message.text(), "A measure of disorder.");
    assert_eq!(outcome.intent, "qa");
    assert_eq!(outcome.mode, "scoped");
}

#[tokio::test]
async fn queries_without_checked_files_omit_the_filter_key() {
    let mock_server = MockServer::start().await;

    // An unrestricted query must drop the key entirely, not send null
    // or an empty list
    Mock::given(method("POST"))
        .and(path("/conversations/query/c-1"))
        .and(HasNoFileFilters)
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response_message": {
                "id": "m-2",
                "role": "assistant",
                "parts": [{"type": "text", "text": "Everything considered."}]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = client_for(&mock_server);
    let message = MessageItem::user("summarize the notebook");

    let outcome = api
        .query_conversation("c-1", &message, "summarize the notebook", None)
        .await
        .unwrap();

    assert_eq!(outcome.message.text(), "Everything considered.");
    // intent and mode are optional in the response
    assert_eq!(outcome.intent, "");
}

#[tokio::test]
async fn creating_a_conversation_prepends_and_selects_it() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/conversations/create/nb-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"conversationId": "c-9"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tx, mut rx) = notices::channel();
    let mut conversations = ConversationList::new(
        client_for(&mock_server),
        "nb-1".to_string(),
        vec![summary("c-1", "Older chat")],
        Some("c-1".to_string()),
        tx,
    );

    let created = conversations.create().await;

    assert_eq!(created.as_deref(), Some("c-9"));
    assert_eq!(conversations.selected(), Some("c-9"));
    let ids: Vec<&str> = conversations
        .conversations()
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(ids, ["c-9", "c-1"]);
    assert_eq!(conversations.conversations()[0].title, "New chat");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn deleting_the_open_conversation_moves_selection_to_the_next() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/conversations/delete/c-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tx, _rx) = notices::channel();
    let mut conversations = ConversationList::new(
        client_for(&mock_server),
        "nb-1".to_string(),
        vec![summary("c-1", "First"), summary("c-2", "Second")],
        Some("c-1".to_string()),
        tx,
    );

    conversations.remove("c-1").await;

    assert_eq!(conversations.selected(), Some("c-2"));
    assert_eq!(conversations.conversations().len(), 1);
}

#[tokio::test]
async fn deleting_the_last_conversation_creates_a_fresh_one() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/conversations/delete/c-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    // The history is never left empty: a replacement is created on the
    // spot and becomes current
    Mock::given(method("POST"))
        .and(path("/conversations/create/nb-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"conversationId": "c-9"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tx, _rx) = notices::channel();
    let mut conversations = ConversationList::new(
        client_for(&mock_server),
        "nb-1".to_string(),
        vec![summary("c-1", "Only chat")],
        Some("c-1".to_string()),
        tx,
    );

    conversations.remove("c-1").await;

    assert_eq!(conversations.selected(), Some("c-9"));
    assert_eq!(conversations.conversations()[0].title, "New chat");
}

#[tokio::test]
async fn deleting_a_background_conversation_keeps_the_selection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/conversations/delete/c-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tx, _rx) = notices::channel();
    let mut conversations = ConversationList::new(
        client_for(&mock_server),
        "nb-1".to_string(),
        vec![summary("c-1", "Open"), summary("c-2", "Background")],
        Some("c-1".to_string()),
        tx,
    );

    conversations.remove("c-2").await;

    assert_eq!(conversations.selected(), Some("c-1"));
    assert_eq!(conversations.conversations().len(), 1);
}

#[tokio::test]
async fn failed_delete_keeps_the_entry_and_raises_a_notice() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/conversations/delete/c-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db locked"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tx, mut rx) = notices::channel();
    let mut conversations = ConversationList::new(
        client_for(&mock_server),
        "nb-1".to_string(),
        vec![summary("c-1", "First")],
        Some("c-1".to_string()),
        tx,
    );

    conversations.remove("c-1").await;

    assert_eq!(conversations.conversations().len(), 1);
    assert_eq!(conversations.selected(), Some("c-1"));
    assert_eq!(rx.try_recv().unwrap().text, "Failed to delete conversation");
}

#[tokio::test]
async fn load_selected_fetches_the_transcript() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/conversations/c-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "title": "Entropy questions",
            "messages": [
                {"id": "m-1", "role": "user", "parts": [{"type": "text", "text": "hi"}]},
                {"id": "m-2", "role": "assistant", "parts": [{"type": "text", "text": "hello"}]}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tx, _rx) = notices::channel();
    let conversations = ConversationList::new(
        client_for(&mock_server),
        "nb-1".to_string(),
        vec![summary("c-1", "Entropy questions")],
        Some("c-1".to_string()),
        tx,
    );

    let transcript = conversations.load_selected().await.unwrap();

    assert_eq!(transcript.title, "Entropy questions");
    assert_eq!(transcript.messages.len(), 2);
    assert_eq!(transcript.messages[1].text(), "hello");
}
