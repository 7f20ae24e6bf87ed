//! Integration tests for the notes index and its ordering rules.

use notebook_desk::api::ApiClient;
use notebook_desk::config::Config;
use notebook_desk::models::{Block, NoteSummary};
use notebook_desk::sync::{notices, NoteList};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let config = Config {
        api_base_url: server.uri(),
        ..Config::default()
    };
    ApiClient::new(&config).expect("Failed to create API client")
}

fn summary(id: &str, title: &str) -> NoteSummary {
    NoteSummary {
        id: id.to_string(),
        title: title.to_string(),
    }
}

fn list_with(server: &MockServer, seed: Vec<NoteSummary>) -> NoteList {
    let (tx, _rx) = notices::channel();
    NoteList::new(client_for(server), "nb-1".to_string(), seed, tx)
}

#[tokio::test]
async fn creating_prepends_the_summary_and_returns_the_note() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/notes"))
        .and(body_partial_json(serde_json::json!({
            "notebookId": "nb-1",
            "title": "Reading list"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "n-2",
            "title": "Reading list",
            "notebookId": "nb-1",
            "blocks": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut notes = list_with(&mock_server, vec![summary("n-1", "Older note")]);

    let note = notes.create("Reading list", Vec::new()).await.unwrap();

    assert_eq!(note.id, "n-2");
    let ids: Vec<&str> = notes.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["n-2", "n-1"]);
}

#[tokio::test]
async fn saving_a_note_promotes_its_summary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notes/n-2"))
        .and(body_partial_json(serde_json::json!({"title": "Revised"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "n-2",
            "title": "Revised",
            "blocks": [{
                "id": "b-1",
                "type": "paragraph",
                "content": [{"type": "text", "text": "new thought", "styles": {}}]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut notes = list_with(
        &mock_server,
        vec![summary("n-1", "Front note"), summary("n-2", "Back note")],
    );

    let blocks = vec![Block::paragraph("new thought")];
    let saved = notes.save("n-2", "Revised", blocks).await.unwrap();

    assert_eq!(saved.plain_text(), "new thought");
    // The edited note jumps to the front of the index
    let ids: Vec<&str> = notes.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["n-2", "n-1"]);
    assert_eq!(notes.notes()[0].title, "Revised");
}

#[tokio::test]
async fn renaming_patches_the_title_in_place() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notes/update_title/n-2"))
        .and(query_param("title", "Renamed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut notes = list_with(
        &mock_server,
        vec![summary("n-1", "Front note"), summary("n-2", "Back note")],
    );

    notes.rename("n-2", "Renamed").await;

    // Unlike a save, a rename keeps the index order
    let ids: Vec<&str> = notes.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["n-1", "n-2"]);
    assert_eq!(notes.notes()[1].title, "Renamed");
}

#[tokio::test]
async fn removing_drops_the_summary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/notes/delete/n-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut notes = list_with(
        &mock_server,
        vec![summary("n-1", "Front note"), summary("n-2", "Back note")],
    );

    notes.remove("n-1").await;

    let ids: Vec<&str> = notes.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["n-2"]);
}

#[tokio::test]
async fn failed_save_keeps_the_index_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/notes/n-2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db locked"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (tx, mut rx) = notices::channel();
    let mut notes = NoteList::new(
        client_for(&mock_server),
        "nb-1".to_string(),
        vec![summary("n-1", "Front note"), summary("n-2", "Back note")],
        tx,
    );

    let saved = notes.save("n-2", "Revised", Vec::new()).await;

    assert!(saved.is_none());
    let ids: Vec<&str> = notes.notes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["n-1", "n-2"]);
    assert_eq!(notes.notes()[1].title, "Back note");
    assert_eq!(rx.try_recv().unwrap().text, "Failed to update note");
}
