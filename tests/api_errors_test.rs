//! How backend failures surface through the API client.

use std::time::Duration;

use notebook_desk::api::ApiClient;
use notebook_desk::config::Config;
use notebook_desk::error::AppError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn non_success_statuses_become_backend_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notebooks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let config = Config {
        api_base_url: mock_server.uri(),
        ..Config::default()
    };
    let api = ApiClient::new(&config).unwrap();

    let err = api.list_notebooks().await.unwrap_err();

    // The status and the backend's body both end up in the message
    match err {
        AppError::Backend(text) => {
            assert!(text.contains("500"), "missing status in: {}", text);
            assert!(text.contains("boom"), "missing body in: {}", text);
        }
        other => panic!("expected Backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_bodies_become_http_errors() {
    let mock_server = MockServer::start().await;

    // A 200 whose body is not the expected JSON shape
    Mock::given(method("GET"))
        .and(path("/notebooks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let config = Config {
        api_base_url: mock_server.uri(),
        ..Config::default()
    };
    let api = ApiClient::new(&config).unwrap();

    let err = api.list_notebooks().await.unwrap_err();

    assert!(matches!(err, AppError::Http(_)), "got {:?}", err);
}

#[tokio::test]
async fn slow_responses_hit_the_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notebooks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = Config {
        api_base_url: mock_server.uri(),
        request_timeout_secs: 1,
        ..Config::default()
    };
    let api = ApiClient::new(&config).unwrap();

    let err = api.list_notebooks().await.unwrap_err();

    match err {
        AppError::Http(e) => assert!(e.is_timeout(), "expected a timeout, got {:?}", e),
        other => panic!("expected Http error, got {:?}", other),
    }
}
