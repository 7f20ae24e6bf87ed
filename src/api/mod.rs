//! Typed wrapper around the notebook backend's REST API.
//!
//! One endpoint family per submodule; all requests share a single
//! `reqwest` client and base URL taken from the config.

use std::time::Duration;

use reqwest::{Client, Response};
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};

mod conversations;
mod files;
mod notebooks;
mod notes;

pub use conversations::QueryOutcome;
pub use files::UploadPart;
pub use notebooks::{CreatedNotebook, NotebookEntry};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.api_base_url)
            .map_err(|e| AppError::Config(format!("invalid api_base_url: {}", e)))?;
        if base.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "invalid api_base_url: {}",
                config.api_base_url
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Ok(Self { client, base })
    }

    fn client(&self) -> &Client {
        &self.client
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("base URL validated at construction")
            .pop_if_empty()
            .extend(segments);
        url
    }
}

async fn expect_success(context: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await?;
        return Err(AppError::Backend(format!(
            "{}: {}: {}",
            context, status, error_text
        )));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> ApiClient {
        let config = Config {
            api_base_url: base.to_string(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn endpoint_joins_segments_onto_the_base() {
        let api = client_for("http://localhost:8000");
        let url = api.endpoint(&["files", "nb-1"]);
        assert_eq!(url.as_str(), "http://localhost:8000/files/nb-1");
    }

    #[test]
    fn endpoint_preserves_a_base_path_prefix() {
        let api = client_for("http://localhost:8000/api/");
        let url = api.endpoint(&["notebooks"]);
        assert_eq!(url.as_str(), "http://localhost:8000/api/notebooks");
    }

    #[test]
    fn rejects_an_unusable_base_url() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(AppError::Config(_))
        ));
    }
}
