use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::FileFormat;

const CLAUDE_API_URL: &str = "https://api.anthropic.com/v1/messages";
const CLAUDE_MODEL: &str = "claude-3-5-haiku-20241022";
const WEB_SEARCH_TOOL: &str = "web_search_20250305";

/// How many candidates a search returns at most.
pub const RESULT_COUNT: usize = 5;

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    system: Option<String>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "type")]
    tool_type: String,
    name: String,
    max_uses: u32,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    #[allow(dead_code)]
    content_type: String,
    text: Option<String>,
}

/// A candidate source returned by a discover search. The description
/// exists for display only; imports drop it.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveredSource {
    #[serde(default)]
    pub public_id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_format")]
    pub format: FileFormat,
    #[serde(default = "default_checked")]
    pub checked: bool,
}

fn default_format() -> FileFormat {
    FileFormat::Url
}

fn default_checked() -> bool {
    true
}

pub struct DiscoverClient {
    client: Client,
    api_key: String,
}

impl DiscoverClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, api_key }
    }

    /// Search the web for candidate sources on a topic. Returns at
    /// most [`RESULT_COUNT`] results, each with a fresh id and checked
    /// by default.
    pub async fn search(&self, topic: &str) -> Result<Vec<DiscoveredSource>> {
        let system_prompt = format!(
            r#"You are a research assistant that finds high-quality web sources.
Use web search to find the {count} most relevant, authoritative sources for the user's topic.
Respond with ONLY a JSON array, no prose and no markdown, where each element is:
{{"title": string, "url": string, "description": string (one sentence), "format": "url", "checked": true}}
Return exactly {count} elements ranked best first."#,
            count = RESULT_COUNT
        );

        let request = MessageRequest {
            model: CLAUDE_MODEL.to_string(),
            max_tokens: 2048,
            messages: vec![Message {
                role: "user".to_string(),
                content: format!("Find the best web sources about: {}", topic),
            }],
            system: Some(system_prompt),
            tools: vec![Tool {
                tool_type: WEB_SEARCH_TOOL.to_string(),
                name: "web_search".to_string(),
                max_uses: RESULT_COUNT as u32,
            }],
        };

        let response = self
            .client
            .post(CLAUDE_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::Discover(format!("API error: {}", error_text)));
        }

        let message_response: MessageResponse = response.json().await?;

        // Tool-use turns interleave search blocks with text; the JSON
        // answer is the concatenation of the text blocks.
        let raw = message_response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<String>();

        parse_results(&raw)
    }
}

static JSON_FENCE: OnceLock<(Regex, Regex)> = OnceLock::new();

fn strip_fences(raw: &str) -> String {
    let (open, close) = JSON_FENCE.get_or_init(|| {
        (
            Regex::new(r"^```(?:json)?\s*").expect("valid fence regex"),
            Regex::new(r"\s*```$").expect("valid fence regex"),
        )
    });
    let stripped = open.replace(raw.trim(), "");
    close.replace(&stripped, "").into_owned()
}

/// Parse the model's answer into candidates: strip an optional code
/// fence, decode the array, cap the count, and assign ids.
fn parse_results(raw: &str) -> Result<Vec<DiscoveredSource>> {
    let stripped = strip_fences(raw);
    let mut results: Vec<DiscoveredSource> = serde_json::from_str(&stripped)?;
    results.truncate(RESULT_COUNT);
    for result in &mut results {
        result.public_id = Uuid::new_v4().to_string();
    }
    Ok(results)
}
