//! HTTP client for the Anthropic Messages API
//!
//! Covers the `POST {base}/messages` wire format. Handles request
//! construction, authentication headers, and error classification.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LlmError, classify_status, classify_transport};
use crate::error::AppError;

const PROVIDER: &str = "anthropic";

/// Messages API request body
#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Messages API response body (fields we consume)
#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Client for the Anthropic Messages endpoint
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    max_tokens: u32,
}

impl AnthropicClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - Anthropic API key for the `x-api-key` header
    /// * `api_version` - value for the `anthropic-version` header
    /// * `base_url` - API base, e.g. `https://api.anthropic.com/v1`
    /// * `max_tokens` - completion token cap sent with every request
    /// * `timeout` - whole-request timeout including body read
    pub fn new(
        api_key: String,
        api_version: String,
        base_url: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&api_key)
                .map_err(|e| AppError::Config(format!("invalid Anthropic API key header: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&api_version)
                .map_err(|e| AppError::Config(format!("invalid API version header: {e}")))?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            max_tokens,
        })
    }

    /// Submit a system prompt plus one user message and return the answer text
    ///
    /// Non-text content blocks in the response are skipped; the first text
    /// block wins.
    pub async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        message: &str,
    ) -> Result<String, LlmError> {
        let request = MessageRequest {
            model,
            system: system_prompt,
            messages: vec![WireMessage {
                role: "user",
                content: message,
            }],
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(PROVIDER, e))?;

        let status = response.status();
        debug!(status = %status, model, "message response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(PROVIDER, status, body));
        }

        let body: MessageResponse =
            response.json().await.map_err(|e| LlmError::MalformedResponse {
                provider: PROVIDER,
                message: format!("failed to parse API response: {e}"),
            })?;

        body.content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| LlmError::MalformedResponse {
                provider: PROVIDER,
                message: "response contained no text content blocks".to_string(),
            })
    }
}
