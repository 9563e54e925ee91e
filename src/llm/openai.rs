//! HTTP client for OpenAI-style chat completion APIs
//!
//! Covers the `POST {base}/chat/completions` wire format. Non-streaming
//! only; the gateway returns whole answers.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LlmError, classify_status, classify_transport};
use crate::error::AppError;

const PROVIDER: &str = "openai";

/// Chat completion request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Chat completion response body (fields we consume)
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the OpenAI chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - bearer token for authentication
    /// * `base_url` - API base, e.g. `https://api.openai.com/v1`
    /// * `max_tokens` - completion token cap sent with every request
    /// * `timeout` - whole-request timeout including body read
    pub fn new(
        api_key: String,
        base_url: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| AppError::Config(format!("invalid OpenAI API key header: {e}")))?,
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
    pub async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        message: &str,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: system_prompt,
                },
                WireMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(PROVIDER, e))?;

        let status = response.status();
        debug!(status = %status, model, "completion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(PROVIDER, status, body));
        }

        let body: CompletionResponse =
            response.json().await.map_err(|e| LlmError::MalformedResponse {
                provider: PROVIDER,
                message: format!("failed to parse API response: {e}"),
            })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse {
                provider: PROVIDER,
                message: "response contained no choices with text content".to_string(),
            })
    }
}
