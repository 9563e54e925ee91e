//! Provider clients for upstream LLM APIs
//!
//! Thin, non-streaming HTTP clients for the two vendors the routing table
//! targets. Errors are classified into a closed [`LlmErrorKind`] set so the
//! response generator can log and count the right signal before degrading
//! to a fallback answer.

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

use thiserror::Error;

use crate::config::{Config, Secrets};
use crate::error::AppResult;
use crate::routing::{ModelRoute, Provider};

/// Upstream failure, tagged by kind
///
/// Never crosses the HTTP boundary: the response generator converts every
/// variant into a localized fallback message.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request to {provider} timed out")]
    Timeout { provider: &'static str },

    #[error("authentication with {provider} failed: {message}")]
    Auth {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} rate limited the request: {message}")]
    RateLimited {
        provider: &'static str,
        message: String,
    },

    #[error("malformed response from {provider}: {message}")]
    MalformedResponse {
        provider: &'static str,
        message: String,
    },

    #[error("upstream error from {provider}: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },
}

impl LlmError {
    /// The kind tag for this error, used as a metrics label
    pub fn kind(&self) -> LlmErrorKind {
        match self {
            Self::Timeout { .. } => LlmErrorKind::Timeout,
            Self::Auth { .. } => LlmErrorKind::Auth,
            Self::RateLimited { .. } => LlmErrorKind::RateLimited,
            Self::MalformedResponse { .. } => LlmErrorKind::MalformedResponse,
            Self::Upstream { .. } => LlmErrorKind::Upstream,
        }
    }
}

/// Closed set of upstream failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmErrorKind {
    Timeout,
    Auth,
    RateLimited,
    MalformedResponse,
    Upstream,
}

impl LlmErrorKind {
    /// Convert to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Auth => "auth",
            Self::RateLimited => "rate_limited",
            Self::MalformedResponse => "malformed_response",
            Self::Upstream => "upstream",
        }
    }
}

/// Classify an HTTP error status into an [`LlmError`]
///
/// Shared by both clients; `body` is the (possibly empty) response text.
pub(crate) fn classify_status(
    provider: &'static str,
    status: reqwest::StatusCode,
    body: String,
) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::Auth {
            provider,
            message: format!("API returned {status}: {body}"),
        },
        429 => LlmError::RateLimited {
            provider,
            message: format!("API returned {status}: {body}"),
        },
        _ => LlmError::Upstream {
            provider,
            message: format!("API returned {status}: {body}"),
        },
    }
}

/// Map a reqwest transport error into an [`LlmError`]
pub(crate) fn classify_transport(provider: &'static str, error: reqwest::Error) -> LlmError {
    if error.is_timeout() {
        LlmError::Timeout { provider }
    } else {
        LlmError::Upstream {
            provider,
            message: format!("HTTP request failed: {error}"),
        }
    }
}

/// Both provider clients, dispatched by [`ModelRoute`]
#[derive(Clone)]
pub struct ProviderClients {
    openai: OpenAiClient,
    anthropic: AnthropicClient,
}

impl ProviderClients {
    /// Construct clients from configuration and environment secrets
    pub fn new(config: &Config, secrets: &Secrets) -> AppResult<Self> {
        let timeout = std::time::Duration::from_secs(config.server.request_timeout_seconds);

        Ok(Self {
            openai: OpenAiClient::new(
                secrets.openai_api_key.clone(),
                config.providers.openai_base_url.clone(),
                config.providers.max_tokens,
                timeout,
            )?,
            anthropic: AnthropicClient::new(
                secrets.anthropic_api_key.clone(),
                config.providers.anthropic_version.clone(),
                config.providers.anthropic_base_url.clone(),
                config.providers.max_tokens,
                timeout,
            )?,
        })
    }

    /// Submit a single-turn completion to the provider named by `route`
    pub async fn complete(
        &self,
        route: ModelRoute,
        system_prompt: &str,
        message: &str,
    ) -> Result<String, LlmError> {
        match route.provider {
            Provider::OpenAi => self.openai.complete(route.model, system_prompt, message).await,
            Provider::Anthropic => {
                self.anthropic
                    .complete(route.model, system_prompt, message)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_labels_are_stable() {
        assert_eq!(LlmErrorKind::Timeout.as_str(), "timeout");
        assert_eq!(LlmErrorKind::Auth.as_str(), "auth");
        assert_eq!(LlmErrorKind::RateLimited.as_str(), "rate_limited");
        assert_eq!(LlmErrorKind::MalformedResponse.as_str(), "malformed_response");
        assert_eq!(LlmErrorKind::Upstream.as_str(), "upstream");
    }

    #[test]
    fn status_401_classifies_as_auth() {
        let err = classify_status(
            "openai",
            reqwest::StatusCode::UNAUTHORIZED,
            "invalid key".to_string(),
        );
        assert_eq!(err.kind(), LlmErrorKind::Auth);
    }

    #[test]
    fn status_429_classifies_as_rate_limited() {
        let err = classify_status(
            "anthropic",
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            String::new(),
        );
        assert_eq!(err.kind(), LlmErrorKind::RateLimited);
    }

    #[test]
    fn status_500_classifies_as_upstream() {
        let err = classify_status(
            "openai",
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            String::new(),
        );
        assert_eq!(err.kind(), LlmErrorKind::Upstream);
    }
}
