//! Configuration management for Modelgate
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Secrets (provider credentials, database URL) are deliberately NOT part of
//! the file format; they come from the environment via [`Secrets::from_env`]
//! and their absence is fatal at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// Provider endpoint configuration
///
/// Base URLs default to the public APIs; overriding them is intended for
/// proxies and for tests pointing at a local mock server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_anthropic_base_url")]
    pub anthropic_base_url: String,
    /// Anthropic API version header value
    #[serde(default = "default_anthropic_version")]
    pub anthropic_version: String,
    /// Maximum tokens requested per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai_base_url: default_openai_base_url(),
            anthropic_base_url: default_anthropic_base_url(),
            anthropic_version: default_anthropic_version(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 3: Validate parsed config
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// Called automatically by `from_file()`, but can also be called
    /// explicitly when constructing Config via other means (e.g., in tests).
    pub fn validate(&self) -> crate::error::AppResult<()> {
        if self.server.request_timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_seconds > 300 {
            return Err(crate::error::AppError::Config(format!(
                "request_timeout_seconds cannot exceed 300 seconds (5 minutes), got {}",
                self.server.request_timeout_seconds
            )));
        }

        for (name, url) in [
            ("providers.openai_base_url", &self.providers.openai_base_url),
            (
                "providers.anthropic_base_url",
                &self.providers.anthropic_base_url,
            ),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(crate::error::AppError::Config(format!(
                    "{name} has invalid value '{url}': must start with 'http://' or 'https://'"
                )));
            }
        }

        if self.providers.max_tokens == 0 {
            return Err(crate::error::AppError::Config(
                "providers.max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = crate::error::AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(toml_str).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            }
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Out-of-band secrets required to serve traffic
///
/// All three are fatal startup conditions when absent: the gateway cannot
/// degrade gracefully without provider credentials or a place to persist
/// conversations.
#[derive(Clone)]
pub struct Secrets {
    pub openai_api_key: String,
    pub anthropic_api_key: String,
    pub database_url: String,
}

impl Secrets {
    /// Read secrets from the process environment
    pub fn from_env() -> crate::error::AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read secrets through a lookup function
    ///
    /// Separated from `from_env` so tests can supply variables without
    /// mutating process-global state.
    pub fn from_lookup<F>(lookup: F) -> crate::error::AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    crate::error::AppError::Config(format!(
                        "{key} not found in environment; refusing to start"
                    ))
                })
        };

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            anthropic_api_key: required("ANTHROPIC_API_KEY")?,
            database_url: required("DATABASE_URL")?,
        })
    }
}

impl std::fmt::Debug for Secrets {
    // Credentials must never end up in logs via {:?}
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("openai_api_key", &"<redacted>")
            .field("anthropic_api_key", &"<redacted>")
            .field("database_url", &self.database_url)
            .finish()
    }
}
