//! Command-line interface for Modelgate
//!
//! Provides argument parsing and subcommand handling for the Modelgate binary.

use clap::{Parser, Subcommand};

/// Category-routing chat gateway for multi-provider LLMs
#[derive(Parser)]
#[command(name = "modelgate")]
#[command(version)]
#[command(about = "Category-routing chat gateway for multi-provider LLMs")]
#[command(
    long_about = "Modelgate classifies chat messages into code, analysis, or text, \
    routes each category to the best-suited provider and model, and persists \
    conversation history."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Modelgate Configuration
# =======================
#
# This file configures the HTTP server, provider endpoints, and
# observability settings. Credentials are NOT configured here: set
# OPENAI_API_KEY, ANTHROPIC_API_KEY, and DATABASE_URL in the environment.

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 8000

# Per-request timeout for provider calls, in seconds (max 300)
request_timeout_seconds = 30

[providers]
# Base URLs for provider APIs. Override for proxies or test doubles.
openai_base_url = "https://api.openai.com/v1"
anthropic_base_url = "https://api.anthropic.com/v1"

# Anthropic API version header
anthropic_version = "2023-06-01"

# Maximum tokens requested per completion
max_tokens = 4096

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}
