//! Modelgate - category-routing chat gateway for multi-provider LLMs
//!
//! Classifies chat messages into code, analysis, or text, routes each
//! category to the best-suited provider and model, persists conversation
//! history, and degrades gracefully when an upstream provider fails.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod llm;
pub mod metrics;
pub mod middleware;
pub mod routing;
pub mod store;
pub mod telemetry;
