//! Prometheus metrics collection for Modelgate
//!
//! Tracks chat request counts by category, provider fallbacks by failure
//! kind, and stored messages by role. Exposed via the `/metrics` endpoint
//! in Prometheus text format.

use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::llm::LlmErrorKind;
use crate::routing::Category;
use crate::store::MessageRole;

/// Metrics collector for Modelgate
///
/// Label values come from closed enums ([`Category`], [`LlmErrorKind`],
/// [`MessageRole`]), keeping cardinality bounded at compile time.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    chat_requests: CounterVec,
    llm_fallbacks: CounterVec,
    messages_stored: CounterVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Counter: chat requests by resolved category and how it was resolved.
        // detected="true" means the classifier chose the category,
        // "false" means the caller supplied it explicitly.
        // Cardinality: 3 categories x 2 = 6 time series.
        let chat_requests = CounterVec::new(
            Opts::new(
                "modelgate_chat_requests_total",
                "Total number of chat requests by category and detection source",
            ),
            &["category", "detected"],
        )?;

        // Counter: upstream failures absorbed into fallback responses.
        // Cardinality: 3 categories x 5 error kinds = 15 time series.
        let llm_fallbacks = CounterVec::new(
            Opts::new(
                "modelgate_llm_fallbacks_total",
                "Total number of fallback responses served, by category and upstream error kind",
            ),
            &["category", "kind"],
        )?;

        // Counter: messages persisted to the conversation store by role.
        let messages_stored = CounterVec::new(
            Opts::new(
                "modelgate_messages_stored_total",
                "Total number of messages persisted, by role",
            ),
            &["role"],
        )?;

        registry.register(Box::new(chat_requests.clone()))?;
        registry.register(Box::new(llm_fallbacks.clone()))?;
        registry.register(Box::new(messages_stored.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            chat_requests,
            llm_fallbacks,
            messages_stored,
        })
    }

    /// Record a chat request for a category
    pub fn record_chat_request(&self, category: Category, detected: bool) {
        self.chat_requests
            .with_label_values(&[category.as_str(), if detected { "true" } else { "false" }])
            .inc();
    }

    /// Record a fallback response served in place of a real answer
    pub fn record_llm_fallback(&self, category: Category, kind: LlmErrorKind) {
        self.llm_fallbacks
            .with_label_values(&[category.as_str(), kind.as_str()])
            .inc();
    }

    /// Record a persisted message
    pub fn record_message_stored(&self, role: MessageRole) {
        self.messages_stored.with_label_values(&[role.as_str()]).inc();
    }

    /// Gather all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("metrics output was not valid UTF-8: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_creates_and_gathers() {
        let metrics = Metrics::new().expect("should create metrics");
        let output = metrics.gather().expect("should gather");
        // Registry starts empty; families appear after first increment
        assert!(output.is_empty() || output.contains("# HELP"));
    }

    #[test]
    fn chat_request_counter_appears_in_output() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics.record_chat_request(Category::Code, true);
        metrics.record_chat_request(Category::Text, false);

        let output = metrics.gather().expect("should gather");
        assert!(output.contains("modelgate_chat_requests_total"));
        assert!(output.contains(r#"category="code""#));
        assert!(output.contains(r#"detected="true""#));
    }

    #[test]
    fn fallback_counter_labels_kind() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics.record_llm_fallback(Category::Analysis, LlmErrorKind::Timeout);

        let output = metrics.gather().expect("should gather");
        assert!(output.contains("modelgate_llm_fallbacks_total"));
        assert!(output.contains(r#"kind="timeout""#));
    }

    #[test]
    fn stored_message_counter_labels_role() {
        let metrics = Metrics::new().expect("should create metrics");
        metrics.record_message_stored(MessageRole::User);
        metrics.record_message_stored(MessageRole::Ai);

        let output = metrics.gather().expect("should gather");
        assert!(output.contains(r#"role="user""#));
        assert!(output.contains(r#"role="ai""#));
    }
}
