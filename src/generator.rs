//! Response generation orchestrator
//!
//! Resolves the system prompt and model route for a category, dispatches to
//! the matching provider client, and awaits the answer. Every upstream
//! failure is absorbed here: the caller always gets text back, degraded to a
//! localized apology when the provider call fails. Availability wins over
//! answer quality on this path.

use crate::llm::ProviderClients;
use crate::metrics::Metrics;
use crate::routing::{self, Category, ModelRoute};

/// Orchestrates provider calls for chat requests
#[derive(Clone)]
pub struct ResponseGenerator {
    clients: ProviderClients,
    metrics: Metrics,
}

impl ResponseGenerator {
    /// Create a new generator over the given provider clients
    pub fn new(clients: ProviderClients, metrics: Metrics) -> Self {
        Self { clients, metrics }
    }

    /// Generate an AI response for a message
    ///
    /// Infallible by contract: upstream errors are logged with full detail,
    /// counted by kind, and converted into the category's fallback string.
    /// `session_id` scopes logging only; provider requests carry just the
    /// system prompt and the current message.
    pub async fn generate(&self, message: &str, category: Category, session_id: &str) -> String {
        let route = ModelRoute::for_category(category);
        let system_prompt = routing::system_prompt(category);

        tracing::info!(
            provider = route.provider.as_str(),
            model = route.model,
            category = %category,
            session_id = %session_id,
            message_length = message.len(),
            "Dispatching message to provider"
        );

        match self.clients.complete(route, system_prompt, message).await {
            Ok(response) => {
                tracing::info!(
                    provider = route.provider.as_str(),
                    session_id = %session_id,
                    response_length = response.len(),
                    "Provider call completed"
                );
                response
            }
            Err(e) => {
                tracing::error!(
                    provider = route.provider.as_str(),
                    model = route.model,
                    category = %category,
                    session_id = %session_id,
                    error_kind = e.kind().as_str(),
                    error = %e,
                    "Provider call failed, serving fallback response"
                );
                self.metrics.record_llm_fallback(category, e.kind());
                routing::fallback_response(category).to_string()
            }
        }
    }
}
