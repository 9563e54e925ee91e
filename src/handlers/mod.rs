//! HTTP request handlers for the Modelgate API

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, Secrets};
use crate::error::AppResult;
use crate::generator::ResponseGenerator;
use crate::llm::ProviderClients;
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use crate::store::ChatStore;

pub mod chat;
pub mod health;
pub mod metrics;

/// Application state shared across all handlers
///
/// Constructed once at startup and passed into handlers by Axum; there is no
/// ambient global state. All fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    store: ChatStore,
    generator: Arc<ResponseGenerator>,
    metrics: Metrics,
}

impl AppState {
    /// Create application state: connect the store, build provider clients
    ///
    /// # Errors
    /// Fails when the database cannot be opened or a client cannot be built
    /// from the supplied secrets.
    pub async fn new(config: Arc<Config>, secrets: &Secrets) -> AppResult<Self> {
        let store = ChatStore::connect(&secrets.database_url).await?;
        let metrics = Metrics::new()
            .map_err(|e| crate::error::AppError::Internal(format!("metrics registry: {e}")))?;
        let clients = ProviderClients::new(&config, secrets)?;
        let generator = Arc::new(ResponseGenerator::new(clients, metrics.clone()));

        Ok(Self {
            config,
            store,
            generator,
            metrics,
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the conversation store
    pub fn store(&self) -> &ChatStore {
        &self.store
    }

    /// Get reference to the response generator
    pub fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the full application router
///
/// Separated from `main` so integration tests can drive the exact production
/// routing table with `tower::ServiceExt::oneshot`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(health::root))
        .route("/api/health", get(health::handler))
        .route("/api/chat", post(chat::send_message))
        .route("/api/chat/", post(chat::send_message))
        .route("/api/chat/history/{session_id}", get(chat::history))
        .route("/api/chat/sessions", get(chat::sessions))
        .route("/api/chat/session/{session_id}", delete(chat::delete_session))
        .route("/metrics", get(metrics::handler))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
