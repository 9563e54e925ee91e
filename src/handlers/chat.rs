//! Chat endpoints
//!
//! Message submission with category auto-detection, session history,
//! session listing, and session deletion.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::classifier;
use crate::error::AppError;
use crate::handlers::AppState;
use crate::middleware::RequestId;
use crate::routing::Category;
use crate::store::{ChatSession, MessageRole, StoredMessage};

/// Maximum allowed message length in characters (100K chars)
const MAX_MESSAGE_LENGTH: usize = 100_000;

/// Default number of messages returned by the history endpoint
const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Default number of sessions returned by the sessions endpoint
const DEFAULT_SESSIONS_LIMIT: i64 = 20;

/// Chat request from client
///
/// Validation is enforced during deserialization - invalid instances cannot
/// exist. An absent category (or the default `text`) triggers auto-detection.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    message: String,
    category: Option<Category>,
    session_id: Option<String>,
}

impl ChatRequest {
    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the explicitly requested category, if any
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Get the supplied session id, if any
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Resolve the effective category for this request
    ///
    /// The classifier runs when no category was supplied or when the
    /// supplied category equals the default. Returns the category and
    /// whether it was auto-detected.
    pub fn resolve_category(&self) -> (Category, bool) {
        match self.category {
            Some(category) if category != Category::Text => (category, false),
            _ => (classifier::classify(&self.message), true),
        }
    }
}

/// Custom Deserialize implementation that validates during deserialization
impl<'de> Deserialize<'de> for ChatRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawChatRequest {
            message: String,
            #[serde(default)]
            category: Option<Category>,
            #[serde(default)]
            session_id: Option<String>,
        }

        let raw = RawChatRequest::deserialize(deserializer)?;

        if raw.message.trim().is_empty() {
            return Err(serde::de::Error::custom(
                "message cannot be empty or contain only whitespace",
            ));
        }

        let char_count = raw.message.chars().count();
        if char_count > MAX_MESSAGE_LENGTH {
            return Err(serde::de::Error::custom(format!(
                "message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters (got {char_count})"
            )));
        }

        Ok(ChatRequest {
            message: raw.message,
            category: raw.category,
            session_id: raw.session_id,
        })
    }
}

/// Chat response to client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Id of the persisted AI message
    pub id: String,
    /// The AI answer (or fallback) text
    pub response: String,
    /// Category the request was served under
    pub category: Category,
    /// Timestamp of the AI message
    pub timestamp: DateTime<Utc>,
    /// Session the exchange was recorded in
    pub session_id: String,
}

/// History endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<StoredMessage>,
}

/// Sessions endpoint response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<ChatSession>,
}

/// Query parameters accepting an optional result cap
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    limit: Option<i64>,
}

/// POST /api/chat/ handler
///
/// Resolves the session, persists the user message, generates the AI answer
/// (degrading to a fallback on upstream failure), persists it, and returns
/// it. The only error paths are validation and storage; a provider outage
/// still yields 200.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (category, detected) = request.resolve_category();

    tracing::info!(
        request_id = %request_id,
        category = %category,
        detected = detected,
        message_length = request.message().len(),
        "Received chat request"
    );
    state.metrics().record_chat_request(category, detected);

    let session_id = state
        .store()
        .get_or_create_session(request.session_id())
        .await?;

    let user_message = state
        .store()
        .insert_message(&session_id, MessageRole::User, request.message(), category)
        .await?;
    state.metrics().record_message_stored(MessageRole::User);

    let response_text = state
        .generator()
        .generate(request.message(), category, &session_id)
        .await;

    let ai_message = state
        .store()
        .insert_message(&session_id, MessageRole::Ai, &response_text, category)
        .await?;
    state.metrics().record_message_stored(MessageRole::Ai);

    tracing::debug!(
        request_id = %request_id,
        session_id = %session_id,
        user_message_id = %user_message.id,
        ai_message_id = %ai_message.id,
        "Exchange persisted"
    );

    Ok(Json(ChatResponse {
        id: ai_message.id,
        response: response_text,
        category,
        timestamp: ai_message.created_at,
        session_id,
    }))
}

/// GET /api/chat/history/{session_id} handler
///
/// Returns the session's messages, oldest first, capped at `limit`
/// (default 50). 404 when the session is unknown.
pub async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(params): Query<LimitParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).max(0);
    let messages = state.store().history(&session_id, limit).await?;

    Ok(Json(HistoryResponse { messages }))
}

/// GET /api/chat/sessions handler
///
/// Returns the most recently updated sessions, capped at `limit` (default 20).
pub async fn sessions(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_SESSIONS_LIMIT).max(0);
    let sessions = state.store().recent_sessions(limit).await?;

    Ok(Json(SessionsResponse { sessions }))
}

/// DELETE /api/chat/session/{session_id} handler
///
/// Removes all of the session's messages, then the session itself.
/// 404 when the session is unknown.
pub async fn delete_session(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.store().delete_session(&session_id).await?;

    tracing::info!(
        request_id = %request_id,
        session_id = %session_id,
        "Session deleted"
    );

    Ok(Json(serde_json::json!({
        "message": "Session deleted successfully"
    })))
}
