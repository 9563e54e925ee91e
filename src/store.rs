//! SQLite-backed conversation store
//!
//! Persists chat sessions and their messages. Sessions are created lazily on
//! the first message of a conversation and touched on every subsequent one;
//! messages are immutable once inserted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::routing::Category;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Ai,
}

impl MessageRole {
    /// Convert to string representation for logging and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

/// A logical conversation grouping an ordered sequence of messages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatSession {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredMessage {
    pub id: String,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

/// Conversation store over a sqlx SQLite pool
#[derive(Clone)]
pub struct ChatStore {
    pool: SqlitePool,
}

impl ChatStore {
    /// Open (creating if missing) the database at `database_url` and ensure
    /// the schema exists
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                AppError::Config(format!("invalid DATABASE_URL '{database_url}': {e}"))
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_sessions (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chat_messages (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                category TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (session_id) REFERENCES chat_sessions(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_session
             ON chat_messages(session_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Probe database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Resolve a session id, creating a fresh session when needed
    ///
    /// A supplied id that resolves is touched (`updated_at = now`) and
    /// returned as-is. A missing or unresolvable id mints a brand new
    /// session with a newly generated id - the unknown id is NOT adopted.
    pub async fn get_or_create_session(&self, requested: Option<&str>) -> AppResult<String> {
        if let Some(id) = requested {
            let found = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM chat_sessions WHERE id = ?",
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

            if found > 0 {
                sqlx::query("UPDATE chat_sessions SET updated_at = ? WHERE id = ?")
                    .bind(Utc::now())
                    .bind(id)
                    .execute(&self.pool)
                    .await?;
                return Ok(id.to_string());
            }

            tracing::debug!(requested_session_id = %id, "Supplied session id unknown, creating fresh session");
        }

        let session = ChatSession {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        sqlx::query("INSERT INTO chat_sessions (id, created_at, updated_at) VALUES (?, ?, ?)")
            .bind(&session.id)
            .bind(session.created_at)
            .bind(session.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(session.id)
    }

    /// Persist one message and touch the owning session
    pub async fn insert_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
        category: Category,
    ) -> AppResult<StoredMessage> {
        let message = StoredMessage {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            role,
            content: content.to_string(),
            category,
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO chat_messages (id, session_id, role, content, category, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(&message.session_id)
        .bind(message.role)
        .bind(&message.content)
        .bind(message.category)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE chat_sessions SET updated_at = ? WHERE id = ?")
            .bind(message.created_at)
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(message)
    }

    /// Fetch a session's messages, oldest first, capped at `limit`
    ///
    /// # Errors
    /// Returns [`AppError::SessionNotFound`] when the session id is unknown.
    pub async fn history(&self, session_id: &str, limit: i64) -> AppResult<Vec<StoredMessage>> {
        if !self.session_exists(session_id).await? {
            return Err(AppError::SessionNotFound(session_id.to_string()));
        }

        // rowid tiebreak keeps insertion order for same-timestamp writes
        let messages = sqlx::query_as::<_, StoredMessage>(
            "SELECT id, session_id, role, content, category, created_at
             FROM chat_messages
             WHERE session_id = ?
             ORDER BY created_at ASC, rowid ASC
             LIMIT ?",
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Fetch the most recently updated sessions, capped at `limit`
    pub async fn recent_sessions(&self, limit: i64) -> AppResult<Vec<ChatSession>> {
        let sessions = sqlx::query_as::<_, ChatSession>(
            "SELECT id, created_at, updated_at
             FROM chat_sessions
             ORDER BY updated_at DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Delete a session and every message referencing it
    ///
    /// Messages are removed first, then the session row.
    ///
    /// # Errors
    /// Returns [`AppError::SessionNotFound`] when the session id is unknown.
    pub async fn delete_session(&self, session_id: &str) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM chat_messages WHERE session_id = ?")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::SessionNotFound(session_id.to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Check whether a session id resolves
    pub async fn session_exists(&self, session_id: &str) -> AppResult<bool> {
        let found =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_sessions WHERE id = ?")
                .bind(session_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(found > 0)
    }
}
