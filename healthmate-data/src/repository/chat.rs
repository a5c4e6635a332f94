use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::database::get_db_pool;
use crate::models::chat::{ChatMessage, NewChatMessage};

use super::errors::RepositoryError;
use super::in_memory::InMemoryChat;
use super::storage::ChatStorage;

/// Repository trait for chat history
#[async_trait]
pub trait ChatRepositoryTrait: Send + Sync {
    /// Persist one user/assistant exchange
    async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage, RepositoryError>;

    /// Chat history for a subject in chronological order
    async fn history(
        &self,
        subject_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Remove all history for a subject, returning the number removed
    async fn clear(&self, subject_id: &str) -> Result<usize, RepositoryError>;
}

/// Build a chat row from a new-message payload
pub(crate) fn build_message(message: NewChatMessage, now: &str) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4().to_string(),
        subject_id: message.subject_id,
        user_message: message.user_message,
        ai_response: message.ai_response,
        topic: message.topic,
        created_at: now.to_string(),
    }
}

/// Repository for chat history
///
/// Uses the database when the pool is available and falls back to in-memory
/// storage when it is not.
#[derive(Debug, Clone, Default)]
pub struct ChatRepository {
    /// In-memory storage for when the database is not available
    storage: InMemoryChat,
}

impl ChatRepository {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryChat::new(),
        }
    }
}

#[async_trait]
impl ChatRepositoryTrait for ChatRepository {
    async fn insert(&self, message: NewChatMessage) -> Result<ChatMessage, RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let message = build_message(message, &now);

        match get_db_pool() {
            Ok(pool) => {
                debug!("Storing chat message in database: {}", message.id);
                match ChatStorage::store(&pool, &message).await {
                    Ok(_) => Ok(message),
                    Err(e) => {
                        error!("Failed to store chat message in database: {}", e);
                        self.storage.store(&message).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.store(&message).await
            }
        }
    }

    async fn history(
        &self,
        subject_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Getting chat history from database: subject={}", subject_id);
                match ChatStorage::history(&pool, subject_id, limit).await {
                    Ok(messages) => Ok(messages),
                    Err(e) => {
                        error!("Failed to get chat history from database: {}", e);
                        self.storage.history(subject_id, limit).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.history(subject_id, limit).await
            }
        }
    }

    async fn clear(&self, subject_id: &str) -> Result<usize, RepositoryError> {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Clearing chat history in database: subject={}", subject_id);
                match ChatStorage::clear(&pool, subject_id).await {
                    Ok(removed) => Ok(removed),
                    Err(e) => {
                        error!("Failed to clear chat history in database: {}", e);
                        self.storage.clear(subject_id).await
                    }
                }
            }
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                self.storage.clear(subject_id).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_message(subject: &str, text: &str) -> NewChatMessage {
        NewChatMessage {
            subject_id: subject.to_string(),
            user_message: text.to_string(),
            ai_response: format!("reply to: {}", text),
            topic: Some("general".to_string()),
        }
    }

    #[tokio::test]
    async fn history_is_chronological_and_per_subject() {
        let storage = InMemoryChat::new();

        storage
            .store(&build_message(new_message("subj-1", "first"), "2026-08-01T09:00:00Z"))
            .await
            .unwrap();
        storage
            .store(&build_message(new_message("subj-1", "second"), "2026-08-01T10:00:00Z"))
            .await
            .unwrap();
        storage
            .store(&build_message(new_message("subj-2", "other user"), "2026-08-01T09:30:00Z"))
            .await
            .unwrap();

        let history = storage.history("subj-1", None).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].user_message, "first");
        assert_eq!(history[1].user_message, "second");
    }

    #[tokio::test]
    async fn clear_removes_only_the_subjects_history() {
        let storage = InMemoryChat::new();

        storage
            .store(&build_message(new_message("subj-1", "a"), "2026-08-01T09:00:00Z"))
            .await
            .unwrap();
        storage
            .store(&build_message(new_message("subj-2", "b"), "2026-08-01T09:05:00Z"))
            .await
            .unwrap();

        let removed = storage.clear("subj-1").await.unwrap();
        assert_eq!(removed, 1);
        assert!(storage.history("subj-1", None).await.unwrap().is_empty());
        assert_eq!(storage.history("subj-2", None).await.unwrap().len(), 1);
    }
}
