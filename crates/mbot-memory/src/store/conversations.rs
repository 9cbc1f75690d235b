//! Conversation state documents.

use super::Store;
use async_trait::async_trait;
use mbot_core::{error::MbotError, state::ConversationState, traits::StateStore};

impl Store {
    /// Load the state stored for `conversation_id`, if any.
    pub async fn get_state(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationState>, MbotError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT state FROM conversations WHERE id = ?")
                .bind(conversation_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| MbotError::Memory(format!("query failed: {e}")))?;

        match row {
            Some((json,)) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace the state for `conversation_id`.
    pub async fn set_state(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), MbotError> {
        let json = serde_json::to_string(state)?;

        sqlx::query(
            "INSERT INTO conversations (id, state) VALUES (?, ?) \
             ON CONFLICT(id) DO UPDATE SET state = excluded.state, \
             updated_at = datetime('now')",
        )
        .bind(conversation_id)
        .bind(&json)
        .execute(&self.pool)
        .await
        .map_err(|e| MbotError::Memory(format!("set state failed: {e}")))?;

        Ok(())
    }

    /// Number of conversations with stored state.
    pub async fn conversation_count(&self) -> Result<i64, MbotError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MbotError::Memory(format!("count failed: {e}")))?;
        Ok(count)
    }
}

#[async_trait]
impl StateStore for Store {
    async fn get_state(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationState>, MbotError> {
        Store::get_state(self, conversation_id).await
    }

    async fn set_state(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), MbotError> {
        Store::set_state(self, conversation_id, state).await
    }
}
