use crate::{error::MbotError, message::OutgoingMessage, state::ConversationState};
use async_trait::async_trait;

/// Messaging channel trait. Delivers replies to a conversation.
///
/// Inbound traffic arrives through the webhook server, so a channel only has
/// to know how to send.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Send a reply back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), MbotError>;
}

/// Conversation state persistence, keyed by conversation id.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the state for a conversation. A missing key is `Ok(None)`, not an error.
    async fn get_state(&self, conversation_id: &str)
        -> Result<Option<ConversationState>, MbotError>;

    /// Replace the stored state for a conversation.
    async fn set_state(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), MbotError>;
}
