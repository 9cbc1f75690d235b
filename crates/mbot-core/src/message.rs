use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text message received from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Channel name (e.g. "line").
    pub channel: String,
    /// Stable conversation key: group/room id for group chats, user id otherwise.
    pub conversation_id: String,
    /// Message text content.
    pub text: String,
    /// Platform token for replying to this exact message, if any.
    #[serde(default)]
    pub reply_token: Option<String>,
    /// Platform-specific user ID of the author, when the platform exposes it.
    #[serde(default)]
    pub sender_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Reply token of the message being answered.
    #[serde(default)]
    pub reply_token: Option<String>,
    /// Push target (conversation id), used when no reply token is available.
    #[serde(default)]
    pub target: Option<String>,
}

impl OutgoingMessage {
    /// Build a reply to `event` carrying `text`.
    pub fn reply_to(event: &InboundEvent, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_token: event.reply_token.clone(),
            target: Some(event.conversation_id.clone()),
        }
    }
}
