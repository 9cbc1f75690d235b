//! LINE Messaging API channel.
//!
//! Inbound events arrive on the webhook (see [`parse_webhook`] and
//! [`verify_signature`]); replies go out through the reply or push endpoint.
//! Docs: <https://developers.line.biz/en/reference/messaging-api/>

mod send;
mod signature;
pub(crate) mod types;


pub use signature::{sign, verify_signature, SIGNATURE_HEADER};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use mbot_core::{
    config::LineConfig,
    error::MbotError,
    message::{InboundEvent, OutgoingMessage},
    traits::Channel,
};
use tracing::debug;
use types::{EventSource, WebhookBody, WebhookEvent};

/// Channel name used in events and the audit log.
pub const CHANNEL_NAME: &str = "line";

/// LINE channel using the Messaging API.
pub struct LineChannel {
    config: LineConfig,
    client: reqwest::Client,
    base_url: String,
}

impl LineChannel {
    /// Create a new LINE channel from config.
    pub fn new(config: LineConfig) -> Self {
        let base_url = config.api_base_url.trim_end_matches('/').to_string();
        Self {
            config,
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl Channel for LineChannel {
    fn name(&self) -> &str {
        CHANNEL_NAME
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), MbotError> {
        match (&message.reply_token, &message.target) {
            (Some(token), _) => self.reply(token, &message.text).await,
            (None, Some(target)) => self.push(target, &message.text).await,
            (None, None) => Err(MbotError::Channel(
                "line message has neither reply token nor target".to_string(),
            )),
        }
    }
}

/// Parse a webhook request body into the text messages it carries.
///
/// Non-message events (follow, join, postback, ...) and non-text messages
/// (stickers, images, ...) are skipped.
pub fn parse_webhook(body: &[u8]) -> Result<Vec<InboundEvent>, MbotError> {
    let body: WebhookBody = serde_json::from_slice(body)?;
    let events: Vec<InboundEvent> = body.events.into_iter().filter_map(to_inbound).collect();
    debug!("line webhook: {} text message(s)", events.len());
    Ok(events)
}

fn to_inbound(event: WebhookEvent) -> Option<InboundEvent> {
    if event.event_type != "message" {
        return None;
    }
    let message = event.message?;
    if message.message_type != "text" {
        return None;
    }
    let source = event.source?;
    let conversation_id = conversation_id(&source)?;

    Some(InboundEvent {
        channel: CHANNEL_NAME.to_string(),
        conversation_id,
        text: message.text.unwrap_or_default(),
        reply_token: event.reply_token,
        sender_id: source.user_id,
        timestamp: timestamp(event.timestamp),
    })
}

/// Group chats are keyed by group or room, one-to-one chats by user.
fn conversation_id(source: &EventSource) -> Option<String> {
    let id = match source.source_type.as_str() {
        "group" => source.group_id.as_ref(),
        "room" => source.room_id.as_ref(),
        _ => source.user_id.as_ref(),
    };
    id.cloned()
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(Utc::now)
}
