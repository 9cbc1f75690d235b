//! Message sending: reply and push.

use super::LineChannel;
use crate::utils::split_message;
use mbot_core::error::MbotError;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Longest text a single LINE text message may carry.
pub(crate) const MAX_TEXT_CHARS: usize = 5000;

/// Most messages a single reply or push request may carry.
pub(crate) const MAX_MESSAGES: usize = 5;

impl LineChannel {
    /// Answer a message using its reply token.
    pub(crate) async fn reply(&self, reply_token: &str, text: &str) -> Result<(), MbotError> {
        let body = json!({
            "replyToken": reply_token,
            "messages": text_messages(text),
        });
        self.post("/v2/bot/message/reply", &body).await
    }

    /// Push a message to a user, group, or room.
    pub(crate) async fn push(&self, to: &str, text: &str) -> Result<(), MbotError> {
        let body = json!({
            "to": to,
            "messages": text_messages(text),
        });
        self.post("/v2/bot/message/push", &body).await?;
        info!("line push delivered to {to}");
        Ok(())
    }

    async fn post(&self, path: &str, body: &Value) -> Result<(), MbotError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.config.channel_access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| MbotError::Channel(format!("line send failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(MbotError::Channel(format!(
                "line send failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }
}

/// Build the `messages` array for `text`, splitting it across text messages.
pub(crate) fn text_messages(text: &str) -> Vec<Value> {
    let mut chunks = split_message(text, MAX_TEXT_CHARS);
    if chunks.len() > MAX_MESSAGES {
        warn!(
            "line reply needs {} messages, truncating to {MAX_MESSAGES}",
            chunks.len()
        );
        chunks.truncate(MAX_MESSAGES);
    }

    chunks
        .into_iter()
        .map(|chunk| json!({ "type": "text", "text": chunk }))
        .collect()
}
