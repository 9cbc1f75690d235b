//! Audit log: records every command the bot acted on.

use chrono::{DateTime, Utc};
use mbot_core::error::MbotError;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

/// An entry to write to the audit log.
pub struct AuditEntry {
    pub channel: String,
    pub conversation_id: String,
    pub sender_id: Option<String>,
    pub input_text: String,
    /// Command name, `None` for an unparsable `mbot` command.
    pub command: Option<String>,
    pub reply_text: Option<String>,
    pub status: AuditStatus,
    /// When the platform received the message.
    pub timestamp: DateTime<Utc>,
}

/// Status of an audited message.
pub enum AuditStatus {
    /// Command executed.
    Ok,
    /// Command rejected; the reply carries the reason.
    Error,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// Audit logger backed by SQLite.
#[derive(Clone)]
pub struct AuditLogger {
    pool: SqlitePool,
}

impl AuditLogger {
    /// Create a new audit logger sharing the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Write an entry to the audit log.
    pub async fn log(&self, entry: &AuditEntry) -> Result<(), MbotError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO audit_log \
             (id, timestamp, channel, conversation_id, sender_id, input_text, command, reply_text, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
        .bind(&entry.channel)
        .bind(&entry.conversation_id)
        .bind(&entry.sender_id)
        .bind(&entry.input_text)
        .bind(&entry.command)
        .bind(&entry.reply_text)
        .bind(entry.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| MbotError::Memory(format!("audit log write failed: {e}")))?;

        debug!(
            "audit: {} {} [{}] {}",
            entry.channel,
            entry.conversation_id,
            entry.status.as_str(),
            truncate(&entry.input_text, 80)
        );

        Ok(())
    }

    /// Count entries for a conversation.
    pub async fn count_for(&self, conversation_id: &str) -> Result<i64, MbotError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM audit_log WHERE conversation_id = ?")
                .bind(conversation_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| MbotError::Memory(format!("audit count failed: {e}")))?;
        Ok(count)
    }
}

/// Truncate to at most `max` bytes without splitting a character.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("abc", 80), "abc");
        // Each CJK character is three bytes.
        assert_eq!(truncate("學號學號", 4), "學");
    }

    #[tokio::test]
    async fn test_log_and_count() {
        let store = Store::in_memory().await.unwrap();
        let audit = AuditLogger::new(store.pool().clone());

        for status in [AuditStatus::Ok, AuditStatus::Error] {
            audit
                .log(&AuditEntry {
                    channel: "line".to_string(),
                    conversation_id: "C1".to_string(),
                    sender_id: Some("U1".to_string()),
                    input_text: "++學號1".to_string(),
                    command: Some("add".to_string()),
                    reply_text: None,
                    status,
                    timestamp: Utc::now(),
                })
                .await
                .unwrap();
        }

        assert_eq!(audit.count_for("C1").await.unwrap(), 2);
        assert_eq!(audit.count_for("C2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_log_records_event_timestamp() {
        let store = Store::in_memory().await.unwrap();
        let audit = AuditLogger::new(store.pool().clone());
        let received = DateTime::parse_from_rfc3339("2023-11-14T22:13:20Z")
            .unwrap()
            .with_timezone(&Utc);

        audit
            .log(&AuditEntry {
                channel: "line".to_string(),
                conversation_id: "C1".to_string(),
                sender_id: None,
                input_text: "@@".to_string(),
                command: Some("help".to_string()),
                reply_text: None,
                status: AuditStatus::Ok,
                timestamp: received,
            })
            .await
            .unwrap();

        let (timestamp,): (String,) =
            sqlx::query_as("SELECT timestamp FROM audit_log WHERE conversation_id = 'C1'")
                .fetch_one(store.pool())
                .await
                .unwrap();
        assert_eq!(timestamp, "2023-11-14 22:13:20");
    }
}
