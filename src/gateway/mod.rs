//! Gateway: connects inbound events, the state store, the ledger, and channels.
//!
//! For each event: load the conversation state, run the message through the
//! ledger, persist any new state, deliver any reply, and audit the outcome.

mod locks;


use locks::ConversationLocks;

use mbot_core::{
    command::Command,
    dispatch,
    error::MbotError,
    message::{InboundEvent, OutgoingMessage},
    state::{CommandResult, ConversationState},
    traits::{Channel, StateStore},
    ExecutorLimits,
};
use mbot_memory::audit::{AuditEntry, AuditLogger, AuditStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// What happened to one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub command: Option<Command>,
    pub status: Status,
    pub result: CommandResult,
}

/// Outcome class of one message, as recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Rejected,
    Ignored,
}

/// Counts for one webhook batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub handled: usize,
    pub failed: usize,
}

/// The central gateway that routes messages between channels and the ledger.
pub struct Gateway {
    store: Arc<dyn StateStore>,
    channels: HashMap<String, Arc<dyn Channel>>,
    audit: Option<AuditLogger>,
    limits: ExecutorLimits,
    /// `None` keeps the unsynchronized load/save behavior (last write wins).
    locks: Option<ConversationLocks>,
}

impl Gateway {
    /// Create a new gateway. Channels are keyed by [`Channel::name`].
    pub fn new(
        store: Arc<dyn StateStore>,
        channels: Vec<Arc<dyn Channel>>,
        audit: Option<AuditLogger>,
        limits: ExecutorLimits,
        serialize_conversations: bool,
    ) -> Self {
        let channels = channels
            .into_iter()
            .map(|channel| (channel.name().to_string(), channel))
            .collect();
        Self {
            store,
            channels,
            audit,
            limits,
            locks: serialize_conversations.then(ConversationLocks::new),
        }
    }

    /// Channel names, for startup logging.
    pub fn channel_names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    /// Run `text` against the stored state of `conversation_id` and persist
    /// the new state, if any. Does not deliver the reply.
    pub async fn apply(&self, conversation_id: &str, text: &str) -> Result<Applied, MbotError> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.lock(conversation_id).await),
            None => None,
        };

        let state = match self.store.get_state(conversation_id).await {
            Ok(state) => state.unwrap_or_default(),
            // An unreadable document must not lock the conversation out; the
            // next command that produces a state overwrites it.
            Err(MbotError::Serialization(e)) => {
                warn!("unreadable state for {conversation_id}, starting fresh: {e}");
                ConversationState::default()
            }
            Err(e) => return Err(e),
        };

        let dispatched = dispatch(&state, text, &self.limits);
        let command = dispatched.command;
        let status = match (&dispatched.outcome, command) {
            (Err(_), _) => Status::Rejected,
            (Ok(_), None) => Status::Ignored,
            (Ok(_), Some(_)) => Status::Ok,
        };
        let result = dispatched.into_result();

        if let Some(new_state) = &result.state {
            self.store.set_state(conversation_id, new_state).await?;
        }

        Ok(Applied {
            command,
            status,
            result,
        })
    }

    /// Handle one inbound event end to end.
    pub async fn handle_event(&self, event: &InboundEvent) -> Result<Applied, MbotError> {
        let applied = self.apply(&event.conversation_id, &event.text).await?;

        // Ordinary chat: nothing to send, nothing to record.
        let audit_status = match applied.status {
            Status::Ignored => return Ok(applied),
            Status::Ok => AuditStatus::Ok,
            Status::Rejected => AuditStatus::Error,
        };

        let delivered = match &applied.result.reply {
            Some(reply) => self.deliver(event, reply).await,
            None => Ok(()),
        };
        // The state is already saved, so a failed delivery is still recorded.
        let audit_status = if delivered.is_err() {
            AuditStatus::Error
        } else {
            audit_status
        };

        info!(
            "{}:{} {} [{}]",
            event.channel,
            event.conversation_id,
            applied.command.map_or("-", |c| c.as_str()),
            audit_status.as_str()
        );

        self.audit(event, &applied, audit_status).await;
        delivered.map(|()| applied)
    }

    async fn deliver(&self, event: &InboundEvent, reply: &str) -> Result<(), MbotError> {
        let channel = self.channels.get(&event.channel).ok_or_else(|| {
            MbotError::Channel(format!("channel '{}' not configured", event.channel))
        })?;
        channel
            .send(OutgoingMessage::reply_to(event, reply.to_string()))
            .await
    }

    /// Handle a batch of events concurrently. Each event succeeds or fails on its own.
    pub async fn handle_batch(self: &Arc<Self>, events: Vec<InboundEvent>) -> BatchReport {
        let mut set = JoinSet::new();
        for event in events {
            let gw = Arc::clone(self);
            set.spawn(async move {
                let result = gw.handle_event(&event).await;
                (event, result)
            });
        }

        let mut report = BatchReport::default();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(_))) => report.handled += 1,
                Ok((event, Err(e))) => {
                    error!(
                        "failed to handle {}:{}: {e}",
                        event.channel, event.conversation_id
                    );
                    report.failed += 1;
                }
                Err(e) => {
                    error!("event task panicked: {e}");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Record a handled command. Best-effort.
    async fn audit(&self, event: &InboundEvent, applied: &Applied, status: AuditStatus) {
        let Some(audit) = &self.audit else {
            return;
        };
        let entry = AuditEntry {
            channel: event.channel.clone(),
            conversation_id: event.conversation_id.clone(),
            sender_id: event.sender_id.clone(),
            input_text: event.text.clone(),
            command: applied.command.map(|c| c.as_str().to_string()),
            reply_text: applied.result.reply.clone(),
            status,
            timestamp: event.timestamp,
        };
        if let Err(e) = audit.log(&entry).await {
            warn!("audit log failed: {e}");
        }
    }
}
