//! # mbot-core
//!
//! Command parser, check-in ledger, configuration, and error handling for mbot.
//!
//! Everything under [`checkin`], [`command`], and [`executor`] is pure: no I/O,
//! no shared state. Callers load a [`state::ConversationState`], hand it in
//! together with the raw message text, and persist whatever comes back.

pub mod checkin;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod message;
pub mod replies;
pub mod state;
pub mod traits;

pub use config::shellexpand;
pub use executor::{dispatch, execute, handle_message, Dispatch, ExecutorLimits};
