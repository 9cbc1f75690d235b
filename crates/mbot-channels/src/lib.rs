//! # mbot-channels
//!
//! Messaging platform integrations for mbot.

pub mod line;
pub mod utils;
