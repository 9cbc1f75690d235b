//! # mbot-memory
//!
//! Persistent conversation state for mbot (SQLite-backed).

pub mod audit;
pub mod store;

pub use audit::AuditLogger;
pub use store::Store;
