use thiserror::Error;

/// Infrastructure error type for mbot (config, storage, delivery).
#[derive(Debug, Error)]
pub enum MbotError {
    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Conversation state storage error.
    #[error("memory error: {0}")]
    Memory(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a single command against the ledger.
///
/// The `Display` text is what the user sees in the chat, so these messages are
/// part of the bot's protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Verbose `mbot` command with an unknown sub-keyword.
    #[error("無效指令")]
    InvalidCommand,

    /// Check-in for an id that is already on the ledger.
    #[error("學號 {0} 重複簽到")]
    DuplicateId(u64),

    #[error("無簽到記錄")]
    EmptyLedger,

    #[error("尚未設定成員學號")]
    EmptyRoster,

    #[error("無簽到格式")]
    NoFormat,

    #[error("無簽到範例")]
    NoExample,

    /// `config ids` payload is neither a list, a range, nor `clear`.
    #[error("學號格式錯誤")]
    BadIdSpec,
}
