//! Command executor: applies a parsed command to a conversation state.
//!
//! Handlers are pure: they read the state they are given and return a
//! [`CommandResult`] holding a replacement state and/or a reply. A failed
//! command never produces a state, so a conversation is left untouched on
//! any error.

mod checkins;
mod settings;


use crate::command::{parse_message, Command};
use crate::error::LedgerError;
use crate::replies;
use crate::state::{CommandResult, ConversationState};
use tracing::debug;

/// Largest roster a `config ids start-end` range may produce.
pub const DEFAULT_MAX_ROSTER_SIZE: usize = 10_000;

/// Bounds applied while executing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorLimits {
    pub max_roster_size: usize,
}

impl Default for ExecutorLimits {
    fn default() -> Self {
        Self {
            max_roster_size: DEFAULT_MAX_ROSTER_SIZE,
        }
    }
}

/// Execute `cmd` against `state` with default limits.
pub fn execute(
    cmd: Command,
    state: &ConversationState,
    payload: &str,
) -> Result<CommandResult, LedgerError> {
    execute_with(cmd, state, payload, &ExecutorLimits::default())
}

/// Execute `cmd` against `state`.
pub fn execute_with(
    cmd: Command,
    state: &ConversationState,
    payload: &str,
    limits: &ExecutorLimits,
) -> Result<CommandResult, LedgerError> {
    match cmd {
        Command::Set => Ok(checkins::set(state, payload)),
        Command::Add => checkins::add(state, payload),
        Command::Show => checkins::show(state),
        Command::Absent => checkins::absent(state),
        Command::Help => Ok(CommandResult::reply(replies::HELP)),
        Command::About => Ok(CommandResult::reply(replies::ABOUT)),
        Command::Format => settings::format(state),
        Command::Example => settings::example(state),
        Command::ConfigFormat => Ok(settings::config_format(state, payload)),
        Command::ConfigExample => Ok(settings::config_example(state, payload)),
        Command::ConfigIds => settings::config_ids(state, payload, limits),
    }
}

/// A message after parsing and execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// The recognized command, if the message was one.
    pub command: Option<Command>,
    pub outcome: Result<CommandResult, LedgerError>,
}

impl Dispatch {
    /// Collapse into a result, turning a failure into a reply with no state change.
    pub fn into_result(self) -> CommandResult {
        self.outcome.unwrap_or_else(|e| {
            debug!("command rejected: {e}");
            CommandResult::reply(e.to_string())
        })
    }
}

/// Parse `text` and run the command it names against `state`.
pub fn dispatch(state: &ConversationState, text: &str, limits: &ExecutorLimits) -> Dispatch {
    match parse_message(text) {
        Ok(parsed) => match parsed.command {
            Some(cmd) => Dispatch {
                command: Some(cmd),
                outcome: execute_with(cmd, state, &parsed.payload, limits),
            },
            None => Dispatch {
                command: None,
                outcome: Ok(CommandResult::default()),
            },
        },
        Err(e) => Dispatch {
            command: None,
            outcome: Err(e),
        },
    }
}

/// Parse and execute one message. Never fails.
///
/// Parser and command errors become a reply carrying the error text, with no
/// state change. Messages that are not commands produce an empty result.
pub fn handle_message(
    state: &ConversationState,
    text: &str,
    limits: &ExecutorLimits,
) -> CommandResult {
    dispatch(state, text, limits).into_result()
}
