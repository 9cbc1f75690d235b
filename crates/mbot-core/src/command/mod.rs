//! Command parser: classifies one chat message into a [`Command`] and payload.
//!
//! Two syntaxes are accepted:
//! - quick commands: a two-character prefix such as `++` or `>>`
//! - verbose commands: `mbot <keyword> [payload]`, with one nested level under
//!   `mbot config <keyword> [payload]`
//!
//! Anything else is ordinary chat and parses to no command.

#[cfg(test)]
mod tests;

use crate::error::LedgerError;
use tracing::debug;

/// Keyword that opens a verbose command.
pub const ENTRY_KEYWORD: &str = "mbot";

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Set,
    Add,
    Show,
    Absent,
    Help,
    About,
    Format,
    Example,
    ConfigFormat,
    ConfigExample,
    ConfigIds,
}

impl Command {
    /// Map a quick-command prefix.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "++" => Some(Self::Add),
            "==" => Some(Self::Set),
            ">>" => Some(Self::Show),
            "--" => Some(Self::Absent),
            "@@" => Some(Self::Help),
            "??" => Some(Self::Format),
            "!!" => Some(Self::Example),
            _ => None,
        }
    }

    /// Map a `mbot config <keyword>` sub-keyword.
    pub fn from_config_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "format" => Some(Self::ConfigFormat),
            "example" => Some(Self::ConfigExample),
            "ids" => Some(Self::ConfigIds),
            _ => None,
        }
    }

    /// Stable lowercase name, used in logs and the audit trail.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Add => "add",
            Self::Show => "show",
            Self::Absent => "absent",
            Self::Help => "help",
            Self::About => "about",
            Self::Format => "format",
            Self::Example => "example",
            Self::ConfigFormat => "config_format",
            Self::ConfigExample => "config_example",
            Self::ConfigIds => "config_ids",
        }
    }
}

/// First-level verbose keyword: a command, or the `config` group.
enum Keyword {
    Command(Command),
    Config,
}

impl Keyword {
    fn parse(keyword: &str) -> Option<Self> {
        let cmd = match keyword {
            "set" => Command::Set,
            "add" => Command::Add,
            "show" => Command::Show,
            "absent" => Command::Absent,
            "help" => Command::Help,
            "about" => Command::About,
            "format" => Command::Format,
            "example" => Command::Example,
            "config" => return Some(Self::Config),
            _ => return None,
        };
        Some(Self::Command(cmd))
    }
}

/// A classified message. `command == None` means "not for the bot".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedMessage {
    pub command: Option<Command>,
    pub payload: String,
}

impl ParsedMessage {
    fn new(command: Command, payload: &str) -> Self {
        Self {
            command: Some(command),
            payload: payload.to_string(),
        }
    }

    fn ignored() -> Self {
        Self::default()
    }
}

/// Parse a message into a command and its payload.
///
/// Only fails for a verbose command whose first keyword is unknown. An unknown
/// keyword after `mbot config` is not an error and yields no command.
pub fn parse_message(text: &str) -> Result<ParsedMessage, LedgerError> {
    if let Some(parsed) = parse_quick(text) {
        debug!("quick command {}", parsed.command.map_or("-", |c| c.as_str()));
        return Ok(parsed);
    }

    let Some(rest) = text.strip_prefix(ENTRY_KEYWORD) else {
        return Ok(ParsedMessage::ignored());
    };

    let (keyword, payload) = split_keyword(rest.trim());
    let parsed = match Keyword::parse(keyword).ok_or(LedgerError::InvalidCommand)? {
        Keyword::Command(cmd) => ParsedMessage::new(cmd, payload),
        Keyword::Config => {
            let (keyword, payload) = split_keyword(payload);
            match Command::from_config_keyword(keyword) {
                Some(cmd) => ParsedMessage::new(cmd, payload),
                None => ParsedMessage::ignored(),
            }
        }
    };
    debug!(
        "verbose command {}",
        parsed.command.map_or("-", |c| c.as_str())
    );
    Ok(parsed)
}

fn parse_quick(text: &str) -> Option<ParsedMessage> {
    let mut chars = text.char_indices();
    let (_, first) = chars.next()?;
    let (_, second) = chars.next()?;
    let rest = chars.next().map_or("", |(at, _)| &text[at..]);

    let symbol: String = [first, second].iter().collect();
    let cmd = Command::from_symbol(&symbol)?;
    Some(ParsedMessage::new(cmd, rest.trim()))
}

/// Split off the leading keyword.
///
/// The keyword ends at the first space, or failing that the first newline, or
/// failing that the end of the text. The rest is trimmed.
fn split_keyword(text: &str) -> (&str, &str) {
    let at = text
        .find(' ')
        .or_else(|| text.find('\n'))
        .unwrap_or(text.len());
    (&text[..at], text[at..].trim())
}
