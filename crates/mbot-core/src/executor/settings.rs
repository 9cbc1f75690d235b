//! Conversation settings: format template, example, and roster.

use super::ExecutorLimits;
use crate::error::LedgerError;
use crate::replies;
use crate::state::{CommandResult, ConversationState};

pub(super) fn format(state: &ConversationState) -> Result<CommandResult, LedgerError> {
    if state.format.is_empty() {
        return Err(LedgerError::NoFormat);
    }
    Ok(CommandResult::reply(state.format.clone()))
}

pub(super) fn example(state: &ConversationState) -> Result<CommandResult, LedgerError> {
    if state.example.is_empty() {
        return Err(LedgerError::NoExample);
    }
    Ok(CommandResult::reply(state.example.clone()))
}

pub(super) fn config_format(state: &ConversationState, payload: &str) -> CommandResult {
    CommandResult::update(state.with_format(payload), replies::FORMAT_SET)
}

pub(super) fn config_example(state: &ConversationState, payload: &str) -> CommandResult {
    CommandResult::update(state.with_example(payload), replies::EXAMPLE_SET)
}

/// Set the roster from `1,2,3`, `1-30`, or `clear`, checked in that order.
pub(super) fn config_ids(
    state: &ConversationState,
    payload: &str,
    limits: &ExecutorLimits,
) -> Result<CommandResult, LedgerError> {
    let roster = if payload.contains(',') {
        parse_id_list(payload)?
    } else if payload.contains('-') {
        parse_id_range(payload, limits.max_roster_size)?
    } else if payload.contains("clear") {
        return Ok(CommandResult::update(
            state.with_roster(Vec::new()),
            replies::ROSTER_CLEARED,
        ));
    } else {
        return Err(LedgerError::BadIdSpec);
    };

    if roster.len() > limits.max_roster_size {
        return Err(LedgerError::BadIdSpec);
    }
    Ok(CommandResult::update(
        state.with_roster(roster),
        replies::roster_set(payload),
    ))
}

/// `5, 3, 3` → `[5, 3, 3]`. Order and repeats are kept.
fn parse_id_list(list: &str) -> Result<Vec<u64>, LedgerError> {
    list.split(',')
        .map(|id| id.trim().parse().map_err(|_| LedgerError::BadIdSpec))
        .collect()
}

/// `1-3` → `[1, 2, 3]`.
fn parse_id_range(range: &str, max_len: usize) -> Result<Vec<u64>, LedgerError> {
    let (start, end) = range.split_once('-').ok_or(LedgerError::BadIdSpec)?;
    let start: u64 = start.trim().parse().map_err(|_| LedgerError::BadIdSpec)?;
    let end: u64 = end.trim().parse().map_err(|_| LedgerError::BadIdSpec)?;

    if start > end || end - start >= max_len as u64 {
        return Err(LedgerError::BadIdSpec);
    }
    Ok((start..=end).collect())
}
