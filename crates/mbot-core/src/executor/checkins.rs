//! Ledger commands: set, add, show, absent.

use crate::checkin::parse_check_ins;
use crate::error::LedgerError;
use crate::replies;
use crate::state::{CommandResult, ConversationState};

/// Reply when an `add` payload holds no recognizable check-in.
pub(super) const NOTHING_TO_ADD: &str = "訊息中無有效學號";

pub(super) fn set(state: &ConversationState, payload: &str) -> CommandResult {
    let check_ins = parse_check_ins(payload);
    CommandResult::update(state.with_check_ins(check_ins), replies::SET_DONE)
}

pub(super) fn add(state: &ConversationState, payload: &str) -> Result<CommandResult, LedgerError> {
    let new_check_ins = parse_check_ins(payload);
    if new_check_ins.is_empty() {
        return Ok(CommandResult::reply(NOTHING_TO_ADD));
    }

    // `new_check_ins` is sorted, so a repeat inside the payload is adjacent.
    let mut prev = None;
    for check_in in &new_check_ins {
        if prev == Some(check_in.id) || state.has_checked_in(check_in.id) {
            return Err(LedgerError::DuplicateId(check_in.id));
        }
        prev = Some(check_in.id);
    }

    let new_ids: Vec<u64> = new_check_ins.iter().map(|c| c.id).collect();
    let mut merged = state.check_ins.clone();
    merged.extend(new_check_ins);
    merged.sort_by_key(|c| c.id);

    Ok(CommandResult::update(
        state.with_check_ins(merged),
        replies::checked_in(&new_ids),
    ))
}

pub(super) fn show(state: &ConversationState) -> Result<CommandResult, LedgerError> {
    if state.check_ins.is_empty() {
        return Err(LedgerError::EmptyLedger);
    }

    let text = state
        .check_ins
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    Ok(CommandResult::reply(text))
}

pub(super) fn absent(state: &ConversationState) -> Result<CommandResult, LedgerError> {
    if state.roster.is_empty() {
        return Err(LedgerError::EmptyRoster);
    }

    let missing: Vec<u64> = state
        .roster
        .iter()
        .copied()
        .filter(|id| !state.has_checked_in(*id))
        .collect();

    if missing.is_empty() {
        Ok(CommandResult::reply(replies::ALL_PRESENT))
    } else {
        Ok(CommandResult::reply(replies::absent(&missing)))
    }
}
