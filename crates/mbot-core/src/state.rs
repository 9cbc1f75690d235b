//! Conversation state and command results.
//!
//! States are values: transitions build a new [`ConversationState`] from an
//! old one plus a delta and never touch the original.

use serde::{Deserialize, Deserializer, Serialize};

/// One person's attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: u64,
    /// The block exactly as it was submitted.
    #[serde(rename = "message")]
    pub text: String,
}

/// Everything mbot remembers about one conversation.
///
/// Serialized field names match the JSON documents written by earlier
/// deployments, so existing records load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    /// Ledger, sorted ascending by id with unique ids.
    #[serde(default)]
    pub check_ins: Vec<CheckIn>,
    /// Expected ids, in the order they were configured.
    #[serde(default, rename = "ids", deserialize_with = "roster_ids")]
    pub roster: Vec<u64>,
    /// Check-in format template shown by `??`.
    #[serde(default)]
    pub format: String,
    /// Example check-in shown by `!!`.
    #[serde(default)]
    pub example: String,
}

/// Older documents can hold `null` where an id failed to parse; those are dropped.
fn roster_ids<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids: Vec<Option<u64>> = Vec::deserialize(deserializer)?;
    Ok(ids.into_iter().flatten().collect())
}

impl ConversationState {
    pub fn with_check_ins(&self, check_ins: Vec<CheckIn>) -> Self {
        Self {
            check_ins,
            ..self.clone()
        }
    }

    pub fn with_roster(&self, roster: Vec<u64>) -> Self {
        Self {
            roster,
            ..self.clone()
        }
    }

    pub fn with_format(&self, format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..self.clone()
        }
    }

    pub fn with_example(&self, example: impl Into<String>) -> Self {
        Self {
            example: example.into(),
            ..self.clone()
        }
    }

    /// Whether `id` already has a check-in.
    pub fn has_checked_in(&self, id: u64) -> bool {
        self.check_ins.binary_search_by_key(&id, |c| c.id).is_ok()
    }
}

/// Outcome of a command: an optional replacement state and an optional reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// `None` means the stored state stays as it is.
    pub state: Option<ConversationState>,
    /// `None` means nothing is sent back.
    pub reply: Option<String>,
}

impl CommandResult {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            state: None,
            reply: Some(text.into()),
        }
    }

    pub fn update(state: ConversationState, text: impl Into<String>) -> Self {
        Self {
            state: Some(state),
            reply: Some(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_empty() {
        let state = ConversationState::default();
        assert!(state.check_ins.is_empty());
        assert!(state.roster.is_empty());
        assert!(state.format.is_empty());
        assert!(state.example.is_empty());
    }

    #[test]
    fn test_with_constructors_leave_source_untouched() {
        let original = ConversationState::default().with_format("fmt");
        let derived = original.with_roster(vec![1, 2]).with_example("ex");

        assert!(original.roster.is_empty());
        assert!(original.example.is_empty());
        assert_eq!(derived.format, "fmt");
        assert_eq!(derived.roster, vec![1, 2]);
        assert_eq!(derived.example, "ex");
    }

    #[test]
    fn test_state_json_layout() {
        let state = ConversationState {
            check_ins: vec![CheckIn {
                id: 7,
                text: "學號7".to_string(),
            }],
            roster: vec![7, 8],
            format: "f".to_string(),
            example: "e".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["checkIns"][0]["id"], 7);
        assert_eq!(json["checkIns"][0]["message"], "學號7");
        assert_eq!(json["ids"], serde_json::json!([7, 8]));

        let back: ConversationState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_state_missing_fields_default() {
        let state: ConversationState = serde_json::from_str(r#"{"format": "x"}"#).unwrap();
        assert_eq!(state.format, "x");
        assert!(state.check_ins.is_empty());
        assert!(state.roster.is_empty());
    }

    #[test]
    fn test_state_roster_skips_null_ids() {
        let state: ConversationState =
            serde_json::from_str(r#"{"checkIns":[],"ids":[1,null,3]}"#).unwrap();
        assert_eq!(state.roster, vec![1, 3]);
    }

    #[test]
    fn test_has_checked_in() {
        let state = ConversationState::default().with_check_ins(vec![
            CheckIn {
                id: 2,
                text: String::new(),
            },
            CheckIn {
                id: 5,
                text: String::new(),
            },
        ]);
        assert!(state.has_checked_in(5));
        assert!(!state.has_checked_in(3));
    }
}
