use super::*;

fn parse(text: &str) -> ParsedMessage {
    parse_message(text).unwrap()
}

#[test]
fn test_parse_all_quick_commands() {
    assert_eq!(parse("++").command, Some(Command::Add));
    assert_eq!(parse("==").command, Some(Command::Set));
    assert_eq!(parse(">>").command, Some(Command::Show));
    assert_eq!(parse("--").command, Some(Command::Absent));
    assert_eq!(parse("@@").command, Some(Command::Help));
    assert_eq!(parse("??").command, Some(Command::Format));
    assert_eq!(parse("!!").command, Some(Command::Example));
}

#[test]
fn test_quick_payload_is_trimmed() {
    let parsed = parse("++  學號1 ok \n");
    assert_eq!(parsed, ParsedMessage::new(Command::Add, "學號1 ok"));
}

#[test]
fn test_quick_payload_keeps_inner_newlines() {
    let parsed = parse("==\n學號 1\n\n學號 2\n");
    assert_eq!(parsed.command, Some(Command::Set));
    assert_eq!(parsed.payload, "學號 1\n\n學號 2");
}

#[test]
fn test_quick_prefix_must_be_at_start() {
    assert_eq!(parse(" ++學號1"), ParsedMessage::default());
    assert_eq!(parse("+"), ParsedMessage::default());
}

#[test]
fn test_quick_prefix_counts_characters_not_bytes() {
    // A multi-byte first character must not be sliced mid-codepoint.
    assert_eq!(parse("學號1"), ParsedMessage::default());
    assert_eq!(parse("é+"), ParsedMessage::default());
}

#[test]
fn test_parse_all_verbose_commands() {
    assert_eq!(parse("mbot set").command, Some(Command::Set));
    assert_eq!(parse("mbot add").command, Some(Command::Add));
    assert_eq!(parse("mbot show").command, Some(Command::Show));
    assert_eq!(parse("mbot absent").command, Some(Command::Absent));
    assert_eq!(parse("mbot help").command, Some(Command::Help));
    assert_eq!(parse("mbot about").command, Some(Command::About));
    assert_eq!(parse("mbot format").command, Some(Command::Format));
    assert_eq!(parse("mbot example").command, Some(Command::Example));
    assert_eq!(
        parse("mbot config format").command,
        Some(Command::ConfigFormat)
    );
    assert_eq!(
        parse("mbot config example").command,
        Some(Command::ConfigExample)
    );
    assert_eq!(parse("mbot config ids").command, Some(Command::ConfigIds));
}

#[test]
fn test_verbose_payload() {
    assert_eq!(
        parse("mbot add 學號1 ok"),
        ParsedMessage::new(Command::Add, "學號1 ok")
    );
    assert_eq!(
        parse("mbot   config   ids   1-30  "),
        ParsedMessage::new(Command::ConfigIds, "1-30")
    );
}

#[test]
fn test_verbose_keyword_split_on_newline_when_no_space() {
    assert_eq!(
        parse("mbot config\nformat\n姓名\n學號"),
        ParsedMessage::new(Command::ConfigFormat, "姓名\n學號")
    );
}

#[test]
fn test_verbose_keyword_prefers_first_space_over_newline() {
    // The space on the second line wins, so the keyword swallows the newline.
    assert_eq!(
        parse_message("mbot add\n學號1 ok"),
        Err(LedgerError::InvalidCommand)
    );
}

#[test]
fn test_verbose_unknown_keyword_is_invalid() {
    assert_eq!(parse_message("mbot dance"), Err(LedgerError::InvalidCommand));
    assert_eq!(parse_message("mbot"), Err(LedgerError::InvalidCommand));
    assert_eq!(parse_message("mbotx"), Err(LedgerError::InvalidCommand));
}

#[test]
fn test_entry_keyword_needs_no_trailing_space() {
    assert_eq!(parse("mbotadd 學號1"), ParsedMessage::new(Command::Add, "學號1"));
}

#[test]
fn test_verbose_keywords_are_case_sensitive() {
    assert_eq!(parse_message("mbot ADD"), Err(LedgerError::InvalidCommand));
    assert_eq!(parse("MBOT add"), ParsedMessage::default());
}

#[test]
fn test_unknown_config_keyword_is_ignored() {
    assert_eq!(parse("mbot config colour red"), ParsedMessage::default());
    assert_eq!(parse("mbot config"), ParsedMessage::default());
}

#[test]
fn test_plain_chat_is_ignored() {
    assert_eq!(parse("good morning"), ParsedMessage::default());
    assert_eq!(parse(""), ParsedMessage::default());
    assert_eq!(parse("學號 5 here"), ParsedMessage::default());
}

#[test]
fn test_quick_takes_priority_over_verbose() {
    assert_eq!(parse("++mbot add"), ParsedMessage::new(Command::Add, "mbot add"));
}
