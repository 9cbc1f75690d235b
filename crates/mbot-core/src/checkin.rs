//! Check-in extraction from free-form chat text.
//!
//! A check-in is a paragraph containing the marker [`ID_MARKER`] followed, on
//! the same line, by a run of digits: e.g. `姓名 王小明 學號: 17`. Paragraphs are
//! separated by blank lines, and anything without an id (headers, chatter) is
//! ignored.

use crate::state::CheckIn;

/// Text that precedes an identifier on a check-in line.
pub const ID_MARKER: &str = "學號";

/// Extract the identifier from a block of text.
///
/// Lines are scanned bottom-up and the last matching line wins. Within a line,
/// the last marker that is followed by digits is used and the first digit run
/// after it becomes the id. Digit runs too large for `u64` do not match.
pub fn extract_id(text: &str) -> Option<u64> {
    text.lines().rev().find_map(id_in_line)
}

fn id_in_line(line: &str) -> Option<u64> {
    let run = line
        .rmatch_indices(ID_MARKER)
        .find_map(|(at, marker)| first_digit_run(&line[at + marker.len()..]))?;
    run.parse().ok()
}

fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Split text into paragraphs separated by two or more consecutive newlines.
pub fn split_blocks(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\n' {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < bytes.len() && bytes[i] == b'\n' {
            i += 1;
        }
        if i - run_start >= 2 {
            blocks.push(&text[start..run_start]);
            start = i;
        }
    }
    blocks.push(&text[start..]);

    blocks
}

/// Parse every check-in in `text`, sorted ascending by id.
///
/// Blocks without an id are dropped. Duplicate ids within one input are kept
/// in input order.
pub fn parse_check_ins(text: &str) -> Vec<CheckIn> {
    let mut check_ins: Vec<CheckIn> = split_blocks(text)
        .into_iter()
        .filter_map(|block| {
            extract_id(block).map(|id| CheckIn {
                id,
                text: block.to_string(),
            })
        })
        .collect();
    check_ins.sort_by_key(|c| c.id);
    check_ins
}
