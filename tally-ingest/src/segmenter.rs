//! Transaction history segmentation.
//!
//! A forward-only state machine over the normalized lines:
//!
//! ```text
//! Scanning --"transaction history"--> InHistory --"totals"--> Done
//! ```
//!
//! Inside the history a line starting with `M/D` opens a record. The lines
//! after it are absorbed as continuation text until the next opener or a
//! "totals" line, which is left for the next step.

use regex::Regex;
use std::sync::LazyLock;
use tally_core::amount::{MONEY_TOKEN, money_tokens};

static DATE_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})\b").expect("date opener regex compiles")
});

const HISTORY_MARKER: &str = "transaction history";
const TOTALS_MARKER: &str = "totals";

/// Minimum length, in characters, of leftover text on an amount line for
/// it to count as description
const MIN_CONTINUATION_TEXT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    InHistory,
    Done,
}

/// One date-bounded record before typing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Index of the opener in the line array
    pub line_index: usize,
    /// The opener line as it appeared
    pub opener: &'a str,
    pub month: u32,
    pub day: u32,
    /// Opener remainder plus continuation text, space-joined
    pub description: String,
    /// Money tokens: the opener's first, then each continuation line's
    pub amount_tokens: Vec<&'a str>,
    /// Character offset of the first digit of the first money token on the
    /// opener line
    pub first_amount_offset: Option<usize>,
}

/// Segmenter output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation<'a> {
    pub records: Vec<RawRecord<'a>>,
    /// State the scanner stopped in
    pub final_state: ScanState,
    /// Date-shaped openers dropped for carrying no amount
    pub dropped: usize,
}

impl Segmentation<'_> {
    pub fn history_found(&self) -> bool {
        self.final_state != ScanState::Scanning
    }
}

fn is_totals(line: &str) -> bool {
    line.to_lowercase().contains(TOTALS_MARKER)
}

/// `(month, day, byte length of the date token)` when the line opens a record
fn match_opener(line: &str) -> Option<(u32, u32, usize)> {
    let caps = DATE_OPENER.captures(line)?;
    let month = caps[1].parse().ok()?;
    let day = caps[2].parse().ok()?;
    Some((month, day, caps.get(0)?.end()))
}

/// Character offset of the first digit of a money match, so a leading
/// `(`, `-` or `$` does not shift the column
fn digit_offset(line: &str, m: regex::Match<'_>) -> usize {
    let lead = m.as_str().find(|c: char| c.is_ascii_digit()).unwrap_or(0);
    line[..m.start() + lead].chars().count()
}

struct Continuation<'a> {
    text: Vec<String>,
    tokens: Vec<&'a str>,
    next: usize,
}

/// Absorb continuation lines starting at `start`. Returns the index of the
/// first line not consumed.
fn absorb<'a>(lines: &[&'a str], start: usize) -> Continuation<'a> {
    let mut text = Vec::new();
    let mut tokens = Vec::new();
    let mut cursor = start;

    while let Some(&line) = lines.get(cursor) {
        if DATE_OPENER.is_match(line) || is_totals(line) {
            break;
        }
        let found = money_tokens(line);
        if found.is_empty() {
            text.push(line.to_string());
        } else {
            tokens.extend(found);
            let leftover = MONEY_TOKEN.replace_all(line, "");
            let leftover = leftover.trim();
            if leftover.chars().count() >= MIN_CONTINUATION_TEXT {
                text.push(leftover.to_string());
            }
        }
        cursor += 1;
    }

    Continuation { text, tokens, next: cursor }
}

/// Build a record from the opener at `index`. Returns the record (if it
/// carried any amount) and the next cursor.
fn open_record<'a>(
    lines: &[&'a str],
    index: usize,
    month: u32,
    day: u32,
    date_len: usize,
) -> (Option<RawRecord<'a>>, usize) {
    let opener = lines[index];
    let seed = opener[date_len..].trim();
    let cont = absorb(lines, index + 1);

    let first_on_opener = MONEY_TOKEN.find(opener);
    let mut amount_tokens = money_tokens(opener);
    amount_tokens.extend(cont.tokens);

    if amount_tokens.is_empty() {
        tracing::debug!(line = index, opener, "date line without amounts dropped");
        return (None, cont.next);
    }

    let mut description = seed.to_string();
    for t in &cont.text {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(t);
    }

    let record = RawRecord {
        line_index: index,
        opener,
        month,
        day,
        description,
        amount_tokens,
        first_amount_offset: first_on_opener.map(|m| digit_offset(opener, m)),
    };
    (Some(record), cont.next)
}

/// Segment the normalized lines into raw records, in textual order
pub fn segment<'a>(lines: &[&'a str]) -> Segmentation<'a> {
    let mut state = ScanState::Scanning;
    let mut cursor = 0;
    let mut records = Vec::new();
    let mut dropped = 0;

    while cursor < lines.len() && state != ScanState::Done {
        let line = lines[cursor];
        let lower = line.to_lowercase();

        match state {
            ScanState::Scanning => {
                if lower.contains(HISTORY_MARKER) {
                    tracing::debug!(line = cursor, "entering transaction history");
                    state = ScanState::InHistory;
                }
                cursor += 1;
            }
            ScanState::InHistory => {
                if lower.contains(HISTORY_MARKER) {
                    cursor += 1;
                } else if lower.contains(TOTALS_MARKER) {
                    tracing::debug!(line = cursor, "transaction history closed");
                    state = ScanState::Done;
                } else if let Some((month, day, date_len)) = match_opener(line) {
                    let (record, next) = open_record(lines, cursor, month, day, date_len);
                    match record {
                        Some(r) => records.push(r),
                        None => dropped += 1,
                    }
                    cursor = next;
                } else {
                    cursor += 1;
                }
            }
            ScanState::Done => break,
        }
    }

    Segmentation {
        records,
        final_state: state,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::text::split_lines;

    #[test]
    fn test_single_opener_with_amount_and_balance() {
        let lines = split_lines(
            "Transaction history\n1/2 NEW Hampton II A Web Pmts 010225 Rvtf31 Carlos Bolivar 514.00 6,926.75\nTotals $514.00",
        );
        let seg = segment(&lines);
        assert_eq!(seg.final_state, ScanState::Done);
        assert_eq!(seg.records.len(), 1);
        let r = &seg.records[0];
        assert_eq!((r.month, r.day), (1, 2));
        assert_eq!(r.amount_tokens, vec!["514.00", "6,926.75"]);
        assert!(r.description.starts_with("NEW Hampton II A Web Pmts"));
        assert_eq!(r.first_amount_offset, Some(59));
    }

    #[test]
    fn test_amount_offset_ignores_sign_and_currency() {
        let lines = split_lines("Transaction history\n1/2 Vendor $514.00\n1/3 Vendor (-$5.00)\n1/4 Vendor 9.00\nTotals");
        let seg = segment(&lines);
        let offsets: Vec<Option<usize>> = seg.records.iter().map(|r| r.first_amount_offset).collect();
        assert_eq!(offsets, vec![Some(12), Some(14), Some(11)]);
    }

    #[test]
    fn test_continuation_lines_extend_description() {
        let lines = split_lines(
            "Transaction history\n\
             1/6 Cvp Community ACH Paymnt Jan 6 004Pmnh2H0112 271.76\n\
             Bolivar-Ortiz\n\
             1/8 Online Transfer Ref #Ib0Qvspbf4 to Signify Business Essential\n\
             730.17 6,293.30\n\
             Card Xxxxxxxxxxxx7817 on 01/08/25\n\
             Totals $5,350.00 $5,174.40",
        );
        let seg = segment(&lines);
        assert_eq!(seg.records.len(), 2);

        assert_eq!(seg.records[0].description, "Cvp Community ACH Paymnt Jan 6 004Pmnh2H0112 271.76 Bolivar-Ortiz");
        assert_eq!(seg.records[0].amount_tokens, vec!["271.76"]);

        let second = &seg.records[1];
        assert_eq!(second.amount_tokens, vec!["730.17", "6,293.30"]);
        assert_eq!(second.first_amount_offset, None);
        assert!(second.description.ends_with("Card Xxxxxxxxxxxx7817 on 01/08/25"));
    }

    #[test]
    fn test_date_line_without_amounts_is_dropped() {
        let lines = split_lines("Transaction history\n1/3 Pending item\nno numbers here\n1/4 Deposit 10.00\nTotals");
        let seg = segment(&lines);
        assert_eq!(seg.dropped, 1);
        assert_eq!(seg.records.len(), 1);
        assert_eq!((seg.records[0].month, seg.records[0].day), (1, 4));
    }

    #[test]
    fn test_no_history_marker_never_leaves_scanning() {
        let lines = split_lines("1/2 Deposit 100.00\n1/3 Payment 50.00");
        let seg = segment(&lines);
        assert_eq!(seg.final_state, ScanState::Scanning);
        assert!(!seg.history_found());
        assert!(seg.records.is_empty());
    }

    #[test]
    fn test_lines_after_totals_are_ignored() {
        let lines = split_lines("Transaction history\n1/2 Deposit 100.00\nTotals 100.00\n1/3 Deposit 5.00");
        let seg = segment(&lines);
        assert_eq!(seg.final_state, ScanState::Done);
        assert_eq!(seg.records.len(), 1);
    }

    #[test]
    fn test_lines_before_history_are_skipped() {
        let lines = split_lines("1/1 Beginning stuff 1.00\nTransaction history\n1/2 Deposit 2.00");
        let seg = segment(&lines);
        assert_eq!(seg.final_state, ScanState::InHistory);
        assert_eq!(seg.records.len(), 1);
        assert_eq!(seg.records[0].amount_tokens, vec!["2.00"]);
    }

    #[test]
    fn test_amount_only_continuation_adds_no_text() {
        let lines = split_lines("Transaction history\n1/6 Deposit Made In A Branch/Store\n149.00\nTotals");
        let seg = segment(&lines);
        assert_eq!(seg.records[0].description, "Deposit Made In A Branch/Store");
        assert_eq!(seg.records[0].amount_tokens, vec!["149.00"]);
    }
}
