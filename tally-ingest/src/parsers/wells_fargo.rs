//! Wells Fargo business checking statement parser (text)
//!
//! Expected extracted-text layout:
//!   Beginning balance on 1/2 $6,412.75
//!   Deposits/Credits 1,900.00
//!   Withdrawals/Debits - 3,274.93
//!   Ending balance on 1/31 $5,037.82
//!   Transaction history
//!   1/2 NEW Hampton II A Web Pmts 010225 Rvtf31 Carlos Bolivar 514.00 6,926.75
//!   1/6 Cvp Community ACH Paymnt Jan 6 004Pmnh2H0112 271.76
//!   Bolivar-Ortiz
//!   Totals $1,900.00 $3,274.93

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;
use tally_core::{
    AuditConfig, NormalizedText, ParsedStatement, ParsedTransaction, StatementSummary, audit,
    categorize, normalize_amount, summarize_description,
};

use crate::direction::{DirectionConfig, classify_direction};
use crate::metadata::extract_metadata;
use crate::segmenter::{RawRecord, segment};
use crate::types::{ParseOptions, StatementParse};

static CHECK_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{3,6})\s+check\b|\bcheck\s*(?:no\.?|#)?\s*(\d{3,6})(?:\s|$)")
        .expect("check number regex compiles")
});

/// `1043 Check ...`, `Check 1043`, `CHECK # 1043`, `Check No. 1043`
fn check_number(description: &str) -> Option<String> {
    let caps = CHECK_NUMBER.captures(description)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn build_transaction(
    record: &RawRecord<'_>,
    year: i32,
    direction: &DirectionConfig,
) -> Option<ParsedTransaction> {
    let Some(date) = NaiveDate::from_ymd_opt(year, record.month, record.day) else {
        tracing::warn!(
            line = record.line_index,
            month = record.month,
            day = record.day,
            year,
            "not a calendar date; record dropped"
        );
        return None;
    };

    let amounts: Vec<Decimal> = record
        .amount_tokens
        .iter()
        .map(|t| normalize_amount(t))
        .collect();
    let amount = *amounts.first()?;
    // Tokens between the first and the last are not used
    let balance = if amounts.len() > 1 { amounts.last().copied() } else { None };

    let verdict = classify_direction(&record.description, record.first_amount_offset, direction);
    let description = summarize_description(&record.description);
    let category = categorize(&description).category;

    Some(ParsedTransaction {
        date,
        check_number: check_number(&record.description),
        description,
        amount,
        direction: verdict.direction(),
        balance,
        category,
        needs_review: verdict.needs_review(),
    })
}

/// Parse extracted statement text into metadata and typed transactions.
///
/// Never fails: missing metadata falls back to defaults and a missing
/// history section yields an empty list.
pub fn parse_wells_fargo_text(text: &str, options: &ParseOptions) -> StatementParse {
    let norm = NormalizedText::new(text, options.header_window);
    let scan = extract_metadata(
        &norm,
        options.resolved_year_hint(),
        options.year_min,
        options.year_max,
    );
    let seg = segment(&norm.lines);

    let year = scan.metadata.year;
    let mut dropped = seg.dropped;
    let mut transactions = Vec::with_capacity(seg.records.len());
    for record in &seg.records {
        match build_transaction(record, year, &options.direction) {
            Some(t) => transactions.push(t),
            None => dropped += 1,
        }
    }

    if !seg.history_found() {
        tracing::debug!("no transaction history section found");
    }

    StatementParse {
        metadata: scan.metadata,
        transactions,
        history_found: seg.history_found(),
        dropped_lines: dropped,
    }
}

/// Parse with keyword categories and audit the result
pub fn parse_statement(
    text: &str,
    options: &ParseOptions,
    audit_config: &AuditConfig,
) -> ParsedStatement {
    let parsed = parse_wells_fargo_text(text, options);
    let verdict = audit(&parsed.metadata, &parsed.transactions, audit_config);
    ParsedStatement {
        summary: StatementSummary::new(parsed.metadata, verdict),
        transactions: parsed.transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::BelowThreshold;
    use rust_decimal_macros::dec;
    use std::path::PathBuf;
    use tally_core::{Category, Direction};

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("fixtures/wells_fargo_2025_01.txt")
    }

    fn fixture() -> String {
        std::fs::read_to_string(fixture_path()).expect("fixture statement readable")
    }

    fn opts() -> ParseOptions {
        ParseOptions::default().with_year_hint(2020)
    }

    #[test]
    fn test_hampton_line() {
        let text = "Transaction history\n1/2 NEW Hampton II A Web Pmts 010225 Rvtf31 Carlos Bolivar 514.00 6,926.75\nTotals";
        let parsed = parse_wells_fargo_text(text, &ParseOptions::default().with_year_hint(2025));
        assert_eq!(parsed.transactions.len(), 1);
        let t = &parsed.transactions[0];
        assert_eq!(t.date.to_string(), "2025-01-02");
        assert_eq!(t.direction, Direction::Withdrawal);
        assert_eq!(t.amount, dec!(514.00));
        assert_eq!(t.balance, Some(dec!(6926.75)));
        assert!(!t.needs_review);
    }

    #[test]
    fn test_fixture_metadata() {
        let parsed = parse_wells_fargo_text(&fixture(), &opts());
        let m = &parsed.metadata;
        assert_eq!(m.year, 2025);
        assert_eq!(m.month, 1);
        assert_eq!(m.opening_balance, dec!(6412.75));
        assert_eq!(m.closing_balance, dec!(5037.82));
        assert_eq!(m.total_deposits, dec!(1900.00));
        assert_eq!(m.total_withdrawals, dec!(3274.93));
    }

    #[test]
    fn test_fixture_transactions() {
        let parsed = parse_wells_fargo_text(&fixture(), &opts());
        assert!(parsed.history_found);
        assert_eq!(parsed.dropped_lines, 1, "the pending 1/7 line carries no amount");
        assert_eq!(parsed.transactions.len(), 9);

        let directions: Vec<Direction> = parsed.transactions.iter().map(|t| t.direction).collect();
        use Direction::{Deposit as D, Withdrawal as W};
        assert_eq!(directions, vec![W, D, D, W, W, W, W, W, W]);

        let transfer = &parsed.transactions[7];
        assert_eq!(transfer.date.to_string(), "2025-01-08");
        assert_eq!(transfer.amount, dec!(730.17));
        assert_eq!(transfer.balance, Some(dec!(6293.30)));
        assert_eq!(transfer.category, Category::Transfers);
        assert!(!transfer.needs_review);

        let check = &parsed.transactions[8];
        assert_eq!(check.check_number.as_deref(), Some("1043"));
        assert_eq!(check.category, Category::Checks);
        assert!(check.needs_review);

        // The service fee after the totals line is not part of the history
        assert!(parsed.transactions.iter().all(|t| !t.description.contains("SERVICE FEE")));
    }

    #[test]
    fn test_amount_never_signed() {
        let text = "Transaction history\n1/3 Refund -25.00 (100.00) 75.00\nTotals";
        let parsed = parse_wells_fargo_text(text, &opts());
        let t = &parsed.transactions[0];
        assert_eq!(t.amount, dec!(25.00));
        assert_eq!(t.balance, Some(dec!(75.00)));
        assert!(parsed.transactions.iter().all(|t| t.amount >= Decimal::ZERO));
    }

    #[test]
    fn test_invalid_calendar_date_is_dropped() {
        let text = "Statement 2025\nTransaction history\n2/30 Something 10.00\n2/28 Deposit 5.00\nTotals";
        let parsed = parse_wells_fargo_text(text, &opts());
        assert_eq!(parsed.transactions.len(), 1);
        assert_eq!(parsed.dropped_lines, 1);
    }

    #[test]
    fn test_no_history_still_extracts_metadata() {
        let text = "Statement 2025\nBeginning balance on 3/1 $100.00\n3/2 Deposit 5.00";
        let parsed = parse_wells_fargo_text(text, &opts());
        assert!(parsed.transactions.is_empty());
        assert!(!parsed.history_found);
        assert_eq!(parsed.metadata.opening_balance, dec!(100.00));
        assert_eq!(parsed.metadata.month, 3);
    }

    #[test]
    fn test_street_number_is_not_the_statement_year() {
        let text = "ACME LLC\n2048 NW 5TH ST\nFORT LAUDERDALE FL 33311\nJanuary 31, 2025 Page 1 of 5\nTransaction history\n1/2 Deposit Made 10.00\nTotals";
        let parsed = parse_wells_fargo_text(text, &ParseOptions::default());
        assert_eq!(parsed.metadata.year, 2025);
        assert_eq!(parsed.transactions[0].date.to_string(), "2025-01-02");
    }

    #[test]
    fn test_year_hint_used_without_header_year() {
        let text = "Transaction history\n1/2 Deposit 5.00";
        let parsed = parse_wells_fargo_text(text, &opts());
        assert_eq!(parsed.metadata.year, 2020);
        assert_eq!(parsed.transactions[0].date.to_string(), "2020-01-02");
    }

    #[test]
    fn test_below_threshold_policy_flows_through() {
        let mut options = opts();
        options.direction.below_threshold = BelowThreshold::Deposit;
        let text = "Transaction history\n1/4 Misc 12.00\nTotals";
        let parsed = parse_wells_fargo_text(text, &options);
        assert_eq!(parsed.transactions[0].direction, Direction::Deposit);
        assert!(parsed.transactions[0].needs_review);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = fixture();
        let a = parse_statement(&text, &opts(), &AuditConfig::default());
        let b = parse_statement(&text, &opts(), &AuditConfig::default());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_parse_statement_audits() {
        let parsed = parse_statement(&fixture(), &opts(), &AuditConfig::strict(dec!(0.01)));
        assert!(parsed.summary.audit_passed, "{}", parsed.summary.audit_status);
        assert_eq!(
            parsed.summary.audit_status,
            "Captured 9 transactions. Audit: In=$1900.00, Out=$3274.93"
        );
    }

    #[test]
    fn test_check_number_forms() {
        assert_eq!(check_number("1043 Check 499.24").as_deref(), Some("1043"));
        assert_eq!(check_number("CHECK # 2211").as_deref(), Some("2211"));
        assert_eq!(check_number("Check No. 998").as_deref(), Some("998"));
        assert_eq!(check_number("Checking transfer"), None);
        assert_eq!(check_number("Deposit 10.00"), None);
        assert_eq!(check_number("Check 499.24"), None);
    }
}
