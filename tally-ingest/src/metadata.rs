//! Statement metadata scan: year, month, balances, and declared totals.
//!
//! Every field is optional on the page. Missing fields keep their defaults
//! and the scan carries on.

use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;
use tally_core::{money_tokens, normalize_amount, NormalizedText, StatementMetadata};

static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("year regex compiles"));

static SHORT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})").expect("short date regex compiles"));

/// Metadata fields the extractor looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Year,
    Month,
    OpeningBalance,
    ClosingBalance,
    TotalDeposits,
    TotalWithdrawals,
}

/// Scan result together with the fields that fell back to defaults
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataScan {
    pub metadata: StatementMetadata,
    pub missing: Vec<MetadataField>,
}

/// Most frequent plausible year in the header; ties go to the first seen.
pub fn detect_year(header: &str, year_min: i32, year_max: i32) -> Option<i32> {
    let mut counts: Vec<(i32, usize)> = Vec::new();
    for caps in YEAR_TOKEN.captures_iter(header) {
        let Ok(year) = caps[1].parse::<i32>() else {
            continue;
        };
        if !(year_min..=year_max).contains(&year) {
            continue;
        }
        match counts.iter_mut().find(|(y, _)| *y == year) {
            Some((_, n)) => *n += 1,
            None => counts.push((year, 1)),
        }
    }

    let mut best: Option<(i32, usize)> = None;
    for (year, n) in counts {
        match best {
            Some((_, best_n)) if n <= best_n => {}
            _ => best = Some((year, n)),
        }
    }
    best.map(|(year, _)| year)
}

/// Last money token on the line, normalized
fn last_amount(line: &str) -> Option<Decimal> {
    money_tokens(line).last().map(|t| normalize_amount(t))
}

/// Month from the first `M/D` on the line, if it is a real month
fn month_on_line(line: &str) -> Option<u32> {
    let caps = SHORT_DATE.captures(line)?;
    let month: u32 = caps[1].parse().ok()?;
    (1..=12).contains(&month).then_some(month)
}

/// Extract statement metadata from the normalized text.
///
/// The year comes from the header window; balances and declared totals
/// come from any line. When a phrase occurs on several lines the last one
/// wins.
pub fn extract_metadata(
    text: &NormalizedText<'_>,
    year_hint: i32,
    year_min: i32,
    year_max: i32,
) -> MetadataScan {
    let mut missing = Vec::new();

    let year = detect_year(text.header, year_min, year_max).unwrap_or_else(|| {
        missing.push(MetadataField::Year);
        year_hint
    });
    let mut metadata = StatementMetadata::empty(year);

    let mut month = None;
    let mut opening = None;
    let mut closing = None;
    let mut deposits = None;
    let mut withdrawals = None;

    for line in &text.lines {
        let lower = line.to_lowercase();

        if lower.contains("beginning balance on") {
            if let Some(v) = last_amount(line) {
                opening = Some(v);
                if let Some(m) = month_on_line(line) {
                    month = Some(m);
                }
            }
        }
        if lower.contains("ending balance on") {
            if let Some(v) = last_amount(line) {
                closing = Some(v);
            }
        }
        if lower.contains("deposits/credits") && !lower.contains("summary") {
            if let Some(v) = last_amount(line) {
                deposits = Some(v);
            }
        }
        if lower.contains("withdrawals/debits") && !lower.contains("summary") {
            if let Some(v) = last_amount(line) {
                withdrawals = Some(v.abs());
            }
        }
    }

    let fields = [
        (MetadataField::OpeningBalance, opening, &mut metadata.opening_balance),
        (MetadataField::ClosingBalance, closing, &mut metadata.closing_balance),
        (MetadataField::TotalDeposits, deposits, &mut metadata.total_deposits),
        (MetadataField::TotalWithdrawals, withdrawals, &mut metadata.total_withdrawals),
    ];
    for (field, found, slot) in fields {
        match found {
            Some(v) => *slot = v,
            None => missing.push(field),
        }
    }
    match month {
        Some(m) => metadata.month = m,
        None => missing.push(MetadataField::Month),
    }

    if !missing.is_empty() {
        tracing::debug!(?missing, "statement metadata incomplete; defaults applied");
    }

    MetadataScan { metadata, missing }
}
