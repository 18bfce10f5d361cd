//! Money token detection and locale-aware amount normalization.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// A money-shaped token: digits with optional thousands groups and exactly
/// two fraction digits. Comma or dot may act as either separator; an
/// optional leading `(`, `-` or `$` is part of the token.
pub static MONEY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?-?\$?(?:\d{1,3}(?:[.,]\d{3})+|\d+)[.,]\d{2}\b\)?")
        .expect("money token regex compiles")
});

/// All money tokens on a line, in order of appearance
pub fn money_tokens(line: &str) -> Vec<&str> {
    MONEY_TOKEN.find_iter(line).map(|m| m.as_str()).collect()
}

/// Normalize a raw amount string into a non-negative decimal.
///
/// Currency symbols, whitespace, parentheses and minus signs are stripped.
/// If the last comma comes after the last dot the comma is the decimal
/// separator (`1.234,56`), otherwise commas are thousands separators
/// (`1,234.56`). Anything unparseable yields zero.
pub fn normalize_amount(raw: &str) -> Decimal {
    parse_amount(raw).unwrap_or(Decimal::ZERO)
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '$' | '€' | '£' | '¥' | '-' | '(' | ')'))
        .collect();

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');
    let canonical = match (last_comma, last_dot) {
        (Some(comma), dot) if dot.is_none_or(|d| comma > d) => {
            // European: dots group thousands, the last comma is the decimal point
            let mut out = String::with_capacity(cleaned.len());
            for (i, c) in cleaned.char_indices() {
                match c {
                    '.' => {}
                    ',' if i == comma => out.push('.'),
                    ',' => {}
                    _ => out.push(c),
                }
            }
            out
        }
        _ => cleaned.replace(',', ""),
    };

    let value = Decimal::from_str(&canonical).ok()?;
    Some(value.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_us_and_european_formats_agree() {
        assert_eq!(normalize_amount("1,234.56"), dec!(1234.56));
        assert_eq!(normalize_amount("1.234,56"), dec!(1234.56));
        assert_eq!(normalize_amount("12.345.678,90"), dec!(12345678.90));
        assert_eq!(normalize_amount("310,50"), dec!(310.50));
    }

    #[test]
    fn test_sign_is_discarded() {
        for raw in ["514.00", "-514.00", "(514.00)", "$514.00", "-$514.00", "($514.00)"] {
            assert_eq!(normalize_amount(raw), dec!(514.00), "raw = {raw}");
        }
    }

    #[test]
    fn test_currency_symbols_and_whitespace() {
        assert_eq!(normalize_amount(" € 1.000,00 "), dec!(1000.00));
        assert_eq!(normalize_amount("$ 6,926.75"), dec!(6926.75));
    }

    #[test]
    fn test_malformed_yields_zero() {
        assert_eq!(normalize_amount(""), Decimal::ZERO);
        assert_eq!(normalize_amount("abc"), Decimal::ZERO);
        assert_eq!(normalize_amount("--"), Decimal::ZERO);
        assert_eq!(normalize_amount("()"), Decimal::ZERO);
    }

    #[test]
    fn test_money_tokens_on_transaction_line() {
        let line = "1/2 NEW Hampton II A Web Pmts 010225 Rvtf31 Carlos Bolivar 514.00 6,926.75";
        assert_eq!(money_tokens(line), vec!["514.00", "6,926.75"]);
    }

    #[test]
    fn test_money_tokens_ignore_dates_and_ids() {
        assert!(money_tokens("Card Xxxxxxxxxxxx7817 on 01/08/25").is_empty());
        assert!(money_tokens("Cvp Community ACH Paymnt Jan 6 004Pmnh2H0112").is_empty());
        assert_eq!(money_tokens("Totals $5,350.00 $5,174.40"), vec!["$5,350.00", "$5,174.40"]);
    }

    #[test]
    fn test_money_tokens_keep_sign_markers() {
        assert_eq!(money_tokens("Withdrawals/Debits -5,174.40"), vec!["-5,174.40"]);
        assert_eq!(money_tokens("Fee (12.00)"), vec!["(12.00)"]);
    }
}
