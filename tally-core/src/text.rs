//! Line splitting, header window, and description normalization.

/// Default size of the header window scanned for metadata
pub const DEFAULT_HEADER_WINDOW: usize = 10_000;

/// Maximum length of a normalized description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 140;

/// Extracted statement text split for the downstream scanners.
///
/// Borrows from the caller's buffer; nothing is copied or mutated.
#[derive(Debug, Clone)]
pub struct NormalizedText<'a> {
    /// First `header_window` characters of the raw text
    pub header: &'a str,
    /// Trimmed, non-empty lines in source order
    pub lines: Vec<&'a str>,
}

impl<'a> NormalizedText<'a> {
    pub fn new(raw: &'a str, header_window: usize) -> Self {
        Self {
            header: header_slice(raw, header_window),
            lines: split_lines(raw),
        }
    }
}

/// Split on line breaks, trim, and drop blank lines
pub fn split_lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

/// First `max_chars` characters of `raw`, cut on a char boundary
pub fn header_slice(raw: &str, max_chars: usize) -> &str {
    match raw.char_indices().nth(max_chars) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

/// Collapse whitespace, upper-case, and bound to [`MAX_DESCRIPTION_CHARS`]
pub fn summarize_description(desc: &str) -> String {
    let collapsed = desc.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .to_uppercase()
        .chars()
        .take(MAX_DESCRIPTION_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_trims_and_drops_blanks() {
        let raw = "  Transaction history \r\n\n   \n1/2 Deposit 10.00\n\t\n";
        assert_eq!(split_lines(raw), vec!["Transaction history", "1/2 Deposit 10.00"]);
    }

    #[test]
    fn test_header_slice_respects_char_boundaries() {
        assert_eq!(header_slice("héllo world", 5), "héllo");
        assert_eq!(header_slice("short", 100), "short");
        assert_eq!(header_slice("", 10), "");
    }

    #[test]
    fn test_normalized_text_exposes_both_views() {
        let raw = "Statement 2025\nBeginning balance on 1/2 $6,412.75\n";
        let norm = NormalizedText::new(raw, 9);
        assert_eq!(norm.header, "Statement");
        assert_eq!(norm.lines.len(), 2);
    }

    #[test]
    fn test_summarize_description() {
        assert_eq!(
            summarize_description("Cvp Community\n ACH   Paymnt  Bolivar-Ortiz "),
            "CVP COMMUNITY ACH PAYMNT BOLIVAR-ORTIZ"
        );
        let long = "x ".repeat(200);
        let out = summarize_description(&long);
        assert!(out.chars().count() <= MAX_DESCRIPTION_CHARS);
        assert!(!out.ends_with(' '));
    }
}
