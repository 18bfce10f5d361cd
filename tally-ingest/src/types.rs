use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tally_core::text::DEFAULT_HEADER_WINDOW;
use tally_core::{ParsedTransaction, StatementMetadata};

use crate::direction::DirectionConfig;

/// Default range of plausible statement years. Kept narrow so street
/// numbers in the mailing address do not pass as years.
pub const DEFAULT_YEAR_MIN: i32 = 2023;
pub const DEFAULT_YEAR_MAX: i32 = 2029;

/// Knobs for one parse invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Statement year used when the header carries none. `None` means the
    /// current calendar year.
    pub year_hint: Option<i32>,
    /// Number of leading characters scanned for the statement year
    pub header_window: usize,
    /// Inclusive range of plausible statement years
    pub year_min: i32,
    pub year_max: i32,
    pub direction: DirectionConfig,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            year_hint: None,
            header_window: DEFAULT_HEADER_WINDOW,
            year_min: DEFAULT_YEAR_MIN,
            year_max: DEFAULT_YEAR_MAX,
            direction: DirectionConfig::default(),
        }
    }
}

impl ParseOptions {
    pub fn with_year_hint(mut self, year: i32) -> Self {
        self.year_hint = Some(year);
        self
    }

    /// The hint, or the current calendar year
    pub fn resolved_year_hint(&self) -> i32 {
        self.year_hint
            .unwrap_or_else(|| chrono::Local::now().year())
    }
}

/// Metadata plus typed transactions, before any audit.
///
/// Categories here come from the keyword table; the finance pipeline may
/// override them.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementParse {
    pub metadata: StatementMetadata,
    pub transactions: Vec<ParsedTransaction>,
    /// The segmenter saw a "transaction history" marker
    pub history_found: bool,
    /// Date-shaped lines that produced no transaction
    pub dropped_lines: usize,
}
