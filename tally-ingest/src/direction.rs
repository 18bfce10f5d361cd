//! Deposit/withdrawal inference for a segmented record.
//!
//! Keyword tables are checked in order against the lower-cased description.
//! When neither fires, the column where the first amount sits on the opener
//! line decides: amounts printed far to the right are withdrawals. Anything
//! at or left of the threshold is ambiguous and handled by
//! [`BelowThreshold`].

use serde::{Deserialize, Serialize};
use tally_core::Direction;

/// One keyword rule: any keyword hit forces `direction`
#[derive(Debug, Clone, Copy)]
pub struct DirectionRule {
    pub direction: Direction,
    pub keywords: &'static [&'static str],
}

/// Deposit rules run first, then withdrawal rules
pub const DIRECTION_RULES: &[DirectionRule] = &[
    DirectionRule {
        direction: Direction::Deposit,
        keywords: &["deposit made", "ha ft lauderdale", "transfer from", "credit", "abono"],
    },
    DirectionRule {
        direction: Direction::Withdrawal,
        keywords: &[
            "hampton",
            "cvp community",
            "ach debit",
            "transfer to",
            "payment",
            "pymt",
            "auto finance",
        ],
    },
];

/// Default column threshold, in characters from the start of the opener line
pub const DEFAULT_COLUMN_THRESHOLD: usize = 60;

/// What to do when the first amount sits at or left of the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BelowThreshold {
    /// Historical behaviour: treat as a withdrawal
    #[default]
    Withdrawal,
    Deposit,
    /// Leave undecided; the record carries WITHDRAWAL and is flagged
    NeedsReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionConfig {
    pub column_threshold: usize,
    pub below_threshold: BelowThreshold,
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            column_threshold: DEFAULT_COLUMN_THRESHOLD,
            below_threshold: BelowThreshold::default(),
        }
    }
}

/// Which rule produced the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionEvidence {
    Keyword(&'static str),
    /// First amount past the threshold column
    ColumnPosition { offset: usize },
    /// First amount at or before the threshold, or not on the opener line
    BelowThreshold { offset: Option<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionOutcome {
    Decided(Direction),
    NeedsReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionVerdict {
    pub outcome: DirectionOutcome,
    pub evidence: DirectionEvidence,
}

impl DirectionVerdict {
    /// Direction carried on the transaction; undecided records carry WITHDRAWAL
    pub fn direction(&self) -> Direction {
        match self.outcome {
            DirectionOutcome::Decided(d) => d,
            DirectionOutcome::NeedsReview => Direction::Withdrawal,
        }
    }

    /// The verdict came from the ambiguous fallback branch
    pub fn needs_review(&self) -> bool {
        matches!(self.evidence, DirectionEvidence::BelowThreshold { .. })
    }
}

/// Classify a record's direction.
///
/// `first_amount_offset` is the character offset of the first amount token
/// on the opener line, or `None` when all amounts sat on continuation lines.
pub fn classify_direction(
    description: &str,
    first_amount_offset: Option<usize>,
    config: &DirectionConfig,
) -> DirectionVerdict {
    let desc = description.to_lowercase();

    for rule in DIRECTION_RULES {
        if let Some(k) = rule.keywords.iter().find(|k| desc.contains(*k)) {
            return DirectionVerdict {
                outcome: DirectionOutcome::Decided(rule.direction),
                evidence: DirectionEvidence::Keyword(*k),
            };
        }
    }

    match first_amount_offset {
        Some(offset) if offset > config.column_threshold => DirectionVerdict {
            outcome: DirectionOutcome::Decided(Direction::Withdrawal),
            evidence: DirectionEvidence::ColumnPosition { offset },
        },
        offset => {
            let outcome = match config.below_threshold {
                BelowThreshold::Withdrawal => DirectionOutcome::Decided(Direction::Withdrawal),
                BelowThreshold::Deposit => DirectionOutcome::Decided(Direction::Deposit),
                BelowThreshold::NeedsReview => DirectionOutcome::NeedsReview,
            };
            DirectionVerdict {
                outcome,
                evidence: DirectionEvidence::BelowThreshold { offset },
            }
        }
    }
}
