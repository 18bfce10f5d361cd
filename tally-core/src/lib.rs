//! tally-core: statement types, amount and text normalization, keyword
//! categorization, and the audit engine

pub mod amount;
pub mod audit;
pub mod categorizer;
pub mod statement;
pub mod text;

pub use amount::{money_tokens, normalize_amount};
pub use audit::{audit, AuditConfig, AuditMode, RecomputedTotals};
pub use categorizer::{categorize, CategoryMatch, CategoryResult};
pub use statement::{
    AuditResult, Category, Direction, ParsedStatement, ParsedTransaction, StatementMetadata,
    StatementSummary,
};
pub use text::{summarize_description, NormalizedText};
