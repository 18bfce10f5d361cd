//! Statement and transaction types produced by one parse invocation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a transaction increases or decreases the account balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "DEPOSIT")]
    Deposit,
    #[serde(rename = "WITHDRAWAL")]
    Withdrawal,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Deposit => "DEPOSIT",
            Direction::Withdrawal => "WITHDRAWAL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed category vocabulary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Income")]
    Income,
    #[serde(rename = "Bank Fees")]
    BankFees,
    #[serde(rename = "Auto & Gas")]
    AutoGas,
    #[serde(rename = "Software & Tech")]
    SoftwareTech,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Contractors")]
    Contractors,
    #[serde(rename = "Meals & Entertainment")]
    MealsEntertainment,
    #[serde(rename = "Travel")]
    Travel,
    #[serde(rename = "Office Supplies")]
    OfficeSupplies,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Professional Fees")]
    ProfessionalFees,
    #[serde(rename = "Rent & HOA")]
    RentHoa,
    #[serde(rename = "Insurance")]
    Insurance,
    #[serde(rename = "Taxes")]
    Taxes,
    #[serde(rename = "Checks")]
    Checks,
    #[serde(rename = "Transfers")]
    Transfers,
    #[serde(rename = "Uncategorized")]
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 17] = [
        Category::Income,
        Category::BankFees,
        Category::AutoGas,
        Category::SoftwareTech,
        Category::Marketing,
        Category::Contractors,
        Category::MealsEntertainment,
        Category::Travel,
        Category::OfficeSupplies,
        Category::Utilities,
        Category::ProfessionalFees,
        Category::RentHoa,
        Category::Insurance,
        Category::Taxes,
        Category::Checks,
        Category::Transfers,
        Category::Uncategorized,
    ];

    /// Display label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Category::Income => "Income",
            Category::BankFees => "Bank Fees",
            Category::AutoGas => "Auto & Gas",
            Category::SoftwareTech => "Software & Tech",
            Category::Marketing => "Marketing",
            Category::Contractors => "Contractors",
            Category::MealsEntertainment => "Meals & Entertainment",
            Category::Travel => "Travel",
            Category::OfficeSupplies => "Office Supplies",
            Category::Utilities => "Utilities",
            Category::ProfessionalFees => "Professional Fees",
            Category::RentHoa => "Rent & HOA",
            Category::Insurance => "Insurance",
            Category::Taxes => "Taxes",
            Category::Checks => "Checks",
            Category::Transfers => "Transfers",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Validate an untrusted label against the vocabulary.
    ///
    /// Exact match first, then a case-insensitive match on the trimmed label.
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Self::ALL
            .iter()
            .find(|c| c.label() == label)
            .or_else(|| Self::ALL.iter().find(|c| c.label().eq_ignore_ascii_case(label)))
            .copied()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header/summary values scanned from the statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatementMetadata {
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    /// Declared on the statement, not recomputed
    pub total_deposits: Decimal,
    /// Declared on the statement, always non-negative
    pub total_withdrawals: Decimal,
    /// 1-12
    pub month: u32,
    pub year: i32,
}

impl StatementMetadata {
    /// Zeroed metadata for the given statement year, month 1
    pub fn empty(year: i32) -> Self {
        Self {
            opening_balance: Decimal::ZERO,
            closing_balance: Decimal::ZERO,
            total_deposits: Decimal::ZERO,
            total_withdrawals: Decimal::ZERO,
            month: 1,
            year,
        }
    }
}

/// One dated monetary movement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    pub date: NaiveDate,
    /// Upper-case, whitespace-collapsed, at most 140 chars
    pub description: String,
    /// Always >= 0; the sign lives in `direction`
    pub amount: Decimal,
    pub direction: Direction,
    /// Running balance after this transaction, when the statement printed one
    pub balance: Option<Decimal>,
    pub check_number: Option<String>,
    pub category: Category,
    /// Direction came from the ambiguous column fallback
    #[serde(default)]
    pub needs_review: bool,
}

impl ParsedTransaction {
    pub fn is_deposit(&self) -> bool {
        self.direction == Direction::Deposit
    }
}

/// Verdict of the consistency check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub passed: bool,
    pub status_message: String,
}

/// Metadata plus audit verdict, as handed downstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatementSummary {
    #[serde(flatten)]
    pub metadata: StatementMetadata,
    pub audit_passed: bool,
    pub audit_status: String,
}

impl StatementSummary {
    pub fn new(metadata: StatementMetadata, audit: AuditResult) -> Self {
        Self {
            metadata,
            audit_passed: audit.passed,
            audit_status: audit.status_message,
        }
    }
}

/// Full output of a parse: summary and transactions in textual order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedStatement {
    pub summary: StatementSummary,
    pub transactions: Vec<ParsedTransaction>,
}
