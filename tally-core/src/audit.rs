//! Post-parse consistency check gating downstream persistence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statement::{AuditResult, ParsedTransaction, StatementMetadata};

/// Which pass condition the audit applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuditMode {
    /// Pass when at least one transaction was captured
    #[default]
    RecordCount,
    /// Also require recomputed totals to match the declared totals
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditConfig {
    pub mode: AuditMode,
    /// Maximum absolute difference per total in strict mode
    pub tolerance: Decimal,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            mode: AuditMode::RecordCount,
            tolerance: Decimal::new(1, 2),
        }
    }
}

impl AuditConfig {
    pub fn strict(tolerance: Decimal) -> Self {
        Self { mode: AuditMode::Strict, tolerance }
    }
}

/// Totals recomputed from the classified transaction list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomputedTotals {
    pub count: usize,
    pub deposits: Decimal,
    pub withdrawals: Decimal,
}

impl RecomputedTotals {
    pub fn from_transactions(txns: &[ParsedTransaction]) -> Self {
        let (deposits, withdrawals) =
            txns.iter()
                .fold((Decimal::ZERO, Decimal::ZERO), |(dep, wit), t| {
                    if t.is_deposit() {
                        (dep + t.amount, wit)
                    } else {
                        (dep, wit + t.amount)
                    }
                });
        Self {
            count: txns.len(),
            deposits,
            withdrawals,
        }
    }
}

/// Run the audit over the complete transaction batch.
///
/// The status message always reports the record count and both
/// recomputed totals. Strict mode appends each mismatch it found.
pub fn audit(
    metadata: &StatementMetadata,
    txns: &[ParsedTransaction],
    config: &AuditConfig,
) -> AuditResult {
    let totals = RecomputedTotals::from_transactions(txns);
    let mut status = format!(
        "Captured {} transactions. Audit: In=${:.2}, Out=${:.2}",
        totals.count, totals.deposits, totals.withdrawals
    );

    let mut passed = totals.count > 0;

    if config.mode == AuditMode::Strict {
        let checks = [
            ("deposits", totals.deposits, metadata.total_deposits),
            ("withdrawals", totals.withdrawals, metadata.total_withdrawals),
        ];
        for (name, recomputed, declared) in checks {
            let diff = (recomputed - declared).abs();
            if diff > config.tolerance {
                passed = false;
                status.push_str(&format!(
                    "; {name} mismatch: recomputed ${recomputed:.2} vs declared ${declared:.2} (diff ${diff:.2})"
                ));
            }
        }
    }

    if totals.count == 0 {
        status.push_str("; no transactions found");
    }

    tracing::info!(passed, count = totals.count, mode = ?config.mode, "statement audit");

    AuditResult {
        passed,
        status_message: status,
    }
}
