//! Statement import: extract → parse → classify → audit → gated hand-off.

use std::future::Future;
use tally_core::{AuditConfig, ParsedStatement, StatementSummary, audit};
use tally_ingest::{ParseOptions, parse_wells_fargo_text};

use crate::batch::{BatchOptions, classify_batch};
use crate::classifier::{CategoryClassifier, Classification, ClassificationRequest};
use crate::error::{ExtractionError, ImportError, SinkError};

/// Upstream collaborator turning document bytes into text
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// For input that is already extracted text
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Extractor;

impl TextExtractor for Utf8Extractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = std::str::from_utf8(bytes)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        if text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(text.to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub parse: ParseOptions,
    pub audit: AuditConfig,
    pub batch: BatchOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub statement: ParsedStatement,
    /// Classifier output, index-aligned with `statement.transactions`
    pub classifications: Vec<Classification>,
    /// Transactions whose classification call failed
    pub failed: Vec<usize>,
    /// Date-shaped lines that produced no transaction
    pub dropped_lines: usize,
}

/// Import a statement from raw document bytes.
///
/// Extraction failure is the only error; everything after it is fail-soft.
pub async fn import_statement<E, C>(
    bytes: &[u8],
    options: &ImportOptions,
    extractor: &E,
    classifier: &C,
) -> Result<ImportReport, ImportError>
where
    E: TextExtractor,
    C: CategoryClassifier,
{
    let text = extractor.extract(bytes)?;
    Ok(import_text(&text, options, classifier).await)
}

/// Import already-extracted statement text
pub async fn import_text<C: CategoryClassifier>(
    text: &str,
    options: &ImportOptions,
    classifier: &C,
) -> ImportReport {
    let parsed = parse_wells_fargo_text(text, &options.parse);
    let mut transactions = parsed.transactions;

    let requests: Vec<ClassificationRequest> =
        transactions.iter().map(ClassificationRequest::from).collect();
    let outcome = classify_batch(classifier, &requests, &options.batch).await;

    for (t, c) in transactions.iter_mut().zip(&outcome.classifications) {
        t.category = c.category;
    }

    // Only after the whole batch is in
    let verdict = audit(&parsed.metadata, &transactions, &options.audit);

    ImportReport {
        statement: ParsedStatement {
            summary: StatementSummary::new(parsed.metadata, verdict),
            transactions,
        },
        classifications: outcome.classifications,
        failed: outcome.failed,
        dropped_lines: parsed.dropped_lines,
    }
}

/// Sink's answer to a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Stored,
    /// A statement for the same owner and period already exists
    Duplicate,
}

/// Downstream persistence collaborator. Owns the uniqueness rule on
/// `(owner, month, year)`.
pub trait StatementSink: Send + Sync {
    fn store(
        &self,
        owner: &str,
        statement: &ParsedStatement,
    ) -> impl Future<Output = Result<StoreOutcome, SinkError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Stored,
    Duplicate { month: u32, year: i32 },
    /// Audit failed; the sink was not called
    Blocked { status: String },
}

/// Hand a statement to the sink, only if its audit passed
pub async fn deliver<S: StatementSink>(
    statement: &ParsedStatement,
    owner: &str,
    sink: &S,
) -> Result<Delivery, SinkError> {
    let summary = &statement.summary;
    if !summary.audit_passed {
        tracing::info!(owner, status = %summary.audit_status, "audit failed; statement not delivered");
        return Ok(Delivery::Blocked {
            status: summary.audit_status.clone(),
        });
    }

    match sink.store(owner, statement).await? {
        StoreOutcome::Stored => Ok(Delivery::Stored),
        StoreOutcome::Duplicate => Ok(Delivery::Duplicate {
            month: summary.metadata.month,
            year: summary.metadata.year,
        }),
    }
}
