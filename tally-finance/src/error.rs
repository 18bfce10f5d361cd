//! Error types for the import pipeline.
//!
//! Only [`ImportError`] ever reaches a caller of `import_statement`; every
//! other failure is absorbed per transaction.

use std::time::Duration;
use thiserror::Error;

/// The upstream text extraction could not produce text
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("statement text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("statement is empty")]
    Empty,

    #[error("text extraction failed: {0}")]
    Failed(String),
}

/// A single classification call failed
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed classifier response: {0}")]
    Malformed(String),
}

/// Fatal import failure
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
}

/// The downstream sink rejected or failed a write
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("statement sink failed: {0}")]
    Backend(String),
}
