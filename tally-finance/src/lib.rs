//! tally-finance: category classification, batch classification, and the
//! statement import pipeline

pub mod batch;
pub mod classifier;
pub mod error;
pub mod import;
pub mod remote;

pub use batch::{BatchOptions, BatchOutcome, FailurePolicy, classify_batch};
pub use classifier::{
    CategoryClassifier, Classification, ClassificationRequest, Classifier, KeywordClassifier,
};
pub use error::{ClassifyError, ExtractionError, ImportError, SinkError};
pub use import::{
    Delivery, ImportOptions, ImportReport, StatementSink, StoreOutcome, TextExtractor,
    Utf8Extractor, deliver, import_statement, import_text,
};
pub use remote::{RemoteClassifier, RemoteConfig};
