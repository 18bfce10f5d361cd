//! tally-ingest: metadata extraction, transaction segmentation, direction
//! inference, and the statement layout parser built from them.

pub mod direction;
pub mod metadata;
pub mod parsers;
pub mod segmenter;
pub mod types;

pub use direction::{BelowThreshold, DirectionConfig, DirectionVerdict, classify_direction};
pub use metadata::{MetadataField, MetadataScan, extract_metadata};
pub use parsers::{parse_statement, parse_wells_fargo_text};
pub use segmenter::{RawRecord, ScanState, Segmentation, segment};
pub use types::{DEFAULT_YEAR_MAX, DEFAULT_YEAR_MIN, ParseOptions, StatementParse};
