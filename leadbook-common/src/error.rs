//! Error types for leadbook
//!
//! One enum per concern: schema rejections, CSV structure, store I/O, and
//! the ingest taxonomy that the dataset service surfaces to callers.

use thiserror::Error;

/// Common result type for configuration and I/O helpers
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide errors outside the ingest path
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Header rejection produced by the schema validator.
///
/// Only the first failure is reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Expected {expected} columns, but found {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },

    /// `position` is 1-based
    #[error("Column {position} should be \"{expected}\", but found \"{actual}\"")]
    ColumnMismatch {
        position: usize,
        expected: String,
        actual: String,
    },
}

/// Malformed CSV structure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("Invalid opening quote in unquoted field on line {line}")]
    InvalidOpeningQuote { line: usize },

    #[error("Invalid character after closing quote on line {line}")]
    InvalidClosingQuote { line: usize },

    #[error("Invalid record length on line {line}: expected {expected} fields, found {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

impl CsvError {
    /// 1-based line on which the malformed record starts
    pub fn line(&self) -> usize {
        match self {
            CsvError::UnterminatedQuote { line }
            | CsvError::InvalidOpeningQuote { line }
            | CsvError::InvalidClosingQuote { line }
            | CsvError::FieldCount { line, .. } => *line,
        }
    }
}

/// Dataset store failure. Absence of a dataset is not an error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Everything an upload, fetch or export can fail with
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Uploaded CSV file is empty")]
    EmptyInput,

    #[error("CSV validation failed: {source}")]
    Schema {
        #[source]
        source: SchemaError,
        expected: Vec<String>,
        received: Vec<String>,
    },

    #[error("Malformed CSV: {0}")]
    Parse(#[from] CsvError),

    #[error("Uploaded CSV file contains no data rows")]
    NoDataRows,

    #[error("Input of {actual} bytes exceeds the limit of {limit} bytes")]
    TooLarge { limit: usize, actual: usize },

    #[error("Stored dataset {dataset} is corrupt: {source}")]
    CorruptDataset {
        dataset: String,
        #[source]
        source: CsvError,
    },

    #[error("Failed to read dataset {dataset}: {source}")]
    StoreRead {
        dataset: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to write dataset {dataset}: {source}")]
    StoreWrite {
        dataset: String,
        #[source]
        source: StoreError,
    },
}

impl IngestError {
    /// True when the caller's input is at fault rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IngestError::EmptyInput
                | IngestError::Schema { .. }
                | IngestError::Parse(_)
                | IngestError::NoDataRows
                | IngestError::TooLarge { .. }
        )
    }
}
