//! Error types for tabscheme

use crate::ScalarType;
use thiserror::Error;

/// Failure of a column codec to produce a value from a raw cell
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("cannot parse {raw:?} as {scalar_type}")]
    Unparseable {
        scalar_type: ScalarType,
        raw: Option<String>,
    },

    #[error("cannot parse a NULL cell as {scalar_type}")]
    NullInput { scalar_type: ScalarType },
}

/// Structural errors raised while declaring columns or folding rows
#[derive(Error, Debug)]
pub enum SchemeError {
    #[error("Column name must have at least a single character")]
    EmptyColumnName,

    #[error("Column {column:?} carries the DEFAULT keyword but declares no default value")]
    DefaultWithoutValue { column: String },

    #[error("Invalid column pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Column {column:?} does not match pattern {pattern}")]
    ColumnMismatch { pattern: String, column: String },

    #[error("Column {column:?} can not parse its value: {source}")]
    Unparseable {
        column: String,
        #[source]
        source: CodecError,
    },

    #[error("Query result for table {table} has no header row")]
    MissingHeader { table: String },

    #[error("Table {table} contains intersecting column patterns (heading {heading:?})")]
    IntersectingPatterns { table: String, heading: String },

    #[error("Row {row} of table {table} has {actual} cells but {expected} headings")]
    RowWidth {
        table: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Result type alias for scheme operations
pub type Result<T> = std::result::Result<T, SchemeError>;
