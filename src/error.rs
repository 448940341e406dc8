// src/error.rs

use thiserror::Error;

/// Failures the extractor refuses to recover from.
///
/// Everything else (empty cells, unparsable numbers, holidays) degrades to
/// nulls or empty tables instead of an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("contract `{0}` is not supported")]
    UnsupportedContract(String),

    #[error("unknown maturity month abbreviation `{0}`")]
    UnknownMonth(String),

    #[error("maturity code `{0}` does not end in a year digit")]
    MalformedMaturity(String),

    #[error("cannot parse `{0}` as a bulletin date")]
    InvalidDate(String),

    #[error("persisting requires database connection parameters")]
    MissingConnection,
}
