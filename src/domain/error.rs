//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid input caught before any request is made.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("no recipients given")]
    NoRecipients,

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("invalid date or time: {0} (expected YYYY-MM-DD or RFC 3339)")]
    InvalidDateTime(String),

    #[error("end must be after start: {start} .. {end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("{path} is not a {kind} document")]
    WrongDocumentKind { path: String, kind: &'static str },

    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    #[error("invalid cell range: {0}")]
    InvalidRange(String),

    #[error("file too large for simple upload: {size} bytes (limit {limit})")]
    UploadTooLarge { size: u64, limit: u64 },
}
