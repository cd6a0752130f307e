use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid anchor '{0}': expected YYYY-MM-DD, YYYY-MM or \"All\"")]
    InvalidAnchor(String),

    #[error("Invalid page size {0}: must be at least 1")]
    InvalidPageSize(usize),

    #[error("Unknown sort column: {0}")]
    UnknownSortColumn(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
