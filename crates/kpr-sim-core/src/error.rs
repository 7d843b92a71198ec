use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KprSimError {
    #[error("Invalid price: {0} (price before discount must be positive)")]
    InvalidPrice(Decimal),

    #[error("Invalid tenor: {0} months (tenor must be between 1 and 600 months)")]
    InvalidTenor(u32),

    #[error("Invalid interest rate: {0}% (rate must not be negative)")]
    InvalidRate(Decimal),

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Unsupported file type: {mime_type} (allowed: PDF, JPG, PNG)")]
    UnsupportedFileType { mime_type: String },

    #[error("File too large: {size_bytes} bytes (limit {limit_bytes} bytes)")]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for KprSimError {
    fn from(e: serde_json::Error) -> Self {
        KprSimError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for KprSimError {
    fn from(e: std::io::Error) -> Self {
        KprSimError::Storage(e.to_string())
    }
}
