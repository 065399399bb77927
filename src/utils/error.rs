// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum StatementError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not read PDF text: {0}")]
    Pdf(String),

    #[error("Unsupported statement format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Malformed amount '{numeral}' in line: {line}")]
    MalformedAmount { line: String, numeral: String },
}

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Classifier expects columns {expected:?} but features provide {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Classifier returned unknown label: {0}")]
    InvalidLabel(u8),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Statement could not be read: {0}")]
    Statement(#[from] StatementError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
