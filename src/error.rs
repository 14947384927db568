// File: ./src/error.rs
//! Library error type. The binary and the config layer wrap these in `anyhow`.
use crate::model::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfLifeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Required column '{0}' not found in CSV header")]
    MissingColumn(String),
    #[error("Row {id}: cannot parse '{value}' in column '{column}' as a date")]
    InvalidDate {
        id: RecordId,
        column: String,
        value: String,
    },
    #[error("No record matches '{0}'")]
    RecordNotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ShelfLifeError>;
