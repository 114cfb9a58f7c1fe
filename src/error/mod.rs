//! Error handling for the vacancy pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use chrono::NaiveDate;
use parquet::errors::ParquetError;

/// Specialized error type for loading, filtering and aggregating vacancy tables
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record table was supplied to the aggregator
    #[error("No vacancy data loaded")]
    InputMissing,

    /// A contract column is absent from the table
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// A column could not be read as the expected array type
    #[error("Column '{column}' is not a {expected} array")]
    InvalidDataType { column: String, expected: String },

    /// The requested date range is inverted
    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// A keyword term could not be compiled into a pattern
    #[error("Invalid keyword '{keyword}': {reason}")]
    InvalidKeyword { keyword: String, reason: String },

    /// A role is not present in the role catalog
    #[error("Role '{0}' not found in catalog")]
    RoleNotFound(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error opening, reading or writing a file
    #[error("IO error: {message} ({path})")]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error from Arrow compute or array construction
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting between typed rows and record batches
    #[error("Row conversion error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// Error decoding JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an IO error carrying the path it relates to
    pub fn io(message: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: path.into(),
            source,
        }
    }

    /// Build a missing-column error
    pub fn column_not_found(column: &str) -> Self {
        Self::ColumnNotFound {
            column: column.to_string(),
        }
    }
}

/// Result type for vacancy pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
