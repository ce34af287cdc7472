//! Error types for the lineup generation pipeline.
//!
//! - [`CsvError`] - reading and decoding CSV extracts
//! - [`ExtractError`] - file-specific shaping of CSV rows
//! - [`WriteError`] - serializing the output document
//! - [`CompareError`] - loading documents for verification
//! - [`ConvertError`] - top-level orchestration
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Reading Errors
// =============================================================================

/// Errors while reading a delimited file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes could not be decoded to text.
    #[error("Failed to decode '{path}' as {encoding}")]
    Encoding { path: PathBuf, encoding: String },

    /// Invalid CSV format.
    #[error("Invalid CSV in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

// =============================================================================
// Extraction Errors
// =============================================================================

/// Errors while shaping rows of one extract.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Underlying CSV error.
    #[error(transparent)]
    Csv(#[from] CsvError),

    /// A cell that must hold an integer does not.
    #[error("{file}, line {line}, column '{column}': expected an integer, found '{value}'")]
    InvalidInteger {
        file: String,
        line: usize,
        column: String,
        value: String,
    },

    /// A key/value attribute that must hold an integer does not.
    #[error("{file}, id '{id}', key '{key}': expected an integer, found '{value}'")]
    InvalidAttribute {
        file: String,
        id: String,
        key: String,
        value: String,
    },
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the generated document.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Output directory or file could not be written.
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Comparison Errors
// =============================================================================

/// Errors while loading documents for comparison.
#[derive(Debug, Error)]
pub enum CompareError {
    /// Failed to read file.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON.
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed `PATH=KEY` sort key override.
    #[error("Invalid sort key '{0}', expected PATH=KEY")]
    InvalidSortKey(String),
}

// =============================================================================
// Conversion Errors (top-level)
// =============================================================================

/// Top-level conversion errors.
///
/// This is the error type returned by [`crate::convert`]. It wraps all
/// lower-level errors.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Extraction error.
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Output error.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Invalid option value.
    #[error("Invalid option '{name}': {message}")]
    InvalidOption { name: String, message: String },
}

impl From<CsvError> for ConvertError {
    fn from(err: CsvError) -> Self {
        ConvertError::Extract(ExtractError::Csv(err))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type for write operations.
pub type WriteResult<T> = Result<T, WriteError>;

/// Result type for comparison operations.
pub type CompareResult<T> = Result<T, CompareError>;

/// Result type for the conversion pipeline.
pub type ConvertResult<T> = Result<T, ConvertError>;
