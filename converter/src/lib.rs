//! # acmgen - ACM channel lineup generation
//!
//! acmgen reads the semicolon separated extracts of an operator's channel
//! database and assembles them into a single ACM lineup JSON document. It
//! also compares a generated document with a reference one.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV files  │────▶│  Extract    │────▶│  Assemble   │────▶│  ACM JSON   │
//! │ (13 inputs) │     │ (per file)  │     │ (join by id)│     │  (4 spaces) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use acmgen::{convert, ConvertOptions, DocumentMeta};
//! use chrono::Utc;
//!
//! let options = ConvertOptions::default().with_input_dir("input_csv");
//! let document = convert(&options, &DocumentMeta::new("IE_STARHUB", Utc::now()))?;
//! println!("Generated {} channels", document.channels.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`logs`] - tracing setup and log helpers
//! - [`config`] - Input file names and conversion options
//! - [`parser`] - CSV reading with encoding detection
//! - [`models`] - Output document model
//! - [`extract`] - One reader per input file
//! - [`assemble`] - Join extracts into the document
//! - [`writer`] - JSON serialization
//! - [`compare`] - Order-insensitive equality and structural diff
//! - [`pipeline`] - End-to-end conversion

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Reading
pub mod extract;
pub mod parser;

// Building
pub mod assemble;
pub mod pipeline;
pub mod writer;

// Verification
pub mod compare;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CompareError, CompareResult, ConvertError, ConvertResult, CsvError, ExtractError,
    WriteError,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{
    source_id_from_env, ConvertOptions, InputFiles, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_PATH,
    DEFAULT_REFERENCE_PATH, DEFAULT_SOURCE_ID,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Application, Channel, Document, Lineup, Location};

// =============================================================================
// Re-exports - Extraction and assembly
// =============================================================================

pub use assemble::{assemble, DocumentMeta};
pub use extract::{extract_all, Extracted, KeyedMap};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{convert, generate};
pub use writer::{to_json_string, write_document};

// =============================================================================
// Re-exports - Comparison
// =============================================================================

pub use compare::{
    diff_documents, differences, documents_equal, load_json, ChannelId, ChannelSample,
    Difference, SortKeys, StructuralDiff,
};

// =============================================================================
// Re-exports - Logging
// =============================================================================

pub use logs::{init_logging, LogConfig, LogFormat};
