//! Delimited file reader for the lineup extracts.
//!
//! Two shapes are produced from the same reading rules:
//!
//! - [`Record`]: header-keyed rows, for extracts addressed by column name
//! - [`Row`]: positional rows, for extracts addressed by column index
//!
//! Rules shared by both: blank rows are skipped, header cells are trimmed,
//! data cells are kept verbatim, a UTF-8 BOM is stripped, and a missing
//! file is a warning that yields no rows.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::logs::{log_debug, log_warning};

/// One positional row with its 1-based line number in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub cells: Vec<String>,
}

impl Row {
    /// Cell at `index`, if the row is long enough.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Cell at `index` when present and not empty.
    pub fn non_empty(&self, index: usize) -> Option<&str> {
        self.cell(index).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One header-keyed row.
///
/// Keys follow header order. A row shorter than the header has no entry
/// for the trailing columns; cells beyond the header are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: usize,
    fields: IndexMap<String, String>,
}

impl Record {
    pub fn new(line: usize, fields: IndexMap<String, String>) -> Self {
        Self { line, fields }
    }

    /// Raw value of `column`, `None` when the row did not reach it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value of `column` when present and not empty.
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }

    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    /// JSON object with the row's fields in header order.
    pub fn to_json(&self) -> Value {
        let obj: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(obj)
    }
}

/// Read a header-keyed file. The first non-blank row is the header.
pub fn read_records(path: &Path, delimiter: u8) -> CsvResult<Vec<Record>> {
    match load_text(path)? {
        Some(content) => parse_records(&content, delimiter, path),
        None => Ok(Vec::new()),
    }
}

/// Read a positional file, skipping `header_lines` leading non-blank rows.
pub fn read_rows(path: &Path, delimiter: u8, header_lines: usize) -> CsvResult<Vec<Row>> {
    match load_text(path)? {
        Some(content) => parse_rows(&content, delimiter, header_lines, path),
        None => Ok(Vec::new()),
    }
}

/// Parse header-keyed records from already decoded text.
pub fn parse_records(content: &str, delimiter: u8, path: &Path) -> CsvResult<Vec<Record>> {
    let mut rows = split_rows(content, delimiter, path)?.into_iter();

    let headers: Vec<String> = match rows.next() {
        Some(header) => header.cells.iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(Vec::new()),
    };

    let records = rows
        .map(|row| {
            let fields = headers
                .iter()
                .zip(row.cells)
                .map(|(h, v)| (h.clone(), v))
                .collect();
            Record::new(row.line, fields)
        })
        .collect();

    Ok(records)
}

/// Parse positional rows from already decoded text.
pub fn parse_rows(
    content: &str,
    delimiter: u8,
    header_lines: usize,
    path: &Path,
) -> CsvResult<Vec<Row>> {
    Ok(split_rows(content, delimiter, path)?
        .into_iter()
        .skip(header_lines)
        .collect())
}

/// Every non-blank row of the text, header included.
fn split_rows(content: &str, delimiter: u8, path: &Path) -> CsvResult<Vec<Row>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|source| CsvError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record.position().map_or(0, |p| p.line() as usize);
        rows.push(Row {
            line,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(rows)
}

/// Read and decode a file; `None` when it does not exist.
fn load_text(path: &Path) -> CsvResult<Option<String>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log_warning(format!("File not found at {}", path.display()));
            return Ok(None);
        }
        Err(source) => {
            return Err(CsvError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    decode_content(&bytes, path).map(Some)
}

/// Decode bytes as UTF-8, falling back to the encoding `chardet` detects.
pub fn decode_content(bytes: &[u8], path: &Path) -> CsvResult<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.to_string());
    }

    let encoding = detect_encoding(bytes);
    log_debug(format!(
        "{} is not UTF-8, decoding as {}",
        path.display(),
        encoding
    ));

    // Bytes already failed UTF-8, so a UTF-8 guess falls back to windows-1252
    let codec = encoding_rs::Encoding::for_label(encoding.as_bytes())
        .filter(|codec| *codec != encoding_rs::UTF_8)
        .unwrap_or(encoding_rs::WINDOWS_1252);
    let (text, _, had_errors) = codec.decode(bytes);
    if had_errors {
        return Err(CsvError::Encoding {
            path: path.to_path_buf(),
            encoding,
        });
    }
    Ok(text.into_owned())
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}
