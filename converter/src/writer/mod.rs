//! Serialize the document as 4-space indented JSON.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

use crate::error::{WriteError, WriteResult};
use crate::logs::log_success;
use crate::models::Document;

const INDENT: &[u8] = b"    ";

/// JSON text of `value`, keys in declaration order, 4-space indent.
pub fn to_json_string<T: Serialize>(value: &T) -> WriteResult<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `document` to `path`, creating missing parent directories.
///
/// The file is written in place: an interrupted write leaves it partial.
pub fn write_document(path: &Path, document: &Document) -> WriteResult<()> {
    let json = to_json_string(document)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| WriteError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, json).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log_success(format!("Output written to: {}", path.display()));
    Ok(())
}
