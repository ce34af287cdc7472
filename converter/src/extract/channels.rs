//! `Channels.csv` and `providers.csv`.

use serde_json::Value;

use super::KeyedMap;
use crate::config::ConvertOptions;
use crate::error::ExtractResult;
use crate::logs::{log_debug, log_warning};
use crate::parser::{read_records, Record};

/// Channel rows keyed by `ServiceId`. Rows without one are skipped.
pub fn read_channels(options: &ConvertOptions) -> ExtractResult<KeyedMap<Record>> {
    let file = &options.files.channels;
    let records = read_records(&options.input_path(file), options.delimiter)?;
    log_debug(format!("Total rows in {}: {}", file, records.len()));

    let mut channels = KeyedMap::new();
    for record in records {
        let Some(service_id) = record.non_empty("ServiceId").map(str::to_string) else {
            log_warning(format!(
                "Skipping line {} in {}: missing ServiceId",
                record.line, file
            ));
            continue;
        };

        let line = record.line;
        if channels.insert(service_id.as_str(), record).is_some() {
            log_debug(format!(
                "{} line {} replaces earlier row for ServiceId {}",
                file, line, service_id
            ));
        }
    }

    Ok(channels)
}

/// Provider rows, passed through as JSON objects.
pub fn read_providers(options: &ConvertOptions) -> ExtractResult<Vec<Value>> {
    let path = options.input_path(&options.files.providers);
    let records = read_records(&path, options.delimiter)?;
    Ok(records.iter().map(Record::to_json).collect())
}
