//! `QAM Channel Location.csv` and `ottlocation.csv`.
//!
//! A channel may have several locations of each kind; rows are grouped by
//! `ServiceId` in row order.

use super::{parse_optional_int, KeyedMap};
use crate::config::ConvertOptions;
use crate::error::ExtractResult;
use crate::models::{OttLocation, QamLocation};
use crate::parser::{read_records, Record};

pub fn read_qam_locations(options: &ConvertOptions) -> ExtractResult<KeyedMap<Vec<QamLocation>>> {
    let file = options.files.qam_location.as_str();
    let records = read_records(&options.input_path(file), options.delimiter)?;

    let mut locations: KeyedMap<Vec<QamLocation>> = KeyedMap::new();
    for record in &records {
        if let Some(service_id) = record.non_empty("ServiceId") {
            let location = qam_location(record, file)?;
            locations.entry_or_default(service_id).push(location);
        }
    }
    Ok(locations)
}

pub fn read_ott_locations(options: &ConvertOptions) -> ExtractResult<KeyedMap<Vec<OttLocation>>> {
    let file = options.files.ott_location.as_str();
    let records = read_records(&options.input_path(file), options.delimiter)?;

    let mut locations: KeyedMap<Vec<OttLocation>> = KeyedMap::new();
    for record in &records {
        if let Some(service_id) = record.non_empty("ServiceId") {
            locations.entry_or_default(service_id).push(OttLocation {
                url: text(record, "Url"),
                cpe_type: text(record, "CpeType"),
                drm_protection_key: text(record, "DRMProtectionKey"),
                streaming_protocol: text(record, "StreamingProtocol"),
            });
        }
    }
    Ok(locations)
}

fn qam_location(record: &Record, file: &str) -> ExtractResult<QamLocation> {
    let int = |column: &str| parse_optional_int(record.get(column), file, record.line, column);

    Ok(QamLocation {
        frequency: int("Frequency")?,
        symbol_rate: int("SymbolRate")?,
        modulation: int("Modulation")?,
        fec_inner: int("FecInner")?,
        fec_outer: int("FecOuter")?,
        program_number: int("ProgramNbr")?,
        ip_location_url: text(record, "IPLocationURL"),
        cpe_type: text(record, "CpeType"),
        drm_protection_key: text(record, "DRMProtectionKey"),
        streaming_protocol: text(record, "StreamingProtocol"),
    })
}

fn text(record: &Record, column: &str) -> Option<String> {
    record.get(column).map(str::to_string)
}
