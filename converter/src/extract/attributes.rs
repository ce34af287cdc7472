//! Key/value extracts: `Apps.csv`, `AVAD.csv`, `TSTV.csv`,
//! `Trickplaycontrol.csv` and `EDS City Mapping.csv`.
//!
//! The per-channel files share one layout after a single header line:
//!
//! ```text
//! serviceId ; key ; value
//! ```
//!
//! Rows with fewer than three cells are skipped. A repeated key for the
//! same channel overwrites the earlier value.

use indexmap::IndexMap;
use std::path::Path;

use super::KeyedMap;
use crate::config::ConvertOptions;
use crate::error::{ExtractError, ExtractResult};
use crate::models::{Application, AttributeMap, LocalizedText};
use crate::parser::read_rows;

/// Group `id;key;value` rows into one attribute map per id.
pub fn read_attribute_file(
    path: &Path,
    delimiter: u8,
) -> ExtractResult<KeyedMap<AttributeMap>> {
    let rows = read_rows(path, delimiter, 1)?;

    let mut attributes: KeyedMap<AttributeMap> = KeyedMap::new();
    for row in rows.iter().filter(|row| row.len() >= 3) {
        attributes
            .entry_or_default(row.cells[0].as_str())
            .insert(row.cells[1].clone(), row.cells[2].clone());
    }
    Ok(attributes)
}

pub fn read_avad(options: &ConvertOptions) -> ExtractResult<KeyedMap<AttributeMap>> {
    read_attribute_file(&options.input_path(&options.files.avad), options.delimiter)
}

pub fn read_tstv(options: &ConvertOptions) -> ExtractResult<KeyedMap<AttributeMap>> {
    read_attribute_file(&options.input_path(&options.files.tstv), options.delimiter)
}

pub fn read_trickplay(options: &ConvertOptions) -> ExtractResult<KeyedMap<AttributeMap>> {
    read_attribute_file(&options.input_path(&options.files.trickplay), options.delimiter)
}

/// One application per channel, built from the channel's `Apps.csv` keys.
pub fn read_apps(options: &ConvertOptions) -> ExtractResult<KeyedMap<Application>> {
    let file = options.files.apps.as_str();
    let attributes = read_attribute_file(&options.input_path(file), options.delimiter)?;

    attributes
        .iter()
        .map(|(channel_id, attrs)| {
            let app = application_from_attributes(channel_id, attrs, &options.locale, file)?;
            Ok((channel_id.clone(), app))
        })
        .collect()
}

/// Build an [`Application`] from its `Apps.csv` keys.
///
/// `delay`, `displaytime` and `repeat` default to 0; `channelbound` is a
/// comma separated list. `synopsis.<locale>` and `toastermessage.<locale>`
/// are only emitted when present and non-empty.
pub fn application_from_attributes(
    channel_id: &str,
    attrs: &AttributeMap,
    locale: &str,
    file: &str,
) -> ExtractResult<Application> {
    let text = |key: &str| attrs.get(key).cloned();
    let int = |key: &str| -> ExtractResult<i64> {
        match attrs.get(key) {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .map_err(|_| ExtractError::InvalidAttribute {
                    file: file.to_string(),
                    id: channel_id.to_string(),
                    key: key.to_string(),
                    value: value.clone(),
                }),
            None => Ok(0),
        }
    };
    let localized = |prefix: &str| -> Option<LocalizedText> {
        let value = attrs.get(&format!("{}.{}", prefix, locale))?;
        if value.is_empty() {
            return None;
        }
        let mut localized = LocalizedText::new();
        localized.insert(locale.to_string(), value.clone());
        Some(localized)
    };

    Ok(Application {
        id: text("deeplink"),
        trigger: text("trigger"),
        delay: int("delay")?,
        display_time: int("displaytime")?,
        repeat: int("repeat")?,
        channel_bound: split_list(attrs.get("channelbound").map(String::as_str)),
        logo: text("applogo"),
        poster: text("posterlogo"),
        synopsis: localized("synopsis"),
        toaster_message: localized("toastermessage"),
    })
}

/// City id to CMG value, one header line.
pub fn read_city_mapping(options: &ConvertOptions) -> ExtractResult<IndexMap<String, String>> {
    let path = options.input_path(&options.files.city_mapping);
    let rows = read_rows(&path, options.delimiter, 1)?;

    Ok(rows
        .into_iter()
        .filter(|row| row.len() >= 2)
        .map(|mut row| {
            let value = row.cells.swap_remove(1);
            let id = row.cells.swap_remove(0);
            (id, value)
        })
        .collect())
}

/// Comma separated list; absent or empty is an empty list.
pub(crate) fn split_list(value: Option<&str>) -> Vec<String> {
    match value {
        Some(v) if !v.is_empty() => v.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
