//! Per-file extractors.
//!
//! Each extractor reads one extract from the input directory and shapes
//! its rows into the structure the assembler joins on. A missing file
//! yields an empty structure (the reader logs a warning); a cell that must
//! be an integer and is not aborts the run.
//!
//! ```text
//! Channels.csv ─────────────┐
//! ServiceGenre.csv ─────────┤
//! Channel Lineup.csv ───────┤
//! QAM / OTT locations ──────┤──▶ Extracted ──▶ assemble
//! Linear / Replay Products ─┤
//! Apps, AVAD, TSTV, Trick ──┤
//! providers, City Mapping ──┘
//! ```

pub mod attributes;
pub mod channels;
pub mod genres;
pub mod keyed;
pub mod lineups;
pub mod locations;
pub mod products;

pub use attributes::{
    read_apps, read_attribute_file, read_avad, read_city_mapping, read_trickplay, read_tstv,
};
pub use channels::{read_channels, read_providers};
pub use genres::read_service_genres;
pub use keyed::KeyedMap;
pub use lineups::read_channel_lineup;
pub use locations::{read_ott_locations, read_qam_locations};
pub use products::{read_linear_products, read_replay_products};

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::ConvertOptions;
use crate::error::{ExtractError, ExtractResult};
use crate::logs::log_info;
use crate::models::{
    Application, AttributeMap, Classifications, Lineup, OttLocation, Product, QamLocation,
};
use crate::parser::Record;

/// Output of every extractor, ready for assembly.
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    pub channels: KeyedMap<Record>,
    pub classifications: Classifications,
    pub lineups: Vec<Lineup>,
    pub qam_locations: KeyedMap<Vec<QamLocation>>,
    pub ott_locations: KeyedMap<Vec<OttLocation>>,
    pub linear_products: Vec<Product>,
    pub replay_products: Vec<Product>,
    pub apps: KeyedMap<Application>,
    pub providers: Vec<Value>,
    pub avad: KeyedMap<AttributeMap>,
    pub tstv: KeyedMap<AttributeMap>,
    pub trickplay: KeyedMap<AttributeMap>,
    pub city_mapping: IndexMap<String, String>,
}

/// Run all thirteen extractors against `options.input_dir`.
pub fn extract_all(options: &ConvertOptions) -> ExtractResult<Extracted> {
    log_info(format!("Reading extracts from {}", options.input_dir.display()));

    let extracted = Extracted {
        channels: read_channels(options)?,
        classifications: read_service_genres(options)?,
        lineups: read_channel_lineup(options)?,
        qam_locations: read_qam_locations(options)?,
        ott_locations: read_ott_locations(options)?,
        linear_products: read_linear_products(options)?,
        replay_products: read_replay_products(options)?,
        apps: read_apps(options)?,
        providers: read_providers(options)?,
        avad: read_avad(options)?,
        tstv: read_tstv(options)?,
        trickplay: read_trickplay(options)?,
        city_mapping: read_city_mapping(options)?,
    };

    let genres = &extracted.classifications;
    log_info(format!("{} channels", extracted.channels.len()));
    log_info(format!(
        "{} service genres, {} replay genres, {} genre mappings",
        genres.service_genre.len(),
        genres.replay_genre.len(),
        genres.genre.len()
    ));
    log_info(format!("{} lineups", extracted.lineups.len()));
    log_info(format!(
        "{} QAM / {} OTT located channels",
        extracted.qam_locations.len(),
        extracted.ott_locations.len()
    ));
    log_info(format!(
        "{} linear / {} replay products",
        extracted.linear_products.len(),
        extracted.replay_products.len()
    ));
    log_info(format!(
        "{} apps, {} providers, {} city mappings",
        extracted.apps.len(),
        extracted.providers.len(),
        extracted.city_mapping.len()
    ));

    Ok(extracted)
}

/// Parse a required integer cell.
pub(crate) fn parse_int(value: &str, file: &str, line: usize, column: &str) -> ExtractResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ExtractError::InvalidInteger {
            file: file.to_string(),
            line,
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Parse an optional integer cell: absent or empty is `None`.
pub(crate) fn parse_optional_int(
    value: Option<&str>,
    file: &str,
    line: usize,
    column: &str,
) -> ExtractResult<Option<i64>> {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => parse_int(v, file, line, column).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::fs;
    use tempfile::TempDir;

    use crate::config::ConvertOptions;

    /// Temporary input directory populated with `(file name, content)` pairs.
    pub fn input_dir(files: &[(&str, &str)]) -> (TempDir, ConvertOptions) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let options = ConvertOptions::default()
            .with_input_dir(dir.path())
            .with_output_path(dir.path().join("output/output.json"));
        (dir, options)
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::input_dir;
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(" 42 ", "f.csv", 2, "c").unwrap(), 42);
        let err = parse_int("4x2", "f.csv", 2, "c").unwrap_err();
        assert!(err.to_string().contains("'4x2'"));
    }

    #[test]
    fn test_parse_optional_int() {
        assert_eq!(parse_optional_int(None, "f", 1, "c").unwrap(), None);
        assert_eq!(parse_optional_int(Some(""), "f", 1, "c").unwrap(), None);
        assert_eq!(parse_optional_int(Some("7"), "f", 1, "c").unwrap(), Some(7));
        assert!(parse_optional_int(Some("seven"), "f", 1, "c").is_err());
    }

    #[test]
    fn test_extract_all_with_empty_directory() {
        let (_dir, options) = input_dir(&[]);
        let extracted = extract_all(&options).unwrap();

        assert!(extracted.channels.is_empty());
        assert!(extracted.classifications.genre.is_empty());
        assert!(extracted.lineups.is_empty());
        assert!(extracted.linear_products.is_empty());
        assert!(extracted.apps.is_empty());
        assert!(extracted.city_mapping.is_empty());
    }

    #[test]
    fn test_extract_all_missing_one_file() {
        let (_dir, options) = input_dir(&[
            ("Channels.csv", "ServiceId;Name\n101;News1\n"),
            ("AVAD.csv", "serviceid;key;value\n101;adSlot;pre\n"),
        ]);
        let extracted = extract_all(&options).unwrap();

        assert_eq!(extracted.channels.len(), 1);
        assert_eq!(extracted.avad.len(), 1);
        assert!(extracted.tstv.is_empty());
    }
}
