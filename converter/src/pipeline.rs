//! High-level API: extract, assemble and write in one call.
//!
//! # Example
//!
//! ```rust,ignore
//! use acmgen::{convert, ConvertOptions, DocumentMeta};
//! use chrono::Utc;
//!
//! let options = ConvertOptions::default();
//! let meta = DocumentMeta::new("IE_STARHUB", Utc::now());
//! let document = convert(&options, &meta)?;
//! println!("Generated {} channels", document.channels.len());
//! ```

use crate::assemble::{assemble, DocumentMeta};
use crate::config::ConvertOptions;
use crate::error::ConvertResult;
use crate::extract::extract_all;
use crate::logs::log_info;
use crate::models::Document;
use crate::writer::write_document;

/// Build the document from `options.input_dir` without writing it.
pub fn generate(options: &ConvertOptions, meta: &DocumentMeta) -> ConvertResult<Document> {
    let extracted = extract_all(options)?;
    log_info("Assembling document...");
    Ok(assemble(extracted, meta))
}

/// Build the document and write it to `options.output_path`.
///
/// Nothing is written when extraction fails.
pub fn convert(options: &ConvertOptions, meta: &DocumentMeta) -> ConvertResult<Document> {
    let document = generate(options, meta)?;
    write_document(&options.output_path, &document)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{documents_equal, load_json, SortKeys};
    use crate::error::ConvertError;
    use crate::extract::testutil::input_dir;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn meta() -> DocumentMeta {
        DocumentMeta::new("IE_STARHUB", Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap())
    }

    const CHANNELS: &str = "ServiceId;Name;Description;ServiceGenre;Replayable;StartOver\n\
        101;News1;Daily news;S1;TRUE;false\n\
        102;Sports;;;false;true\n";

    const QAM: &str = "ServiceId;Frequency;SymbolRate;Modulation;FecInner;FecOuter;ProgramNbr;\
        IPLocationURL;CpeType;DRMProtectionKey;StreamingProtocol\n\
        101;474000;;256;;;12;;STB;;DVB\n";

    const OTT: &str = "ServiceId;Url;CpeType;DRMProtectionKey;StreamingProtocol\n\
        102;http://cdn/102.m3u8;IPTV;;HLS\n";

    const GENRES: &str = "termId;type;order;parentId;name\nS1;service;1;;News\nS1;mapping;1;;\n";

    const LINEUP: &str = "LineupID;LineupName;ServiceID;ChannelNumber\n\
        L1;Basic;101;1\n\
        L1;Basic;102;2\n";

    #[test]
    fn test_convert_end_to_end() {
        let (dir, options) = input_dir(&[
            ("Channels.csv", CHANNELS),
            ("QAM Channel Location.csv", QAM),
            ("ottlocation.csv", OTT),
            ("ServiceGenre.csv", GENRES),
            ("Channel Lineup.csv", LINEUP),
            ("Linear Products.csv", "Linear\nProductId;EDSProductId\nLP1;E1\n"),
            ("Apps.csv", "Channel;Call;Definition\n102;deeplink;app://score\n102;repeat;2\n"),
            ("providers.csv", "id;name\nP1;Provider\n"),
            ("EDS City Mapping.csv", "cityId;CMG\nDUB;CMG01\n"),
        ]);

        let document = convert(&options, &meta()).unwrap();
        assert_eq!(document.channels.len(), 2);
        assert_eq!(document.locations.len(), 2);

        let written = load_json(&dir.path().join("output/output.json")).unwrap();
        assert_eq!(written["channels"][0]["replayable"], json!(true));
        assert_eq!(written["channels"][0]["serviceGenreIds"], json!(["S1"]));
        assert_eq!(
            written["channels"][0]["locations"][0],
            json!({
                "type": "qam",
                "frequency": 474000,
                "symbolRate": null,
                "modulation": 256,
                "fecInner": null,
                "fecOuter": null,
                "programNumber": 12,
                "ipLocationUrl": "",
                "cpeType": "STB",
                "drmProtectionKey": "",
                "streamingProtocol": "DVB"
            })
        );
        assert_eq!(written["channels"][1]["serviceGenreIds"], json!([]));
        assert_eq!(written["channels"][1]["startOver"], json!(true));
        assert_eq!(written["channels"][1]["applications"][0]["repeat"], json!(2));
        assert_eq!(written["classifications"]["genre"][0]["name"], json!("News"));
        assert_eq!(
            written["lineups"][0]["channels"][1],
            json!({"serviceId": "102", "channelNumber": 2})
        );
        assert_eq!(written["productizing"]["linear"], json!([{"id": "LP1", "edsId": "E1"}]));
        assert_eq!(written["productizing"]["replay"], json!([]));
        assert_eq!(written["cityIdMapping"], json!({"DUB": "CMG01"}));
        assert_eq!(written["providers"], json!([{"id": "P1", "name": "Provider"}]));
        assert_eq!(written["locations"][1]["type"], json!("ott"));

        let mut shuffled = written.clone();
        shuffled["channels"].as_array_mut().unwrap().reverse();
        assert!(documents_equal(&written, &shuffled, &SortKeys::default()));
    }

    #[test]
    fn test_bad_channel_number_aborts_without_output() {
        let (dir, options) = input_dir(&[
            ("Channels.csv", CHANNELS),
            (
                "Channel Lineup.csv",
                "LineupID;LineupName;ServiceID;ChannelNumber\nL1;Basic;101;first\n",
            ),
        ]);

        let err = convert(&options, &meta()).unwrap_err();
        assert!(matches!(err, ConvertError::Extract(_)));
        assert!(!dir.path().join("output/output.json").exists());
    }

    #[test]
    fn test_generation_is_reproducible() {
        let (_dir, options) = input_dir(&[("Channels.csv", CHANNELS)]);
        let first = generate(&options, &meta()).unwrap();
        let second = generate(&options, &meta()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.diagnostics.generation_date, "2025-08-01T09:00:00.000Z");
    }
}
