//! Join extractor outputs into the lineup document.
//!
//! Channels are emitted in the order of `Channels.csv`. For each one the
//! assembler attaches its QAM then OTT locations, at most one application,
//! and its AVAD / TSTV / trickplay maps. The flat document-level location
//! list is returned alongside the channels by [`assemble_channels`].

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::DEFAULT_SOURCE_ID;
use crate::extract::attributes::split_list;
use crate::extract::{Extracted, KeyedMap};
use crate::logs::log_success;
use crate::models::{
    AttributeMap, Channel, Deployment, Diagnostics, Document, Location, Productizing,
};
use crate::parser::Record;

/// Envelope metadata, injected so output does not depend on the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub source_id: String,
    pub generation_date: DateTime<Utc>,
    pub deployment_date: DateTime<Utc>,
}

impl DocumentMeta {
    /// Same timestamp for generation and deployment.
    pub fn new(source_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            source_id: source_id.into(),
            generation_date: at,
            deployment_date: at,
        }
    }
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_ID, DateTime::<Utc>::default())
    }
}

/// `2025-08-01T09:00:00.000Z`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the complete document.
pub fn assemble(extracted: Extracted, meta: &DocumentMeta) -> Document {
    let (channels, locations) = assemble_channels(&extracted);

    log_success(format!(
        "Assembled {} channels with {} locations",
        channels.len(),
        locations.len()
    ));

    Document {
        diagnostics: Diagnostics {
            source: meta.source_id.clone(),
            generation_date: format_timestamp(&meta.generation_date),
        },
        classifications: extracted.classifications,
        recommendation_topics: Vec::new(),
        deployment: Deployment {
            id: meta.source_id.clone(),
            deployment_date: format_timestamp(&meta.deployment_date),
        },
        city_id_mapping: extracted.city_mapping,
        productizing: Productizing {
            linear: extracted.linear_products,
            replay: extracted.replay_products,
        },
        channels,
        lineups: extracted.lineups,
        locations,
        related_materials: Vec::new(),
        applications: Vec::new(),
        providers: extracted.providers,
    }
}

/// Channels in extractor order, plus every location they own in the same order.
pub fn assemble_channels(extracted: &Extracted) -> (Vec<Channel>, Vec<Location>) {
    let mut channels = Vec::with_capacity(extracted.channels.len());
    let mut all_locations = Vec::new();

    for (channel_id, record) in &extracted.channels {
        let channel = build_channel(channel_id, record, extracted);
        all_locations.extend(channel.locations.iter().cloned());
        channels.push(channel);
    }

    (channels, all_locations)
}

fn build_channel(channel_id: &str, record: &Record, extracted: &Extracted) -> Channel {
    let qam = extracted
        .qam_locations
        .get(channel_id)
        .into_iter()
        .flatten()
        .cloned()
        .map(Location::Qam);
    let ott = extracted
        .ott_locations
        .get(channel_id)
        .into_iter()
        .flatten()
        .cloned()
        .map(Location::Ott);

    let text = |column: &str| record.get(column).map(str::to_string);
    let attributes =
        |map: &KeyedMap<AttributeMap>| map.get(channel_id).cloned().unwrap_or_default();

    Channel {
        id: channel_id.to_string(),
        title: text("Name"),
        description: text("Description"),
        long_description: text("LongDescription"),
        channel_type: text("Type"),
        service_genre_ids: split_list(record.get("ServiceGenre")),
        replayable: flag(record, "Replayable"),
        start_over: flag(record, "StartOver"),
        catch_up: flag(record, "CatchUp"),
        ott_follow: flag(record, "OTTFollow"),
        cas_id: text("CasId"),
        provider_id: text("ProviderId"),
        logo: text("FocusedLogo"),
        poster: text("Poster"),
        locations: qam.chain(ott).collect(),
        applications: extracted.apps.get(channel_id).cloned().into_iter().collect(),
        avad: attributes(&extracted.avad),
        tstv: attributes(&extracted.tstv),
        trickplay: attributes(&extracted.trickplay),
    }
}

/// `true` only for a case-insensitive `"true"`.
fn flag(record: &Record, column: &str) -> bool {
    record
        .get(column)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Application, OttLocation, QamLocation};
    use chrono::TimeZone;
    use indexmap::IndexMap;
    use serde_json::json;

    fn record(fields: &[(&str, &str)]) -> Record {
        let fields: IndexMap<String, String> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Record::new(2, fields)
    }

    fn meta() -> DocumentMeta {
        DocumentMeta::new("IE_STARHUB", Utc.with_ymd_and_hms(2025, 8, 1, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_channel_without_related_rows() {
        let mut extracted = Extracted::default();
        extracted.channels.insert(
            "101",
            record(&[("ServiceId", "101"), ("Name", "News1"), ("Replayable", "TRUE")]),
        );

        let document = assemble(extracted, &meta());
        let channel = serde_json::to_value(&document.channels[0]).unwrap();

        assert_eq!(
            channel,
            json!({
                "id": "101",
                "title": "News1",
                "description": null,
                "longDescription": null,
                "type": null,
                "serviceGenreIds": [],
                "replayable": true,
                "startOver": false,
                "catchUp": false,
                "ottFollow": false,
                "casId": null,
                "providerId": null,
                "logo": null,
                "poster": null,
                "locations": [],
                "applications": [],
                "avad": {},
                "tstv": {},
                "trickplay": {}
            })
        );
    }

    #[test]
    fn test_flags_and_genres() {
        let mut extracted = Extracted::default();
        extracted.channels.insert(
            "101",
            record(&[
                ("ServiceId", "101"),
                ("ServiceGenre", "S1,S2"),
                ("StartOver", "true"),
                ("CatchUp", "yes"),
                ("OTTFollow", "True"),
            ]),
        );
        extracted.channels.insert(
            "102",
            record(&[("ServiceId", "102"), ("ServiceGenre", "")]),
        );

        let (channels, _) = assemble_channels(&extracted);
        assert_eq!(channels[0].service_genre_ids, vec!["S1", "S2"]);
        assert!(channels[0].start_over);
        assert!(!channels[0].catch_up);
        assert!(channels[0].ott_follow);
        assert!(channels[1].service_genre_ids.is_empty());
    }

    #[test]
    fn test_locations_qam_first_and_flattened() {
        let mut extracted = Extracted::default();
        for id in ["101", "102"] {
            extracted
                .channels
                .insert(id, record(&[("ServiceId", id)]));
        }
        extracted.ott_locations.insert(
            "101",
            vec![OttLocation {
                url: Some("http://cdn/101".into()),
                ..Default::default()
            }],
        );
        extracted.qam_locations.insert(
            "101",
            vec![QamLocation {
                frequency: Some(474000),
                ..Default::default()
            }],
        );
        extracted.qam_locations.insert(
            "102",
            vec![QamLocation {
                frequency: Some(482000),
                ..Default::default()
            }],
        );
        // No channel row, never emitted
        extracted.qam_locations.insert("999", vec![QamLocation::default()]);

        let (channels, locations) = assemble_channels(&extracted);

        assert!(matches!(channels[0].locations[0], Location::Qam(_)));
        assert!(matches!(channels[0].locations[1], Location::Ott(_)));
        assert_eq!(locations.len(), 3);
        assert_eq!(locations[0], channels[0].locations[0]);
        assert_eq!(locations[1], channels[0].locations[1]);
        assert_eq!(locations[2], channels[1].locations[0]);
    }

    #[test]
    fn test_application_and_attributes_attached() {
        let mut extracted = Extracted::default();
        extracted.channels.insert("101", record(&[("ServiceId", "101")]));

        let mut apps = KeyedMap::new();
        apps.insert(
            "101",
            Application {
                id: Some("app://news".into()),
                trigger: None,
                delay: 0,
                display_time: 0,
                repeat: 0,
                channel_bound: vec![],
                logo: None,
                poster: None,
                synopsis: None,
                toaster_message: None,
            },
        );
        extracted.apps = apps;

        let mut tstv = AttributeMap::new();
        tstv.insert("window".into(), "7200".into());
        extracted.tstv.insert("101", tstv);

        let (channels, _) = assemble_channels(&extracted);
        assert_eq!(channels[0].applications.len(), 1);
        assert_eq!(channels[0].tstv["window"], "7200");
        assert!(channels[0].avad.is_empty());

        let app = serde_json::to_value(&channels[0].applications[0]).unwrap();
        assert!(app.get("synopsis").is_none());
        assert!(app.get("toasterMessage").is_none());
    }

    #[test]
    fn test_envelope() {
        let document = assemble(Extracted::default(), &meta());
        let value = serde_json::to_value(&document).unwrap();

        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "diagnostics",
                "classifications",
                "recommendationTopics",
                "deployment",
                "cityIdMapping",
                "productizing",
                "channels",
                "lineups",
                "locations",
                "relatedMaterials",
                "applications",
                "providers",
            ]
        );
        assert_eq!(
            value["diagnostics"],
            json!({"source": "IE_STARHUB", "generationDate": "2025-08-01T09:00:00.000Z"})
        );
        assert_eq!(
            value["deployment"],
            json!({"id": "IE_STARHUB", "deploymentDate": "2025-08-01T09:00:00.000Z"})
        );
        assert_eq!(value["recommendationTopics"], json!([]));
        assert_eq!(value["relatedMaterials"], json!([]));
        assert_eq!(value["applications"], json!([]));
        assert_eq!(
            value["classifications"],
            json!({"serviceGenre": [], "replayGenre": [], "genre": []})
        );
    }
}
