//! Output models of the lineup document.
//!
//! - [`Document`] - the envelope written to disk
//! - [`Channel`] - one service with its locations and application
//! - [`Location`] - QAM tuning or OTT streaming endpoint
//! - [`Application`] - companion app bound to a channel
//! - [`Classifications`] - service, replay and mapped genres
//! - [`Lineup`] - ordered channel placements
//!
//! Field order of each struct is the key order of the emitted JSON.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form per-channel attributes (AVAD, TSTV, trickplay, app rows).
pub type AttributeMap = IndexMap<String, String>;

// =============================================================================
// Envelope
// =============================================================================

/// The generated document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub diagnostics: Diagnostics,
    pub classifications: Classifications,
    /// Always empty.
    pub recommendation_topics: Vec<Value>,
    pub deployment: Deployment,
    pub city_id_mapping: IndexMap<String, String>,
    pub productizing: Productizing,
    pub channels: Vec<Channel>,
    pub lineups: Vec<Lineup>,
    /// Every channel location, in channel order, QAM before OTT.
    pub locations: Vec<Location>,
    /// Always empty.
    pub related_materials: Vec<Value>,
    /// Always empty; applications live on their channel.
    pub applications: Vec<Value>,
    /// Provider rows as read, keys in header order.
    pub providers: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub source: String,
    pub generation_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub deployment_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Productizing {
    pub linear: Vec<Product>,
    pub replay: Vec<Product>,
}

/// A linear or replay product with its EDS catalog id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub eds_id: Option<String>,
}

// =============================================================================
// Classifications
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classifications {
    pub service_genre: Vec<ServiceGenre>,
    pub replay_genre: Vec<ReplayGenre>,
    pub genre: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceGenre {
    pub id: String,
    pub name: String,
    pub applications: Vec<Value>,
    /// Emitted as the string `"false"`, as consumers of the document expect.
    pub default: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplayGenre {
    pub id: String,
    pub name: String,
    pub order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Genre {
    pub id: String,
    /// Name of the service/replay genre with the same term id.
    pub name: Option<String>,
    pub order: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub replay_genre_id: Option<String>,
}

// =============================================================================
// Lineups
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lineup {
    pub id: String,
    pub name: Option<String>,
    pub channels: Vec<LineupChannel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineupChannel {
    pub service_id: Option<String>,
    pub channel_number: i64,
}

// =============================================================================
// Channels
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    #[serde(rename = "type")]
    pub channel_type: Option<String>,
    pub service_genre_ids: Vec<String>,
    pub replayable: bool,
    pub start_over: bool,
    pub catch_up: bool,
    pub ott_follow: bool,
    pub cas_id: Option<String>,
    pub provider_id: Option<String>,
    pub logo: Option<String>,
    pub poster: Option<String>,
    pub locations: Vec<Location>,
    /// Zero or one entry.
    pub applications: Vec<Application>,
    pub avad: AttributeMap,
    pub tstv: AttributeMap,
    pub trickplay: AttributeMap,
}

/// Delivery endpoint of a channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Location {
    Qam(QamLocation),
    Ott(OttLocation),
}

/// Cable tuning parameters. Numeric fields are `None` when blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QamLocation {
    pub frequency: Option<i64>,
    pub symbol_rate: Option<i64>,
    pub modulation: Option<i64>,
    pub fec_inner: Option<i64>,
    pub fec_outer: Option<i64>,
    pub program_number: Option<i64>,
    pub ip_location_url: Option<String>,
    pub cpe_type: Option<String>,
    pub drm_protection_key: Option<String>,
    pub streaming_protocol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OttLocation {
    pub url: Option<String>,
    pub cpe_type: Option<String>,
    pub drm_protection_key: Option<String>,
    pub streaming_protocol: Option<String>,
}

/// Companion application shown on a channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Deeplink id.
    pub id: Option<String>,
    pub trigger: Option<String>,
    pub delay: i64,
    pub display_time: i64,
    pub repeat: i64,
    pub channel_bound: Vec<String>,
    pub logo: Option<String>,
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub synopsis: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub toaster_message: Option<LocalizedText>,
}

/// Locale to text, e.g. `{"en-IE": "..."}`.
pub type LocalizedText = IndexMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_tag_comes_first() {
        let loc = Location::Qam(QamLocation {
            frequency: Some(474000),
            ..Default::default()
        });
        let json = serde_json::to_string(&loc).unwrap();
        assert!(json.starts_with(r#"{"type":"qam","frequency":474000,"symbolRate":null"#));

        let ott = Location::Ott(OttLocation {
            url: Some("http://cdn/x.m3u8".into()),
            ..Default::default()
        });
        assert_eq!(serde_json::to_value(&ott).unwrap()["type"], "ott");
    }

    #[test]
    fn test_genre_optional_ids_omitted() {
        let genre = Genre {
            id: "g1".into(),
            name: None,
            order: 0,
            parent_id: None,
            replay_genre_id: Some("r1".into()),
        };
        let value = serde_json::to_value(&genre).unwrap();
        assert_eq!(
            value,
            json!({"id": "g1", "name": null, "order": 0, "replayGenreId": "r1"})
        );
    }

    #[test]
    fn test_channel_type_key() {
        let channel = Channel {
            id: "101".into(),
            title: None,
            description: None,
            long_description: None,
            channel_type: Some("TV".into()),
            service_genre_ids: vec![],
            replayable: false,
            start_over: false,
            catch_up: false,
            ott_follow: false,
            cas_id: None,
            provider_id: None,
            logo: None,
            poster: None,
            locations: vec![],
            applications: vec![],
            avad: AttributeMap::new(),
            tstv: AttributeMap::new(),
            trickplay: AttributeMap::new(),
        };
        let value = serde_json::to_value(&channel).unwrap();
        assert_eq!(value["type"], "TV");
        assert_eq!(value["serviceGenreIds"], json!([]));
        assert_eq!(value["avad"], json!({}));
    }
}
