//! Verification of a generated document against a reference document.
//!
//! - [`diff_documents`]: top-level key sets, channel id sets, and one
//!   sample channel compared as a whole
//! - [`documents_equal`]: deep equality after sorting id-keyed lists
//! - [`differences`]: the paths where two normalized documents disagree
//!
//! # List normalization
//!
//! A list is sorted when every element is an object carrying the sort
//! key. The key is `id` everywhere unless [`SortKeys`] names another key
//! for that list's path. Paths use field names joined by `.` with `[]`
//! for "any element", e.g. `lineups[].channels`, whose entries carry
//! `serviceId` rather than `id`.

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{CompareError, CompareResult};

pub const DEFAULT_SORT_KEY: &str = "id";

/// Load a JSON document from disk.
pub fn load_json(path: &Path) -> CompareResult<Value> {
    let content = fs::read_to_string(path).map_err(|source| CompareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CompareError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// Normalization
// =============================================================================

/// Sort key per list path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKeys {
    default_key: String,
    overrides: Vec<(String, String)>,
}

impl Default for SortKeys {
    fn default() -> Self {
        Self {
            default_key: DEFAULT_SORT_KEY.to_string(),
            overrides: Vec::new(),
        }
    }
}

impl SortKeys {
    /// Sort the list at `path` by `key` instead of the default key.
    pub fn with_override(mut self, path: impl Into<String>, key: impl Into<String>) -> Self {
        let path = path.into();
        self.overrides.retain(|(p, _)| *p != path);
        self.overrides.push((path, key.into()));
        self
    }

    /// Add an override written as `PATH=KEY`.
    pub fn with_spec(self, spec: &str) -> CompareResult<Self> {
        match spec.split_once('=') {
            Some((path, key)) if !path.trim().is_empty() && !key.trim().is_empty() => {
                Ok(self.with_override(path.trim(), key.trim()))
            }
            _ => Err(CompareError::InvalidSortKey(spec.to_string())),
        }
    }

    pub fn key_for(&self, path: &str) -> &str {
        self.overrides
            .iter()
            .find(|(p, _)| p == path)
            .map_or(self.default_key.as_str(), |(_, key)| key.as_str())
    }
}

/// Sort, recursively, every list whose elements all carry the sort key.
pub fn normalize(value: &mut Value, keys: &SortKeys) {
    normalize_at(value, keys, "");
}

/// Normalized copy of `value`.
pub fn normalized(value: &Value, keys: &SortKeys) -> Value {
    let mut copy = value.clone();
    normalize(&mut copy, keys);
    copy
}

fn normalize_at(value: &mut Value, keys: &SortKeys, path: &str) {
    match value {
        Value::Object(map) => {
            for (field, child) in map.iter_mut() {
                normalize_at(child, keys, &join_field(path, field));
            }
        }
        Value::Array(items) => {
            let key = keys.key_for(path);
            let sortable = items
                .iter()
                .all(|item| item.as_object().is_some_and(|obj| obj.contains_key(key)));
            if sortable {
                items.sort_by(|a, b| compare_values(&a[key], &b[key]));
            }

            let item_path = format!("{}[]", path);
            for item in items.iter_mut() {
                normalize_at(item, keys, &item_path);
            }
        }
        _ => {}
    }
}

fn join_field(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}

/// Total order over sort key values: same-type values by value, otherwise by type.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Deep equality after normalizing both documents.
pub fn documents_equal(generated: &Value, reference: &Value, keys: &SortKeys) -> bool {
    normalized(generated, keys) == normalized(reference, keys)
}

// =============================================================================
// Path-level differences
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DifferenceKind {
    MissingInGenerated,
    ExtraInGenerated,
    LengthMismatch { generated: usize, reference: usize },
    ValueMismatch { generated: Value, reference: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    /// `$.channels[3].title` style location.
    pub path: String,
    pub kind: DifferenceKind,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DifferenceKind::MissingInGenerated => write!(f, "{}: missing in generated", self.path),
            DifferenceKind::ExtraInGenerated => write!(f, "{}: not in reference", self.path),
            DifferenceKind::LengthMismatch { generated, reference } => write!(
                f,
                "{}: {} elements generated, {} in reference",
                self.path, generated, reference
            ),
            DifferenceKind::ValueMismatch { generated, reference } => write!(
                f,
                "{}: generated {} != reference {}",
                self.path, generated, reference
            ),
        }
    }
}

/// Up to `limit` differences between the normalized documents.
pub fn differences(
    generated: &Value,
    reference: &Value,
    keys: &SortKeys,
    limit: usize,
) -> Vec<Difference> {
    let generated = normalized(generated, keys);
    let reference = normalized(reference, keys);
    let mut out = Vec::new();
    collect_differences("$".to_string(), &generated, &reference, limit, &mut out);
    out
}

fn collect_differences(
    path: String,
    generated: &Value,
    reference: &Value,
    limit: usize,
    out: &mut Vec<Difference>,
) {
    if out.len() >= limit {
        return;
    }

    match (generated, reference) {
        (Value::Object(ours), Value::Object(reference)) => {
            for (field, ref_value) in reference {
                let child = format!("{}.{}", path, field);
                match ours.get(field) {
                    Some(gen_value) => collect_differences(child, gen_value, ref_value, limit, out),
                    None => push(out, limit, child, DifferenceKind::MissingInGenerated),
                }
            }
            for field in ours.keys().filter(|k| !reference.contains_key(*k)) {
                push(
                    out,
                    limit,
                    format!("{}.{}", path, field),
                    DifferenceKind::ExtraInGenerated,
                );
            }
        }
        (Value::Array(ours), Value::Array(reference)) => {
            if ours.len() != reference.len() {
                push(
                    out,
                    limit,
                    path.clone(),
                    DifferenceKind::LengthMismatch {
                        generated: ours.len(),
                        reference: reference.len(),
                    },
                );
            }
            for (i, (g, r)) in ours.iter().zip(reference).enumerate() {
                collect_differences(format!("{}[{}]", path, i), g, r, limit, out);
            }
        }
        (g, r) if g != r => push(
            out,
            limit,
            path,
            DifferenceKind::ValueMismatch {
                generated: g.clone(),
                reference: r.clone(),
            },
        ),
        _ => {}
    }
}

fn push(out: &mut Vec<Difference>, limit: usize, path: String, kind: DifferenceKind) {
    if out.len() < limit {
        out.push(Difference { path, kind });
    }
}

// =============================================================================
// Structural diff
// =============================================================================

/// A channel's `id` value. String and non-string ids stay distinct, so
/// `101` and `"101"` are different channels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChannelId {
    /// Non-string id, held as its JSON text.
    Other(String),
    Text(String),
}

impl ChannelId {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => ChannelId::Text(s.clone()),
            other => ChannelId::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Text(s) | ChannelId::Other(s) => f.write_str(s),
        }
    }
}

/// Outcome of comparing one channel present in both documents.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSample {
    /// Lowest common channel id and whether both objects are equal.
    Compared { id: ChannelId, identical: bool },
    /// No common id; the first generated channel, if any, for inspection.
    NoCommonId { first_generated: Option<Value> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuralDiff {
    pub generated_key_count: usize,
    pub reference_key_count: usize,
    /// Top-level keys of the reference absent from the generated document.
    pub keys_missing: Vec<String>,
    /// Top-level keys of the generated document absent from the reference.
    pub keys_extra: Vec<String>,
    pub generated_channel_count: usize,
    pub reference_channel_count: usize,
    /// Indexes of reference channels without an `id`.
    pub reference_channels_without_id: Vec<usize>,
    pub channels_missing: Vec<ChannelId>,
    pub channels_extra: Vec<ChannelId>,
    pub sample: ChannelSample,
}

impl StructuralDiff {
    pub fn is_clean(&self) -> bool {
        self.keys_missing.is_empty()
            && self.keys_extra.is_empty()
            && self.channels_missing.is_empty()
            && self.channels_extra.is_empty()
            && matches!(self.sample, ChannelSample::Compared { identical: true, .. })
    }
}

/// Compare key sets, channel id sets and the lowest common channel.
pub fn diff_documents(generated: &Value, reference: &Value) -> StructuralDiff {
    let generated_keys = top_level_keys(generated);
    let reference_keys = top_level_keys(reference);

    let generated_channels = channels(generated);
    let reference_channels = channels(reference);

    let generated_ids: BTreeSet<ChannelId> =
        generated_channels.iter().filter_map(channel_id).collect();
    let mut reference_ids = BTreeSet::new();
    let mut reference_channels_without_id = Vec::new();
    for (i, channel) in reference_channels.iter().enumerate() {
        match channel_id(channel) {
            Some(id) => {
                reference_ids.insert(id);
            }
            None => reference_channels_without_id.push(i),
        }
    }

    let sample = match generated_ids.intersection(&reference_ids).next() {
        Some(id) => {
            let find = |list: &[Value]| {
                list.iter()
                    .find(|c| channel_id(c).as_ref() == Some(id))
                    .cloned()
            };
            ChannelSample::Compared {
                id: id.clone(),
                identical: find(generated_channels) == find(reference_channels),
            }
        }
        None => ChannelSample::NoCommonId {
            first_generated: generated_channels.first().cloned(),
        },
    };

    StructuralDiff {
        generated_key_count: generated_keys.len(),
        reference_key_count: reference_keys.len(),
        keys_missing: reference_keys.difference(&generated_keys).cloned().collect(),
        keys_extra: generated_keys.difference(&reference_keys).cloned().collect(),
        generated_channel_count: generated_channels.len(),
        reference_channel_count: reference_channels.len(),
        reference_channels_without_id,
        channels_missing: reference_ids.difference(&generated_ids).cloned().collect(),
        channels_extra: generated_ids.difference(&reference_ids).cloned().collect(),
        sample,
    }
}

fn top_level_keys(document: &Value) -> BTreeSet<String> {
    document
        .as_object()
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default()
}

fn channels(document: &Value) -> &[Value] {
    document
        .get("channels")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn channel_id(channel: &Value) -> Option<ChannelId> {
    channel.get("id").map(ChannelId::from_value)
}

fn join_ids(ids: &[ChannelId]) -> String {
    ids.iter().map(ChannelId::to_string).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for StructuralDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Key Comparison ---")?;
        writeln!(f, "Generated keys count: {}", self.generated_key_count)?;
        writeln!(f, "Reference keys count: {}", self.reference_key_count)?;
        if !self.keys_missing.is_empty() {
            writeln!(
                f,
                "Keys in reference but not in generated: {}",
                self.keys_missing.join(", ")
            )?;
        }
        if !self.keys_extra.is_empty() {
            writeln!(
                f,
                "Keys in generated but not in reference: {}",
                self.keys_extra.join(", ")
            )?;
        }

        writeln!(f, "\n--- Channel Comparison ---")?;
        writeln!(f, "Generated channels count: {}", self.generated_channel_count)?;
        writeln!(f, "Reference channels count: {}", self.reference_channel_count)?;
        for i in &self.reference_channels_without_id {
            writeln!(f, "Reference channel at index {} has no 'id' key.", i)?;
        }
        if !self.channels_missing.is_empty() {
            writeln!(
                f,
                "Channels in reference but not in generated ({}): {}",
                self.channels_missing.len(),
                join_ids(&self.channels_missing)
            )?;
        }
        if !self.channels_extra.is_empty() {
            writeln!(
                f,
                "Channels in generated but not in reference ({}): {}",
                self.channels_extra.len(),
                join_ids(&self.channels_extra)
            )?;
        }

        match &self.sample {
            ChannelSample::Compared { id, identical } => {
                writeln!(f, "\nComparing first common channel: {}", id)?;
                if *identical {
                    write!(f, "Channel objects are identical.")
                } else {
                    write!(f, "Channel objects are different.")
                }
            }
            ChannelSample::NoCommonId {
                first_generated: Some(channel),
            } => {
                writeln!(
                    f,
                    "No common channel IDs found to compare. Showing first generated channel."
                )?;
                let pretty = serde_json::to_string_pretty(channel).map_err(|_| fmt::Error)?;
                write!(f, "{}", pretty)
            }
            ChannelSample::NoCommonId { first_generated: None } => {
                write!(f, "No channels in generated file to compare.")
            }
        }
    }
}
