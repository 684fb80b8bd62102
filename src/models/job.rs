//! Job posting records, from raw API items to flat export rows.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single item from the search response.
///
/// The source does not guarantee a schema, so the record stays an untyped
/// mapping. Typed access goes through `services::fields`; fields nobody asks
/// for are carried along and ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Wrap a JSON value, `None` unless it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Look up a top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Iterate top-level fields in ascending key order.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        let mut fields: Vec<_> = self.0.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        fields.into_iter()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Deduplication identity of a posting, compared as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobKey(String);

impl JobKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered, first-writer-wins map from `JobKey` to `RawRecord`.
#[derive(Debug, Clone, Default)]
pub struct DedupMap {
    entries: Vec<(JobKey, RawRecord)>,
    index: HashMap<JobKey, usize>,
}

impl DedupMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the key is already present. Returns whether the record was kept.
    pub fn insert(&mut self, key: JobKey, record: RawRecord) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, record));
        true
    }

    pub fn contains(&self, key: &JobKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &JobKey) -> Option<&RawRecord> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&JobKey, &RawRecord)> {
        self.entries.iter().map(|(k, r)| (k, r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &JobKey> {
        self.entries.iter().map(|(k, _)| k)
    }
}

/// A fully resolved posting, ready for display and export.
///
/// Serialized column names are the ones the CSV export has always used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(rename = "titel")]
    pub title: String,

    #[serde(rename = "arbeitgeber")]
    pub employer: String,

    #[serde(rename = "arbeitsort")]
    pub location: String,

    #[serde(rename = "plz")]
    pub postal_code: String,

    /// `YYYY-MM-DD` or empty
    pub published: String,

    #[serde(rename = "refnr")]
    pub reference_number: String,

    /// Non-empty exactly when `reference_number` is
    #[serde(rename = "link")]
    pub detail_link: String,

    pub email: String,
}

impl EnrichedRecord {
    /// Format the record for display using a template.
    ///
    /// Supported placeholders:
    /// - `{title}`, `{employer}`, `{location}`, `{postal_code}`
    /// - `{published}`, `{refnr}`, `{link}`, `{email}`
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{title}", &self.title)
            .replace("{employer}", &self.employer)
            .replace("{location}", &self.location)
            .replace("{postal_code}", &self.postal_code)
            .replace("{published}", &self.published)
            .replace("{refnr}", &self.reference_number)
            .replace("{link}", &self.detail_link)
            .replace("{email}", &self.email)
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }
}
