// src/services/fields.rs

//! Best-effort field extraction from loosely structured search items.
//!
//! The search service exposes the same meaning under different field names
//! and sometimes flattens nested objects into plain strings. All fallback
//! chains live here so schema drift only touches this module.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::models::RawRecord;

/// Title candidates in priority order.
pub const TITLE_FIELDS: [&str; 3] = ["titel", "stellenbezeichnung", "beruf"];
pub const REFNR_FIELD: &str = "refnr";
pub const EMPLOYER_FIELD: &str = "arbeitgeber";
pub const EMPLOYER_NAME_FIELD: &str = "name";
pub const LOCATION_FIELD: &str = "arbeitsort";
pub const CITY_FIELD: &str = "ort";
pub const POSTAL_CODE_FIELD: &str = "plz";

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("valid date pattern"));

/// Fields resolved from one record; `None` where nothing usable was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFields {
    pub title: Option<String>,
    pub employer: Option<String>,
    pub location: Option<String>,
    pub postal_code: Option<String>,
    pub published: Option<String>,
}

impl ResolvedFields {
    pub fn resolve(record: &RawRecord) -> Self {
        Self {
            title: title(record),
            employer: employer(record),
            location: location(record),
            postal_code: postal_code(record),
            published: published_date(record),
        }
    }
}

/// Render a value if it counts as present.
///
/// Strings must be non-empty after trimming (and come back trimmed). Other
/// values follow truthiness: null, `false`, zero and empty containers are
/// absent.
fn present(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Bool(b) => b.then(|| "true".to_string()),
        Value::Number(n) => (n.as_f64() != Some(0.0)).then(|| n.to_string()),
        Value::Array(items) => (!items.is_empty()).then(|| value.to_string()),
        Value::Object(map) => (!map.is_empty()).then(|| value.to_string()),
    }
}

/// First candidate that is present, in order.
pub fn first_non_empty<'a>(candidates: impl IntoIterator<Item = Option<&'a Value>>) -> Option<String> {
    candidates.into_iter().flatten().find_map(present)
}

/// Resolve `field.sub` when `field` is an object, or `field` itself when it is
/// a scalar.
fn unwrap_nested(record: &RawRecord, field: &str, sub: &str) -> Option<String> {
    match record.get(field)? {
        Value::Object(map) => first_non_empty([map.get(sub)]),
        scalar => first_non_empty([Some(scalar)]),
    }
}

pub fn reference_number(record: &RawRecord) -> Option<String> {
    first_non_empty([record.get(REFNR_FIELD)])
}

pub fn title(record: &RawRecord) -> Option<String> {
    first_non_empty(TITLE_FIELDS.iter().map(|f| record.get(f)))
}

pub fn employer(record: &RawRecord) -> Option<String> {
    unwrap_nested(record, EMPLOYER_FIELD, EMPLOYER_NAME_FIELD)
}

pub fn location(record: &RawRecord) -> Option<String> {
    unwrap_nested(record, LOCATION_FIELD, CITY_FIELD)
}

/// Postal code only exists inside a structured work location.
pub fn postal_code(record: &RawRecord) -> Option<String> {
    match record.get(LOCATION_FIELD)? {
        Value::Object(map) => first_non_empty([map.get(POSTAL_CODE_FIELD)]),
        _ => None,
    }
}

/// First `YYYY-MM-DD` substring of any top-level string field.
///
/// Fields are scanned in the record's key order, so which date wins (e.g.
/// publication vs. modification date) depends on field names rather than
/// meaning.
pub fn published_date(record: &RawRecord) -> Option<String> {
    record.fields().find_map(|(_, value)| match value {
        Value::String(s) => DATE_RE.find(s).map(|m| m.as_str().to_string()),
        _ => None,
    })
}
