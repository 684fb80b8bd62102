// src/services/keys.rs

//! Deduplication keys for search items.

use crate::models::{JobKey, RawRecord};
use crate::services::fields;

/// Stands in for a component that could not be resolved, so two records
/// missing different fields do not collapse onto the same key.
pub const NULL_MARKER: &str = "<null>";

/// Derive the identity of a record.
///
/// The reference number wins when present; otherwise `title|employer|location`
/// from the resolved fields.
pub fn derive_key(record: &RawRecord) -> JobKey {
    if let Some(refnr) = fields::reference_number(record) {
        return JobKey::new(refnr);
    }

    let part = |value: Option<String>| value.unwrap_or_else(|| NULL_MARKER.to_string());
    JobKey::new(format!(
        "{}|{}|{}",
        part(fields::title(record)),
        part(fields::employer(record)),
        part(fields::location(record)),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn record(v: Value) -> RawRecord {
        RawRecord::from_value(v).unwrap()
    }

    #[test]
    fn prefers_reference_number() {
        let rec = record(json!({"refnr": " 10000-1198771380-S ", "titel": "Koch"}));
        assert_eq!(derive_key(&rec).as_str(), "10000-1198771380-S");
    }

    #[test]
    fn composes_fields_without_reference_number() {
        let rec = record(json!({
            "refnr": "  ",
            "titel": "Koch",
            "arbeitgeber": {"name": "Gasthaus"},
            "arbeitsort": {"ort": "Bielefeld"}
        }));
        assert_eq!(derive_key(&rec).as_str(), "Koch|Gasthaus|Bielefeld");
    }

    #[test]
    fn missing_components_use_null_marker() {
        let rec = record(json!({"titel": "Koch"}));
        assert_eq!(derive_key(&rec).as_str(), "Koch|<null>|<null>");

        let no_employer = record(json!({"titel": "Koch", "arbeitsort": "Bielefeld"}));
        let no_location = record(json!({"titel": "Koch", "arbeitgeber": "Bielefeld"}));
        assert_ne!(derive_key(&no_employer), derive_key(&no_location));
    }

    #[test]
    fn same_content_same_key() {
        let a = record(json!({"titel": "Koch", "arbeitgeber": "Gasthaus", "x": 1}));
        let b = record(json!({"x": 1, "arbeitgeber": "Gasthaus", "titel": "Koch"}));
        assert_eq!(derive_key(&a), derive_key(&b));
    }
}
