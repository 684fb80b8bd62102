// src/pipeline/assemble.rs

//! Merge resolved fields and detail emails into flat records.

use crate::models::{ApiConfig, DedupMap, EnrichedRecord, RawRecord};
use crate::services::{DetailOutcome, ResolvedFields, fields};

/// Build one output record.
pub fn assemble_record(record: &RawRecord, email: &str, api: &ApiConfig) -> EnrichedRecord {
    let resolved = ResolvedFields::resolve(record);
    let reference_number = fields::reference_number(record).unwrap_or_default();
    let detail_link = if reference_number.is_empty() {
        String::new()
    } else {
        api.detail_url(&reference_number)
    };

    EnrichedRecord {
        title: resolved.title.unwrap_or_default(),
        employer: resolved.employer.unwrap_or_default(),
        location: resolved.location.unwrap_or_default(),
        postal_code: resolved.postal_code.unwrap_or_default(),
        published: resolved.published.unwrap_or_default(),
        reference_number,
        detail_link,
        email: email.to_string(),
    }
}

/// Build output records in first-seen order.
///
/// With `email_only`, records without an email are dropped afterwards.
pub fn assemble(
    jobs: &DedupMap,
    details: &DetailOutcome,
    api: &ApiConfig,
    email_only: bool,
) -> Vec<EnrichedRecord> {
    jobs.iter()
        .map(|(key, record)| assemble_record(record, details.email_for(key), api))
        .filter(|record| !email_only || record.has_email())
        .collect()
}
