// src/lib.rs

//! Job search aggregation library.
//!
//! Pages the Bundesagentur jobsearch API for several keywords, deduplicates
//! the postings, scrapes a contact email from each detail page and hands back
//! flat records for display and CSV export.

pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod source;
pub mod utils;
