//! CSV export and terminal display of search results.

mod table;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{AppError, Result};
use crate::models::EnrichedRecord;

pub use table::render_table;

/// Column order of the export file.
pub const CSV_COLUMNS: [&str; 8] = [
    "titel",
    "arbeitgeber",
    "arbeitsort",
    "plz",
    "published",
    "refnr",
    "link",
    "email",
];

/// Normalize a requested export name, appending `.csv` when it has no extension.
pub fn export_file_name(requested: &str, fallback: &str) -> String {
    let name = match requested.trim() {
        "" => fallback.trim(),
        name => name,
    };
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.csv")
    }
}

/// Write records as CSV with a header row.
pub fn write_csv<W: Write>(records: &[EnrichedRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv_writer.write_record(CSV_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to `dir/name` and return the path written.
///
/// The file is written to a temporary file in `dir` and renamed into place,
/// so an existing export is never left half-overwritten. The temporary file
/// is removed when writing fails.
pub fn write_csv_file(records: &[EnrichedRecord], dir: &Path, name: &str) -> Result<PathBuf> {
    if records.is_empty() {
        return Err(AppError::validation("no data to export"));
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(name);

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_csv(records, tmp.as_file_mut())?;
    tmp.persist(&path).map_err(|e| e.error)?;

    log::info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<EnrichedRecord> {
        vec![
            EnrichedRecord {
                title: "Schweißer (m/w/d)".to_string(),
                employer: "Metallbau GmbH, Werk \"Süd\"".to_string(),
                location: "Bielefeld".to_string(),
                postal_code: "33689".to_string(),
                published: "2024-05-17".to_string(),
                reference_number: "R-1".to_string(),
                detail_link: "https://www.arbeitsagentur.de/jobsuche/jobdetail/R-1".to_string(),
                email: "abc@metallbau.de".to_string(),
            },
            EnrichedRecord {
                title: "Koch".to_string(),
                ..EnrichedRecord::default()
            },
        ]
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn file_name_gets_extension() {
        assert_eq!(export_file_name("jobs", "jobs_ba.csv"), "jobs.csv");
        assert_eq!(export_file_name("jobs.csv", "jobs_ba.csv"), "jobs.csv");
        assert_eq!(export_file_name("jobs.txt", "jobs_ba.csv"), "jobs.txt");
        assert_eq!(export_file_name("  ", "jobs_ba.csv"), "jobs_ba.csv");
        assert_eq!(export_file_name("", "jobs_ba"), "jobs_ba.csv");
    }

    #[test]
    fn header_and_column_order() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.split("\r\n");
        assert_eq!(
            lines.next(),
            Some("titel,arbeitgeber,arbeitsort,plz,published,refnr,link,email")
        );
        assert_eq!(lines.nth(1), Some("Koch,,,,,,,"));
    }

    #[test]
    fn export_round_trip() {
        let records = sample();
        let mut out = Vec::new();
        write_csv(&records, &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_COLUMNS);

        let parsed: Vec<EnrichedRecord> = reader.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn empty_header_only_stream() {
        let mut out = Vec::new();
        write_csv(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "titel,arbeitgeber,arbeitsort,plz,published,refnr,link,email\r\n"
        );
    }

    #[test]
    fn writes_file_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv_file(&sample(), dir.path(), "jobs.csv").unwrap();

        assert_eq!(path, dir.path().join("jobs.csv"));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("titel,"));
        assert!(content.contains("abc@metallbau.de"));
        assert_eq!(entries(dir.path()), vec!["jobs.csv"]);
    }

    #[test]
    fn same_stem_exports_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        write_csv_file(&sample(), dir.path(), "a.csv").unwrap();
        write_csv_file(&sample()[1..], dir.path(), "a.txt").unwrap();

        assert_eq!(entries(dir.path()), vec!["a.csv", "a.txt"]);
        assert!(std::fs::read_to_string(dir.path().join("a.csv")).unwrap().contains("R-1"));
        assert!(!std::fs::read_to_string(dir.path().join("a.txt")).unwrap().contains("R-1"));
    }

    #[test]
    fn failed_export_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("jobs.csv")).unwrap();

        let err = write_csv_file(&sample(), dir.path(), "jobs.csv").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(entries(dir.path()), vec!["jobs.csv"]);
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports/2024");
        let path = write_csv_file(&sample(), &nested, "jobs.csv").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn refuses_empty_export() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_csv_file(&[], dir.path(), "jobs.csv").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!dir.path().join("jobs.csv").exists());
    }
}
