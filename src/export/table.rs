//! Plain-text table for terminal output.

use crate::models::EnrichedRecord;

const HEADERS: [&str; 7] = ["TITLE", "EMPLOYER", "LOCATION", "PLZ", "PUBLISHED", "E-MAIL", "LINK"];

/// Widest a column gets before its cells are truncated.
const MAX_WIDTH: usize = 40;

fn cells(record: &EnrichedRecord) -> [&str; 7] {
    [
        &record.title,
        &record.employer,
        &record.location,
        &record.postal_code,
        &record.published,
        &record.email,
        &record.detail_link,
    ]
}

fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        format!("{text}{}", " ".repeat(width - len))
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

/// Render records as an aligned table under a count heading.
///
/// The link column is never truncated so it stays clickable.
pub fn render_table(records: &[EnrichedRecord]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for record in records {
        for (width, cell) in widths.iter_mut().zip(cells(record)) {
            *width = (*width).max(cell.chars().count());
        }
    }
    let last = widths.len() - 1;
    for width in &mut widths[..last] {
        *width = (*width).min(MAX_WIDTH);
    }

    let row = |values: [&str; 7]| -> String {
        values
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (value, width))| {
                if i == last {
                    value.to_string()
                } else {
                    fit(value, width)
                }
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = format!("Found jobs: {}\n", records.len());
    if records.is_empty() {
        return out;
    }

    out.push_str(&row(HEADERS));
    out.push('\n');
    let rule_len: usize = widths.iter().sum::<usize>() + 3 * last;
    out.push_str(&"─".repeat(rule_len));
    out.push('\n');
    for record in records {
        out.push_str(&row(cells(record)));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shows_count_only() {
        assert_eq!(render_table(&[]), "Found jobs: 0\n");
    }

    #[test]
    fn aligns_columns() {
        let records = vec![
            EnrichedRecord {
                title: "Koch".to_string(),
                employer: "Gasthaus Zur Linde".to_string(),
                detail_link: "https://example.com/R-1".to_string(),
                ..EnrichedRecord::default()
            },
            EnrichedRecord {
                title: "Schweißer (m/w/d)".to_string(),
                ..EnrichedRecord::default()
            },
        ];

        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "Found jobs: 2");
        assert!(lines[1].starts_with("TITLE             | EMPLOYER          "));
        assert!(lines[3].starts_with("Koch              | Gasthaus Zur Linde"));
        assert!(lines[3].ends_with("https://example.com/R-1"));
        assert!(lines[4].starts_with("Schweißer (m/w/d) | "));
    }

    #[test]
    fn truncates_long_cells() {
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("ab", 4), "ab  ");
    }
}
