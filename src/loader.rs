use crate::error::InputError;
use crate::index::IndexRow;
use std::path::Path;
use tracing::{debug, warn};

pub const EXPECTED_HEADER: [&str; 4] = ["TOPIC", "BK#", "PG#", "COMMENTS"];

/// Reads the index file. The first record is always the header and is dropped.
pub fn load_rows(path: &Path) -> Result<Vec<IndexRow>, InputError> {
    let bytes = std::fs::read(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| InputError::NotUtf8 {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })?;
    parse_rows(path, &text)
}

/// `path` only labels errors.
pub fn parse_rows(path: &Path, text: &str) -> Result<Vec<IndexRow>, InputError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(InputError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows: Vec<IndexRow> = Vec::new();
    let mut seen_header = false;
    for record in reader.records() {
        let record = record.map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        // Whitespace-only lines and spreadsheet filler rows like `,,,`.
        if record.iter().all(str::is_empty) {
            debug!(
                "line {}: blank record skipped",
                record.position().map(|p| p.line()).unwrap_or(0)
            );
            continue;
        }

        if !seen_header {
            seen_header = true;
            check_header(&record);
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        if record.len() != 4 {
            return Err(InputError::FieldCount {
                path: path.to_path_buf(),
                line,
                found: record.len(),
            });
        }

        let row = IndexRow::new(&record[0], &record[1], &record[2], &record[3]);
        if row.topic.is_empty() {
            warn!("line {line}: empty topic, filed under #");
        }
        rows.push(row);
    }

    debug!("loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn check_header(record: &csv::StringRecord) {
    let matches = record.len() == EXPECTED_HEADER.len()
        && record
            .iter()
            .zip(EXPECTED_HEADER)
            .all(|(got, want)| got.eq_ignore_ascii_case(want));
    if !matches {
        let got: Vec<&str> = record.iter().collect();
        warn!(
            "header row is {:?}, expected {:?}; treating it as the header anyway",
            got, EXPECTED_HEADER
        );
    }
}
