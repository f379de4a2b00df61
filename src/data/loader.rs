use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Terminator};

use super::device;
use super::model::Dataset;
use crate::error::LabError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// A parsed dataset together with how many rows were dropped for having the
/// wrong number of fields.
#[derive(Debug)]
pub struct Parsed {
    pub dataset: Dataset,
    pub dropped_rows: usize,
}

/// Read an instrument export from disk. The dataset label is derived from the
/// file name, see [`label_from_path`].
pub fn load_file(path: &Path) -> Result<Parsed> {
    let label = label_from_path(path);
    let content = std::fs::read_to_string(path)
        .map_err(|source| LabError::Io {
            path: path.to_path_buf(),
            source,
        })
        .with_context(|| format!("reading {}", path.display()))?;
    let parsed = parse(&content, &label)?;
    log::info!(
        "Loaded '{}' as {} ({} rows, {} dropped)",
        label,
        parsed.dataset.device,
        parsed.dataset.len(),
        parsed.dropped_rows
    );
    Ok(parsed)
}

/// Parse a tab-delimited export.
///
/// Layout: the first line is the header row; every following line is a row.
/// Rows whose field count differs from the header's are skipped. The header
/// must match a registered instrument exactly, otherwise the whole file is
/// rejected with [`LabError::SchemaMismatch`].
pub fn parse(content: &str, label: &str) -> Result<Parsed, LabError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    // Cells are taken verbatim: no quoting, no trimming, ragged rows allowed.
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::CRLF)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record_to_vec(&record.map_err(|e| csv_error(label, e))?),
        None => {
            return Err(LabError::EmptyFile {
                label: label.to_string(),
            })
        }
    };

    let device = device::detect(&headers).ok_or_else(|| LabError::SchemaMismatch {
        label: label.to_string(),
    })?;

    let mut rows = Vec::new();
    let mut dropped_rows = 0;
    for record in records {
        let record = record.map_err(|e| csv_error(label, e))?;
        if record.len() == headers.len() {
            rows.push(record_to_vec(&record));
        } else {
            log::debug!(
                "'{label}': dropping row with {} fields (expected {})",
                record.len(),
                headers.len()
            );
            dropped_rows += 1;
        }
    }

    Ok(Parsed {
        dataset: Dataset::new(label, headers, rows, device),
        dropped_rows,
    })
}

/// Derive a dataset label from a file name.
///
/// Instrument software names files `prefix___LABEL___suffix`; in that case the
/// middle segment is the label. Otherwise the whole file stem is used.
pub fn label_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parts: Vec<&str> = stem.split("___").collect();
    if parts.len() >= 3 {
        parts[1].to_string()
    } else {
        stem
    }
}

// -- helpers --

fn record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(|f| f.to_string()).collect()
}

fn csv_error(label: &str, err: csv::Error) -> LabError {
    LabError::Io {
        path: label.into(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::device::{E7_30, VECTOR};
    use crate::data::model::Tabular;

    fn e7_header() -> String {
        E7_30.column_headers.join("\t")
    }

    fn e7_row(freq: &str, cap: &str, d: &str) -> String {
        let mut cells = vec!["0"; 12];
        cells[0] = freq;
        cells[1] = cap;
        cells[8] = d;
        cells.join("\t")
    }

    #[test]
    fn parses_e7_30_export() {
        let content = format!(
            "{}\n{}\n{}\n",
            e7_header(),
            e7_row("1000", "1E-10", "0,02"),
            e7_row("2000", "1.1E-10", "0.03"),
        );
        let parsed = parse(&content, "20").unwrap();
        let ds = parsed.dataset;
        assert_eq!(ds.device, &E7_30);
        assert_eq!(ds.label(), "20");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0][8], "0,02");
        assert_eq!(parsed.dropped_rows, 0);
    }

    #[test]
    fn parses_vector_export_with_crlf() {
        let content = format!(
            "{}\r\n{}\r\n",
            VECTOR.column_headers.join("\t"),
            ["100", "1", "0.01", "5", "-89", "0", "1e-10", "7"].join("\t")
        );
        let ds = parse(&content, "40").unwrap().dataset;
        assert_eq!(ds.device, &VECTOR);
        assert_eq!(ds.rows[0][7], "7");
    }

    #[test]
    fn rows_with_wrong_field_count_are_dropped() {
        let content = format!(
            "{}\n{}\n1000\t1E-10\n{}\tEXTRA\n",
            e7_header(),
            e7_row("1000", "1E-10", "0.02"),
            e7_row("3000", "1E-10", "0.02"),
        );
        let parsed = parse(&content, "20").unwrap();
        assert_eq!(parsed.dataset.len(), 1);
        assert_eq!(parsed.dropped_rows, 2);
        assert!(parsed
            .dataset
            .rows
            .iter()
            .all(|r| r.len() == parsed.dataset.headers.len()));
    }

    #[test]
    fn unknown_header_rejects_the_file() {
        let content = "Freq\tCap\n1\t2\n";
        match parse(content, "x") {
            Err(LabError::SchemaMismatch { label }) => assert_eq!(label, "x"),
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_rejected() {
        assert!(matches!(
            parse("", "x"),
            Err(LabError::EmptyFile { .. })
        ));
    }

    #[test]
    fn quotes_and_spaces_are_kept_verbatim() {
        let content = format!("{}\n{}\n", e7_header(), e7_row("\"1000\"", " 1E-10", "0.02"));
        let ds = parse(&content, "20").unwrap().dataset;
        assert_eq!(ds.cell(0, 0).as_deref(), Some("\"1000\""));
        assert_eq!(ds.cell(0, 1).as_deref(), Some(" 1E-10"));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let content = format!("\u{feff}{}\n{}\n", e7_header(), e7_row("1", "1", "1"));
        assert_eq!(parse(&content, "20").unwrap().dataset.device, &E7_30);
    }

    #[test]
    fn label_from_instrument_file_name() {
        assert_eq!(label_from_path(Path::new("/tmp/run___25___E7.txt")), "25");
        assert_eq!(label_from_path(Path::new("/tmp/a___b___c___d.txt")), "b");
        assert_eq!(label_from_path(Path::new("sample 40.txt")), "sample 40");
        assert_eq!(label_from_path(Path::new("x___40.txt")), "x___40");
    }

    #[test]
    fn load_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m___60___e7.txt");
        std::fs::write(&path, format!("{}\n{}\n", e7_header(), e7_row("1", "1", "1"))).unwrap();
        let parsed = load_file(&path).unwrap();
        assert_eq!(parsed.dataset.label(), "60");
    }

    #[test]
    fn load_file_reports_missing_file() {
        let err = load_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.downcast_ref::<LabError>().is_some());
    }
}
