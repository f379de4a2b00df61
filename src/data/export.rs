use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::{Dataset, FrequencySeries, Tabular};
use crate::error::LabError;

// ---------------------------------------------------------------------------
// Single table
// ---------------------------------------------------------------------------

/// Write `table` as UTF-8 tab-delimited text: a header line, then one line per
/// row. Absent cells are written empty.
pub fn write_table<T: Tabular + ?Sized>(table: &T, path: &Path) -> Result<(), LabError> {
    let io_err = |source| LabError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{}", table.column_titles().join("\t")).map_err(io_err)?;
    let columns = table.column_titles().len();
    for row in 0..table.row_count() {
        let cells: Vec<String> = (0..columns)
            .map(|c| table.cell(row, c).unwrap_or_default())
            .collect();
        writeln!(out, "{}", cells.join("\t")).map_err(io_err)?;
    }
    out.flush().map_err(io_err)
}

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

/// Human-readable frequency with a magnitude-scaled unit:
/// whole Hz below 10 kHz, kHz below 1 MHz, MHz above, at most one decimal.
pub fn format_frequency(hz: f64) -> String {
    if hz < 10_000.0 {
        format!("{} Hz", round_to(hz, 0))
    } else if hz < 1_000_000.0 {
        format!("{} kHz", round_to(hz / 1_000.0, 1))
    } else {
        format!("{} MHz", round_to(hz / 1_000_000.0, 1))
    }
}

/// Half-away-from-zero rounding; `Display` then drops a trailing `.0`.
fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    // Avoid printing "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Replace every character that is not allowed in a file name with `_`.
///
/// The set is the union of what Windows and Unix reject, so exported folders
/// can be moved between systems.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Whole project
// ---------------------------------------------------------------------------

/// Subfolder names inside an export root.
#[derive(Debug, Clone)]
pub struct ExportLayout {
    pub temperature_dir: String,
    pub frequency_dir: String,
}

#[derive(Debug, Default)]
pub struct ExportReport {
    pub root: PathBuf,
    pub written: Vec<PathBuf>,
}

/// Write every temperature table and every frequency series under `root`.
///
/// Temperature tables are named after their label, frequency tables after
/// [`format_frequency`]; series are written in ascending frequency order, so
/// when two frequencies share a file name the higher one is kept.
pub fn export_all<'a>(
    root: &Path,
    layout: &ExportLayout,
    datasets: impl IntoIterator<Item = &'a Dataset>,
    series: &[FrequencySeries],
) -> Result<ExportReport> {
    let temp_dir = root.join(&layout.temperature_dir);
    let freq_dir = root.join(&layout.frequency_dir);
    for dir in [&temp_dir, &freq_dir] {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut report = ExportReport {
        root: root.to_path_buf(),
        written: Vec::new(),
    };

    for dataset in datasets {
        let path = temp_dir.join(sanitize_file_name(dataset.label()) + ".txt");
        write_table(dataset, &path)
            .with_context(|| format!("exporting table '{}'", dataset.label()))?;
        report.written.push(path);
    }

    let mut ordered: Vec<&FrequencySeries> = series.iter().collect();
    ordered.sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));
    for s in ordered {
        let name = sanitize_file_name(&(format_frequency(s.frequency_hz) + ".txt"));
        let path = freq_dir.join(name);
        write_table(s, &path).with_context(|| format!("exporting series {}", s.title()))?;
        report.written.push(path);
    }

    log::info!(
        "Exported {} tables to {}",
        report.written.len(),
        root.display()
    );
    Ok(report)
}
