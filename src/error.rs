use std::path::PathBuf;

use thiserror::Error;

/// Everything the core can report back to the shell.
///
/// Only `SchemaMismatch`, `RenameConflict`, `InvalidLabel` and
/// `InvalidGeometry` fail a whole user action; the rest are recovered
/// per table or per row and surface as warnings in a report.
#[derive(Debug, Error)]
pub enum LabError {
    #[error("file '{label}' does not match any supported instrument")]
    SchemaMismatch { label: String },

    #[error("file '{label}' is empty")]
    EmptyFile { label: String },

    #[error("table '{label}' has no {quantity} column")]
    MissingColumn { label: String, quantity: &'static str },

    #[error("row {row}: cannot read '{value}' in column '{column}' as a number")]
    CellParse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("cannot rename '{from}' to '{to}': the name is already in use")]
    RenameConflict { from: String, to: String },

    #[error("no table named '{0}'")]
    UnknownLabel(String),

    #[error("'{0}' is not a valid table name")]
    InvalidLabel(String),

    #[error("invalid sample geometry: {0}")]
    InvalidGeometry(String),

    #[error("i/o failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
