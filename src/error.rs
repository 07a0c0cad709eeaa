use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

/// Every way a pipeline stage can fail.
///
/// Stages fail fast and publish nothing on error, so a caller can keep
/// using whatever it already had (e.g. a cleaned table survives a failed
/// filter).
#[derive(Error, Debug)]
pub enum CurateError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unknown format: columns [{}] do not match a known data type", .columns.join(", "))]
    UnknownFormat { columns: Vec<String> },

    #[error("Missing columns: {}", join_names(.missing))]
    MissingColumns { missing: BTreeSet<String> },

    #[error("No input tables to merge")]
    NoInput,

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{count} record(s) still lack a classification")]
    UnlabeledRecords { count: usize },
}

fn join_names(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, CurateError>;
