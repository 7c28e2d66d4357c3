use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse csv {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("parse step configuration {path}: {source}")]
    StepConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{path}: expected {expected} header rows, found {found}")]
    MissingHeaderRows {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("polars: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
