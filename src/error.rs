// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A single failed fetch. Never retried here; the caller decides.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },
    #[error("timed out after {secs}s fetching {url}")]
    Timeout { url: String, secs: u64 },
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },
}

/// An artifact or the last-run marker could not be written or read back.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, #[source] source: io::Error },
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, #[source] source: io::Error },
    #[error("malformed JSON in {}: {source}", path.display())]
    Json { path: PathBuf, #[source] source: serde_json::Error },
}

/// Ingesting an external spreadsheet failed before any mapping happened.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("spreadsheet JSON is not an array of objects: {0}")]
    Shape(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
