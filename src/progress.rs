// src/progress.rs
use std::path::Path;

use crate::model::RecordKind;

/// Lightweight progress reporting for a full run (scrape + persist).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of artifacts to be written.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one artifact has been written.
    fn item_done(&mut self, _kind: RecordKind, _records: usize, _path: &Path) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
