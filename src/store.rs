// src/store.rs
//
// Artifact persistence. One file per record kind under the data dir, each
// rewritten wholesale per run. The three files are written independently, so
// a failure partway through leaves a mixed-age set on disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::StoreOptions;
use crate::csv;
use crate::error::PersistenceError;
use crate::model::{Announcement, Assignment, CanonicalRecord, PublicAnnouncement, RawRow, Record, RecordKind};
use crate::schema::SchemaMapper;

/// Header row plus data rows, the unit the codec reads and writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn from_records<R: Record>(records: &[R]) -> Self {
        Self {
            headers: R::KIND.header_row(),
            rows: records.iter().map(Record::to_row).collect(),
        }
    }

    /// Rows as positional raw rows, for the schema mapper.
    pub fn raw_rows(&self) -> Vec<RawRow> {
        self.rows.iter().cloned().map(RawRow::Positional).collect()
    }
}

pub fn artifact_path(store: &StoreOptions, kind: RecordKind) -> PathBuf {
    store.data_dir.join(kind.file_name())
}

pub fn ensure_directory(dir: &Path) -> Result<(), PersistenceError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PersistenceError::Write {
            path: dir.to_path_buf(),
            source: std::io::Error::new(ErrorKind::AlreadyExists, "path exists but is not a directory"),
        });
    }
    fs::create_dir_all(dir).map_err(|source| PersistenceError::Write { path: dir.to_path_buf(), source })
}

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(path, contents).map_err(|source| PersistenceError::Write { path: path.to_path_buf(), source })
}

/// `Ok(None)` when the file does not exist.
pub(crate) fn read_file(path: &Path) -> Result<Option<String>, PersistenceError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::Read { path: path.to_path_buf(), source }),
    }
}

/// Replace the artifact for `R::KIND` with `records`.
pub fn save<R: Record>(store: &StoreOptions, records: &[R]) -> Result<PathBuf, PersistenceError> {
    let path = artifact_path(store, R::KIND);
    write_file(&path, &csv::encode_records(records))?;
    logd!("Wrote {} {} to {}", records.len(), R::KIND, path.display());
    Ok(path)
}

/// Create the data dir and a header-only artifact for every kind that has none.
/// Existing artifacts are left alone. Returns the files created.
pub fn init(store: &StoreOptions) -> Result<Vec<PathBuf>, PersistenceError> {
    ensure_directory(&store.data_dir)?;
    let mut created = Vec::new();
    for kind in RecordKind::ALL {
        let path = artifact_path(store, kind);
        if path.exists() {
            continue;
        }
        let empty = DataSet { headers: kind.header_row(), rows: Vec::new() };
        write_file(&path, &csv::encode(&empty))?;
        created.push(path);
    }
    Ok(created)
}

/// Decoded artifact, or `None` when it has never been written.
pub fn load_table(store: &StoreOptions, kind: RecordKind) -> Result<Option<DataSet>, PersistenceError> {
    let path = artifact_path(store, kind);
    Ok(read_file(&path)?.map(|text| csv::decode(&text)))
}

/// Canonical records of one kind, read back through header resolution so a
/// hand-edited artifact still loads. A missing artifact is an empty batch.
pub fn load(
    store: &StoreOptions,
    mapper: &SchemaMapper,
    kind: RecordKind,
) -> Result<Vec<CanonicalRecord>, PersistenceError> {
    let Some(ds) = load_table(store, kind)? else {
        return Ok(Vec::new());
    };
    Ok(mapper.map(kind, &ds.headers, &ds.raw_rows()))
}

pub fn load_assignments(store: &StoreOptions, mapper: &SchemaMapper) -> Result<Vec<Assignment>, PersistenceError> {
    Ok(load_table(store, RecordKind::Assignments)?
        .map(|ds| mapper.assignments(&ds.headers, &ds.raw_rows()))
        .unwrap_or_default())
}

pub fn load_announcements(store: &StoreOptions, mapper: &SchemaMapper) -> Result<Vec<Announcement>, PersistenceError> {
    Ok(load_table(store, RecordKind::Announcements)?
        .map(|ds| mapper.announcements(&ds.headers, &ds.raw_rows()))
        .unwrap_or_default())
}

pub fn load_public_announcements(
    store: &StoreOptions,
    mapper: &SchemaMapper,
) -> Result<Vec<PublicAnnouncement>, PersistenceError> {
    Ok(load_table(store, RecordKind::PublicAnnouncements)?
        .map(|ds| mapper.public_announcements(&ds.headers, &ds.raw_rows()))
        .unwrap_or_default())
}

/// Data rows in an artifact (header excluded); 0 when missing.
pub fn count_rows(store: &StoreOptions, kind: RecordKind) -> Result<usize, PersistenceError> {
    Ok(load_table(store, kind)?.map(|ds| ds.rows.len()).unwrap_or(0))
}
