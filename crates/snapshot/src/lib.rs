use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
    time::SystemTime,
};

use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use shared::error::LoadError;
use tracing::{debug, warn};

pub type Record = Map<String, Value>;

/// Records decoded from one JSON export. Columns are the union of keys seen,
/// in first-seen order; a record lacking a column reads as null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|column| column == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decodes raw export bytes. Invalid UTF-8 is a parse failure like any other
/// malformed content.
pub fn parse_table(path: &Path, raw: &[u8]) -> Result<Table, LoadError> {
    // Exports saved by Windows tooling often start with a BOM.
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    let records: Vec<Record> = serde_json::from_slice(raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Table::from_records(records))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(metadata: &fs::Metadata) -> Self {
        Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        }
    }
}

#[derive(Debug)]
struct CachedSnapshot {
    fingerprint: Fingerprint,
    table: Arc<Table>,
}

/// Reads JSON exports and memoizes them per path. A cached table is reused
/// only while the file's modification time and length are unchanged.
#[derive(Debug, Default)]
pub struct SnapshotLoader {
    cache: Mutex<HashMap<PathBuf, CachedSnapshot>>,
}

impl SnapshotLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, path: &Path) -> Result<Arc<Table>, LoadError> {
        let metadata = file_metadata(path)?;
        let fingerprint = Fingerprint::of(&metadata);

        if let Some(table) = self.cached(path, fingerprint) {
            debug!(path = %path.display(), "snapshot cache hit");
            return Ok(table);
        }

        let raw = fs::read(path).map_err(|source| read_error(path, source))?;
        let table = Arc::new(parse_table(path, &raw)?);
        debug!(
            path = %path.display(),
            records = table.len(),
            columns = table.columns().len(),
            "snapshot loaded"
        );

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                path.to_path_buf(),
                CachedSnapshot {
                    fingerprint,
                    table: Arc::clone(&table),
                },
            );
        Ok(table)
    }

    /// Same as [`SnapshotLoader::load`], but a failure is logged and turned
    /// into an empty table so callers can stop on emptiness.
    pub fn load_or_empty(&self, path: &Path) -> (Arc<Table>, Option<LoadError>) {
        match self.load(path) {
            Ok(table) => (table, None),
            Err(error) => {
                warn!(path = %path.display(), %error, "snapshot unavailable");
                (Arc::new(Table::empty()), Some(error))
            }
        }
    }

    pub fn invalidate(&self, path: &Path) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some()
    }

    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn cached(&self, path: &Path, fingerprint: Fingerprint) -> Option<Arc<Table>> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        match cache.get(path) {
            Some(entry) if entry.fingerprint == fingerprint => Some(Arc::clone(&entry.table)),
            Some(_) => {
                debug!(path = %path.display(), "snapshot changed on disk; dropping cached table");
                cache.remove(path);
                None
            }
            None => None,
        }
    }
}

/// Modification time of the export, in local time, for the freshness banner.
pub fn last_modified(path: &Path) -> Result<DateTime<Local>, LoadError> {
    let metadata = file_metadata(path)?;
    let modified = metadata
        .modified()
        .map_err(|source| read_error(path, source))?;
    Ok(DateTime::<Local>::from(modified))
}

fn file_metadata(path: &Path) -> Result<fs::Metadata, LoadError> {
    let metadata = fs::metadata(path).map_err(|source| read_error(path, source))?;
    if !metadata.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(metadata)
}

fn read_error(path: &Path, source: io::Error) -> LoadError {
    if source.kind() == io::ErrorKind::NotFound {
        LoadError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
