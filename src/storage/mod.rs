mod registry;

pub use registry::Registry;

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{Record, RecordError};

/// Default backing file, relative to the working directory.
pub const DEFAULT_FILE: &str = "file.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode records: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{path} is not a valid record file: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("cannot store {key}: {source}")]
    Record {
        key: String,
        #[source]
        source: RecordError,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored entry that could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub key: String,
    pub reason: String,
}

/// Outcome of [`FileStorage::reload`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReloadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Persists a [`Registry`] as a single JSON object keyed by `<Class>.<id>`.
///
/// Saving overwrites the file in place. Reloading a missing file is a no-op.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write every record in the registry, in registry order.
    pub fn save(&self, registry: &Registry) -> Result<()> {
        let mut document = Map::new();
        for (key, record) in registry.all() {
            let obj = record.to_json().map_err(|source| StorageError::Record {
                key: key.to_string(),
                source,
            })?;
            document.insert(key.to_string(), Value::Object(obj));
        }

        let content = serde_json::to_string(&document)?;
        fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), records = registry.len(), "saved registry");
        Ok(())
    }

    /// Load every stored record into `registry`.
    ///
    /// A file that is not a JSON object fails the whole reload and leaves the
    /// registry untouched. Individual entries that cannot be rebuilt are
    /// skipped, logged and listed in the report. So is an entry whose key is
    /// not `<__class__>.<id>`, which would otherwise overwrite another record.
    pub fn reload(&self, registry: &mut Registry) -> Result<ReloadReport> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no record file yet");
                return Ok(ReloadReport::default());
            }
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: Value =
            serde_json::from_str(&content).map_err(|e| self.malformed(e.to_string()))?;
        let Value::Object(entries) = document else {
            return Err(self.malformed("top-level value is not an object".to_string()));
        };

        let mut report = ReloadReport::default();
        for (key, entry) in entries {
            match rebuild(&key, &entry) {
                Ok(record) => {
                    registry.register(record);
                    report.loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "skipping stored record");
                    report.skipped.push(SkippedRecord {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped.len(),
            "reloaded records"
        );
        Ok(report)
    }

    fn malformed(&self, reason: String) -> StorageError {
        StorageError::Malformed {
            path: self.path.clone(),
            reason,
        }
    }
}

fn rebuild(key: &str, entry: &Value) -> std::result::Result<Record, RecordError> {
    let Value::Object(obj) = entry else {
        return Err(RecordError::NotAnObject);
    };
    let record = Record::from_json(obj)?;
    let actual = record.key();
    if actual != key {
        return Err(RecordError::KeyMismatch {
            stored: key.to_string(),
            actual,
        });
    }
    Ok(record)
}
