//! File-backed storage.
//!
//! All slots live in one JSON object. Every mutation rewrites the whole
//! document through a sibling temp file followed by a rename, so a batch
//! of slot writes is either fully on disk or not at all. A document that no
//! longer parses is replaced by the next write.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStorage, StorageError, StorageResult};

type Document = BTreeMap<String, String>;

/// Durable storage persisted as a JSON document.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Creates storage backed by the file at `path`.
    ///
    /// The file and its parent directory are created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StorageResult<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Document::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_document(&self, doc: &Document) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = ?self.path, slots = doc.len(), "Wrote storage document");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut Document)) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut doc = match self.read_document() {
            Ok(doc) => doc,
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(path = ?self.path, error = %e, "Discarding unreadable storage document");
                Document::new()
            }
            Err(e) => return Err(e),
        };
        f(&mut doc);
        self.write_document(&doc)
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update(|doc| {
            doc.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.update(|doc| {
            doc.remove(key);
        })
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        self.update(|doc| {
            for (key, value) in entries {
                doc.insert((*key).to_string(), (*value).to_string());
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        self.update(|doc| {
            for key in keys {
                doc.remove(*key);
            }
        })
    }
}
