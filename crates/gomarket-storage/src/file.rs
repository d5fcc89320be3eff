//! JSON file key-value engine.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::{KeyValueStore, StoreError};

type Document = BTreeMap<String, String>;

/// Key-value store persisted as one JSON object on disk.
///
/// Every operation re-reads the document, so a write made by another process
/// is seen by the next operation. Read-modify-write cycles are serialized
/// within one `FileStore` only; two processes writing at the same time can
/// lose one of the updates. Writes go to a uniquely named sibling temp file
/// that is renamed over the document, so readers never see a partial file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a store backed by the document at `path`.
    ///
    /// The file and its parent directories are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Document::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    async fn write_document(&self, document: &Document) -> Result<(), StoreError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;

        let content = serde_json::to_string_pretty(document)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&dir, &path, content.as_bytes()))
            .await
            .map_err(|e| StoreError::Backend(format!("write task failed: {e}")))??;

        debug!(path = %self.path.display(), keys = document.len(), "Wrote storage document");
        Ok(())
    }
}

/// Write `content` to a fresh temp file in `dir` and rename it over `path`.
fn replace_file(dir: &Path, path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(content)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        trace!(key, path = %self.path.display(), "file get");
        let mut document = self.read_document().await?;
        Ok(document.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        trace!(key, path = %self.path.display(), "file set");
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        trace!(key, path = %self.path.display(), "file remove");
        let mut document = self.read_document().await?;
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(&document).await
    }
}
