use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Flat-directory store for learner program files.
///
/// Files are plain text blobs addressed by name; there is no hierarchy and
/// no concurrent-writer protection, matching the single-learner model.
pub struct FileStore {
    root: PathBuf,
}

/// Metadata for one stored file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a user-supplied name to a path inside the store.
    ///
    /// Names must be a single path component: separators, `..`, and empty
    /// names are rejected so a learner file can never escape the store.
    fn resolve(&self, name: &str) -> Result<PathBuf, StorageError> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// List stored files with their metadata, sorted by name.
    pub async fn list(&self) -> Result<Vec<StoredFile>, StorageError> {
        self.ensure_root().await?;

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => {
                    warn!("Skipping file with non-UTF-8 name in {}", self.root.display());
                    continue;
                }
            };

            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            files.push(StoredFile {
                name,
                size: metadata.len(),
                modified,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Read a stored file's content.
    pub async fn read(&self, name: &str) -> Result<String, StorageError> {
        let path = self.resolve(name)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create or overwrite a stored file.
    pub async fn write(&self, name: &str, content: &str) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        self.ensure_root().await?;
        tokio::fs::write(&path, content).await?;
        info!("Saved file: {}", path.display());
        Ok(())
    }

    /// Delete a stored file.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted file: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
