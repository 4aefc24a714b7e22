//! Directory-backed document storage
//!
//! Layout inside the configured directory:
//!
//! - `contacts.jsonl`: one JSON contact record per line, appended on insert
//! - `projects.json`: JSON array of projects, maintained by hand; when absent
//!   the default project list is served

use super::{ContactRecord, Project, Storage, StorageError, seed_projects};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const CONTACTS_FILE: &str = "contacts.jsonl";
const PROJECTS_FILE: &str = "projects.json";

/// Storage rooted at a local directory
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    // Serialises appends so concurrent lines never interleave
    append_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            append_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if it does not exist yet
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| io_error(&self.dir, source))
    }

    fn contacts_path(&self) -> PathBuf {
        self.dir.join(CONTACTS_FILE)
    }

    fn projects_path(&self) -> PathBuf {
        self.dir.join(PROJECTS_FILE)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Read a file, mapping "not found" to `None`
async fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

#[async_trait]
impl Storage for FileStore {
    async fn save_contact(&self, record: ContactRecord) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(&record).map_err(StorageError::Encode)?;
        line.push('\n');

        let path = self.contacts_path();
        let _guard = self.append_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| io_error(&path, e))?;
        let previous_len = file
            .metadata()
            .await
            .map_err(|e| io_error(&path, e))?
            .len();

        let written = match file.write_all(line.as_bytes()).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // Drop any partial line so later appends start on a clean boundary
            if let Err(truncate_err) = file.set_len(previous_len).await {
                tracing::warn!(
                    path = %path.display(),
                    error = %truncate_err,
                    "Failed to roll back partial contact write"
                );
            }
            return Err(io_error(&path, e));
        }

        tracing::debug!(id = %record.id, path = %path.display(), "Contact record appended");
        Ok(())
    }

    async fn contacts(&self) -> Result<Vec<ContactRecord>, StorageError> {
        let path = self.contacts_path();
        let Some(content) = read_optional(&path).await? else {
            return Ok(Vec::new());
        };

        // Only newline-terminated lines are complete writes
        let (complete, tail) = match content.rfind('\n') {
            Some(end) => content.split_at(end + 1),
            None => ("", content.as_str()),
        };

        let mut records = complete
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|source| StorageError::Decode {
                    path: path.display().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<ContactRecord>, _>>()?;

        let tail = tail.trim();
        if !tail.is_empty() {
            match serde_json::from_str(tail) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Skipping unterminated trailing contact line"
                ),
            }
        }

        Ok(records)
    }

    async fn projects(&self) -> Result<Vec<Project>, StorageError> {
        let path = self.projects_path();
        match read_optional(&path).await? {
            Some(content) => {
                serde_json::from_str(&content).map_err(|source| StorageError::Decode {
                    path: path.display().to_string(),
                    source,
                })
            }
            None => Ok(seed_projects()),
        }
    }

    async fn is_connected(&self) -> bool {
        tokio::fs::metadata(&self.dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }
}
