//! Persistence for contact submissions and the projects listing
//!
//! The rest of the service only sees the [`Storage`] trait. Two backends are
//! available, selected by the configured storage URI:
//!
//! - `memory://` keeps everything in process (tests, throwaway deployments)
//! - `file://<dir>` keeps documents in a local directory
//!
//! Contact writes are append-only inserts; nothing is read-modify-written, so
//! each backend only needs to serialise its own appends.

use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Corrupt document in {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A stored contact-form submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ContactRecord {
    /// Build a new record stamped with a fresh id and the current time
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// A portfolio project shown by `GET /api/projects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Persistence collaborator consumed by the contact, projects, health and
/// diagnostics handlers
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a contact submission
    async fn save_contact(&self, record: ContactRecord) -> Result<(), StorageError>;

    /// All stored contact submissions, oldest first
    async fn contacts(&self) -> Result<Vec<ContactRecord>, StorageError>;

    /// Projects to list on the site
    async fn projects(&self) -> Result<Vec<Project>, StorageError>;

    /// Connectivity check used by health and diagnostics
    async fn is_connected(&self) -> bool;
}

/// Parsed storage URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Memory,
    File(PathBuf),
}

impl StorageLocation {
    /// Parse a `memory://` or `file://<dir>` URI
    pub fn parse(uri: &str) -> AppResult<Self> {
        let uri = uri.trim();
        if uri == "memory://" || uri == "memory" {
            return Ok(StorageLocation::Memory);
        }
        if let Some(path) = uri.strip_prefix("file://") {
            if path.is_empty() {
                return Err(AppError::Config(
                    "storage.uri 'file://' needs a directory, e.g. 'file://data'".to_string(),
                ));
            }
            return Ok(StorageLocation::File(PathBuf::from(path)));
        }
        Err(AppError::Config(format!(
            "unsupported storage.uri '{}', expected 'memory://' or 'file://<directory>'",
            uri
        )))
    }
}

/// Open the backend for `location`
///
/// Connection failures are logged and leave the store disconnected rather than
/// aborting startup; endpoints that need storage answer 503 until it recovers.
pub async fn connect(location: &StorageLocation) -> Arc<dyn Storage> {
    match location {
        StorageLocation::Memory => {
            tracing::info!("Using in-memory storage");
            Arc::new(MemoryStore::seeded())
        }
        StorageLocation::File(dir) => {
            let store = FileStore::new(dir.clone());
            match store.ensure_dir().await {
                Ok(()) => tracing::info!(dir = %dir.display(), "Connected to file storage"),
                Err(e) => tracing::error!(
                    dir = %dir.display(),
                    error = %e,
                    "Storage connection error, contact and projects endpoints will be unavailable"
                ),
            }
            Arc::new(store)
        }
    }
}

/// Projects listed when no project documents have been stored
pub fn seed_projects() -> Vec<Project> {
    fn project(title: &str, description: &str, technologies: &[&str]) -> Project {
        Project {
            title: title.to_string(),
            description: description.to_string(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            link: None,
        }
    }

    vec![
        project(
            "Quiz Application",
            "AI-driven quiz management system with adaptive learning algorithms",
            &[],
        ),
        project(
            "Collaboradoc",
            "Real-time collaboration platform with document management and versioning",
            &[],
        ),
        project(
            "DevOps Pipeline",
            "Application lifecycle automation with Jenkins, Maven, and Docker",
            &["Jenkins", "Maven", "Docker"],
        ),
        project(
            "Microservices Architecture",
            "Designed and deployed with Spring Boot, Docker, and Kubernetes",
            &["Spring Boot", "Docker", "Kubernetes"],
        ),
        project(
            "University Dormitory Management System",
            "Web application for dormitory and event management",
            &[],
        ),
    ]
}
