//! In-process storage backend

use super::{ContactRecord, Project, Storage, StorageError, seed_projects};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Storage that lives for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    contacts: RwLock<Vec<ContactRecord>>,
    projects: Vec<Project>,
}

impl MemoryStore {
    /// Empty store with no projects
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the default project list
    pub fn seeded() -> Self {
        Self::with_projects(seed_projects())
    }

    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            contacts: RwLock::new(Vec::new()),
            projects,
        }
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn save_contact(&self, record: ContactRecord) -> Result<(), StorageError> {
        self.contacts.write().await.push(record);
        Ok(())
    }

    async fn contacts(&self) -> Result<Vec<ContactRecord>, StorageError> {
        Ok(self.contacts.read().await.clone())
    }

    async fn projects(&self) -> Result<Vec<Project>, StorageError> {
        Ok(self.projects.clone())
    }

    async fn is_connected(&self) -> bool {
        true
    }
}
