//! Secret storage.

mod api;
pub use api::{Result, SecretStorageApi};
mod file;
pub use file::FileStorage;
mod memory;
pub use memory::InMemoryStorage;

use async_trait::async_trait;
use std::{path::PathBuf, sync::Arc};

/// Secret storage interface.
#[derive(Debug, Clone)]
pub struct SecretStorage {
    inner: Arc<dyn SecretStorageApi>,
}

impl SecretStorage {
    /// Create [`SecretStorage`] with an in-memory backend.
    ///
    /// Secrets do not outlive the process.
    pub fn in_memory() -> Self {
        Self { inner: Arc::new(InMemoryStorage::default()) }
    }

    /// Create [`SecretStorage`] backed by a JSON file at `path`.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { inner: Arc::new(FileStorage::new(path)) }
    }

    /// Create [`SecretStorage`] from a custom backend.
    pub fn new(inner: impl SecretStorageApi + 'static) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[async_trait]
impl SecretStorageApi for SecretStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }
}
