//! Secret storage implementation in-memory.

use super::{SecretStorageApi, api::Result};
use async_trait::async_trait;
use dashmap::DashMap;

/// [`SecretStorageApi`] implementation in-memory.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    secrets: DashMap<String, String>,
}

#[async_trait]
impl SecretStorageApi for InMemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.secrets.get(key).map(|value| value.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.secrets.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.secrets.remove(key);
        Ok(())
    }
}
