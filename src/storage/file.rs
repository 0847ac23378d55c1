//! Secret storage backed by a JSON file.

use super::{SecretStorageApi, api::Result};
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs::File, io::AsyncWriteExt, sync::Mutex};
use tracing::debug;

type Secrets = BTreeMap<String, String>;

/// [`SecretStorageApi`] implementation persisting a JSON object of strings.
///
/// Every write replaces the file atomically. On Unix the file is only readable by its owner.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Creates a new [`FileStorage`]. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Secrets> {
        match tokio::fs::read(&self.path).await {
            Ok(contents) if contents.iter().all(u8::is_ascii_whitespace) => Ok(Secrets::new()),
            Ok(contents) => Ok(serde_json::from_slice(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Secrets::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn store(&self, secrets: &Secrets) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = create_private(&tmp).await?;
        file.write_all(&serde_json::to_vec_pretty(secrets)?).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!(path = %self.path.display(), entries = secrets.len(), "persisted secrets");
        Ok(())
    }
}

#[async_trait]
impl SecretStorageApi for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut secrets = self.load().await?;
        secrets.insert(key.to_string(), value.to_string());
        self.store(&secrets).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut secrets = self.load().await?;
        if secrets.remove(key).is_some() {
            self.store(&secrets).await?;
        }
        Ok(())
    }
}

/// Creates `path` afresh, owner-only on Unix from the moment it exists.
///
/// A leftover file from an interrupted write is removed first, since opening an existing file
/// keeps its mode.
async fn create_private(path: &Path) -> std::io::Result<File> {
    match tokio::fs::remove_file(path).await {
        Err(err) if err.kind() != ErrorKind::NotFound => return Err(err),
        _ => {}
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[tokio::test]
    async fn persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("secrets.json");

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get("k").await.unwrap(), None);
        storage.set("k", "v").await.unwrap();
        storage.set("other", "w").await.unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("k").await.unwrap().as_deref(), Some("v"));

        reopened.delete("k").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
        assert_eq!(storage.get("other").await.unwrap().as_deref(), Some("w"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        FileStorage::new(&path).set("k", "v").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn temp_file_is_private_before_any_write() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("secrets.tmp");
        // Leftover from an interrupted write, readable by everyone.
        std::fs::write(&tmp, "stale").unwrap();
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o644)).unwrap();

        let _file = create_private(&tmp).await.unwrap();
        let metadata = std::fs::metadata(&tmp).unwrap();
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
        assert_eq!(metadata.len(), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stale_temp_file_does_not_leak_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, "stale").unwrap();
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o644)).unwrap();

        FileStorage::new(&path).set("k", "v").await.unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!tmp.exists());
    }

    #[tokio::test]
    async fn corrupted_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let err = FileStorage::new(&path).get("k").await.unwrap_err();
        assert!(matches!(err, StorageError::SerdeError(_)));
    }
}
