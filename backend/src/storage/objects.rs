//! Object store gateway.
//!
//! Credentials and photos are stored with public-read semantics and
//! addressed by a public URL. The trait is the vendor seam: the filesystem
//! store backs local and single-node deployments (the router serves its
//! root), and the memory store backs tests and dry runs. Keys are chosen by
//! the callers; see `credential_key` and `photo_key` in the domain layer.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Interface for the public object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object under `key` and return its public URL.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String>;

    /// Remove an object. Missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Filesystem-backed store. Objects land under `root` and are served by the
/// router's static file mount, so `<public_base_url>/<key>` resolves without
/// auth.
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<String> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create object directory for {key}"))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("failed to write object {key}"))?;

        debug!("Stored object {} ({} bytes)", key, bytes.len());
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.root.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to delete object {key}")),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// In-memory store for tests and dry runs.
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(key).map(|o| o.bytes.clone())
    }

    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .await
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.lock().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String> {
        self.objects.lock().await.insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://objects/{key}"))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsObjectStore::new(dir.path().to_path_buf(), "http://localhost:3000/assets/");

        let url = store
            .put("abc123.png", b"png bytes", "image/png")
            .await
            .expect("put");
        assert_eq!(url, "http://localhost:3000/assets/abc123.png");

        let on_disk = tokio::fs::read(dir.path().join("abc123.png"))
            .await
            .expect("read back");
        assert_eq!(on_disk, b"png bytes");
    }

    #[tokio::test]
    async fn test_fs_store_creates_nested_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsObjectStore::new(dir.path().to_path_buf(), "http://localhost:3000/assets");

        let url = store
            .put("photos/deadbeef.png", b"photo", "image/png")
            .await
            .expect("put");
        assert_eq!(url, "http://localhost:3000/assets/photos/deadbeef.png");
        assert!(dir.path().join("photos/deadbeef.png").exists());
    }

    #[tokio::test]
    async fn test_fs_store_delete_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsObjectStore::new(dir.path().to_path_buf(), "http://localhost:3000/assets");

        store.put("gone.png", b"x", "image/png").await.expect("put");
        store.delete("gone.png").await.expect("delete");
        store.delete("gone.png").await.expect("second delete");
        assert!(!dir.path().join("gone.png").exists());
    }

    #[tokio::test]
    async fn test_memory_store_records_objects() {
        let store = MemoryObjectStore::new();
        let url = store
            .put("abc.png", b"bytes", "image/png")
            .await
            .expect("put");
        assert_eq!(url, "memory://objects/abc.png");
        assert_eq!(store.get("abc.png").await.as_deref(), Some(&b"bytes"[..]));
        assert_eq!(
            store.content_type("abc.png").await.as_deref(),
            Some("image/png")
        );

        store.delete("abc.png").await.expect("delete");
        assert!(!store.contains("abc.png").await);
    }
}
