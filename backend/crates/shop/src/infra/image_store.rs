//! Image Stores
//!
//! `FsImageStore` writes uploads under a directory on disk with
//! timestamp-prefixed names; the recorded path is `<prefix>/<file>`, which
//! is also where the API serves it. `InMemoryImageStore` is for tests.

use std::collections::HashMap;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repository::ImageStore;
use crate::domain::value_object::image::ImageUpload;
use crate::error::{ShopError, ShopResult};

/// Public prefix for stored image paths
pub const DEFAULT_PUBLIC_PREFIX: &str = "uploads";

/// `2024-05-01T10-20-30.123Z-1a2b3c4d-lamp.png`
fn stored_file_name(upload: &ImageUpload) -> String {
    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3fZ");
    let nonce = Uuid::new_v4().simple().to_string();
    format!("{timestamp}-{}-{}", &nonce[..8], upload.safe_file_name())
}

/// File name part of a recorded path, if the path is one this store could
/// have produced.
fn own_file_name<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    let name = path.strip_prefix(prefix)?.strip_prefix('/')?;
    let plain = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != "..";
    plain.then_some(name)
}

// ============================================================================
// Filesystem
// ============================================================================

#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
    public_prefix: String,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_root(&self) -> ShopResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }
}

impl ImageStore for FsImageStore {
    async fn save(&self, upload: &ImageUpload) -> ShopResult<String> {
        self.ensure_root().await?;

        let file_name = stored_file_name(upload);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.root.join(&file_name))
            .await?;
        file.write_all(&upload.bytes).await?;
        file.flush().await?;

        tracing::debug!(file = %file_name, bytes = upload.len(), "Image stored");

        Ok(format!("{}/{}", self.public_prefix, file_name))
    }

    async fn remove(&self, path: &str) -> ShopResult<bool> {
        let Some(file_name) = own_file_name(&self.public_prefix, path) else {
            tracing::warn!(path = %path, "Refusing to remove image outside the upload directory");
            return Ok(false);
        };

        match tokio::fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(ShopError::Image(e)),
        }
    }
}

// ============================================================================
// In-Memory
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryImageStore {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    fail_removals: Arc<AtomicBool>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `remove` fail with an I/O error
    pub fn fail_removals(&self) {
        self.fail_removals.store(true, Ordering::SeqCst);
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.files.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

impl ImageStore for InMemoryImageStore {
    async fn save(&self, upload: &ImageUpload) -> ShopResult<String> {
        let path = format!("{}/{}", DEFAULT_PUBLIC_PREFIX, stored_file_name(upload));
        self.files
            .write()
            .await
            .insert(path.clone(), upload.bytes.clone());
        Ok(path)
    }

    async fn remove(&self, path: &str) -> ShopResult<bool> {
        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(ShopError::Image(std::io::Error::other("removal disabled")));
        }
        Ok(self.files.write().await.remove(path).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> ImageUpload {
        ImageUpload::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
    }

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("shop-images-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_own_file_name() {
        assert_eq!(own_file_name("uploads", "uploads/a.png"), Some("a.png"));
        assert_eq!(own_file_name("uploads", "uploads/../secret"), None);
        assert_eq!(own_file_name("uploads", "uploads/.."), None);
        assert_eq!(own_file_name("uploads", "elsewhere/a.png"), None);
        assert_eq!(own_file_name("uploads", "uploadsa.png"), None);
        assert_eq!(own_file_name("uploads", "uploads/"), None);
    }

    #[test]
    fn test_stored_name_is_timestamp_prefixed() {
        let name = stored_file_name(&upload("../lamp.png"));
        assert!(name.ends_with("-lamp.png"));
        assert!(name.starts_with(&Utc::now().format("%Y-").to_string()));
        assert!(!name.contains(':'));
    }

    #[tokio::test]
    async fn test_fs_save_and_remove() {
        let root = temp_root();
        let store = FsImageStore::new(&root);

        let path = store.save(&upload("lamp.png")).await.unwrap();
        assert!(path.starts_with("uploads/"));
        let file_name = path.trim_start_matches("uploads/");
        let written = tokio::fs::read(root.join(file_name)).await.unwrap();
        assert_eq!(written, upload("lamp.png").bytes);

        assert!(store.remove(&path).await.unwrap());
        assert!(!store.remove(&path).await.unwrap());

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_fs_same_name_twice() {
        let root = temp_root();
        let store = FsImageStore::new(&root);

        let first = store.save(&upload("lamp.png")).await.unwrap();
        let second = store.save(&upload("lamp.png")).await.unwrap();
        assert_ne!(first, second);

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_failure_switch() {
        let store = InMemoryImageStore::new();
        let path = store.save(&upload("a.png")).await.unwrap();
        assert!(store.contains(&path).await);

        store.fail_removals();
        assert!(matches!(store.remove(&path).await, Err(ShopError::Image(_))));
        assert_eq!(store.len().await, 1);
    }
}
