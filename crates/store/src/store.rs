//! Object store trait and filesystem backend.

use crate::{ObjectKey, StoreError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Content type recorded when a stored object carries none.
pub(crate) const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A payload read back from the store, together with its stored content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Client interface to a key-addressed object store.
///
/// A put to an existing key overwrites the object; the client does not check
/// for pre-existence. No retry is performed internally; every failure
/// propagates to the caller unchanged.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores a payload under the given key and returns a durable locator
    /// URL for it.
    async fn put(
        &self,
        key: &ObjectKey,
        payload: &[u8],
        content_type: &str,
    ) -> Result<String, StoreError>;

    /// Reads a payload back by key.
    async fn get(&self, key: &ObjectKey) -> Result<StoredObject, StoreError>;
}

/// Filesystem-backed object store.
///
/// Payload bytes live under `<root>/data/<owner>/<name>` and the stored
/// content type under `<root>/meta/<owner>/<name>`. Locators take the form
/// `{public_base_url}/objects/{owner}/{name}` and are served back by the REST
/// surface's object route.
#[derive(Debug)]
pub struct FsObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStore {
    /// Creates a store rooted at an existing directory.
    ///
    /// The `data/` and `meta/` subdirectories are created on demand by `put`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidRoot` if the root does not exist or is not
    /// a directory.
    pub fn new(root: PathBuf, public_base_url: impl Into<String>) -> Result<Self, StoreError> {
        if !root.is_dir() {
            return Err(StoreError::InvalidRoot(format!(
                "not a directory: {}",
                root.display()
            )));
        }
        Ok(Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn data_path(&self, key: &ObjectKey) -> PathBuf {
        self.root
            .join("data")
            .join(key.owner().as_str())
            .join(key.name())
    }

    fn meta_path(&self, key: &ObjectKey) -> PathBuf {
        self.root
            .join("meta")
            .join(key.owner().as_str())
            .join(key.name())
    }

    fn locator(&self, key: &ObjectKey) -> String {
        format!("{}/objects/{}", self.public_base_url, key)
    }

    async fn write_under(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(
        &self,
        key: &ObjectKey,
        payload: &[u8],
        content_type: &str,
    ) -> Result<String, StoreError> {
        Self::write_under(&self.data_path(key), payload).await?;
        Self::write_under(&self.meta_path(key), content_type.as_bytes()).await?;
        Ok(self.locator(key))
    }

    async fn get(&self, key: &ObjectKey) -> Result<StoredObject, StoreError> {
        let bytes = match tokio::fs::read(self.data_path(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => return Err(StoreError::Unavailable(e)),
        };
        let content_type = match tokio::fs::read_to_string(self.meta_path(key)).await {
            Ok(ct) => ct.trim().to_owned(),
            // Objects written out of band may have no recorded type.
            Err(e) if e.kind() == ErrorKind::NotFound => FALLBACK_CONTENT_TYPE.to_owned(),
            Err(e) => return Err(StoreError::Unavailable(e)),
        };
        Ok(StoredObject {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_types::OwnerId;
    use tempfile::TempDir;

    const BASE: &str = "http://localhost:3000";

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(OwnerId::new("alice").unwrap(), name).unwrap()
    }

    fn store(dir: &TempDir) -> FsObjectStore {
        FsObjectStore::new(dir.path().to_path_buf(), BASE).unwrap()
    }

    #[test]
    fn new_rejects_missing_root() {
        let err = FsObjectStore::new(PathBuf::from("/does/not/exist"), BASE)
            .expect_err("missing root should be rejected");
        assert!(matches!(err, StoreError::InvalidRoot(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_normalised() {
        let dir = TempDir::new().unwrap();
        let store =
            FsObjectStore::new(dir.path().to_path_buf(), "http://localhost:3000/").unwrap();
        assert_eq!(
            store.locator(&key("a.txt")),
            "http://localhost:3000/objects/alice/a.txt"
        );
    }

    #[tokio::test]
    async fn put_returns_locator_and_get_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let key = key("photo.png");

        let url = store.put(&key, b"pixels", "image/png").await.unwrap();
        assert_eq!(url, format!("{BASE}/objects/alice/photo.png"));

        let obj = store.get(&key).await.unwrap();
        assert_eq!(obj.bytes, b"pixels");
        assert_eq!(obj.content_type, "image/png");
    }

    #[tokio::test]
    async fn put_to_existing_key_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let key = key("note.txt");

        let first = store.put(&key, b"old", "text/plain").await.unwrap();
        let second = store.put(&key, b"new", "text/plain").await.unwrap();

        assert_eq!(first, second, "overwrite must not change the locator");
        assert_eq!(store.get(&key).await.unwrap().bytes, b"new");
    }

    #[tokio::test]
    async fn get_missing_object_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = store(&dir)
            .get(&key("absent.bin"))
            .await
            .expect_err("missing object should error");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_without_recorded_type_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let key = key("raw.bin");

        let data = dir.path().join("data").join("alice").join("raw.bin");
        std::fs::create_dir_all(data.parent().unwrap()).unwrap();
        std::fs::write(&data, b"bytes").unwrap();

        let obj = store.get(&key).await.unwrap();
        assert_eq!(obj.content_type, FALLBACK_CONTENT_TYPE);
    }
}
