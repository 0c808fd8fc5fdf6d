//! Metadata repository for item documents.
//!
//! The repository owns the per-owner collection of item records. Ownership is
//! part of every lookup predicate, not a post-filter: a correct id paired
//! with the wrong owner resolves to nothing.
//!
//! ## Storage Layout
//!
//! The filesystem implementation keeps one JSON document per item:
//!
//! ```text
//! items/
//!   <owner_id>/
//!     <item_id>.json
//! ```

use crate::item::{Item, ItemPatch, NewItem};
use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use stash_types::OwnerId;
use uuid::Uuid;

/// Errors from the metadata repository backend.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("failed to read item document: {0}")]
    Read(std::io::Error),
    #[error("failed to write item document: {0}")]
    Write(std::io::Error),
    #[error("failed to serialize item document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize item document: {0}")]
    Deserialization(serde_json::Error),
}

pub type RepoResult<T> = std::result::Result<T, RepoError>;

/// Data access interface for item records.
///
/// Implementations can use different storage backends; each single-document
/// operation is assumed atomic, but no transaction spans two of them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persists a new item, assigning a fresh id and timestamps.
    async fn insert(&self, item: NewItem) -> RepoResult<Item>;

    /// Finds the item for an owner + id pair. `None` means no match.
    async fn find_one(&self, owner: &OwnerId, id: Uuid) -> RepoResult<Option<Item>>;

    /// Applies a partial update and returns the matched-document count.
    ///
    /// A return of 0 means "not found, nothing changed"; callers must not
    /// assume success. An update that changes nothing still matches.
    async fn update_fields(&self, owner: &OwnerId, id: Uuid, patch: ItemPatch) -> RepoResult<u64>;

    /// Unordered snapshot of all items for an owner.
    async fn list_by_owner(&self, owner: &OwnerId) -> RepoResult<Vec<Item>>;
}

/// Filesystem-backed item repository, one JSON document per item.
#[derive(Debug)]
pub struct FsItemRepository {
    root: PathBuf,
}

impl FsItemRepository {
    /// Creates a repository rooted at the given directory.
    ///
    /// Owner subdirectories are created on demand by `insert`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn owner_dir(&self, owner: &OwnerId) -> PathBuf {
        self.root.join(owner.as_str())
    }

    fn doc_path(&self, owner: &OwnerId, id: Uuid) -> PathBuf {
        self.owner_dir(owner).join(format!("{id}.json"))
    }

    async fn write_doc(path: &Path, item: &Item) -> RepoResult<()> {
        let json = serde_json::to_string_pretty(item).map_err(RepoError::Serialization)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(RepoError::Write)?;
        }
        tokio::fs::write(path, json).await.map_err(RepoError::Write)
    }

    async fn read_doc(path: &Path) -> RepoResult<Option<Item>> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepoError::Read(e)),
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(RepoError::Deserialization)
    }
}

#[async_trait]
impl ItemRepository for FsItemRepository {
    async fn insert(&self, item: NewItem) -> RepoResult<Item> {
        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4(),
            owner_id: item.owner_id,
            kind: item.kind,
            title: item.title,
            media_type: item.media_type,
            size_bytes: item.size_bytes,
            storage_key: item.storage_key,
            storage_url: item.storage_url,
            body: item.body,
            created_at: now,
            updated_at: now,
        };
        let path = self.doc_path(&item.owner_id, item.id);
        Self::write_doc(&path, &item).await?;
        Ok(item)
    }

    async fn find_one(&self, owner: &OwnerId, id: Uuid) -> RepoResult<Option<Item>> {
        Self::read_doc(&self.doc_path(owner, id)).await
    }

    async fn update_fields(&self, owner: &OwnerId, id: Uuid, patch: ItemPatch) -> RepoResult<u64> {
        let path = self.doc_path(owner, id);
        let Some(mut item) = Self::read_doc(&path).await? else {
            return Ok(0);
        };

        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(body) = patch.body {
            item.body = Some(body);
        }
        if let Some(updated_at) = patch.updated_at {
            item.updated_at = updated_at;
        }

        Self::write_doc(&path, &item).await?;
        Ok(1)
    }

    async fn list_by_owner(&self, owner: &OwnerId) -> RepoResult<Vec<Item>> {
        let mut items = Vec::new();

        let mut entries = match tokio::fs::read_dir(self.owner_dir(owner)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(items),
            Err(e) => return Err(RepoError::Read(e)),
        };

        while let Some(entry) = entries.next_entry().await.map_err(RepoError::Read)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_doc(&path).await {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("failed to parse item document: {} - {}", path.display(), e);
                }
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> FsItemRepository {
        FsItemRepository::new(dir.path().to_path_buf())
    }

    fn owner(name: &str) -> OwnerId {
        OwnerId::new(name).unwrap()
    }

    fn new_text_item(owner_name: &str, body: &str) -> NewItem {
        NewItem {
            owner_id: owner(owner_name),
            kind: ItemKind::Text,
            title: body.chars().take(10).collect(),
            media_type: "text/plain".into(),
            size_bytes: None,
            storage_key: format!("{owner_name}/text-1.txt"),
            storage_url: format!("http://localhost:3000/objects/{owner_name}/text-1.txt"),
            body: Some(body.into()),
        }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids_and_persists() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        let a = repo.insert(new_text_item("alice", "first")).await.unwrap();
        let b = repo.insert(new_text_item("alice", "second")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);

        let found = repo.find_one(&owner("alice"), a.id).await.unwrap();
        assert_eq!(found, Some(a));
    }

    #[tokio::test]
    async fn find_one_with_wrong_owner_is_none() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        let item = repo.insert(new_text_item("alice", "private")).await.unwrap();

        let other = repo.find_one(&owner("mallory"), item.id).await.unwrap();
        assert_eq!(other, None, "ownership is part of the lookup predicate");
    }

    #[tokio::test]
    async fn update_fields_reports_matched_count() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let item = repo.insert(new_text_item("alice", "original")).await.unwrap();

        let later = Utc::now();
        let matched = repo
            .update_fields(
                &owner("alice"),
                item.id,
                ItemPatch {
                    title: Some("renamed".into()),
                    updated_at: Some(later),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let updated = repo
            .find_one(&owner("alice"), item.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.body.as_deref(), Some("original"), "body untouched");
        assert_eq!(updated.updated_at, later);
    }

    #[tokio::test]
    async fn update_fields_on_missing_document_matches_zero() {
        let dir = TempDir::new().unwrap();
        let matched = repo(&dir)
            .update_fields(&owner("alice"), Uuid::new_v4(), ItemPatch::default())
            .await
            .unwrap();
        assert_eq!(matched, 0);
    }

    #[tokio::test]
    async fn update_fields_with_wrong_owner_matches_zero() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        let item = repo.insert(new_text_item("alice", "private")).await.unwrap();

        let matched = repo
            .update_fields(
                &owner("mallory"),
                item.id,
                ItemPatch {
                    title: Some("stolen".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(matched, 0);

        let untouched = repo
            .find_one(&owner("alice"), item.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.title, item.title);
    }

    #[tokio::test]
    async fn list_by_owner_is_scoped_and_skips_corrupt_documents() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        repo.insert(new_text_item("alice", "one")).await.unwrap();
        repo.insert(new_text_item("alice", "two")).await.unwrap();
        repo.insert(new_text_item("bob", "other")).await.unwrap();

        // A document that does not parse is skipped, not fatal.
        std::fs::write(dir.path().join("alice").join("junk.json"), "not json {{{").unwrap();

        let items = repo.list_by_owner(&owner("alice")).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.owner_id.as_str() == "alice"));
    }

    #[tokio::test]
    async fn list_by_owner_unknown_owner_is_empty() {
        let dir = TempDir::new().unwrap();
        let items = repo(&dir).list_by_owner(&owner("nobody")).await.unwrap();
        assert!(items.is_empty());
    }
}
