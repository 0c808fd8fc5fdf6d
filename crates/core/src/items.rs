//! Save/edit reconciliation across the object store and the metadata
//! repository.
//!
//! Every operation here is one request-scoped sequence of collaborator
//! calls with a fixed ordering: the object-store write always precedes the
//! metadata write. A failure after the object write but before the metadata
//! write therefore leaves an orphaned-but-unreferenced object rather than a
//! metadata record pointing at nothing. Items are only ever discovered via
//! metadata, so the orphan is invisible to readers while a dangling locator
//! would surface as a broken link.
//!
//! The two stores are individually atomic per key/document but not jointly
//! transactional. No retries and no cleanup sweeps run here; every
//! collaborator failure propagates immediately as a terminal error for that
//! request.

use crate::error::{SaveError, SaveResult};
use crate::item::{resolve_media_type, Item, ItemKind, ItemPatch, NewItem, TEXT_MEDIA_TYPE};
use crate::repository::ItemRepository;
use crate::title::derive_title;
use chrono::Utc;
use stash_store::{ObjectKey, ObjectStore};
use stash_types::OwnerId;
use std::sync::Arc;
use uuid::Uuid;

/// Result of a binary upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub id: Uuid,
    pub storage_url: String,
}

/// Result of a text save or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedText {
    pub id: Uuid,
    pub storage_url: String,
    pub title: String,
    pub body: String,
}

/// Coordinates object-store and metadata-store writes for one save or edit
/// operation.
///
/// The service holds no per-request state; concurrent invocations are
/// independent and unsynchronised.
pub struct ItemService {
    objects: Arc<dyn ObjectStore>,
    items: Arc<dyn ItemRepository>,
}

impl ItemService {
    pub fn new(objects: Arc<dyn ObjectStore>, items: Arc<dyn ItemRepository>) -> Self {
        Self { objects, items }
    }

    /// Saves a new binary upload.
    ///
    /// Puts the payload under `{owner}/{file_name}`, then inserts the
    /// metadata record. If the insert fails the stored object is left behind;
    /// see the module docs for the ordering contract.
    ///
    /// # Errors
    ///
    /// - `MissingField` if the payload or file name is empty (no store call
    ///   is made)
    /// - `StoreUnavailable` if the put fails (no metadata is written)
    /// - `RepositoryUnavailable` if the insert fails
    pub async fn save_file(
        &self,
        owner: OwnerId,
        file_name: &str,
        declared_type: Option<&str>,
        payload: &[u8],
    ) -> SaveResult<SavedFile> {
        if payload.is_empty() {
            return Err(SaveError::MissingField("file"));
        }
        let key = ObjectKey::new(owner.clone(), file_name)
            .map_err(|_| SaveError::MissingField("file name"))?;

        let media_type = resolve_media_type(declared_type, payload);
        let storage_url = self
            .objects
            .put(&key, payload, &media_type)
            .await
            .map_err(SaveError::StoreUnavailable)?;

        let item = self
            .items
            .insert(NewItem {
                owner_id: owner,
                kind: ItemKind::Binary,
                title: key.name().to_owned(),
                media_type,
                size_bytes: Some(payload.len() as u64),
                storage_key: key.to_string(),
                storage_url: storage_url.clone(),
                body: None,
            })
            .await?;

        Ok(SavedFile {
            id: item.id,
            storage_url,
        })
    }

    /// Saves a new text snippet under a fresh time-qualified key.
    ///
    /// The title is derived from the body prefix; see [`derive_title`].
    ///
    /// # Errors
    ///
    /// - `MissingField` if the text is empty or whitespace
    /// - `StoreUnavailable` / `RepositoryUnavailable` as for `save_file`
    pub async fn save_text(&self, owner: OwnerId, text: &str) -> SaveResult<SavedText> {
        if text.trim().is_empty() {
            return Err(SaveError::MissingField("text"));
        }

        let key = ObjectKey::for_text(owner.clone(), Utc::now().timestamp_millis());
        let storage_url = self
            .objects
            .put(&key, text.as_bytes(), TEXT_MEDIA_TYPE)
            .await
            .map_err(SaveError::StoreUnavailable)?;

        let title = derive_title(text);
        let item = self
            .items
            .insert(NewItem {
                owner_id: owner,
                kind: ItemKind::Text,
                title: title.clone(),
                media_type: TEXT_MEDIA_TYPE.to_owned(),
                size_bytes: None,
                storage_key: key.to_string(),
                storage_url: storage_url.clone(),
                body: Some(text.to_owned()),
            })
            .await?;

        Ok(SavedText {
            id: item.id,
            storage_url,
            title,
            body: text.to_owned(),
        })
    }

    /// Replaces the body of an existing text item.
    ///
    /// The overwrite reuses the item's persisted storage key, so the object
    /// count per text item stays at one for its whole lifetime. The metadata
    /// update rewrites `body`, the derived `title` and `updated_at` together.
    ///
    /// # Errors
    ///
    /// - `MissingField` if the text is empty
    /// - `NotFound` if no text item matches the owner + id pair; no store
    ///   mutation is attempted in that case. `NotFound` is also reported when
    ///   the record disappears between lookup and update, even though the
    ///   overwrite has already landed by then.
    /// - `StoreUnavailable` / `RepositoryUnavailable` on collaborator failure
    pub async fn edit_text(&self, owner: OwnerId, id: Uuid, text: &str) -> SaveResult<SavedText> {
        if text.trim().is_empty() {
            return Err(SaveError::MissingField("text"));
        }

        let existing = self
            .items
            .find_one(&owner, id)
            .await?
            .filter(|item| item.kind == ItemKind::Text)
            .ok_or_else(|| SaveError::NotFound {
                owner: owner.clone(),
                id,
            })?;

        // A persisted key that no longer parses cannot be addressed in the
        // store at all.
        let key = ObjectKey::parse(&existing.storage_key).map_err(SaveError::StoreUnavailable)?;

        let storage_url = self
            .objects
            .put(&key, text.as_bytes(), TEXT_MEDIA_TYPE)
            .await
            .map_err(SaveError::StoreUnavailable)?;

        let title = derive_title(text);
        let matched = self
            .items
            .update_fields(
                &owner,
                id,
                ItemPatch {
                    title: Some(title.clone()),
                    body: Some(text.to_owned()),
                    updated_at: Some(Utc::now()),
                },
            )
            .await?;
        if matched == 0 {
            return Err(SaveError::NotFound { owner, id });
        }

        Ok(SavedText {
            id,
            storage_url,
            title,
            body: text.to_owned(),
        })
    }

    /// Renames an item without touching its payload.
    ///
    /// Works for both kinds; the title is the only field of a binary item
    /// that may change after creation.
    ///
    /// # Errors
    ///
    /// - `MissingField` if the title is empty
    /// - `NotFound` if no item matches the owner + id pair
    /// - `RepositoryUnavailable` on backend failure
    pub async fn rename(&self, owner: OwnerId, id: Uuid, title: &str) -> SaveResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(SaveError::MissingField("title"));
        }

        let matched = self
            .items
            .update_fields(
                &owner,
                id,
                ItemPatch {
                    title: Some(title.to_owned()),
                    updated_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;
        if matched == 0 {
            return Err(SaveError::NotFound { owner, id });
        }

        Ok(())
    }

    /// Unordered snapshot of everything the owner has saved.
    pub async fn list(&self, owner: OwnerId) -> SaveResult<Vec<Item>> {
        Ok(self.items.list_by_owner(&owner).await?)
    }
}
