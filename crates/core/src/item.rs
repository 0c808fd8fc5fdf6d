//! The item data model.
//!
//! An [`Item`] is one saved unit of content: the metadata record for a
//! binary upload or a text snippet whose payload lives in the object store.
//! Items are serialised camelCase on the wire and stored one JSON document
//! per item in the repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stash_types::OwnerId;
use utoipa::ToSchema;
use uuid::Uuid;

/// Media type recorded for text items and used as the sniffing fallback.
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// Generic media type declared by clients that know nothing better.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Which of the two content shapes an item holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Binary,
    Text,
}

/// A saved unit of content plus its metadata record.
///
/// Invariants:
/// - exactly one item exists per `(owner_id, id)` pair; ids are never reused
/// - for binary items, `storage_key`, `storage_url` and `size_bytes` are
///   fixed at creation; only `title` may change afterwards
/// - for text items, `body` and `title` change together on every body edit
/// - `updated_at` refreshes on every mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Assigned by the repository on insert; immutable thereafter.
    pub id: Uuid,
    /// Set once at creation, never mutated.
    #[schema(value_type = String)]
    pub owner_id: OwnerId,
    pub kind: ItemKind,
    /// Human-readable label; derived from the body prefix for text items.
    pub title: String,
    /// MIME classification used by clients for filtering.
    pub media_type: String,
    /// Byte length of the stored payload; binary items only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    /// Raw object-store key, persisted so edits overwrite the same object.
    pub storage_key: String,
    /// Durable locator URL returned by the object store.
    pub storage_url: String,
    /// Current text content; text items only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert input for the repository: an [`Item`] minus the fields the
/// repository itself assigns (`id` and the timestamps).
#[derive(Debug, Clone)]
pub struct NewItem {
    pub owner_id: OwnerId,
    pub kind: ItemKind,
    pub title: String,
    pub media_type: String,
    pub size_bytes: Option<u64>,
    pub storage_key: String,
    pub storage_url: String,
    pub body: Option<String>,
}

/// Partial update applied by `update_fields`; `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Resolves the media type recorded for an uploaded payload.
///
/// The declared multipart content type wins when it says something; when it
/// is absent or the generic octet-stream, content sniffing supplies a better
/// value. Sniffing is best-effort and falls back to octet-stream.
pub fn resolve_media_type(declared: Option<&str>, payload: &[u8]) -> String {
    match declared.map(str::trim) {
        Some(ct) if !ct.is_empty() && ct != DEFAULT_MEDIA_TYPE => ct.to_owned(),
        _ => infer::get(payload)
            .map(|kind| kind.mime_type().to_owned())
            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // PNG magic bytes, enough for detection.
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0];

    #[test]
    fn declared_type_wins() {
        assert_eq!(resolve_media_type(Some("video/mp4"), PNG), "video/mp4");
    }

    #[test]
    fn generic_declared_type_is_sniffed() {
        assert_eq!(
            resolve_media_type(Some(DEFAULT_MEDIA_TYPE), PNG),
            "image/png"
        );
        assert_eq!(resolve_media_type(None, PNG), "image/png");
    }

    #[test]
    fn unknown_payload_falls_back_to_octet_stream() {
        assert_eq!(
            resolve_media_type(None, b"plain unrecognisable bytes"),
            DEFAULT_MEDIA_TYPE
        );
    }

    #[test]
    fn items_serialise_camel_case() {
        let item = Item {
            id: Uuid::nil(),
            owner_id: OwnerId::new("alice").unwrap(),
            kind: ItemKind::Binary,
            title: "photo.png".into(),
            media_type: "image/png".into(),
            size_bytes: Some(10),
            storage_key: "alice/photo.png".into(),
            storage_url: "http://localhost:3000/objects/alice/photo.png".into(),
            body: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["ownerId"], "alice");
        assert_eq!(json["mediaType"], "image/png");
        assert_eq!(json["sizeBytes"], 10);
        assert_eq!(json["storageUrl"], item.storage_url);
        assert!(json.get("body").is_none(), "empty body must be omitted");
    }
}
