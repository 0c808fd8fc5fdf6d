//! Wire types for the REST surface.
//!
//! Responses mirror what clients already consume: a `success` flag plus the
//! operation's payload, camelCase field names throughout.

use serde::{Deserialize, Serialize};
use stash_core::Item;
use utoipa::ToSchema;
use uuid::Uuid;

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Listing of everything one owner has saved
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsRes {
    pub success: bool,
    pub files: Vec<Item>,
}

/// Result of a binary upload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRes {
    pub success: bool,
    pub id: Uuid,
    pub storage_url: String,
}

/// Save-or-edit request for text items.
///
/// Without an `id` this saves a new snippet; with an `id` it replaces that
/// item's body. The surface dispatches on this before the core is invoked.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveTextReq {
    pub text: String,
    #[serde(default)]
    pub id: Option<Uuid>,
}

/// Result of a text save or edit
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveTextRes {
    pub success: bool,
    pub id: Uuid,
    pub storage_url: String,
    pub text: String,
    pub title: String,
}

/// Title-only edit request
#[derive(Debug, Deserialize, ToSchema)]
pub struct EditTitleReq {
    pub title: String,
}

/// Generic mutation acknowledgement
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedRes {
    pub success: bool,
}
