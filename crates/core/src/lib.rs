//! # Stash Core
//!
//! Core business logic for the stash save vault.
//!
//! This crate contains the item data model and the reconciliation workflow
//! that keeps an item's externally stored payload and its metadata record in
//! sync:
//!
//! - [`ItemService`], which drives the object store and the metadata repository in
//!   the correct order for each save/edit operation
//! - [`ItemRepository`], the per-owner document collection of item records
//! - [`derive_title`], the title derivation for text items
//!
//! **No API concerns**: authentication, HTTP servers, and wire formats belong
//! in `api-rest`. Identity arrives here as an already-validated
//! [`stash_types::OwnerId`] parameter, never from ambient context.

pub mod config;
pub mod error;
pub mod item;
pub mod items;
pub mod repository;
pub mod title;

pub use config::{ConfigError, CoreConfig};
pub use error::{SaveError, SaveResult};
pub use item::{resolve_media_type, Item, ItemKind, ItemPatch, NewItem, TEXT_MEDIA_TYPE};
pub use items::{ItemService, SavedFile, SavedText};
pub use repository::{FsItemRepository, ItemRepository, RepoError, RepoResult};
pub use title::derive_title;
