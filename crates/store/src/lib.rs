//! Stash Object Storage
//!
//! This crate provides the object-store client for stash: key-addressed
//! storage of binary and text payloads, returning durable locator URLs.
//!
//! ## Design Principles
//!
//! - Payload bytes and item metadata are deliberately separated; this crate
//!   only ever sees bytes and keys, never item records
//! - Keys are caller-assigned as `{owner}/{name}`; a put to an existing key
//!   overwrites the object
//! - No retries are performed here; a failed write surfaces immediately and
//!   the caller decides what to do
//! - Locators returned by `put` remain dereferenceable for the lifetime of
//!   the object
//!
//! ## Storage Layout
//!
//! The filesystem backend keeps payloads and their content types side by
//! side under a single root:
//!
//! ```text
//! <root>/
//! ├── data/
//! │   └── <owner>/
//! │       └── <name>          # payload bytes
//! └── meta/
//!     └── <owner>/
//!         └── <name>          # stored content type
//! ```

mod key;
mod store;

pub use key::ObjectKey;
pub use store::{FsObjectStore, ObjectStore, StoredObject};

/// Errors that can occur during object store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Store root does not exist or is not a directory
    #[error("invalid object store root: {0}")]
    InvalidRoot(String),

    /// Key validation failed (empty or unsafe path segment)
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// No object exists under the given key
    #[error("object not found: {0}")]
    NotFound(String),

    /// The backing store rejected the operation
    #[error("object store I/O failure: {0}")]
    Unavailable(#[from] std::io::Error),
}
