use crate::repository::RepoError;
use stash_store::StoreError;
use stash_types::OwnerId;
use uuid::Uuid;

/// Error taxonomy for save/edit operations.
///
/// Each variant maps to exactly one HTTP status at the API surface:
/// `MissingField` → 400, `NotFound` → 404, `StoreUnavailable` and
/// `RepositoryUnavailable` → 500. Collaborator failures are wrapped and
/// returned unchanged in kind; the reconciler never catches and retries.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Client input was incomplete; no store call was attempted.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// No item matched the owner + id predicate.
    #[error("no item {id} for owner {owner}")]
    NotFound { owner: OwnerId, id: Uuid },

    /// The object store was unreachable or rejected a write.
    #[error("object store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// The metadata repository was unreachable or rejected an operation.
    #[error("metadata repository unavailable: {0}")]
    RepositoryUnavailable(#[from] RepoError),
}

pub type SaveResult<T> = std::result::Result<T, SaveError>;
