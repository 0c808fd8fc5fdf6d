//! Object key construction and validation.

use crate::StoreError;
use stash_types::OwnerId;

/// A validated object-store key of the form `{owner}/{name}`.
///
/// The owner segment is an already-validated [`OwnerId`]; the name segment is
/// checked at construction so that a key can never address anything outside
/// its owner's namespace. Keys are assigned by the caller and reused verbatim
/// for overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    owner: OwnerId,
    name: String,
}

impl ObjectKey {
    /// Creates a key from an owner and an object name.
    ///
    /// The name is typically the original file name of an upload. It must be
    /// a single non-empty path segment: no separators, no `.`/`..`, no
    /// control characters.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` if the name cannot be used as a path
    /// segment.
    pub fn new(owner: OwnerId, name: &str) -> Result<Self, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidKey("object name cannot be empty".into()));
        }
        if name.contains(['/', '\\'])
            || name == "."
            || name == ".."
            || name.chars().any(char::is_control)
        {
            return Err(StoreError::InvalidKey(format!(
                "object name {name:?} is not a single path segment"
            )));
        }
        Ok(Self {
            owner,
            name: name.to_owned(),
        })
    }

    /// Creates the time-qualified key used for a first-time text save.
    ///
    /// Produces `{owner}/text-{epoch_millis}.txt`. The synthesised name is
    /// always a valid segment, so this cannot fail.
    pub fn for_text(owner: OwnerId, epoch_millis: i64) -> Self {
        Self {
            owner,
            name: format!("text-{epoch_millis}.txt"),
        }
    }

    /// Parses a persisted `{owner}/{name}` key string back into a key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` if the string has no `/` separator or
    /// either segment fails validation.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let (owner, name) = raw
            .split_once('/')
            .ok_or_else(|| StoreError::InvalidKey(format!("key {raw:?} has no owner segment")))?;
        let owner = OwnerId::new(owner)
            .map_err(|e| StoreError::InvalidKey(format!("key {raw:?}: {e}")))?;
        Self::new(owner, name)
    }

    /// Returns the owner segment.
    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns the name segment.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::new("alice").unwrap()
    }

    #[test]
    fn builds_owner_slash_name() {
        let key = ObjectKey::new(owner(), "report.pdf").unwrap();
        assert_eq!(key.to_string(), "alice/report.pdf");
        assert_eq!(key.name(), "report.pdf");
    }

    #[test]
    fn text_keys_are_time_qualified() {
        let key = ObjectKey::for_text(owner(), 1_700_000_000_123);
        assert_eq!(key.to_string(), "alice/text-1700000000123.txt");
    }

    #[test]
    fn rejects_unsafe_names() {
        for bad in ["", "   ", "a/b", "..", ".", "a\\b", "a\0b"] {
            assert!(
                matches!(ObjectKey::new(owner(), bad), Err(StoreError::InvalidKey(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_round_trips() {
        let key = ObjectKey::new(owner(), "photo.png").unwrap();
        let parsed = ObjectKey::parse(&key.to_string()).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn parse_rejects_missing_or_nested_segments() {
        assert!(ObjectKey::parse("no-separator").is_err());
        assert!(ObjectKey::parse("alice/nested/name").is_err());
        assert!(ObjectKey::parse("../escape.txt").is_err());
    }
}
