/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// The input was empty or contained only whitespace
    #[error("owner id cannot be empty")]
    Empty,
    /// The input contained characters unsafe for a storage path segment
    #[error("owner id must be a single path segment without separators")]
    UnsafeSegment,
}

/// An owner identifier validated for use as a storage path segment.
///
/// This type wraps a `String` and guarantees the identifier is non-empty and
/// safe to embed in object keys and document paths: no path separators, no
/// `.`/`..` segments, no control characters. The input is trimmed of leading
/// and trailing whitespace during construction.
///
/// Identity validation itself happens upstream; by the time an `OwnerId` is
/// constructed the caller has already been authenticated as that owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates a new `OwnerId` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. Returns
    /// `Err(IdError::Empty)` if nothing remains, or
    /// `Err(IdError::UnsafeSegment)` if the identifier could escape a single
    /// path segment.
    pub fn new(input: impl AsRef<str>) -> Result<Self, IdError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty);
        }
        if trimmed.contains(['/', '\\'])
            || trimmed == "."
            || trimmed == ".."
            || trimmed.chars().any(char::is_control)
        {
            return Err(IdError::UnsafeSegment);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for OwnerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for OwnerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OwnerId::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_trims_plain_identifiers() {
        let owner = OwnerId::new("  user-123  ").unwrap();
        assert_eq!(owner.as_str(), "user-123");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(matches!(OwnerId::new(""), Err(IdError::Empty)));
        assert!(matches!(OwnerId::new("   "), Err(IdError::Empty)));
    }

    #[test]
    fn rejects_path_escapes() {
        for bad in ["a/b", "a\\b", ".", "..", "a\nb"] {
            assert!(
                matches!(OwnerId::new(bad), Err(IdError::UnsafeSegment)),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn deserialize_validates() {
        let ok: OwnerId = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");
        assert!(serde_json::from_str::<OwnerId>("\"../alice\"").is_err());
    }
}
