//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent
//! behaviour in multi-threaded runtimes and test harnesses.

use std::path::{Path, PathBuf};

/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    public_base_url: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The public base URL is normalised (trimmed, trailing `/` removed); it
    /// is the prefix under which stored objects are served back to clients.
    pub fn new(
        data_dir: PathBuf,
        public_base_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let public_base_url = public_base_url
            .into()
            .trim()
            .trim_end_matches('/')
            .to_owned();
        if public_base_url.is_empty() {
            return Err(ConfigError::Invalid(
                "public_base_url cannot be empty".into(),
            ));
        }

        Ok(Self {
            data_dir,
            public_base_url,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Root of the object store backend.
    pub fn objects_dir(&self) -> PathBuf {
        self.data_dir.join("objects")
    }

    /// Root of the item document collection.
    pub fn items_dir(&self) -> PathBuf {
        self.data_dir.join("items")
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalises_base_url() {
        let cfg = CoreConfig::new(PathBuf::from("/tmp/stash"), " http://host:3000/ ").unwrap();
        assert_eq!(cfg.public_base_url(), "http://host:3000");
        assert_eq!(cfg.objects_dir(), PathBuf::from("/tmp/stash/objects"));
        assert_eq!(cfg.items_dir(), PathBuf::from("/tmp/stash/items"));
    }

    #[test]
    fn rejects_empty_base_url() {
        let err = CoreConfig::new(PathBuf::from("/tmp/stash"), "  ")
            .expect_err("empty base url should fail");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
