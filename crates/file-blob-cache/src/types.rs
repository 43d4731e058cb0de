//! Store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CacheError, Result};
use crate::hash::HashMode;

/// Environment variable overriding the storage root
pub const CACHE_DIR_ENV: &str = "FILE_CACHE_DIR";
/// Environment variable selecting the hash mode (`sha256` or `weak`)
pub const HASH_MODE_ENV: &str = "FILE_CACHE_HASH";

/// Configuration for a [`crate::FileBlobStore`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage root. `None` means the per-user default, `<home>/.cache/file-cache`.
    pub cache_dir: Option<PathBuf>,
    pub hash: HashMode,
}

impl StoreConfig {
    /// Config rooted at an explicit directory
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: Some(cache_dir.into()),
            ..Self::default()
        }
    }

    /// Load configuration from `FILE_CACHE_DIR` and `FILE_CACHE_HASH`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cache_dir = lookup(CACHE_DIR_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let hash = match lookup(HASH_MODE_ENV) {
            Some(s) if !s.trim().is_empty() => s.parse()?,
            _ => HashMode::default(),
        };

        Ok(Self { cache_dir, hash })
    }

    /// The explicit storage root, or the per-user default
    pub fn resolve_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }

        default_cache_dir().ok_or_else(|| {
            CacheError::Config(
                "could not determine home directory; set FILE_CACHE_DIR".to_string(),
            )
        })
    }
}

/// `<home>/.cache/file-cache`, if a home directory is known
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cache").join("file-cache"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.cache_dir, None);
        assert_eq!(config.hash, HashMode::Sha256);
    }

    #[test]
    fn test_explicit_dir_overrides_default() {
        let config = StoreConfig::with_dir("/tmp/explicit");
        assert_eq!(
            config.resolve_dir().unwrap(),
            PathBuf::from("/tmp/explicit")
        );
    }

    #[test]
    fn test_default_dir_is_under_home() {
        if let Some(home) = dirs::home_dir() {
            let dir = StoreConfig::default().resolve_dir().unwrap();
            assert_eq!(dir, home.join(".cache").join("file-cache"));
        }
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (CACHE_DIR_ENV, "/var/cache/files"),
            (HASH_MODE_ENV, "weak"),
        ]))
        .unwrap();

        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/cache/files")));
        assert_eq!(config.hash, HashMode::Weak);
    }

    #[test]
    fn test_from_lookup_defaults_when_unset_or_blank() {
        let config = StoreConfig::from_lookup(lookup_from(&[(CACHE_DIR_ENV, "  ")])).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_unknown_hash_mode() {
        let result = StoreConfig::from_lookup(lookup_from(&[(HASH_MODE_ENV, "md5")]));
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"cache_dir": "/data/cache", "hash": "weak"}"#).unwrap();
        assert_eq!(config.cache_dir, Some(PathBuf::from("/data/cache")));
        assert_eq!(config.hash, HashMode::Weak);

        // Missing fields fall back to defaults
        let config: StoreConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());

        let json = serde_json::to_string(&StoreConfig::with_dir("/x")).unwrap();
        assert!(json.contains("sha256"));
    }
}
