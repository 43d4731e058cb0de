//! Content-addressed blob storage on the local filesystem

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{CacheError, Result};
use crate::hash::KeyHasher;
use crate::types::StoreConfig;

const TEMP_SUFFIX: &str = ".tmp";

/// Distinguishes temp files of concurrent writers within this process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Key -> bytes persistence used by the read-through cache.
///
/// Implementations contain their own I/O failures: a failed write reports
/// `false`, a failed read is indistinguishable from a miss.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Write `value` for `key`, replacing any previous entry
    async fn store(&self, key: &str, value: &[u8]) -> bool;

    /// Read the entry for `key`, `None` if missing or unreadable
    async fn retrieve(&self, key: &str) -> Option<Vec<u8>>;

    /// Delete the entry for `key`, returning whether a file was removed
    async fn remove(&self, key: &str) -> bool;

    /// Delete every entry, best-effort
    async fn clear(&self);
}

/// A blob store that keeps one file per key, named by the key's digest
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    /// Directory where cached blobs are stored
    cache_dir: PathBuf,
    hasher: KeyHasher,
}

impl FileBlobStore {
    /// Open a store at `cache_dir` with SHA-256 addressing, creating the
    /// directory (and its parents) if needed
    pub async fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::open(&StoreConfig::with_dir(cache_dir)).await
    }

    /// Open a store from configuration
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let cache_dir = config.resolve_dir()?;
        let hasher = KeyHasher::for_mode(config.hash);

        fs::create_dir_all(&cache_dir)
            .await
            .map_err(|source| CacheError::CreateDir {
                path: cache_dir.clone(),
                source,
            })?;

        let metadata = fs::metadata(&cache_dir)
            .await
            .map_err(|source| CacheError::CreateDir {
                path: cache_dir.clone(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(CacheError::NotADirectory(cache_dir));
        }

        if hasher.is_weak() {
            warn!(cache_dir = ?cache_dir, "Using weak FNV-1a key hashing; collisions are possible");
        }
        info!(cache_dir = ?cache_dir, hash = %config.hash, "File blob store initialized");

        Ok(Self { cache_dir, hasher })
    }

    /// The storage root
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn hasher(&self) -> KeyHasher {
        self.hasher
    }

    /// On-disk path of the entry for `key` (whether or not it exists)
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(self.hasher.file_name(key))
    }

    /// Whether an entry file exists for `key`
    pub async fn contains(&self, key: &str) -> bool {
        match fs::metadata(self.entry_path(key)).await {
            Ok(metadata) => metadata.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to stat cache entry");
                false
            }
        }
    }

    /// Write to a sibling temp file, then rename over the entry so readers
    /// never observe a partially written payload
    async fn write_entry(&self, path: &Path, value: &[u8]) -> std::io::Result<()> {
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(format!(
            ".{}-{}{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
            TEMP_SUFFIX
        ));
        let tmp = PathBuf::from(tmp);

        let result = async {
            fs::write(&tmp, value).await?;
            fs::rename(&tmp, path).await
        }
        .await;

        if result.is_err() {
            let _ = fs::remove_file(&tmp).await;
        }
        result
    }
}

/// Delete each path, logging and skipping failures; returns how many were removed
async fn remove_files(paths: &[PathBuf]) -> usize {
    let mut removed = 0;
    for path in paths {
        match fs::remove_file(path).await {
            Ok(()) => removed += 1,
            Err(e) => warn!(path = ?path, error = %e, "Failed to delete cache file"),
        }
    }
    removed
}

#[async_trait]
impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    async fn store(&self, key: &str, value: &[u8]) -> bool {
        (**self).store(key, value).await
    }

    async fn retrieve(&self, key: &str) -> Option<Vec<u8>> {
        (**self).retrieve(key).await
    }

    async fn remove(&self, key: &str) -> bool {
        (**self).remove(key).await
    }

    async fn clear(&self) {
        (**self).clear().await
    }
}

#[async_trait]
impl<T: CacheStore + ?Sized> CacheStore for Box<T> {
    async fn store(&self, key: &str, value: &[u8]) -> bool {
        (**self).store(key, value).await
    }

    async fn retrieve(&self, key: &str) -> Option<Vec<u8>> {
        (**self).retrieve(key).await
    }

    async fn remove(&self, key: &str) -> bool {
        (**self).remove(key).await
    }

    async fn clear(&self) {
        (**self).clear().await
    }
}

#[async_trait]
impl CacheStore for FileBlobStore {
    async fn store(&self, key: &str, value: &[u8]) -> bool {
        let path = self.entry_path(key);

        match self.write_entry(&path, value).await {
            Ok(()) => {
                debug!(key = %key, size = value.len(), "Cached blob");
                true
            }
            Err(e) => {
                warn!(key = %key, path = ?path, error = %e, "Failed to store blob");
                false
            }
        }
    }

    async fn retrieve(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key);

        match fs::read(&path).await {
            Ok(data) => {
                debug!(key = %key, size = data.len(), "Cache hit");
                Some(data)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = %key, "Cache miss");
                None
            }
            Err(e) => {
                warn!(key = %key, path = ?path, error = %e, "Failed to read cached blob");
                None
            }
        }
    }

    async fn remove(&self, key: &str) -> bool {
        let path = self.entry_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, "Removed cache entry");
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!(key = %key, path = ?path, error = %e, "Failed to remove cached blob");
                false
            }
        }
    }

    async fn clear(&self) {
        let mut entries = match fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(cache_dir = ?self.cache_dir, error = %e, "Failed to list cache directory");
                return;
            }
        };

        let mut files = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(cache_dir = ?self.cache_dir, error = %e, "Failed to read cache directory entry");
                    break;
                }
            };

            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = ?path, error = %e, "Failed to stat cache file");
                    continue;
                }
            }

            files.push(path);
        }

        let removed = remove_files(&files).await;
        info!(cache_dir = ?self.cache_dir, removed, "Cleared cache");
    }
}
