//! Content-addressed file blob store
//!
//! Persists opaque byte payloads under a single directory, one file per key.
//! Each file is named by the lowercase hex SHA-256 of the key plus a
//! `.cache` suffix; no index or metadata is kept, so an entry can only be
//! found again by rehashing its key.

mod cache;
mod error;
mod hash;
mod types;

pub use cache::{CacheStore, FileBlobStore};
pub use error::{CacheError, Result};
pub use hash::{HashMode, KeyHasher, ENTRY_SUFFIX};
pub use types::{default_cache_dir, StoreConfig, CACHE_DIR_ENV, HASH_MODE_ENV};
