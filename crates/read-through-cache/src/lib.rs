//! Read-through cache
//!
//! Looks up a key in a [`CacheStore`]; on a miss, asks a [`Retriever`] for the
//! bytes, writes them back to the store and returns them.
//!
//! # Example
//!
//! ```no_run
//! use file_blob_cache::{FileBlobStore, StoreConfig};
//! use read_through_cache::{HttpRetriever, ReadThroughCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileBlobStore::open(&StoreConfig::from_env()?).await?;
//! let cache = ReadThroughCache::new(store, HttpRetriever::new()?);
//!
//! if let Some(bytes) = cache.get("https://example.com/logo.png").await {
//!     println!("{} bytes", bytes.len());
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod retriever;

pub use cache::ReadThroughCache;
pub use file_blob_cache::{CacheStore, FileBlobStore, StoreConfig};
pub use retriever::{HttpRetriever, Retriever};
