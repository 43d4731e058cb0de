//! Origin fetching for cache misses

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fetches the bytes for a key from outside the cache.
///
/// `None` means the origin could not supply the resource, for whatever
/// reason; the cache does not distinguish causes.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, key: &str) -> Option<Vec<u8>>;
}

#[async_trait]
impl<T: Retriever + ?Sized> Retriever for Arc<T> {
    async fn retrieve(&self, key: &str) -> Option<Vec<u8>> {
        (**self).retrieve(key).await
    }
}

#[async_trait]
impl<T: Retriever + ?Sized> Retriever for Box<T> {
    async fn retrieve(&self, key: &str) -> Option<Vec<u8>> {
        (**self).retrieve(key).await
    }
}

/// Treats each key as a URL and downloads it with a GET request
pub struct HttpRetriever {
    client: Client,
}

impl HttpRetriever {
    /// Create a retriever with a 30 second request timeout
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self, key: &str) -> Option<Vec<u8>> {
        debug!(url = %key, "Fetching from origin");

        let response = match self.client.get(key).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %key, error = %e, "Origin request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(url = %key, status = %response.status(), "Origin returned error status");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => {
                debug!(url = %key, size = bytes.len(), "Fetched from origin");
                Some(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = %key, error = %e, "Failed to read origin response body");
                None
            }
        }
    }
}
