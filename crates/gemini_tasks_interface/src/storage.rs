//! Content-addressable storage trait.

use async_trait::async_trait;
use gemini_tasks_error::StorageError;

/// Blob storage addressed by URI.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the full content stored under `uri`.
    async fn get(&self, uri: &str) -> Result<Vec<u8>, StorageError>;

    /// Store `data` under a name derived from `name` and return its URI.
    async fn put(&self, name: &str, data: Vec<u8>) -> Result<String, StorageError>;
}
