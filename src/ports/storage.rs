use async_trait::async_trait;
use std::error::Error;

/// Access granted on a stored object. Variants are always world-readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    PublicRead,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Write `bytes` under `key`, replacing any existing object.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        visibility: Visibility,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
