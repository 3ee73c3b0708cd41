use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}

impl StoreError {
    /// Corruption at a specific key; the key is rendered as hex.
    pub fn corruption(key: &[u8], reason: impl std::fmt::Display) -> Self {
        Self::Corruption(format!("key {}: {}", hex::encode(key), reason))
    }

    /// Whether the host must stop processing instead of retrying.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Corruption(_))
    }
}
