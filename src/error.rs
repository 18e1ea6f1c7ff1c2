use thiserror::Error;

/// Errors raised while validating coffee input, before any side effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),
    #[error("invalid price {0:?}")]
    InvalidPrice(String),
    #[error("invalid id {0:?}")]
    InvalidId(String),
}

/// Errors surfaced by a [`CoffeeStore`](crate::CoffeeStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("malformed stored document: {0}")]
    Malformed(String),
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        StoreError::Malformed(msg.into())
    }
}

/// Errors surfaced by a [`BlobStore`](crate::BlobStore) backend.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid blob key: {0:?}")]
    InvalidKey(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type BlobResult<T> = Result<T, BlobError>;
