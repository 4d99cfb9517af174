//! Error type for data-collaborator operations.

use crate::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
    #[error("collection already exists: {0}")]
    CollectionExists(String),
    #[error("document not found: {0}")]
    DocumentNotFound(String),
    #[error("field not found: {0}")]
    FieldNotFound(String),
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("user already exists: {0}")]
    UserExists(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::CollectionNotFound(_)
            | StoreError::DocumentNotFound(_)
            | StoreError::FieldNotFound(_)
            | StoreError::FileNotFound(_)
            | StoreError::UserNotFound(_) => ApiError::NotFound,
            StoreError::CollectionExists(name) => {
                ApiError::BadRequest(format!("Collection \"{name}\" already exists."))
            }
            StoreError::UserExists(name) => {
                ApiError::BadRequest(format!("User \"{name}\" already exists."))
            }
            StoreError::InvalidData(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
