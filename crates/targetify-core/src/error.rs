use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("target text must not be empty")]
    EmptyText,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed reading saved targets: {0}")]
    Read(#[source] StorageError),
    #[error("failed writing targets: {0}")]
    Write(#[source] StorageError),
    #[error("saved targets are not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed encoding targets: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("saved targets have an unexpected shape: {0}")]
    Shape(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstallError {
    #[error("no install prompt has been captured")]
    NoPrompt,
    #[error("install prompt failed: {0}")]
    Platform(String),
}

impl TargetError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
