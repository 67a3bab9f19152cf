//! Error types for the prompt registry

use thiserror::Error;

/// Registry-specific errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(String),

    #[error("prompt with slug {0:?} already exists")]
    SlugConflict(String),

    #[error("prompt with slug {0:?} not found")]
    PromptNotFound(String),

    #[error("version {version} not found for prompt {slug:?}")]
    VersionNotFound { slug: String, version: i64 },

    #[error("storage error: {0}")]
    Storage(String),
}

impl RegistryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
