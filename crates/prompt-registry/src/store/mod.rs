//! Storage backends for the prompt registry

pub mod sqlite;

use crate::entities::*;
use crate::error::Result;
use async_trait::async_trait;

/// Interface for prompt storage operations.
///
/// Implementations must guarantee transactional atomicity for the create
/// operations and the append-only invariant: per prompt, version numbers
/// form the dense sequence 1..current_version with no gaps.
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// Create a new prompt together with its first version (v1), atomically.
    async fn create_prompt(&self, input: CreatePromptInput) -> Result<PromptWithCurrentVersion>;

    /// Append a new version to an existing prompt and advance its
    /// current_version pointer, atomically.
    async fn create_version(
        &self,
        slug: &str,
        input: CreateVersionInput,
    ) -> Result<PromptWithCurrentVersion>;

    /// Fetch a prompt joined with its current version.
    async fn get_prompt(&self, slug: &str) -> Result<PromptWithCurrentVersion>;

    /// Fetch one specific version of a prompt.
    async fn get_version(&self, slug: &str, version: i64) -> Result<PromptVersion>;

    /// List prompts ordered by creation time, most recent first.
    async fn list_prompts(&self, limit: i64, offset: i64) -> Result<Vec<PromptSummary>>;

    /// List all versions of a prompt ordered by version number ascending.
    async fn list_versions(&self, slug: &str) -> Result<Vec<PromptVersion>>;

    /// Aggregate counts across prompts and versions.
    async fn stats(&self) -> Result<RegistryStats>;

    /// Release the backing store handle.
    async fn close(&self);
}
