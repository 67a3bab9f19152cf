//! Domain entities for the prompt registry

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A logical prompt container.
///
/// Mutated only by version creation, which advances `current_version` and
/// refreshes `updated_at`. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub current_version: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// One immutable entry in a prompt's version ledger.
///
/// Once committed, `version_number` and `content` are never modified or
/// removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptVersion {
    pub id: i64,
    pub prompt_id: i64,
    pub version_number: i64,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// List-view projection of a prompt, without version content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSummary {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub current_version: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A prompt merged with its current (latest) version.
///
/// The return shape of create and single-prompt lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptWithCurrentVersion {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub current_version: PromptVersion,
}

/// System-wide aggregate counts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_prompts: i64,
    pub total_prompt_versions: i64,
}

/// Input for creating a new prompt with its first version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromptInput {
    /// Optional explicit slug; derived from the title when absent or empty.
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub content: String,
}

/// Input for appending a new version to an existing prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVersionInput {
    pub content: String,
}
