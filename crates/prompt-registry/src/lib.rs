//! # Prompt Registry
//!
//! A versioned registry for named text artifacts ("prompts"). Each prompt
//! lives under a unique slug and accumulates an append-only ledger of
//! immutable versions:
//!
//! - Version numbers are dense and monotonically increasing per prompt
//!   (1, 2, 3...) with no gaps or duplicates
//! - A prompt and its first version are created together, atomically
//! - `current_version` always points at the highest committed version
//! - Versions are never edited or deleted once written
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use prompt_registry::{CreatePromptInput, PromptStore, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("sqlite:./data/prompts.db").await?;
//!
//! let created = store
//!     .create_prompt(CreatePromptInput {
//!         slug: None, // derived from the title: "my-test-prompt"
//!         title: "My Test Prompt".to_string(),
//!         description: Some("Greets the user".to_string()),
//!         content: "You are a helpful assistant.".to_string(),
//!     })
//!     .await?;
//!
//! println!("created {} at v{}", created.slug, created.current_version.version_number);
//! # Ok(())
//! # }
//! ```

pub mod entities;
pub mod error;
pub mod slug;
pub mod store;

pub use entities::{
    CreatePromptInput, CreateVersionInput, Prompt, PromptSummary, PromptVersion,
    PromptWithCurrentVersion, RegistryStats,
};
pub use error::{RegistryError, Result};
pub use store::{PromptStore, sqlite::SqliteStore};
