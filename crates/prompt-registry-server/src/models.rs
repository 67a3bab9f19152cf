//! API models for requests and responses
//!
//! Create-request bodies deserialize straight into the store's input types
//! (`CreatePromptInput`, `CreateVersionInput`); only listing parameters need
//! a server-side shape.

use serde::Deserialize;

/// Pagination parameters for listing endpoints
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,

    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}
