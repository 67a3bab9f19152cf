//! Process-wide counters exported in Prometheus text format
//!
//! Plain atomic counters with no ordering relationship to the store's
//! transactions; a count can briefly lag or lead the committed state.

use std::sync::atomic::{AtomicU64, Ordering};

/// Application metrics
#[derive(Debug, Default)]
pub struct Metrics {
    prompts_created: AtomicU64,
    prompt_versions_created: AtomicU64,
    http_requests: AtomicU64,
    http_errors: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr_prompts_created(&self) {
        self.prompts_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_versions_created(&self) {
        self.prompt_versions_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_http_requests(&self) {
        self.http_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_http_errors(&self) {
        self.http_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Render all counters in Prometheus text exposition format.
    pub fn render_prometheus(&self) -> String {
        format!(
            "# HELP prompts_created_total Total number of prompts created\n\
             # TYPE prompts_created_total counter\n\
             prompts_created_total {}\n\
             \n\
             # HELP prompt_versions_created_total Total number of prompt versions created\n\
             # TYPE prompt_versions_created_total counter\n\
             prompt_versions_created_total {}\n\
             \n\
             # HELP http_requests_total Total number of HTTP requests\n\
             # TYPE http_requests_total counter\n\
             http_requests_total {}\n\
             \n\
             # HELP http_errors_total Total number of HTTP errors\n\
             # TYPE http_errors_total counter\n\
             http_errors_total {}\n",
            self.prompts_created.load(Ordering::Relaxed),
            self.prompt_versions_created.load(Ordering::Relaxed),
            self.http_requests.load(Ordering::Relaxed),
            self.http_errors.load(Ordering::Relaxed),
        )
    }
}
