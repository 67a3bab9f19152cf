//! HTTP route handlers

pub mod prompts;
