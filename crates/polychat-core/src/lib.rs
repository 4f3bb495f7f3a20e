//! Core building blocks for Polychat — configuration, chat types, and
//! per-model transcripts.
//!
//! # Modules
//!
//! - [`config`] — YAML config schema, loading/saving, and settings operations
//! - [`types`] — chat messages and the OpenAI-compatible wire types
//! - [`transcript`] — per-model conversation history with a configurable cap
//! - [`utils`] — data-directory and path helpers

pub mod config;
pub mod transcript;
pub mod types;
pub mod utils;
