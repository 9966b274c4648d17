//! Quire - Markdown blog publisher
//!
//! Publishes Markdown posts with frontmatter to a directory of a hosted
//! Git repository, behind a token check and a repository write-access gate.
//! Remote changes use optimistic concurrency: every update or delete names
//! the revision it was based on.

pub mod app;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod content;
pub mod draft;
pub mod error;
pub mod index;
pub mod listing;
pub mod progress;
pub mod publish;
pub mod remote;
pub mod status;
