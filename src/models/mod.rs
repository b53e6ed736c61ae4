//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! along with the request and response bodies built from them.

/// One-time download code model
pub mod code;
/// Business profile model
pub mod settings;
