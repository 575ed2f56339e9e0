//! Property listings server
//!
//! - `api` - HTTP routes, extractors and error rendering
//! - `domain` - Listing validation and service
//! - `data` - SQLite persistence
//! - `core` - Configuration, CLI, storage and lifecycle

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
