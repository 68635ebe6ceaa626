//! Utilities
//!
//! Formatting helpers and configuration storage.

pub mod config_store;
pub mod format;
