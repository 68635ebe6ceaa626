//! xcmd GUI Library
//!
//! Client side of a dual-pane file manager: a virtualized listing engine that
//! renders directories of any size, its navigation and icon handling, the
//! backing-service client, and the GPUI shell (feature `gui`).

pub mod app;
pub mod components;
pub mod constants;
pub mod domain;
pub mod error;
pub mod features;
pub mod helpers;
pub mod services;
pub mod state;
#[cfg(feature = "gui")]
pub mod theme;
pub mod utils;
