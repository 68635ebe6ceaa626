//! Application Layer
//!
//! Pane identity and navigation context, plus app initialization and the
//! workspace window when built with the `gui` feature.

#[cfg(feature = "gui")]
pub mod application;
pub mod navigation;
#[cfg(feature = "gui")]
pub mod workspace;
