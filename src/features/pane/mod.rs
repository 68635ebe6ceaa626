//! Pane - One Side of the Dual-Pane Workspace

pub mod controller;
#[cfg(feature = "gui")]
pub mod page;

pub use controller::{EnterOutcome, PaneController, PaneEvent};
