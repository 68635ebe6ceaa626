//! Palette - Command Palette

pub mod controller;
#[cfg(feature = "gui")]
pub mod page;

pub use controller::{PaletteController, PaletteEntry};
