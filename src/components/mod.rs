//! Components - Reusable UI Components
//!
//! The virtualized table engine and its views, plus the primitive inputs
//! the pages share. Everything in `vtable` outside `view` is headless and
//! runs without a window.

#[cfg(feature = "gui")]
pub mod primitives;
pub mod vtable;
