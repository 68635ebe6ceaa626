//! Primitive Components
//!
//! Small building blocks shared by the pages.

pub mod text_input;

pub use text_input::{TextInput, TextInputEvent};
