//! Domain Models
//!
//! Wire types exchanged with the backing service, configuration and commands.

pub mod command;
pub mod config;
pub mod file_info;
pub mod icon;
