//! State - Pane State Modules

pub mod tabs_state;
