//! Error types for xcmd-gui
//!
//! Centralized error handling using snafu for ergonomic error definitions.

use std::sync::Arc;

use snafu::Snafu;

/// Main error type for the application
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// Row template does not satisfy the structure the view requires
    #[snafu(display("Row template error: {message}"))]
    Template { message: String },

    /// IO error (file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// Request to the backing service could not be completed
    #[snafu(display("Request to {url} failed: {source}"))]
    Transport { url: String, source: reqwest::Error },

    /// Backing service answered with a non-success status
    #[snafu(display("Backend at {url} responded with status {status}"))]
    Status { url: String, status: u16 },

    /// Backing service answered with an unexpected payload
    #[snafu(display("Unexpected response from backend: {message}"))]
    Protocol { message: String },

    /// The memoized directory listing failed
    #[snafu(display("Directory listing failed: {source}"))]
    Listing { source: Arc<Error> },

    /// Background task was cancelled or panicked
    #[snafu(display("Background task failed: {message}"))]
    Task { message: String },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
