//! Config - Application Configuration

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKEND_HOST, DEFAULT_BACKEND_PORT, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_ROW_HEIGHT, DEFAULT_VIEWPORT_HEIGHT, ICON_CACHE_CAPACITY,
};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Backing service connection
    pub backend: BackendConfig,
    /// Listing view settings
    pub view: ViewConfig,
    /// Initial pane locations
    pub panes: PanesConfig,
}

/// Backing service connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Bearer token sent with every request
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BACKEND_HOST.to_string(),
            port: DEFAULT_BACKEND_PORT,
            token: None,
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    /// Base URI of the service
    pub fn base_uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Listing view configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Fixed row height in pixels
    pub row_height: f64,
    /// Viewport height assumed until the first layout pass
    pub viewport_height: f64,
    /// Maximum number of resolved icons kept in memory
    pub icon_cache_capacity: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            icon_cache_capacity: ICON_CACHE_CAPACITY,
        }
    }
}

/// Initial directory of each pane; the service root when absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PanesConfig {
    pub left: Option<String>,
    pub right: Option<String>,
}
