//! UI Constants
//!
//! Centralized constants for layout, caching and the backing service.

/// Default row height in pixels
pub const DEFAULT_ROW_HEIGHT: f64 = 24.0;

/// Default viewport height used before the first layout pass
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 600.0;

/// Largest spacer extent expressed as a single length
pub const SPACER_CEILING: f64 = 1_000_000.0;

/// Maximum number of rows folded into one spacer chunk
pub const SPACER_CHUNK_ROWS: u64 = 999_999;

/// Icon cache capacity (entries)
pub const ICON_CACHE_CAPACITY: usize = 5_000;

/// Built-in icons used when no backing service is attached
pub const BUILTIN_FOLDER_ICON: &str = "folder.svg";
pub const BUILTIN_FILE_ICON: &str = "file.svg";

/// Backing service defaults
pub const DEFAULT_BACKEND_HOST: &str = "localhost";
pub const DEFAULT_BACKEND_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment overrides set by the backing-service launcher
pub const ENV_PORT: &str = "XCMD_PORT";
pub const ENV_TOKEN: &str = "XCMD_TOKEN";

/// Default window dimensions
pub const DEFAULT_WINDOW_WIDTH: f32 = 1200.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 750.0;

/// Tab strip and address bar heights
pub const TAB_STRIP_HEIGHT: f32 = 30.0;
pub const ADDRESS_BAR_HEIGHT: f32 = 28.0;
