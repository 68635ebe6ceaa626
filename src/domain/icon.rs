//! Icon - Resolved Icon Resources

use std::sync::Arc;

/// Image encoding of a resolved icon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFormat {
    Png,
    Svg,
}

impl IconFormat {
    /// Pick the format from an HTTP content type
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.starts_with("image/svg") => IconFormat::Svg,
            _ => IconFormat::Png,
        }
    }
}

/// A loaded icon image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconResource {
    pub format: IconFormat,
    pub bytes: Arc<[u8]>,
}

impl IconResource {
    pub fn new(format: IconFormat, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            format,
            bytes: bytes.into(),
        }
    }
}
