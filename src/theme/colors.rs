//! Colors - Workspace Theme Colors

use gpui::{rgb, Hsla, Rgba};

/// Color palette - all colors are accessed via associated functions
pub struct XcmdColors;

impl XcmdColors {
    // Background colors
    /// Window background
    pub fn background() -> Rgba { rgb(0x1e1f22) }
    /// Pane background
    pub fn pane_bg() -> Rgba { rgb(0x2b2d30) }
    /// Tab strip background
    pub fn tab_strip_bg() -> Rgba { rgb(0x1e1f22) }
    /// Active tab background
    pub fn tab_active_bg() -> Rgba { rgb(0x2b2d30) }
    /// Address bar background
    pub fn address_bg() -> Rgba { rgb(0x25272a) }
    /// Palette overlay background
    pub fn palette_bg() -> Rgba { rgb(0x313438) }

    // Text colors
    /// Primary text
    pub fn text_primary() -> Rgba { rgb(0xdfe1e5) }
    /// Secondary text (size, date, attributes)
    pub fn text_secondary() -> Rgba { rgb(0x9da0a8) }
    /// Muted text
    pub fn text_muted() -> Rgba { rgb(0x6f737a) }
    /// Directory names
    pub fn text_directory() -> Rgba { rgb(0x8fb8ff) }
    /// Emphasized part of a matched name
    pub fn text_match() -> Rgba { rgb(0xf5c518) }

    // Row colors
    /// Row hover
    pub fn row_hover() -> Rgba { rgb(0x33363a) }
    /// Active row of an inactive pane
    pub fn row_active() -> Rgba { rgb(0x393b40) }
    /// Focused row
    pub fn row_focused() -> Rgba { rgb(0x2e436e) }

    // Border colors
    /// Default border
    pub fn border() -> Rgba { rgb(0x393b40) }
    /// Border of the pane holding the keyboard
    pub fn border_focus() -> Rgba { rgb(0x3574f0) }

    /// Error text
    pub fn danger() -> Rgba { rgb(0xf75464) }
}

/// Convert Rgba to Hsla for certain GPUI operations
impl XcmdColors {
    pub fn border_focus_hsla() -> Hsla {
        Hsla::from(Self::border_focus())
    }
}
