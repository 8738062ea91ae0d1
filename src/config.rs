//! Renderer configuration.
//!
//! [`RendererConfig`] carries everything the renderer used to pull from
//! ambient application state: the base icon, the default sizes, the pixmap
//! cache budget, the font and the badge colors. It serializes to camelCase
//! JSON and every field has a default, so `{}` is a valid configuration.
//!
//! # Example
//!
//! ```
//! use badge_renderer::{RendererConfig, SvgSource};
//!
//! let config = RendererConfig::new()
//!     .with_icon(SvgSource::from_svg("<svg>...</svg>"))
//!     .with_pixmap_cache_limit(2000);
//!
//! let json = config.to_json().unwrap();
//! let restored = RendererConfig::from_json(&json).unwrap();
//! assert_eq!(restored.pixmap_cache_limit_kb, 2000);
//! ```

use std::path::{Path, PathBuf};

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::svg::SvgSource;

/// Sizes rendered for tray icons: 16 is the Windows tray default, 18 fits
/// the macOS menu bar, 22 is the X11 default and 36 covers double-density
/// displays.
pub const DEFAULT_SIZES: [u32; 4] = [16, 18, 22, 36];

/// Default pixmap cache budget in KiB.
pub const DEFAULT_PIXMAP_CACHE_LIMIT_KB: usize = 1000;

// ============================================================================
// FontDescriptor
// ============================================================================

/// The font used for badge labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FontDescriptor {
    /// Preferred family. `sans-serif` is always tried after it.
    pub family: String,

    /// Whether to draw labels in bold.
    pub bold: bool,

    /// Whether to index the fonts installed on the system.
    pub load_system_fonts: bool,

    /// Extra font files to register, e.g. a bundled UI font.
    pub font_files: Vec<PathBuf>,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "sans-serif".into(),
            bold: false,
            load_system_fonts: true,
            font_files: Vec::new(),
        }
    }
}

// ============================================================================
// BadgeStyle
// ============================================================================

/// Badge colors as hex strings (`#rrggbb` or `rrggbb`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct BadgeStyle {
    /// Fill of the unread-count circle on tray icons.
    pub count_fill: String,

    /// Outline and label color.
    pub ink: String,

    /// Top color of the window badge gradient.
    pub win_gradient_top: String,

    /// Bottom color of the window badge gradient.
    pub win_gradient_bottom: String,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            count_fill: "#B2E166".into(),
            ink: "#000000".into(),
            win_gradient_top: "#F9A0A0".into(),
            win_gradient_bottom: "#F09A9A".into(),
        }
    }
}

/// Parsed badge colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgePalette {
    pub count_fill: Srgb<u8>,
    pub ink: Srgb<u8>,
    pub win_gradient_top: Srgb<u8>,
    pub win_gradient_bottom: Srgb<u8>,
}

impl Default for BadgePalette {
    fn default() -> Self {
        Self {
            count_fill: Srgb::new(178, 225, 102),
            ink: Srgb::new(0, 0, 0),
            win_gradient_top: Srgb::new(0xF9, 0xA0, 0xA0),
            win_gradient_bottom: Srgb::new(0xF0, 0x9A, 0x9A),
        }
    }
}

impl BadgeStyle {
    /// Parses every color.
    pub fn resolve(&self) -> Result<BadgePalette> {
        Ok(BadgePalette {
            count_fill: parse_color(&self.count_fill)?,
            ink: parse_color(&self.ink)?,
            win_gradient_top: parse_color(&self.win_gradient_top)?,
            win_gradient_bottom: parse_color(&self.win_gradient_bottom)?,
        })
    }
}

fn parse_color(value: &str) -> Result<Srgb<u8>> {
    value.trim().parse::<Srgb<u8>>().map_err(|err| Error::InvalidColor {
        value: value.to_string(),
        reason: err.to_string(),
    })
}

// ============================================================================
// RendererConfig
// ============================================================================

/// Configuration for [`IconRenderer`](crate::IconRenderer).
///
/// # JSON Format
///
/// ```json
/// {
///   "icon": { "path": "/usr/share/app/icon.svg" },
///   "defaultSizes": [16, 18, 22, 36],
///   "pixmapCacheLimitKb": 1000,
///   "font": { "family": "Cantarell", "bold": false },
///   "style": { "countFill": "#B2E166" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct RendererConfig {
    /// Base image drawn under the badge. `None` uses the built-in icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<SvgSource>,

    /// Square sizes rendered into every multi-resolution icon, in order.
    pub default_sizes: Vec<u32>,

    /// Budget of the rasterized pixmap cache, in KiB.
    pub pixmap_cache_limit_kb: usize,

    pub font: FontDescriptor,

    pub style: BadgeStyle,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            icon: None,
            default_sizes: DEFAULT_SIZES.to_vec(),
            pixmap_cache_limit_kb: DEFAULT_PIXMAP_CACHE_LIMIT_KB,
            font: FontDescriptor::default(),
            style: BadgeStyle::default(),
        }
    }
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `source` as the base icon.
    pub fn with_icon(mut self, source: impl Into<SvgSource>) -> Self {
        self.icon = Some(source.into());
        self
    }

    pub fn with_font(mut self, font: FontDescriptor) -> Self {
        self.font = font;
        self
    }

    pub fn with_default_sizes(mut self, sizes: impl Into<Vec<u32>>) -> Self {
        self.default_sizes = sizes.into();
        self
    }

    pub fn with_pixmap_cache_limit(mut self, limit_kb: usize) -> Self {
        self.pixmap_cache_limit_kb = limit_kb;
        self
    }

    pub fn with_style(mut self, style: BadgeStyle) -> Self {
        self.style = style;
        self
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::from_json(&json)
    }
}

// ============================================================================
// Tests
// ============================================================================
