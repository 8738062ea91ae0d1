//! badge-renderer: unread-count icons for chat clients
//!
//! This crate draws the application icon for tray and window-badge use. It
//! composites a vector base image with an unread-count badge and caches
//! the rasterized results by size and count.
//!
//! # Example
//!
//! ```
//! use badge_renderer::{IconRenderer, RendererConfig, SizePx, SvgSource};
//!
//! let config = RendererConfig::new().with_icon(SvgSource::from_svg(
//!     r##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32">
//!         <rect width="32" height="32" fill="#3f7fbf"/></svg>"##,
//! ));
//! let mut renderer = IconRenderer::new(config);
//!
//! // Tray icon at 16, 18, 22 and 36 px with a "3" badge.
//! let tray = renderer.icon(3, 0);
//! assert_eq!(tray.len(), 4);
//!
//! // A single size, served from the pixmap cache on repeat calls.
//! let small = renderer.pixmap(SizePx::square(16), 3, 0);
//! assert_eq!(small.dimensions(), SizePx::square(16));
//!
//! // Window badge.
//! let badge = renderer.win_badge_icon(12);
//! assert_eq!(badge.sizes(), vec![SizePx::square(48)]);
//! ```
//!
//! # Configuration
//!
//! [`RendererConfig`] round-trips through JSON, so it can live in a
//! settings file:
//!
//! ```
//! use badge_renderer::RendererConfig;
//!
//! let config = RendererConfig::from_json(r#"{ "pixmapCacheLimitKb": 256 }"#).unwrap();
//! assert_eq!(config.default_sizes, vec![16, 18, 22, 36]);
//! ```

mod badge;
mod cache;
mod config;
mod error;
mod icon;
mod renderer;
mod svg;
mod text;

pub use badge::{badge_region, badge_text, MAX_DISPLAYED_COUNT, OVERFLOW_LABEL, WIN_BADGE_SIZE};
pub use cache::{CacheKey, CacheStats, PixmapCache};
pub use config::{
    BadgePalette, BadgeStyle, FontDescriptor, RendererConfig, DEFAULT_PIXMAP_CACHE_LIMIT_KB,
    DEFAULT_SIZES,
};
pub use error::{Error, Result};
pub use icon::{IconImage, IconSet, SizePx};
pub use renderer::IconRenderer;
pub use svg::SvgSource;
