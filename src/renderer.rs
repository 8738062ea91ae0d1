//! Memoized renderer for tray icons and window badges.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, trace, warn};
use resvg::usvg::Tree;

use crate::badge::{draw_count_badge, render_win_badge};
use crate::cache::{CacheKey, CacheStats, PixmapCache};
use crate::config::{BadgePalette, RendererConfig};
use crate::error::Result;
use crate::icon::{IconImage, IconSet, SizePx};
use crate::svg::{new_canvas, pixmap_to_rgba_image, rasterize, render_tree, SvgSource};
use crate::text::FontContext;

const DEFAULT_ICON_SVG: &str = include_str!("../assets/icon.svg");
const PERSON_ICON_SVG: &str = include_str!("../assets/person.svg");

// ============================================================================
// IconRenderer
// ============================================================================

/// Renders the application icon with an unread-count badge.
///
/// Two caches sit in front of the rasterizer:
/// - an icon cache holding finished multi-resolution icons and window
///   badges, which only grows (until [`clear_cache`](Self::clear_cache));
/// - a [`PixmapCache`] of single-size images with a KiB budget.
///
/// Every cache-touching method takes `&mut self`, so one renderer serves one
/// caller at a time. Share it behind a `Mutex` if several threads need it.
///
/// # Example
///
/// ```
/// use badge_renderer::{IconRenderer, RendererConfig};
///
/// let mut renderer = IconRenderer::new(RendererConfig::default());
///
/// let tray = renderer.icon(3, 0);
/// assert_eq!(tray.len(), 4);
///
/// let again = renderer.icon(3, 0);
/// assert!(std::sync::Arc::ptr_eq(&tray, &again));
/// ```
pub struct IconRenderer {
    /// Parsed base image. `None` when the source could not be loaded.
    base: Option<Tree>,
    fonts: FontContext,
    colors: BadgePalette,
    bold_labels: bool,
    sizes: Vec<SizePx>,
    pixmaps: PixmapCache,
    icons: HashMap<CacheKey, Arc<IconSet>>,
    person_icon: Arc<IconSet>,
}

impl IconRenderer {
    /// Creates a renderer, absorbing configuration problems.
    ///
    /// An unreadable base icon renders as a transparent image and invalid
    /// badge colors fall back to the defaults; both are logged.
    pub fn new(config: RendererConfig) -> Self {
        let pixmaps = PixmapCache::new(config.pixmap_cache_limit_kb);
        Self::with_pixmap_cache(config, pixmaps)
    }

    /// Like [`new`](Self::new), but with a caller-supplied pixmap cache.
    ///
    /// The cache's own budget wins over `config.pixmap_cache_limit_kb`.
    pub fn with_pixmap_cache(config: RendererConfig, pixmaps: PixmapCache) -> Self {
        let fonts = FontContext::new(&config.font);

        let source = icon_source(&config);
        let base = match source.load(&fonts.options()) {
            Ok(tree) => Some(tree),
            Err(err) => {
                warn!("base icon unavailable, rendering blank: {err}");
                None
            }
        };

        let colors = config.style.resolve().unwrap_or_else(|err| {
            warn!("using default badge colors: {err}");
            BadgePalette::default()
        });

        Self::assemble(config, fonts, base, colors, pixmaps)
    }

    /// Creates a renderer, failing if the base icon cannot be loaded or a
    /// badge color does not parse.
    pub fn try_new(config: RendererConfig) -> Result<Self> {
        let fonts = FontContext::new(&config.font);
        let base = icon_source(&config).load(&fonts.options())?;
        let colors = config.style.resolve()?;
        let pixmaps = PixmapCache::new(config.pixmap_cache_limit_kb);
        Ok(Self::assemble(config, fonts, Some(base), colors, pixmaps))
    }

    fn assemble(
        config: RendererConfig,
        fonts: FontContext,
        base: Option<Tree>,
        colors: BadgePalette,
        pixmaps: PixmapCache,
    ) -> Self {
        let sizes: Vec<SizePx> = config.default_sizes.iter().copied().map(SizePx::square).collect();
        let person_icon = Arc::new(render_person_icon(&fonts, &sizes));

        debug!(
            "icon renderer ready: sizes {:?}, pixmap budget {} KiB",
            config.default_sizes,
            pixmaps.limit_kb()
        );

        Self {
            base,
            fonts,
            colors,
            bold_labels: config.font.bold,
            sizes,
            pixmaps,
            icons: HashMap::new(),
            person_icon,
        }
    }

    /// The tray icon at every default size.
    ///
    /// A badge is drawn when `unread_normal > 0`. `unread_pms` is part of the
    /// cache key but does not change the pixels.
    pub fn icon(&mut self, unread_normal: i32, unread_pms: i32) -> Arc<IconSet> {
        let key = CacheKey::all_sizes(unread_normal, unread_pms);
        if let Some(icon) = self.icons.get(&key) {
            trace!("icon cache hit for {key}");
            return Arc::clone(icon);
        }

        let sizes = self.sizes.clone();
        let icon: IconSet = sizes
            .into_iter()
            .map(|size| self.pixmap(size, unread_normal, unread_pms))
            .collect();
        let icon = Arc::new(icon);

        self.icons.insert(key, Arc::clone(&icon));
        icon
    }

    /// The 48x48 window badge showing `unread_count` in full.
    pub fn win_badge_icon(&mut self, unread_count: i32) -> Arc<IconSet> {
        let key = CacheKey::win_badge(unread_count);
        if let Some(icon) = self.icons.get(&key) {
            trace!("icon cache hit for {key}");
            return Arc::clone(icon);
        }

        debug!("rendering {key}");
        let badge = render_win_badge(unread_count, &self.fonts, &self.colors, self.bold_labels);
        let icon = Arc::new(IconSet::from_images(vec![badge]));

        self.icons.insert(key, Arc::clone(&icon));
        icon
    }

    /// The tray icon at a single size, served from the pixmap cache.
    pub fn pixmap(&mut self, size: SizePx, unread_normal: i32, unread_pms: i32) -> IconImage {
        let key = Self::cache_key(size, unread_normal, unread_pms);
        if let Some(image) = self.pixmaps.get(&key) {
            return image;
        }

        let image = self.render(size, unread_normal, unread_pms);
        self.pixmaps.insert(key, image.clone());
        image
    }

    /// The person icon built at construction.
    pub fn person_icon(&self) -> Arc<IconSet> {
        Arc::clone(&self.person_icon)
    }

    /// Draws the tray icon at `size`, bypassing every cache.
    pub fn render(&self, size: SizePx, unread_normal: i32, unread_pms: i32) -> IconImage {
        debug!(
            "rendering {}",
            Self::cache_key(size, unread_normal, unread_pms)
        );

        let Some(mut pixmap) = new_canvas(size) else {
            return IconImage::blank(size);
        };

        if let Some(base) = &self.base {
            render_tree(base, &mut pixmap, size);
        }

        if unread_normal > 0 {
            draw_count_badge(&mut pixmap, size, unread_normal, &self.fonts, &self.colors);
        }

        IconImage::new(pixmap_to_rgba_image(&pixmap))
    }

    /// The key under which [`pixmap`](Self::pixmap) caches its result.
    pub fn cache_key(size: SizePx, unread_normal: i32, unread_pms: i32) -> CacheKey {
        CacheKey::sized(size, unread_normal, unread_pms)
    }

    /// Square sizes rendered into every multi-resolution icon.
    pub fn default_sizes(&self) -> &[SizePx] {
        &self.sizes
    }

    /// Returns true if the base icon loaded.
    pub fn has_base_icon(&self) -> bool {
        self.base.is_some()
    }

    pub fn pixmap_cache_stats(&self) -> CacheStats {
        self.pixmaps.stats()
    }

    /// Number of finished icons and window badges held.
    pub fn icon_cache_len(&self) -> usize {
        self.icons.len()
    }

    /// Drops both caches. The person icon is kept.
    pub fn clear_cache(&mut self) {
        self.icons.clear();
        self.pixmaps.clear();
    }
}

fn icon_source(config: &RendererConfig) -> SvgSource {
    config
        .icon
        .clone()
        .unwrap_or_else(|| SvgSource::from_svg(DEFAULT_ICON_SVG))
}

fn render_person_icon(fonts: &FontContext, sizes: &[SizePx]) -> IconSet {
    match SvgSource::from_svg(PERSON_ICON_SVG).load(&fonts.options()) {
        Ok(tree) => sizes.iter().map(|&size| rasterize(&tree, size)).collect(),
        Err(err) => {
            warn!("person icon unavailable: {err}");
            sizes.iter().map(|&size| IconImage::blank(size)).collect()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
