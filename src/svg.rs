//! Vector image loading and rasterization using resvg/usvg.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::icon::{IconImage, SizePx};

// ============================================================================
// SvgSource
// ============================================================================

/// Where the markup for a vector image comes from.
///
/// Serializes as `{ "path": "..." }` or `{ "svgData": "<svg>...</svg>" }`.
///
/// # Example
///
/// ```
/// use badge_renderer::SvgSource;
///
/// let from_file = SvgSource::from_path("icons/app.svg");
/// let inline = SvgSource::from_svg("<svg>...</svg>");
/// assert!(from_file.is_path());
/// assert!(inline.is_raw());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum SvgSource {
    /// An SVG (or SVGZ) file on disk, read at load time.
    Path(PathBuf),

    /// Raw SVG markup.
    #[serde(rename = "svgData")]
    Raw(String),
}

impl SvgSource {
    /// Creates a source from raw SVG markup.
    pub fn from_svg(svg: impl Into<String>) -> Self {
        Self::Raw(svg.into())
    }

    /// Creates a source that reads the given file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn is_path(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Reads and parses the source into a render tree.
    pub fn load(&self, options: &Options) -> Result<Tree> {
        match self {
            Self::Path(path) => load_file(path, options),
            Self::Raw(svg) => Ok(Tree::from_str(svg, options)?),
        }
    }
}

impl From<&str> for SvgSource {
    fn from(svg: &str) -> Self {
        Self::from_svg(svg)
    }
}

impl From<PathBuf> for SvgSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

fn load_file(path: &Path, options: &Options) -> Result<Tree> {
    let data = std::fs::read(path).map_err(|err| Error::io(path, err))?;
    Ok(Tree::from_data(&data, options)?)
}

// ============================================================================
// Rasterization
// ============================================================================

/// Allocates a transparent premultiplied canvas.
///
/// Returns `None` for a zero-area size.
pub fn new_canvas(size: SizePx) -> Option<Pixmap> {
    Pixmap::new(size.width, size.height)
}

/// Draws `tree` onto `pixmap`, stretched to fill `size`.
///
/// Each axis is scaled independently, so a square source drawn at a
/// non-square size is distorted rather than letterboxed.
pub fn render_tree(tree: &Tree, pixmap: &mut Pixmap, size: SizePx) {
    let svg_size = tree.size();
    let scale_x = size.width as f32 / svg_size.width();
    let scale_y = size.height as f32 / svg_size.height();
    resvg::render(tree, Transform::from_scale(scale_x, scale_y), &mut pixmap.as_mut());
}

/// Rasterizes `tree` into a fresh image of exactly `size`.
pub fn rasterize(tree: &Tree, size: SizePx) -> IconImage {
    match new_canvas(size) {
        Some(mut pixmap) => {
            render_tree(tree, &mut pixmap, size);
            IconImage::new(pixmap_to_rgba_image(&pixmap))
        }
        None => IconImage::blank(size),
    }
}

/// Converts a premultiplied tiny_skia pixmap into a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    img
}

// ============================================================================
// Tests
// ============================================================================
