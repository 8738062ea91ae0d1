//! Icon types handed to the tray and window-badge consumers.
//!
//! A rendered icon is a collection of straight-alpha RGBA images, one per
//! pixel size. Display environments pick the variant that suits them.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::Result;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A square size of `side` x `side` pixels.
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A single rasterized icon variant.
#[derive(Debug, Clone, PartialEq)]
pub struct IconImage {
    /// The image data in RGBA format (not premultiplied).
    pub data: RgbaImage,
}

impl IconImage {
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// A fully transparent image of the given size.
    pub fn blank(size: SizePx) -> Self {
        Self::new(RgbaImage::new(size.width, size.height))
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns true if every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.data.pixels().all(|p| p[3] == 0)
    }

    /// Writes the image as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.data
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(Into::into)
    }
}

/// A multi-resolution icon: the same picture at several pixel sizes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconSet {
    pub images: Vec<IconImage>,
}

impl IconSet {
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    pub fn from_images(images: Vec<IconImage>) -> Self {
        Self { images }
    }

    pub fn add_image(&mut self, image: IconImage) {
        self.images.push(image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Sizes of the contained variants, in insertion order.
    pub fn sizes(&self) -> Vec<SizePx> {
        self.images.iter().map(IconImage::dimensions).collect()
    }

    /// Finds the variant whose width is closest to `target`.
    ///
    /// Ties go to the variant added first.
    pub fn find_by_size(&self, target: u32) -> Option<&IconImage> {
        self.images
            .iter()
            .min_by_key(|img| img.data.width().abs_diff(target))
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconImage> {
        self.images.iter()
    }

    /// Writes every variant into `dir` as `{stem}-{w}x{h}.png`.
    ///
    /// Returns the written paths in variant order.
    pub fn save_pngs(&self, dir: impl AsRef<Path>, stem: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        self.images
            .iter()
            .map(|image| {
                let size = image.dimensions();
                let path = dir.join(format!("{stem}-{}x{}.png", size.width, size.height));
                image.save_png(&path)?;
                Ok(path)
            })
            .collect()
    }
}

impl IntoIterator for IconSet {
    type Item = IconImage;
    type IntoIter = std::vec::IntoIter<IconImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}

impl<'a> IntoIterator for &'a IconSet {
    type Item = &'a IconImage;
    type IntoIter = std::slice::Iter<'a, IconImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

impl FromIterator<IconImage> for IconSet {
    fn from_iter<T: IntoIterator<Item = IconImage>>(iter: T) -> Self {
        Self::from_images(iter.into_iter().collect())
    }
}
