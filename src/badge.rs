//! Badge drawing: the unread-count overlay on tray icons and the
//! standalone window badge.

use palette::Srgb;
use resvg::tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, Path, PathBuilder, Pixmap, Point, Rect,
    SpreadMode, Stroke, Transform,
};

use crate::config::BadgePalette;
use crate::icon::{IconImage, SizePx};
use crate::svg::{new_canvas, pixmap_to_rgba_image};
use crate::text::{FontContext, TextStyle};

/// Counts above this are shown as [`OVERFLOW_LABEL`].
pub const MAX_DISPLAYED_COUNT: i32 = 99;

/// Label for counts that do not fit (U+221E INFINITY).
pub const OVERFLOW_LABEL: &str = "\u{221E}";

/// Share of the icon's width and height covered by the count badge.
pub const BADGE_FRACTION: f32 = 0.7;

/// Side of the window badge, in pixels.
pub const WIN_BADGE_SIZE: u32 = 48;

const WIN_BADGE_CORNER_RADIUS: f32 = 40.0;
const WIN_BADGE_TEXT_PX: f32 = 40.0;

// Control point distance for a quarter circle drawn as one cubic.
const KAPPA: f32 = 0.552_284_8;

/// The label shown for `count` unread messages.
pub fn badge_text(count: i32) -> String {
    if count > MAX_DISPLAYED_COUNT {
        OVERFLOW_LABEL.to_string()
    } else {
        count.to_string()
    }
}

/// Region of a `size` canvas covered by the count badge.
///
/// The region is [`BADGE_FRACTION`] of the canvas in each dimension, with its
/// bottom-right corner on the last pixel (`width - 1`, `height - 1`) so the
/// outline is not clipped. Returns `None` for an empty canvas.
pub fn badge_region(size: SizePx) -> Option<Rect> {
    if size.is_empty() {
        return None;
    }
    let width = size.width as f32 * BADGE_FRACTION;
    let height = size.height as f32 * BADGE_FRACTION;
    let right = size.width as f32 - 1.0;
    let bottom = size.height as f32 - 1.0;
    Rect::from_xywh(right - width, bottom - height, width, height)
}

/// Draws the unread-count badge onto a canvas of `size`.
///
/// A filled circle with a 1px outline sits in [`badge_region`]; the label is
/// centered on the region shifted one pixel right and down, at two thirds of
/// the region height.
pub fn draw_count_badge(
    pixmap: &mut Pixmap,
    size: SizePx,
    count: i32,
    fonts: &FontContext,
    colors: &BadgePalette,
) {
    let Some(region) = badge_region(size) else {
        return;
    };

    let cx = region.x() + region.width() / 2.0;
    let cy = region.y() + region.height() / 2.0;
    if let Some(circle) = PathBuilder::from_circle(cx, cy, region.width() / 2.0) {
        let mut paint = solid_paint(colors.count_fill);
        pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);

        paint.set_color(skia_color(colors.ink));
        pixmap.stroke_path(&circle, &paint, &hairline(), Transform::identity(), None);
    }

    let Some(text_rect) = Rect::from_xywh(
        region.x() + 1.0,
        region.y() + 1.0,
        region.width(),
        region.height(),
    ) else {
        return;
    };
    let style = TextStyle {
        pixel_size: (region.height() * 2.0 / 3.0).floor(),
        bold: false,
        color: colors.ink,
    };
    fonts.draw_text_centered(pixmap, text_rect, &badge_text(count), style);
}

/// Renders the 48x48 window badge for `count`.
///
/// The background is a top-to-bottom gradient inside a rectangle whose
/// corner radius is clamped to half the side, which makes it a circle. The
/// count is printed in full with no overflow label.
pub fn render_win_badge(count: i32, fonts: &FontContext, colors: &BadgePalette, bold: bool) -> IconImage {
    let size = SizePx::square(WIN_BADGE_SIZE);
    let Some(mut pixmap) = new_canvas(size) else {
        return IconImage::blank(size);
    };

    let side = WIN_BADGE_SIZE as f32;
    if let Some(outline) = Rect::from_xywh(0.5, 0.5, side - 1.0, side - 1.0)
        .and_then(|rect| rounded_rect(rect, WIN_BADGE_CORNER_RADIUS))
    {
        let gradient = LinearGradient::new(
            Point::from_xy(side / 2.0, 0.0),
            Point::from_xy(side / 2.0, side),
            vec![
                GradientStop::new(0.0, skia_color(colors.win_gradient_top)),
                GradientStop::new(1.0, skia_color(colors.win_gradient_bottom)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        );
        if let Some(shader) = gradient {
            let mut paint = Paint::default();
            paint.shader = shader;
            paint.anti_alias = true;
            pixmap.fill_path(&outline, &paint, FillRule::Winding, Transform::identity(), None);
        }

        let ink = solid_paint(colors.ink);
        pixmap.stroke_path(&outline, &ink, &hairline(), Transform::identity(), None);
    }

    if let Some(full) = Rect::from_xywh(0.0, 0.0, side, side) {
        let style = TextStyle {
            pixel_size: WIN_BADGE_TEXT_PX,
            bold,
            color: colors.ink,
        };
        fonts.draw_text_centered(&mut pixmap, full, &count.to_string(), style);
    }

    IconImage::new(pixmap_to_rgba_image(&pixmap))
}

fn rounded_rect(rect: Rect, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let k = r * KAPPA;
    let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}

fn skia_color(color: Srgb<u8>) -> Color {
    Color::from_rgba8(color.red, color.green, color.blue, 255)
}

fn solid_paint(color: Srgb<u8>) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

fn hairline() -> Stroke {
    Stroke {
        width: 1.0,
        ..Stroke::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FontDescriptor;
    use crate::text::bundled_font;

    fn offline_fonts() -> FontContext {
        FontContext::new(&FontDescriptor {
            load_system_fonts: false,
            ..FontDescriptor::default()
        })
    }

    #[test]
    fn label_switches_to_infinity_above_99() {
        assert_eq!(badge_text(1), "1");
        assert_eq!(badge_text(99), "99");
        assert_eq!(badge_text(100), "\u{221E}");
        assert_eq!(badge_text(999), badge_text(100));
        assert_eq!(badge_text(-4), "-4");
    }

    #[test]
    fn region_anchors_bottom_right() {
        let region = badge_region(SizePx::square(36)).unwrap();
        assert!((region.width() - 25.2).abs() < 1e-4);
        assert!((region.height() - 25.2).abs() < 1e-4);
        assert!((region.right() - 35.0).abs() < 1e-4);
        assert!((region.bottom() - 35.0).abs() < 1e-4);

        let wide = badge_region(SizePx::new(20, 10)).unwrap();
        assert!((wide.width() - 14.0).abs() < 1e-4);
        assert!((wide.height() - 7.0).abs() < 1e-4);

        assert!(badge_region(SizePx::new(0, 16)).is_none());
    }

    #[test]
    fn count_badge_fills_circle() {
        let size = SizePx::square(36);
        let mut pixmap = new_canvas(size).unwrap();
        draw_count_badge(&mut pixmap, size, 3, &offline_fonts(), &BadgePalette::default());

        let img = pixmap_to_rgba_image(&pixmap);
        assert_eq!(img.get_pixel(22, 22).0, [178, 225, 102, 255]);
        // Outside the circle, in the top-left corner.
        assert_eq!(img.get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn win_badge_is_round_with_gradient() {
        let badge = render_win_badge(5, &offline_fonts(), &BadgePalette::default(), false);
        assert_eq!(badge.dimensions(), SizePx::square(48));

        // Corners lie outside the circle.
        assert_eq!(badge.data.get_pixel(0, 0)[3], 0);
        assert_eq!(badge.data.get_pixel(47, 47)[3], 0);

        let top = badge.data.get_pixel(24, 3);
        let bottom = badge.data.get_pixel(24, 44);
        assert_eq!(top[3], 255);
        assert!(top[0] > bottom[0], "gradient should darken downward");
        assert!(top[0] > top[1], "badge background is pink");
    }

    #[test]
    fn count_badge_draws_its_label() {
        let fonts = FontContext::new(&bundled_font());
        let size = SizePx::square(36);
        let draw = |count| {
            let mut pixmap = new_canvas(size).unwrap();
            draw_count_badge(&mut pixmap, size, count, &fonts, &BadgePalette::default());
            pixmap_to_rgba_image(&pixmap)
        };

        let blank_label = {
            let mut pixmap = new_canvas(size).unwrap();
            draw_count_badge(&mut pixmap, size, 3, &offline_fonts(), &BadgePalette::default());
            pixmap_to_rgba_image(&pixmap)
        };
        assert_ne!(draw(3), blank_label);
        assert_ne!(draw(3), draw(5));
        assert_ne!(draw(99), draw(100));
        assert_eq!(draw(100), draw(999));
    }

    #[test]
    fn win_badge_prints_the_count() {
        let fonts = FontContext::new(&bundled_font());
        let colors = BadgePalette::default();

        let three = render_win_badge(3, &fonts, &colors, false);
        assert_ne!(three, render_win_badge(3, &offline_fonts(), &colors, false));
        assert_ne!(three, render_win_badge(8, &fonts, &colors, false));
    }

    #[test]
    fn rounded_rect_clamps_radius() {
        let rect = Rect::from_xywh(0.0, 0.0, 10.0, 10.0).unwrap();
        let path = rounded_rect(rect, 40.0).unwrap();
        let bounds = path.bounds();
        assert!((bounds.width() - 10.0).abs() < 1e-3);
        assert!((bounds.height() - 10.0).abs() < 1e-3);
    }
}
