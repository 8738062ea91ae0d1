//! Single-line text drawing for badge labels.
//!
//! Text goes through usvg's layout engine: the label is wrapped in a tiny
//! SVG document, converted to outlines with the fonts in [`FontContext`],
//! and composited onto the target pixmap. A label whose font cannot be
//! resolved simply draws nothing.

use std::sync::Arc;

use log::{debug, warn};
use palette::Srgb;
use resvg::tiny_skia::{Pixmap, Rect, Transform};
use resvg::usvg::fontdb::{Database, FaceInfo, Family};
use resvg::usvg::{Options, Tree};

use crate::config::FontDescriptor;

const GENERIC_FAMILIES: [&str; 5] = ["serif", "sans-serif", "cursive", "fantasy", "monospace"];

/// How a label is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub pixel_size: f32,
    pub bold: bool,
    pub color: Srgb<u8>,
}

/// The font database used for labels and vector assets.
pub struct FontContext {
    fontdb: Arc<Database>,
    family: String,
}

impl FontContext {
    /// Builds a font database from the descriptor.
    ///
    /// System fonts are loaded when the descriptor asks for them. Extra font
    /// files that fail to load are logged and skipped. The generic `serif`
    /// and `sans-serif` families are pointed at a face that is actually in
    /// the database: the configured family if present, otherwise the
    /// database's own sans-serif choice, otherwise the first sans face or
    /// any face at all.
    pub fn new(font: &FontDescriptor) -> Self {
        let mut db = Database::new();
        if font.load_system_fonts {
            db.load_system_fonts();
        }
        for file in &font.font_files {
            if let Err(err) = db.load_font_file(file) {
                warn!("skipping font file {}: {}", file.display(), err);
            }
        }

        match fallback_family(&db, &font.family) {
            Some(fallback) => {
                debug!("font database holds {} faces, generic families use {fallback:?}", db.len());
                db.set_sans_serif_family(fallback.clone());
                db.set_serif_family(fallback);
            }
            None => warn!("no usable font for {:?}, labels will not be drawn", font.family),
        }

        Self {
            fontdb: Arc::new(db),
            family: font.family.clone(),
        }
    }

    /// Parsing options sharing this font database.
    pub fn options(&self) -> Options<'_> {
        let mut options = Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        options.font_family = self.family.clone();
        options
    }

    /// Draws `text` centered on `rect`.
    pub fn draw_text_centered(&self, pixmap: &mut Pixmap, rect: Rect, text: &str, style: TextStyle) {
        if text.is_empty() || style.pixel_size <= 0.0 {
            return;
        }

        let markup = self.label_markup(pixmap.width(), pixmap.height(), rect, text, style);
        match Tree::from_str(&markup, &self.options()) {
            Ok(tree) => resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut()),
            Err(err) => warn!("failed to lay out label {text:?}: {err}"),
        }
    }

    fn label_markup(&self, width: u32, height: u32, rect: Rect, text: &str, style: TextStyle) -> String {
        let cx = rect.x() + rect.width() / 2.0;
        let cy = rect.y() + rect.height() / 2.0;
        let weight = if style.bold { "bold" } else { "normal" };
        let Srgb { red, green, blue, .. } = style.color;

        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
                r#"<text x="{cx}" y="{cy}" font-family="{family}" font-size="{size}" "#,
                r##"font-weight="{weight}" fill="#{r:02x}{g:02x}{b:02x}" "##,
                r#"text-anchor="middle" dominant-baseline="central">{text}</text></svg>"#,
            ),
            w = width,
            h = height,
            cx = cx,
            cy = cy,
            family = font_family_list(&self.family),
            size = style.pixel_size,
            weight = weight,
            r = red,
            g = green,
            b = blue,
            text = escape_xml(text),
        )
    }
}

fn is_generic(family: &str) -> bool {
    GENERIC_FAMILIES.iter().any(|g| g.eq_ignore_ascii_case(family))
}

// Generic keywords must stay unquoted or usvg looks them up as face names.
fn font_family_list(family: &str) -> String {
    if is_generic(family) {
        family.to_ascii_lowercase()
    } else {
        format!("'{}', sans-serif", escape_xml(family))
    }
}

fn fallback_family(db: &Database, configured: &str) -> Option<String> {
    let has_family = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };

    if !is_generic(configured) && has_family(configured) {
        return Some(configured.to_string());
    }
    let sans = db.family_name(&Family::SansSerif).to_string();
    if has_family(&sans) {
        return Some(sans);
    }

    db.faces()
        .filter_map(primary_family)
        .find(|name| name.contains("Sans"))
        .or_else(|| db.faces().filter_map(primary_family).next())
        .cloned()
}

fn primary_family(face: &FaceInfo) -> Option<&String> {
    face.families.first().map(|(name, _)| name)
}

/// Escapes the five XML special characters for use in text and attributes.
fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Bundled public-domain font so label tests do not depend on installed fonts.
#[cfg(test)]
pub(crate) fn bundled_font() -> FontDescriptor {
    FontDescriptor {
        family: "Tuffy".into(),
        load_system_fonts: false,
        font_files: vec![concat!(env!("CARGO_MANIFEST_DIR"), "/assets/fonts/Tuffy.ttf").into()],
        ..FontDescriptor::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_fonts() -> FontContext {
        FontContext::new(&FontDescriptor {
            load_system_fonts: false,
            ..FontDescriptor::default()
        })
    }

    fn black(pixel_size: f32) -> TextStyle {
        TextStyle {
            pixel_size,
            bold: false,
            color: Srgb::new(0, 0, 0),
        }
    }

    #[test]
    fn markup_centers_on_rect() {
        let fonts = offline_fonts();
        let rect = Rect::from_xywh(10.0, 20.0, 30.0, 40.0).unwrap();
        let markup = fonts.label_markup(64, 64, rect, "7", black(12.0));

        assert!(markup.contains(r#"x="25""#));
        assert!(markup.contains(r#"y="40""#));
        assert!(markup.contains(r#"font-size="12""#));
        assert!(markup.contains(r##"fill="#000000""##));
        assert!(markup.contains(r#"font-weight="normal""#));
        assert!(markup.contains(">7</text>"));
    }

    #[test]
    fn markup_escapes_family_and_text() {
        let fonts = FontContext::new(&FontDescriptor {
            family: "Fira & Friends".into(),
            load_system_fonts: false,
            ..FontDescriptor::default()
        });
        let rect = Rect::from_xywh(0.0, 0.0, 8.0, 8.0).unwrap();
        let markup = fonts.label_markup(8, 8, rect, "<1>", black(4.0));

        assert!(markup.contains("Fira &amp; Friends"));
        assert!(markup.contains("&lt;1&gt;"));
        assert!(Tree::from_str(&markup, &fonts.options()).is_ok());
    }

    #[test]
    fn missing_fonts_draw_nothing() {
        let fonts = offline_fonts();
        let mut pixmap = Pixmap::new(16, 16).unwrap();
        let rect = Rect::from_xywh(0.0, 0.0, 16.0, 16.0).unwrap();

        fonts.draw_text_centered(&mut pixmap, rect, "42", black(10.0));
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn empty_label_is_skipped() {
        let fonts = offline_fonts();
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let rect = Rect::from_xywh(0.0, 0.0, 4.0, 4.0).unwrap();

        fonts.draw_text_centered(&mut pixmap, rect, "", black(10.0));
        fonts.draw_text_centered(&mut pixmap, rect, "1", black(0.0));
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 0));
    }

    fn ink(pixmap: &Pixmap) -> usize {
        pixmap.pixels().iter().filter(|p| p.alpha() > 0).count()
    }

    fn draw(fonts: &FontContext, text: &str) -> Pixmap {
        let mut pixmap = Pixmap::new(32, 32).unwrap();
        let rect = Rect::from_xywh(0.0, 0.0, 32.0, 32.0).unwrap();
        fonts.draw_text_centered(&mut pixmap, rect, text, black(20.0));
        pixmap
    }

    #[test]
    fn generic_family_is_not_quoted() {
        assert_eq!(font_family_list("sans-serif"), "sans-serif");
        assert_eq!(font_family_list("Monospace"), "monospace");
        assert_eq!(font_family_list("Tuffy"), "'Tuffy', sans-serif");
    }

    #[test]
    fn bundled_font_draws_labels() {
        let fonts = FontContext::new(&bundled_font());
        let three = draw(&fonts, "3");
        let five = draw(&fonts, "5");

        assert!(ink(&three) > 0);
        assert_ne!(three.data(), five.data());
    }

    #[test]
    fn sans_serif_falls_back_to_a_loaded_face() {
        let fonts = FontContext::new(&FontDescriptor {
            family: "sans-serif".into(),
            ..bundled_font()
        });
        assert_eq!(fonts.fontdb.family_name(&Family::SansSerif), "Tuffy");
        assert!(ink(&draw(&fonts, "42")) > 0);
    }

    #[test]
    fn unknown_family_falls_back_to_a_loaded_face() {
        let fonts = FontContext::new(&FontDescriptor {
            family: "No Such Family".into(),
            ..bundled_font()
        });
        assert!(ink(&draw(&fonts, "7")) > 0);
    }

    #[test]
    fn default_config_draws_labels_when_fonts_are_installed() {
        let fonts = FontContext::new(&FontDescriptor::default());
        if fonts.fontdb.is_empty() {
            return;
        }
        let three = draw(&fonts, "3");
        assert!(ink(&three) > 0);
        assert_ne!(three.data(), draw(&fonts, "5").data());
    }
}
