//! Glyph icon rasterization.
//!
//! Glyph descriptors are resolved to embeddable image references by drawing
//! the glyph onto an offscreen raster surface: an SVG document (optional
//! background rect plus centered text) is rasterized with resvg into a
//! `tiny_skia` pixmap, PNG-encoded, and wrapped in a `data:` URL.
//!
//! Rendering is best-effort: every failure path returns `None` and the
//! caller skips that icon frame.

use std::sync::Arc;
use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use resvg::usvg;

use crate::types::GlyphIcon;

/// Fraction of the canvas size used as the glyph font size.
const GLYPH_FONT_SCALE: f32 = 0.7;

// ============================================================================
// IconRenderer
// ============================================================================

/// Resolves a glyph descriptor to an embeddable image reference.
pub trait IconRenderer: Send + Sync {
    /// Renders the glyph, returning a `data:` URL, or `None` when no
    /// rendering surface is available.
    fn render_glyph(&self, icon: &GlyphIcon) -> Option<String>;
}

// ============================================================================
// RasterGlyphRenderer
// ============================================================================

/// Default [`IconRenderer`] backed by resvg and a `tiny_skia` pixmap.
pub struct RasterGlyphRenderer {
    /// System font database, loaded once and shared across renders.
    fontdb: Arc<usvg::fontdb::Database>,
}

impl RasterGlyphRenderer {
    /// Creates a renderer, loading the system font database.
    #[must_use]
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self {
            fontdb: Arc::new(fontdb),
        }
    }
}

impl Default for RasterGlyphRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RasterGlyphRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterGlyphRenderer")
            .field("fonts", &self.fontdb.len())
            .finish()
    }
}

impl IconRenderer for RasterGlyphRenderer {
    fn render_glyph(&self, icon: &GlyphIcon) -> Option<String> {
        let size = icon.effective_size();
        if size == 0 || icon.glyph.is_empty() {
            return None;
        }

        let svg = glyph_svg(&icon.glyph, icon.background_color.as_deref(), size);
        let mut options = usvg::Options::default();
        options.fontdb = self.fontdb.clone();
        let tree = usvg::Tree::from_data(svg.as_bytes(), &options).ok()?;

        let mut pixmap = tiny_skia::Pixmap::new(size, size)?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        let png = pixmap.encode_png().ok()?;
        Some(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

/// Builds the SVG document for one glyph frame.
fn glyph_svg(glyph: &str, background: Option<&str>, size: u32) -> String {
    let font_size = (size as f32 * GLYPH_FONT_SCALE).floor() as u32;
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );
    if let Some(color) = background.filter(|c| !c.eq_ignore_ascii_case("transparent")) {
        svg.push_str(&format!(
            r#"<rect width="{size}" height="{size}" fill="{}"/>"#,
            escape_xml(color)
        ));
    }
    svg.push_str(&format!(
        r#"<text x="50%" y="50%" text-anchor="middle" dominant-baseline="central" font-size="{font_size}">{}</text>"#,
        escape_xml(glyph)
    ));
    svg.push_str("</svg>");
    svg
}

/// Escapes text for embedding in SVG markup.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// ============================================================================
// MockIconRenderer
// ============================================================================

/// Recording [`IconRenderer`] for tests: returns `mock:<glyph>` references
/// and can be switched to fail every render.
#[derive(Debug, Default)]
pub struct MockIconRenderer {
    rendered: Mutex<Vec<GlyphIcon>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockIconRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When true, every render returns `None`.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Returns every glyph rendered so far.
    #[must_use]
    pub fn rendered(&self) -> Vec<GlyphIcon> {
        self.rendered.lock().unwrap().clone()
    }

    /// Returns the number of successful renders.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }
}

impl IconRenderer for MockIconRenderer {
    fn render_glyph(&self, icon: &GlyphIcon) -> Option<String> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return None;
        }
        self.rendered.lock().unwrap().push(icon.clone());
        Some(format!("mock:{}", icon.glyph))
    }
}

// ============================================================================
// Tests
// ============================================================================
