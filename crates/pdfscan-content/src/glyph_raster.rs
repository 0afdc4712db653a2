//! Glyph rasterizer: fills glyph outlines onto a render surface.
//!
//! The outline is rescaled so its visual bounds match the glyph's advance
//! width and height, flipped from its y-down outline space into y-up text
//! space, placed through the text matrix, and filled. Fonts without outline capability are not
//! painted; [`render_glyph`] reports that explicitly instead of drawing.

use pdfscan_core::{Color, Ctm, Path};

use crate::font::FontMetricsProvider;
use crate::surface::RenderSurface;

/// Color used for every glyph fill, regardless of the graphics state's
/// fill color.
pub const GLYPH_FILL_COLOR: Color = Color::Gray(0.0);

/// Size a glyph outline is rescaled to, in text space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphTarget {
    /// Advance width of the glyph.
    pub width: f64,
    /// Glyph height.
    pub height: f64,
}

/// Outcome of rendering one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlyphFill {
    /// The outline was filled on the surface.
    Filled,
    /// The font exposes no outlines; nothing was drawn.
    NoOutlineSupport,
    /// The font supports outlines but has none for this character.
    MissingOutline,
    /// The outline has zero width or height and cannot be rescaled.
    DegenerateOutline,
}

/// Render `ch` from `font` onto `surface` at the position given by `tm`.
pub fn render_glyph(
    font: &dyn FontMetricsProvider,
    ch: char,
    target: GlyphTarget,
    tm: &Ctm,
    surface: &mut dyn RenderSurface,
) -> GlyphFill {
    if !font.supports_outline() {
        return GlyphFill::NoOutlineSupport;
    }
    match font.outline(ch) {
        Some(outline) => fill_glyph(&outline, target, tm, surface),
        None => GlyphFill::MissingOutline,
    }
}

/// Rescale `outline` to `target`, map it through `tm`, and fill it.
pub fn fill_glyph(
    outline: &Path,
    target: GlyphTarget,
    tm: &Ctm,
    surface: &mut dyn RenderSurface,
) -> GlyphFill {
    let Some(bounds) = outline.bounds() else {
        return GlyphFill::DegenerateOutline;
    };
    let (visual_width, visual_height) = (bounds.width(), bounds.height());
    if visual_width.abs() < f64::EPSILON || visual_height.abs() < f64::EPSILON {
        #[cfg(feature = "tracing")]
        tracing::warn!(visual_width, visual_height, "degenerate glyph outline bounds");
        return GlyphFill::DegenerateOutline;
    }

    let width_ratio = target.width / visual_width;
    let height_ratio = -target.height / visual_height;
    let glyph_to_text = Ctm::scaling(width_ratio, height_ratio).concat(tm);

    surface.fill(&outline.transformed(&glyph_to_text), GLYPH_FILL_COLOR);
    GlyphFill::Filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{OutlineFont, SimpleFont};
    use crate::surface::PathRecorder;
    use pdfscan_core::{PathSegment, Point};

    fn assert_point(p: Point, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
            "expected ({x}, {y}), got ({}, {})",
            p.x,
            p.y
        );
    }

    /// Square sitting on the baseline, y-down.
    fn unit_square(size: f64) -> Path {
        let mut path = Path::new();
        path.rectangle(0.0, -size, size, size);
        path
    }

    #[test]
    fn fill_rescales_to_target_and_flips() {
        let mut surface = PathRecorder::new();
        let target = GlyphTarget {
            width: 7.2,
            height: 12.0,
        };
        let result = fill_glyph(&unit_square(500.0), target, &Ctm::identity(), &mut surface);
        assert_eq!(result, GlyphFill::Filled);

        let fills = surface.fills();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].color, GLYPH_FILL_COLOR);
        let segs = &fills[0].path.segments;
        let PathSegment::MoveTo(top_left) = segs[0] else {
            panic!("expected MoveTo, got {:?}", segs[0]);
        };
        let PathSegment::LineTo(bottom_right) = segs[2] else {
            panic!("expected LineTo, got {:?}", segs[2]);
        };
        // the top edge lands above the baseline
        assert_point(top_left, 0.0, 12.0);
        assert_point(bottom_right, 7.2, 0.0);
    }

    #[test]
    fn fill_places_glyph_through_text_matrix() {
        let mut surface = PathRecorder::new();
        let tm = Ctm::translation(100.0, 700.0);
        let target = GlyphTarget {
            width: 10.0,
            height: 10.0,
        };
        fill_glyph(&unit_square(1000.0), target, &tm, &mut surface);

        let PathSegment::MoveTo(top_left) = surface.fills()[0].path.segments[0] else {
            panic!("expected MoveTo");
        };
        assert_point(top_left, 100.0, 710.0);
        let PathSegment::LineTo(baseline_corner) = surface.fills()[0].path.segments[2] else {
            panic!("expected LineTo");
        };
        assert_point(baseline_corner, 110.0, 700.0);
    }

    #[test]
    fn fill_color_ignores_any_other_color() {
        let mut surface = PathRecorder::new();
        let target = GlyphTarget {
            width: 1.0,
            height: 1.0,
        };
        fill_glyph(&unit_square(1.0), target, &Ctm::identity(), &mut surface);
        assert_eq!(surface.fills()[0].color, Color::black());
    }

    #[test]
    fn degenerate_outlines_are_not_filled() {
        let mut surface = PathRecorder::new();
        let target = GlyphTarget {
            width: 1.0,
            height: 1.0,
        };
        let mut flat = Path::new();
        flat.move_to(0.0, 0.0).line_to(10.0, 0.0);

        assert_eq!(
            fill_glyph(&flat, target, &Ctm::identity(), &mut surface),
            GlyphFill::DegenerateOutline
        );
        assert_eq!(
            fill_glyph(&Path::new(), target, &Ctm::identity(), &mut surface),
            GlyphFill::DegenerateOutline
        );
        assert!(surface.fills().is_empty());
    }

    #[test]
    fn render_glyph_without_outline_support_is_noop() {
        let mut surface = PathRecorder::new();
        let font = SimpleFont::from_char_widths("F", &[('A', 600.0)]);
        let target = GlyphTarget {
            width: 7.2,
            height: 12.0,
        };
        let result = render_glyph(&font, 'A', target, &Ctm::identity(), &mut surface);
        assert_eq!(result, GlyphFill::NoOutlineSupport);
        assert!(surface.fills().is_empty());
    }

    #[test]
    fn render_glyph_with_outline() {
        let mut surface = PathRecorder::new();
        let font = OutlineFont::new(SimpleFont::from_char_widths("F", &[('A', 600.0)]))
            .with_outline('A', unit_square(700.0));
        let target = GlyphTarget {
            width: 7.2,
            height: 12.0,
        };
        assert_eq!(
            render_glyph(&font, 'A', target, &Ctm::identity(), &mut surface),
            GlyphFill::Filled
        );
        assert_eq!(
            render_glyph(&font, 'B', target, &Ctm::identity(), &mut surface),
            GlyphFill::MissingOutline
        );
        assert_eq!(surface.fills().len(), 1);
    }
}
