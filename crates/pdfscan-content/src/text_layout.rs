//! Text-showing operators (Tj, TJ, ', ") for the content stream interpreter.
//!
//! Replays a show-text operator against a [`GraphicsState`], in one of two
//! modes:
//!
//! - **rendering** ([`show_text`]): glyphs are painted on an optional
//!   [`RenderSurface`] and the final text matrix is committed back into the
//!   state;
//! - **scanning** ([`scan_text`]): each character and its bounding box is
//!   reported to a [`TextScanner`], and the state is left untouched.
//!
//! Both modes share the same advance arithmetic, so the glyph positions seen
//! by a scanner are exactly those a subsequent render would use.

use pdfscan_core::{BBox, Ctm};

use crate::error::ContentError;
use crate::font::{FontMetricsProvider, WritingMode};
use crate::glyph_raster::{GlyphTarget, render_glyph};
use crate::graphics_state::GraphicsState;
use crate::scanning::TextScanner;
use crate::surface::RenderSurface;

/// An element of a `TJ` array operand.
#[derive(Debug, Clone, PartialEq)]
pub enum TextElement {
    /// Font-encoded bytes to show.
    EncodedText(Vec<u8>),
    /// Displacement in thousandths of an em, applied against the writing
    /// direction: a positive value narrows the gap to the next glyph.
    Adjustment(f64),
}

/// A decoded show-text operator.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowText {
    /// `Tj`: show one string.
    Simple(Vec<u8>),
    /// `TJ`: show strings interleaved with position adjustments.
    WithAdjustments(Vec<TextElement>),
    /// `'` and `"`: move to the next line, optionally set word and character
    /// spacing, then show a string.
    NextLine {
        text: Vec<u8>,
        word_space: Option<f64>,
        char_space: Option<f64>,
    },
}

impl ShowText {
    /// `'` operator.
    pub fn next_line(text: impl Into<Vec<u8>>) -> Self {
        ShowText::NextLine {
            text: text.into(),
            word_space: None,
            char_space: None,
        }
    }

    /// `"` operator.
    pub fn next_line_with_spacing(text: impl Into<Vec<u8>>, word_space: f64, char_space: f64) -> Self {
        ShowText::NextLine {
            text: text.into(),
            word_space: Some(word_space),
            char_space: Some(char_space),
        }
    }

    /// Content stream operator this variant was decoded from.
    pub fn operator(&self) -> &'static str {
        match self {
            ShowText::Simple(_) => "Tj",
            ShowText::WithAdjustments(_) => "TJ",
            ShowText::NextLine {
                word_space: None,
                char_space: None,
                ..
            } => "'",
            ShowText::NextLine { .. } => "\"",
        }
    }

    fn validate(&self) -> Result<(), ContentError> {
        match self {
            ShowText::NextLine { text, .. } if text.is_empty() => Err(
                ContentError::MalformedOperand(format!("{} requires a text string", self.operator())),
            ),
            ShowText::NextLine {
                word_space,
                char_space,
                ..
            } if word_space.is_some_and(|v| !v.is_finite())
                || char_space.is_some_and(|v| !v.is_finite()) =>
            {
                Err(ContentError::MalformedOperand(format!(
                    "{} spacing operands must be finite",
                    self.operator()
                )))
            }
            ShowText::WithAdjustments(elements) => {
                for element in elements {
                    if let TextElement::Adjustment(n) = element {
                        if !n.is_finite() {
                            return Err(ContentError::MalformedOperand(format!(
                                "TJ adjustment {n} is not finite"
                            )));
                        }
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn pieces(&self) -> Vec<Piece<'_>> {
        match self {
            ShowText::Simple(text) | ShowText::NextLine { text, .. } => vec![Piece::Text(text)],
            ShowText::WithAdjustments(elements) => elements
                .iter()
                .map(|e| match e {
                    TextElement::EncodedText(bytes) => Piece::Text(bytes),
                    TextElement::Adjustment(n) => Piece::Adjust(*n),
                })
                .collect(),
        }
    }
}

enum Piece<'a> {
    Text(&'a [u8]),
    Adjust(f64),
}

/// A character positioned by the layout loop.
#[derive(Debug, Clone, Copy)]
struct PlacedGlyph {
    ch: char,
    /// Advance width in text space, before spacing.
    width: f64,
    /// Text matrix at the glyph origin.
    tm: Ctm,
}

/// Result of a layout pass, to be committed in rendering mode.
struct LayoutOutcome {
    tm: Ctm,
    word_space: Option<f64>,
    char_space: Option<f64>,
}

/// Run the advance loop, calling `on_glyph` for each character before the
/// text matrix moves past it.
fn lay_out(
    state: &GraphicsState,
    op: &ShowText,
    mut on_glyph: impl FnMut(&dyn FontMetricsProvider, PlacedGlyph),
) -> Result<LayoutOutcome, ContentError> {
    let font = state.font().ok_or(ContentError::MissingFont)?;
    let mode = font.writing_mode();
    if mode != WritingMode::Horizontal {
        return Err(ContentError::UnsupportedLayoutMode { mode });
    }
    op.validate()?;

    let scale = state.scale_fraction();
    let scaled_factor = font.scaling_factor(state.font_size) * scale;
    let mut word_space = state.word_space * scale;
    let mut char_space = state.char_space * scale;
    let mut tm = *state.tm();
    let mut overrides = (None, None);

    if let ShowText::NextLine {
        word_space: new_word_space,
        char_space: new_char_space,
        ..
    } = op
    {
        if let Some(ws) = *new_word_space {
            word_space = ws * scale;
        }
        if let Some(cs) = *new_char_space {
            char_space = cs * scale;
        }
        overrides = (*new_word_space, *new_char_space);
        tm = state.next_line_matrix();
    }

    for piece in op.pieces() {
        match piece {
            Piece::Text(bytes) => {
                for ch in font.decode(bytes).chars() {
                    let width = font
                        .width(ch)
                        .ok_or_else(|| ContentError::MissingGlyphMetrics {
                            ch,
                            font: font.name().to_string(),
                        })?
                        * scaled_factor;
                    on_glyph(font.as_ref(), PlacedGlyph { ch, width, tm });

                    // Horizontal writing only: the glyph displacement plus
                    // spacing moves the text matrix along x.
                    let spacing = if ch == ' ' { word_space } else { 0.0 };
                    tm.translate(width + char_space + spacing, 0.0);
                }
            }
            Piece::Adjust(n) => tm.translate(-n * scaled_factor, 0.0),
        }
    }

    Ok(LayoutOutcome {
        tm,
        word_space: overrides.0,
        char_space: overrides.1,
    })
}

/// Show text in rendering mode.
///
/// Paints outline-capable glyphs on `surface` (when given), then commits the
/// final text matrix into `state`. For next-line variants the line matrix is
/// set to the same final matrix and any spacing overrides are persisted.
///
/// On error the state is left unchanged; glyphs painted before the failing
/// character remain on the surface.
pub fn show_text(
    state: &mut GraphicsState,
    op: &ShowText,
    mut surface: Option<&mut dyn RenderSurface>,
) -> Result<(), ContentError> {
    let font_size = state.font_size;
    let outcome = lay_out(state, op, |font, glyph| {
        let Some(surface) = surface.as_deref_mut() else {
            return;
        };
        let target = GlyphTarget {
            width: glyph.width,
            height: font.height(glyph.ch, font_size),
        };
        let _fill = render_glyph(font, glyph.ch, target, &glyph.tm, surface);
        #[cfg(feature = "tracing")]
        tracing::trace!(ch = %glyph.ch, fill = ?_fill, "glyph rendered");
    })?;

    state.set_tm(outcome.tm);
    if let ShowText::NextLine { .. } = op {
        state.set_tlm(outcome.tm);
        if let Some(ws) = outcome.word_space {
            state.set_word_space(ws);
        }
        if let Some(cs) = outcome.char_space {
            state.set_char_space(cs);
        }
    }
    Ok(())
}

/// Show text in scanning mode: report each character with its bounding box
/// in top-left page coordinates, without mutating `state`.
///
/// Characters before a failing one have already been reported when an
/// error is returned.
pub fn scan_text(
    state: &GraphicsState,
    op: &ShowText,
    sink: &mut dyn TextScanner,
) -> Result<(), ContentError> {
    let ctm = *state.ctm();
    let context_height = state.context().height();
    let font_size = state.font_size;

    lay_out(state, op, |font, glyph| {
        let trm = glyph.tm.concat(&ctm);
        let bbox = BBox::from_origin_size(
            trm.translate_x(),
            context_height - trm.translate_y() - font.ascent(font_size) * trm.scale_y(),
            glyph.width * trm.scale_x(),
            font.height(glyph.ch, font_size) * trm.scale_y(),
        );
        sink.scan_char(glyph.ch, bbox);
    })?;
    Ok(())
}

/// Execute a show-text operator: scanning mode when `sink` is given,
/// rendering mode otherwise.
pub fn execute(
    state: &mut GraphicsState,
    op: &ShowText,
    sink: Option<&mut dyn TextScanner>,
    surface: Option<&mut dyn RenderSurface>,
) -> Result<(), ContentError> {
    #[cfg(feature = "tracing")]
    tracing::trace!(
        operator = op.operator(),
        scanning = sink.is_some(),
        "show text"
    );
    match sink {
        Some(sink) => scan_text(state, op, sink),
        None => show_text(state, op, surface),
    }
}
