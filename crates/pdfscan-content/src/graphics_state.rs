//! Graphics state for one content stream scan.
//!
//! Tracks the CTM, the text matrix (Tm) and text line matrix (Tlm), the
//! active font and its size, and the text state parameters set by Tc, Tw,
//! Tz, TL, and Ts. Also implements the text positioning operators
//! (BT, Tm, Td, TD, T*) and `cm`.

use std::fmt;
use std::sync::Arc;

use pdfscan_core::{BBox, Color, Ctm};

use crate::font::FontMetricsProvider;

/// The content being scanned: page (or form) box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentContext {
    /// Page box in page-layout coordinates.
    pub page_box: BBox,
}

impl ContentContext {
    /// A context for a page of the given size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            page_box: BBox::new(0.0, 0.0, width, height),
        }
    }

    /// Height of the page box; used to flip y into top-left coordinates.
    pub fn height(&self) -> f64 {
        self.page_box.height()
    }
}

impl Default for ContentContext {
    /// US Letter.
    fn default() -> Self {
        Self::new(612.0, 792.0)
    }
}

/// Mutable graphics state record for a single scan pass.
///
/// Created once per page or form pass and mutated in place by successive
/// operators. Cloning deep-copies matrices and scalars while sharing the
/// font provider.
#[derive(Clone)]
pub struct GraphicsState {
    /// Character spacing (Tc). Extra space added after each glyph.
    pub char_space: f64,
    /// Word spacing (Tw). Extra space added after each space character.
    pub word_space: f64,
    /// Horizontal scaling (Tz) as a percentage, 100 = normal.
    pub scale: f64,
    /// Text leading (TL). Distance between baselines of consecutive lines.
    pub lead: f64,
    /// Text rise (Ts).
    pub rise: f64,
    /// Font size set by Tf.
    pub font_size: f64,
    /// Non-stroking color.
    pub fill_color: Color,
    font: Option<Arc<dyn FontMetricsProvider>>,
    ctm: Ctm,
    tm: Ctm,
    tlm: Ctm,
    context: ContentContext,
    in_text_object: bool,
}

impl fmt::Debug for GraphicsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsState")
            .field("font", &self.font.as_ref().map(|font| font.name().to_string()))
            .field("font_size", &self.font_size)
            .field("char_space", &self.char_space)
            .field("word_space", &self.word_space)
            .field("scale", &self.scale)
            .field("lead", &self.lead)
            .field("rise", &self.rise)
            .field("ctm", &self.ctm)
            .field("tm", &self.tm)
            .field("tlm", &self.tlm)
            .finish_non_exhaustive()
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new(ContentContext::default())
    }
}

impl GraphicsState {
    /// Create a state with PDF default values for the given content.
    pub fn new(context: ContentContext) -> Self {
        Self {
            char_space: 0.0,
            word_space: 0.0,
            scale: 100.0,
            lead: 0.0,
            rise: 0.0,
            font_size: 0.0,
            fill_color: Color::default(),
            font: None,
            ctm: Ctm::identity(),
            tm: Ctm::identity(),
            tlm: Ctm::identity(),
            context,
            in_text_object: false,
        }
    }

    pub fn context(&self) -> &ContentContext {
        &self.context
    }

    pub fn font(&self) -> Option<&Arc<dyn FontMetricsProvider>> {
        self.font.as_ref()
    }

    pub fn ctm(&self) -> &Ctm {
        &self.ctm
    }

    pub fn set_ctm(&mut self, ctm: Ctm) {
        self.ctm = ctm;
    }

    /// Current text matrix.
    pub fn tm(&self) -> &Ctm {
        &self.tm
    }

    pub fn set_tm(&mut self, tm: Ctm) {
        self.tm = tm;
    }

    /// Current text line matrix.
    pub fn tlm(&self) -> &Ctm {
        &self.tlm
    }

    pub fn set_tlm(&mut self, tlm: Ctm) {
        self.tlm = tlm;
    }

    /// Horizontal scaling as a fraction (1.0 = 100%).
    pub fn scale_fraction(&self) -> f64 {
        self.scale / 100.0
    }

    pub fn in_text_object(&self) -> bool {
        self.in_text_object
    }

    /// The text line matrix after a `T*` line advance, without mutating
    /// the state.
    pub fn next_line_matrix(&self) -> Ctm {
        Ctm::translation(0.0, -self.lead).concat(&self.tlm)
    }

    // --- cm operator ---

    /// `cm` operator: pre-concatenate a matrix with the CTM.
    pub fn concat_ctm(&mut self, m: Ctm) {
        self.ctm = m.concat(&self.ctm);
    }

    // --- BT / ET ---

    /// `BT` operator: reset Tm and Tlm to identity.
    pub fn begin_text(&mut self) {
        self.tm = Ctm::identity();
        self.tlm = Ctm::identity();
        self.in_text_object = true;
    }

    /// `ET` operator.
    pub fn end_text(&mut self) {
        self.in_text_object = false;
    }

    // --- Text state operators ---

    /// `Tf` operator: set the active font and size.
    pub fn set_font(&mut self, font: Arc<dyn FontMetricsProvider>, font_size: f64) {
        self.font = Some(font);
        self.font_size = font_size;
    }

    /// `Tc` operator.
    pub fn set_char_space(&mut self, spacing: f64) {
        self.char_space = spacing;
    }

    /// `Tw` operator.
    pub fn set_word_space(&mut self, spacing: f64) {
        self.word_space = spacing;
    }

    /// `Tz` operator: horizontal scaling percentage.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// `TL` operator.
    pub fn set_lead(&mut self, lead: f64) {
        self.lead = lead;
    }

    /// `Ts` operator.
    pub fn set_rise(&mut self, rise: f64) {
        self.rise = rise;
    }

    // --- Text positioning operators ---

    /// `Tm` operator: replace both the text matrix and the line matrix.
    pub fn set_text_matrix(&mut self, m: Ctm) {
        self.tm = m;
        self.tlm = m;
    }

    /// `Td` operator: move to the start of the next line, offset from the
    /// start of the current line.
    pub fn translate_text_relative(&mut self, tx: f64, ty: f64) {
        self.tlm = Ctm::translation(tx, ty).concat(&self.tlm);
        self.tm = self.tlm;
    }

    /// `TD` operator: set leading to `-ty`, then `Td`.
    pub fn translate_text_relative_set_lead(&mut self, tx: f64, ty: f64) {
        self.lead = -ty;
        self.translate_text_relative(tx, ty);
    }

    /// `T*` operator: equivalent to `0 -TL Td`.
    pub fn translate_text_to_next_line(&mut self) {
        self.tlm = self.next_line_matrix();
        self.tm = self.tlm;
    }
}
