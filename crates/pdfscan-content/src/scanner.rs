//! Content scanner: drives a sequence of decoded content stream operators
//! through the graphics state and the text layout engine.
//!
//! Handles the text state and positioning operators, `cm`, `q`/`Q`, the
//! non-stroking color, and the four show-text operators. Operators that fail
//! are skipped with a warning unless [`ExtractOptions::strict_mode`] is set.

use std::collections::HashMap;
use std::sync::Arc;

use pdfscan_core::{Color, Ctm, ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode};

use crate::error::ContentError;
use crate::font::{FontMetricsProvider, load_simple_font, resolve_object};
use crate::graphics_state::{ContentContext, GraphicsState};
use crate::scanning::{TextCollector, TextScanner};
use crate::surface::RenderSurface;
use crate::text_layout::{ShowText, scan_text, show_text};

/// A decoded content stream operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `BT`
    BeginText,
    /// `ET`
    EndText,
    /// `Tf`: font resource name and size.
    SetFont { name: String, size: f64 },
    /// `Tc`
    SetCharSpace(f64),
    /// `Tw`
    SetWordSpace(f64),
    /// `Tz`
    SetScale(f64),
    /// `TL`
    SetLead(f64),
    /// `Ts`
    SetRise(f64),
    /// `Tm`
    SetTextMatrix(Ctm),
    /// `Td`
    TranslateTextRelative { tx: f64, ty: f64 },
    /// `TD`
    TranslateTextRelativeSetLead { tx: f64, ty: f64 },
    /// `T*`
    TranslateTextToNextLine,
    /// `cm`
    ModifyCtm(Ctm),
    /// `g`, `rg`, `k`
    SetFillColor(Color),
    /// `q`
    Save,
    /// `Q`
    Restore,
    /// `Tj`, `TJ`, `'`, `"`
    ShowText(ShowText),
}

impl Operation {
    /// Content stream operator name, for diagnostics.
    pub fn operator(&self) -> &'static str {
        match self {
            Operation::BeginText => "BT",
            Operation::EndText => "ET",
            Operation::SetFont { .. } => "Tf",
            Operation::SetCharSpace(_) => "Tc",
            Operation::SetWordSpace(_) => "Tw",
            Operation::SetScale(_) => "Tz",
            Operation::SetLead(_) => "TL",
            Operation::SetRise(_) => "Ts",
            Operation::SetTextMatrix(_) => "Tm",
            Operation::TranslateTextRelative { .. } => "Td",
            Operation::TranslateTextRelativeSetLead { .. } => "TD",
            Operation::TranslateTextToNextLine => "T*",
            Operation::ModifyCtm(_) => "cm",
            Operation::SetFillColor(Color::Gray(_)) => "g",
            Operation::SetFillColor(Color::Rgb(..)) => "rg",
            Operation::SetFillColor(Color::Cmyk(..)) => "k",
            Operation::Save => "q",
            Operation::Restore => "Q",
            Operation::ShowText(op) => op.operator(),
        }
    }
}

/// Where show-text operators send their output.
enum Mode<'a> {
    Render(Option<&'a mut dyn RenderSurface>),
    Extract(&'a mut dyn TextScanner),
}

/// Interpreter for one page or form's content.
///
/// Owns the graphics state, the `q`/`Q` stack, and the font resources the
/// `Tf` operator resolves names against. State carries over between calls to
/// [`render`](Self::render) and [`extract`](Self::extract), so a content
/// stream may be fed in pieces.
pub struct ContentScanner {
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    /// `q` operators ignored for exceeding the stack limit, still awaiting
    /// their `Q`.
    ignored_saves: usize,
    fonts: HashMap<String, Arc<dyn FontMetricsProvider>>,
    options: ExtractOptions,
}

impl Default for ContentScanner {
    fn default() -> Self {
        Self::new(ContentContext::default(), ExtractOptions::default())
    }
}

impl ContentScanner {
    pub fn new(context: ContentContext, options: ExtractOptions) -> Self {
        Self {
            state: GraphicsState::new(context),
            stack: Vec::new(),
            ignored_saves: 0,
            fonts: HashMap::new(),
            options,
        }
    }

    /// Register a font resource under the name `Tf` refers to it by.
    pub fn add_font(&mut self, name: impl Into<String>, font: Arc<dyn FontMetricsProvider>) {
        self.fonts.insert(name.into(), font);
    }

    /// Load every simple font in a `/Resources` dictionary's `/Font`
    /// subdictionary. Returns the number of fonts registered.
    pub fn load_fonts(&mut self, doc: &lopdf::Document, resources: &lopdf::Dictionary) -> usize {
        let Some(font_dict) = resources
            .get(b"Font")
            .ok()
            .map(|obj| resolve_object(doc, obj))
            .and_then(|obj| obj.as_dict().ok())
        else {
            return 0;
        };

        let mut loaded = 0;
        for (name, obj) in font_dict.iter() {
            let Ok(dict) = resolve_object(doc, obj).as_dict() else {
                continue;
            };
            let name = String::from_utf8_lossy(name).into_owned();
            self.add_font(name, Arc::new(load_simple_font(doc, dict)));
            loaded += 1;
        }
        loaded
    }

    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Current `q` nesting depth.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Run `ops` in rendering mode, painting glyphs on `surface` when given.
    pub fn render(
        &mut self,
        ops: &[Operation],
        surface: Option<&mut dyn RenderSurface>,
    ) -> Result<ExtractResult<()>, ContentError> {
        self.run(ops, Mode::Render(surface))
    }

    /// Run `ops` in extraction mode, reporting every shown character to
    /// `sink`. Text positions still advance from one operator to the next.
    pub fn extract(
        &mut self,
        ops: &[Operation],
        sink: &mut dyn TextScanner,
    ) -> Result<ExtractResult<()>, ContentError> {
        self.run(ops, Mode::Extract(sink))
    }

    /// Extract into a fresh [`TextCollector`].
    pub fn collect_text(
        &mut self,
        ops: &[Operation],
    ) -> Result<ExtractResult<TextCollector>, ContentError> {
        let mut collector = TextCollector::new();
        let result = self.extract(ops, &mut collector)?;
        Ok(result.map(|()| collector))
    }

    fn run(&mut self, ops: &[Operation], mut mode: Mode<'_>) -> Result<ExtractResult<()>, ContentError> {
        let mut warnings = Vec::new();

        for (index, op) in ops.iter().enumerate() {
            if index >= self.options.max_operators {
                let description = format!(
                    "operator limit of {} reached, {} operators not processed",
                    self.options.max_operators,
                    ops.len() - index
                );
                if self.options.strict_mode {
                    return Err(ContentError::ResourceLimit(description));
                }
                self.warn(
                    &mut warnings,
                    ExtractWarning::with_code(ExtractWarningCode::ResourceLimitReached, description)
                        .at_operator(index),
                );
                break;
            }

            if let Err(err) = self.apply(index, op, &mut mode, &mut warnings) {
                if self.options.strict_mode {
                    return Err(err);
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(index, operator = op.operator(), error = %err, "operator skipped");
                self.warn(&mut warnings, ExtractWarning::from(err).at_operator(index));
            }
        }

        Ok(ExtractResult::with_warnings((), warnings))
    }

    fn apply(
        &mut self,
        index: usize,
        op: &Operation,
        mode: &mut Mode<'_>,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<(), ContentError> {
        let state = &mut self.state;
        match op {
            Operation::BeginText => state.begin_text(),
            Operation::EndText => state.end_text(),
            Operation::SetFont { name, size } => {
                let font = self
                    .fonts
                    .get(name)
                    .ok_or_else(|| ContentError::UnknownFont(name.clone()))?;
                state.set_font(Arc::clone(font), *size);
            }
            Operation::SetCharSpace(v) => state.set_char_space(*v),
            Operation::SetWordSpace(v) => state.set_word_space(*v),
            Operation::SetScale(v) => state.set_scale(*v),
            Operation::SetLead(v) => state.set_lead(*v),
            Operation::SetRise(v) => state.set_rise(*v),
            Operation::SetTextMatrix(m) => state.set_text_matrix(*m),
            Operation::TranslateTextRelative { tx, ty } => state.translate_text_relative(*tx, *ty),
            Operation::TranslateTextRelativeSetLead { tx, ty } => {
                state.translate_text_relative_set_lead(*tx, *ty)
            }
            Operation::TranslateTextToNextLine => state.translate_text_to_next_line(),
            Operation::ModifyCtm(m) => state.concat_ctm(*m),
            Operation::SetFillColor(color) => state.fill_color = *color,
            Operation::Save => self.save(index, warnings),
            Operation::Restore => self.restore(index, warnings),
            Operation::ShowText(show) => match mode {
                Mode::Render(surface) => {
                    let surface = surface.as_mut().map(|s| &mut **s as &mut dyn RenderSurface);
                    show_text(state, show, surface)?;
                }
                Mode::Extract(sink) => {
                    scan_text(state, show, &mut **sink)?;
                    show_text(state, show, None)?;
                }
            },
        }
        Ok(())
    }

    fn save(&mut self, index: usize, warnings: &mut Vec<ExtractWarning>) {
        if self.stack.len() >= self.options.max_stack_depth {
            self.ignored_saves += 1;
            #[cfg(feature = "tracing")]
            tracing::warn!(depth = self.stack.len(), "graphics state stack limit reached");
            self.warn(
                warnings,
                ExtractWarning::with_code(
                    ExtractWarningCode::ResourceLimitReached,
                    format!(
                        "q nesting deeper than {}, state not saved",
                        self.options.max_stack_depth
                    ),
                )
                .at_operator(index),
            );
            return;
        }
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self, index: usize, warnings: &mut Vec<ExtractWarning>) {
        if self.ignored_saves > 0 {
            self.ignored_saves -= 1;
            return;
        }
        match self.stack.pop() {
            Some(saved) => self.state = saved,
            None => self.warn(
                warnings,
                ExtractWarning::with_code(
                    ExtractWarningCode::UnbalancedState,
                    "Q without matching q",
                )
                .at_operator(index),
            ),
        }
    }

    fn warn(&self, warnings: &mut Vec<ExtractWarning>, warning: ExtractWarning) {
        if self.options.collect_warnings {
            warnings.push(warning);
        }
    }
}
