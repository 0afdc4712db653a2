//! Font metrics providers consumed by the text layout engine.
//!
//! [`FontMetricsProvider`] is the seam between the layout engine and font
//! resources: byte decoding, glyph widths, heights, ascent, and (for some
//! fonts) glyph outlines. [`SimpleFont`] implements it for single-byte fonts
//! described by `/Widths` and a `/FontDescriptor`; [`OutlineFont`] adds
//! vector glyph outlines on top of a `SimpleFont`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use pdfscan_core::Path;

/// Default ascent when not specified (750/1000 of text space).
const DEFAULT_ASCENT: f64 = 750.0;

/// Default descent when not specified (-250/1000 of text space).
const DEFAULT_DESCENT: f64 = -250.0;

/// Default character width when not specified (600/1000 of text space).
const DEFAULT_WIDTH: f64 = 600.0;

/// Glyph space units per text space unit.
const GLYPH_UNITS_PER_EM: f64 = 1000.0;

/// Direction in which glyphs advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritingMode {
    /// Glyphs advance along the x axis.
    #[default]
    Horizontal,
    /// Glyphs advance along the y axis.
    Vertical,
}

/// Converts a font size into the factor mapping glyph-space units
/// (thousandths of an em) to text space.
pub fn scaling_factor(font_size: f64) -> f64 {
    font_size / GLYPH_UNITS_PER_EM
}

/// Per-character metrics and decoding for one font resource.
///
/// Implementations must be read-only: separate scans may share one
/// provider across threads.
pub trait FontMetricsProvider: fmt::Debug + Send + Sync {
    /// Font name used in diagnostics (e.g. "Helvetica").
    fn name(&self) -> &str;

    /// Decode raw encoded bytes into characters, preserving order.
    fn decode(&self, bytes: &[u8]) -> String;

    /// Advance width of `ch` in glyph space (thousandths of an em),
    /// or `None` when the font has no metrics for it.
    fn width(&self, ch: char) -> Option<f64>;

    /// Glyph height of `ch` in text space at `font_size`.
    fn height(&self, ch: char, font_size: f64) -> f64;

    /// Font ascent in text space at `font_size`.
    fn ascent(&self, font_size: f64) -> f64;

    /// Factor converting glyph-space units to text space at `font_size`.
    fn scaling_factor(&self, font_size: f64) -> f64 {
        scaling_factor(font_size)
    }

    fn writing_mode(&self) -> WritingMode {
        WritingMode::Horizontal
    }

    /// Whether [`outline`](FontMetricsProvider::outline) can return glyph
    /// shapes. Fonts without outlines are not painted by the rasterizer.
    fn supports_outline(&self) -> bool {
        false
    }

    /// Vector outline of `ch`, y-down: the baseline is at y = 0 and
    /// ascenders have negative y. Only the outline's proportions matter.
    fn outline(&self, _ch: char) -> Option<Path> {
        None
    }
}

/// Base single-byte encoding of a simple font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    /// Bytes map to the Unicode code point of the same value.
    #[default]
    Standard,
    /// Windows code page 1252.
    WinAnsi,
}

/// Single-byte encoding: a base table plus per-code overrides
/// (from a `/Differences` array).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleEncoding {
    base: BaseEncoding,
    differences: BTreeMap<u8, char>,
}

impl SimpleEncoding {
    pub fn new(base: BaseEncoding) -> Self {
        Self {
            base,
            differences: BTreeMap::new(),
        }
    }

    /// Override the character assigned to individual codes.
    pub fn apply_differences(&mut self, differences: &[(u8, char)]) {
        self.differences.extend(differences.iter().copied());
    }

    pub fn base(&self) -> BaseEncoding {
        self.base
    }

    /// Character assigned to a byte code.
    pub fn decode_byte(&self, code: u8) -> char {
        if let Some(&ch) = self.differences.get(&code) {
            return ch;
        }
        match self.base {
            BaseEncoding::Standard => char::from(code),
            BaseEncoding::WinAnsi => {
                let (decoded, _) = encoding_rs::WINDOWS_1252
                    .decode_without_bom_handling(std::slice::from_ref(&code));
                decoded.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
            }
        }
    }

    /// Byte code that decodes to `ch`, if any.
    pub fn encode_char(&self, ch: char) -> Option<u8> {
        if let Some((&code, _)) = self.differences.iter().find(|&(_, &c)| c == ch) {
            return Some(code);
        }
        let code = match self.base {
            BaseEncoding::Standard => u8::try_from(u32::from(ch)).ok()?,
            BaseEncoding::WinAnsi => {
                let mut buf = [0u8; 4];
                let (bytes, _, had_errors) =
                    encoding_rs::WINDOWS_1252.encode(ch.encode_utf8(&mut buf));
                match (had_errors, bytes.as_ref()) {
                    (false, [byte]) => *byte,
                    _ => return None,
                }
            }
        };
        // A code shadowed by a difference entry no longer maps to `ch`.
        (!self.differences.contains_key(&code)).then_some(code)
    }

    /// Decode a byte run, one character per byte.
    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes.iter().map(|&b| self.decode_byte(b)).collect()
    }
}

/// Single-byte font described by a widths table and font descriptor values.
///
/// Width, ascent, and descent values are in glyph space units
/// (1/1000 of text space).
#[derive(Debug, Clone)]
pub struct SimpleFont {
    name: String,
    /// Glyph widths indexed by (char_code - first_char).
    widths: Vec<f64>,
    first_char: u32,
    last_char: u32,
    /// Width for codes outside [first_char, last_char].
    missing_width: f64,
    ascent: f64,
    descent: f64,
    encoding: SimpleEncoding,
}

impl SimpleFont {
    /// Create a font whose widths start at `first_char`.
    pub fn new(name: impl Into<String>, widths: Vec<f64>, first_char: u32) -> Self {
        let last_char = first_char.saturating_add((widths.len() as u32).saturating_sub(1));
        Self {
            name: name.into(),
            widths,
            first_char,
            last_char,
            missing_width: DEFAULT_WIDTH,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            encoding: SimpleEncoding::default(),
        }
    }

    /// Create a font from `(character, width)` pairs under the standard
    /// encoding. Codes inside the covered range without an entry get the
    /// missing width.
    pub fn from_char_widths(name: impl Into<String>, char_widths: &[(char, f64)]) -> Self {
        let codes: Vec<(u32, f64)> = char_widths
            .iter()
            .filter(|(ch, _)| u32::from(*ch) <= 0xFF)
            .map(|&(ch, w)| (u32::from(ch), w))
            .collect();
        let Some(first) = codes.iter().map(|&(c, _)| c).min() else {
            return Self::new(name, Vec::new(), 0);
        };
        let last = codes.iter().map(|&(c, _)| c).max().unwrap_or(first);
        let mut widths = vec![DEFAULT_WIDTH; (last - first + 1) as usize];
        for (code, w) in codes {
            widths[(code - first) as usize] = w;
        }
        Self::new(name, widths, first)
    }

    /// Create default metrics for when font info is unavailable.
    pub fn default_metrics(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), 0)
    }

    pub fn with_last_char(mut self, last_char: u32) -> Self {
        self.last_char = last_char;
        self
    }

    pub fn with_missing_width(mut self, missing_width: f64) -> Self {
        self.missing_width = missing_width;
        self
    }

    pub fn with_ascent_descent(mut self, ascent: f64, descent: f64) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    pub fn with_encoding(mut self, encoding: SimpleEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Get the width for a character code in glyph space.
    pub fn width_for_code(&self, char_code: u32) -> f64 {
        if char_code >= self.first_char && char_code <= self.last_char {
            let index = (char_code - self.first_char) as usize;
            if let Some(&w) = self.widths.get(index) {
                return w;
            }
        }
        self.missing_width
    }

    /// Font ascent in glyph space units (positive, above baseline).
    pub fn ascent_units(&self) -> f64 {
        self.ascent
    }

    /// Font descent in glyph space units (negative, below baseline).
    pub fn descent_units(&self) -> f64 {
        self.descent
    }

    pub fn missing_width(&self) -> f64 {
        self.missing_width
    }

    pub fn first_char(&self) -> u32 {
        self.first_char
    }

    pub fn last_char(&self) -> u32 {
        self.last_char
    }

    pub fn encoding(&self) -> &SimpleEncoding {
        &self.encoding
    }
}

impl FontMetricsProvider for SimpleFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.encoding.decode(bytes)
    }

    fn width(&self, ch: char) -> Option<f64> {
        self.encoding
            .encode_char(ch)
            .map(|code| self.width_for_code(u32::from(code)))
    }

    fn height(&self, _ch: char, font_size: f64) -> f64 {
        (self.ascent - self.descent) * scaling_factor(font_size)
    }

    fn ascent(&self, font_size: f64) -> f64 {
        self.ascent * scaling_factor(font_size)
    }
}

/// A [`SimpleFont`] that also carries vector glyph outlines.
///
/// Outlines are y-down (baseline at 0, ascenders negative); the rasterizer
/// rescales them to the advance width and glyph height, so their absolute
/// size is irrelevant.
#[derive(Debug, Clone)]
pub struct OutlineFont {
    metrics: SimpleFont,
    outlines: HashMap<char, Path>,
}

impl OutlineFont {
    pub fn new(metrics: SimpleFont) -> Self {
        Self {
            metrics,
            outlines: HashMap::new(),
        }
    }

    /// Register the outline for a character.
    pub fn with_outline(mut self, ch: char, outline: Path) -> Self {
        self.outlines.insert(ch, outline);
        self
    }

    pub fn metrics(&self) -> &SimpleFont {
        &self.metrics
    }
}

impl FontMetricsProvider for OutlineFont {
    fn name(&self) -> &str {
        self.metrics.name()
    }

    fn decode(&self, bytes: &[u8]) -> String {
        self.metrics.decode(bytes)
    }

    fn width(&self, ch: char) -> Option<f64> {
        self.metrics.width(ch)
    }

    fn height(&self, ch: char, font_size: f64) -> f64 {
        self.metrics.height(ch, font_size)
    }

    fn ascent(&self, font_size: f64) -> f64 {
        self.metrics.ascent(font_size)
    }

    fn supports_outline(&self) -> bool {
        true
    }

    fn outline(&self, ch: char) -> Option<Path> {
        self.outlines.get(&ch).cloned()
    }
}

/// Build a [`SimpleFont`] from a lopdf font dictionary.
///
/// Reads /BaseFont, /Widths, /FirstChar, /LastChar, and /Encoding from the
/// font dictionary, and /Ascent, /Descent, /FontBBox, /MissingWidth from the
/// /FontDescriptor. Missing entries fall back to default metrics.
pub fn load_simple_font(doc: &lopdf::Document, font_dict: &lopdf::Dictionary) -> SimpleFont {
    let name = font_dict
        .get(b"BaseFont")
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap_or_default();

    let first_char = font_dict
        .get(b"FirstChar")
        .ok()
        .and_then(object_to_f64_opt)
        .map(|v| v as u32)
        .unwrap_or(0);

    let last_char = font_dict
        .get(b"LastChar")
        .ok()
        .and_then(object_to_f64_opt)
        .map(|v| v as u32)
        .unwrap_or(0);

    let widths: Vec<f64> = font_dict
        .get(b"Widths")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_array().ok())
        .map(|arr| {
            arr.iter()
                .map(|o| object_to_f64_opt(resolve_object(doc, o)).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default();

    let mut font = SimpleFont::new(name, widths, first_char)
        .with_last_char(last_char)
        .with_encoding(extract_encoding(doc, font_dict));

    let descriptor = font_dict
        .get(b"FontDescriptor")
        .ok()
        .map(|obj| resolve_object(doc, obj))
        .and_then(|obj| obj.as_dict().ok());

    if let Some(desc) = descriptor {
        let bbox = desc
            .get(b"FontBBox")
            .ok()
            .map(|o| resolve_object(doc, o))
            .and_then(|o| o.as_array().ok())
            .map(|arr| arr.iter().filter_map(object_to_f64_opt).collect::<Vec<_>>());
        // /FontBBox stands in for a missing or zero /Ascent or /Descent.
        let (bbox_ascent, bbox_descent) = match bbox.as_deref() {
            Some(&[_, lly, _, ury]) => (ury, lly),
            _ => (DEFAULT_ASCENT, DEFAULT_DESCENT),
        };
        let ascent = descriptor_number(desc, b"Ascent", 0.0);
        let descent = descriptor_number(desc, b"Descent", 0.0);

        font = font
            .with_ascent_descent(
                if ascent == 0.0 { bbox_ascent } else { ascent },
                if descent == 0.0 { bbox_descent } else { descent },
            )
            .with_missing_width(descriptor_number(desc, b"MissingWidth", DEFAULT_WIDTH));
    }

    font
}

fn descriptor_number(desc: &lopdf::Dictionary, key: &[u8], default: f64) -> f64 {
    desc.get(key)
        .ok()
        .and_then(object_to_f64_opt)
        .unwrap_or(default)
}

fn extract_encoding(doc: &lopdf::Document, font_dict: &lopdf::Dictionary) -> SimpleEncoding {
    let Some(encoding_obj) = font_dict.get(b"Encoding").ok() else {
        return SimpleEncoding::default();
    };
    let encoding_obj = resolve_object(doc, encoding_obj);

    if let Ok(name) = encoding_obj.as_name() {
        return SimpleEncoding::new(base_encoding_from_name(name));
    }

    let Ok(enc_dict) = encoding_obj.as_dict() else {
        return SimpleEncoding::default();
    };
    let base = enc_dict
        .get(b"BaseEncoding")
        .ok()
        .and_then(|o| o.as_name().ok())
        .map(base_encoding_from_name)
        .unwrap_or_default();
    let mut encoding = SimpleEncoding::new(base);
    if let Some(arr) = enc_dict
        .get(b"Differences")
        .ok()
        .map(|o| resolve_object(doc, o))
        .and_then(|o| o.as_array().ok())
    {
        encoding.apply_differences(&parse_differences_array(arr));
    }
    encoding
}

fn base_encoding_from_name(name: &[u8]) -> BaseEncoding {
    match name {
        b"WinAnsiEncoding" => BaseEncoding::WinAnsi,
        _ => BaseEncoding::Standard,
    }
}

/// Parse a /Differences array into (code, char) pairs.
///
/// Format: `[code1 /name1 /name2 ... codeN /nameN ...]`
/// Each integer starts a run; subsequent names are assigned consecutive codes.
fn parse_differences_array(arr: &[lopdf::Object]) -> Vec<(u8, char)> {
    let mut result = Vec::new();
    let mut current_code: Option<u8> = None;

    for obj in arr {
        match obj {
            lopdf::Object::Integer(i) => {
                current_code = u8::try_from(*i).ok();
            }
            lopdf::Object::Name(name_bytes) => {
                if let Some(code) = current_code {
                    let name = String::from_utf8_lossy(name_bytes);
                    if let Some(ch) = glyph_name_to_char(&name) {
                        result.push((code, ch));
                    }
                    current_code = code.checked_add(1);
                }
            }
            _ => {}
        }
    }

    result
}

/// Map a glyph name to its character.
///
/// Covers single-character names (`/A`), `uniXXXX` names, and the
/// punctuation names common in /Differences arrays.
fn glyph_name_to_char(name: &str) -> Option<char> {
    let mut chars = name.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Some(ch);
    }
    if let Some(hex) = name.strip_prefix("uni") {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    let ch = match name {
        "space" => ' ',
        "period" => '.',
        "comma" => ',',
        "hyphen" => '-',
        "colon" => ':',
        "semicolon" => ';',
        "quotesingle" => '\'',
        "quotedbl" => '"',
        "parenleft" => '(',
        "parenright" => ')',
        "slash" => '/',
        "zero" => '0',
        "one" => '1',
        "two" => '2',
        "three" => '3',
        "four" => '4',
        "five" => '5',
        "six" => '6',
        "seven" => '7',
        "eight" => '8',
        "nine" => '9',
        "bullet" => '\u{2022}',
        "endash" => '\u{2013}',
        "emdash" => '\u{2014}',
        "quoteleft" => '\u{2018}',
        "quoteright" => '\u{2019}',
        _ => return None,
    };
    Some(ch)
}

/// Resolve an indirect reference to the actual object.
pub(crate) fn resolve_object<'a>(doc: &'a lopdf::Document, obj: &'a lopdf::Object) -> &'a lopdf::Object {
    match obj {
        lopdf::Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Convert a lopdf object to f64, returning None if not a number.
fn object_to_f64_opt(obj: &lopdf::Object) -> Option<f64> {
    match obj {
        lopdf::Object::Integer(i) => Some(*i as f64),
        lopdf::Object::Real(f) => Some(*f as f64),
        _ => None,
    }
}
