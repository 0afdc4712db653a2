//! pdfscan-content: text-showing interpreter for PDF content streams.
//!
//! Replays the text-showing operators (`Tj`, `TJ`, `'`, `"`) against a
//! [`GraphicsState`], either painting glyph outlines on a [`RenderSurface`]
//! or reporting each character's bounding box to a [`TextScanner`] for
//! extraction, search, and selection. [`ContentScanner`] drives whole
//! operator sequences, including the text state, positioning, and `q`/`Q`
//! operators. It depends on pdfscan-core for shared data types.

pub mod error;
pub mod font;
pub mod glyph_raster;
pub mod graphics_state;
pub mod scanner;
pub mod scanning;
pub mod surface;
pub mod text_layout;

pub use error::ContentError;
pub use font::{FontMetricsProvider, OutlineFont, SimpleEncoding, SimpleFont, WritingMode};
pub use glyph_raster::{GLYPH_FILL_COLOR, GlyphFill, GlyphTarget};
pub use graphics_state::{ContentContext, GraphicsState};
pub use pdfscan_core;
pub use scanner::{ContentScanner, Operation};
pub use scanning::{ScannedChar, TextCollector, TextScanner};
pub use surface::{FilledPath, PathRecorder, RenderSurface};
pub use text_layout::{ShowText, TextElement, execute, scan_text, show_text};
