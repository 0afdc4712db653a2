//! Error types for the text layout engine and content scanner.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Every failure of a
//! show-text operation is returned as a [`ContentError`]; callers decide
//! whether to abort the scan or skip the operator, and can turn an error
//! into an [`ExtractWarning`] to record the skip.

use pdfscan_core::{ExtractWarning, ExtractWarningCode};
use thiserror::Error;

use crate::font::WritingMode;

/// Error type for content stream operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    /// The active font uses a writing mode the layout engine does not support.
    #[error("unsupported layout mode: {mode:?} writing is not supported")]
    UnsupportedLayoutMode {
        /// The rejected writing mode.
        mode: WritingMode,
    },

    /// The graphics state has no active font.
    #[error("no active font in graphics state")]
    MissingFont,

    /// The font has no metrics for a decoded character.
    #[error("font {font} has no metrics for character {ch:?}")]
    MissingGlyphMetrics {
        /// The character lacking metrics.
        ch: char,
        /// Name of the font that was asked.
        font: String,
    },

    /// An operator's operands do not have the expected shape.
    #[error("malformed operand: {0}")]
    MalformedOperand(String),

    /// A font resource name could not be resolved.
    #[error("font resource not found: {0}")]
    UnknownFont(String),

    /// A configured resource limit was exceeded in strict mode.
    #[error("resource limit exceeded: {0}")]
    ResourceLimit(String),
}

impl ContentError {
    /// True for errors caused by a feature this engine does not implement,
    /// as opposed to bad input.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ContentError::UnsupportedLayoutMode { .. })
    }

    /// True for errors caused by operands that do not match the operator's
    /// expected shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ContentError::MalformedOperand(_))
    }

    /// The warning code matching this error.
    pub fn warning_code(&self) -> ExtractWarningCode {
        match self {
            ContentError::UnsupportedLayoutMode { .. } => ExtractWarningCode::UnsupportedOperator,
            ContentError::MissingFont | ContentError::UnknownFont(_) => {
                ExtractWarningCode::MissingFont
            }
            ContentError::MissingGlyphMetrics { .. } => ExtractWarningCode::MissingGlyphMetrics,
            ContentError::MalformedOperand(_) => ExtractWarningCode::MalformedObject,
            ContentError::ResourceLimit(_) => ExtractWarningCode::ResourceLimitReached,
        }
    }
}

impl From<ContentError> for ExtractWarning {
    fn from(err: ContentError) -> Self {
        let warning = ExtractWarning::with_code(err.warning_code(), err.to_string());
        match err {
            ContentError::MissingGlyphMetrics { font, .. } | ContentError::UnknownFont(font) => {
                warning.with_font(font)
            }
            _ => warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_layout_mode_message() {
        let err = ContentError::UnsupportedLayoutMode {
            mode: WritingMode::Vertical,
        };
        assert_eq!(
            err.to_string(),
            "unsupported layout mode: Vertical writing is not supported"
        );
        assert!(err.is_unsupported());
        assert!(!err.is_malformed());
    }

    #[test]
    fn malformed_operand_is_distinguishable() {
        let err = ContentError::MalformedOperand("missing text".to_string());
        assert!(err.is_malformed());
        assert!(!err.is_unsupported());
        assert_eq!(err.to_string(), "malformed operand: missing text");
    }

    #[test]
    fn missing_glyph_metrics_message() {
        let err = ContentError::MissingGlyphMetrics {
            ch: 'Z',
            font: "Helvetica".to_string(),
        };
        assert_eq!(err.to_string(), "font Helvetica has no metrics for character 'Z'");
    }

    #[test]
    fn warning_codes() {
        assert_eq!(
            ContentError::MissingFont.warning_code(),
            ExtractWarningCode::MissingFont
        );
        assert_eq!(
            ContentError::UnknownFont("F9".into()).warning_code(),
            ExtractWarningCode::MissingFont
        );
        assert_eq!(
            ContentError::MalformedOperand(String::new()).warning_code(),
            ExtractWarningCode::MalformedObject
        );
        assert_eq!(
            ContentError::UnsupportedLayoutMode {
                mode: WritingMode::Vertical
            }
            .warning_code(),
            ExtractWarningCode::UnsupportedOperator
        );
    }

    #[test]
    fn resource_limit_maps_to_limit_code() {
        let err = ContentError::ResourceLimit("10 operators".into());
        assert_eq!(err.warning_code(), ExtractWarningCode::ResourceLimitReached);
        assert_eq!(err.to_string(), "resource limit exceeded: 10 operators");
    }

    #[test]
    fn into_warning_carries_font_name() {
        let warning: ExtractWarning = ContentError::UnknownFont("F9".into()).into();
        assert_eq!(warning.code, ExtractWarningCode::MissingFont);
        assert_eq!(warning.font_name.as_deref(), Some("F9"));
        assert_eq!(warning.description, "font resource not found: F9");
    }

    #[test]
    fn into_warning_without_font() {
        let warning: ExtractWarning = ContentError::MissingFont.into();
        assert!(warning.font_name.is_none());
    }

    #[test]
    fn content_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ContentError::MissingFont);
        assert!(err.to_string().contains("no active font"));
    }
}
