//! Warning and option types shared across pdfscan crates.
//!
//! Provides [`ExtractWarning`] for non-fatal issues that allow best-effort
//! continuation, [`ExtractResult`] for pairing a value with collected
//! warnings, and [`ExtractOptions`] for configuring resource limits and
//! error behavior while scanning content streams.

use std::fmt;

/// Machine-readable warning code for categorizing scan issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// No font was active, or a referenced font was not found in resources.
    MissingFont,
    /// A font could not supply metrics for a character.
    MissingGlyphMetrics,
    /// The operator requested a feature that is not supported
    /// (e.g. vertical writing mode).
    UnsupportedOperator,
    /// An operator's operands did not have the expected shape.
    MalformedObject,
    /// A configured resource limit was reached during scanning.
    ResourceLimitReached,
    /// Unbalanced or too-deep graphics state save/restore.
    UnbalancedState,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::MissingGlyphMetrics => "MISSING_GLYPH_METRICS",
            ExtractWarningCode::UnsupportedOperator => "UNSUPPORTED_OPERATOR",
            ExtractWarningCode::MalformedObject => "MALFORMED_OBJECT",
            ExtractWarningCode::ResourceLimitReached => "RESOURCE_LIMIT_REACHED",
            ExtractWarningCode::UnbalancedState => "UNBALANCED_STATE",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered while scanning a content stream.
///
/// Includes a structured [`code`](ExtractWarning::code), a human-readable
/// description, and optional operator index and font name context.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Index of the operator in the content stream where the warning occurred.
    pub operator_index: Option<usize>,
    /// Font name associated with the warning, if applicable.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with just a description.
    ///
    /// Uses [`ExtractWarningCode::Other`] as the default code.
    pub fn new(description: impl Into<String>) -> Self {
        let desc = description.into();
        Self {
            code: ExtractWarningCode::Other(desc.clone()),
            description: desc,
            operator_index: None,
            font_name: None,
        }
    }

    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            operator_index: None,
            font_name: None,
        }
    }

    /// Attach the operator index (builder pattern).
    pub fn at_operator(mut self, index: usize) -> Self {
        self.operator_index = Some(index);
        self
    }

    /// Attach the font name (builder pattern).
    pub fn with_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        if let Some(index) = self.operator_index {
            write!(f, " [operator #{index}]")?;
        }
        Ok(())
    }
}

/// Result wrapper that pairs a value with collected warnings.
///
/// Used when a scan can partially succeed with non-fatal issues.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    /// The extracted value.
    pub value: T,
    /// Warnings collected during scanning.
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    /// Create a result with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Create a result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Transform the value while preserving warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractResult<U> {
        ExtractResult {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// Options controlling scan behavior and resource limits.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Whether to collect warnings for skipped operators (default: true).
    pub collect_warnings: bool,
    /// When true, the first failing operator aborts the whole scan
    /// instead of being skipped (default: false).
    pub strict_mode: bool,
    /// Maximum number of operators processed per content stream
    /// (default: 1,000,000).
    pub max_operators: usize,
    /// Maximum nesting of graphics state saves (default: 28).
    pub max_stack_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            collect_warnings: true,
            strict_mode: false,
            max_operators: 1_000_000,
            max_stack_depth: 28,
        }
    }
}

impl ExtractOptions {
    /// Options that abort on the first error.
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- ExtractWarningCode ---

    #[test]
    fn warning_code_tags() {
        assert_eq!(ExtractWarningCode::MissingFont.as_str(), "MISSING_FONT");
        assert_eq!(
            ExtractWarningCode::MissingGlyphMetrics.as_str(),
            "MISSING_GLYPH_METRICS"
        );
        assert_eq!(
            ExtractWarningCode::UnsupportedOperator.to_string(),
            "UNSUPPORTED_OPERATOR"
        );
        assert_eq!(ExtractWarningCode::Other("x".into()).as_str(), "OTHER");
    }

    // --- ExtractWarning ---

    #[test]
    fn warning_new_uses_other_code() {
        let w = ExtractWarning::new("something odd");
        assert_eq!(w.code, ExtractWarningCode::Other("something odd".into()));
        assert_eq!(w.description, "something odd");
        assert!(w.operator_index.is_none());
        assert!(w.font_name.is_none());
    }

    #[test]
    fn warning_display_with_context() {
        let w = ExtractWarning::with_code(ExtractWarningCode::MissingFont, "font not found")
            .with_font("F1")
            .at_operator(7);
        assert_eq!(
            w.to_string(),
            "[MISSING_FONT] font not found [font F1] [operator #7]"
        );
    }

    #[test]
    fn warning_display_plain() {
        let w = ExtractWarning::with_code(ExtractWarningCode::MalformedObject, "bad operand");
        assert_eq!(w.to_string(), "[MALFORMED_OBJECT] bad operand");
    }

    // --- ExtractResult ---

    #[test]
    fn result_ok_is_clean() {
        let r = ExtractResult::ok(3);
        assert!(r.is_clean());
        assert_eq!(r.value, 3);
    }

    #[test]
    fn result_map_keeps_warnings() {
        let r = ExtractResult::with_warnings(2, vec![ExtractWarning::new("w")]);
        let mapped = r.map(|v| v * 10);
        assert_eq!(mapped.value, 20);
        assert_eq!(mapped.warnings.len(), 1);
        assert!(!mapped.is_clean());
    }

    // --- ExtractOptions ---

    #[test]
    fn options_defaults() {
        let opts = ExtractOptions::default();
        assert!(opts.collect_warnings);
        assert!(!opts.strict_mode);
        assert_eq!(opts.max_operators, 1_000_000);
        assert_eq!(opts.max_stack_depth, 28);
    }

    #[test]
    fn options_strict() {
        let opts = ExtractOptions::strict();
        assert!(opts.strict_mode);
        assert_eq!(opts.max_stack_depth, ExtractOptions::default().max_stack_depth);
    }
}
