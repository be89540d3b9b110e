//! Diagnostics for EU tire label rendering.
//!
//! Provides [`Diagnostic`], [`Severity`] and [`Span`] used to report
//! warnings from the field parsers and errors from the request front-end.
//! Diagnostic codes are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the label cannot be rendered.
    Error,
    /// Warning: a field was replaced by its sentinel value.
    Warn,
}

/// Byte span in the raw request input (e.g. a CGI query string).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }
}

/// A diagnostic message produced while populating or rendering a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"TL1002"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the request input that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    /// Serialized only when present.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Error, message, span)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, span)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"field"` or `"value"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Attach a span, replacing any existing one.
    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    let text = match id {
        codes::INVALID_TIRE_CLASS => {
            "The tire class must be 1, 2 or 3 (C1, C2 or C3). An invalid value leaves the class unset, which prevents the label from being rendered."
        }
        codes::INVALID_FUEL_EFFICIENCY => {
            "The fuel efficiency class accepts a number 1-7 or a single letter A-G. Invalid values hide the fuel efficiency pictogram."
        }
        codes::INVALID_WET_GRIP => {
            "The wet grip class accepts a number 1-7 or a single letter A-G. Invalid values hide the wet grip pictogram."
        }
        codes::INVALID_ROLLING_NOISE_CLASS => {
            "The external rolling noise class accepts a number 1-3 or a single letter A-C. Invalid values hide the noise class pictogram."
        }
        codes::INVALID_ROLLING_NOISE_DB => {
            "The external rolling noise value is expressed in dB and must be within 10-120. Invalid values hide the dB figure."
        }
        codes::INVALID_FLAG => {
            "Snow and ice grip flags accept 1/0, true/false, yes/no or on/off. Unrecognized values are treated as absent."
        }
        codes::TEXT_TRUNCATED => {
            "Trademark, tire type and tire size are limited to 31 characters and the QR code target to 63 characters. Longer text is truncated."
        }
        codes::TEXT_SANITIZED => {
            "Free text is embedded in XML CDATA sections, so the `]]>` terminator is rewritten to `]|>`."
        }
        codes::UNKNOWN_PARAMETER => {
            "The query string contained a parameter that does not map onto any label field. It was ignored."
        }
        codes::INVALID_DIMENSIONS => {
            "PNG dimensions use the WIDTH[xHEIGHT] format, e.g. `300` or `300x400`. When the height is omitted the label aspect ratio is preserved."
        }
        codes::INVALID_REGULATION => {
            "The regulation selects the label layout: `ec-1222-2009` (or `ec`, `2009`) or `eu-2020-740` (or `eu`, `2020`). Unrecognized names are ignored and the current regulation is kept."
        }
        codes::TIRE_CLASS_REQUIRED => {
            "The tire class is the only required field of a tire label; rendering is aborted without it."
        }
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Span ────────────────────────────────────────────────────────────

    #[test]
    fn span_new_valid() {
        let s = Span::new(5, 10);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 10);
    }

    #[test]
    #[should_panic(expected = "Span end (3) < start (5)")]
    fn span_new_inverted_panics() {
        Span::new(5, 3);
    }

    // ── Severity Display ────────────────────────────────────────────────

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
    }

    // ── Diagnostic constructors ─────────────────────────────────────────

    #[test]
    fn diagnostic_warn_constructor() {
        let d = Diagnostic::warn(codes::INVALID_WET_GRIP, "bad grip", Some(Span::new(0, 5)));
        assert_eq!(d.id, "TL1003");
        assert_eq!(d.severity, Severity::Warn);
        assert_eq!(d.span, Some(Span::new(0, 5)));
    }

    #[test]
    fn diagnostic_with_span_replaces() {
        let d = Diagnostic::warn(codes::INVALID_FLAG, "x", None).with_span(Some(Span::new(2, 4)));
        assert_eq!(d.span, Some(Span::new(2, 4)));
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::error(codes::TIRE_CLASS_REQUIRED, "tire class is required", None);
        assert_eq!(format!("{}", d), "error[TL2001]: tire class is required");
    }

    // ── explain ─────────────────────────────────────────────────────────

    #[test]
    fn all_codes_have_explanations() {
        for code in codes::ALL {
            assert!(
                explain(code).is_some(),
                "diagnostic code {code} has no explain() entry"
            );
        }
    }

    #[test]
    fn explain_regulation_keeps_current() {
        let text = explain(codes::INVALID_REGULATION).unwrap();
        assert!(text.contains("current regulation is kept"), "{text}");
        assert!(!text.contains("fall back"), "{text}");
    }

    #[test]
    fn explain_unknown_code() {
        let d = Diagnostic::warn("TL9999", "test", None);
        assert!(d.explain().is_none());
    }

    // ── Serde ───────────────────────────────────────────────────────────

    #[test]
    fn diagnostic_serde_roundtrip_with_context() {
        let d = Diagnostic::warn(codes::INVALID_ROLLING_NOISE_DB, "out of range", None)
            .with_context(BTreeMap::from([
                ("field".into(), "rolling-noise-db".into()),
                ("value".into(), "121".into()),
            ]));
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains("\"severity\":\"warn\""), "{json}");
        let d2: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, d2);
    }

    #[test]
    fn diagnostic_serde_omits_none_span() {
        let d = Diagnostic::warn(codes::INVALID_FLAG, "test", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("span"), "None span should be omitted: {json}");
        assert!(
            !json.contains("context"),
            "None context should be omitted: {json}"
        );
    }
}
