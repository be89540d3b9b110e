//! EU tire label core library.
//!
//! Turns raw field tokens into a [`LabelRecord`] and renders the record as an
//! SVG label for either Regulation (EC) No 1222/2009 or Regulation (EU)
//! 2020/740. The main entry points are [`LabelRecord::set_field`] for
//! populating a record and [`Regulation::compose`] (or [`compose_ec`] /
//! [`compose_eu`]) for rendering.

#![warn(missing_docs)]

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
///
/// ```ignore
/// ctx!("field" => name, "value" => raw)
/// ```
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        ::std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Label composers for both regulations.
pub mod compose;
/// Diagnostic types (re-exported from the diagnostics crate).
pub mod diag;
/// Rendering errors.
pub mod error;
/// Label record and field types.
pub mod label;
/// Field parsers.
pub mod parse;
/// QR code module grids.
pub mod qr;
/// CDATA sanitization of free text.
pub mod sanitize;
/// Placeholder substitution.
pub mod template;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Record
pub use label::{
    BoundedText, Field, FuelEfficiencyClass, Grade, LabelRecord, QRCODE_MAX_CHARS,
    RollingNoiseClass, TEXT_MAX_CHARS, TireClass, WetGripClass,
};

// Composers
pub use compose::{Regulation, UnknownRegulation, compose_ec, compose_eu};

// Errors
pub use error::LabelError;
pub use qr::QrError;
pub use template::TemplateError;

// Diagnostics (re-exported from the diagnostics crate)
pub use diag::{Diagnostic, Severity, Span, codes, explain};
