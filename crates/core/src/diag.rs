//! Re-exports from the diagnostics crate.

pub use eu_tire_label_diagnostics::{Diagnostic, Severity, Span, codes, explain};
