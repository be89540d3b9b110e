//! Diagnostic rendering using ariadne.
//!
//! Converts [`Diagnostic`]s into ariadne [`Report`]s for coloured terminal
//! output, annotated with the CGI query string when a diagnostic carries a
//! span into it. Falls back to structured JSON when stderr is piped or when
//! the user explicitly requests it. Diagnostics always go to stderr; stdout
//! is reserved for the label itself.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use eu_tire_label_diagnostics::{Diagnostic, Severity};

use crate::request::{LabelRequest, RenderError};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for diagnostic rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or detect from whether stderr is a TTY.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stderr().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

/// Named request input that diagnostic spans point into.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Input<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> Input<'a> {
    pub(crate) fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        _ => Color::White,
    }
}

fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|c| !c.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics in pretty (ariadne) format to stderr.
///
/// Diagnostics with a span into `input` are rendered with source context;
/// the rest as standalone messages.
pub(crate) fn render_diagnostics_pretty(input: Option<Input<'_>>, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default().with_compact(false);
    let mut cache = input.map(|i| (i.name, Source::from(i.text)));

    for diag in diagnostics {
        if let (Some(span), Some(input), Some(cache)) = (&diag.span, input, cache.as_mut()) {
            // Clamp span to input length to avoid panics on stale spans.
            let start = span.start.min(input.text.len());
            let end = span.end.min(input.text.len()).max(start);

            let label_msg = context_note(diag).unwrap_or_else(|| diag.message.clone());
            let mut builder = Report::build(report_kind(&diag.severity), (input.name, start..end))
                .with_code(diag.id.as_ref())
                .with_message(&diag.message)
                .with_config(config)
                .with_label(
                    Label::new((input.name, start..end))
                        .with_message(label_msg)
                        .with_color(severity_color(&diag.severity)),
                );
            if let Some(explanation) = diag.explain() {
                builder = builder.with_help(explanation);
            }
            builder.finish().eprint(&mut *cache).ok();
        } else {
            let kind_str = match diag.severity {
                Severity::Error => "error",
                Severity::Warn => "warning",
                _ => "diagnostic",
            };
            eprintln!("{kind_str}[{}]: {}", diag.id, diag.message);
            if let Some(note) = context_note(diag) {
                eprintln!("  = note: {note}");
            }
            if let Some(explanation) = diag.explain() {
                eprintln!("  = help: {explanation}");
            }
        }
    }
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Render the request outcome as one JSON object to stderr.
///
/// A render `failure` sets `ok` to false and adds an `error` member.
pub(crate) fn render_report_json(request: &LabelRequest, failure: Option<&RenderError>) {
    let ok = failure.is_none()
        && !request
            .issues
            .iter()
            .any(|d| matches!(d.severity, Severity::Error));
    let mut out = serde_json::json!({
        "ok": ok,
        "regulation": request.regulation,
        "record": request.record,
        "diagnostics": request.issues,
    });
    if let Some(e) = failure {
        out["error"] = e.to_string().into();
    }
    match serde_json::to_string_pretty(&out) {
        Ok(json) => eprintln!("{json}"),
        Err(e) => eprintln!("error: failed to serialize diagnostics: {e}"),
    }
}

/// JSON envelope for a command that failed outright.
pub(crate) fn render_error_json(message: &str) {
    let out = serde_json::json!({
        "success": false,
        "error": "command_failed",
        "message": message,
    });
    eprintln!("{out}");
}

// ── Unified entry point ─────────────────────────────────────────────────

/// Report the diagnostics collected by `request`, and the render `failure`
/// if there was one, in the given format.
///
/// Nothing is written for a clean render. JSON output is always a single
/// document.
pub(crate) fn report(
    input: Option<Input<'_>>,
    request: &LabelRequest,
    failure: Option<&RenderError>,
    format: Format,
) {
    if request.issues.is_empty() && failure.is_none() {
        return;
    }
    match format {
        Format::Pretty => {
            render_diagnostics_pretty(input, &request.issues);
            if let Some(e) = failure {
                use ariadne::Fmt;
                eprintln!("{}: failed to render label: {e}", "error".fg(Color::Red));
            }
            print_summary(&request.issues);
        }
        Format::Json => render_report_json(request, failure),
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing error/warning counts.
///
/// Example: `1 error, 2 warnings`
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    use ariadne::Fmt;

    let (mut errors, mut warnings) = (0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            _ => warnings += 1,
        }
    }

    if errors + warnings == 0 {
        return;
    }

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    eprintln!("{}", parts.join(", "));
}
