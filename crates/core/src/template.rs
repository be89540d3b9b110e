//! Literal placeholder substitution over SVG templates.
//!
//! Placeholders are matched literally (no patterns), left to right and
//! without overlap. Text inserted by a substitution is never scanned again
//! within the same call. Output buffers are reserved once at their final
//! size, and a failed reservation is reported instead of aborting.

use std::collections::TryReserveError;

/// Template substitution failure.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The output buffer could not be allocated.
    #[error("failed to allocate {requested} bytes for template output")]
    Alloc {
        /// Size of the buffer that was requested.
        requested: usize,
        /// The underlying allocation error.
        #[source]
        source: TryReserveError,
    },
}

/// Replace every occurrence of `placeholder` in `template` with `value`.
///
/// An empty placeholder matches nothing and returns a copy of `template`.
pub fn replace_all(
    template: &str,
    placeholder: &str,
    value: &str,
) -> Result<String, TemplateError> {
    replace_each(template, &[(placeholder, value)])
}

/// Replace several placeholders in a single left-to-right pass.
///
/// At each position the first pair in `pairs` whose placeholder matches
/// wins. Because the scan resumes after the inserted value, a value that
/// happens to contain another placeholder is left untouched, which makes the
/// result independent of the order of `pairs` for non-overlapping
/// placeholders.
pub fn replace_each(template: &str, pairs: &[(&str, &str)]) -> Result<String, TemplateError> {
    let pairs: Vec<(&str, &str)> = pairs
        .iter()
        .copied()
        .filter(|(p, _)| !p.is_empty())
        .collect();

    let mut matches = Vec::new();
    let mut i = 0;
    while i < template.len() {
        match find_next(template, i, &pairs) {
            Some((pos, idx)) => {
                matches.push((pos, idx));
                i = pos + pairs[idx].0.len();
            }
            None => break,
        }
    }

    let final_len = matches.iter().fold(template.len(), |len, &(_, idx)| {
        len - pairs[idx].0.len() + pairs[idx].1.len()
    });
    let mut out = String::new();
    out.try_reserve_exact(final_len)
        .map_err(|source| TemplateError::Alloc {
            requested: final_len,
            source,
        })?;

    let mut last = 0;
    for (pos, idx) in matches {
        let (placeholder, value) = pairs[idx];
        out.push_str(&template[last..pos]);
        out.push_str(value);
        last = pos + placeholder.len();
    }
    out.push_str(&template[last..]);
    debug_assert_eq!(out.len(), final_len);
    Ok(out)
}

/// Earliest match at or after `from`: `(byte position, index into pairs)`.
fn find_next(haystack: &str, from: usize, pairs: &[(&str, &str)]) -> Option<(usize, usize)> {
    pairs
        .iter()
        .enumerate()
        .filter_map(|(idx, (p, _))| haystack[from..].find(p).map(|off| (from + off, idx)))
        .min()
}

/// A document under construction: a template receiving a chain of
/// substitutions.
#[derive(Debug, Clone)]
pub struct Template {
    doc: String,
}

impl Template {
    /// Start from a copy of `source`.
    pub fn new(source: &str) -> Result<Self, TemplateError> {
        let mut doc = String::new();
        doc.try_reserve_exact(source.len())
            .map_err(|source_err| TemplateError::Alloc {
                requested: source.len(),
                source: source_err,
            })?;
        doc.push_str(source);
        Ok(Self { doc })
    }

    /// Substitute one placeholder throughout the current document.
    pub fn fill(&mut self, placeholder: &str, value: &str) -> Result<&mut Self, TemplateError> {
        self.doc = replace_all(&self.doc, placeholder, value)?;
        Ok(self)
    }

    /// Substitute several placeholders in one pass (see [`replace_each`]).
    pub fn fill_each(&mut self, pairs: &[(&str, &str)]) -> Result<&mut Self, TemplateError> {
        self.doc = replace_each(&self.doc, pairs)?;
        Ok(self)
    }

    /// Current document text.
    pub fn as_str(&self) -> &str {
        &self.doc
    }

    /// Finish and take the document.
    pub fn into_string(self) -> String {
        self.doc
    }
}
