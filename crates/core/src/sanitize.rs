//! CDATA-safe free text.
//!
//! Trademark, tire type and tire size are embedded into the label template
//! inside `<![CDATA[ ... ]]>` sections. A literal `]]>` in user text would
//! close the section early, so its middle character is rewritten to `|`.

use std::borrow::Cow;

/// The sequence that terminates an XML CDATA section.
pub const CDATA_END: &str = "]]>";

/// Rewrite every `]]>` in `text` to `]|>`, in place.
///
/// Returns `true` if anything was rewritten.
pub fn sanitize(text: &mut String) -> bool {
    let mut changed = false;
    let mut from = 0;
    while let Some(off) = text[from..].find(CDATA_END) {
        let pos = from + off;
        text.replace_range(pos + 1..pos + 2, "|");
        changed = true;
        // `]|>` cannot take part in a new match, resume after it.
        from = pos + CDATA_END.len();
    }
    changed
}

/// Borrowing variant of [`sanitize`]; allocates only when a rewrite is needed.
pub fn sanitized(text: &str) -> Cow<'_, str> {
    if text.contains(CDATA_END) {
        let mut owned = text.to_string();
        sanitize(&mut owned);
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(text)
    }
}
