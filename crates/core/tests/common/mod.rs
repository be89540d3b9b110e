//! Shared test helpers for `eu_tire_label_core` integration tests.

#![allow(unreachable_pub)]

use eu_tire_label_core::{Diagnostic, Field, LabelRecord};

/// Build a record from `(key, raw value)` pairs, as a request front-end would.
#[allow(dead_code)]
pub fn record_from(pairs: &[(&str, &str)]) -> (LabelRecord, Vec<Diagnostic>) {
    let mut record = LabelRecord::new();
    let mut issues = Vec::new();
    for (key, raw) in pairs {
        let field = Field::from_key(key).unwrap_or_else(|| panic!("unknown field key {key}"));
        record.set_field(field, raw, None, &mut issues);
    }
    record.sanitize(&mut issues);
    (record, issues)
}

/// Assert that every template placeholder was substituted.
///
/// CDATA sections hold user text verbatim and are skipped.
#[allow(dead_code)]
pub fn assert_no_placeholders(svg: &str) {
    let mut markup = String::new();
    let mut rest = svg;
    while let Some(open) = rest.find("<![CDATA[") {
        markup.push_str(&rest[..open]);
        let close = rest[open..].find("]]>").expect("unterminated CDATA section");
        rest = &rest[open + close + 3..];
    }
    markup.push_str(rest);
    assert!(
        !markup.contains("{{") && !markup.contains("}}"),
        "residual placeholder in:\n{svg}"
    );
}

/// The `display` attribute of the element with the given `id`.
#[allow(dead_code)]
pub fn display_of<'a>(svg: &'a str, id: &str) -> &'a str {
    let needle = format!("id=\"{id}\" display=\"");
    let start = svg
        .find(&needle)
        .unwrap_or_else(|| panic!("element {id} not found"))
        + needle.len();
    let end = start + svg[start..].find('"').expect("unterminated display attribute");
    &svg[start..end]
}

/// The `transform` attribute of the element with the given `id`.
#[allow(dead_code)]
pub fn transform_of<'a>(svg: &'a str, id: &str) -> &'a str {
    let needle = format!("id=\"{id}\"");
    let start = svg
        .find(&needle)
        .unwrap_or_else(|| panic!("element {id} not found"));
    let tag_end = start + svg[start..].find('>').expect("unterminated tag");
    let tag = &svg[start..tag_end];
    let attr = "transform=\"";
    let t = tag
        .find(attr)
        .unwrap_or_else(|| panic!("element {id} has no transform"))
        + attr.len();
    let len = tag[t..].find('"').expect("unterminated transform attribute");
    &tag[t..t + len]
}
