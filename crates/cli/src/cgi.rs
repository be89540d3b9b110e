//! CGI front-end.
//!
//! Active when `REQUEST_METHOD` is set. Only `GET` is served; label fields
//! come from `QUERY_STRING` as single-letter keys (`C=1&F=b&R=2`), and the
//! response carries CGI `Status`, `Content-Type` and `Content-Length`
//! headers ahead of the body.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use eu_tire_label_core::Field;
use eu_tire_label_diagnostics::{Diagnostic, Span, codes};
use url::form_urlencoded;

use crate::render::{Format, Input, report};
use crate::request::LabelRequest;

/// Environment variable holding the request method.
pub(crate) const REQUEST_METHOD: &str = "REQUEST_METHOD";
/// Environment variable holding the raw query string.
pub(crate) const QUERY_STRING: &str = "QUERY_STRING";

/// Outcome of a CGI request, mapped onto the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Ok,
    MethodNotAllowed,
    BadRequest,
    InternalServerError,
}

/// Serve one request, writing the full CGI response to `out`.
///
/// Fields already present in `request` (from command-line flags) are
/// overridden by the query string.
pub(crate) fn respond(
    method: &str,
    query: &str,
    mut request: LabelRequest,
    format: Format,
    out: &mut impl Write,
) -> Result<Status> {
    if method != "GET" {
        write!(out, "Status: 405 Method Not Allowed\r\n\r\n")?;
        return Ok(Status::MethodNotAllowed);
    }

    apply_query(&mut request, query);
    let result = request.render();
    let failure = result.as_ref().err().filter(|e| !e.is_missing_tire_class());
    report(Some(Input::new(QUERY_STRING, query)), &request, failure, format);

    match result {
        Ok(rendered) => {
            write!(
                out,
                "Status: 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
                rendered.content_type,
                rendered.body.len()
            )?;
            out.write_all(&rendered.body)?;
            Ok(Status::Ok)
        }
        Err(e) if e.is_missing_tire_class() => {
            write!(out, "Status: 400 Bad Request\r\n\r\n")?;
            Ok(Status::BadRequest)
        }
        Err(_) => {
            write!(out, "Status: 500 Internal Server Error\r\n\r\n")?;
            Ok(Status::InternalServerError)
        }
    }
}

/// Feed every `key=value` pair of `query` into `request`.
///
/// Keys are case-insensitive and values are URL-decoded. Spans of the
/// resulting diagnostics point into the raw (still encoded) query.
pub(crate) fn apply_query(request: &mut LabelRequest, query: &str) {
    let mut offset = 0;
    for token in query.split('&') {
        let start = offset;
        offset += token.len() + 1;

        let Some((key, value)) = form_urlencoded::parse(token.as_bytes()).next() else {
            continue;
        };
        let end = start + token.len();
        let key_end = start + token.find('=').unwrap_or(token.len());
        let key_span = Span::new(start, key_end);
        let value_span = Span::new((key_end + 1).min(end), end);

        match key.to_ascii_uppercase().as_str() {
            "L" => request.set_regulation(&value, Some(value_span)),
            #[cfg(feature = "png")]
            "PNG" => request.request_png(&value, Some(value_span)),
            other => match Field::from_key(other) {
                Some(field) => request.set(field, &value, Some(value_span)),
                None => request.issues.push(
                    Diagnostic::warn(
                        codes::UNKNOWN_PARAMETER,
                        format!("unknown query parameter: {key}"),
                        Some(key_span),
                    )
                    .with_context(BTreeMap::from([("key".into(), key.into_owned())])),
                ),
            },
        }
    }
}
