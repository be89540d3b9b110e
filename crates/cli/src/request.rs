//! Label requests: field tokens collected from flags or a query string,
//! rendered to SVG or PNG bytes.

use std::collections::BTreeMap;

use eu_tire_label_core::{Field, LabelError, LabelRecord, Regulation};
use eu_tire_label_diagnostics::{Diagnostic, Span, codes};
#[cfg(feature = "png")]
use eu_tire_label_raster::{Dimensions, RasterError, RasterOptions, svg_to_png};

/// Requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Output {
    /// SVG document.
    Svg,
    /// PNG image of the given size.
    #[cfg(feature = "png")]
    Png(Dimensions),
}

/// A finished label.
#[derive(Debug)]
pub(crate) struct Rendered {
    /// MIME type of `body`.
    pub(crate) content_type: &'static str,
    pub(crate) body: Vec<u8>,
}

impl Rendered {
    pub(crate) fn is_svg(&self) -> bool {
        self.content_type == "image/svg+xml"
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum RenderError {
    #[error(transparent)]
    Label(#[from] LabelError),
    #[cfg(feature = "png")]
    #[error(transparent)]
    Raster(#[from] RasterError),
}

impl RenderError {
    pub(crate) fn is_missing_tire_class(&self) -> bool {
        matches!(self, RenderError::Label(LabelError::MissingTireClass))
    }
}

/// One label request under construction.
#[derive(Debug)]
pub(crate) struct LabelRequest {
    pub(crate) record: LabelRecord,
    pub(crate) regulation: Regulation,
    pub(crate) output: Output,
    /// Diagnostics collected while populating and rendering.
    pub(crate) issues: Vec<Diagnostic>,
    tire_class_span: Option<Span>,
}

impl LabelRequest {
    pub(crate) fn new(regulation: Regulation) -> Self {
        Self {
            record: LabelRecord::new(),
            regulation,
            output: Output::Svg,
            issues: Vec::new(),
            tire_class_span: None,
        }
    }

    /// Parse `raw` into `field`. Later values overwrite earlier ones.
    pub(crate) fn set(&mut self, field: Field, raw: &str, span: Option<Span>) {
        if field == Field::TireClass {
            self.tire_class_span = span;
        }
        self.record.set_field(field, raw, span, &mut self.issues);
    }

    /// Select the regulation by name, keeping the current one if unknown.
    pub(crate) fn set_regulation(&mut self, raw: &str, span: Option<Span>) {
        match raw.parse() {
            Ok(regulation) => self.regulation = regulation,
            Err(e) => self.issues.push(
                Diagnostic::warn(codes::INVALID_REGULATION, e.to_string(), span).with_context(
                    BTreeMap::from([
                        ("value".into(), raw.into()),
                        ("using".into(), self.regulation.name().into()),
                    ]),
                ),
            ),
        }
    }

    /// Request PNG output of `WIDTH[xHEIGHT]`; malformed sizes fall back to
    /// the label's own size.
    #[cfg(feature = "png")]
    pub(crate) fn request_png(&mut self, size: &str, span: Option<Span>) {
        let dims = Dimensions::parse(size).unwrap_or_else(|_| {
            self.issues.push(
                Diagnostic::warn(
                    codes::INVALID_DIMENSIONS,
                    format!("invalid PNG dimensions: {size}"),
                    span,
                )
                .with_context(BTreeMap::from([("value".into(), size.into())])),
            );
            Dimensions::default()
        });
        self.output = Output::Png(dims);
    }

    /// Compose the label and encode it in the requested format.
    ///
    /// A missing tire class adds a `TIRE_CLASS_REQUIRED` error to `issues`.
    pub(crate) fn render(&mut self) -> Result<Rendered, RenderError> {
        self.record.sanitize(&mut self.issues);
        let svg = match self.regulation.compose(&self.record) {
            Ok(svg) => svg,
            Err(LabelError::MissingTireClass) => {
                self.issues.push(Diagnostic::error(
                    codes::TIRE_CLASS_REQUIRED,
                    "tire class is required",
                    self.tire_class_span,
                ));
                return Err(LabelError::MissingTireClass.into());
            }
            Err(e) => return Err(e.into()),
        };

        match self.output {
            Output::Svg => Ok(Rendered {
                content_type: "image/svg+xml",
                body: svg.into_bytes(),
            }),
            #[cfg(feature = "png")]
            Output::Png(dims) => {
                let options = RasterOptions::default().with_dimensions(dims);
                Ok(Rendered {
                    content_type: "image/png",
                    body: svg_to_png(&svg, &options)?,
                })
            }
        }
    }
}
