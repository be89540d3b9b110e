//! Label rendering errors.

use crate::qr::QrError;
use crate::template::TemplateError;

/// Failure to compose a label document.
///
/// Every variant is fatal for the render call: no partial document is
/// returned, and retrying with the same record fails the same way.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// The record has no valid tire class.
    #[error("tire class is required")]
    MissingTireClass,

    /// Template substitution failed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The QR code target could not be encoded.
    #[error(transparent)]
    QrCode(#[from] QrError),
}
