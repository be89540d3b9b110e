//! QR code module grids and their conversion to SVG path data.

use qrcode::types::QrError as EncoderError;
use qrcode::{Color, EcLevel, QrCode, Version};

/// QR encoding failure.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    /// The text does not fit into the requested symbol version.
    #[error("QR code version {version} cannot hold {len} bytes of text")]
    Capacity {
        /// Requested symbol version.
        version: i16,
        /// Length of the rejected text in bytes.
        len: usize,
    },
    /// The encoder rejected the input for another reason.
    #[error("QR code encoding failed: {0}")]
    Encode(String),
}

/// Square grid of QR modules, `true` meaning dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    width: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Build a grid from row-major modules. Returns `None` unless
    /// `modules.len() == width * width`.
    pub fn new(width: usize, modules: Vec<bool>) -> Option<Self> {
        (width.checked_mul(width)? == modules.len()).then_some(Self { width, modules })
    }

    /// Encode `text` as a QR symbol of the given version with low error
    /// correction.
    pub fn encode(text: &str, version: i16) -> Result<Self, QrError> {
        let code = QrCode::with_version(text.as_bytes(), Version::Normal(version), EcLevel::L)
            .map_err(|e| match e {
                EncoderError::DataTooLong => QrError::Capacity {
                    version,
                    len: text.len(),
                },
                other => QrError::Encode(other.to_string()),
            })?;
        let width = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(Self { width, modules })
    }

    /// Side length in modules.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the module at column `x`, row `y` is dark.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Convert to SVG path data, one unit square per module.
    ///
    /// Each column is run-length encoded: every maximal vertical run of dark
    /// modules becomes one `M x,y h1 v<len> h-1 z` rectangle.
    pub fn to_path(&self) -> String {
        let mut path = String::new();
        for x in 0..self.width {
            let mut y = 0;
            while y < self.width {
                if !self.is_dark(x, y) {
                    y += 1;
                    continue;
                }
                let start = y;
                while y < self.width && self.is_dark(x, y) {
                    y += 1;
                }
                path.push_str(&format!("M{x},{start}h1v{}h-1z", y - start));
            }
        }
        path
    }
}
