//! PNG rasterization of label SVG documents.
//!
//! The SVG is parsed with `usvg`, rendered with `resvg` into a `tiny-skia`
//! pixmap scaled to the requested size, and encoded as PNG.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::str::FromStr;

/// Largest accepted output side, in pixels.
pub const MAX_SIDE: u32 = 16_384;

/// Rasterization failure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RasterError {
    /// The document is not valid SVG.
    #[error("failed to parse SVG: {0}")]
    SvgParse(String),
    /// The output pixmap could not be allocated.
    #[error("failed to allocate {width}x{height} pixmap for raster rendering")]
    PixmapAlloc {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    PngEncode(String),
    /// The requested output size is malformed or out of range.
    #[error("invalid image size: {0}")]
    InvalidSize(String),
}

/// Result alias for rasterization.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Requested output size. A missing side is derived from the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Output width in pixels.
    pub width: Option<u32>,
    /// Output height in pixels.
    pub height: Option<u32>,
}

impl Dimensions {
    /// Parse `WIDTH[xHEIGHT]`, e.g. `"300"` or `"300X400"`.
    ///
    /// Either side may be empty or `0`, meaning "derive from the document".
    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let (w, h) = match lower.split_once('x') {
            Some((w, h)) => (w, Some(h)),
            None => (lower.as_str(), None),
        };
        let side = |part: &str| -> Result<Option<u32>> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            let n: u32 = part
                .parse()
                .map_err(|_| RasterError::InvalidSize(s.to_string()))?;
            Ok((n != 0).then_some(n))
        };
        Ok(Self {
            width: side(w)?,
            height: h.map(side).transpose()?.flatten(),
        })
    }

    /// Pixel size for a document of `doc_width` x `doc_height` user units.
    ///
    /// With one side given the other keeps the document's aspect ratio; with
    /// neither the document size is used as is.
    pub fn resolve(self, doc_width: f32, doc_height: f32) -> Result<(u32, u32)> {
        if !(doc_width.is_finite() && doc_height.is_finite() && doc_width > 0.0 && doc_height > 0.0)
        {
            return Err(RasterError::InvalidSize(format!(
                "document size {doc_width}x{doc_height}"
            )));
        }
        let (width, height) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, scaled(w, doc_height / doc_width)),
            (None, Some(h)) => (scaled(h, doc_width / doc_height), h),
            (None, None) => (doc_width.ceil() as u32, doc_height.ceil() as u32),
        };
        if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
            return Err(RasterError::InvalidSize(format!(
                "{width}x{height} (each side must be within 1-{MAX_SIDE})"
            )));
        }
        Ok((width, height))
    }
}

fn scaled(side: u32, ratio: f32) -> u32 {
    ((side as f32) * ratio).round().max(1.0) as u32
}

impl FromStr for Dimensions {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Rasterization settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RasterOptions {
    /// Output width in pixels (`None` = derive).
    pub width: Option<u32>,
    /// Output height in pixels (`None` = derive).
    pub height: Option<u32>,
    /// Background fill: `white`, `black`, `transparent` or `#rgb[a]`/`#rrggbb[aa]`.
    /// `None` leaves the background transparent.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: Some("white".to_string()),
        }
    }
}

impl RasterOptions {
    /// Apply a requested output size.
    pub fn with_dimensions(mut self, dims: Dimensions) -> Self {
        self.width = dims.width;
        self.height = dims.height;
        self
    }

    fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Render `svg` to PNG bytes.
pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options)?;
    pixmap
        .encode_png()
        .map_err(|e| RasterError::PngEncode(e.to_string()))
}

fn svg_to_pixmap(svg: &str, options: &RasterOptions) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RasterError::SvgParse(e.to_string()))?;
    let size = tree.size();
    let (width, height) = options
        .dimensions()
        .resolve(size.width(), size.height())?;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc { width, height })?;
    if let Some(color) = options.background.as_deref().and_then(parse_color) {
        pixmap.fill(color);
    }

    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

fn parse_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::WHITE),
        "black" => return Some(tiny_skia::Color::BLACK),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let digit = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    let [r, g, b, a] = match hex.len() {
        3 | 4 => {
            let mut c = [0xf_u8; 4];
            for (i, v) in c.iter_mut().enumerate().take(hex.len()) {
                *v = digit(i, 1)?;
            }
            c.map(|v| (v << 4) | v)
        }
        6 | 8 => {
            let mut c = [0xff_u8; 4];
            for (i, v) in c.iter_mut().enumerate().take(hex.len() / 2) {
                *v = digit(i * 2, 2)?;
            }
            c
        }
        _ => return None,
    };
    Some(tiny_skia::Color::from_rgba8(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 20"><rect x="0" y="10" width="10" height="10" fill="black"/></svg>"#;

    #[test]
    fn svg_to_png_produces_png_signature() {
        let bytes = svg_to_png(SQUARE, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn width_only_keeps_aspect_ratio() {
        let opts = RasterOptions::default().with_dimensions(Dimensions::parse("30").unwrap());
        let pixmap = svg_to_pixmap(SQUARE, &opts).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (30, 60));
    }

    #[test]
    fn background_is_white_by_default() {
        let pixmap = svg_to_pixmap(SQUARE, &RasterOptions::default()).unwrap();
        let top = pixmap.pixel(5, 2).unwrap();
        assert_eq!((top.red(), top.green(), top.blue(), top.alpha()), (255, 255, 255, 255));
        let bottom = pixmap.pixel(5, 15).unwrap();
        assert_eq!((bottom.red(), bottom.alpha()), (0, 255));
    }

    #[test]
    fn no_background_is_transparent() {
        let opts = RasterOptions {
            background: None,
            ..RasterOptions::default()
        };
        let pixmap = svg_to_pixmap(SQUARE, &opts).unwrap();
        assert_eq!(pixmap.pixel(5, 2).unwrap().alpha(), 0);
    }

    #[test]
    fn invalid_svg_is_reported() {
        let err = svg_to_png("not svg", &RasterOptions::default()).unwrap_err();
        assert!(matches!(err, RasterError::SvgParse(_)));
    }

    #[test]
    fn dimensions_parse() {
        let d = |w, h| Dimensions {
            width: w,
            height: h,
        };
        assert_eq!(Dimensions::parse("300").unwrap(), d(Some(300), None));
        assert_eq!(Dimensions::parse("300x400").unwrap(), d(Some(300), Some(400)));
        assert_eq!(Dimensions::parse("300X400").unwrap(), d(Some(300), Some(400)));
        assert_eq!(Dimensions::parse("x400").unwrap(), d(None, Some(400)));
        assert_eq!(Dimensions::parse("0x400").unwrap(), d(None, Some(400)));
        assert_eq!(Dimensions::parse("").unwrap(), Dimensions::default());
        assert!(Dimensions::parse("wide").is_err());
        assert!(Dimensions::parse("300x-1").is_err());
        assert!("120x".parse::<Dimensions>().is_ok());
    }

    #[test]
    fn dimensions_resolve() {
        let label = |s: &str| Dimensions::parse(s).unwrap().resolve(300.0, 480.0);
        assert_eq!(label("").unwrap(), (300, 480));
        assert_eq!(label("600").unwrap(), (600, 960));
        assert_eq!(label("x240").unwrap(), (150, 240));
        assert_eq!(label("100x100").unwrap(), (100, 100));
        assert_eq!(label("301").unwrap(), (301, 482));
        assert!(matches!(label("20000"), Err(RasterError::InvalidSize(_))));
    }

    #[test]
    fn colors() {
        let rgba = |s| parse_color(s).map(|c| c.to_color_u8());
        let white = rgba("white").unwrap();
        assert_eq!((white.red(), white.alpha()), (255, 255));
        let c = rgba("#0a0").unwrap();
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0, 0xaa, 0, 255));
        let c = rgba("#11223380").unwrap();
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0x11, 0x22, 0x33, 0x80));
        assert!(rgba("#12345").is_none());
        assert!(rgba("chartreuse").is_none());
    }
}
