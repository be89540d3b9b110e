use super::{HIDE, ScaleMark, display};
use crate::error::LabelError;
use crate::label::{LabelRecord, TireClass};
use crate::qr::ModuleGrid;
use crate::sanitize::sanitized;
use crate::template::Template;

const TEMPLATE: &str = include_str!("../../templates/eu-2020-740.svg");

/// QR symbol version used for the registry link (29x29 modules).
pub const QR_VERSION: i16 = 3;

/// The A-E scale of this regulation. Legacy classes E, F and G all map to E.
pub const SCALE: [ScaleMark; 8] = [
    ScaleMark::new("", 0),
    ScaleMark::new("A", 0),
    ScaleMark::new("B", 26),
    ScaleMark::new("C", 52),
    ScaleMark::new("D", 78),
    ScaleMark::new("E", 104),
    ScaleMark::new("E", 104),
    ScaleMark::new("E", 104),
];

/// Which footer pictograms are present: bit 0 noise, bit 1 snow, bit 2 ice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterMask(u8);

impl FooterMask {
    /// Noise pictogram bit.
    pub const NOISE: u8 = 0b001;
    /// Snow grip pictogram bit.
    pub const SNOW: u8 = 0b010;
    /// Ice grip pictogram bit.
    pub const ICE: u8 = 0b100;

    /// Compute the mask for `record`.
    pub fn from_record(record: &LabelRecord) -> Self {
        let mut bits = 0;
        if record.rolling_noise.ordinal() != 0 || record.rolling_noise_db != 0 {
            bits |= Self::NOISE;
        }
        if record.snow_grip {
            bits |= Self::SNOW;
        }
        if record.ice_grip {
            bits |= Self::ICE;
        }
        Self(bits)
    }

    /// Raw mask value, 0-7.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `flag` is set.
    pub fn has(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    /// Horizontal placement of the footer pictograms for this mask.
    pub fn layout(self) -> FooterLayout {
        FOOTER_LAYOUTS[usize::from(self.0 & 0b111)]
    }
}

/// Horizontal offsets of the footer pictograms.
///
/// Offsets of absent pictograms are 0; the pictogram is hidden anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterLayout {
    /// Offset of the noise pictogram (110 units wide).
    pub noise_x: u32,
    /// Offset of the snow grip pictogram (60 units wide).
    pub snow_x: u32,
    /// Offset of the ice grip pictogram (60 units wide).
    pub ice_x: u32,
}

const fn layout(noise_x: u32, snow_x: u32, ice_x: u32) -> FooterLayout {
    FooterLayout {
        noise_x,
        snow_x,
        ice_x,
    }
}

/// Footer layouts indexed by [`FooterMask`]; present pictograms are centred
/// on the 300 unit wide label with 20 units between neighbours.
pub const FOOTER_LAYOUTS: [FooterLayout; 8] = [
    layout(0, 0, 0),
    layout(95, 0, 0),
    layout(0, 120, 0),
    layout(55, 185, 0),
    layout(0, 0, 120),
    layout(55, 0, 185),
    layout(0, 80, 160),
    layout(15, 145, 225),
];

/// Noise bar toggles, one per class A-C.
const NOISE_CLASSES: [&str; 3] = ["{{RN_CLASS_A}}", "{{RN_CLASS_B}}", "{{RN_CLASS_C}}"];

/// Render an EU 2020/740 label.
pub fn compose_eu(record: &LabelRecord) -> Result<String, LabelError> {
    if record.tire_class == TireClass::Error {
        return Err(LabelError::MissingTireClass);
    }

    let mut doc = Template::new(TEMPLATE)?;
    doc.fill("{{TIRE_CLASS}}", record.tire_class.code())?;

    if record.qrcode_target.is_empty() {
        doc.fill("{{QRCODE_DISPLAY}}", HIDE)?
            .fill("{{QRCODE_PATH}}", "")?;
    } else {
        let grid = ModuleGrid::encode(&sanitized(record.qrcode_target.as_str()), QR_VERSION)?;
        doc.fill("{{QRCODE_DISPLAY}}", display(true))?
            .fill("{{QRCODE_PATH}}", &grid.to_path())?;
    }

    let fe = SCALE[record.fuel_efficiency.ordinal()];
    doc.fill("{{FE_DISPLAY}}", display(!fe.letter.is_empty()))?
        .fill("{{FE_Y}}", &fe.offset.to_string())?
        .fill("{{FE_LETTER}}", fe.letter)?;

    let wg = SCALE[record.wet_grip.ordinal()];
    doc.fill("{{WG_DISPLAY}}", display(!wg.letter.is_empty()))?
        .fill("{{WG_Y}}", &wg.offset.to_string())?
        .fill("{{WG_LETTER}}", wg.letter)?;

    let mask = FooterMask::from_record(record);
    let footer = mask.layout();

    let db = record.rolling_noise_db;
    let db_text = if db == 0 { String::new() } else { db.to_string() };
    doc.fill("{{RN_DISPLAY}}", display(mask.has(FooterMask::NOISE)))?
        .fill("{{RN_X}}", &footer.noise_x.to_string())?
        .fill("{{RN_DB_DISPLAY}}", display(db != 0))?
        .fill("{{RN_DB}}", &db_text)?;
    let noise = record.rolling_noise.ordinal();
    for (idx, class) in NOISE_CLASSES.iter().enumerate() {
        doc.fill(class, display(idx + 1 == noise))?;
    }

    doc.fill("{{SNOW_DISPLAY}}", display(mask.has(FooterMask::SNOW)))?
        .fill("{{SNOW_X}}", &footer.snow_x.to_string())?
        .fill("{{ICE_DISPLAY}}", display(mask.has(FooterMask::ICE)))?
        .fill("{{ICE_X}}", &footer.ice_x.to_string())?;

    // User text last, in one pass, so it is never scanned for placeholders.
    let trademark = sanitized(record.trademark.as_str());
    let tire_type = sanitized(record.tire_type.as_str());
    let tire_size = sanitized(record.tire_size.as_str());
    doc.fill_each(&[
        ("{{TRADEMARK}}", &*trademark),
        ("{{TIRE_TYPE}}", &*tire_type),
        ("{{TIRE_SIZE}}", &*tire_size),
    ])?;

    Ok(doc.into_string())
}
