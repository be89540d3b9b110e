use super::{ScaleMark, display};
use crate::error::LabelError;
use crate::label::{LabelRecord, TireClass};
use crate::template::Template;

const TEMPLATE: &str = include_str!("../../templates/ec-1222-2009.svg");

/// Fuel efficiency and wet grip scales share the same A-G geometry.
pub const SCALE: [ScaleMark; 8] = [
    ScaleMark::new("", 0),
    ScaleMark::new("A", 0),
    ScaleMark::new("B", 22),
    ScaleMark::new("C", 44),
    ScaleMark::new("D", 66),
    ScaleMark::new("E", 88),
    ScaleMark::new("F", 110),
    ScaleMark::new("G", 132),
];

/// Sound wave toggles of the noise pictogram, quietest first.
const NOISE_WAVES: [&str; 3] = ["{{RN_WAVE_1}}", "{{RN_WAVE_2}}", "{{RN_WAVE_3}}"];

/// Render an EC 1222/2009 label.
pub fn compose_ec(record: &LabelRecord) -> Result<String, LabelError> {
    if record.tire_class == TireClass::Error {
        return Err(LabelError::MissingTireClass);
    }

    let mut doc = Template::new(TEMPLATE)?;
    doc.fill("{{TIRE_CLASS}}", record.tire_class.code())?;

    let fe = SCALE[record.fuel_efficiency.ordinal()];
    doc.fill("{{FE_DISPLAY}}", display(!fe.letter.is_empty()))?
        .fill("{{FE_Y}}", &fe.offset.to_string())?
        .fill("{{FE_LETTER}}", fe.letter)?;

    let wg = SCALE[record.wet_grip.ordinal()];
    doc.fill("{{WG_DISPLAY}}", display(!wg.letter.is_empty()))?
        .fill("{{WG_Y}}", &wg.offset.to_string())?
        .fill("{{WG_LETTER}}", wg.letter)?;

    // Class N shows the first N waves; waves at index >= N are hidden.
    let noise = record.rolling_noise.ordinal();
    doc.fill("{{RN_DISPLAY}}", display(noise != 0))?;
    for (idx, wave) in NOISE_WAVES.iter().enumerate() {
        doc.fill(wave, display(idx < noise))?;
    }

    let db = record.rolling_noise_db;
    let db_text = if db == 0 { String::new() } else { db.to_string() };
    doc.fill("{{RN_DB_DISPLAY}}", display(db != 0))?
        .fill("{{RN_DB}}", &db_text)?;

    Ok(doc.into_string())
}
