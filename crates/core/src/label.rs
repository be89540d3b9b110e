//! Label data model: the record describing one tire label and its field types.

use std::fmt;

use serde::Serialize;

use crate::diag::{Diagnostic, Span, codes};
use crate::parse;
use crate::sanitize::sanitize;

/// Maximum visible characters of the trademark, tire type and tire size.
pub const TEXT_MAX_CHARS: usize = 31;
/// Maximum characters of the QR code target (registry URL).
pub const QRCODE_MAX_CHARS: usize = 63;

/// Tire class. [`TireClass::Error`] is the unset sentinel and aborts rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TireClass {
    /// No valid tire class was given.
    #[default]
    Error,
    /// Passenger car tires.
    C1,
    /// Light commercial vehicle tires.
    C2,
    /// Heavy commercial vehicle tires.
    C3,
}

impl TireClass {
    /// Map an ordinal 1-3 onto a class.
    pub fn from_ordinal(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::C1),
            2 => Some(Self::C2),
            3 => Some(Self::C3),
            _ => None,
        }
    }

    /// Ordinal of the class; 0 for the sentinel.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Code printed on the label (`"C1"`..`"C3"`), empty for the sentinel.
    pub fn code(self) -> &'static str {
        match self {
            Self::Error => "",
            Self::C1 => "C1",
            Self::C2 => "C2",
            Self::C3 => "C3",
        }
    }
}

/// Fuel efficiency or wet grip class, A (best) to G.
///
/// [`Grade::None`] omits the pictogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    /// Class not provided.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Class A.
    A,
    /// Class B.
    B,
    /// Class C.
    C,
    /// Class D.
    D,
    /// Class E.
    E,
    /// Class F.
    F,
    /// Class G.
    G,
}

/// Fuel efficiency class.
pub type FuelEfficiencyClass = Grade;
/// Wet grip class.
pub type WetGripClass = Grade;

impl Grade {
    const ALL: [Grade; 7] = [
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
        Grade::G,
    ];

    /// Map an ordinal 1-7 onto a class.
    pub fn from_ordinal(n: i64) -> Option<Self> {
        let idx = usize::try_from(n).ok()?.checked_sub(1)?;
        Self::ALL.get(idx).copied()
    }

    /// Ordinal of the class (1-7); 0 for [`Grade::None`].
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// External rolling noise class.
///
/// Rendered as one to three sound waves on EC 1222/2009 labels and as the
/// A/B/C noise bar on EU 2020/740 labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RollingNoiseClass {
    /// Class not provided.
    #[default]
    #[serde(rename = "none")]
    None,
    /// Class 1 / A (quietest).
    A,
    /// Class 2 / B.
    B,
    /// Class 3 / C.
    C,
}

impl RollingNoiseClass {
    /// Map an ordinal 1-3 onto a class.
    pub fn from_ordinal(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::A),
            2 => Some(Self::B),
            3 => Some(Self::C),
            _ => None,
        }
    }

    /// Ordinal of the class (1-3); 0 for [`RollingNoiseClass::None`].
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// Free text holding at most `N` characters.
///
/// Assignment truncates on a character boundary instead of overflowing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoundedText<const N: usize>(String);

impl<const N: usize> BoundedText<N> {
    /// Build from `text`, truncating to `N` characters.
    pub fn new(text: &str) -> Self {
        let mut out = Self::default();
        out.set(text);
        out
    }

    /// Replace the content. Returns `true` when `text` had to be truncated.
    pub fn set(&mut self, text: &str) -> bool {
        match text.char_indices().nth(N) {
            Some((cut, _)) => {
                self.0 = text[..cut].to_string();
                true
            }
            None => {
                self.0 = text.to_string();
                false
            }
        }
    }

    /// Text content.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Maximum number of characters.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> fmt::Display for BoundedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One label instance.
///
/// Constructed with every field unset (`Default`), populated field by field
/// through [`LabelRecord::set_field`], then handed read-only to a composer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelRecord {
    /// Trademark of the tire supplier.
    pub trademark: BoundedText<TEXT_MAX_CHARS>,
    /// Commercial tire type designation.
    pub tire_type: BoundedText<TEXT_MAX_CHARS>,
    /// Tire size designation.
    pub tire_size: BoundedText<TEXT_MAX_CHARS>,
    /// Text encoded in the QR code (registry URL).
    pub qrcode_target: BoundedText<QRCODE_MAX_CHARS>,
    /// Tire class; the only required field.
    pub tire_class: TireClass,
    /// Fuel efficiency class.
    pub fuel_efficiency: FuelEfficiencyClass,
    /// Wet grip class.
    pub wet_grip: WetGripClass,
    /// External rolling noise class.
    pub rolling_noise: RollingNoiseClass,
    /// External rolling noise in dB (10-120), 0 when not provided.
    pub rolling_noise_db: u32,
    /// Snow grip pictogram present.
    pub snow_grip: bool,
    /// Ice grip pictogram present.
    pub ice_grip: bool,
}

/// A settable label field, addressed by its single-letter request key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Field {
    /// `C`: tire class.
    TireClass,
    /// `F`: fuel efficiency class.
    FuelEfficiency,
    /// `G`: wet grip class.
    WetGrip,
    /// `R`: external rolling noise class.
    RollingNoise,
    /// `N`: external rolling noise in dB.
    RollingNoiseDb,
    /// `S`: snow grip flag.
    SnowGrip,
    /// `I`: ice grip flag.
    IceGrip,
    /// `M`: trademark.
    Trademark,
    /// `T`: tire type.
    TireType,
    /// `D`: tire size (dimension).
    TireSize,
    /// `Q`: QR code target.
    QrcodeTarget,
}

impl Field {
    /// Every field, in command-line order.
    pub const ALL: [Field; 11] = [
        Field::TireClass,
        Field::FuelEfficiency,
        Field::WetGrip,
        Field::RollingNoise,
        Field::RollingNoiseDb,
        Field::SnowGrip,
        Field::IceGrip,
        Field::Trademark,
        Field::TireType,
        Field::TireSize,
        Field::QrcodeTarget,
    ];

    /// Look up a field by its request key (case-insensitive).
    pub fn from_key(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        Self::ALL
            .into_iter()
            .find(|f| f.key() == c.to_ascii_uppercase())
    }

    /// Single-letter request key.
    pub fn key(self) -> char {
        match self {
            Field::TireClass => 'C',
            Field::FuelEfficiency => 'F',
            Field::WetGrip => 'G',
            Field::RollingNoise => 'R',
            Field::RollingNoiseDb => 'N',
            Field::SnowGrip => 'S',
            Field::IceGrip => 'I',
            Field::Trademark => 'M',
            Field::TireType => 'T',
            Field::TireSize => 'D',
            Field::QrcodeTarget => 'Q',
        }
    }

    /// Kebab-case name, as used for long command-line options.
    pub fn name(self) -> &'static str {
        match self {
            Field::TireClass => "tire-class",
            Field::FuelEfficiency => "fuel-efficiency",
            Field::WetGrip => "wet-grip",
            Field::RollingNoise => "rolling-noise",
            Field::RollingNoiseDb => "rolling-noise-db",
            Field::SnowGrip => "snow-grip",
            Field::IceGrip => "ice-grip",
            Field::Trademark => "trademark",
            Field::TireType => "tire-type",
            Field::TireSize => "tire-size",
            Field::QrcodeTarget => "qrcode",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl LabelRecord {
    /// Create an empty record with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the record carries the required tire class.
    pub fn has_tire_class(&self) -> bool {
        self.tire_class != TireClass::Error
    }

    /// Parse `raw` into `field`.
    ///
    /// Invalid input stores the field's sentinel and appends a warning to
    /// `issues`; `span` locates `raw` in the request input, if known.
    pub fn set_field(
        &mut self,
        field: Field,
        raw: &str,
        span: Option<Span>,
        issues: &mut Vec<Diagnostic>,
    ) {
        let first_new = issues.len();
        match field {
            Field::TireClass => self.tire_class = parse::parse_tire_class(raw, issues),
            Field::FuelEfficiency => {
                self.fuel_efficiency = parse::parse_fuel_efficiency_class(raw, issues)
            }
            Field::WetGrip => self.wet_grip = parse::parse_wet_grip_class(raw, issues),
            Field::RollingNoise => {
                self.rolling_noise = parse::parse_rolling_noise_class(raw, issues)
            }
            Field::RollingNoiseDb => {
                self.rolling_noise_db = parse::parse_rolling_noise_db(raw, issues)
            }
            Field::SnowGrip => self.snow_grip = parse::parse_flag(field.name(), raw, issues),
            Field::IceGrip => self.ice_grip = parse::parse_flag(field.name(), raw, issues),
            Field::Trademark => set_text(&mut self.trademark, field, raw, issues),
            Field::TireType => set_text(&mut self.tire_type, field, raw, issues),
            Field::TireSize => set_text(&mut self.tire_size, field, raw, issues),
            Field::QrcodeTarget => set_text(&mut self.qrcode_target, field, raw, issues),
        }
        if span.is_some() {
            for d in &mut issues[first_new..] {
                d.span = span;
            }
        }
    }

    /// Neutralize CDATA terminators in every free-text field.
    ///
    /// Emits one warning per field that had to be rewritten. Returns `true`
    /// if anything changed.
    pub fn sanitize(&mut self, issues: &mut Vec<Diagnostic>) -> bool {
        let mut changed = false;
        changed |= sanitize_text(&mut self.trademark, Field::Trademark, issues);
        changed |= sanitize_text(&mut self.tire_type, Field::TireType, issues);
        changed |= sanitize_text(&mut self.tire_size, Field::TireSize, issues);
        changed |= sanitize_text(&mut self.qrcode_target, Field::QrcodeTarget, issues);
        changed
    }
}

fn set_text<const N: usize>(
    text: &mut BoundedText<N>,
    field: Field,
    raw: &str,
    issues: &mut Vec<Diagnostic>,
) {
    if text.set(raw) {
        issues.push(
            Diagnostic::warn(
                codes::TEXT_TRUNCATED,
                format!("{field} truncated to {N} characters: {raw}"),
                None,
            )
            .with_context(ctx!("field" => field.name(), "max" => N.to_string())),
        );
    }
}

fn sanitize_text<const N: usize>(
    text: &mut BoundedText<N>,
    field: Field,
    issues: &mut Vec<Diagnostic>,
) -> bool {
    let changed = sanitize(&mut text.0);
    if changed {
        issues.push(
            Diagnostic::warn(
                codes::TEXT_SANITIZED,
                format!("{field} contains a CDATA terminator, rewritten to: {text}"),
                None,
            )
            .with_context(ctx!("field" => field.name())),
        );
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_all_sentinels() {
        let r = LabelRecord::new();
        assert_eq!(r.tire_class, TireClass::Error);
        assert_eq!(r.fuel_efficiency, Grade::None);
        assert_eq!(r.wet_grip, Grade::None);
        assert_eq!(r.rolling_noise, RollingNoiseClass::None);
        assert_eq!(r.rolling_noise_db, 0);
        assert!(!r.snow_grip && !r.ice_grip);
        assert!(r.trademark.is_empty() && r.qrcode_target.is_empty());
        assert!(!r.has_tire_class());
    }

    #[test]
    fn ordinals_match_regulation_numbering() {
        assert_eq!(TireClass::C3.ordinal(), 3);
        assert_eq!(Grade::None.ordinal(), 0);
        assert_eq!(Grade::G.ordinal(), 7);
        assert_eq!(Grade::from_ordinal(3), Some(Grade::C));
        assert_eq!(Grade::from_ordinal(0), None);
        assert_eq!(Grade::from_ordinal(8), None);
        assert_eq!(Grade::from_ordinal(-1), None);
        assert_eq!(RollingNoiseClass::from_ordinal(2), Some(RollingNoiseClass::B));
    }

    #[test]
    fn bounded_text_truncates_on_char_boundary() {
        let mut t = BoundedText::<3>::default();
        assert!(!t.set("abc"));
        assert_eq!(t.as_str(), "abc");
        assert!(t.set("€uro"));
        assert_eq!(t.as_str(), "€ur");
        assert_eq!(t.capacity(), 3);
    }

    #[test]
    fn field_keys_are_case_insensitive() {
        assert_eq!(Field::from_key("c"), Some(Field::TireClass));
        assert_eq!(Field::from_key("Q"), Some(Field::QrcodeTarget));
        assert_eq!(Field::from_key("x"), None);
        assert_eq!(Field::from_key("CC"), None);
        assert_eq!(Field::from_key(""), None);
    }

    #[test]
    fn set_field_stamps_span_on_warnings() {
        let mut r = LabelRecord::new();
        let mut issues = Vec::new();
        r.set_field(Field::WetGrip, "z", Some(Span::new(4, 5)), &mut issues);
        assert_eq!(r.wet_grip, Grade::None);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, codes::INVALID_WET_GRIP);
        assert_eq!(issues[0].span, Some(Span::new(4, 5)));
    }

    #[test]
    fn set_field_truncates_long_text() {
        let mut r = LabelRecord::new();
        let mut issues = Vec::new();
        let long = "x".repeat(40);
        r.set_field(Field::Trademark, &long, None, &mut issues);
        assert_eq!(r.trademark.as_str().len(), TEXT_MAX_CHARS);
        assert_eq!(issues[0].id, codes::TEXT_TRUNCATED);
    }

    #[test]
    fn record_serializes_with_sentinel_names() {
        let empty = serde_json::to_value(LabelRecord::new()).unwrap();
        assert_eq!(empty["tire_class"], "error");
        assert_eq!(empty["fuel_efficiency"], "none");
        assert_eq!(empty["rolling_noise"], "none");
        assert_eq!(empty["trademark"], "");

        let mut r = LabelRecord::new();
        let mut issues = Vec::new();
        for (field, raw) in [
            (Field::TireClass, "2"),
            (Field::WetGrip, "b"),
            (Field::RollingNoise, "3"),
            (Field::RollingNoiseDb, "71"),
            (Field::IceGrip, "yes"),
            (Field::Trademark, "Acme"),
        ] {
            r.set_field(field, raw, None, &mut issues);
        }
        assert!(issues.is_empty());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["tire_class"], "c2");
        assert_eq!(json["wet_grip"], "B");
        assert_eq!(json["rolling_noise"], "C");
        assert_eq!(json["rolling_noise_db"], 71);
        assert_eq!(json["ice_grip"], true);
        assert_eq!(json["trademark"], "Acme");
    }

    #[test]
    fn sanitize_reports_each_changed_field() {
        let mut r = LabelRecord::new();
        let mut issues = Vec::new();
        r.set_field(Field::Trademark, "Acme]]>", None, &mut issues);
        r.set_field(Field::TireSize, "205/55 R16", None, &mut issues);
        assert!(issues.is_empty());
        assert!(r.sanitize(&mut issues));
        assert_eq!(r.trademark.as_str(), "Acme]|>");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, codes::TEXT_SANITIZED);
        assert!(!r.sanitize(&mut issues));
    }
}
