//! Label composers: stamp a [`LabelRecord`] into a regulation's SVG template.

/// EC 1222/2009 label composer.
pub mod ec_1222_2009;
/// EU 2020/740 label composer.
pub mod eu_2020_740;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::LabelError;
use crate::label::LabelRecord;

pub use ec_1222_2009::compose_ec;
pub use eu_2020_740::compose_eu;

/// SVG `display` value of a visible element.
pub const SHOW: &str = "inline";
/// SVG `display` value of a hidden element.
pub const HIDE: &str = "none";

pub(crate) fn display(visible: bool) -> &'static str {
    if visible { SHOW } else { HIDE }
}

/// Position of the class marker on a letter scale.
///
/// Scale tables are indexed by class ordinal; index 0 is the empty entry
/// used for an absent class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleMark {
    /// Letter printed inside the marker.
    pub letter: &'static str,
    /// Vertical offset of the marker from the top row of the scale.
    pub offset: u32,
}

impl ScaleMark {
    pub(crate) const fn new(letter: &'static str, offset: u32) -> Self {
        Self { letter, offset }
    }
}

/// Tire labelling regulation, selecting the label layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Regulation {
    /// Regulation (EC) No 1222/2009.
    #[serde(rename = "ec-1222-2009")]
    Ec1222_2009,
    /// Regulation (EU) 2020/740.
    #[default]
    #[serde(rename = "eu-2020-740")]
    Eu2020_740,
}

impl Regulation {
    /// Compose `record` into this regulation's label.
    pub fn compose(self, record: &LabelRecord) -> Result<String, LabelError> {
        match self {
            Regulation::Ec1222_2009 => compose_ec(record),
            Regulation::Eu2020_740 => compose_eu(record),
        }
    }

    /// Canonical name, e.g. `"eu-2020-740"`.
    pub fn name(self) -> &'static str {
        match self {
            Regulation::Ec1222_2009 => "ec-1222-2009",
            Regulation::Eu2020_740 => "eu-2020-740",
        }
    }
}

impl fmt::Display for Regulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a regulation name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown regulation: {0} (expected ec-1222-2009 or eu-2020-740)")]
pub struct UnknownRegulation(pub String);

impl FromStr for Regulation {
    type Err = UnknownRegulation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ec" | "ec-1222-2009" | "1222/2009" | "2009" => Ok(Regulation::Ec1222_2009),
            "eu" | "eu-2020-740" | "2020/740" | "2020" => Ok(Regulation::Eu2020_740),
            _ => Err(UnknownRegulation(s.to_string())),
        }
    }
}
