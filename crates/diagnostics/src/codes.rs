//! Diagnostic ID constants.
//!
//! `TL1xxx` codes are recoverable field warnings: the offending value is
//! replaced by its sentinel and rendering continues. `TL2xxx` codes are
//! request errors that abort rendering.

/// Tire class token is not one of 1, 2 or 3.
pub const INVALID_TIRE_CLASS: &str = "TL1001";

/// Fuel efficiency class is neither 1-7 nor a letter A-G.
pub const INVALID_FUEL_EFFICIENCY: &str = "TL1002";

/// Wet grip class is neither 1-7 nor a letter A-G.
pub const INVALID_WET_GRIP: &str = "TL1003";

/// External rolling noise class is neither 1-3 nor a letter A-C.
pub const INVALID_ROLLING_NOISE_CLASS: &str = "TL1004";

/// External rolling noise value is outside 10-120 dB.
pub const INVALID_ROLLING_NOISE_DB: &str = "TL1005";

/// Snow or ice grip flag is not a recognizable boolean.
pub const INVALID_FLAG: &str = "TL1006";

/// Free text exceeded its length bound and was truncated.
pub const TEXT_TRUNCATED: &str = "TL1101";

/// Free text contained a CDATA terminator which was rewritten.
pub const TEXT_SANITIZED: &str = "TL1102";

/// Query string parameter is not recognized.
pub const UNKNOWN_PARAMETER: &str = "TL1201";

/// PNG dimensions are not in the `WIDTH[xHEIGHT]` format.
pub const INVALID_DIMENSIONS: &str = "TL1202";

/// Regulation name is not recognized; the current regulation is kept.
pub const INVALID_REGULATION: &str = "TL1203";

/// No valid tire class was given; the label cannot be rendered.
pub const TIRE_CLASS_REQUIRED: &str = "TL2001";

/// Every known diagnostic code, in ID order.
pub const ALL: &[&str] = &[
    INVALID_TIRE_CLASS,
    INVALID_FUEL_EFFICIENCY,
    INVALID_WET_GRIP,
    INVALID_ROLLING_NOISE_CLASS,
    INVALID_ROLLING_NOISE_DB,
    INVALID_FLAG,
    TEXT_TRUNCATED,
    TEXT_SANITIZED,
    UNKNOWN_PARAMETER,
    INVALID_DIMENSIONS,
    INVALID_REGULATION,
    TIRE_CLASS_REQUIRED,
];
