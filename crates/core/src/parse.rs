//! Field parsers: raw request tokens to typed label field values.
//!
//! Parsers never fail. Invalid input yields the field's sentinel value and
//! appends a warning to the caller's diagnostic sink.
//!
//! Numbers are read with C `atoi` semantics: leading whitespace and sign are
//! accepted, parsing stops at the first non-digit, and a token without
//! leading digits reads as 0.

use crate::diag::{Diagnostic, codes};
use crate::label::{
    Field, FuelEfficiencyClass, Grade, RollingNoiseClass, TireClass, WetGripClass,
};

/// Lowest accepted rolling noise value in dB.
pub const ROLLING_NOISE_DB_MIN: u32 = 10;
/// Highest accepted rolling noise value in dB.
pub const ROLLING_NOISE_DB_MAX: u32 = 120;

/// Parse a tire class: `1`, `2` or `3`.
pub fn parse_tire_class(s: &str, issues: &mut Vec<Diagnostic>) -> TireClass {
    if let Some(class) = TireClass::from_ordinal(leading_int(s)) {
        return class;
    }
    issues.push(invalid(
        codes::INVALID_TIRE_CLASS,
        Field::TireClass,
        "tire class",
        s,
    ));
    TireClass::Error
}

/// Parse a fuel efficiency class: `1`-`7` or `A`-`G`.
pub fn parse_fuel_efficiency_class(s: &str, issues: &mut Vec<Diagnostic>) -> FuelEfficiencyClass {
    parse_grade(
        s,
        codes::INVALID_FUEL_EFFICIENCY,
        Field::FuelEfficiency,
        "fuel efficiency class",
        issues,
    )
}

/// Parse a wet grip class: `1`-`7` or `A`-`G`.
pub fn parse_wet_grip_class(s: &str, issues: &mut Vec<Diagnostic>) -> WetGripClass {
    parse_grade(
        s,
        codes::INVALID_WET_GRIP,
        Field::WetGrip,
        "wet grip class",
        issues,
    )
}

/// Parse an external rolling noise class: `1`-`3` or `A`-`C`.
pub fn parse_rolling_noise_class(s: &str, issues: &mut Vec<Diagnostic>) -> RollingNoiseClass {
    let class = RollingNoiseClass::from_ordinal(leading_int(s))
        .or_else(|| letter_ordinal(s).and_then(RollingNoiseClass::from_ordinal));
    match class {
        Some(class) => class,
        None => {
            issues.push(invalid(
                codes::INVALID_ROLLING_NOISE_CLASS,
                Field::RollingNoise,
                "rolling noise class",
                s,
            ));
            RollingNoiseClass::None
        }
    }
}

/// Parse an external rolling noise value in dB, 10-120 inclusive.
///
/// Returns 0 ("not provided") for anything else.
pub fn parse_rolling_noise_db(s: &str, issues: &mut Vec<Diagnostic>) -> u32 {
    let value = leading_int(s);
    match u32::try_from(value) {
        Ok(db) if (ROLLING_NOISE_DB_MIN..=ROLLING_NOISE_DB_MAX).contains(&db) => db,
        _ => {
            issues.push(invalid(
                codes::INVALID_ROLLING_NOISE_DB,
                Field::RollingNoiseDb,
                "rolling noise dB value",
                s,
            ));
            0
        }
    }
}

/// Parse a presence flag such as snow or ice grip.
///
/// Accepts `yes/no`, `true/false`, `on/off`, `y/n` (any case), an empty
/// token (false) and integers (non-zero is true).
pub fn parse_flag(name: &str, s: &str, issues: &mut Vec<Diagnostic>) -> bool {
    let t = s.trim();
    if t.is_empty() {
        return false;
    }
    match t.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "on" => return true,
        "n" | "no" | "false" | "off" => return false,
        _ => {}
    }
    if starts_with_int(t) {
        return leading_int(t) != 0;
    }
    issues.push(
        Diagnostic::warn(
            codes::INVALID_FLAG,
            format!("invalid {name} flag: {s}"),
            None,
        )
        .with_context(ctx!("field" => name, "value" => s)),
    );
    false
}

fn parse_grade(
    s: &str,
    code: &'static str,
    field: Field,
    what: &str,
    issues: &mut Vec<Diagnostic>,
) -> Grade {
    let grade = Grade::from_ordinal(leading_int(s))
        .or_else(|| letter_ordinal(s).and_then(Grade::from_ordinal));
    match grade {
        Some(grade) => grade,
        None => {
            issues.push(invalid(code, field, what, s));
            Grade::None
        }
    }
}

/// Warning for a rejected token; `what` names the field in the message,
/// the context carries its [`Field::name`].
fn invalid(code: &'static str, field: Field, what: &str, value: &str) -> Diagnostic {
    Diagnostic::warn(code, format!("invalid {what}: {value}"), None)
        .with_context(ctx!("field" => field.name(), "value" => value))
}

/// Ordinal of a single-letter token, `a`/`A` being 1.
fn letter_ordinal(s: &str) -> Option<i64> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some(i64::from(c.to_ascii_lowercase() as u8 - b'a') + 1)
        }
        _ => None,
    }
}

fn starts_with_int(s: &str) -> bool {
    let s = s.trim_start();
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    s.starts_with(|c: char| c.is_ascii_digit())
}

/// Leading integer of `s`, `atoi` style. Saturates instead of overflowing.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if negative { -value } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet<T>(f: impl FnOnce(&mut Vec<Diagnostic>) -> T) -> (T, Vec<Diagnostic>) {
        let mut issues = Vec::new();
        let v = f(&mut issues);
        (v, issues)
    }

    // ── leading_int ─────────────────────────────────────────────────────

    #[test]
    fn leading_int_matches_atoi() {
        assert_eq!(leading_int("42"), 42);
        assert_eq!(leading_int("  7dB"), 7);
        assert_eq!(leading_int("-3"), -3);
        assert_eq!(leading_int("+5"), 5);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int(""), 0);
        assert_eq!(leading_int("99999999999999999999999"), i64::MAX);
    }

    // ── tire class ──────────────────────────────────────────────────────

    #[test]
    fn tire_class_valid() {
        assert_eq!(quiet(|i| parse_tire_class("1", i)).0, TireClass::C1);
        assert_eq!(quiet(|i| parse_tire_class("2", i)).0, TireClass::C2);
        assert_eq!(quiet(|i| parse_tire_class("3", i)).0, TireClass::C3);
    }

    #[test]
    fn tire_class_rejects_out_of_range_and_text() {
        for s in ["0", "4", "abc", "", "-1"] {
            let (class, issues) = quiet(|i| parse_tire_class(s, i));
            assert_eq!(class, TireClass::Error, "input {s:?}");
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].id, codes::INVALID_TIRE_CLASS);
        }
    }

    #[test]
    fn tire_class_has_no_letter_form() {
        assert_eq!(quiet(|i| parse_tire_class("a", i)).0, TireClass::Error);
    }

    // ── grades ──────────────────────────────────────────────────────────

    #[test]
    fn fuel_efficiency_numeral_and_letter_agree() {
        for (n, letter) in ('a'..='g').enumerate() {
            let numeral = (n + 1).to_string();
            let (a, ia) = quiet(|i| parse_fuel_efficiency_class(&numeral, i));
            let (b, ib) = quiet(|i| parse_fuel_efficiency_class(&letter.to_string(), i));
            let (c, ic) =
                quiet(|i| parse_fuel_efficiency_class(&letter.to_ascii_uppercase().to_string(), i));
            assert_eq!(a, b);
            assert_eq!(a, c);
            assert_eq!(a.ordinal(), n + 1);
            assert!(ia.is_empty() && ib.is_empty() && ic.is_empty());
        }
    }

    #[test]
    fn wet_grip_numeral_and_letter_agree() {
        assert_eq!(quiet(|i| parse_wet_grip_class("3", i)).0, Grade::C);
        assert_eq!(quiet(|i| parse_wet_grip_class("C", i)).0, Grade::C);
        assert_eq!(quiet(|i| parse_wet_grip_class("c", i)).0, Grade::C);
    }

    #[test]
    fn grade_rejections_warn_and_return_none() {
        for s in ["0", "8", "h", "AB", "", "é"] {
            let (g, issues) = quiet(|i| parse_wet_grip_class(s, i));
            assert_eq!(g, Grade::None, "input {s:?}");
            assert_eq!(issues[0].id, codes::INVALID_WET_GRIP);
        }
        let (_, issues) = quiet(|i| parse_fuel_efficiency_class("z", i));
        assert_eq!(issues[0].id, codes::INVALID_FUEL_EFFICIENCY);
    }

    #[test]
    fn grade_ignores_trailing_content_after_number() {
        assert_eq!(quiet(|i| parse_fuel_efficiency_class("2x", i)).0, Grade::B);
    }

    // ── rolling noise ───────────────────────────────────────────────────

    #[test]
    fn rolling_noise_class_numeral_and_letter() {
        assert_eq!(
            quiet(|i| parse_rolling_noise_class("1", i)).0,
            RollingNoiseClass::A
        );
        assert_eq!(
            quiet(|i| parse_rolling_noise_class("b", i)).0,
            RollingNoiseClass::B
        );
        assert_eq!(
            quiet(|i| parse_rolling_noise_class("C", i)).0,
            RollingNoiseClass::C
        );
        let (class, issues) = quiet(|i| parse_rolling_noise_class("d", i));
        assert_eq!(class, RollingNoiseClass::None);
        assert_eq!(issues[0].id, codes::INVALID_ROLLING_NOISE_CLASS);
    }

    #[test]
    fn rolling_noise_db_bounds() {
        assert_eq!(quiet(|i| parse_rolling_noise_db("10", i)).0, 10);
        assert_eq!(quiet(|i| parse_rolling_noise_db("120", i)).0, 120);
        assert_eq!(quiet(|i| parse_rolling_noise_db("72dB", i)).0, 72);
        for s in ["9", "121", "-70", "loud"] {
            let (db, issues) = quiet(|i| parse_rolling_noise_db(s, i));
            assert_eq!(db, 0, "input {s:?}");
            assert_eq!(issues[0].id, codes::INVALID_ROLLING_NOISE_DB);
        }
    }

    // ── flags ───────────────────────────────────────────────────────────

    #[test]
    fn flags() {
        for s in ["1", "yes", "TRUE", "on", "Y", "2"] {
            let (v, issues) = quiet(|i| parse_flag("snow-grip", s, i));
            assert!(v, "input {s:?}");
            assert!(issues.is_empty());
        }
        for s in ["0", "no", "False", "off", ""] {
            let (v, issues) = quiet(|i| parse_flag("snow-grip", s, i));
            assert!(!v, "input {s:?}");
            assert!(issues.is_empty());
        }
        let (v, issues) = quiet(|i| parse_flag("ice-grip", "maybe", i));
        assert!(!v);
        assert_eq!(issues[0].id, codes::INVALID_FLAG);
        assert_eq!(
            issues[0].context.as_ref().unwrap().get("field").unwrap(),
            "ice-grip"
        );
    }

    #[test]
    fn context_field_uses_field_names() {
        type Parser = fn(&str, &mut Vec<Diagnostic>);
        let cases: [(Parser, Field); 5] = [
            (|s, i| _ = parse_tire_class(s, i), Field::TireClass),
            (|s, i| _ = parse_fuel_efficiency_class(s, i), Field::FuelEfficiency),
            (|s, i| _ = parse_wet_grip_class(s, i), Field::WetGrip),
            (|s, i| _ = parse_rolling_noise_class(s, i), Field::RollingNoise),
            (|s, i| _ = parse_rolling_noise_db(s, i), Field::RollingNoiseDb),
        ];
        for (parse, field) in cases {
            let ((), issues) = quiet(|i| parse("?", i));
            assert_eq!(issues.len(), 1, "{field}");
            let context = issues[0].context.as_ref().unwrap();
            assert_eq!(context.get("field").map(String::as_str), Some(field.name()));
            assert_eq!(context.get("value").map(String::as_str), Some("?"));
        }
    }
}
