//! Canonical lexical forms for the xsd datatypes with native encodings.
//!
//! Every `parse_*` function accepts exactly what its `format_*` counterpart
//! produces; the codec relies on `format(parse(label)) == label` to decide
//! whether a label may take a compact tag.

use time::{Date, Month, Time};

/// Largest zone offset xsd allows, in minutes.
pub const MAX_OFFSET_MINUTES: i16 = 14 * 60;

/// Largest fraction length stored as a scaled `i64`; longer fractions keep
/// their canonical text.
pub const MAX_DECIMAL_SCALE: u32 = 64;

/// Formats a boolean.
pub fn format_boolean(v: bool) -> &'static str {
    if v {
        "true"
    } else {
        "false"
    }
}

/// Parses `true` or `false`; `1` and `0` are valid xsd but not canonical.
pub fn parse_boolean(label: &str) -> Option<bool> {
    match label {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parses an integer label in canonical form into `T`.
pub fn parse_canonical_int<T>(label: &str) -> Option<T>
where
    T: std::str::FromStr + ToString,
{
    let value = label.parse::<T>().ok()?;
    (value.to_string() == label).then_some(value)
}

/// True for `0` or an optional `-` followed by digits without a leading zero.
pub fn is_canonical_integer_text(label: &str) -> bool {
    let digits = label.strip_prefix('-').unwrap_or(label);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if digits == "0" {
        return !label.starts_with('-');
    }
    !digits.starts_with('0')
}

/// A decimal as an unscaled integer and a scale (number of fraction digits).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decimal {
    pub unscaled: i64,
    pub scale: u32,
}

impl Decimal {
    /// Canonical text: at least one fraction digit, no trailing zeros beyond it.
    pub fn format(&self) -> String {
        let negative = self.unscaled < 0;
        let digits = self.unscaled.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let (int_part, frac_part) = if digits.len() > scale {
            let split = digits.len() - scale;
            (digits[..split].to_string(), digits[split..].to_string())
        } else {
            ("0".to_string(), format!("{digits:0>scale$}"))
        };
        let frac_part = if frac_part.is_empty() {
            "0".to_string()
        } else {
            frac_part
        };
        let sign = if negative { "-" } else { "" };
        format!("{sign}{int_part}.{frac_part}")
    }
}

/// True for decimal text in canonical form: `-?(0|[1-9]\d*)\.\d+`, no trailing
/// zero in the fraction unless it is the single digit, and no negative zero.
pub fn is_canonical_decimal_text(label: &str) -> bool {
    let body = label.strip_prefix('-').unwrap_or(label);
    let Some((int_part, frac_part)) = body.split_once('.') else {
        return false;
    };
    if int_part.is_empty() || frac_part.is_empty() {
        return false;
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return false;
    }
    if int_part.len() > 1 && int_part.starts_with('0') {
        return false;
    }
    if frac_part.len() > 1 && frac_part.ends_with('0') {
        return false;
    }
    let zero = int_part == "0" && frac_part == "0";
    !(zero && label.starts_with('-'))
}

/// Parses canonical decimal text that fits an `i64` unscaled value.
pub fn parse_decimal(label: &str) -> Option<Decimal> {
    if !is_canonical_decimal_text(label) {
        return None;
    }
    let negative = label.starts_with('-');
    let body = label.trim_start_matches('-');
    let (int_part, frac_part) = body.split_once('.')?;
    // "1.0" is stored with scale 0 so the unscaled value stays minimal.
    let frac_part = if frac_part == "0" { "" } else { frac_part };
    let digits = format!("{int_part}{frac_part}");
    let magnitude: i64 = digits.parse().ok()?;
    let unscaled = if negative { -magnitude } else { magnitude };
    let scale = u32::try_from(frac_part.len())
        .ok()
        .filter(|s| *s <= MAX_DECIMAL_SCALE)?;
    Some(Decimal { unscaled, scale })
}

/// Formats a double the way the codec expects to read it back.
pub fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "INF".to_string()
    } else if v == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{v:?}")
    }
}

/// Formats a float the way the codec expects to read it back.
pub fn format_float(v: f32) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f32::INFINITY {
        "INF".to_string()
    } else if v == f32::NEG_INFINITY {
        "-INF".to_string()
    } else {
        format!("{v:?}")
    }
}

fn parse_special(label: &str) -> Option<f64> {
    match label {
        "NaN" => Some(f64::NAN),
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// Parses a double label only when it is the canonical rendering of its value.
pub fn parse_double(label: &str) -> Option<f64> {
    let value = match parse_special(label) {
        Some(v) => v,
        None => label.parse::<f64>().ok().filter(|v| v.is_finite())?,
    };
    (format_double(value) == label).then_some(value)
}

/// Parses a float label only when it is the canonical rendering of its value.
pub fn parse_float(label: &str) -> Option<f32> {
    let value = match parse_special(label) {
        Some(v) => v as f32,
        None => label.parse::<f32>().ok().filter(|v| v.is_finite())?,
    };
    (format_float(value) == label).then_some(value)
}

/// An `xsd:dateTime` value with an optional zone offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XsdDateTime {
    pub date: Date,
    pub time: Time,
    pub offset_minutes: Option<i16>,
}

/// An `xsd:date` value with an optional zone offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XsdDate {
    pub date: Date,
    pub offset_minutes: Option<i16>,
}

/// An `xsd:time` value with an optional zone offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XsdTime {
    pub time: Time,
    pub offset_minutes: Option<i16>,
}

fn fixed_digits(s: &str, n: usize) -> Option<u32> {
    if s.len() != n || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_date_part(s: &str) -> Option<Date> {
    if s.len() != 10 || s.as_bytes()[4] != b'-' || s.as_bytes()[7] != b'-' {
        return None;
    }
    let year = fixed_digits(&s[0..4], 4)?;
    if year == 0 {
        return None;
    }
    let month = fixed_digits(&s[5..7], 2)?;
    let day = fixed_digits(&s[8..10], 2)?;
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Date::from_calendar_date(year as i32, month, u8::try_from(day).ok()?).ok()
}

fn parse_time_part(s: &str) -> Option<Time> {
    if s.len() < 8 || s.as_bytes()[2] != b':' || s.as_bytes()[5] != b':' {
        return None;
    }
    let hour = fixed_digits(&s[0..2], 2)?;
    let minute = fixed_digits(&s[3..5], 2)?;
    let second = fixed_digits(&s[6..8], 2)?;
    let nanos = match &s[8..] {
        "" => 0,
        frac => {
            let digits = frac.strip_prefix('.')?;
            if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let padded = format!("{digits:0<9}");
            padded.parse::<u32>().ok()?
        }
    };
    Time::from_hms_nano(hour as u8, minute as u8, second as u8, nanos).ok()
}

/// Splits a trailing zone designator: `Z`, `+hh:mm`, `-hh:mm` or nothing.
fn split_zone(s: &str) -> Option<(&str, Option<i16>)> {
    if let Some(body) = s.strip_suffix('Z') {
        return Some((body, Some(0)));
    }
    if s.len() >= 6 {
        let (body, zone) = s.split_at(s.len() - 6);
        let zb = zone.as_bytes();
        if (zb[0] == b'+' || zb[0] == b'-') && zb[3] == b':' {
            let hours = fixed_digits(&zone[1..3], 2)?;
            let minutes = fixed_digits(&zone[4..6], 2)?;
            if minutes >= 60 {
                return None;
            }
            let total = (hours * 60 + minutes) as i16;
            if total > MAX_OFFSET_MINUTES {
                return None;
            }
            let total = if zb[0] == b'-' { -total } else { total };
            return Some((body, Some(total)));
        }
    }
    Some((s, None))
}

fn format_zone(offset_minutes: Option<i16>, out: &mut String) {
    match offset_minutes {
        None => {}
        Some(0) => out.push('Z'),
        Some(m) => {
            let sign = if m < 0 { '-' } else { '+' };
            let m = m.unsigned_abs();
            out.push_str(&format!("{sign}{:02}:{:02}", m / 60, m % 60));
        }
    }
}

fn format_date_part(date: Date, out: &mut String) {
    out.push_str(&format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    ));
}

fn format_time_part(time: Time, out: &mut String) {
    out.push_str(&format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    ));
    let nanos = time.nanosecond();
    if nanos > 0 {
        let frac = format!("{nanos:09}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
}

/// Parses `YYYY-MM-DDThh:mm:ss[.f+][zone]`.
pub fn parse_date_time(label: &str) -> Option<XsdDateTime> {
    let (body, offset_minutes) = split_zone(label)?;
    let (date, time) = body.split_once('T')?;
    Some(XsdDateTime {
        date: parse_date_part(date)?,
        time: parse_time_part(time)?,
        offset_minutes,
    })
}

pub fn format_date_time(v: &XsdDateTime) -> String {
    let mut out = String::with_capacity(32);
    format_date_part(v.date, &mut out);
    out.push('T');
    format_time_part(v.time, &mut out);
    format_zone(v.offset_minutes, &mut out);
    out
}

/// Parses `YYYY-MM-DD[zone]`.
pub fn parse_date(label: &str) -> Option<XsdDate> {
    let (body, offset_minutes) = split_zone(label)?;
    Some(XsdDate {
        date: parse_date_part(body)?,
        offset_minutes,
    })
}

pub fn format_date(v: &XsdDate) -> String {
    let mut out = String::with_capacity(16);
    format_date_part(v.date, &mut out);
    format_zone(v.offset_minutes, &mut out);
    out
}

/// Parses `hh:mm:ss[.f+][zone]`.
pub fn parse_time(label: &str) -> Option<XsdTime> {
    let (body, offset_minutes) = split_zone(label)?;
    Some(XsdTime {
        time: parse_time_part(body)?,
        offset_minutes,
    })
}

pub fn format_time(v: &XsdTime) -> String {
    let mut out = String::with_capacity(24);
    format_time_part(v.time, &mut out);
    format_zone(v.offset_minutes, &mut out);
    out
}
