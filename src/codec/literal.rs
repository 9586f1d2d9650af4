//! Literal payloads.
//!
//! A literal takes a compact tag only when its label is the canonical lexical
//! form of its datatype; anything else is written as a datatype literal with
//! the label kept verbatim, so decoding always returns the original literal.

use time::{Date, Time};
use tracing::trace;

use super::tags::TypeTag;
use super::{utf8, ValueIo};
use crate::model::lexical::{self, Decimal, XsdDate, XsdDateTime, XsdTime};
use crate::model::vocab::{geo, rdf, xsd};
use crate::model::Literal;
use crate::primitives::bytes::buf::Cursor;
use crate::primitives::bytes::{put_len_prefixed, var};
use crate::types::{Error, Result};

/// Offset marker for values without a zone.
const NO_ZONE: i16 = 0x7FFF;
const UNIX_EPOCH_JULIAN_DAY: i64 = 2_440_588;
const SECONDS_PER_DAY: i64 = 86_400;
const NANOS_PER_SECOND: u64 = 1_000_000_000;

pub(super) fn write_literal(io: &ValueIo, lit: &Literal, out: &mut Vec<u8>) {
    if let Some(lang) = lit.language() {
        write_language(io, lang, lit.label(), out);
        return;
    }
    if !write_native(io, lit, out) {
        out.push(TypeTag::DATATYPE_LITERAL.0);
        let mut datatype = Vec::with_capacity(lit.datatype().len() + 1);
        super::iri::write_iri(io.vocabulary(), lit.datatype(), &mut datatype);
        put_len_prefixed(out, &datatype);
        out.extend_from_slice(lit.label().as_bytes());
    }
}

fn write_language(io: &ValueIo, lang: &str, label: &str, out: &mut Vec<u8>) {
    match io.vocabulary().language_hash(lang) {
        Some(hash) => {
            out.push(TypeTag::LANGUAGE_HASH_LITERAL.0);
            out.extend_from_slice(&hash.to_be_bytes());
        }
        None => {
            out.push(TypeTag::LANGUAGE_LITERAL.0);
            put_len_prefixed(out, lang.as_bytes());
        }
    }
    out.extend_from_slice(label.as_bytes());
}

fn offset_bytes(offset: Option<i16>) -> [u8; 2] {
    offset.unwrap_or(NO_ZONE).to_be_bytes()
}

fn seconds_of_day(time: Time) -> i64 {
    i64::from(time.hour()) * 3600 + i64::from(time.minute()) * 60 + i64::from(time.second())
}

/// Writes a native encoding when one applies. Returns false when the literal
/// needs the generic datatype form.
fn write_native(io: &ValueIo, lit: &Literal, out: &mut Vec<u8>) -> bool {
    let label = lit.label();
    match lit.datatype() {
        xsd::STRING => {
            if label.len() > io.compression_threshold() {
                match snap::raw::Encoder::new().compress_vec(label.as_bytes()) {
                    Ok(compressed) => {
                        trace!(len = label.len(), compressed = compressed.len(), "codec.string.compressed");
                        out.push(TypeTag::COMPRESSED_STRING.0);
                        out.extend_from_slice(&compressed);
                        return true;
                    }
                    Err(err) => trace!(error = %err, "codec.string.compress_failed"),
                }
            }
            out.push(TypeTag::STRING.0);
            out.extend_from_slice(label.as_bytes());
            true
        }
        xsd::BOOLEAN => match lexical::parse_boolean(label) {
            Some(v) => {
                out.push(if v { TypeTag::TRUE.0 } else { TypeTag::FALSE.0 });
                true
            }
            None => false,
        },
        xsd::BYTE => put_fixed(out, TypeTag::BYTE, lexical::parse_canonical_int::<i8>(label).map(i8::to_be_bytes)),
        xsd::SHORT => put_fixed(out, TypeTag::SHORT, lexical::parse_canonical_int::<i16>(label).map(i16::to_be_bytes)),
        xsd::INT => put_fixed(out, TypeTag::INT, lexical::parse_canonical_int::<i32>(label).map(i32::to_be_bytes)),
        xsd::LONG => put_fixed(out, TypeTag::LONG, lexical::parse_canonical_int::<i64>(label).map(i64::to_be_bytes)),
        xsd::FLOAT => put_fixed(out, TypeTag::FLOAT, lexical::parse_float(label).map(|v| v.to_bits().to_be_bytes())),
        xsd::DOUBLE => put_fixed(out, TypeTag::DOUBLE, lexical::parse_double(label).map(|v| v.to_bits().to_be_bytes())),
        xsd::INTEGER => write_integer(label, out),
        xsd::DECIMAL => write_decimal(label, out),
        xsd::DATE_TIME => write_date_time(label, out),
        xsd::DATE => match lexical::parse_date(label).filter(|v| lexical::format_date(v) == label) {
            Some(v) => {
                out.push(TypeTag::DATE.0);
                out.extend_from_slice(&v.date.to_julian_day().to_be_bytes());
                out.extend_from_slice(&offset_bytes(v.offset_minutes));
                true
            }
            None => false,
        },
        xsd::TIME => match lexical::parse_time(label).filter(|v| lexical::format_time(v) == label) {
            Some(v) => {
                let nanos = seconds_of_day(v.time) as u64 * NANOS_PER_SECOND
                    + u64::from(v.time.nanosecond());
                out.push(TypeTag::TIME.0);
                out.extend_from_slice(&nanos.to_be_bytes());
                out.extend_from_slice(&offset_bytes(v.offset_minutes));
                true
            }
            None => false,
        },
        rdf::XML_LITERAL => {
            out.push(TypeTag::XML_LITERAL.0);
            out.extend_from_slice(label.as_bytes());
            true
        }
        geo::WKT_LITERAL => {
            out.push(TypeTag::WKT_LITERAL.0);
            out.extend_from_slice(label.as_bytes());
            true
        }
        _ => false,
    }
}

fn put_fixed<const N: usize>(out: &mut Vec<u8>, tag: TypeTag, bytes: Option<[u8; N]>) -> bool {
    match bytes {
        Some(bytes) => {
            out.push(tag.0);
            out.extend_from_slice(&bytes);
            true
        }
        None => false,
    }
}

fn write_integer(label: &str, out: &mut Vec<u8>) -> bool {
    if let Some(v) = lexical::parse_canonical_int::<i64>(label) {
        if let Ok(v) = i16::try_from(v) {
            return put_fixed(out, TypeTag::SHORT_COMPRESSED_BIG_INT, Some(v.to_be_bytes()));
        }
        if let Ok(v) = i32::try_from(v) {
            return put_fixed(out, TypeTag::INT_COMPRESSED_BIG_INT, Some(v.to_be_bytes()));
        }
        return put_fixed(out, TypeTag::LONG_COMPRESSED_BIG_INT, Some(v.to_be_bytes()));
    }
    if lexical::is_canonical_integer_text(label) {
        out.push(TypeTag::BIG_INT.0);
        out.extend_from_slice(label.as_bytes());
        return true;
    }
    false
}

fn write_decimal(label: &str, out: &mut Vec<u8>) -> bool {
    if let Some(d) = lexical::parse_decimal(label) {
        out.push(TypeTag::DECIMAL.0);
        var::encode_i64(i64::from(d.scale), out);
        var::encode_i64(d.unscaled, out);
        return true;
    }
    if lexical::is_canonical_decimal_text(label) {
        out.push(TypeTag::BIG_DECIMAL.0);
        out.extend_from_slice(label.as_bytes());
        return true;
    }
    false
}

fn write_date_time(label: &str, out: &mut Vec<u8>) -> bool {
    let Some(v) = lexical::parse_date_time(label) else {
        return false;
    };
    if lexical::format_date_time(&v) != label {
        return false;
    }
    let local = (i64::from(v.date.to_julian_day()) - UNIX_EPOCH_JULIAN_DAY) * SECONDS_PER_DAY
        + seconds_of_day(v.time);
    let seconds = local - i64::from(v.offset_minutes.unwrap_or(0)) * 60;
    out.push(TypeTag::DATETIME.0);
    out.extend_from_slice(&seconds.to_be_bytes());
    out.extend_from_slice(&v.time.nanosecond().to_be_bytes());
    out.extend_from_slice(&offset_bytes(v.offset_minutes));
    true
}

fn read_offset(cur: &mut Cursor<'_>) -> Result<Option<i16>> {
    let raw = i16::from_be_bytes(cur.read_array()?);
    if raw == NO_ZONE {
        return Ok(None);
    }
    if raw.unsigned_abs() > lexical::MAX_OFFSET_MINUTES.unsigned_abs() {
        return Err(Error::decode(format!("zone offset {raw} minutes out of range")));
    }
    Ok(Some(raw))
}

fn time_from_nanos(nanos: u64) -> Result<Time> {
    let secs = nanos / NANOS_PER_SECOND;
    let sub = (nanos % NANOS_PER_SECOND) as u32;
    if secs >= SECONDS_PER_DAY as u64 {
        return Err(Error::decode(format!("time of day {nanos}ns out of range")));
    }
    Time::from_hms_nano(
        (secs / 3600) as u8,
        (secs / 60 % 60) as u8,
        (secs % 60) as u8,
        sub,
    )
    .map_err(|e| Error::decode(format!("invalid time: {e}")))
}

fn date_from_julian(day: i64) -> Result<Date> {
    let day = i32::try_from(day).map_err(|_| Error::decode(format!("julian day {day} out of range")))?;
    let date = Date::from_julian_day(day).map_err(|e| Error::decode(format!("invalid date: {e}")))?;
    if !(1..=9999).contains(&date.year()) {
        return Err(Error::decode(format!("year {} out of range", date.year())));
    }
    Ok(date)
}

fn int_literal<T: ToString>(v: T, datatype: &str) -> Literal {
    Literal::typed(v.to_string(), datatype)
}

/// Reads the payload of a literal tag.
pub(super) fn read_literal(io: &ValueIo, tag: TypeTag, cur: &mut Cursor<'_>) -> Result<Literal> {
    let lit = match tag {
        TypeTag::STRING => Literal::string(utf8(cur.rest())?),
        TypeTag::COMPRESSED_STRING => {
            let bytes = snap::raw::Decoder::new()
                .decompress_vec(cur.rest())
                .map_err(|e| Error::decode(format!("invalid compressed string: {e}")))?;
            let label = String::from_utf8(bytes)
                .map_err(|e| Error::decode(format!("invalid UTF-8: {e}")))?;
            Literal::string(label)
        }
        TypeTag::LANGUAGE_LITERAL => {
            let lang = utf8(cur.read_len_prefixed()?)?;
            if lang.is_empty() {
                return Err(Error::decode("empty language tag"));
            }
            Literal::lang(utf8(cur.rest())?, lang)
        }
        TypeTag::LANGUAGE_HASH_LITERAL => {
            let hash = u16::from_be_bytes(cur.read_array()?);
            let lang = io
                .vocabulary()
                .language(hash)
                .ok_or_else(|| Error::decode(format!("unknown language hash 0x{hash:04x}")))?;
            Literal::lang(utf8(cur.rest())?, lang)
        }
        TypeTag::DATATYPE_LITERAL => {
            let datatype = io.read_exact(cur.read_len_prefixed()?)?;
            let Some(datatype) = datatype.as_iri() else {
                return Err(Error::decode(format!("datatype is not an IRI: {datatype}")));
            };
            Literal::typed(utf8(cur.rest())?, datatype)
        }
        TypeTag::XML_LITERAL => Literal::typed(utf8(cur.rest())?, rdf::XML_LITERAL),
        TypeTag::WKT_LITERAL => Literal::typed(utf8(cur.rest())?, geo::WKT_LITERAL),
        TypeTag::FALSE => Literal::boolean(false),
        TypeTag::TRUE => Literal::boolean(true),
        TypeTag::BYTE => int_literal(i8::from_be_bytes(cur.read_array()?), xsd::BYTE),
        TypeTag::SHORT => int_literal(i16::from_be_bytes(cur.read_array()?), xsd::SHORT),
        TypeTag::INT => int_literal(i32::from_be_bytes(cur.read_array()?), xsd::INT),
        TypeTag::LONG => int_literal(i64::from_be_bytes(cur.read_array()?), xsd::LONG),
        TypeTag::FLOAT => Literal::float(f32::from_bits(u32::from_be_bytes(cur.read_array()?))),
        TypeTag::DOUBLE => Literal::double(f64::from_bits(u64::from_be_bytes(cur.read_array()?))),
        TypeTag::SHORT_COMPRESSED_BIG_INT => {
            int_literal(i16::from_be_bytes(cur.read_array()?), xsd::INTEGER)
        }
        TypeTag::INT_COMPRESSED_BIG_INT => {
            int_literal(i32::from_be_bytes(cur.read_array()?), xsd::INTEGER)
        }
        TypeTag::LONG_COMPRESSED_BIG_INT => {
            int_literal(i64::from_be_bytes(cur.read_array()?), xsd::INTEGER)
        }
        TypeTag::BIG_INT => Literal::typed(utf8(cur.rest())?, xsd::INTEGER),
        TypeTag::DECIMAL => {
            let scale = cur.read_var_i64()?;
            let scale = u32::try_from(scale)
                .ok()
                .filter(|s| *s <= lexical::MAX_DECIMAL_SCALE)
                .ok_or_else(|| Error::decode(format!("decimal scale {scale} out of range")))?;
            let unscaled = cur.read_var_i64()?;
            Literal::typed(Decimal { unscaled, scale }.format(), xsd::DECIMAL)
        }
        TypeTag::BIG_DECIMAL => Literal::typed(utf8(cur.rest())?, xsd::DECIMAL),
        TypeTag::DATETIME => {
            let seconds = i64::from_be_bytes(cur.read_array()?);
            let nanos = u32::from_be_bytes(cur.read_array()?);
            let offset_minutes = read_offset(cur)?;
            if u64::from(nanos) >= NANOS_PER_SECOND {
                return Err(Error::decode(format!("nanoseconds {nanos} out of range")));
            }
            let local = seconds
                .checked_add(i64::from(offset_minutes.unwrap_or(0)) * 60)
                .ok_or_else(|| Error::decode("date-time seconds overflow"))?;
            let date = date_from_julian(local.div_euclid(SECONDS_PER_DAY) + UNIX_EPOCH_JULIAN_DAY)?;
            let time = time_from_nanos(
                local.rem_euclid(SECONDS_PER_DAY) as u64 * NANOS_PER_SECOND + u64::from(nanos),
            )?;
            let label = lexical::format_date_time(&XsdDateTime {
                date,
                time,
                offset_minutes,
            });
            Literal::typed(label, xsd::DATE_TIME)
        }
        TypeTag::DATE => {
            let day = i32::from_be_bytes(cur.read_array()?);
            let offset_minutes = read_offset(cur)?;
            let date = date_from_julian(i64::from(day))?;
            Literal::typed(
                lexical::format_date(&XsdDate {
                    date,
                    offset_minutes,
                }),
                xsd::DATE,
            )
        }
        TypeTag::TIME => {
            let time = time_from_nanos(u64::from_be_bytes(cur.read_array()?))?;
            let offset_minutes = read_offset(cur)?;
            Literal::typed(
                lexical::format_time(&XsdTime {
                    time,
                    offset_minutes,
                }),
                xsd::TIME,
            )
        }
        other => return Err(Error::decode(format!("{other} is not a literal tag"))),
    };
    Ok(lit)
}
