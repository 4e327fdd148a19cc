//! PDF string decoding and date parsing.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use lopdf::{Dictionary, Document as LopdfDocument, Object};

/// Decode a PDF text string.
///
/// Honors UTF-16 byte order marks, then tries UTF-8, then falls back to
/// Latin-1 (close enough to PDFDocEncoding for the printable range).
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && (bytes[..2] == [0xFE, 0xFF] || bytes[..2] == [0xFF, 0xFE]) {
        let big_endian = bytes[0] == 0xFE;
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| {
                if big_endian {
                    u16::from_be_bytes([c[0], c[1]])
                } else {
                    u16::from_le_bytes([c[0], c[1]])
                }
            })
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Follow a single indirect reference, if `obj` is one.
pub fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Read a text value (string or name) from a dictionary.
pub fn string_from_dict(doc: &LopdfDocument, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let obj = resolve(doc, dict.get(key).ok()?)?;
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
}

/// Read a number from a PDF object.
pub fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSSOHH'mm'`).
///
/// Missing trailing fields default to their minimum; a missing zone is
/// treated as UTC.
pub fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    let s = s.strip_prefix("D:").unwrap_or(s);

    if s.len() < 4 {
        return None;
    }

    let field = |range: std::ops::Range<usize>, default: u32| -> Option<u32> {
        match s.get(range) {
            Some(digits) if digits.bytes().all(|b| b.is_ascii_digit()) => digits.parse().ok(),
            Some(_) => None,
            None => Some(default),
        }
    };

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month = field(4..6, 1)?;
    let day = field(6..8, 1)?;
    let hour = field(8..10, 0)?;
    let minute = field(10..12, 0)?;
    let second = field(12..14, 0)?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;

    let offset_secs = match s.get(14..15) {
        Some("+") | Some("-") => {
            let sign = if &s[14..15] == "-" { -1 } else { 1 };
            let rest: String = s[15..].chars().filter(|c| c.is_ascii_digit()).collect();
            let oh: i32 = rest.get(0..2).and_then(|h| h.parse().ok()).unwrap_or(0);
            let om: i32 = rest.get(2..4).and_then(|m| m.parse().ok()).unwrap_or(0);
            sign * (oh * 3600 + om * 60)
        }
        _ => 0,
    };

    let offset = FixedOffset::east_opt(offset_secs)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}
