//! # Format Predicates
//!
//! Character classes and textual formats shared by the request validators
//! ([`crate::request`]) and the record schemas ([`crate::schema`]).
//!
//! Only ASCII letters and digits count as alphanumeric. "Space" classes
//! admit any Unicode whitespace.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// A set of admissible characters. A string matches a class when it is
/// non-empty and every character belongs to the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `[A-Za-z]`
    Alpha,
    /// `[A-Za-z\s]`
    AlphaSpace,
    /// `[A-Za-z0-9]`
    Alphanumeric,
    /// `[A-Za-z0-9\s]`
    AlphanumericSpace,
    /// `[A-Z0-9]`
    UpperAlphanumeric,
}

impl CharClass {
    /// Whether a single character belongs to this class.
    pub fn admits(self, c: char) -> bool {
        match self {
            Self::Alpha => c.is_ascii_alphabetic(),
            Self::AlphaSpace => c.is_ascii_alphabetic() || c.is_whitespace(),
            Self::Alphanumeric => c.is_ascii_alphanumeric(),
            Self::AlphanumericSpace => c.is_ascii_alphanumeric() || c.is_whitespace(),
            Self::UpperAlphanumeric => c.is_ascii_uppercase() || c.is_ascii_digit(),
        }
    }

    /// Whether `s` is non-empty and made only of characters in this class.
    pub fn matches(self, s: &str) -> bool {
        !s.is_empty() && s.chars().all(|c| self.admits(c))
    }
}

/// Number of characters, as a client would count them.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Loose phone format stored on records: `^\+?[\d\s-]{10,}$`.
///
/// Separators count towards the ten-character minimum.
pub fn is_loose_phone(s: &str) -> bool {
    let body = s.strip_prefix('+').unwrap_or(s);
    char_len(body) >= 10
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-')
}

/// Strict mobile number accepted at the HTTP boundary: an optional `+`
/// followed by 10 to 15 digits with no separators.
pub fn is_mobile_phone(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// National Identification Number shape: `^[A-Z0-9]{13,14}$`.
pub fn is_nin(s: &str) -> bool {
    (13..=14).contains(&char_len(s)) && CharClass::UpperAlphanumeric.matches(s)
}

/// Decimal number literal: `^[+-]?([0-9]*[.])?[0-9]+$`.
pub fn is_numeric(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((w, f)) => (w, f),
        None => ("", unsigned),
    };
    !fraction.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// Integer literal without leading zeros: `^[-+]?(0|[1-9][0-9]*)$`.
///
/// Returns the parsed value so callers can apply range bounds.
pub fn parse_int_literal(s: &str) -> Option<f64> {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let well_formed = match unsigned.as_bytes() {
        [] => false,
        [b'0'] => true,
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if !well_formed {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Parse an ISO-8601 date or date-time into a UTC instant.
///
/// Accepts date-times with or without seconds and fractions, separated by
/// `T` or a space, with an optional `Z`, `±HH`, `±HHMM` or `±HH:MM` offset
/// (no offset reads as UTC). Also accepts calendar dates (`YYYY-MM-DD`),
/// year-months and bare years.
pub fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(split) = s.find(['T', ' ']) {
        return parse_date_time(s, split);
    }
    let date = match s.len() {
        10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
        7 => NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok(),
        4 if s.bytes().all(|b| b.is_ascii_digit()) => {
            NaiveDate::parse_from_str(&format!("{s}-01-01"), "%Y-%m-%d").ok()
        }
        _ => None,
    }?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `split` is the byte index of the date/time separator.
fn parse_date_time(s: &str, split: usize) -> Option<DateTime<Utc>> {
    let (clock, offset_secs) = split_offset(&s[split + 1..])?;
    let local = &s[..split + 1 + clock.len()];
    let naive = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(local, fmt).ok())?;
    let utc = naive.checked_sub_signed(Duration::seconds(offset_secs))?;
    Some(Utc.from_utc_datetime(&utc))
}

/// Split a time-of-day into its clock part and its UTC offset in seconds.
fn split_offset(time: &str) -> Option<(&str, i64)> {
    if let Some(clock) = time.strip_suffix(['Z', 'z']) {
        return Some((clock, 0));
    }
    let Some(at) = time.rfind(['+', '-']) else {
        return Some((time, 0));
    };
    let raw = &time[at + 1..];
    if !raw.is_ascii() {
        return None;
    }
    let (hours, minutes) = match raw.len() {
        2 => (raw, "00"),
        4 => (&raw[..2], &raw[2..]),
        5 if raw.as_bytes()[2] == b':' => (&raw[..2], &raw[3..]),
        _ => return None,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    let sign = if time.as_bytes()[at] == b'-' { -1 } else { 1 };
    Some((&time[..at], sign * (hours * 3600 + minutes * 60)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn alphanumeric_rejects_spaces_and_symbols() {
        assert!(CharClass::Alphanumeric.matches("Agent007"));
        assert!(!CharClass::Alphanumeric.matches("Agent 007"));
        assert!(!CharClass::Alphanumeric.matches("Bean$"));
        assert!(!CharClass::Alphanumeric.matches(""));
    }

    #[test]
    fn alphanumeric_space_admits_spaces() {
        assert!(CharClass::AlphanumericSpace.matches("Kampala City"));
        assert!(!CharClass::AlphanumericSpace.matches("Kampala-City"));
    }

    #[test]
    fn alpha_rejects_digits() {
        assert!(CharClass::Alpha.matches("Cereal"));
        assert!(!CharClass::Alpha.matches("Cereal2"));
        assert!(CharClass::AlphaSpace.matches("Dry beans"));
    }

    #[test]
    fn non_ascii_letters_are_not_alphanumeric() {
        assert!(!CharClass::Alphanumeric.matches("Café"));
    }

    #[test]
    fn loose_phone_counts_separators() {
        assert!(is_loose_phone("0772-123-456"));
        assert!(is_loose_phone("+256 772 123456"));
        assert!(!is_loose_phone("077212345"));
        assert!(!is_loose_phone("not-a-phone"));
    }

    #[test]
    fn mobile_phone_rejects_separators() {
        assert!(is_mobile_phone("0772123456"));
        assert!(is_mobile_phone("+256772123456"));
        assert!(!is_mobile_phone("0772-123-456"));
        assert!(!is_mobile_phone("12345"));
        assert!(!is_mobile_phone("+"));
    }

    #[test]
    fn nin_shape() {
        assert!(is_nin("CM12345678ABCD"));
        assert!(is_nin("CM12345678ABC"));
        assert!(!is_nin("cm12345678abcd"));
        assert!(!is_nin("TooShort"));
        assert!(!is_nin("CM12345678ABCDE"));
    }

    #[test]
    fn numeric_literals() {
        assert!(is_numeric("500"));
        assert!(is_numeric("-1.5"));
        assert!(is_numeric(".5"));
        assert!(!is_numeric("5."));
        assert!(!is_numeric("heavy"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("1e5"));
    }

    #[test]
    fn int_literals() {
        assert_eq!(parse_int_literal("150"), Some(150.0));
        assert_eq!(parse_int_literal("-3"), Some(-3.0));
        assert_eq!(parse_int_literal("0"), Some(0.0));
        assert_eq!(parse_int_literal("007"), None);
        assert_eq!(parse_int_literal("1.5"), None);
        assert_eq!(parse_int_literal(""), None);
    }

    #[test]
    fn iso8601_variants() {
        let d = parse_iso8601("2026-02-14").unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (2026, 2, 14));
        assert!(parse_iso8601("2026-02-14T08:30:00Z").is_some());
        assert!(parse_iso8601("2026-02-14T08:30:00.123+03:00").is_some());
        assert!(parse_iso8601("2026-02-14T08:30").is_some());
        assert!(parse_iso8601("2026-02-14 08:30:00").is_some());
        assert!(parse_iso8601("2026-02-14T08:30:00").is_some());
        assert!(parse_iso8601("2026-02").is_some());
        assert!(parse_iso8601("2026").is_some());
        assert!(parse_iso8601("").is_none());
        assert!(parse_iso8601("yesterday").is_none());
        assert!(parse_iso8601("2026-13-01").is_none());
    }

    #[test]
    fn iso8601_offsets_without_seconds_or_colon() {
        let utc = parse_iso8601("2026-02-14T10:30Z").unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-14T10:30:00+00:00");

        let extended = parse_iso8601("2026-02-14T10:30+03:00").unwrap();
        assert_eq!(extended.to_rfc3339(), "2026-02-14T07:30:00+00:00");

        let basic = parse_iso8601("2026-02-14T10:30:00+0300").unwrap();
        assert_eq!(basic, extended);

        let hours_only = parse_iso8601("2026-02-14T10:30-05").unwrap();
        assert_eq!(hours_only.to_rfc3339(), "2026-02-14T15:30:00+00:00");

        assert!(parse_iso8601("2026-02-14T10:30+3").is_none());
        assert!(parse_iso8601("2026-02-14T10:30+24:00").is_none());
        assert!(parse_iso8601("2026-02-14T").is_none());
    }
}
