use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Local, NaiveDate};
use sha2::{Digest, Sha256};

pub const ID_PREFIX: &str = "KC";

const LONG_DATE_FORMAT: &str = "%d %B, %Y";
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const CODE_SEPARATOR: char = ':';
const CODE_LEN: usize = 12;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Parse an issue date written either as `15 March, 2024` or `2024-03-15`.
/// Anything else falls back to today.
pub fn parse_issue_date(date: &str) -> NaiveDate {
    parse_issue_date_or(date, Local::now().date_naive())
}

fn parse_issue_date_or(date: &str, fallback: NaiveDate) -> NaiveDate {
    parse_long_date(date).or_else(|| parse_iso_date(date)).unwrap_or(fallback)
}

fn is_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

// chrono alone also takes abbreviated months, signed years and leading
// blanks; only the exact shapes below count as dates.

/// `D[D] Month, YYYY` with the month spelled out.
fn parse_long_date(date: &str) -> Option<NaiveDate> {
    let (day, rest) = date.split_once(' ')?;
    let (month, year) = rest.split_once(", ")?;
    let full_month = MONTH_NAMES.iter().any(|m| m.eq_ignore_ascii_case(month));
    if !(full_month && is_digits(day, 1, 2) && is_digits(year, 4, 4)) {
        return None;
    }
    NaiveDate::parse_from_str(date, LONG_DATE_FORMAT).ok()
}

/// `YYYY-M[M]-D[D]`.
fn parse_iso_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.split('-');
    let shaped = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(y), Some(m), Some(d), None) => {
            is_digits(y, 4, 4) && is_digits(m, 1, 2) && is_digits(d, 1, 2)
        }
        _ => false,
    };
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(date, ISO_DATE_FORMAT).ok()
}

/// Render an issue date in long form for display. Non-ISO strings pass
/// through untouched; `None` means today.
pub fn format_issue_date(date: Option<&str>) -> String {
    match date {
        Some(d) => match parse_iso_date(d) {
            Some(parsed) => parsed.format(LONG_DATE_FORMAT).to_string(),
            None => d.to_string(),
        },
        None => Local::now().date_naive().format(LONG_DATE_FORMAT).to_string(),
    }
}

/// Upper-case MD5 hex of `input`, cut to `len` characters.
fn fingerprint(input: &str, len: usize) -> String {
    let mut ctx = md5::Context::new();
    ctx.consume(input.as_bytes());
    let hex = format!("{:x}", ctx.finalize());
    hex[..len].to_uppercase()
}

/// `KC-YYYYMM-<6 hex of subject>-<4 hex of course>`.
///
/// Names are fingerprinted exactly as given: "Ada" and "ada " produce
/// different identifiers.
pub fn derive_identifier(subject_name: &str, course_name: &str, issue_date: &str) -> String {
    identifier_for_month(subject_name, course_name, parse_issue_date(issue_date))
}

fn identifier_for_month(subject_name: &str, course_name: &str, date: NaiveDate) -> String {
    format!(
        "{}-{}-{}-{}",
        ID_PREFIX,
        date.format("%Y%m"),
        fingerprint(subject_name, 6),
        fingerprint(course_name, 4),
    )
}

/// SHA-256 over `id:subject:course`, base64, first 12 characters with
/// `+`, `/` and `=` then dropped, upper-cased.
///
/// Dropping happens after the cut, so codes can be shorter than 12
/// characters. Stored codes depend on this, keep it.
pub fn derive_verification_code(id: &str, subject_name: &str, course_name: &str) -> String {
    let combined = format!("{id}{CODE_SEPARATOR}{subject_name}{CODE_SEPARATOR}{course_name}");
    let digest = Sha256::digest(combined.as_bytes());
    let encoded = STANDARD.encode(digest);
    encoded
        .chars()
        .take(CODE_LEN)
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}
