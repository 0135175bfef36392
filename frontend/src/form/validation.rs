use once_cell::sync::Lazy;
use regex::Regex;

/// Local mobile number: `01X`, a 3-4 digit block and a 4 digit block, dashes optional.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^01[0-9]-?[0-9]{3,4}-?[0-9]{4}$").expect("phone pattern compiles"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Length is counted in UTF-16 code units, the way the browser reports it.
pub fn is_valid_name(value: &str) -> bool {
    value.trim().encode_utf16().count() >= 2
}

pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&compact)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Re-segments whatever digits the user typed as `XXX-XXXX-XXXX`.
/// Anything past the eleventh digit is dropped.
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        0..=3 => digits,
        4..=7 => format!("{}-{}", &digits[..3], &digits[3..]),
        len => format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..len.min(11)]),
    }
}
