//! Identifier and pattern formatting

use crate::locale::IdentifierFormat;
use rand::Rng;

const PPS_LETTERS: &[u8; 23] = b"WABCDEFGHIJKLMNOPQRSTUV";
const EIRCODE_CHARS: &[u8] = b"0123456789ACDEFHKNPRTVWXY";

/// Fills `#` with a digit, `^` with a non-zero digit and `?` with an
/// upper-case letter; other characters are copied
pub(crate) fn fill_pattern<R: Rng + ?Sized>(pattern: &str, rng: &mut R) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '#' => char::from(b'0' + rng.gen_range(0..10u8)),
            '^' => char::from(b'0' + rng.gen_range(1..10u8)),
            '?' => char::from(b'A' + rng.gen_range(0..26u8)),
            other => other,
        })
        .collect()
}

pub(crate) fn format_identifier<R: Rng + ?Sized>(format: IdentifierFormat, rng: &mut R) -> String {
    match format {
        IdentifierFormat::Pattern(pattern) => fill_pattern(pattern, rng),
        IdentifierFormat::IrishPps => {
            let digits = fill_pattern("#######", rng);
            match pps_check_letter(&digits) {
                Some(letter) => format!("{digits}{letter}"),
                None => digits,
            }
        }
    }
}

/// Check letter of a 7 digit PPS number
///
/// Digits are weighted 8 down to 2; the sum modulo 23 indexes `W, A..V`.
///
/// ```rust
/// use ipsgen::facts::pps_check_letter;
///
/// assert_eq!(pps_check_letter("1234567"), Some('T'));
/// assert_eq!(pps_check_letter("123"), None);
/// ```
pub fn pps_check_letter(digits: &str) -> Option<char> {
    if digits.len() != 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sum: u32 = digits
        .bytes()
        .zip((2..=8u32).rev())
        .map(|(b, weight)| u32::from(b - b'0') * weight)
        .sum();
    Some(char::from(PPS_LETTERS[(sum % 23) as usize]))
}

pub(crate) fn eircode_unique_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..4)
        .map(|_| char::from(EIRCODE_CHARS[rng.gen_range(0..EIRCODE_CHARS.len())]))
        .collect()
}
