#![forbid(unsafe_code)]

//! Live phone number formatting.
//!
//! Input is reduced to ASCII digits, truncated to ten, and re-rendered as
//! `(AAA) BBB-CCCC` progressively:
//!
//! | Digits | Output |
//! |--------|--------|
//! | 0..=3 | `727` |
//! | 4..=6 | `(727) 998` |
//! | 7..=10 | `(727) 998-4211` |

/// Maximum digits kept by the formatter.
pub const MAX_DIGITS: usize = 10;

/// Format arbitrary input as a (partial) North American number.
#[must_use]
pub fn format_phone(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_DIGITS)
        .collect();
    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}
