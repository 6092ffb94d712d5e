#![forbid(unsafe_code)]

//! Per-field validators.
//!
//! Each validator is a pure predicate over the field's normalized value,
//! paired with the message shown when it fails.

use std::sync::LazyLock;

use regex_lite::Regex;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Separators allowed between phone digits (whitespace is stripped first).
const PHONE_SEPARATORS: &[char] = &['-', '(', ')', '+'];

/// Minimum digits in a phone number.
pub const PHONE_MIN_DIGITS: usize = 10;

/// The validated contact form fields, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
}

impl FieldId {
    pub const ALL: [Self; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::Phone,
        Self::Address,
    ];

    /// Element id and form control name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first-name",
            Self::LastName => "last-name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Message shown while the field is invalid.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::FirstName => "Please enter your first name (at least 2 characters)",
            Self::LastName => "Please enter your last name (at least 2 characters)",
            Self::Email => "Please enter a valid email address",
            Self::Phone => "Please enter a valid phone number",
            Self::Address => "Please enter your property address",
        }
    }

    /// Run this field's validator.
    #[must_use]
    pub fn validate(self, value: &str) -> bool {
        match self {
            Self::FirstName | Self::LastName => min_trimmed_chars(value, 2),
            Self::Email => is_email(value),
            Self::Phone => is_phone(value),
            Self::Address => min_trimmed_chars(value, 5),
        }
    }
}

/// At least `min` characters once surrounding whitespace is trimmed.
#[must_use]
pub fn min_trimmed_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Conservative `local@domain.tld` shape.
#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

/// Digits plus allowed separators only, with at least ten digits.
#[must_use]
pub fn is_phone(value: &str) -> bool {
    let mut digits = 0usize;
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            digits += 1;
        } else if !PHONE_SEPARATORS.contains(&c) {
            return false;
        }
    }
    digits >= PHONE_MIN_DIGITS
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn email_examples() {
        assert!(is_email("a@b.co"));
        assert!(is_email(" jo@example.com "));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email(""));
        assert!(!is_email("a@@b.co"));
    }

    #[test]
    fn phone_examples() {
        assert!(is_phone("(727) 998-4211"));
        assert!(is_phone("+1 727 998 4211"));
        assert!(is_phone("7279984211"));
        assert!(!is_phone("(727) 998-42"));
        assert!(!is_phone("727-998-421x"));
        assert!(!is_phone(""));
    }

    #[test]
    fn names_round_trip() {
        for f in FieldId::ALL {
            assert_eq!(FieldId::from_name(f.name()), Some(f));
        }
        assert_eq!(FieldId::from_name("message"), None);
    }

    proptest! {
        #[test]
        fn short_names_fail(s in "[a-zA-Z]?", pad in " {0,3}") {
            let value = format!("{pad}{s}{pad}");
            prop_assert!(!FieldId::FirstName.validate(&value));
            prop_assert!(!FieldId::LastName.validate(&value));
        }

        #[test]
        fn long_names_pass(s in "[a-zA-Z][a-zA-Z '-]{0,20}[a-zA-Z]") {
            prop_assert!(FieldId::FirstName.validate(&s));
            prop_assert!(FieldId::LastName.validate(&s));
        }

        #[test]
        fn ten_digit_runs_are_phones(d in "[0-9]{10,14}") {
            prop_assert!(is_phone(&d));
        }
    }
}
