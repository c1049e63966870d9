//! Ten-digit North American phone numbers.

use std::fmt;

/// Error returned when a phone number does not contain exactly ten digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid phone number: {reason}")]
pub struct InvalidPhoneNumber {
    reason: &'static str,
}

/// A phone number reduced to its ten digits.
///
/// Any punctuation or spacing in the input is ignored; only the digits are
/// kept. Displays in the canonical `XXX-XXX-XXXX` shape.
///
/// # Examples
///
/// ```
/// use bus_service::domain::PhoneNumber;
///
/// let phone = PhoneNumber::parse("(519) 555.1234").unwrap();
/// assert_eq!(phone.digits(), "5195551234");
/// assert_eq!(phone.to_string(), "519-555-1234");
///
/// assert!(PhoneNumber::parse("555-1234").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber([u8; 10]);

impl PhoneNumber {
    /// Parse a phone number, keeping only ASCII digits.
    ///
    /// Succeeds when exactly ten digits are present.
    pub fn parse(s: &str) -> Result<Self, InvalidPhoneNumber> {
        let mut digits = [0u8; 10];
        let mut count = 0;

        for b in s.bytes().filter(u8::is_ascii_digit) {
            if count == digits.len() {
                return Err(InvalidPhoneNumber {
                    reason: "more than 10 digits",
                });
            }
            digits[count] = b;
            count += 1;
        }

        if count < digits.len() {
            return Err(InvalidPhoneNumber {
                reason: "fewer than 10 digits",
            });
        }

        Ok(PhoneNumber(digits))
    }

    /// Returns the bare digits.
    pub fn digits(&self) -> &str {
        // Only ASCII digits are stored
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhoneNumber({})", self.digits())
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_phone_number(self.digits()))
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = InvalidPhoneNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.to_string()
    }
}

/// Validate a phone field.
///
/// An absent or empty value is accepted (with no number) only when the
/// field is `optional`.
pub fn validate_phone_number(
    value: Option<&str>,
    optional: bool,
) -> Result<Option<PhoneNumber>, InvalidPhoneNumber> {
    match value {
        None | Some("") if optional => Ok(None),
        None | Some("") => Err(InvalidPhoneNumber {
            reason: "phone number is required",
        }),
        Some(s) => PhoneNumber::parse(s).map(Some),
    }
}

/// Re-emit only the digits of `value`, with a `-` before the 4th and 7th
/// digit.
///
/// Intended for input that already passed [`validate_phone_number`].
pub fn format_phone_number(value: &str) -> String {
    let mut formatted = String::with_capacity(12);
    for (idx, c) in value.chars().filter(char::is_ascii_digit).enumerate() {
        if idx == 3 || idx == 6 {
            formatted.push('-');
        }
        formatted.push(c);
    }
    formatted
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Formatting then re-parsing keeps the same digits
        #[test]
        fn format_keeps_digits(s in "[0-9]{10}") {
            let formatted = format_phone_number(&s);
            prop_assert_eq!(formatted.len(), 12);
            let phone = PhoneNumber::parse(&formatted).unwrap();
            prop_assert_eq!(phone.digits(), s.as_str());
        }

        /// Punctuation between digits never changes the result
        #[test]
        fn punctuation_ignored(s in "[0-9]{3}", t in "[0-9]{3}", u in "[0-9]{4}", sep in "[ .()-]{0,2}") {
            let messy = format!("{s}{sep}{t}{sep}{u}");
            let phone = PhoneNumber::parse(&messy).unwrap();
            prop_assert_eq!(phone.digits(), format!("{s}{t}{u}"));
        }

        /// Anything other than ten digits is rejected
        #[test]
        fn wrong_length_rejected(s in "[0-9]{0,9}|[0-9]{11,14}") {
            prop_assert!(PhoneNumber::parse(&s).is_err());
        }
    }
}
