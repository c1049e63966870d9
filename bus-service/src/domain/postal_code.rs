//! Canadian postal codes.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Where the postal code letter rules come from.
pub const POSTAL_CODE_INFO: &str =
    "https://en.wikipedia.org/wiki/Postal_codes_in_Canada#Number_of_possible_postal_codes";

/// Letter-digit-letter, optional space or hyphen, digit-letter-digit.
///
/// The first letter never uses D, F, I, O, Q, U, W or Z; the other letters
/// never use D, F, I, O, Q or U.
static POSTAL_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ABCEGHJKLMNPRSTVXY][0-9][ABCEGHJKLMNPRSTVWXYZ][\s-]?[0-9][ABCEGHJKLMNPRSTVWXYZ][0-9]$")
        .unwrap()
});

/// Error returned when parsing an invalid postal code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid postal code: {reason}")]
pub struct InvalidPostalCode {
    reason: &'static str,
}

/// A valid Canadian postal code, stored without its separator.
///
/// # Examples
///
/// ```
/// use bus_service::domain::PostalCode;
///
/// assert!(PostalCode::parse("A1A1A1").is_ok());
/// assert!(PostalCode::parse("A1A 1A1").is_ok());
/// assert!(PostalCode::parse("A1A-1A1").is_ok());
///
/// // D is never used as a first letter
/// assert!(PostalCode::parse("D1A1A1").is_err());
///
/// let code = PostalCode::parse_normalized(" n2g-4m4 ").unwrap();
/// assert_eq!(code.to_string(), "N2G 4M4");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode([u8; 6]);

impl PostalCode {
    /// Parse a postal code exactly as given (uppercase letters only).
    pub fn parse(s: &str) -> Result<Self, InvalidPostalCode> {
        if !POSTAL_CODE_PATTERN.is_match(s) {
            return Err(InvalidPostalCode {
                reason: "expected A1A 1A1 using Canada Post letters",
            });
        }

        let mut code = [0u8; 6];
        for (slot, b) in code
            .iter_mut()
            .zip(s.bytes().filter(u8::is_ascii_alphanumeric))
        {
            *slot = b;
        }
        Ok(PostalCode(code))
    }

    /// Parse a postal code after trimming and uppercasing it.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidPostalCode> {
        Self::parse(&s.trim().to_uppercase())
    }

    /// The forward sortation area (first three characters).
    pub fn forward_sortation_area(&self) -> &str {
        // Only ASCII alphanumerics are stored
        std::str::from_utf8(&self.0[..3]).unwrap()
    }

    /// The local delivery unit (last three characters).
    pub fn local_delivery_unit(&self) -> &str {
        // Only ASCII alphanumerics are stored
        std::str::from_utf8(&self.0[3..]).unwrap()
    }
}

impl fmt::Debug for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PostalCode({self})")
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.forward_sortation_area(),
            self.local_delivery_unit()
        )
    }
}

impl TryFrom<String> for PostalCode {
    type Error = InvalidPostalCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_normalized(&value)
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.to_string()
    }
}

/// Bring a postal code into its canonical `A1A 1A1` shape.
///
/// Input that is not a valid postal code is only trimmed and uppercased, so
/// the validator can still report it.
pub fn format_postal_code(value: &str) -> String {
    match PostalCode::parse_normalized(value) {
        Ok(code) => code.to_string(),
        Err(_) => value.trim().to_uppercase(),
    }
}

/// Validate a postal code field.
///
/// An absent or empty value is accepted here; whether the field is required
/// is a separate, record-level decision.
pub fn validate_postal_code(value: Option<&str>) -> Result<Option<PostalCode>, InvalidPostalCode> {
    match value {
        None | Some("") => Ok(None),
        Some(s) => PostalCode::parse(s).map(Some),
    }
}
