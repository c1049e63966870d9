//! Province reference codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid province code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid province code: {reason}")]
pub struct InvalidProvinceCode {
    reason: &'static str,
}

/// A two-letter province code such as `ON`.
///
/// This only guarantees the shape; whether the code exists is answered by
/// the province reference set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProvinceCode([u8; 2]);

impl ProvinceCode {
    /// Parse a province code: exactly two uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidProvinceCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidProvinceCode {
                reason: "must be exactly 2 letters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidProvinceCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(ProvinceCode([bytes[0], bytes[1]]))
    }

    /// Parse a province code after trimming and uppercasing it.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidProvinceCode> {
        Self::parse(&s.trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are stored
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for ProvinceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProvinceCode({})", self.as_str())
    }
}

impl fmt::Display for ProvinceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ProvinceCode {
    type Error = InvalidProvinceCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_normalized(&value)
    }
}

impl From<ProvinceCode> for String {
    fn from(value: ProvinceCode) -> Self {
        value.as_str().to_string()
    }
}

/// An entry of the province reference set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub code: ProvinceCode,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        assert_eq!(ProvinceCode::parse("ON").unwrap().as_str(), "ON");
        assert_eq!(ProvinceCode::parse_normalized(" bc ").unwrap().as_str(), "BC");
    }

    #[test]
    fn reject_invalid() {
        assert!(ProvinceCode::parse("").is_err());
        assert!(ProvinceCode::parse("O").is_err());
        assert!(ProvinceCode::parse("ONT").is_err());
        assert!(ProvinceCode::parse("on").is_err());
        assert!(ProvinceCode::parse("O1").is_err());
    }

    #[test]
    fn display_and_debug() {
        let code = ProvinceCode::parse("QC").unwrap();
        assert_eq!(code.to_string(), "QC");
        assert_eq!(format!("{:?}", code), "ProvinceCode(QC)");
    }
}
