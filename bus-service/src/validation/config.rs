//! Validation policy configuration.

use std::fmt;
use std::str::FromStr;

/// Whether a driver must have a postal code.
///
/// The postal code format check accepts an empty value; this policy decides
/// separately whether the record as a whole requires one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostalCodePolicy {
    /// An empty postal code is reported as a missing required field.
    #[default]
    Required,

    /// An empty postal code is accepted.
    Optional,
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown postal code policy {0:?} (expected \"required\" or \"optional\")")]
pub struct UnknownPolicy(String);

impl FromStr for PostalCodePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "optional" => Ok(Self::Optional),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for PostalCodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::Optional => f.write_str("optional"),
        }
    }
}

/// Configuration for driver validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig {
    /// Whether an empty postal code fails validation.
    pub postal_code: PostalCodePolicy,
}

impl ValidationConfig {
    /// Create a configuration with the given postal code policy.
    pub fn new(postal_code: PostalCodePolicy) -> Self {
        Self { postal_code }
    }
}
