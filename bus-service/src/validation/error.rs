//! Field-level validation failures.
//!
//! Each failure names the field it belongs to; its display text is the
//! message shown next to the form.

use std::fmt;

use crate::domain::POSTAL_CODE_INFO;

/// A validated driver field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    HomePhone,
    WorkPhone,
    PostalCode,
    Province,
    DateHired,
}

impl Field {
    /// Label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::HomePhone => "Home Phone",
            Field::WorkPhone => "Work Phone",
            Field::PostalCode => "Postal Code",
            Field::Province => "Province",
            Field::DateHired => "Date Hired",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user-correctable problem with one field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A required field is empty
    #[error("{field} is required")]
    Required { field: Field },

    /// Home phone does not have ten digits
    #[error("Phone number {value} was not valid, please enter a 10 digit phone number (i.e. 519-123-4567)")]
    Phone { value: String },

    /// Work phone is neither empty nor ten digits
    #[error("Phone number {value} was not valid, please leave empty or enter a 10 digit number (i.e. 519-123-4567)")]
    OptionalPhone { value: String },

    /// Postal code does not match the Canada Post format
    #[error("{value} is not a valid canadian postal code. The format is A1A1A1 or A1A-1A1. See: {info}", info = POSTAL_CODE_INFO)]
    PostalCode { value: String },

    /// Province code is malformed or not in the reference set
    #[error("{value} is not a valid province code, please ensure it is only two letters")]
    UnknownProvince { value: String },

    /// The province reference set could not be queried
    #[error("Unknown error occurred: {reason}. Please enter a 2 letter code")]
    ProvinceLookupFailed { reason: String },

    /// Date is missing or unparseable
    #[error("{field} must be a valid date like 23 Jun 2016")]
    InvalidDate { field: Field },

    /// Date is not strictly in the past
    #[error("{field} cannot be in future")]
    InFuture { field: Field },
}

impl FieldError {
    /// The field this failure belongs to.
    pub fn field(&self) -> Field {
        match self {
            FieldError::Required { field }
            | FieldError::InvalidDate { field }
            | FieldError::InFuture { field } => *field,
            FieldError::Phone { .. } => Field::HomePhone,
            FieldError::OptionalPhone { .. } => Field::WorkPhone,
            FieldError::PostalCode { .. } => Field::PostalCode,
            FieldError::UnknownProvince { .. } | FieldError::ProvinceLookupFailed { .. } => {
                Field::Province
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FieldError::Required {
            field: Field::FirstName,
        };
        assert_eq!(err.to_string(), "First Name is required");

        let err = FieldError::Phone {
            value: "123".into(),
        };
        assert_eq!(
            err.to_string(),
            "Phone number 123 was not valid, please enter a 10 digit phone number (i.e. 519-123-4567)"
        );

        let err = FieldError::PostalCode {
            value: "D1A 1A1".into(),
        };
        assert!(err.to_string().starts_with("D1A 1A1 is not a valid canadian postal code"));
        assert!(err.to_string().ends_with(POSTAL_CODE_INFO));

        let err = FieldError::InvalidDate {
            field: Field::DateHired,
        };
        assert_eq!(
            err.to_string(),
            "Date Hired must be a valid date like 23 Jun 2016"
        );

        let err = FieldError::InFuture {
            field: Field::DateHired,
        };
        assert_eq!(err.to_string(), "Date Hired cannot be in future");
    }

    #[test]
    fn field_of_error() {
        assert_eq!(
            FieldError::OptionalPhone { value: "1".into() }.field(),
            Field::WorkPhone
        );
        assert_eq!(
            FieldError::UnknownProvince { value: "ZZ".into() }.field(),
            Field::Province
        );
    }
}
