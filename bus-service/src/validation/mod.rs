//! Field normalization and validation for driver records.
//!
//! Normalization is a pure transform from raw form fields to cleaned
//! fields. Validation is a pure check over the cleaned fields that collects
//! every failure instead of stopping at the first. The composed entry point,
//! [`normalize_and_validate_driver`], runs both and hands back the cleaned
//! fields together with the failures.

mod config;
mod driver;
mod error;

pub use config::{PostalCodePolicy, UnknownPolicy, ValidationConfig};
pub use driver::{
    DriverForm, DriverValidation, NormalizedDriver, normalize_and_validate_driver,
    normalize_driver, validate_driver,
};
pub use error::{Field, FieldError};
