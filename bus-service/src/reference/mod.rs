//! Province reference set lookups.
//!
//! Answers "does this two-letter code exist?" against the reference
//! collaborator. Codes that are not exactly two characters are rejected
//! without a lookup.

use serde::Serialize;
use tracing::{debug, warn};

use crate::store::StoreError;

/// Message returned by the remote check for a code that does not exist.
pub const INVALID_PROVINCE_MESSAGE: &str = "Province code is invalid, ensure it is two letters";

/// Read-only access to the province reference set.
pub trait ProvinceLookup {
    /// Whether a province with exactly this code exists.
    fn province_exists(&self, code: &str) -> Result<bool, StoreError>;
}

/// Check a code against the reference set, surfacing lookup failures.
///
/// Returns `Ok(false)` without consulting `lookup` when the code is not
/// exactly two characters long.
pub fn lookup_province_code<L: ProvinceLookup + ?Sized>(
    lookup: &L,
    code: &str,
) -> Result<bool, StoreError> {
    if code.chars().count() != 2 {
        debug!(code, "province code has wrong length, skipping lookup");
        return Ok(false);
    }
    lookup.province_exists(code)
}

/// Whether a code exists in the province reference set.
///
/// A failed lookup is logged and answered with `false`.
pub fn check_province_code<L: ProvinceLookup + ?Sized>(lookup: &L, code: &str) -> bool {
    lookup_province_code(lookup, code).unwrap_or_else(|e| {
        warn!(code, error = %e, "province lookup failed");
        false
    })
}

/// Answer to the remote province check: `true`, or a message to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProvinceCheck {
    Valid(bool),
    Invalid(&'static str),
}

impl ProvinceCheck {
    /// Run the remote-style check for a single code.
    pub fn run<L: ProvinceLookup + ?Sized>(lookup: &L, code: &str) -> Self {
        if check_province_code(lookup, code) {
            ProvinceCheck::Valid(true)
        } else {
            ProvinceCheck::Invalid(INVALID_PROVINCE_MESSAGE)
        }
    }
}
