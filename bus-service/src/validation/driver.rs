//! Driver normalization and validation.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::warn;

use crate::domain::{
    Driver, HireDateError, PhoneNumber, PostalCode, ProvinceCode, capitalize, format_postal_code,
    full_name, parse_date, validate_not_in_future, validate_phone_number, validate_postal_code,
};
use crate::reference::{ProvinceLookup, lookup_province_code};

use super::config::{PostalCodePolicy, ValidationConfig};
use super::error::{Field, FieldError};

/// Raw driver fields as submitted from a form.
///
/// Every field is optional text; nothing here has been checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub home_phone: Option<String>,
    pub work_phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub province_code: Option<String>,
    pub date_hired: Option<String>,
}

impl From<&Driver> for DriverForm {
    fn from(driver: &Driver) -> Self {
        Self {
            first_name: Some(driver.first_name.clone()),
            last_name: Some(driver.last_name.clone()),
            home_phone: Some(driver.home_phone.to_string()),
            work_phone: driver.work_phone.map(|p| p.to_string()),
            street: driver.street.clone(),
            city: driver.city.clone(),
            postal_code: driver.postal_code.map(|c| c.to_string()),
            province_code: Some(driver.province_code.to_string()),
            date_hired: Some(driver.date_hired.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Driver fields after normalization, plus the derived full name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDriver {
    pub fields: DriverForm,
    pub full_name: String,
}

/// Outcome of [`normalize_and_validate_driver`].
#[derive(Debug, Clone)]
pub struct DriverValidation {
    /// The normalized fields, whether or not they passed.
    pub driver: NormalizedDriver,

    /// Every failure found, in field order.
    pub errors: Vec<FieldError>,

    accepted: Option<Driver>,
}

impl DriverValidation {
    /// Whether no field failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Failures for one field.
    pub fn errors_for(&self, field: Field) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(move |e| e.field() == field)
    }

    /// Turn a passing validation into a driver record with the given id.
    ///
    /// Returns the validation unchanged if any field failed.
    pub fn into_driver(self, id: i32) -> Result<Driver, Self> {
        match self.accepted {
            Some(driver) if self.errors.is_empty() => Ok(Driver { id, ..driver }),
            _ => Err(self),
        }
    }
}

/// Normalize raw driver fields.
///
/// Blank fields become absent, names are capitalized, the full name is
/// derived as `"{last}, {first}"`, the province code is uppercased, and
/// postal codes, phone numbers and dates are rewritten in their canonical
/// shapes when they can be parsed. Values that cannot be parsed are kept
/// (trimmed) so validation can report them.
pub fn normalize_driver(raw: &DriverForm) -> NormalizedDriver {
    let first_name = clean(&raw.first_name).map(|s| capitalize(&s));
    let last_name = clean(&raw.last_name).map(|s| capitalize(&s));
    let full_name = full_name(
        first_name.as_deref().unwrap_or_default(),
        last_name.as_deref().unwrap_or_default(),
    );

    let fields = DriverForm {
        first_name,
        last_name,
        home_phone: clean(&raw.home_phone).map(normalize_phone),
        work_phone: clean(&raw.work_phone).map(normalize_phone),
        street: clean(&raw.street),
        city: clean(&raw.city),
        postal_code: clean(&raw.postal_code).map(|s| format_postal_code(&s)),
        province_code: clean(&raw.province_code).map(|s| s.to_uppercase()),
        date_hired: clean(&raw.date_hired).map(normalize_date),
    };

    NormalizedDriver { fields, full_name }
}

/// Validate normalized driver fields.
///
/// All fields are checked; the result lists every failure.
pub fn validate_driver<L: ProvinceLookup + ?Sized>(
    driver: &NormalizedDriver,
    provinces: &L,
    config: &ValidationConfig,
    now: NaiveDateTime,
) -> Vec<FieldError> {
    check(driver, provinces, config, now).1
}

/// Normalize then validate raw driver fields.
///
/// # Examples
///
/// ```
/// use bus_service::reference::ProvinceLookup;
/// use bus_service::store::StoreError;
/// use bus_service::validation::{DriverForm, ValidationConfig, normalize_and_validate_driver};
///
/// struct Ontario;
/// impl ProvinceLookup for Ontario {
///     fn province_exists(&self, code: &str) -> Result<bool, StoreError> {
///         Ok(code == "ON")
///     }
/// }
///
/// let raw = DriverForm {
///     first_name: Some(" jANE ".into()),
///     last_name: Some("doe".into()),
///     home_phone: Some("(519) 555 1234".into()),
///     postal_code: Some("n2g4m4".into()),
///     province_code: Some("on".into()),
///     date_hired: Some("2015-06-01".into()),
///     ..Default::default()
/// };
/// let now = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_opt(12, 0, 0)
///     .unwrap();
///
/// let result = normalize_and_validate_driver(&raw, &Ontario, &ValidationConfig::default(), now);
/// assert!(result.is_valid());
/// assert_eq!(result.driver.full_name, "Doe, Jane");
/// assert_eq!(result.driver.fields.home_phone.as_deref(), Some("519-555-1234"));
/// ```
pub fn normalize_and_validate_driver<L: ProvinceLookup + ?Sized>(
    raw: &DriverForm,
    provinces: &L,
    config: &ValidationConfig,
    now: NaiveDateTime,
) -> DriverValidation {
    let driver = normalize_driver(raw);
    let (accepted, errors) = check(&driver, provinces, config, now);
    DriverValidation {
        driver,
        errors,
        accepted,
    }
}

/// Check every field, building the record only when all of them pass.
fn check<L: ProvinceLookup + ?Sized>(
    driver: &NormalizedDriver,
    provinces: &L,
    config: &ValidationConfig,
    now: NaiveDateTime,
) -> (Option<Driver>, Vec<FieldError>) {
    let fields = &driver.fields;
    let mut errors = Vec::new();

    let first_name = required(&fields.first_name, Field::FirstName, &mut errors);
    let last_name = required(&fields.last_name, Field::LastName, &mut errors);
    let province_code = check_province(fields.province_code.as_deref(), provinces, &mut errors);
    let postal_code = check_postal_code(fields.postal_code.as_deref(), config, &mut errors);
    let home_phone = check_home_phone(fields.home_phone.as_deref(), &mut errors);
    let work_phone = check_work_phone(fields.work_phone.as_deref(), &mut errors);
    let date_hired = check_date_hired(fields.date_hired.as_deref(), now, &mut errors);

    if !errors.is_empty() {
        return (None, errors);
    }

    let (
        Some(first_name),
        Some(last_name),
        Some(province_code),
        Some(postal_code),
        Some(home_phone),
        Some(work_phone),
        Some(date_hired),
    ) = (
        first_name,
        last_name,
        province_code,
        postal_code,
        home_phone,
        work_phone,
        date_hired,
    )
    else {
        return (None, errors);
    };

    let accepted = Driver {
        id: 0,
        first_name,
        last_name,
        full_name: driver.full_name.clone(),
        home_phone,
        work_phone,
        street: fields.street.clone(),
        city: fields.city.clone(),
        postal_code,
        province_code,
        date_hired,
    };

    (Some(accepted), errors)
}

fn required(value: &Option<String>, field: Field, errors: &mut Vec<FieldError>) -> Option<String> {
    if value.is_none() {
        errors.push(FieldError::Required { field });
    }
    value.clone()
}

fn check_province<L: ProvinceLookup + ?Sized>(
    value: Option<&str>,
    provinces: &L,
    errors: &mut Vec<FieldError>,
) -> Option<ProvinceCode> {
    let Some(code) = value else {
        errors.push(FieldError::Required {
            field: Field::Province,
        });
        return None;
    };

    let unknown = || FieldError::UnknownProvince {
        value: code.to_string(),
    };

    match lookup_province_code(provinces, code) {
        Ok(true) => match ProvinceCode::parse(code) {
            Ok(province) => Some(province),
            Err(_) => {
                errors.push(unknown());
                None
            }
        },
        Ok(false) => {
            errors.push(unknown());
            None
        }
        Err(e) => {
            warn!(code, error = %e, "province lookup failed during validation");
            errors.push(FieldError::ProvinceLookupFailed {
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Outer `None` means the field failed.
fn check_postal_code(
    value: Option<&str>,
    config: &ValidationConfig,
    errors: &mut Vec<FieldError>,
) -> Option<Option<PostalCode>> {
    match validate_postal_code(value) {
        Ok(None) if config.postal_code == PostalCodePolicy::Required => {
            errors.push(FieldError::Required {
                field: Field::PostalCode,
            });
            None
        }
        Ok(code) => Some(code),
        Err(_) => {
            errors.push(FieldError::PostalCode {
                value: value.unwrap_or_default().to_string(),
            });
            None
        }
    }
}

fn check_home_phone(value: Option<&str>, errors: &mut Vec<FieldError>) -> Option<PhoneNumber> {
    match validate_phone_number(value, false) {
        Ok(Some(phone)) => Some(phone),
        Ok(None) | Err(_) if value.is_none() => {
            errors.push(FieldError::Required {
                field: Field::HomePhone,
            });
            None
        }
        Ok(None) | Err(_) => {
            errors.push(FieldError::Phone {
                value: value.unwrap_or_default().to_string(),
            });
            None
        }
    }
}

/// Outer `None` means the field failed.
fn check_work_phone(
    value: Option<&str>,
    errors: &mut Vec<FieldError>,
) -> Option<Option<PhoneNumber>> {
    match validate_phone_number(value, true) {
        Ok(phone) => Some(phone),
        Err(_) => {
            errors.push(FieldError::OptionalPhone {
                value: value.unwrap_or_default().to_string(),
            });
            None
        }
    }
}

fn check_date_hired(
    value: Option<&str>,
    now: NaiveDateTime,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let field = Field::DateHired;
    match validate_not_in_future(value, now) {
        Ok(date) => Some(date),
        Err(HireDateError::Invalid) => {
            errors.push(FieldError::InvalidDate { field });
            None
        }
        Err(HireDateError::InFuture) => {
            errors.push(FieldError::InFuture { field });
            None
        }
    }
}

/// Trim, treating blank text as absent.
fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn normalize_phone(value: String) -> String {
    match PhoneNumber::parse(&value) {
        Ok(phone) => phone.to_string(),
        Err(_) => value,
    }
}

fn normalize_date(value: String) -> String {
    match parse_date(&value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;
    use std::cell::Cell;

    /// Province set backed by a fixed list.
    struct Provinces(&'static [&'static str]);

    impl ProvinceLookup for Provinces {
        fn province_exists(&self, code: &str) -> Result<bool, StoreError> {
            Ok(self.0.iter().any(|c| *c == code))
        }
    }

    /// Province lookup that always fails.
    struct Unreachable {
        calls: Cell<usize>,
    }

    impl ProvinceLookup for Unreachable {
        fn province_exists(&self, _code: &str) -> Result<bool, StoreError> {
            self.calls.set(self.calls.get() + 1);
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    const CANADA: Provinces = Provinces(&["ON", "QC", "BC"]);

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn raw() -> DriverForm {
        DriverForm {
            first_name: some("  jOHN "),
            last_name: some("van der berg"),
            home_phone: some("519.555.1234"),
            work_phone: some(""),
            street: some(" 12 King St "),
            city: some("Waterloo"),
            postal_code: some("n2l-3g1"),
            province_code: some("on"),
            date_hired: some("23 Jun 2016"),
        }
    }

    fn validate(form: &DriverForm) -> DriverValidation {
        normalize_and_validate_driver(form, &CANADA, &ValidationConfig::default(), now())
    }

    #[test]
    fn normalizes_every_field() {
        let normalized = normalize_driver(&raw());
        let f = &normalized.fields;
        assert_eq!(f.first_name.as_deref(), Some("John"));
        assert_eq!(f.last_name.as_deref(), Some("Van Der Berg"));
        assert_eq!(normalized.full_name, "Van Der Berg, John");
        assert_eq!(f.home_phone.as_deref(), Some("519-555-1234"));
        assert_eq!(f.work_phone, None);
        assert_eq!(f.street.as_deref(), Some("12 King St"));
        assert_eq!(f.postal_code.as_deref(), Some("N2L 3G1"));
        assert_eq!(f.province_code.as_deref(), Some("ON"));
        assert_eq!(f.date_hired.as_deref(), Some("2016-06-23"));
    }

    #[test]
    fn valid_driver_builds_record() {
        let result = validate(&raw());
        assert!(result.is_valid(), "{:?}", result.errors);

        let driver = result.into_driver(42).unwrap();
        assert_eq!(driver.id, 42);
        assert_eq!(driver.full_name, "Van Der Berg, John");
        assert_eq!(driver.home_phone.digits(), "5195551234");
        assert_eq!(driver.work_phone, None);
        assert_eq!(driver.province_code.as_str(), "ON");
        assert_eq!(driver.postal_code.map(|c| c.to_string()).as_deref(), Some("N2L 3G1"));
        assert_eq!(driver.date_hired, NaiveDate::from_ymd_opt(2016, 6, 23).unwrap());
    }

    #[test]
    fn normalizing_twice_is_idempotent() {
        let first = validate(&raw());
        assert!(first.is_valid());

        let second = validate(&first.driver.fields);
        assert_eq!(second.driver, first.driver);
        assert!(second.errors.is_empty());
    }

    #[test]
    fn collects_all_failures() {
        let form = DriverForm {
            first_name: None,
            last_name: some("Smith"),
            home_phone: some("123"),
            work_phone: some("55"),
            street: None,
            city: None,
            postal_code: some("D1A1A1"),
            province_code: some("ZZ"),
            date_hired: some("whenever"),
        };

        let result = validate(&form);
        let fields: Vec<Field> = result.errors.iter().map(FieldError::field).collect();
        assert_eq!(
            fields,
            vec![
                Field::FirstName,
                Field::Province,
                Field::PostalCode,
                Field::HomePhone,
                Field::WorkPhone,
                Field::DateHired,
            ]
        );
        assert!(result.into_driver(1).is_err());
    }

    #[test]
    fn failure_in_one_field_still_normalizes_others() {
        let form = DriverForm {
            home_phone: some("12"),
            ..raw()
        };
        let result = validate(&form);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.driver.fields.first_name.as_deref(), Some("John"));
        assert_eq!(result.driver.fields.home_phone.as_deref(), Some("12"));
        assert_eq!(
            result.errors[0].to_string(),
            "Phone number 12 was not valid, please enter a 10 digit phone number (i.e. 519-123-4567)"
        );
    }

    #[test]
    fn missing_home_phone_is_required() {
        let form = DriverForm {
            home_phone: some("   "),
            ..raw()
        };
        let result = validate(&form);
        assert_eq!(
            result.errors,
            vec![FieldError::Required {
                field: Field::HomePhone
            }]
        );
    }

    #[test]
    fn future_hire_date_is_rejected() {
        let form = DriverForm {
            date_hired: some("2024-03-16"),
            ..raw()
        };
        let result = validate(&form);
        assert_eq!(
            result.errors,
            vec![FieldError::InFuture {
                field: Field::DateHired
            }]
        );
    }

    #[test]
    fn missing_hire_date_asks_for_valid_date() {
        let form = DriverForm {
            date_hired: None,
            ..raw()
        };
        let result = validate(&form);
        assert_eq!(
            result.errors,
            vec![FieldError::InvalidDate {
                field: Field::DateHired
            }]
        );
    }

    #[test]
    fn postal_code_policy_decides_empty() {
        let form = DriverForm {
            postal_code: None,
            ..raw()
        };

        let required = validate(&form);
        assert_eq!(
            required.errors,
            vec![FieldError::Required {
                field: Field::PostalCode
            }]
        );

        let optional = normalize_and_validate_driver(
            &form,
            &CANADA,
            &ValidationConfig::new(PostalCodePolicy::Optional),
            now(),
        );
        assert!(optional.is_valid());
        assert_eq!(optional.into_driver(1).unwrap().postal_code, None);
    }

    #[test]
    fn unknown_province_message() {
        let form = DriverForm {
            province_code: some("xx"),
            ..raw()
        };
        let result = validate(&form);
        assert_eq!(
            result.errors[0].to_string(),
            "XX is not a valid province code, please ensure it is only two letters"
        );
    }

    #[test]
    fn long_province_code_skips_lookup() {
        let lookup = Unreachable {
            calls: Cell::new(0),
        };
        let form = DriverForm {
            province_code: some("Ontario"),
            ..raw()
        };
        let result =
            normalize_and_validate_driver(&form, &lookup, &ValidationConfig::default(), now());
        assert_eq!(lookup.calls.get(), 0);
        assert!(matches!(
            result.errors.as_slice(),
            [FieldError::UnknownProvince { .. }]
        ));
    }

    #[test]
    fn lookup_failure_is_a_field_error() {
        let lookup = Unreachable {
            calls: Cell::new(0),
        };
        let result =
            normalize_and_validate_driver(&raw(), &lookup, &ValidationConfig::default(), now());
        assert_eq!(lookup.calls.get(), 1);
        assert!(matches!(
            result.errors.as_slice(),
            [FieldError::ProvinceLookupFailed { .. }]
        ));
    }

    #[test]
    fn validate_driver_matches_composed_errors() {
        let normalized = normalize_driver(&DriverForm::default());
        let errors = validate_driver(&normalized, &CANADA, &ValidationConfig::default(), now());
        assert_eq!(errors, validate(&DriverForm::default()).errors);
        assert_eq!(normalized.full_name, ", ");
    }

    #[test]
    fn form_from_driver_roundtrips() {
        let driver = validate(&raw()).into_driver(3).unwrap();
        let again = validate(&DriverForm::from(&driver)).into_driver(3).unwrap();
        assert_eq!(again, driver);
    }

    #[test]
    fn errors_for_field() {
        let form = DriverForm {
            work_phone: some("12"),
            ..raw()
        };
        let result = validate(&form);
        assert_eq!(result.errors_for(Field::WorkPhone).count(), 1);
        assert_eq!(result.errors_for(Field::HomePhone).count(), 0);
    }
}
