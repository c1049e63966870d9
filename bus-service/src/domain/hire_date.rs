//! Hire date parsing and the "not in the future" rule.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Accepted input formats, tried in order.
///
/// `23 Jun 2016` is the display format used on the driver pages.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %b %Y", "%d %B %Y", "%m/%d/%Y"];

/// Why a hire date was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HireDateError {
    /// Missing or not a recognizable date
    #[error("must be a valid date like 23 Jun 2016")]
    Invalid,

    /// Parsed, but not strictly before now
    #[error("cannot be in future")]
    InFuture,
}

/// Parse a date in any of the accepted formats.
///
/// # Examples
///
/// ```
/// use bus_service::domain::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2016, 6, 23);
/// assert_eq!(parse_date("2016-06-23"), expected);
/// assert_eq!(parse_date("23 Jun 2016"), expected);
/// assert_eq!(parse_date("not a date"), None);
/// ```
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Check that a date is present, parses, and is strictly before `now`.
///
/// The date is taken to start at midnight, so today's date is accepted
/// for any `now` after 00:00.
pub fn validate_not_in_future(
    value: Option<&str>,
    now: NaiveDateTime,
) -> Result<NaiveDate, HireDateError> {
    let date = value.and_then(parse_date).ok_or(HireDateError::Invalid)?;

    if date.and_time(NaiveTime::MIN) < now {
        Ok(date)
    } else {
        Err(HireDateError::InFuture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn iso(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    #[test]
    fn yesterday_is_valid() {
        let yesterday = now().date() - Duration::days(1);
        assert_eq!(
            validate_not_in_future(Some(&iso(yesterday)), now()),
            Ok(yesterday)
        );
    }

    #[test]
    fn today_is_valid_after_midnight() {
        let today = now().date();
        assert_eq!(validate_not_in_future(Some(&iso(today)), now()), Ok(today));
    }

    #[test]
    fn tomorrow_is_in_future() {
        let tomorrow = now().date() + Duration::days(1);
        assert_eq!(
            validate_not_in_future(Some(&iso(tomorrow)), now()),
            Err(HireDateError::InFuture)
        );
    }

    #[test]
    fn garbage_is_invalid_not_future() {
        let err = validate_not_in_future(Some("next tuesday"), now()).unwrap_err();
        assert_eq!(err, HireDateError::Invalid);
        assert_eq!(err.to_string(), "must be a valid date like 23 Jun 2016");
    }

    #[test]
    fn missing_is_invalid() {
        assert_eq!(
            validate_not_in_future(None, now()),
            Err(HireDateError::Invalid)
        );
        assert_eq!(
            validate_not_in_future(Some(""), now()),
            Err(HireDateError::Invalid)
        );
    }

    #[test]
    fn accepts_display_formats() {
        let expected = NaiveDate::from_ymd_opt(2013, 10, 23);
        assert_eq!(parse_date("23 Oct 2013"), expected);
        assert_eq!(parse_date("23 October 2013"), expected);
        assert_eq!(parse_date("10/23/2013"), expected);
        assert_eq!(parse_date(" 2013-10-23 "), expected);
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(parse_date("2013-02-30"), None);
    }
}
