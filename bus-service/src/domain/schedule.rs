//! Base route schedules.
//!
//! A route schedule row is one scheduled start of a route, as a naive local
//! time of day. Per-stop arrival times are derived from these rows by the
//! schedule resolver.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::RouteCode;

/// Error returned when parsing an invalid start time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a start time from "HH:MM" or "HH:MM:SS".
///
/// # Examples
///
/// ```
/// use bus_service::domain::parse_start_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_start_time("08:30"), Ok(NaiveTime::from_hms_opt(8, 30, 0).unwrap()));
/// assert_eq!(parse_start_time("08:30:15"), Ok(NaiveTime::from_hms_opt(8, 30, 15).unwrap()));
/// assert!(parse_start_time("8:30").is_err());
/// assert!(parse_start_time("24:00").is_err());
/// ```
pub fn parse_start_time(s: &str) -> Result<NaiveTime, TimeError> {
    let bytes = s.trim().as_bytes();

    if bytes.len() != 5 && bytes.len() != 8 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    let second = if bytes.len() == 8 {
        if bytes[5] != b':' {
            return Err(TimeError::new("expected colon at position 5"));
        }
        parse_two_digits(&bytes[6..8]).ok_or_else(|| TimeError::new("invalid second digits"))?
    } else {
        0
    };

    NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| TimeError::new("invalid time"))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// One scheduled start of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSchedule {
    pub id: i32,
    pub route_code: RouteCode,
    pub start_time: NaiveTime,
    pub is_weekday: bool,
    #[serde(default)]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parse_valid_times() {
        assert_eq!(parse_start_time("00:00"), Ok(hm(0, 0)));
        assert_eq!(parse_start_time("23:59"), Ok(hm(23, 59)));
        assert_eq!(parse_start_time(" 08:10 "), Ok(hm(8, 10)));
    }

    #[test]
    fn parse_invalid_times() {
        assert!(parse_start_time("").is_err());
        assert!(parse_start_time("0810").is_err());
        assert!(parse_start_time("08-10").is_err());
        assert!(parse_start_time("08:60").is_err());
        assert!(parse_start_time("ab:cd").is_err());
        assert!(parse_start_time("08:10:99").is_err());
        assert!(parse_start_time("08:10-00").is_err());
    }

    #[test]
    fn serde_roundtrip_keeps_time() {
        let row = RouteSchedule {
            id: 4,
            route_code: RouteCode::parse("12").unwrap(),
            start_time: hm(8, 30),
            is_weekday: true,
            comments: None,
        };
        let json = serde_json::to_string(&row).unwrap();
        let back: RouteSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
