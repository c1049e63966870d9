//! Bus routes and the stops they call at.

use std::cmp::Ordering;
use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Longest route code accepted.
const MAX_ROUTE_CODE_LEN: usize = 10;

/// Error returned when parsing an invalid route code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route code: {reason}")]
pub struct InvalidRouteCode {
    reason: &'static str,
}

/// A route code such as `12` or `200X`.
///
/// Codes are 1-10 ASCII letters, digits or hyphens. Ordering puts purely
/// numeric codes first, in numeric order, then everything else
/// alphabetically, which is how routes are listed.
///
/// # Examples
///
/// ```
/// use bus_service::domain::RouteCode;
///
/// let mut codes: Vec<RouteCode> = ["200", "12", "7X", "3"]
///     .into_iter()
///     .map(|c| RouteCode::parse(c).unwrap())
///     .collect();
/// codes.sort();
/// let listed: Vec<&str> = codes.iter().map(RouteCode::as_str).collect();
/// assert_eq!(listed, ["3", "12", "200", "7X"]);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteCode(String);

impl RouteCode {
    /// Parse a route code, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidRouteCode> {
        let s = s.trim();

        if s.is_empty() || s.len() > MAX_ROUTE_CODE_LEN {
            return Err(InvalidRouteCode {
                reason: "must be 1-10 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(InvalidRouteCode {
                reason: "must be ASCII letters, digits or hyphens",
            });
        }

        Ok(RouteCode(s.to_string()))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for RouteCode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for RouteCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for RouteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteCode({})", self.0)
    }
}

impl fmt::Display for RouteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RouteCode {
    type Error = InvalidRouteCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RouteCode> for String {
    fn from(value: RouteCode) -> Self {
        value.0
    }
}

/// Error returned for a negative or non-numeric offset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid offset: {reason}")]
pub struct InvalidOffset {
    reason: &'static str,
}

/// Minutes after a route's scheduled start at which it reaches a stop.
///
/// Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct OffsetMinutes(u32);

impl OffsetMinutes {
    /// Create an offset, rejecting negative values.
    pub fn new(minutes: i64) -> Result<Self, InvalidOffset> {
        if minutes < 0 {
            return Err(InvalidOffset {
                reason: "must not be negative",
            });
        }
        u32::try_from(minutes)
            .map(OffsetMinutes)
            .map_err(|_| InvalidOffset {
                reason: "too large",
            })
    }

    /// Parse an offset from form input.
    pub fn parse(s: &str) -> Result<Self, InvalidOffset> {
        let minutes = s.trim().parse::<i64>().map_err(|_| InvalidOffset {
            reason: "must be a whole number of minutes",
        })?;
        Self::new(minutes)
    }

    /// Returns the number of minutes.
    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Returns the offset as a Duration.
    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for OffsetMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for OffsetMinutes {
    type Error = InvalidOffset;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OffsetMinutes> for i64 {
    fn from(value: OffsetMinutes) -> Self {
        i64::from(value.0)
    }
}

/// A bus route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusRoute {
    pub code: RouteCode,
    pub name: String,
}

/// Assignment of a stop to a route, with the minute offset from the route's
/// start time.
///
/// Several rows share a route code, one per stop on the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    pub id: i32,
    pub route_code: RouteCode,
    pub stop_number: i32,
    pub offset: OffsetMinutes,
}
