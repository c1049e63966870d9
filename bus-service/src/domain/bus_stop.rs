//! Bus stops and their location hash.

use serde::{Deserialize, Serialize};

/// Additive checksum of the bytes of a location name.
///
/// Used only as a cheap change marker for the location text; it is not
/// collision resistant.
///
/// # Examples
///
/// ```
/// use bus_service::domain::location_hash;
///
/// assert_eq!(location_hash(""), 0);
/// assert_eq!(location_hash("AB"), 65 + 66);
/// ```
pub fn location_hash(location: &str) -> u32 {
    location
        .bytes()
        .fold(0u32, |hash, b| hash.wrapping_add(u32::from(b)))
}

/// A bus stop.
///
/// The location hash is always the [`location_hash`] of the current
/// location; the only way to change the location is through
/// [`BusStop::set_location`], which recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BusStopFields")]
pub struct BusStop {
    number: i32,
    location: String,
    going_downtown: bool,
    location_hash: u32,
}

/// Stored fields of a stop; the hash is always recomputed on load.
#[derive(Deserialize)]
struct BusStopFields {
    number: i32,
    location: String,
    going_downtown: bool,
}

impl From<BusStopFields> for BusStop {
    fn from(fields: BusStopFields) -> Self {
        BusStop::new(fields.number, fields.location, fields.going_downtown)
    }
}

impl BusStop {
    /// Create a stop, deriving its location hash.
    pub fn new(number: i32, location: impl Into<String>, going_downtown: bool) -> Self {
        let location = location.into();
        Self {
            number,
            location_hash: location_hash(&location),
            location,
            going_downtown,
        }
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn going_downtown(&self) -> bool {
        self.going_downtown
    }

    pub fn location_hash(&self) -> u32 {
        self.location_hash
    }

    /// Replace the location text and recompute the hash.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
        self.location_hash = location_hash(&self.location);
    }

    pub fn set_going_downtown(&mut self, going_downtown: bool) {
        self.going_downtown = going_downtown;
    }
}
