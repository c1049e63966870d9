//! Which route or stop a request is about.
//!
//! Pages that work on "the current route" take the route from, in order:
//! the path, the query string, and the client's remembered choice. Whatever
//! is chosen is remembered for the next request.

use std::fmt;

use crate::domain::RouteCode;

/// Guidance shown when no route was chosen before viewing route stops.
pub const SELECT_ROUTE_FOR_STOPS: &str = "Please select a bus route before viewing bus stops";

/// Guidance shown when no route was chosen before viewing schedules.
pub const SELECT_ROUTE_FOR_SCHEDULE: &str =
    "Please select a bus route before viewing its schedule";

/// Guidance shown when no usable stop number was given.
pub const SELECT_VALID_STOP: &str = "Please select a valid bus stop number.";

/// Guidance shown when a stop's schedule cannot be found.
pub const SELECT_STOP_AGAIN: &str =
    "Could not find schedule data for the specified stop, please select the stop again.";

/// A remembered piece of context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    RouteCode,
    RouteStopId,
    BusStopNumber,
}

impl ContextKey {
    /// Name used for the query parameter and the remembered value.
    pub fn name(&self) -> &'static str {
        match self {
            ContextKey::RouteCode => "busroutecode",
            ContextKey::RouteStopId => "routestopid",
            ContextKey::BusStopNumber => "busstopnumber",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Client-scoped remembered values.
pub trait Preferences {
    fn get(&self, key: ContextKey) -> Option<String>;

    fn set(&mut self, key: ContextKey, value: &str);
}

/// No context could be resolved; show a listing with this guidance instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct UnresolvedContext {
    pub key: ContextKey,
    pub message: &'static str,
}

/// Pick the first non-empty identifier, in precedence order.
///
/// # Examples
///
/// ```
/// use bus_service::context::resolve_active_identifier;
///
/// assert_eq!(resolve_active_identifier(Some("5"), Some("7"), Some("9")), Some("5"));
/// assert_eq!(resolve_active_identifier(None, Some("7"), Some("9")), Some("7"));
/// assert_eq!(resolve_active_identifier(Some(""), None, Some("9")), Some("9"));
/// assert_eq!(resolve_active_identifier(None, None, None), None);
/// ```
pub fn resolve_active_identifier<'a>(
    explicit: Option<&'a str>,
    query: Option<&'a str>,
    persisted: Option<&'a str>,
) -> Option<&'a str> {
    [explicit, query, persisted]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Resolve the active route code and remember it.
///
/// A value that is not a valid route code counts as absent.
pub fn select_route_code<P: Preferences + ?Sized>(
    explicit: Option<&str>,
    query: Option<&str>,
    preferences: &mut P,
    guidance: &'static str,
) -> Result<RouteCode, UnresolvedContext> {
    let key = ContextKey::RouteCode;
    let persisted = preferences.get(key);
    let code = resolve_active_identifier(explicit, query, persisted.as_deref())
        .and_then(|value| RouteCode::parse(value).ok());

    match code {
        Some(code) => {
            preferences.set(key, code.as_str());
            Ok(code)
        }
        None => {
            tracing::debug!(%key, "no route selected");
            Err(UnresolvedContext {
                key,
                message: guidance,
            })
        }
    }
}

/// Resolve a numeric identifier (route stop id or stop number) and remember
/// it.
pub fn select_number<P: Preferences + ?Sized>(
    key: ContextKey,
    explicit: Option<&str>,
    query: Option<&str>,
    preferences: &mut P,
    guidance: &'static str,
) -> Result<i32, UnresolvedContext> {
    let persisted = preferences.get(key);
    let number = resolve_active_identifier(explicit, query, persisted.as_deref())
        .and_then(|value| value.parse::<i32>().ok());

    match number {
        Some(number) => {
            preferences.set(key, &number.to_string());
            Ok(number)
        }
        None => {
            tracing::debug!(%key, "no identifier selected");
            Err(UnresolvedContext {
                key,
                message: guidance,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[derive(Default)]
    struct Remembered(HashMap<ContextKey, String>);

    impl Preferences for Remembered {
        fn get(&self, key: ContextKey) -> Option<String> {
            self.0.get(&key).cloned()
        }

        fn set(&mut self, key: ContextKey, value: &str) {
            self.0.insert(key, value.to_string());
        }
    }

    #[test]
    fn precedence() {
        assert_eq!(
            resolve_active_identifier(Some("5"), Some("7"), Some("9")),
            Some("5")
        );
        assert_eq!(resolve_active_identifier(None, Some("7"), Some("9")), Some("7"));
        assert_eq!(resolve_active_identifier(None, None, Some("9")), Some("9"));
        assert_eq!(resolve_active_identifier(None, None, None), None);
    }

    #[test]
    fn empty_values_skipped() {
        assert_eq!(resolve_active_identifier(Some(""), Some("  "), Some("9")), Some("9"));
        assert_eq!(resolve_active_identifier(Some(""), Some(""), Some("")), None);
    }

    #[test]
    fn selection_is_remembered() {
        let mut prefs = Remembered::default();
        let code = select_route_code(Some("12"), None, &mut prefs, SELECT_ROUTE_FOR_STOPS).unwrap();
        assert_eq!(code.as_str(), "12");

        let again = select_route_code(None, None, &mut prefs, SELECT_ROUTE_FOR_STOPS).unwrap();
        assert_eq!(again, code);
    }

    #[test]
    fn query_overrides_remembered() {
        let mut prefs = Remembered::default();
        prefs.set(ContextKey::RouteCode, "12");
        let code = select_route_code(None, Some("7"), &mut prefs, SELECT_ROUTE_FOR_STOPS).unwrap();
        assert_eq!(code.as_str(), "7");
        assert_eq!(prefs.get(ContextKey::RouteCode).as_deref(), Some("7"));
    }

    #[test]
    fn unresolved_carries_guidance() {
        let mut prefs = Remembered::default();
        let err = select_route_code(None, None, &mut prefs, SELECT_ROUTE_FOR_STOPS).unwrap_err();
        assert_eq!(err.key, ContextKey::RouteCode);
        assert_eq!(err.to_string(), SELECT_ROUTE_FOR_STOPS);
        assert!(prefs.get(ContextKey::RouteCode).is_none());
    }

    #[test]
    fn invalid_route_code_is_unresolved() {
        let mut prefs = Remembered::default();
        assert!(select_route_code(Some("no spaces!"), None, &mut prefs, SELECT_ROUTE_FOR_STOPS).is_err());
    }

    #[test]
    fn numbers() {
        let mut prefs = Remembered::default();
        let id = select_number(
            ContextKey::RouteStopId,
            None,
            Some("4"),
            &mut prefs,
            SELECT_STOP_AGAIN,
        )
        .unwrap();
        assert_eq!(id, 4);
        assert_eq!(prefs.get(ContextKey::RouteStopId).as_deref(), Some("4"));

        let err = select_number(
            ContextKey::BusStopNumber,
            Some("abc"),
            None,
            &mut prefs,
            SELECT_STOP_AGAIN,
        )
        .unwrap_err();
        assert_eq!(err.message, SELECT_STOP_AGAIN);
    }

    #[test]
    fn key_names() {
        assert_eq!(ContextKey::RouteCode.to_string(), "busroutecode");
        assert_eq!(ContextKey::RouteStopId.name(), "routestopid");
    }
}
