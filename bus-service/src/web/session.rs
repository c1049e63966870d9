//! Remembered route and stop choices, kept in cookies.

use std::collections::HashMap;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderName};
use axum::response::AppendHeaders;

use crate::context::{ContextKey, Preferences};

const KEYS: [ContextKey; 3] = [
    ContextKey::RouteCode,
    ContextKey::RouteStopId,
    ContextKey::BusStopNumber,
];

/// Preferences read from the request's cookies.
///
/// Values set during the request are sent back as `Set-Cookie` headers.
/// Only route codes and numbers are stored, so values never need escaping.
#[derive(Debug, Default)]
pub struct CookiePreferences {
    values: HashMap<ContextKey, String>,
    changed: Vec<ContextKey>,
}

impl CookiePreferences {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut values = HashMap::new();
        let pairs = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.split_once('='));

        for (name, value) in pairs {
            let name = name.trim();
            if let Some(key) = KEYS.into_iter().find(|k| k.name() == name) {
                values.insert(key, value.trim().to_string());
            }
        }

        Self {
            values,
            changed: Vec::new(),
        }
    }

    /// `Set-Cookie` headers for every value changed during this request.
    pub fn into_headers(self) -> AppendHeaders<Vec<(HeaderName, String)>> {
        let headers = self
            .changed
            .iter()
            .filter_map(|key| {
                let value = self.values.get(key)?;
                Some((
                    SET_COOKIE,
                    format!("{}={}; Path=/; SameSite=Lax", key.name(), value),
                ))
            })
            .collect();
        AppendHeaders(headers)
    }
}

impl Preferences for CookiePreferences {
    fn get(&self, key: ContextKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: ContextKey, value: &str) {
        self.values.insert(key, value.to_string());
        if !self.changed.contains(&key) {
            self.changed.push(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn reads_known_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; busroutecode=12; routestopid=4"),
        );
        let prefs = CookiePreferences::from_headers(&headers);
        assert_eq!(prefs.get(ContextKey::RouteCode).as_deref(), Some("12"));
        assert_eq!(prefs.get(ContextKey::RouteStopId).as_deref(), Some("4"));
        assert_eq!(prefs.get(ContextKey::BusStopNumber), None);
    }

    #[test]
    fn only_changes_are_sent() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("busroutecode=12"));
        let mut prefs = CookiePreferences::from_headers(&headers);
        prefs.set(ContextKey::BusStopNumber, "100");
        prefs.set(ContextKey::BusStopNumber, "200");

        let AppendHeaders(sent) = prefs.into_headers();
        assert_eq!(
            sent,
            vec![(SET_COOKIE, "busstopnumber=200; Path=/; SameSite=Lax".to_string())]
        );
    }

    #[test]
    fn no_cookies() {
        let prefs = CookiePreferences::from_headers(&HeaderMap::new());
        assert_eq!(prefs.get(ContextKey::RouteCode), None);
        let AppendHeaders(sent) = prefs.into_headers();
        assert!(sent.is_empty());
    }
}
