//! Per-call fetch options.

use crate::http::Body;
use crate::request::query::Query;
use http::header::IntoHeaderName;
use http::{Extensions, HeaderMap, HeaderValue, StatusCode};
use std::collections::HashMap;

/// Path placeholder values, keyed by placeholder name.
pub type PathParams = HashMap<String, String>;

/// Which non-ok statuses are still treated as success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowFailed {
    /// Every non-ok status is an error.
    #[default]
    Never,
    /// No status is an error.
    Always,
    /// Only the listed statuses pass.
    Statuses(Vec<u16>),
}

impl AllowFailed {
    pub fn allows(&self, status: StatusCode) -> bool {
        match self {
            AllowFailed::Never => false,
            AllowFailed::Always => true,
            AllowFailed::Statuses(codes) => codes.contains(&status.as_u16()),
        }
    }
}

impl From<bool> for AllowFailed {
    fn from(allow: bool) -> Self {
        if allow {
            AllowFailed::Always
        } else {
            AllowFailed::Never
        }
    }
}

impl From<Vec<u16>> for AllowFailed {
    fn from(codes: Vec<u16>) -> Self {
        AllowFailed::Statuses(codes)
    }
}

impl<const N: usize> From<[u16; N]> for AllowFailed {
    fn from(codes: [u16; N]) -> Self {
        AllowFailed::Statuses(codes.to_vec())
    }
}

/// Options for a single fetch.
///
/// # Example
///
/// ```rust,ignore
/// let options = FetchOptions::new()
///     .method("post")
///     .header("x-trace", "1")
///     .query(Query::new().append("page", 2))
///     .allow_failed([404]);
/// ```
#[derive(Debug, Default)]
pub struct FetchOptions {
    /// Defaults to `GET`; case-insensitive.
    pub method: Option<String>,
    pub headers: HeaderMap,
    pub body: Body,
    /// Merged into the URL's query string.
    pub query: Option<Query>,
    /// Path placeholder values, used by suite endpoints.
    pub params: PathParams,
    pub allow_failed: AllowFailed,
    /// Out-of-band values for middleware, keyed by type.
    pub extensions: Extensions,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Add a header. Values that are not valid header values are ignored.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: IntoHeaderName,
        V: TryInto<HeaderValue>,
    {
        if let Ok(val) = value.try_into() {
            self.headers.insert(key, val);
        }
        self
    }

    /// Add a header value, keeping any values already set for `key`.
    pub fn append_header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: IntoHeaderName,
        V: TryInto<HeaderValue>,
    {
        if let Ok(val) = value.try_into() {
            self.headers.append(key, val);
        }
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON body from any serializable value.
    #[cfg(feature = "json")]
    pub fn json<T: serde::Serialize>(mut self, json: &T) -> Self {
        if let Ok(value) = serde_json::to_value(json) {
            self.body = Body::Json(value);
        }
        self
    }

    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn allow_failed(mut self, allow: impl Into<AllowFailed>) -> Self {
        self.allow_failed = allow.into();
        self
    }

    pub fn extension<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.extensions.insert(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_failed() {
        assert!(!AllowFailed::Never.allows(StatusCode::NOT_FOUND));
        assert!(AllowFailed::from(true).allows(StatusCode::NOT_FOUND));
        assert!(AllowFailed::from([404]).allows(StatusCode::NOT_FOUND));
        assert!(!AllowFailed::from(vec![401]).allows(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_builder() {
        #[derive(Clone, Debug, PartialEq)]
        struct Marker(u8);

        let options = FetchOptions::new()
            .method("patch")
            .header("x-custom", "value")
            .header("x-bad", "bad\nvalue")
            .param("id", 7)
            .extension(Marker(3));

        assert_eq!(options.method.as_deref(), Some("patch"));
        assert_eq!(options.headers.get("x-custom").unwrap(), "value");
        assert!(options.headers.get("x-bad").is_none());
        assert_eq!(options.params.get("id").map(String::as_str), Some("7"));
        assert_eq!(options.extensions.get::<Marker>(), Some(&Marker(3)));
    }

    #[test]
    fn test_append_header_keeps_values() {
        let options = FetchOptions::new()
            .append_header("accept", "text/plain")
            .append_header("accept", "application/json")
            .header("x-once", "a")
            .header("x-once", "b");

        let accept: Vec<_> = options.headers.get_all("accept").iter().collect();
        assert_eq!(accept, ["text/plain", "application/json"]);
        assert_eq!(options.headers.get_all("x-once").iter().count(), 1);
        assert_eq!(options.headers["x-once"], "b");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_body() {
        let options = FetchOptions::new().json(&serde_json::json!({ "key": 1234 }));
        assert!(matches!(options.body, Body::Json(_)));
    }
}
