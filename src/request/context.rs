use crate::http::Body;
use crate::request::options::{AllowFailed, FetchOptions};
use crate::request::query::Query;
use http::{Extensions, HeaderMap};
use url::Url;

/// Mutable state of one logical fetch.
///
/// Created once per call and handed by `&mut` to every middleware link, so
/// changes made before `next` are seen downstream and changes made after it
/// are seen by the links still unwinding.
#[derive(Debug)]
pub struct RequestContext {
    pub url: Url,
    /// Case-insensitive; uppercased when the request is sent.
    pub method: String,
    pub headers: HeaderMap,
    pub body: Body,
    /// Merged into the URL's query string when the request is sent.
    pub query: Option<Query>,
    pub allow_failed: AllowFailed,
    /// Side channel for middleware; forwarded to the transport request.
    pub extensions: Extensions,
}

impl RequestContext {
    /// A bare `GET` context for `url`.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            method: "GET".to_owned(),
            headers: HeaderMap::new(),
            body: Body::Empty,
            query: None,
            allow_failed: AllowFailed::Never,
            extensions: Extensions::new(),
        }
    }

    /// Build the context for `url` from caller options.
    ///
    /// Path params are not part of the context; endpoints substitute them
    /// before the URL is resolved.
    pub fn from_options(url: Url, options: FetchOptions) -> Self {
        let FetchOptions {
            method,
            headers,
            body,
            query,
            params: _,
            allow_failed,
            extensions,
        } = options;
        Self {
            url,
            method: method.unwrap_or_else(|| "GET".to_owned()),
            headers,
            body,
            query,
            allow_failed,
            extensions,
        }
    }
}
