//! Fetch response with deferred body decoding.
//!
//! Metadata is available as soon as the response is wrapped. The body is
//! decoded on demand through an ordered chain of [`BodyTransformer`]s; the
//! result is memoized and the raw stream is consumed at most once.

use crate::base::error::FetchError;
use crate::http::responsebody::ResponseBody;
use crate::transport::{Redirected, TransportResponse};
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{HeaderMap, StatusCode, Version};
use hyper::ext::ReasonPhrase;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A response body at some stage of decoding.
#[derive(Debug, Default)]
pub enum BodyData {
    /// The response has no body.
    #[default]
    Empty,
    /// The raw, undecoded body.
    Stream(ResponseBody),
    Bytes(Bytes),
    Text(String),
    Json(serde_json::Value),
    /// Output of a caller-supplied transformer.
    Custom(Box<dyn Any + Send + Sync>),
}

impl BodyData {
    /// Wrap an arbitrary transformer output.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        BodyData::Custom(Box::new(value))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BodyData::Empty)
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, BodyData::Stream(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            BodyData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            BodyData::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            BodyData::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            BodyData::Custom(value) => value.downcast_ref(),
            _ => None,
        }
    }

    /// Deserialize a decoded body.
    ///
    /// JSON values deserialize directly, text as a JSON string and an empty
    /// body as `null`. Raw streams, bytes and custom values are rejected.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        let value = match self {
            BodyData::Empty => serde_json::Value::Null,
            BodyData::Json(value) => value,
            BodyData::Text(text) => serde_json::Value::String(text),
            BodyData::Stream(_) => return Err(FetchError::UnexpectedBody("raw stream")),
            BodyData::Bytes(_) => return Err(FetchError::UnexpectedBody("raw bytes")),
            BodyData::Custom(_) => return Err(FetchError::UnexpectedBody("custom value")),
        };
        Ok(serde_json::from_value(value)?)
    }
}

/// Response metadata handed to body transformers.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    status: StatusCode,
    status_text: String,
    version: Version,
    headers: HeaderMap,
    redirected: bool,
}

impl ResponseMeta {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Reason phrase as received, or the canonical one for the status.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn redirected(&self) -> bool {
        self.redirected
    }
}

/// Future returned by a body transformer.
pub type Transforming = BoxFuture<'static, Result<BodyData, FetchError>>;

/// One stage of body decoding.
///
/// Receives the value produced by the previous stage (initially the raw
/// [`BodyData::Stream`]) and the response metadata.
#[derive(Clone)]
pub struct BodyTransformer {
    inner: Arc<dyn Fn(BodyData, &ResponseMeta) -> Transforming + Send + Sync>,
}

impl BodyTransformer {
    /// Create an asynchronous transformer.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(BodyData, &ResponseMeta) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<BodyData, FetchError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |body, meta| Box::pin(f(body, meta))),
        }
    }

    /// Create a synchronous transformer.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(BodyData, &ResponseMeta) -> Result<BodyData, FetchError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move |body, meta| Box::pin(std::future::ready(f(body, meta)))),
        }
    }

    pub fn apply(&self, body: BodyData, meta: &ResponseMeta) -> Transforming {
        (self.inner)(body, meta)
    }
}

impl fmt::Debug for BodyTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodyTransformer(..)")
    }
}

/// A wrapped transport response.
#[derive(Debug)]
pub struct FetchResponse {
    meta: ResponseMeta,
    body: BodyData,
    consumed: bool,
    failed: bool,
    transformers: Vec<BodyTransformer>,
}

impl FetchResponse {
    /// Wrap a raw response without touching its body.
    pub fn new(raw: TransportResponse) -> Self {
        let (parts, body) = raw.into_parts();
        let redirected = parts.extensions.get::<Redirected>().is_some();
        let status_text = parts
            .extensions
            .get::<ReasonPhrase>()
            .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
            .or_else(|| parts.status.canonical_reason())
            .unwrap_or_default()
            .to_owned();
        let body = if body.is_empty() {
            BodyData::Empty
        } else {
            BodyData::Stream(body)
        };
        Self {
            meta: ResponseMeta {
                status: parts.status,
                status_text,
                version: parts.version,
                headers: parts.headers,
                redirected,
            },
            body,
            consumed: false,
            failed: false,
            transformers: Vec::new(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        self.meta.status.is_success()
    }

    pub fn status(&self) -> StatusCode {
        self.meta.status
    }

    /// Reason phrase sent by the server, falling back to the canonical
    /// phrase of the status, or an empty string.
    pub fn status_text(&self) -> &str {
        self.meta.status_text()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.meta.headers
    }

    pub fn redirected(&self) -> bool {
        self.meta.redirected
    }

    pub fn version(&self) -> Version {
        self.meta.version
    }

    pub fn meta(&self) -> &ResponseMeta {
        &self.meta
    }

    /// Current body value: the raw stream until [`parse_body`](Self::parse_body)
    /// has run, the memoized decoded value afterwards.
    pub fn body_data(&self) -> &BodyData {
        &self.body
    }

    /// Whether the raw body has been consumed by the transformer chain.
    pub fn body_used(&self) -> bool {
        self.consumed
    }

    /// Append a transformer to the pending chain.
    pub fn use_body_transform(&mut self, transformer: BodyTransformer) -> &mut Self {
        self.transformers.push(transformer);
        self
    }

    /// Resolve the body through every pending transformer, in order.
    ///
    /// Idempotent: once the raw body has been consumed, the memoized value is
    /// returned and no transformer runs again. A response without a body
    /// resolves to [`BodyData::Empty`] without running transformers.
    ///
    /// If a transformer fails, that error is returned and every later call
    /// fails with [`FetchError::UnexpectedBody`]; the body is gone.
    pub async fn parse_body(&mut self) -> Result<&BodyData, FetchError> {
        if self.failed {
            return Err(FetchError::UnexpectedBody("body decode failed"));
        }
        if self.consumed || self.transformers.is_empty() || self.body.is_empty() {
            return Ok(&self.body);
        }

        self.consumed = true;
        let mut data = std::mem::take(&mut self.body);
        for transformer in std::mem::take(&mut self.transformers) {
            data = match transformer.apply(data, &self.meta).await {
                Ok(data) => data,
                Err(err) => {
                    self.failed = true;
                    return Err(err);
                }
            };
        }
        self.body = data;
        Ok(&self.body)
    }

    /// Duplicate the response before its body is decoded.
    ///
    /// The raw stream is buffered so that both copies can read it, and the
    /// copy gets the same pending transformers. Fails once the body has been
    /// consumed.
    pub async fn try_clone(&mut self) -> Result<FetchResponse, FetchError> {
        if self.consumed || self.failed {
            return Err(FetchError::UnexpectedBody("body already used"));
        }
        let body = match std::mem::take(&mut self.body) {
            BodyData::Stream(stream) => match stream.bytes().await {
                Ok(bytes) => {
                    self.body = BodyData::Stream(ResponseBody::from(bytes.clone()));
                    BodyData::Stream(ResponseBody::from(bytes))
                }
                Err(err) => {
                    self.failed = true;
                    return Err(err);
                }
            },
            BodyData::Empty => BodyData::Empty,
            other => {
                self.body = other;
                return Err(FetchError::UnexpectedBody("body already taken"));
            }
        };
        Ok(FetchResponse {
            meta: self.meta.clone(),
            body,
            consumed: false,
            failed: false,
            transformers: self.transformers.clone(),
        })
    }

    /// Take the body value, leaving [`BodyData::Empty`] behind.
    pub fn take_body(&mut self) -> BodyData {
        std::mem::take(&mut self.body)
    }

    pub fn into_body(self) -> BodyData {
        self.body
    }

    pub fn into_parts(self) -> (ResponseMeta, BodyData) {
        (self.meta, self.body)
    }

    /// Deserialize the current body value. See [`BodyData::deserialize`].
    pub fn json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.body.deserialize()
    }
}
