//! Request bodies.
//!
//! [`Body`] is what callers and middleware put on a request context;
//! [`RequestBody`] is the coerced form the transport receives.

use crate::base::context::TransportResultExt;
use crate::base::error::{BoxError, FetchError};
use crate::http::multipart::Form;
use bytes::Bytes;
use http_body::{Body as _, Frame, SizeHint};
use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Empty, Full};
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Body carried by a request context, coerced at transport time.
#[derive(Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// Raw text, sent as-is.
    Text(String),
    /// Raw bytes, sent as-is.
    Bytes(Bytes),
    /// Multipart form data.
    Form(Form),
    /// Streaming body, moved out of the context when sent.
    Stream(RequestBody),
    /// Structured value, JSON-encoded when sent.
    Json(serde_json::Value),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// Wrap a streaming body.
    pub fn stream<B>(body: B) -> Self
    where
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Body::Stream(RequestBody::stream(body))
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Body::Bytes(bytes) => f.debug_tuple("Bytes").field(bytes).finish(),
            Body::Form(form) => f.debug_tuple("Form").field(form).finish(),
            Body::Stream(_) => f.write_str("Stream(..)"),
            Body::Json(value) => f.debug_tuple("Json").field(value).finish(),
        }
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_owned())
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::Bytes(b)
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(v))
    }
}

impl From<Form> for Body {
    fn from(form: Form) -> Self {
        Body::Form(form)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

impl From<RequestBody> for Body {
    fn from(body: RequestBody) -> Self {
        Body::Stream(body)
    }
}

/// Transport-level request body.
pub struct RequestBody {
    inner: UnsyncBoxBody<Bytes, BoxError>,
}

impl RequestBody {
    /// A body with no data.
    pub fn empty() -> Self {
        Self::stream(Empty::<Bytes>::new())
    }

    /// Wrap any body whose data frames are [`Bytes`].
    pub fn stream<B>(body: B) -> Self
    where
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self {
            inner: body.map_err(Into::<BoxError>::into).boxed_unsync(),
        }
    }

    /// Read the whole body.
    pub async fn bytes(self) -> Result<Bytes, FetchError> {
        let collected = self.inner.collect().await.body_context()?;
        Ok(collected.to_bytes())
    }

    /// Read the whole body as UTF-8.
    pub async fn text(self) -> Result<String, FetchError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::InvalidUtf8)
    }
}

impl Default for RequestBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBody")
            .field("size_hint", &self.inner.size_hint())
            .finish()
    }
}

impl From<Bytes> for RequestBody {
    fn from(b: Bytes) -> Self {
        Self::stream(Full::new(b))
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        Bytes::from(s).into()
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(v: Vec<u8>) -> Self {
        Bytes::from(v).into()
    }
}

impl From<&'static str> for RequestBody {
    fn from(s: &'static str) -> Self {
        Bytes::from_static(s.as_bytes()).into()
    }
}

impl http_body::Body for RequestBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.inner).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}
