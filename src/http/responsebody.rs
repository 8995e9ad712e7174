//! Response body stream.
//!
//! The raw body handed over by the transport. It is read at most once:
//! every reader takes `self` by value.

use crate::base::context::TransportResultExt;
use crate::base::error::{BoxError, FetchError};
use bytes::Bytes;
use http_body::Body;
use http_body_util::{combinators::BoxBody, BodyExt, Empty, Full};
use std::fmt;

/// Response body wrapper for streaming.
pub struct ResponseBody {
    inner: BoxBody<Bytes, BoxError>,
    empty: bool,
}

impl ResponseBody {
    /// Wrap any body whose data frames are [`Bytes`].
    pub fn new<B>(body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + Sync + 'static,
        B::Error: Into<BoxError>,
    {
        let empty = body.is_end_stream();
        Self {
            inner: body.map_err(Into::<BoxError>::into).boxed(),
            empty,
        }
    }

    /// A body that carries no data.
    pub fn empty() -> Self {
        Self::new(Empty::<Bytes>::new())
    }

    /// Whether the body is known to carry no data.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Read entire body as bytes.
    pub async fn bytes(self) -> Result<Bytes, FetchError> {
        let collected = self.into_inner().collect().await.body_context()?;
        Ok(collected.to_bytes())
    }

    /// Read body as UTF-8 string.
    pub async fn text(self) -> Result<String, FetchError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::InvalidUtf8)
    }

    /// Read body as JSON, deserializing to type T.
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> Result<T, FetchError> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Get the inner body for low-level access.
    pub fn into_inner(self) -> BoxBody<Bytes, BoxError> {
        self.inner
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody")
            .field("empty", &self.empty)
            .finish_non_exhaustive()
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        Self::new(Full::new(bytes))
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(v: Vec<u8>) -> Self {
        Bytes::from(v).into()
    }
}

impl From<String> for ResponseBody {
    fn from(s: String) -> Self {
        Bytes::from(s).into()
    }
}

impl From<&'static str> for ResponseBody {
    fn from(s: &'static str) -> Self {
        Bytes::from_static(s.as_bytes()).into()
    }
}
