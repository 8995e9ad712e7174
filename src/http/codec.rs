//! Content-type driven body codecs.
//!
//! Maps a MIME type to the [`BodyTransformer`] attached to every response
//! carrying it. Lookup is an exact, case-sensitive match on the part of the
//! `Content-Type` value before the first `;`.

use crate::http::response::{BodyData, BodyTransformer};
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use std::collections::HashMap;

pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain";

/// Registry of response body codecs.
#[derive(Debug, Clone)]
pub struct BodyCodecs {
    codecs: HashMap<String, BodyTransformer>,
}

impl Default for BodyCodecs {
    fn default() -> Self {
        let mut codecs = Self::empty();
        codecs.insert(APPLICATION_JSON, json_decoder());
        codecs.insert(TEXT_PLAIN, text_decoder());
        codecs
    }
}

impl BodyCodecs {
    /// A registry without the default JSON and text codecs.
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Register or replace the codec for `mime`.
    pub fn insert(&mut self, mime: impl Into<String>, transformer: BodyTransformer) {
        self.codecs.insert(mime.into(), transformer);
    }

    pub fn get(&self, mime: &str) -> Option<&BodyTransformer> {
        self.codecs.get(mime)
    }

    /// Find the codec for a response's `Content-Type` header.
    pub fn for_headers(&self, headers: &HeaderMap) -> Option<&BodyTransformer> {
        let content_type = headers.get(CONTENT_TYPE)?.to_str().ok()?;
        self.get(mime_essence(content_type))
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

/// The MIME portion of a `Content-Type` value.
///
/// Parameters after the first `;` are dropped unless the `;` leads the value.
pub fn mime_essence(content_type: &str) -> &str {
    match content_type.find(';') {
        Some(i) if i > 0 => &content_type[..i],
        _ => content_type,
    }
}

/// Decodes a raw body into [`BodyData::Json`].
pub fn json_decoder() -> BodyTransformer {
    BodyTransformer::new(|body, _| async move {
        match body {
            BodyData::Stream(stream) => Ok(BodyData::Json(stream.json().await?)),
            BodyData::Bytes(bytes) => Ok(BodyData::Json(serde_json::from_slice(&bytes)?)),
            BodyData::Text(text) => Ok(BodyData::Json(serde_json::from_str(&text)?)),
            other => Ok(other),
        }
    })
}

/// Decodes a raw body into [`BodyData::Text`].
pub fn text_decoder() -> BodyTransformer {
    BodyTransformer::new(|body, _| async move {
        match body {
            BodyData::Stream(stream) => Ok(BodyData::Text(stream.text().await?)),
            BodyData::Bytes(bytes) => String::from_utf8(bytes.to_vec())
                .map(BodyData::Text)
                .map_err(|_| crate::base::error::FetchError::InvalidUtf8),
            other => Ok(other),
        }
    })
}
