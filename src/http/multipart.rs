//! Multipart form bodies.
//!
//! A [`Form`] put on a request context is encoded as `multipart/form-data`
//! when the request is sent. Its content type, including the boundary, is
//! applied unless the context already carries one.
//!
//! # Example
//! ```ignore
//! use fetchkit::http::multipart::{Form, Part};
//!
//! let form = Form::new()
//!     .text("username", "user123")
//!     .part("file", Part::bytes(b"file content".as_slice()).file_name("doc.txt"));
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering};

static BOUNDARY_SEQ: AtomicU64 = AtomicU64::new(0);

/// A multipart form.
#[derive(Debug, Clone)]
pub struct Form {
    boundary: String,
    fields: Vec<(Cow<'static, str>, Part)>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    pub fn new() -> Self {
        Self {
            boundary: generate_boundary(),
            fields: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Add a text field.
    pub fn text<N, V>(self, name: N, value: V) -> Self
    where
        N: Into<Cow<'static, str>>,
        V: Into<Cow<'static, str>>,
    {
        self.part(name, Part::text(value))
    }

    pub fn part<N>(mut self, name: N, part: Part) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        self.fields.push((name.into(), part));
        self
    }

    /// The `Content-Type` header value for this form.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Encode the form.
    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::new();
        for (name, part) in &self.fields {
            out.put_slice(b"--");
            out.put_slice(self.boundary.as_bytes());
            out.put_slice(b"\r\n");
            out.put_slice(part.headers(name).as_bytes());
            out.put_slice(b"\r\n\r\n");
            out.put_slice(&part.data);
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"--");
        out.put_slice(self.boundary.as_bytes());
        out.put_slice(b"--\r\n");
        out.freeze()
    }
}

/// A single field of a [`Form`].
#[derive(Debug, Clone)]
pub struct Part {
    data: Bytes,
    content_type: Option<String>,
    file_name: Option<Cow<'static, str>>,
}

impl Part {
    pub fn text<V>(value: V) -> Self
    where
        V: Into<Cow<'static, str>>,
    {
        Self {
            data: Bytes::from(value.into().into_owned()),
            content_type: None,
            file_name: None,
        }
    }

    pub fn bytes<B: Into<Bytes>>(data: B) -> Self {
        Self {
            data: data.into(),
            content_type: Some("application/octet-stream".to_owned()),
            file_name: None,
        }
    }

    pub fn content_type<S: Into<String>>(mut self, mime: S) -> Self {
        self.content_type = Some(mime.into());
        self
    }

    pub fn file_name<S>(mut self, name: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.file_name = Some(name.into());
        self
    }

    fn headers(&self, name: &str) -> String {
        let mut header = format!("Content-Disposition: form-data; name=\"{}\"", escape(name));
        if let Some(file_name) = &self.file_name {
            header.push_str(&format!("; filename=\"{}\"", escape(file_name)));
        }
        if let Some(mime) = &self.content_type {
            header.push_str("\r\nContent-Type: ");
            header.push_str(mime);
        }
        header
    }
}

fn escape(s: &str) -> Cow<'_, str> {
    if s.contains(['"', '\\', '\r', '\n']) {
        Cow::Owned(
            s.replace('\\', "\\\\")
                .replace('"', "%22")
                .replace('\r', "%0D")
                .replace('\n', "%0A"),
        )
    } else {
        Cow::Borrowed(s)
    }
}

fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;
    let seq = BOUNDARY_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("----fetchkit-{nanos:016x}{seq:08x}")
}
