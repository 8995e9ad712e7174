use crate::http::response::BodyData;
use http::{HeaderMap, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Boxed error used at the transport and codec seams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum FetchError {
    // Request construction
    #[error("URL missing origin")]
    MissingOrigin,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    // Pipeline
    #[error(transparent)]
    Status(Box<StatusError>),
    #[error("next hook already called")]
    MiddlewareReentry,
    #[error("The result must be a transport response or a fetch response")]
    ContractViolation,
    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),

    // Transport, passed through as raised
    #[error(transparent)]
    Transport(BoxError),

    // Body decoding
    #[error("Failed to read body: {0}")]
    Body(#[source] BoxError),
    #[error("Invalid UTF-8 in body")]
    InvalidUtf8,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Body is not decodable: {0}")]
    UnexpectedBody(&'static str),

    // Produced by a caller-supplied status error factory
    #[error(transparent)]
    Custom(BoxError),
}

/// Flat classification of [`FetchError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingOrigin,
    Request,
    Status,
    MiddlewareReentry,
    ContractViolation,
    TimedOut,
    Transport,
    Body,
    Custom,
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::MissingOrigin => ErrorKind::MissingOrigin,
            FetchError::InvalidUrl(_) | FetchError::InvalidMethod(_) => ErrorKind::Request,
            FetchError::Status(_) => ErrorKind::Status,
            FetchError::MiddlewareReentry => ErrorKind::MiddlewareReentry,
            FetchError::ContractViolation => ErrorKind::ContractViolation,
            FetchError::TimedOut(_) => ErrorKind::TimedOut,
            FetchError::Transport(_) => ErrorKind::Transport,
            FetchError::Body(_)
            | FetchError::InvalidUtf8
            | FetchError::Json(_)
            | FetchError::UnexpectedBody(_) => ErrorKind::Body,
            FetchError::Custom(_) => ErrorKind::Custom,
        }
    }

    /// The status error, if this is one.
    pub fn as_status(&self) -> Option<&StatusError> {
        match self {
            FetchError::Status(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_status(&self) -> bool {
        matches!(self, FetchError::Status(_))
    }
}

impl From<StatusError> for FetchError {
    fn from(err: StatusError) -> Self {
        FetchError::Status(Box::new(err))
    }
}

/// A response arrived with a status outside the ok/allowed set.
///
/// Carries the response headers, status and the body as decoded by the
/// response's codec chain.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StatusError {
    status: StatusCode,
    headers: HeaderMap,
    body: BodyData,
    message: String,
}

impl StatusError {
    pub fn new(status: StatusCode, headers: HeaderMap, body: BodyData) -> Self {
        let message = status_message(status, &body);
        Self {
            status,
            headers,
            body,
            message,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &BodyData {
        &self.body
    }

    pub fn into_body(self) -> BodyData {
        self.body
    }
}

fn status_message(status: StatusCode, body: &BodyData) -> String {
    let code = status.as_u16();
    // Structured bodies are named by their shape only.
    match body {
        BodyData::Json(serde_json::Value::Object(_)) | BodyData::Custom(_) => "Object".into(),
        BodyData::Json(serde_json::Value::Array(_)) => "Array".into(),
        BodyData::Bytes(_) => "Bytes".into(),
        BodyData::Stream(_) => "ReadableStream".into(),
        BodyData::Empty => format!("{code}: null"),
        BodyData::Text(text) => format!("{code}: {text}"),
        BodyData::Json(serde_json::Value::String(text)) => format!("{code}: {text}"),
        BodyData::Json(value) => format!("{code}: {value}"),
    }
}
