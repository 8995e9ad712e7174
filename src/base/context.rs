//! Ergonomic error context helpers.
//!
//! Extension traits that lift foreign errors into the matching
//! [`FetchError`] variant at the transport and body seams.

use crate::base::error::{BoxError, FetchError};

/// Extension trait for lifting errors raised below the pipeline.
pub trait TransportResultExt<T> {
    /// Wrap the error as a transport failure, keeping it intact as the source.
    ///
    /// # Example
    /// ```ignore
    /// use fetchkit::base::context::TransportResultExt;
    ///
    /// let response = transport.send(request).await.transport_context()?;
    /// ```
    fn transport_context(self) -> Result<T, FetchError>;

    /// Wrap the error as a body read failure.
    fn body_context(self) -> Result<T, FetchError>;
}

impl<T, E> TransportResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    fn transport_context(self) -> Result<T, FetchError> {
        self.map_err(|e| FetchError::Transport(e.into()))
    }

    fn body_context(self) -> Result<T, FetchError> {
        self.map_err(|e| FetchError::Body(e.into()))
    }
}
