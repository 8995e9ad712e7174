//! Transport seam.
//!
//! The pipeline ends in exactly one call to a [`Transport`]: an opaque async
//! function from a [`TransportRequest`] to a [`TransportResponse`]. Errors it
//! raises reach the caller of `fetch` untouched, wrapped only in
//! [`FetchError::Transport`](crate::base::FetchError::Transport).
//!
//! # Example
//!
//! ```rust,ignore
//! use fetchkit::transport::{transport_fn, TransportRequest};
//! use fetchkit::http::ResponseBody;
//!
//! let transport = transport_fn(|request: TransportRequest| async move {
//!     Ok(http::Response::new(ResponseBody::from("pong")))
//! });
//! ```

mod hyperclient;

pub use hyperclient::HyperTransport;

use crate::base::error::BoxError;
use crate::http::{RequestBody, ResponseBody};
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Request handed to the transport.
pub type TransportRequest = http::Request<RequestBody>;

/// Response produced by the transport.
pub type TransportResponse = http::Response<ResponseBody>;

/// Alias for the `Future` type returned by a transport.
pub type Sending = BoxFuture<'static, Result<TransportResponse, BoxError>>;

/// Response extension marking a response reached through a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirected;

/// Performs the network exchange at the end of the middleware chain.
///
/// Implementations must be thread-safe; a single transport is shared by every
/// concurrent fetch of a client.
pub trait Transport: Send + Sync {
    fn send(&self, request: TransportRequest) -> Sending;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: TransportRequest) -> Sending {
        (**self).send(request)
    }
}

/// A transport backed by an async closure.
#[derive(Clone)]
pub struct FnTransport<F> {
    f: F,
}

/// Adapt an async closure into a [`Transport`].
pub fn transport_fn<F, Fut>(f: F) -> FnTransport<F>
where
    F: Fn(TransportRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TransportResponse, BoxError>> + Send + 'static,
{
    FnTransport { f }
}

impl<F, Fut> Transport for FnTransport<F>
where
    F: Fn(TransportRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<TransportResponse, BoxError>> + Send + 'static,
{
    fn send(&self, request: TransportRequest) -> Sending {
        Box::pin((self.f)(request))
    }
}

impl<F> fmt::Debug for FnTransport<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTransport").finish_non_exhaustive()
    }
}
