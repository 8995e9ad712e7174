//! Middleware pipeline.
//!
//! Every fetch runs through an ordered chain of [`Middleware`] links. Each
//! link receives the mutable [`RequestContext`] and a [`Next`] handle that
//! continues the chain; the link after the last one is the transport call.
//!
//! Links wrap each other in registration order: the first link registered
//! runs its pre-`next` step first and its post-`next` step last. The client
//! always installs [`StatusGuard`] as the outermost link.
//!
//! # Example
//!
//! ```rust,ignore
//! use fetchkit::middleware::{from_fn, Reply};
//!
//! client.use_middleware(from_fn(|ctx, next| {
//!     Box::pin(async move {
//!         ctx.headers.insert("x-trace", "1".parse().unwrap());
//!         let response = next.run(ctx).await?;
//!         Ok(Reply::from(response))
//!     })
//! }));
//! ```

mod status;
mod timeout;

pub use status::{StatusErrorFactory, StatusGuard};
pub use timeout::{RequestTimeout, Timeout};

use crate::base::context::TransportResultExt;
use crate::base::error::FetchError;
use crate::http::codec::BodyCodecs;
use crate::http::response::FetchResponse;
use crate::request::build::to_transport_request;
use crate::request::context::RequestContext;
use crate::transport::{Transport, TransportResponse};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace, warn};

/// Alias for the `Future` type returned by a middleware link.
pub type Handling<'a> = BoxFuture<'a, Result<Reply, FetchError>>;

/// A link in the fetch pipeline.
///
/// Implementations may mutate the context, call `next` at most once, and
/// inspect or replace the response on the way out. Returning without calling
/// `next` short-circuits the chain; the transport is then never reached.
pub trait Middleware: Send + Sync {
    fn handle<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> Handling<'a>;
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn handle<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> Handling<'a> {
        (**self).handle(ctx, next)
    }
}

/// What a link hands back to the link before it.
#[derive(Debug)]
pub enum Reply {
    /// An already wrapped response.
    Response(FetchResponse),
    /// A raw transport response, wrapped on the way out.
    Raw(TransportResponse),
    /// No response at all. Always rejected as a contract violation.
    Empty,
}

impl From<FetchResponse> for Reply {
    fn from(response: FetchResponse) -> Self {
        Reply::Response(response)
    }
}

impl From<TransportResponse> for Reply {
    fn from(response: TransportResponse) -> Self {
        Reply::Raw(response)
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Empty
    }
}

/// A middleware backed by a closure.
#[derive(Clone)]
pub struct FnMiddleware<F> {
    f: F,
}

/// Adapt a closure into a [`Middleware`].
///
/// The closure must return a boxed future borrowing the context, which in
/// practice means wrapping an `async move` block in `Box::pin`.
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Next) -> Handling<'a> + Send + Sync,
{
    FnMiddleware { f }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Next) -> Handling<'a> + Send + Sync,
{
    fn handle<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> Handling<'a> {
        (self.f)(ctx, next)
    }
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NextState {
    Ready,
    Consumed,
}

/// Continuation handed to a link.
///
/// Runs the rest of the chain once. Clones share the same state, so a second
/// `run` through any clone fails with [`FetchError::MiddlewareReentry`]
/// without reaching downstream links.
#[derive(Clone)]
pub struct Next {
    chain: Arc<Chain>,
    index: usize,
    state: Arc<Mutex<NextState>>,
}

impl Next {
    fn new(chain: Arc<Chain>, index: usize) -> Self {
        Self {
            chain,
            index,
            state: Arc::new(Mutex::new(NextState::Ready)),
        }
    }

    /// Continue with the following link, or the transport call after the
    /// last one.
    pub fn run(self, ctx: &mut RequestContext) -> BoxFuture<'_, Result<FetchResponse, FetchError>> {
        Box::pin(async move {
            let previous = {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::replace(&mut *state, NextState::Consumed)
            };
            if previous == NextState::Consumed {
                warn!(index = self.index, "next called more than once");
                return Err(FetchError::MiddlewareReentry);
            }
            dispatch(self.chain, self.index, ctx).await
        })
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// The links of a client plus the terminal transport call.
#[derive(Clone)]
pub(crate) struct Chain {
    links: Vec<Arc<dyn Middleware>>,
    core: Core,
}

impl Chain {
    pub(crate) fn new(core: Core) -> Self {
        Self {
            links: Vec::new(),
            core,
        }
    }

    pub(crate) fn push(&mut self, link: Arc<dyn Middleware>) {
        self.links.push(link);
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }

    /// Run the whole chain for one fetch.
    pub(crate) async fn execute(
        self: Arc<Self>,
        ctx: &mut RequestContext,
    ) -> Result<FetchResponse, FetchError> {
        dispatch(self, 0, ctx).await
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("links", &self.links.len())
            .field("codecs", &self.core.codecs)
            .finish_non_exhaustive()
    }
}

fn dispatch(
    chain: Arc<Chain>,
    index: usize,
    ctx: &mut RequestContext,
) -> BoxFuture<'_, Result<FetchResponse, FetchError>> {
    Box::pin(async move {
        let Some(link) = chain.links.get(index).cloned() else {
            return chain.core.send(ctx).await;
        };
        trace!(index, "entering middleware");
        let next = Next::new(Arc::clone(&chain), index + 1);
        match link.handle(ctx, next).await? {
            Reply::Response(response) => Ok(response),
            Reply::Raw(raw) => Ok(chain.core.wrap(raw)),
            Reply::Empty => {
                warn!(index, "middleware returned no response");
                Err(FetchError::ContractViolation)
            }
        }
    })
}

/// The terminal transport call.
#[derive(Clone)]
pub(crate) struct Core {
    transport: Arc<dyn Transport>,
    codecs: BodyCodecs,
}

impl Core {
    pub(crate) fn new(transport: Arc<dyn Transport>, codecs: BodyCodecs) -> Self {
        Self { transport, codecs }
    }

    async fn send(&self, ctx: &mut RequestContext) -> Result<FetchResponse, FetchError> {
        let request = to_transport_request(ctx)?;
        debug!(method = %request.method(), uri = %request.uri(), "sending request");
        let raw = self.transport.send(request).await.transport_context()?;
        debug!(status = raw.status().as_u16(), "received response");
        Ok(self.wrap(raw))
    }

    /// Wrap a raw response, attaching the codec for its content type.
    fn wrap(&self, raw: TransportResponse) -> FetchResponse {
        let mut response = FetchResponse::new(raw);
        if let Some(codec) = self.codecs.for_headers(response.headers()).cloned() {
            response.use_body_transform(codec);
        }
        response
    }
}
