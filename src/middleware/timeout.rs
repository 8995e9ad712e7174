use super::{Handling, Middleware, Next, Reply};
use crate::base::error::FetchError;
use crate::request::context::RequestContext;
use std::time::Duration;
use tracing::debug;

/// Per-request override for [`Timeout`], set through
/// [`FetchOptions::extension`](crate::request::FetchOptions::extension).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeout(pub Duration);

/// Fails the rest of the chain with [`FetchError::TimedOut`] when it takes
/// longer than the configured duration.
///
/// Dropping the downstream future is the only cancellation; a transport that
/// spawned its own work may keep running.
#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    duration: Duration,
}

impl Timeout {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Middleware for Timeout {
    fn handle<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> Handling<'a> {
        Box::pin(async move {
            let duration = ctx
                .extensions
                .get::<RequestTimeout>()
                .map_or(self.duration, |t| t.0);
            match tokio::time::timeout(duration, next.run(ctx)).await {
                Ok(response) => Ok(Reply::Response(response?)),
                Err(_) => {
                    debug!(?duration, "request timed out");
                    Err(FetchError::TimedOut(duration))
                }
            }
        })
    }
}
