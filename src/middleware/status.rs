use super::{Handling, Middleware, Next, Reply};
use crate::base::error::{BoxError, FetchError, StatusError};
use crate::http::response::FetchResponse;
use crate::request::context::RequestContext;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Builds a custom error for a rejected response. Returning `None` falls
/// back to [`StatusError`].
pub type StatusErrorFactory = Arc<dyn Fn(&FetchResponse) -> Option<BoxError> + Send + Sync>;

/// Root link of every client chain.
///
/// Forces body resolution on the downstream response, then rejects non-2xx
/// statuses unless the request's [`AllowFailed`](crate::request::AllowFailed)
/// policy lets them through.
#[derive(Clone, Default)]
pub struct StatusGuard {
    factory: Option<StatusErrorFactory>,
}

impl StatusGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_factory(factory: StatusErrorFactory) -> Self {
        Self {
            factory: Some(factory),
        }
    }

    fn reject(&self, mut response: FetchResponse) -> FetchError {
        if let Some(err) = self.factory.as_ref().and_then(|factory| factory(&response)) {
            debug!(status = response.status().as_u16(), "status error from factory");
            return FetchError::Custom(err);
        }
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.take_body();
        let err = StatusError::new(status, headers, body);
        debug!(status = status.as_u16(), error = %err, "status error");
        err.into()
    }
}

impl Middleware for StatusGuard {
    fn handle<'a>(&'a self, ctx: &'a mut RequestContext, next: Next) -> Handling<'a> {
        Box::pin(async move {
            let mut response = next.run(ctx).await?;
            response.parse_body().await?;
            if response.ok() || ctx.allow_failed.allows(response.status()) {
                return Ok(Reply::Response(response));
            }
            Err(self.reject(response))
        })
    }
}

impl fmt::Debug for StatusGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusGuard")
            .field("factory", &self.factory.is_some())
            .finish()
    }
}
