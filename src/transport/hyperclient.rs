//! Default transport over hyper's pooled client.
//!
//! Speaks plain HTTP/1.1 through [`HttpConnector`]. TLS is out of scope for
//! this crate; plug a TLS-capable [`Transport`] into the client builder for
//! `https` targets.

use super::{Sending, Transport, TransportRequest};
use crate::http::{RequestBody, ResponseBody};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::fmt;

/// Transport backed by `hyper_util`'s legacy client.
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, RequestBody>,
}

impl HyperTransport {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self { client }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    fn send(&self, request: TransportRequest) -> Sending {
        let client = self.client.clone();
        Box::pin(async move {
            tracing::debug!(method = %request.method(), uri = %request.uri(), "sending via hyper");
            let response: http::Response<Incoming> = client.request(request).await?;
            Ok(response.map(ResponseBody::new))
        })
    }
}

impl fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport").finish_non_exhaustive()
    }
}
