//! HTTP client with a middleware pipeline.
//!
//! Every fetch resolves its target against the default origin, runs through
//! the client's middleware chain and ends in one transport call.
//!
//! # Example
//!
//! ```rust,ignore
//! use fetchkit::{Client, FetchOptions};
//!
//! let client = Client::builder()
//!     .default_origin("http://localhost:8080")
//!     .build();
//!
//! let resp = client.get("/users/1").send().await?;
//! println!("{:?}", resp.body_data());
//! ```

use crate::base::error::{BoxError, FetchError};
use crate::http::codec::BodyCodecs;
use crate::http::response::{BodyData, BodyTransformer, FetchResponse};
use crate::http::Body;
use crate::middleware::{Chain, Core, Middleware, StatusErrorFactory, StatusGuard};
use crate::request::context::RequestContext;
use crate::request::options::{AllowFailed, FetchOptions};
use crate::request::query::Query;
use crate::request::target::Target;
use crate::transport::{HyperTransport, Transport};
use http::header::IntoHeaderName;
use http::HeaderValue;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Environment variable read by [`ClientConfig::from_env`].
pub const DEFAULT_ORIGIN_ENV: &str = "FETCHKIT_DEFAULT_ORIGIN";

/// Client-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin that relative targets resolve against, e.g. `http://localhost:8080`.
    pub default_origin: Option<String>,
}

impl ClientConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        let default_origin = std::env::var(DEFAULT_ORIGIN_ENV)
            .ok()
            .filter(|origin| !origin.trim().is_empty());
        Self { default_origin }
    }
}

/// HTTP client.
///
/// Cheap to clone; clones share the transport and the middleware chain until
/// one of them registers more middleware.
#[derive(Clone)]
pub struct Client {
    chain: Arc<Chain>,
    default_origin: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client over [`HyperTransport`], configured from the environment.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn default_origin(&self) -> Option<&str> {
        self.default_origin.as_deref()
    }

    /// Append a middleware after every link registered so far.
    pub fn use_middleware<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        Arc::make_mut(&mut self.chain).push(Arc::new(middleware));
        self
    }

    /// Run one request through the middleware chain.
    pub async fn fetch(
        &self,
        target: impl Into<Target>,
        options: FetchOptions,
    ) -> Result<FetchResponse, FetchError> {
        let url = target.into().resolve(self.default_origin())?;
        let mut ctx = RequestContext::from_options(url, options);
        debug!(method = %ctx.method, url = %ctx.url, "fetch");
        Arc::clone(&self.chain).execute(&mut ctx).await
    }

    /// Like [`fetch`](Self::fetch), returning only the decoded body.
    pub async fn fetch_result(
        &self,
        target: impl Into<Target>,
        options: FetchOptions,
    ) -> Result<BodyData, FetchError> {
        Ok(self.fetch(target, options).await?.into_body())
    }

    /// Start building a GET request.
    pub fn get(&self, target: impl Into<Target>) -> RequestBuilder {
        self.request("GET", target)
    }

    /// Start building a POST request.
    pub fn post(&self, target: impl Into<Target>) -> RequestBuilder {
        self.request("POST", target)
    }

    /// Start building a PUT request.
    pub fn put(&self, target: impl Into<Target>) -> RequestBuilder {
        self.request("PUT", target)
    }

    /// Start building a DELETE request.
    pub fn delete(&self, target: impl Into<Target>) -> RequestBuilder {
        self.request("DELETE", target)
    }

    /// Start building a HEAD request.
    pub fn head(&self, target: impl Into<Target>) -> RequestBuilder {
        self.request("HEAD", target)
    }

    /// Start building a PATCH request.
    pub fn patch(&self, target: impl Into<Target>) -> RequestBuilder {
        self.request("PATCH", target)
    }

    /// Start building a request with any method.
    pub fn request(&self, method: impl Into<String>, target: impl Into<Target>) -> RequestBuilder {
        RequestBuilder {
            client: self.clone(),
            target: target.into(),
            options: FetchOptions::new().method(method),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("default_origin", &self.default_origin)
            .field("middleware", &self.chain.len())
            .finish()
    }
}

/// Builder for creating a [`Client`].
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    config: ClientConfig,
    codecs: BodyCodecs,
    status_error: Option<StatusErrorFactory>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            transport: None,
            config: ClientConfig::from_env(),
            codecs: BodyCodecs::default(),
            status_error: None,
            middleware: Vec::new(),
        }
    }
}

impl ClientBuilder {
    /// Set the transport. Defaults to [`HyperTransport`].
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the origin relative targets resolve against.
    pub fn default_origin(mut self, origin: impl Into<String>) -> Self {
        self.config.default_origin = Some(origin.into());
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Register or replace the body codec for a MIME type.
    pub fn body_codec(mut self, mime: impl Into<String>, transformer: BodyTransformer) -> Self {
        self.codecs.insert(mime, transformer);
        self
    }

    /// Replace the codec registry, dropping the JSON and text defaults.
    pub fn body_codecs(mut self, codecs: BodyCodecs) -> Self {
        self.codecs = codecs;
        self
    }

    /// Set the factory for errors raised on rejected statuses.
    pub fn status_error<F>(mut self, factory: F) -> Self
    where
        F: Fn(&FetchResponse) -> Option<BoxError> + Send + Sync + 'static,
    {
        self.status_error = Some(Arc::new(factory));
        self
    }

    /// Append a middleware.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HyperTransport::new()),
        };
        let guard = match self.status_error {
            Some(factory) => StatusGuard::with_factory(factory),
            None => StatusGuard::new(),
        };

        let mut chain = Chain::new(Core::new(transport, self.codecs));
        chain.push(Arc::new(guard));
        for link in self.middleware {
            chain.push(link);
        }

        let default_origin = self
            .config
            .default_origin
            .map(|origin| origin.trim_end_matches('/').to_owned());

        Client {
            chain: Arc::new(chain),
            default_origin,
        }
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("codecs", &self.codecs)
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}

/// Builder for a single request.
#[derive(Debug)]
pub struct RequestBuilder {
    client: Client,
    target: Target,
    options: FetchOptions,
}

impl RequestBuilder {
    /// Add a header.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: IntoHeaderName,
        V: TryInto<HeaderValue>,
    {
        self.options = self.options.header(key, value);
        self
    }

    /// Add a header value without replacing earlier ones.
    pub fn append_header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: IntoHeaderName,
        V: TryInto<HeaderValue>,
    {
        self.options = self.options.append_header(key, value);
        self
    }

    /// Set request body.
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.options = self.options.body(body);
        self
    }

    /// Set JSON body.
    #[cfg(feature = "json")]
    pub fn json<T: serde::Serialize>(mut self, json: &T) -> Self {
        self.options = self.options.json(json);
        self
    }

    /// Merge query parameters into the URL.
    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.options = self.options.query(query);
        self
    }

    /// Treat the given non-ok statuses as success.
    pub fn allow_failed(mut self, allow: impl Into<AllowFailed>) -> Self {
        self.options = self.options.allow_failed(allow);
        self
    }

    /// Attach an out-of-band value for middleware.
    pub fn extension<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.options = self.options.extension(value);
        self
    }

    /// Send the request.
    pub async fn send(self) -> Result<FetchResponse, FetchError> {
        self.client.fetch(self.target, self.options).await
    }
}
