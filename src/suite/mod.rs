//! Endpoint suites.
//!
//! A [`Suite`] binds a [`Client`] to an optional base path and origin and
//! hands out [`Endpoint`]s for paths below it. Endpoints accept any verb by
//! name through [`Endpoint::call`] and substitute `:name` path placeholders
//! from [`FetchOptions::param`].
//!
//! # Example
//!
//! ```rust,ignore
//! use fetchkit::suite::{create_suite, SuiteOptions};
//!
//! let suite = create_suite(client, SuiteOptions::new().base_path("/api"));
//! let user = suite
//!     .resolve("/users/:id")
//!     .get(FetchOptions::new().param("id", 7))
//!     .await?;
//! let purged = suite.resolve("/cache").call("purge", FetchOptions::new()).await?;
//! ```

mod params;
mod route;

pub use params::substitute_path_params;
pub use route::Route;

use crate::base::error::FetchError;
use crate::client::Client;
use crate::http::response::{BodyData, FetchResponse};
use crate::request::options::FetchOptions;
use crate::request::target::Target;
use params::substitute_target;
use tracing::trace;
use url::Url;

/// Where a suite's endpoints live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteOptions {
    /// Prepended verbatim to every resolved path.
    pub base_path: Option<String>,
    /// When set, endpoints target this origin with the resolved path.
    pub origin: Option<Url>,
}

impl SuiteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn origin(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Create a suite over `client`.
pub fn create_suite(client: Client, options: SuiteOptions) -> Suite {
    Suite::new(client, options)
}

/// A family of endpoints sharing a client, base path and origin.
#[derive(Debug, Clone)]
pub struct Suite {
    client: Client,
    options: SuiteOptions,
}

impl Suite {
    pub fn new(client: Client, options: SuiteOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn options(&self) -> &SuiteOptions {
        &self.options
    }

    /// Bind an endpoint to `path`, joined to the base path by plain
    /// concatenation.
    pub fn resolve(&self, path: &str) -> Endpoint {
        let full = match &self.options.base_path {
            Some(base) => format!("{base}{path}"),
            None => path.to_owned(),
        };
        let target = match &self.options.origin {
            Some(origin) => {
                let mut url = origin.clone();
                url.set_path(&full);
                Target::Url(url)
            }
            None => Target::Path(full),
        };
        Endpoint {
            client: self.client.clone(),
            target,
        }
    }

    /// Call a declared [`Route`] and decode its response.
    pub async fn send<R: Route>(&self, options: FetchOptions) -> Result<R::Response, FetchError> {
        self.resolve(R::PATH)
            .fetch_result(options.method(R::METHOD))
            .await?
            .deserialize()
    }
}

/// Members an endpoint answers to before treating a name as a verb.
#[derive(Debug, PartialEq, Eq)]
enum Member<'a> {
    Fetch,
    FetchResult,
    Verb(&'a str),
}

impl<'a> Member<'a> {
    fn lookup(name: &'a str) -> Self {
        match name {
            "fetch" => Member::Fetch,
            "fetch_result" | "fetchResult" => Member::FetchResult,
            verb => Member::Verb(verb),
        }
    }
}

/// A client bound to one target.
#[derive(Debug, Clone)]
pub struct Endpoint {
    client: Client,
    target: Target,
}

impl Endpoint {
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Fetch the target after substituting path placeholders.
    pub async fn fetch(&self, options: FetchOptions) -> Result<FetchResponse, FetchError> {
        let target = substitute_target(&self.target, &options.params);
        self.client.fetch(target, options).await
    }

    /// Fetch and return only the decoded body.
    pub async fn fetch_result(&self, options: FetchOptions) -> Result<BodyData, FetchError> {
        Ok(self.fetch(options).await?.into_body())
    }

    /// Dispatch by name: `fetch` and `fetch_result` run those operations,
    /// any other name is sent as the uppercased method.
    pub async fn call(&self, name: &str, options: FetchOptions) -> Result<BodyData, FetchError> {
        match Member::lookup(name) {
            Member::Fetch => Ok(self.fetch(options).await?.into_body()),
            Member::FetchResult => self.fetch_result(options).await,
            Member::Verb(verb) => {
                let method = verb.to_uppercase();
                trace!(%method, target = %self.target, "endpoint call");
                self.fetch_result(options.method(method)).await
            }
        }
    }

    pub async fn get(&self, options: FetchOptions) -> Result<BodyData, FetchError> {
        self.call("get", options).await
    }

    pub async fn post(&self, options: FetchOptions) -> Result<BodyData, FetchError> {
        self.call("post", options).await
    }

    pub async fn put(&self, options: FetchOptions) -> Result<BodyData, FetchError> {
        self.call("put", options).await
    }

    pub async fn patch(&self, options: FetchOptions) -> Result<BodyData, FetchError> {
        self.call("patch", options).await
    }

    pub async fn delete(&self, options: FetchOptions) -> Result<BodyData, FetchError> {
        self.call("delete", options).await
    }

    pub async fn head(&self, options: FetchOptions) -> Result<BodyData, FetchError> {
        self.call("head", options).await
    }
}
