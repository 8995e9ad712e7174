//! # fetchkit
//!
//! A typed HTTP client layer with a middleware pipeline.
//!
//! `fetchkit` runs every request through an ordered chain of middleware,
//! ends it in a pluggable transport call and hands back a response whose
//! body is decoded lazily, once, through content-type driven transformers.
//!
//! ## Features
//!
//! - **Middleware**: onion-ordered links with a single-use `next`
//! - **Status errors**: non-2xx responses rejected unless explicitly allowed
//! - **Lazy bodies**: memoized, chainable body transformers per content type
//! - **Suites**: path-bound endpoints with `:name` placeholders and any verb
//! - **Pluggable transport**: hyper by default, any async function in tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fetchkit::{Client, FetchOptions, Query};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fetchkit::FetchError> {
//!     let client = Client::builder()
//!         .default_origin("http://localhost:8080")
//!         .build();
//!     let response = client
//!         .fetch("/items", FetchOptions::new().query(Query::new().append("page", 2)))
//!         .await?;
//!     println!("{}: {:?}", response.status(), response.body_data());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types
//! - [`client`] - Client, builder and configuration
//! - [`http`] - Request and response bodies, body codecs
//! - [`middleware`] - Pipeline links, status and timeout middleware
//! - [`request`] - Fetch options, request context and query parameters
//! - [`suite`] - Endpoint suites and typed routes
//! - [`transport`] - Transport trait and the hyper transport

pub mod base;
pub mod client;
pub mod http;
pub mod middleware;
pub mod request;
pub mod suite;
pub mod transport;

// Re-exports for convenience
pub use crate::base::{BoxError, ErrorKind, FetchError, StatusError};
pub use crate::client::{Client, ClientBuilder, ClientConfig, RequestBuilder};
pub use crate::http::{Body, BodyCodecs, BodyData, BodyTransformer, FetchResponse, ResponseBody};
pub use crate::middleware::{from_fn, Middleware, Next, Reply};
pub use crate::request::{AllowFailed, FetchOptions, Query, RequestContext, Target};
pub use crate::suite::{create_suite, Endpoint, Route, Suite, SuiteOptions};
pub use crate::transport::{transport_fn, Transport};
