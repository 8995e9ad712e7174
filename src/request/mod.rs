//! Request-side types: options, the per-call context, query parameters and
//! the conversion into a transport request.

pub(crate) mod build;
pub mod context;
pub mod options;
pub mod query;
pub mod target;

pub use context::RequestContext;
pub use options::{AllowFailed, FetchOptions, PathParams};
pub use query::{Query, QueryValue};
pub use target::Target;
