//! Base types and error handling.
//!
//! - [`FetchError`]: every failure a fetch can surface
//! - [`StatusError`]: non-ok response translated by the root middleware link

pub mod context;
pub mod error;

pub use error::{BoxError, ErrorKind, FetchError, StatusError};
