//! Request and response bodies, and content-type driven body codecs.

pub mod codec;
pub mod multipart;
pub mod requestbody;
pub mod response;
pub mod responsebody;

// Re-exports for convenience
pub use codec::BodyCodecs;
pub use requestbody::{Body, RequestBody};
pub use response::{BodyData, BodyTransformer, FetchResponse, ResponseMeta};
pub use responsebody::ResponseBody;
