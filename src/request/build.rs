//! Conversion of a request context into the transport request.

use crate::base::error::FetchError;
use crate::http::codec::APPLICATION_JSON;
use crate::http::{Body, RequestBody};
use crate::request::context::RequestContext;
use crate::transport::TransportRequest;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method, Uri};

const TEXT_PLAIN_UTF8: &str = "text/plain;charset=UTF-8";

/// Build the transport request for the current state of `ctx`.
///
/// The query is merged into a copy of the URL, the body is coerced and
/// content-type defaults are written back to `ctx.headers`. Stream bodies
/// are moved out of the context; every other body kind stays in place.
pub(crate) fn to_transport_request(
    ctx: &mut RequestContext,
) -> Result<TransportRequest, FetchError> {
    let mut url = ctx.url.clone();
    if let Some(query) = &ctx.query {
        query.merge_into(&mut url);
    }
    let uri: Uri = url
        .as_str()
        .parse()
        .map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

    let upper = ctx.method.to_uppercase();
    let method = Method::from_bytes(upper.as_bytes())
        .map_err(|_| FetchError::InvalidMethod(ctx.method.clone()))?;

    let body = coerce_body(&mut ctx.body, &mut ctx.headers);

    let mut request = http::Request::new(body);
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    *request.headers_mut() = ctx.headers.clone();
    *request.extensions_mut() = ctx.extensions.clone();
    Ok(request)
}

fn coerce_body(body: &mut Body, headers: &mut HeaderMap) -> RequestBody {
    match body {
        Body::Empty => RequestBody::empty(),
        Body::Text(text) => {
            default_content_type(headers, HeaderValue::from_static(TEXT_PLAIN_UTF8));
            RequestBody::from(text.clone())
        }
        Body::Bytes(bytes) => RequestBody::from(bytes.clone()),
        Body::Form(form) => {
            if let Ok(value) = HeaderValue::from_str(&form.content_type()) {
                default_content_type(headers, value);
            }
            RequestBody::from(form.encode())
        }
        Body::Stream(_) => match std::mem::take(body) {
            Body::Stream(stream) => stream,
            _ => RequestBody::empty(),
        },
        Body::Json(value) => {
            default_content_type(headers, HeaderValue::from_static(APPLICATION_JSON));
            // Serializing a `Value` cannot fail.
            let encoded = serde_json::to_vec(value).unwrap_or_default();
            RequestBody::from(Bytes::from(encoded))
        }
    }
}

fn default_content_type(headers: &mut HeaderMap, value: HeaderValue) {
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, value);
    }
}
