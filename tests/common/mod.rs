//! Shared fixtures: an in-process transport that records every request.

#![allow(dead_code)]

use bytes::Bytes;
use fetchkit::transport::{transport_fn, Transport, TransportRequest, TransportResponse};
use fetchkit::{Client, ClientBuilder, ClientConfig, ResponseBody};
use http::{Extensions, HeaderMap, Method, StatusCode};
use std::sync::{Arc, Mutex};

pub const ORIGIN: &str = "http://localhost";

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: http::Uri,
    pub headers: HeaderMap,
    pub extensions: Extensions,
    pub body: Bytes,
}

impl Recorded {
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }
}

pub type Log = Arc<Mutex<Vec<Recorded>>>;

/// A transport answering with `respond` and recording each request into the
/// returned log.
pub fn mock<F>(respond: F) -> (impl Transport + 'static, Log)
where
    F: Fn(&Recorded) -> TransportResponse + Send + Sync + 'static,
{
    let log: Log = Arc::default();
    let respond = Arc::new(respond);
    let seen = Arc::clone(&log);
    let transport = transport_fn(move |request: TransportRequest| {
        let respond = Arc::clone(&respond);
        let seen = Arc::clone(&seen);
        async move {
            let (parts, body) = request.into_parts();
            let recorded = Recorded {
                method: parts.method,
                uri: parts.uri,
                headers: parts.headers,
                extensions: parts.extensions,
                body: body.bytes().await.unwrap(),
            };
            let response = respond(&recorded);
            seen.lock().unwrap().push(recorded);
            Ok(response)
        }
    });
    (transport, log)
}

/// Answers with `{"path", "method", "query", "body"}` as JSON.
pub fn echo(request: &Recorded) -> TransportResponse {
    json_response(
        StatusCode::OK,
        serde_json::json!({
            "path": request.path(),
            "method": request.method.as_str(),
            "query": request.query(),
            "body": request.body_text(),
        }),
    )
}

pub fn json_response(status: StatusCode, value: serde_json::Value) -> TransportResponse {
    http::Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(ResponseBody::from(value.to_string()))
        .unwrap()
}

pub fn response(status: StatusCode, content_type: &str, body: &'static str) -> TransportResponse {
    http::Response::builder()
        .status(status)
        .header("content-type", content_type)
        .body(ResponseBody::from(body))
        .unwrap()
}

/// A builder pinned to [`ORIGIN`], independent of the environment.
pub fn builder<T: Transport + 'static>(transport: T) -> ClientBuilder {
    Client::builder()
        .config(ClientConfig {
            default_origin: Some(ORIGIN.to_owned()),
        })
        .transport(transport)
}

/// An echoing client plus its request log.
pub fn echo_client() -> (Client, Log) {
    let (transport, log) = mock(echo);
    (builder(transport).build(), log)
}

pub fn requests(log: &Log) -> Vec<Recorded> {
    log.lock().unwrap().clone()
}
