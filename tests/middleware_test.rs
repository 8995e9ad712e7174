//! Tests for middleware ordering, single-use `next` and status handling.

mod common;

use common::{builder, echo, echo_client, json_response, mock, requests, response, ORIGIN};
use fetchkit::middleware::{from_fn, Middleware, Next, Reply, RequestTimeout, Timeout};
use fetchkit::transport::{transport_fn, TransportRequest};
use fetchkit::{
    AllowFailed, BodyData, ErrorKind, FetchError, FetchOptions, RequestContext, ResponseBody,
};
use http::StatusCode;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

type Trace = Arc<Mutex<Vec<String>>>;

fn tracer(name: &'static str, trace: Trace) -> impl Middleware {
    from_fn(move |ctx, next| {
        let trace = Arc::clone(&trace);
        Box::pin(async move {
            trace.lock().unwrap().push(format!("{name} pre"));
            let response = next.run(ctx).await?;
            trace.lock().unwrap().push(format!("{name} post"));
            Ok(Reply::from(response))
        })
    })
}

// === Ordering ===

#[tokio::test]
async fn test_onion_order_with_root_outermost() {
    let trace: Trace = Arc::default();
    let seen = Arc::clone(&trace);
    let (transport, _) = mock(move |_| {
        seen.lock().unwrap().push("transport".to_owned());
        response(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", "boom")
    });
    let root = Arc::clone(&trace);
    let mut client = builder(transport)
        .status_error(move |_| {
            root.lock().unwrap().push("root".to_owned());
            None
        })
        .build();
    client
        .use_middleware(tracer("h1", Arc::clone(&trace)))
        .use_middleware(tracer("h2", Arc::clone(&trace)));

    let err = client.fetch("/", FetchOptions::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(
        *trace.lock().unwrap(),
        vec!["h1 pre", "h2 pre", "transport", "h2 post", "h1 post", "root"]
    );
}

#[tokio::test]
async fn test_context_changes_flow_both_ways() {
    #[derive(Debug, Clone, PartialEq)]
    struct SeenBy(&'static str);

    let (mut client, log) = echo_client();
    client
        .use_middleware(from_fn(|ctx, next| {
            Box::pin(async move {
                ctx.method = "post".to_owned();
                ctx.headers.insert("x-outer", "1".parse().unwrap());
                let response = next.run(ctx).await?;
                assert_eq!(ctx.extensions.get::<SeenBy>(), Some(&SeenBy("inner")));
                Ok(Reply::from(response))
            })
        }))
        .use_middleware(from_fn(|ctx, next| {
            Box::pin(async move {
                assert_eq!(ctx.method, "post");
                ctx.extensions.insert(SeenBy("inner"));
                Ok(Reply::from(next.run(ctx).await?))
            })
        }));

    client.fetch("/", FetchOptions::new()).await.unwrap();

    let seen = &requests(&log)[0];
    assert_eq!(seen.method, http::Method::POST);
    assert_eq!(seen.headers["x-outer"], "1");
}

// === Single-use next ===

#[tokio::test]
async fn test_next_twice_is_rejected() {
    let (mut client, log) = echo_client();
    client.use_middleware(from_fn(|ctx, next| {
        Box::pin(async move {
            next.clone().run(ctx).await?;
            Ok(Reply::from(next.run(ctx).await?))
        })
    }));

    let err = client.fetch("/", FetchOptions::new()).await.unwrap_err();
    assert!(matches!(err, FetchError::MiddlewareReentry));
    assert_eq!(err.to_string(), "next hook already called");
    assert_eq!(requests(&log).len(), 1);
}

#[tokio::test]
async fn test_stored_next_cannot_be_rerun() {
    let slot: Arc<Mutex<Option<Next>>> = Arc::default();
    let stash = Arc::clone(&slot);
    let (mut client, log) = echo_client();
    client.use_middleware(from_fn(move |ctx, next| {
        *stash.lock().unwrap() = Some(next.clone());
        Box::pin(async move { Ok(Reply::from(next.run(ctx).await?)) })
    }));

    client.fetch("/", FetchOptions::new()).await.unwrap();
    let stored = slot.lock().unwrap().take().unwrap();
    let mut ctx = RequestContext::new(Url::parse(ORIGIN).unwrap());
    let err = stored.run(&mut ctx).await.unwrap_err();
    assert!(matches!(err, FetchError::MiddlewareReentry));
    assert_eq!(requests(&log).len(), 1);

    // A new fetch gets a fresh continuation.
    client.fetch("/", FetchOptions::new()).await.unwrap();
    assert_eq!(requests(&log).len(), 2);
}

// === Replies ===

#[tokio::test]
async fn test_short_circuit_with_raw_response() {
    let (mut client, log) = echo_client();
    client.use_middleware(from_fn(|_, _| {
        Box::pin(async {
            Ok(Reply::from(json_response(
                StatusCode::OK,
                serde_json::json!({ "cached": true }),
            )))
        })
    }));

    let body = client.fetch_result("/", FetchOptions::new()).await.unwrap();
    assert_eq!(body.as_json(), Some(&serde_json::json!({ "cached": true })));
    assert!(requests(&log).is_empty());
}

#[tokio::test]
async fn test_empty_reply_is_contract_violation() {
    let (mut client, _) = echo_client();
    client.use_middleware(from_fn(|ctx, next| {
        Box::pin(async move {
            next.run(ctx).await?;
            Ok(Reply::from(()))
        })
    }));

    let err = client.fetch("/", FetchOptions::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ContractViolation);
}

// === Status handling ===

fn not_found_client() -> fetchkit::Client {
    let (transport, _) = mock(|_| {
        json_response(StatusCode::NOT_FOUND, serde_json::json!({ "error": "missing" }))
    });
    builder(transport).build()
}

#[tokio::test]
async fn test_status_error_carries_decoded_body() {
    let err = not_found_client()
        .fetch("/", FetchOptions::new())
        .await
        .unwrap_err();

    let status = err.as_status().unwrap();
    assert_eq!(status.status(), StatusCode::NOT_FOUND);
    assert_eq!(status.headers()["content-type"], "application/json");
    assert_eq!(
        status.body().as_json(),
        Some(&serde_json::json!({ "error": "missing" }))
    );
    assert_eq!(err.to_string(), "Object");
}

#[tokio::test]
async fn test_allow_failed_policies() {
    let client = not_found_client();

    let response = client
        .fetch("/", FetchOptions::new().allow_failed(true))
        .await
        .unwrap();
    assert!(!response.ok());
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.body_data().as_json().is_some());

    let listed = client
        .fetch("/", FetchOptions::new().allow_failed([404]))
        .await;
    assert!(listed.is_ok());

    let other = client
        .fetch("/", FetchOptions::new().allow_failed(AllowFailed::Statuses(vec![500])))
        .await;
    assert!(other.unwrap_err().is_status());
}

#[tokio::test]
async fn test_status_messages() {
    let (transport, _) = mock(|request| match request.path() {
        "/text" => response(StatusCode::INTERNAL_SERVER_ERROR, "text/plain", "boom"),
        _ => http::Response::builder()
            .status(StatusCode::SERVICE_UNAVAILABLE)
            .body(ResponseBody::empty())
            .unwrap(),
    });
    let client = builder(transport).build();

    let text = client.fetch("/text", FetchOptions::new()).await.unwrap_err();
    assert_eq!(text.to_string(), "500: boom");
    let empty = client.fetch("/empty", FetchOptions::new()).await.unwrap_err();
    assert_eq!(empty.to_string(), "503: null");
    assert!(matches!(empty.as_status().unwrap().body(), BodyData::Empty));
}

#[tokio::test]
async fn test_decode_failure_survives_an_inner_peek() {
    let (transport, _) = mock(|_| response(StatusCode::OK, "application/json", "not json"));
    let mut client = builder(transport).build();
    client.use_middleware(from_fn(|ctx, next| {
        Box::pin(async move {
            let mut response = next.run(ctx).await?;
            let _ = response.parse_body().await;
            Ok(Reply::from(response))
        })
    }));

    let err = client.fetch_result("/", FetchOptions::new()).await.unwrap_err();
    assert!(matches!(err, FetchError::UnexpectedBody(_)));
    assert_eq!(err.kind(), ErrorKind::Body);
}

#[derive(Debug)]
struct ApiError(String);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error: {}", self.0)
    }
}

impl std::error::Error for ApiError {}

#[tokio::test]
async fn test_status_error_factory() {
    let (transport, _) = mock(|request| match request.path() {
        "/bad" => response(StatusCode::BAD_REQUEST, "text/plain", "invalid id"),
        _ => response(StatusCode::FORBIDDEN, "text/plain", "denied"),
    });
    let client = builder(transport)
        .status_error(|response| {
            if response.status() != StatusCode::BAD_REQUEST {
                return None;
            }
            let message = response.body_data().as_text().unwrap_or_default();
            Some(ApiError(message.to_owned()).into())
        })
        .build();

    let custom = client.fetch("/bad", FetchOptions::new()).await.unwrap_err();
    assert_eq!(custom.kind(), ErrorKind::Custom);
    assert_eq!(custom.to_string(), "api error: invalid id");
    match custom {
        FetchError::Custom(inner) => assert!(inner.downcast_ref::<ApiError>().is_some()),
        other => panic!("unexpected error: {other:?}"),
    }

    let fallback = client.fetch("/denied", FetchOptions::new()).await.unwrap_err();
    assert_eq!(fallback.as_status().unwrap().status(), StatusCode::FORBIDDEN);
}

// === Timeout ===

fn slow_client(timeout: Duration) -> fetchkit::Client {
    let transport = transport_fn(|request: TransportRequest| async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        let path = request.uri().path().to_owned();
        Ok(http::Response::new(ResponseBody::from(path)))
    });
    builder(transport).middleware(Timeout::new(timeout)).build()
}

#[tokio::test(start_paused = true)]
async fn test_timeout_middleware() {
    let client = slow_client(Duration::from_secs(1));

    let err = client.fetch("/slow", FetchOptions::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimedOut);

    let response = client
        .fetch(
            "/slow",
            FetchOptions::new().extension(RequestTimeout(Duration::from_secs(60))),
        )
        .await
        .unwrap();
    assert!(response.ok());
}

#[tokio::test]
async fn test_echo_fixture_reports_request() {
    let (transport, _) = mock(echo);
    let client = builder(transport).build();

    let body = client
        .fetch_result("/echo?x=1", FetchOptions::new())
        .await
        .unwrap();
    let json = body.as_json().unwrap();
    assert_eq!(json["path"], "/echo");
    assert_eq!(json["query"], "x=1");
}
