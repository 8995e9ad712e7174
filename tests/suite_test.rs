//! Tests for endpoint suites.

mod common;

use common::{echo_client, requests};
use fetchkit::suite::{create_suite, Route, SuiteOptions};
use fetchkit::{ErrorKind, FetchOptions};
use serde::Deserialize;
use url::Url;

#[tokio::test]
async fn test_fetch_result_and_verbs() {
    let (client, _) = echo_client();
    let suite = create_suite(client, SuiteOptions::new());

    let body = suite
        .resolve("/test")
        .fetch_result(FetchOptions::new())
        .await
        .unwrap();
    assert_eq!(body.as_json().unwrap()["path"], "/test");
    assert_eq!(body.as_json().unwrap()["method"], "GET");

    let posted = suite.resolve("/test").post(FetchOptions::new()).await.unwrap();
    assert_eq!(posted.as_json().unwrap()["method"], "POST");
}

#[tokio::test]
async fn test_fetch_returns_wrapper() {
    let (client, _) = echo_client();
    let suite = create_suite(client, SuiteOptions::new());

    let response = suite.resolve("/test").fetch(FetchOptions::new()).await.unwrap();
    assert!(response.ok());
    assert_eq!(response.body_data().as_json().unwrap()["path"], "/test");
}

#[tokio::test]
async fn test_base_path() {
    let (client, _) = echo_client();
    let suite = create_suite(client, SuiteOptions::new().base_path("/base"));

    let slash = suite.resolve("/test").get(FetchOptions::new()).await.unwrap();
    assert_eq!(slash.as_json().unwrap()["path"], "/base/test");

    let dotted = suite.resolve("./test").get(FetchOptions::new()).await.unwrap();
    assert_eq!(dotted.as_json().unwrap()["path"], "/base./test");
}

#[tokio::test]
async fn test_origin_overrides_default() {
    let (client, log) = echo_client();
    let suite = create_suite(
        client,
        SuiteOptions::new().origin(Url::parse("http://api.local:9000").unwrap()),
    );

    suite.resolve("/items").get(FetchOptions::new()).await.unwrap();

    let seen = &requests(&log)[0];
    assert_eq!(seen.uri.to_string(), "http://api.local:9000/items");
}

#[tokio::test]
async fn test_path_params() {
    let (client, log) = echo_client();
    let suite = create_suite(client, SuiteOptions::new());

    suite
        .resolve("/:p1/value/:p2")
        .fetch(FetchOptions::new().param("p1", "data"))
        .await
        .unwrap();

    assert_eq!(requests(&log)[0].path(), "/data/value/:p2");
}

#[tokio::test]
async fn test_path_params_with_origin_and_query() {
    let (client, log) = echo_client();
    let suite = create_suite(
        client,
        SuiteOptions::new()
            .origin(Url::parse("http://api.local").unwrap())
            .base_path("/users"),
    );

    suite
        .resolve("/:id")
        .get(
            FetchOptions::new()
                .param("id", 42)
                .query(fetchkit::Query::new().append("id", ":id")),
        )
        .await
        .unwrap();

    let seen = &requests(&log)[0];
    assert_eq!(seen.path(), "/users/42");
    assert_eq!(seen.query(), Some("id=%3Aid"));
}

#[tokio::test]
async fn test_any_string_is_a_verb() {
    let (client, log) = echo_client();
    let suite = create_suite(client, SuiteOptions::new());
    let endpoint = suite.resolve("/cache");

    endpoint.call("purge", FetchOptions::new()).await.unwrap();
    endpoint.call("fetch", FetchOptions::new()).await.unwrap();
    endpoint
        .call("fetchResult", FetchOptions::new().method("delete"))
        .await
        .unwrap();

    let methods: Vec<_> = requests(&log)
        .into_iter()
        .map(|r| r.method.to_string())
        .collect();
    assert_eq!(methods, vec!["PURGE", "GET", "DELETE"]);
}

#[tokio::test]
async fn test_errors_surface_from_endpoints() {
    let (transport, _) = common::mock(|_| {
        common::response(http::StatusCode::NOT_FOUND, "text/plain", "gone")
    });
    let suite = create_suite(common::builder(transport).build(), SuiteOptions::new());

    let err = suite.resolve("/x").get(FetchOptions::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(err.to_string(), "404: gone");
}

#[derive(Debug, Deserialize, PartialEq)]
struct Echo {
    path: String,
    method: String,
}

struct UpdateUser;

impl Route for UpdateUser {
    const METHOD: &'static str = "put";
    const PATH: &'static str = "/users/:id";
    type Response = Echo;
}

#[tokio::test]
async fn test_typed_route() {
    let (client, _) = echo_client();
    let suite = create_suite(client, SuiteOptions::new().base_path("/api"));

    let echo = suite
        .send::<UpdateUser>(FetchOptions::new().param("id", 5))
        .await
        .unwrap();
    assert_eq!(
        echo,
        Echo {
            path: "/api/users/5".to_owned(),
            method: "PUT".to_owned(),
        }
    );
}
