//! SafeHttp tests against a local mock server.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use membit::http::{RequestOptions, SafeHttp};

fn fast_retries(retries: u32) -> RequestOptions {
    RequestOptions::new()
        .retries(retries)
        .backoff_step(Duration::from_millis(1))
        .timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn returns_decoded_body_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"clusters": []})))
        .expect(1)
        .mount(&server)
        .await;

    let http = SafeHttp::new();
    let body = http
        .get_json(
            &format!("{}/search", server.uri()),
            &HeaderMap::new(),
            &[],
            &fast_retries(2),
        )
        .await;

    assert_eq!(body, Some(json!({"clusters": []})));
    assert!(http.is_open());
}

#[tokio::test]
async fn server_errors_exhaust_all_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let http = SafeHttp::new();
    let body = http
        .get_json(&server.uri(), &HeaderMap::new(), &[], &fast_retries(2))
        .await;

    assert_eq!(body, None);
}

#[tokio::test]
async fn recovers_after_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let http = SafeHttp::new();
    let body = http
        .get_json(&server.uri(), &HeaderMap::new(), &[], &fast_retries(2))
        .await;

    assert_eq!(body, Some(json!({"ok": true})));
}

#[tokio::test]
async fn non_200_success_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let http = SafeHttp::new();
    let body = http
        .get_json(&server.uri(), &HeaderMap::new(), &[], &RequestOptions::no_retry())
        .await;

    assert_eq!(body, None);
}

#[tokio::test]
async fn invalid_json_is_retried_then_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(2)
        .mount(&server)
        .await;

    let http = SafeHttp::new();
    let body = http
        .get_json(&server.uri(), &HeaderMap::new(), &[], &fast_retries(1))
        .await;

    assert_eq!(body, None);
}

#[tokio::test]
async fn empty_object_body_counts_as_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let http = SafeHttp::new();
    let body = http
        .get_json(&server.uri(), &HeaderMap::new(), &[], &fast_retries(2))
        .await;

    assert_eq!(body, None);
}

#[tokio::test]
async fn falsy_bodies_count_as_no_data() {
    for body in [json!([]), json!(false), json!(0), json!("")] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let http = SafeHttp::new();
        let result = http
            .get_json(&server.uri(), &HeaderMap::new(), &[], &fast_retries(2))
            .await;
        assert_eq!(result, None, "body {body} should be absent");
    }
}

#[tokio::test]
async fn sends_params_headers_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "solana"))
        .and(query_param("limit", "6"))
        .and(header("x-membit-api-key", "secret"))
        .and(header("user-agent", membit::version::user_agent().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"clusters": [1]})))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert("x-membit-api-key", HeaderValue::from_static("secret"));

    let http = SafeHttp::new();
    let body = http
        .get_json(
            &server.uri(),
            &headers,
            &[("q", "solana".to_string()), ("limit", "6".to_string())],
            &RequestOptions::no_retry(),
        )
        .await;

    assert!(body.is_some());
}

#[tokio::test]
async fn connection_refused_yields_none() {
    let http = SafeHttp::new();
    let body = http
        .get_json(
            "http://127.0.0.1:1/unreachable",
            &HeaderMap::new(),
            &[],
            &fast_retries(1),
        )
        .await;

    assert_eq!(body, None);
}

#[tokio::test]
async fn closed_session_is_recreated_on_next_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .expect(2)
        .mount(&server)
        .await;

    let http = SafeHttp::new();
    let options = RequestOptions::no_retry();
    assert!(
        http.get_json(&server.uri(), &HeaderMap::new(), &[], &options)
            .await
            .is_some()
    );
    assert!(http.close());
    assert!(
        http.get_json(&server.uri(), &HeaderMap::new(), &[], &options)
            .await
            .is_some()
    );
    assert!(http.is_open());
}
