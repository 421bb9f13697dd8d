//! Integration tests for `PageClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made.

use std::time::{Duration, Instant};

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockwatch_core::DEFAULT_USER_AGENT;
use stockwatch_scraper::{FetchError, PageClient, PageSource};

fn test_client() -> PageClient {
    PageClient::new(5, DEFAULT_USER_AGENT).expect("failed to build test PageClient")
}

#[tokio::test]
async fn fetch_returns_body_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/gpu"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><button>Add to Cart</button></body></html>"),
        )
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_page(&format!("{}/products/gpu", server.uri()))
        .await
        .expect("fetch should succeed");

    assert!(body.contains("Add to Cart"), "unexpected body: {body}");
}

#[tokio::test]
async fn fetch_sends_browser_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let body = test_client()
        .fetch_page(&format!("{}/item", server.uri()))
        .await
        .expect("request with browser UA should match the mock");
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn fetch_through_trait_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    let source: Box<dyn PageSource> = Box::new(test_client());
    let body = source.fetch(&format!("{}/item", server.uri())).await.unwrap();
    assert_eq!(body, "hello");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Access Denied"))
        .mount(&server)
        .await;

    let url = format!("{}/blocked", server.uri());
    let err = test_client().fetch_page(&url).await.unwrap_err();

    assert!(
        matches!(err, FetchError::UnexpectedStatus { status: 403, url: ref u } if *u == url),
        "expected UnexpectedStatus(403), got: {err:?}"
    );
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("too late")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = PageClient::with_timeout(Duration::from_millis(250), DEFAULT_USER_AGENT)
        .expect("failed to build test PageClient");

    let started = Instant::now();
    let err = client
        .fetch_page(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected a timeout, got: {err:?}");
    assert!(
        started.elapsed() < Duration::from_secs(4),
        "fetch should give up well before the server responds"
    );
}

#[tokio::test]
async fn connection_refused_is_an_http_error() {
    // Nothing listens on port 1 on loopback.
    let err = test_client()
        .fetch_page("http://127.0.0.1:1/gone")
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http(_)), "got: {err:?}");
}
