//! Integration tests for the HTTP frontend
//!
//! Each test binds the router to an ephemeral port and talks to it with a
//! real HTTP client.

use reqwest::StatusCode;
use serde_json::Value;
use site_graph::config::Config;
use site_graph::server::{serve, AppState};
use site_graph::{Crawler, GraphView};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    handle: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let mut config = Config::default();
        config.crawler.max_depth = 3;
        config.crawler.fetch_timeout_ms = 2_000;

        let crawler = Crawler::new(&config).expect("Failed to build crawler");
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().unwrap();

        let shutdown = CancellationToken::new();
        let state = AppState::new(crawler, config, shutdown.clone());
        let handle = tokio::spawn(serve(listener, state));

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    async fn stop(self) {
        self.shutdown.cancel();
        self.handle.await.unwrap().unwrap();
    }
}

async fn message_of(response: reqwest::Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["message"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    server.stop().await;
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let server = TestServer::start().await;

    for query in ["/graph", "/graph?url=", "/graph?depth=1", "/graph?url=%20"] {
        let response = reqwest::get(server.url(query)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", query);
        let message = message_of(response).await;
        assert!(!message.is_empty(), "{}", query);
    }

    server.stop().await;
}

#[tokio::test]
async fn test_invalid_url_is_bad_request() {
    let server = TestServer::start().await;

    for url in ["not%20a%20url", "ftp://files.test/", "/relative/path"] {
        let response = reqwest::get(server.url(&format!("/graph?url={}", url)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", url);
        assert!(message_of(response)
            .await
            .starts_with("query parameter 'url' is invalid"));
    }

    server.stop().await;
}

#[tokio::test]
async fn test_invalid_depth_is_bad_request() {
    let server = TestServer::start().await;

    for depth in ["abc", "-2", "4"] {
        let response = reqwest::get(server.url(&format!(
            "/graph?url=http://127.0.0.1:9/&depth={}",
            depth
        )))
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", depth);
        assert!(message_of(response)
            .await
            .starts_with("query parameter 'depth' is invalid"));
    }

    server.stop().await;
}

#[tokio::test]
async fn test_graph_returns_json() {
    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&target)
        .await;

    let seed = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><body><a href="{}/about">about</a></body></html>"#,
            target.uri()
        )))
        .expect(1)
        .mount(&seed)
        .await;

    let server = TestServer::start().await;
    let response = reqwest::get(server.url(&format!("/graph?url={}/start", seed.uri())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/json");

    let view: GraphView = response.json().await.unwrap();
    assert_eq!(view.nodes.len(), 2);
    assert_eq!(view.nodes[0].id, seed.uri());
    assert_eq!(view.links.len(), 1);
    assert_eq!(view.links[0].source, seed.uri());
    assert_eq!(view.links[0].target, target.uri());
    assert_eq!(view.links[0].kind, "link");

    server.stop().await;
}

#[tokio::test]
async fn test_depth_zero_returns_single_node() {
    let seed = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&seed)
        .await;

    let server = TestServer::start().await;
    let response = reqwest::get(server.url(&format!("/graph?url={}&depth=0", seed.uri())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["nodes"].as_array().unwrap().len(), 1);
    assert_eq!(body["links"].as_array().unwrap().len(), 0);

    server.stop().await;
}

#[tokio::test]
async fn test_unreachable_seed_still_returns_graph() {
    let server = TestServer::start().await;

    // Nothing listens on the discard port
    let response = reqwest::get(server.url("/graph?url=http://127.0.0.1:9/&depth=1"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let view: GraphView = response.json().await.unwrap();
    assert_eq!(view.nodes.len(), 1);
    assert!(view.links.is_empty());

    server.stop().await;
}
