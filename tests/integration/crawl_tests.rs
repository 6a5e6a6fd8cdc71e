//! Integration tests for the crawler
//!
//! Every mock server listens on its own port, and since the port is part of
//! a node's identity each server acts as a separate site.

use site_graph::config::{CrawlStrategy, CrawlerConfig};
use site_graph::{node_url, Crawler};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const STRATEGIES: [CrawlStrategy; 2] = [CrawlStrategy::Pool, CrawlStrategy::Recursive];

fn test_crawler(strategy: CrawlStrategy) -> Crawler {
    test_crawler_with(CrawlerConfig {
        strategy,
        workers: 4,
        ..CrawlerConfig::default()
    })
}

fn test_crawler_with(config: CrawlerConfig) -> Crawler {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .expect("Failed to build client");
    Crawler::with_client(client, config)
}

/// HTML body with one anchor per href
fn page(hrefs: &[String]) -> String {
    let anchors: String = hrefs
        .iter()
        .enumerate()
        .map(|(i, href)| format!(r#"<a href="{}">link {}</a>"#, href, i))
        .collect();
    format!("<html><body>{}</body></html>", anchors)
}

async fn site(body: String, expected_fetches: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_fetches)
        .mount(&server)
        .await;
    server
}

fn root(server: &MockServer) -> Url {
    node_url(&Url::parse(&server.uri()).expect("Failed to parse mock server URI"))
}

#[tokio::test]
async fn test_single_hop_collapses_paths_and_suppresses_self_links() {
    for strategy in STRATEGIES {
        let b = site(page(&[]), 0).await;
        let a = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(&[
                format!("{}/page?x=1", b.uri()),
                format!("{}/dup", a.uri()),
            ])))
            .expect(1)
            .mount(&a)
            .await;

        let report = test_crawler(strategy)
            .crawl(&root(&a), 1, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.graph.node_count(), 2, "{}", strategy);
        assert_eq!(report.graph.edge_count(), 1, "{}", strategy);
        assert!(report.graph.edge_exists(&root(&a), &root(&b)));
        assert!(!report.graph.edge_exists(&root(&a), &root(&a)));
        assert!(!report.cancelled);
        assert_eq!(report.stats.pages_fetched, 1);
    }
}

#[tokio::test]
async fn test_failed_node_keeps_partial_graph() {
    for strategy in STRATEGIES {
        let b = site(page(&[]), 1).await;
        let c = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&c)
            .await;
        let a = site(page(&[c.uri(), b.uri()]), 1).await;

        let report = test_crawler(strategy)
            .crawl(&root(&a), 2, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.graph.node_count(), 3, "{}", strategy);
        assert!(report.graph.edge_exists(&root(&a), &root(&b)));
        assert!(report.graph.edge_exists(&root(&a), &root(&c)));
        assert!(report.graph.targets(&root(&c)).is_empty());
        assert_eq!(report.stats.failures, 1);
        assert_eq!(report.stats.pages_fetched, 2);
    }
}

#[tokio::test]
async fn test_depth_zero_returns_only_the_seed() {
    for strategy in STRATEGIES {
        let a = site(page(&["https://elsewhere.test/".to_string()]), 0).await;

        let report = test_crawler(strategy)
            .crawl(&root(&a), 0, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.graph.node_count(), 1);
        assert_eq!(report.graph.edge_count(), 0);
        assert!(report.graph.contains_node(&root(&a)));

        let view = report.graph.view();
        assert_eq!(view.nodes[0].id, a.uri());
        assert!(view.links.is_empty());
    }
}

#[tokio::test]
async fn test_depth_bound_stops_fetching() {
    for strategy in STRATEGIES {
        let d = site(page(&[]), 0).await;
        let c = site(page(&[d.uri()]), 0).await;
        let b = site(page(&[c.uri()]), 1).await;
        let a = site(page(&[b.uri()]), 1).await;

        let report = test_crawler(strategy)
            .crawl(&root(&a), 2, CancellationToken::new())
            .await
            .unwrap();

        // c is discovered at depth 2 but never fetched
        assert_eq!(report.graph.node_count(), 3, "{}", strategy);
        assert!(report.graph.edge_exists(&root(&a), &root(&b)));
        assert!(report.graph.edge_exists(&root(&b), &root(&c)));
        assert!(!report.graph.contains_node(&root(&d)));
    }
}

#[tokio::test]
async fn test_cycle_fetches_each_host_once() {
    for strategy in STRATEGIES {
        let b = MockServer::start().await;
        let a = site(page(&[b.uri(), format!("{}/other", b.uri())]), 1).await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page(&[
                a.uri(),
                format!("{}/again", a.uri()),
            ])))
            .expect(1)
            .mount(&b)
            .await;

        let report = test_crawler(strategy)
            .crawl(&root(&a), 5, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.graph.node_count(), 2);
        assert_eq!(report.graph.edge_count(), 2);
        assert!(report.graph.edge_exists(&root(&b), &root(&a)));
        assert_eq!(report.stats.pages_fetched, 2);
    }
}

#[tokio::test]
async fn test_cache_avoids_refetch_across_crawls() {
    for strategy in STRATEGIES {
        let b = site(page(&[]), 0).await;
        let a = site(page(&[b.uri()]), 1).await;
        let crawler = test_crawler(strategy);

        let first = crawler
            .crawl(&root(&a), 1, CancellationToken::new())
            .await
            .unwrap();
        let second = crawler
            .crawl(&root(&a), 1, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(first.stats.pages_fetched, 1);
        assert_eq!(second.stats.pages_fetched, 0);
        assert_eq!(second.stats.cache_hits, 1);
        assert_eq!(first.graph.view(), second.graph.view());
        assert!(crawler.cache().contains(root(&a).as_str()));
    }
}

#[tokio::test]
async fn test_cancellation_returns_partial_graph() {
    for strategy in STRATEGIES {
        let a = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(page(&[]))
                    .set_delay(Duration::from_secs(30)),
            )
            .mount(&a)
            .await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let crawler = test_crawler_with(CrawlerConfig {
            strategy,
            ..CrawlerConfig::default()
        });
        let started = Instant::now();
        let report = crawler.crawl(&root(&a), 3, cancel).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(report.cancelled);
        assert_eq!(report.graph.node_count(), 1);
        assert_eq!(report.stats.failures, 0);
    }
}

#[tokio::test]
async fn test_crawl_deadline_cancels_slow_crawl() {
    let a = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(&[]))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&a)
        .await;

    let crawler = test_crawler_with(CrawlerConfig {
        crawl_timeout_secs: 1,
        ..CrawlerConfig::default()
    });
    let started = Instant::now();
    let report = crawler
        .crawl(&root(&a), 2, CancellationToken::new())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(report.cancelled);
    assert_eq!(report.graph.node_count(), 1);
}

#[tokio::test]
async fn test_pretty_printed_anchor_records_edge() {
    for strategy in STRATEGIES {
        let b = site(page(&[]), 0).await;
        let body = format!(
            "<html><body>\n  <a href=\"{}/\">\n    <span>B site</span>\n  </a>\n</body></html>",
            b.uri()
        );
        let a = site(body, 1).await;

        let report = test_crawler(strategy)
            .crawl(&root(&a), 1, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.graph.edge_count(), 1, "{}", strategy);
        assert!(report.graph.edge_exists(&root(&a), &root(&b)));
        assert_eq!(report.stats.links_skipped, 0);
    }
}
