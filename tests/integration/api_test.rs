// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Extension;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zonecrawl::config::settings::{CrawlSettings, ServerSettings, Settings, UpstreamSettings};
use zonecrawl::presentation::routes;

fn test_settings(archive_root: &str) -> Arc<Settings> {
    Arc::new(Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        upstream: UpstreamSettings {
            archive_root: archive_root.to_string(),
            request_timeout: 5,
        },
        crawl: CrawlSettings {
            max_pages: 50,
            progress_estimate_total: 50,
            page_delay_ms: 0,
        },
    })
}

async fn body_lines(response: axum::response::Response) -> Vec<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    text.lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn health_check_works() {
    let app = routes::routes().layer(Extension(test_settings("http://unused")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn version_endpoint_reports_crate_version() {
    let app = routes::routes().layer(Extension(test_settings("http://unused")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/version")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn scrape_endpoint_streams_ndjson_events() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=foo"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<td>a.com</td><td>b.com</td>"),
        )
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=foo"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&upstream)
        .await;

    let app = routes::routes().layer(Extension(test_settings(&upstream.uri())));

    let request_body = r#"{
        "sessionId": "sid",
        "sessionToken": "tok",
        "mode": "single",
        "notifier": "foo"
    }"#;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/scrape")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(request_body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("text/plain"));

    let lines = body_lines(response).await;

    assert_eq!(lines.first().map(|v| v["type"].clone()), Some("progress".into()));
    let results: Vec<_> = lines
        .iter()
        .filter(|v| v["type"] == "result")
        .map(|v| v["url"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(results, vec!["a.com", "b.com"]);

    let last = lines.last().expect("stream should not be empty");
    assert_eq!(last["type"], "status");
    assert_eq!(last["message"], "Scraping completed");
}

#[tokio::test]
async fn scrape_endpoint_rejects_malformed_json() {
    let app = routes::routes().layer(Extension(test_settings("http://unused")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/scrape")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"mode": "single"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Missing credentials fail JSON deserialization before any crawl starts
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
