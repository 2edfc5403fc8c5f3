// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zonecrawl::application::dto::scrape_request::ScrapeRequestDto;
use zonecrawl::domain::models::crawl_job::CrawlMode;
use zonecrawl::domain::models::stream_event::StreamEvent;
use zonecrawl::domain::services::crawl_service::{CrawlConfig, CrawlService};
use zonecrawl::domain::services::dispatch_service::DispatchService;
use zonecrawl::domain::services::reporter::StreamReporter;
use zonecrawl::engines::fetch_engine::FetchEngine;

fn test_crawl_config() -> CrawlConfig {
    CrawlConfig {
        max_pages: 50,
        progress_estimate_total: 50,
        page_delay: Duration::ZERO,
    }
}

fn fetch_engine() -> Arc<FetchEngine> {
    Arc::new(FetchEngine::new(Duration::from_secs(5)).expect("client should build"))
}

async fn run_job_against(server_uri: &str, request: ScrapeRequestDto) -> Vec<StreamEvent> {
    let job = DispatchService::build_job(request, server_uri);
    let service = CrawlService::new(fetch_engine(), test_crawl_config());
    let (reporter, mut rx) = StreamReporter::channel(256);

    DispatchService::run_job(&job, &service, &reporter).await;
    drop(reporter);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn single_request(notifier: &str) -> ScrapeRequestDto {
    ScrapeRequestDto {
        session_id: "sid".to_string(),
        session_token: "tok".to_string(),
        mode: CrawlMode::Single,
        notifier: Some(notifier.to_string()),
        notifier_list: None,
    }
}

#[tokio::test]
async fn test_single_mode_end_to_end_event_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=foo"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<table><tr><td>a.com</td><td>b.com</td><td>a.com</td></tr></table>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=foo"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>No results</body></html>"),
        )
        .mount(&server)
        .await;

    let events = run_job_against(&server.uri(), single_request("foo")).await;

    let base = format!("{}/archive/notifier=foo?", server.uri());
    assert_eq!(
        events,
        vec![
            StreamEvent::progress(0, 50, 0),
            StreamEvent::url(format!("{}page=1", base)),
            StreamEvent::progress(1, 50, 2),
            StreamEvent::result("a.com"),
            StreamEvent::result("b.com"),
            StreamEvent::status("Page 1 completed - found 2 URLs"),
            StreamEvent::url(format!("{}page=2", base)),
            StreamEvent::progress(2, 50, 4),
            StreamEvent::status("No more results found at page 2"),
            StreamEvent::progress(2, 2, 100),
            StreamEvent::status("Scraping completed"),
        ]
    );
}

#[tokio::test]
async fn test_captcha_on_one_target_does_not_abort_the_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=blocked"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<form><input type="text" name="captcha"></form>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=open"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<td>mirror.net</td>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=open"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let request = ScrapeRequestDto {
        session_id: "sid".to_string(),
        session_token: "tok".to_string(),
        mode: CrawlMode::Mass,
        notifier: None,
        notifier_list: Some(vec!["blocked".to_string(), "open".to_string()]),
    };
    let events = run_job_against(&server.uri(), request).await;

    let captcha_errors: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, StreamEvent::Error { message } if message.contains("Captcha")))
        .collect();
    assert_eq!(captcha_errors.len(), 1);

    // No results from the blocked target, but the second target still ran
    assert!(events.contains(&StreamEvent::result("mirror.net")));
    assert_eq!(
        events.last(),
        Some(&StreamEvent::status("Scraping completed"))
    );
}

#[tokio::test]
async fn test_http_error_page_is_reported_and_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=flaky"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=flaky"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<td>late.org</td>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=flaky"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let events = run_job_against(&server.uri(), single_request("flaky")).await;

    let base = format!("{}/archive/notifier=flaky?", server.uri());
    assert!(events.contains(&StreamEvent::error(format!("HTTP 502 for {}page=1", base))));
    assert!(events.contains(&StreamEvent::result("late.org")));
    assert_eq!(
        events.last(),
        Some(&StreamEvent::status("Scraping completed"))
    );
}

#[tokio::test]
async fn test_session_expiry_stops_target_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/archive/notifier=stale"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>-<script type="text/javascript">location.href="/";</script>"#,
        ))
        .mount(&server)
        .await;

    let events = run_job_against(&server.uri(), single_request("stale")).await;

    assert!(events.iter().any(
        |e| matches!(e, StreamEvent::Error { message } if message.contains("PHPSESSID"))
    ));
    assert!(!events
        .iter()
        .any(|e| matches!(e, StreamEvent::Result { .. })));
    // Only page 1 was ever requested
    let urls: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, StreamEvent::Url { .. }))
        .collect();
    assert_eq!(urls.len(), 1);
}

#[tokio::test]
async fn test_missing_notifier_completes_with_no_results() {
    let server = MockServer::start().await;

    let request = ScrapeRequestDto {
        session_id: "sid".to_string(),
        session_token: "tok".to_string(),
        mode: CrawlMode::Single,
        notifier: None,
        notifier_list: None,
    };
    let events = run_job_against(&server.uri(), request).await;

    // Zero targets: the job completes immediately, no error
    assert_eq!(events, vec![StreamEvent::status("Scraping completed")]);
}
