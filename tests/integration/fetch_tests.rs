//! Fetcher tests against mock HTTP servers

use std::time::Duration;
use webpage_analyzer::config::FetcherConfig;
use webpage_analyzer::fetch::{FetchError, Fetcher, HttpFetcher};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> FetcherConfig {
    FetcherConfig {
        timeout_secs: 5,
        connect_timeout_secs: 2,
        user_agent: "TestAnalyzer/1.0".to_string(),
        max_body_bytes: 1024 * 1024,
    }
}

#[tokio::test]
async fn test_fetch_sends_configured_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestAnalyzer/1.0"))
        .and(header_exists("accept"))
        .and(header_exists("accept-language"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&test_config()).unwrap();
    let page = fetcher
        .fetch(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.body, b"<html></html>");
}

#[tokio::test]
async fn test_fetch_returns_error_statuses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&test_config()).unwrap();
    let page = fetcher
        .fetch(&format!("{}/gone", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(page.status, 404);
    assert!(!page.is_success());
}

#[tokio::test]
async fn test_fetch_follows_redirects() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>New</title>"))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&test_config()).unwrap();
    let page = fetcher.fetch(&format!("{}/old", base_url)).await.unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.final_url, format!("{}/new", base_url));
}

#[tokio::test]
async fn test_fetch_rejects_oversized_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(4096)))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        max_body_bytes: 1024,
        ..test_config()
    };
    let fetcher = HttpFetcher::new(&config).unwrap();
    let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();

    assert_eq!(err, FetchError::BodyTooLarge { limit: 1024 });
    assert_eq!(err.status_code(), 413);
}

#[tokio::test]
async fn test_fetch_timeout_maps_to_408() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        timeout_secs: 1,
        connect_timeout_secs: 1,
        ..test_config()
    };
    let fetcher = HttpFetcher::new(&config).unwrap();
    let err = fetcher.fetch(&mock_server.uri()).await.unwrap_err();

    assert_eq!(err, FetchError::Timeout);
    assert_eq!(err.status_code(), 408);
}

#[tokio::test]
async fn test_fetch_closed_port_is_unavailable() {
    // Grab a free port, then release it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let fetcher = HttpFetcher::new(&test_config()).unwrap();
    let err = fetcher
        .fetch(&format!("http://127.0.0.1:{}/", port))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 503);
}

#[tokio::test]
async fn test_fetch_rejects_invalid_urls_without_io() {
    let fetcher = HttpFetcher::new(&test_config()).unwrap();

    for url in ["", "not a url", "ftp://example.com/file", "/relative/path"] {
        let err = fetcher.fetch(url).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)), "url {:?}", url);
        assert_eq!(err.status_code(), 400);
    }
}
