//! End-to-end analysis tests

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use webpage_analyzer::analysis::{ExtractorRegistry, RecordBuilder};
use webpage_analyzer::config::Config;
use webpage_analyzer::{AnalysisService, AnalyzerError, DocumentParser, HtmlDocumentParser};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXAMPLE_PAGE: &str = r#"<!DOCTYPE html><html><head><title>Example Domain</title></head><body><a href="/about">x</a><a href="https://other.com">y</a></body></html>"#;

const RICH_PAGE: &str = r##"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">
<html>
<head><title>  Account Portal  </title></head>
<body>
  <h1>Portal</h1>
  <h2>News</h2><h2>Events</h2>
  <H3>Archive</H3>
  <nav>
    <a href="/home">Home</a>
    <a href="#top">Top</a>
    <a href="?page=2">Next</a>
    <a href="//cdn.elsewhere.net/lib.js">CDN</a>
    <a href="https://partner.org/">Partner</a>
    <a href="mailto:help@example.com">Mail</a>
    <a href="tel:+15550100">Call</a>
    <a href="ftp://files.example.com/">Files</a>
    <a href="javascript:void(0)">Menu</a>
    <a href="">Blank</a>
    <a>Anchor</a>
    <a href="http://[::1/">Broken</a>
  </nav>
  <form action="/search"><input name="q"><button>Search</button></form>
  <form action="/session" method="post">
    <p>Welcome back</p>
    <input type="text" name="username" autocomplete="username">
    <input type="password" name="password" autocomplete="current-password">
    <button type="submit">Sign in</button>
  </form>
</body>
</html>"##;

fn service() -> AnalysisService {
    AnalysisService::from_config(&Config::default()).unwrap()
}

async fn mount_page(mock_server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_example_domain_scenario() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", EXAMPLE_PAGE).await;

    let url = format!("{}/", mock_server.uri());
    let record = service().analyze(&url).await.unwrap();

    assert_eq!(record.url, url);
    assert_eq!(record.html_version, "HTML5 (implied)");
    assert_eq!(record.page_title, "Example Domain");
    assert_eq!(record.internal_links, 1);
    assert_eq!(record.external_links, 1);
    assert_eq!(record.inaccessible_links, 0);
    assert!(!record.has_login_form);
    assert!(record.headings.is_empty());
    assert!(record.pass_errors.is_empty());
}

#[tokio::test]
async fn test_rich_page() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/portal", RICH_PAGE).await;

    let record = service()
        .analyze(&format!("{}/portal", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(record.html_version, "HTML4");
    assert_eq!(record.page_title, "Account Portal");
    assert_eq!(record.headings.get("h1"), Some(&1));
    assert_eq!(record.headings.get("h2"), Some(&2));
    assert_eq!(record.headings.get("h3"), Some(&1));
    assert_eq!(record.headings.len(), 3);
    // /home, #top, ?page=2
    assert_eq!(record.internal_links, 3);
    // cdn, partner, mailto, tel, ftp
    assert_eq!(record.external_links, 5);
    // javascript, blank, missing, broken
    assert_eq!(record.inaccessible_links, 4);
    assert!(record.has_login_form);
}

#[tokio::test]
async fn test_second_request_is_served_from_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EXAMPLE_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service();
    let url = format!("{}/cached", mock_server.uri());
    let first = service.analyze(&url).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = service.analyze(&url).await.unwrap();

    assert_eq!(first.analyzed_at, second.analyzed_at);
    assert_eq!(first, second);
    // MockServer verifies the single expected fetch on drop
}

#[tokio::test]
async fn test_http_error_becomes_analysis_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let url = format!("{}/missing", mock_server.uri());
    let err = match service().analyze(&url).await {
        Err(AnalyzerError::Analysis(err)) => err,
        other => panic!("expected analysis error, got {:?}", other),
    };

    assert_eq!(err.status_code, 404);
    assert_eq!(err.url, url);
    assert_eq!(
        err.to_string(),
        format!("HTTP 404: {} (URL: {})", err.error_message, url)
    );
}

#[tokio::test]
async fn test_server_error_status_is_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;

    let service = service();
    let url = format!("{}/flaky", mock_server.uri());
    assert!(service.analyze(&url).await.is_err());
    assert!(service.analyze(&url).await.is_err());
}

#[tokio::test]
async fn test_binary_body_is_parse_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR".to_vec()))
        .mount(&mock_server)
        .await;

    let url = format!("{}/logo.png", mock_server.uri());
    match service().analyze(&url).await {
        Err(AnalyzerError::Analysis(err)) => {
            assert_eq!(err.status_code, 422);
            assert!(err.error_message.starts_with("Failed to parse HTML"));
        }
        other => panic!("expected analysis error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_concurrent_and_sequential_records_match() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/portal", RICH_PAGE).await;

    let url = format!("{}/portal", mock_server.uri());
    let page_url = Url::parse(&url).unwrap();
    let document = HtmlDocumentParser::new().parse(RICH_PAGE.as_bytes()).unwrap();

    for _ in 0..5 {
        // Fresh service each round so nothing comes from the cache
        let concurrent = service().analyze(&url).await.unwrap();

        let mut builder = RecordBuilder::new(url.as_str(), concurrent.analyzed_at);
        ExtractorRegistry::default().run_sequential(&document, &page_url, &mut builder);
        let sequential = builder.finish(concurrent.processing_time);

        assert_eq!(
            serde_json::to_string(&concurrent).unwrap(),
            serde_json::to_string(&sequential).unwrap()
        );
    }
}

#[tokio::test]
async fn test_many_requests_share_one_service() {
    let mock_server = MockServer::start().await;
    for i in 0..8 {
        mount_page(
            &mock_server,
            &format!("/page{}", i),
            &format!("<title>Page {}</title><h1>{}</h1>", i, i),
        )
        .await;
    }

    let service = Arc::new(service());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            let url = format!("{}/page{}", mock_server.uri(), i);
            tokio::spawn(async move { service.analyze(&url).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let record = handle.await.unwrap().unwrap();
        assert_eq!(record.page_title, format!("Page {}", i));
        assert_eq!(record.headings.get("h1"), Some(&1));
    }
}

#[tokio::test]
async fn test_record_json_shape() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", EXAMPLE_PAGE).await;

    let record = service()
        .analyze(&format!("{}/", mock_server.uri()))
        .await
        .unwrap();
    let json = serde_json::to_value(&record).unwrap();

    for key in [
        "url",
        "html_version",
        "page_title",
        "headings",
        "internal_links",
        "external_links",
        "inaccessible_links",
        "has_login_form",
        "analyzed_at",
        "processing_time",
    ] {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
    assert!(json.get("pass_errors").is_none());

    let analyzed_at = json["analyzed_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(analyzed_at).is_ok());
    assert!(record.analyzed_at <= Utc::now());
}
