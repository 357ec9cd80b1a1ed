//! HTTP front door tests over a real socket

use std::sync::Arc;
use webpage_analyzer::config::Config;
use webpage_analyzer::server::router;
use webpage_analyzer::AnalysisService;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the router on an ephemeral port and returns its base URL
async fn spawn_app() -> String {
    let service = Arc::new(AnalysisService::from_config(&Config::default()).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(service, &Config::default().server))
            .await
            .unwrap();
    });
    format!("http://{}", address)
}

#[tokio::test]
async fn test_analyze_over_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Sign in</title></head><body>
               <form action="/login"><input type="password" name="pw"></form>
               </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/analyze", app))
        .json(&serde_json::json!({ "url": format!("{}/login", mock_server.uri()) }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["page_title"], "Sign in");
    assert_eq!(body["has_login_form"], true);
}

#[tokio::test]
async fn test_analysis_error_over_http() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/analyze", app))
        .json(&serde_json::json!({ "url": "notaurl" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status_code"], 400);
    assert_eq!(body["url"], "notaurl");
}

#[tokio::test]
async fn test_health_over_http() {
    let app = spawn_app().await;
    let body: serde_json::Value = reqwest::get(format!("{}/api/health", app))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
}
