//! Integration tests for the Webpage Analyzer
//!
//! These tests use wiremock to stand in for real web servers and drive the
//! fetcher, the analysis service and the HTTP front door end to end.

mod analyze_tests;
mod fetch_tests;
mod server_tests;
