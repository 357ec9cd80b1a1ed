//! The analysis record and its JSON shape

use super::extractors::PassOutput;
use crate::pool::TaskError;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

/// Structural summary of one analyzed page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub url: String,
    pub html_version: String,
    pub page_title: String,
    pub headings: BTreeMap<String, usize>,
    pub internal_links: usize,
    pub external_links: usize,
    pub inaccessible_links: usize,
    pub has_login_form: bool,
    pub analyzed_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_duration")]
    pub processing_time: Duration,
    /// Extraction passes that failed; their fields keep zero values
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pass_errors: Vec<PassFailure>,
}

impl AnalysisRecord {
    /// Returns true if every extraction pass reported a result
    pub fn is_complete(&self) -> bool {
        self.pass_errors.is_empty()
    }
}

/// A failed extraction pass, by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassFailure {
    pub pass: String,
    pub error: String,
}

/// Accumulates pass outputs into a record
///
/// Fields no pass reported stay at their zero values.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    url: String,
    analyzed_at: DateTime<Utc>,
    html_version: String,
    page_title: String,
    headings: BTreeMap<String, usize>,
    internal_links: usize,
    external_links: usize,
    inaccessible_links: usize,
    has_login_form: bool,
    pass_errors: Vec<PassFailure>,
}

impl RecordBuilder {
    pub fn new(url: impl Into<String>, analyzed_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            analyzed_at,
            html_version: String::new(),
            page_title: String::new(),
            headings: BTreeMap::new(),
            internal_links: 0,
            external_links: 0,
            inaccessible_links: 0,
            has_login_form: false,
            pass_errors: Vec::new(),
        }
    }

    /// Stores one pass's output in its field
    pub fn apply(&mut self, output: PassOutput) -> &mut Self {
        match output {
            PassOutput::HtmlVersion(version) => self.html_version = version,
            PassOutput::Title(title) => self.page_title = title,
            PassOutput::Headings(headings) => self.headings = headings,
            PassOutput::Links(counts) => {
                self.internal_links = counts.internal;
                self.external_links = counts.external;
                self.inaccessible_links = counts.inaccessible;
            }
            PassOutput::LoginForm(found) => self.has_login_form = found,
        }
        self
    }

    /// Records a failed pass
    pub fn fail(&mut self, pass: impl Into<String>, error: impl ToString) -> &mut Self {
        self.pass_errors.push(PassFailure {
            pass: pass.into(),
            error: error.to_string(),
        });
        self
    }

    /// Folds one pass outcome into the record
    ///
    /// Both the pooled and the sequential runner go through here, so a failed
    /// pass reads the same either way.
    pub fn merge(&mut self, pass: &str, outcome: Result<PassOutput, TaskError>) -> &mut Self {
        match outcome {
            Ok(output) => self.apply(output),
            Err(e) => {
                tracing::warn!("Pass '{}' failed for {}: {}", pass, self.url, e);
                self.fail(pass, e)
            }
        }
    }

    pub fn finish(mut self, processing_time: Duration) -> AnalysisRecord {
        // Completion order across workers is arbitrary
        self.pass_errors.sort_by(|a, b| a.pass.cmp(&b.pass));

        AnalysisRecord {
            url: self.url,
            html_version: self.html_version,
            page_title: self.page_title,
            headings: self.headings,
            internal_links: self.internal_links,
            external_links: self.external_links,
            inaccessible_links: self.inaccessible_links,
            has_login_form: self.has_login_form,
            analyzed_at: self.analyzed_at,
            processing_time,
            pass_errors: self.pass_errors,
        }
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

/// Formats a duration for humans: `"0s"`, `"850ns"`, `"12.5µs"`, `"150ms"`,
/// `"2.25s"`, `"1m30s"`, `"2h0m5s"`
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", trim_decimal(nanos as f64 / 1e3));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", trim_decimal(nanos as f64 / 1e6));
    }

    let total_secs = duration.as_secs();
    let seconds = (total_secs % 60) as f64 + f64::from(duration.subsec_nanos()) / 1e9;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, trim_decimal(seconds))
    } else if minutes > 0 {
        format!("{}m{}s", minutes, trim_decimal(seconds))
    } else {
        format!("{}s", trim_decimal(seconds))
    }
}

fn trim_decimal(value: f64) -> String {
    let formatted = format!("{:.3}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::LinkCounts;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(850)), "850ns");
        assert_eq!(format_duration(Duration::from_nanos(12_500)), "12.5µs");
        assert_eq!(format_duration(Duration::from_millis(150)), "150ms");
        assert_eq!(format_duration(Duration::from_micros(150_234)), "150.234ms");
        assert_eq!(format_duration(Duration::from_millis(2_250)), "2.25s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(7_205)), "2h0m5s");
    }

    #[test]
    fn test_builder_applies_outputs() {
        let mut builder = RecordBuilder::new("https://example.com", fixed_time());
        builder
            .apply(PassOutput::HtmlVersion("HTML4".to_string()))
            .apply(PassOutput::Title("Hello".to_string()))
            .apply(PassOutput::Links(LinkCounts {
                internal: 3,
                external: 2,
                inaccessible: 1,
            }))
            .apply(PassOutput::LoginForm(true));
        let record = builder.finish(Duration::from_millis(5));

        assert_eq!(record.html_version, "HTML4");
        assert_eq!(record.page_title, "Hello");
        assert_eq!(record.internal_links, 3);
        assert_eq!(record.external_links, 2);
        assert_eq!(record.inaccessible_links, 1);
        assert!(record.has_login_form);
        assert!(record.headings.is_empty());
        assert!(record.is_complete());
    }

    #[test]
    fn test_failed_pass_keeps_zero_value() {
        let mut builder = RecordBuilder::new("https://example.com", fixed_time());
        builder
            .fail("login_form", "task panicked: boom")
            .fail("headings", "task panicked: bang");
        let record = builder.finish(Duration::from_millis(1));

        assert!(!record.has_login_form);
        assert!(!record.is_complete());
        assert_eq!(record.pass_errors[0].pass, "headings");
        assert_eq!(record.pass_errors[1].pass, "login_form");
    }

    #[test]
    fn test_json_shape() {
        let mut headings = BTreeMap::new();
        headings.insert("h1".to_string(), 1);
        let mut builder = RecordBuilder::new("https://example.com", fixed_time());
        builder
            .apply(PassOutput::HtmlVersion("HTML5 (implied)".to_string()))
            .apply(PassOutput::Title("Example Domain".to_string()))
            .apply(PassOutput::Headings(headings));
        let record = builder.finish(Duration::from_millis(150));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["html_version"], "HTML5 (implied)");
        assert_eq!(json["page_title"], "Example Domain");
        assert_eq!(json["headings"]["h1"], 1);
        assert_eq!(json["internal_links"], 0);
        assert_eq!(json["external_links"], 0);
        assert_eq!(json["inaccessible_links"], 0);
        assert_eq!(json["has_login_form"], false);
        assert_eq!(json["analyzed_at"], "2024-05-01T12:30:00Z");
        assert_eq!(json["processing_time"], "150ms");
        assert!(json.get("pass_errors").is_none());
    }

    #[test]
    fn test_json_includes_pass_errors_when_present() {
        let mut builder = RecordBuilder::new("https://example.com", fixed_time());
        builder.fail("links", "task failed: bad");
        let json = serde_json::to_value(builder.finish(Duration::ZERO)).unwrap();
        assert_eq!(json["pass_errors"][0]["pass"], "links");
        assert_eq!(json["pass_errors"][0]["error"], "task failed: bad");
    }
}
