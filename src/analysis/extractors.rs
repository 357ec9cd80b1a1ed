//! Extraction passes
//!
//! Each record field is produced by one `Extractor`. The service schedules one
//! task per registered extractor, so a new field only needs a new pass here.

use super::fields::{heading_histogram, html_version, page_title};
use super::links::{count_links, LinkClassifier, LinkCounts, SpecialSchemePolicy};
use super::login::has_login_form;
use super::record::RecordBuilder;
use crate::document::Document;
use crate::pool::{run_guarded, TaskError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use url::Url;

/// Output of one extraction pass
#[derive(Debug, Clone, PartialEq)]
pub enum PassOutput {
    HtmlVersion(String),
    Title(String),
    Headings(BTreeMap<String, usize>),
    Links(LinkCounts),
    LoginForm(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("extraction failed: {0}")]
    Failed(String),

    #[error("an extractor named '{0}' is already registered")]
    Duplicate(String),
}

/// One independent, read-only pass over a parsed document
pub trait Extractor: Send + Sync {
    /// Stable pass name, also used as the task name
    fn name(&self) -> &'static str;

    fn extract(&self, doc: &Document, page: &Url) -> Result<PassOutput, ExtractError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlVersionExtractor;

impl Extractor for HtmlVersionExtractor {
    fn name(&self) -> &'static str {
        "html_version"
    }

    fn extract(&self, doc: &Document, _page: &Url) -> Result<PassOutput, ExtractError> {
        Ok(PassOutput::HtmlVersion(html_version(doc)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TitleExtractor;

impl Extractor for TitleExtractor {
    fn name(&self) -> &'static str {
        "page_title"
    }

    fn extract(&self, doc: &Document, _page: &Url) -> Result<PassOutput, ExtractError> {
        Ok(PassOutput::Title(page_title(doc)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingsExtractor;

impl Extractor for HeadingsExtractor {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn extract(&self, doc: &Document, _page: &Url) -> Result<PassOutput, ExtractError> {
        Ok(PassOutput::Headings(heading_histogram(doc)))
    }
}

/// Classifies anchors against the page URL
#[derive(Debug, Clone, Copy, Default)]
pub struct LinksExtractor {
    policy: SpecialSchemePolicy,
}

impl LinksExtractor {
    pub fn new(policy: SpecialSchemePolicy) -> Self {
        Self { policy }
    }
}

impl Extractor for LinksExtractor {
    fn name(&self) -> &'static str {
        "links"
    }

    fn extract(&self, doc: &Document, page: &Url) -> Result<PassOutput, ExtractError> {
        let classifier = LinkClassifier::new(page.clone(), self.policy);
        Ok(PassOutput::Links(count_links(doc, &classifier)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoginFormExtractor;

impl Extractor for LoginFormExtractor {
    fn name(&self) -> &'static str {
        "login_form"
    }

    fn extract(&self, doc: &Document, _page: &Url) -> Result<PassOutput, ExtractError> {
        Ok(PassOutput::LoginForm(has_login_form(doc)))
    }
}

/// Runs a single pass, turning both errors and panics into `TaskError`
///
/// Every runner calls this, so pooled and sequential runs agree on outcomes.
pub fn run_pass(extractor: &dyn Extractor, doc: &Document, page: &Url) -> Result<PassOutput, TaskError> {
    let started = Instant::now();
    let outcome = run_guarded(|| {
        extractor
            .extract(doc, page)
            .map_err(|e| TaskError::Failed(e.to_string()))
    });
    tracing::debug!("Pass '{}' took {:?}", extractor.name(), started.elapsed());
    outcome
}

/// The set of passes run against every document
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Creates a registry with no passes
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Creates a registry holding the five standard passes
    ///
    /// # Arguments
    ///
    /// * `policy` - How the links pass counts `mailto:` and `tel:` anchors
    pub fn with_default_passes(policy: SpecialSchemePolicy) -> Self {
        let mut registry = Self::empty();
        let passes: [Arc<dyn Extractor>; 5] = [
            Arc::new(HtmlVersionExtractor),
            Arc::new(TitleExtractor),
            Arc::new(HeadingsExtractor),
            Arc::new(LinksExtractor::new(policy)),
            Arc::new(LoginFormExtractor),
        ];
        registry.extractors.extend(passes);
        registry
    }

    /// Adds a pass
    ///
    /// # Returns
    ///
    /// * `Err(ExtractError::Duplicate)` - A pass with the same name exists
    pub fn register(&mut self, extractor: Arc<dyn Extractor>) -> Result<(), ExtractError> {
        if self.extractors.iter().any(|e| e.name() == extractor.name()) {
            return Err(ExtractError::Duplicate(extractor.name().to_string()));
        }
        self.extractors.push(extractor);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Extractor>> {
        self.extractors.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Runs every pass in order on the calling thread
    ///
    /// Produces the same field values as the concurrent path, minus timing.
    pub fn run_sequential(&self, doc: &Document, page: &Url, builder: &mut RecordBuilder) {
        for extractor in &self.extractors {
            builder.merge(extractor.name(), run_pass(extractor.as_ref(), doc, page));
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_default_passes(SpecialSchemePolicy::default())
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("passes", &self.names())
            .finish()
    }
}
