//! Analysis service
//!
//! This module ties the collaborators together for one request:
//! - Cache lookup by exact URL, short-circuiting everything else on a hit
//! - Fetching and HTTP status checks
//! - Parsing into a shared, immutable document
//! - One pool task per extraction pass, merged into a single record
//! - Caching complete records

mod phase;

pub use phase::{AnalysisPhase, PhaseTracker};

use crate::analysis::{run_pass, AnalysisRecord, ExtractorRegistry, PassOutput, RecordBuilder};
use crate::cache::{build_cache, ResultCache};
use crate::config::Config;
use crate::document::{Document, DocumentParser, HtmlDocumentParser};
use crate::fetch::{status_message, Fetcher, HttpFetcher};
use crate::pool::{PoolError, TaskError, TaskGroup, WorkerPool};
use crate::url::parse_page_url;
use crate::{AnalysisError, AnalyzerError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Status line reported by `AnalysisService::status`
pub const STATUS_READY: &str = "Service is running and ready for parallel webpage analysis";

/// Status code reported when fetched content cannot be parsed
const UNPARSEABLE_CONTENT: u16 = 422;

type PassResults = Vec<(String, Result<PassOutput, TaskError>)>;

/// Analyzes pages end to end
///
/// One service is shared by every request; all collaborators are thread-safe.
pub struct AnalysisService {
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<dyn DocumentParser>,
    cache: Arc<dyn ResultCache>,
    pool: Arc<WorkerPool>,
    registry: Arc<ExtractorRegistry>,
}

impl AnalysisService {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<dyn DocumentParser>,
        cache: Arc<dyn ResultCache>,
        pool: Arc<WorkerPool>,
        registry: ExtractorRegistry,
    ) -> Self {
        Self {
            fetcher,
            parser,
            cache,
            pool,
            registry: Arc::new(registry),
        }
    }

    /// Builds a service with the standard collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - A validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(AnalysisService)` - Ready to analyze
    /// * `Err(AnalyzerError)` - The HTTP client or worker pool could not start
    pub fn from_config(config: &Config) -> Result<Self, AnalyzerError> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Like `from_config`, but with a caller-supplied fetcher
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn Fetcher>) -> Result<Self, AnalyzerError> {
        let pool = WorkerPool::new(config.analysis.workers)?;
        let registry = ExtractorRegistry::with_default_passes(config.analysis.special_scheme_policy);

        Ok(Self::new(
            fetcher,
            Arc::new(HtmlDocumentParser::new()),
            build_cache(&config.cache),
            Arc::new(pool),
            registry,
        ))
    }

    /// Produces the analysis record for `url`
    ///
    /// A cached record is returned unchanged without fetching.
    ///
    /// # Returns
    ///
    /// * `Ok(AnalysisRecord)` - The page was analyzed, or found in the cache
    /// * `Err(AnalyzerError::Analysis)` - Invalid URL, transport failure,
    ///   error status, or unparseable content
    /// * `Err(AnalyzerError)` - Any other variant is an internal fault
    pub async fn analyze(&self, url: &str) -> Result<AnalysisRecord, AnalyzerError> {
        if let Some(record) = self.cache.get(url) {
            tracing::info!("Cache hit for {}", url);
            return Ok(record);
        }

        let started = Instant::now();
        let analyzed_at = Utc::now();
        let mut tracker = PhaseTracker::start(url);

        let page_url = match parse_page_url(url) {
            Ok(page_url) => page_url,
            Err(e) => {
                tracker.fail(&e);
                return Err(self.reject(400, e.to_string(), url));
            }
        };

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracker.fail(&e);
                return Err(self.reject(e.status_code(), e.to_string(), url));
            }
        };

        if !page.is_success() {
            let message = status_message(page.status);
            tracker.fail(&message);
            return Err(self.reject(page.status, message, url));
        }

        tracker.advance(AnalysisPhase::Parsing);
        let parser = Arc::clone(&self.parser);
        let body = page.body;
        let document = match tokio::task::spawn_blocking(move || parser.parse(&body)).await? {
            Ok(document) => Arc::new(document),
            Err(e) => {
                tracker.fail(&e);
                return Err(self.reject(
                    UNPARSEABLE_CONTENT,
                    format!("Failed to parse HTML: {}", e),
                    url,
                ));
            }
        };

        tracker.advance(AnalysisPhase::Dispatching);
        let pool = Arc::clone(&self.pool);
        let registry = Arc::clone(&self.registry);
        let results =
            tokio::task::spawn_blocking(move || run_passes(pool, &registry, document, page_url))
                .await??;

        tracker.advance(AnalysisPhase::Collecting);
        let mut builder = RecordBuilder::new(url, analyzed_at);
        for (pass, outcome) in results {
            builder.merge(&pass, outcome);
        }
        let record = builder.finish(started.elapsed());

        tracker.advance(AnalysisPhase::Caching);
        if record.is_complete() {
            self.cache.set(url, record.clone());
        } else {
            tracing::warn!(
                "Not caching {}: {} pass(es) failed",
                url,
                record.pass_errors.len()
            );
        }

        tracker.advance(AnalysisPhase::Done);
        tracing::info!("Analyzed {} in {:?}", url, record.processing_time);

        Ok(record)
    }

    /// Human-readable readiness line
    pub fn status(&self) -> &'static str {
        STATUS_READY
    }

    pub fn worker_count(&self) -> usize {
        self.pool.size()
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    fn reject(&self, status_code: u16, message: String, url: &str) -> AnalyzerError {
        let err = AnalysisError::new(status_code, message, url);
        tracing::warn!("Analysis failed: {}", err);
        err.into()
    }
}

impl std::fmt::Debug for AnalysisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisService")
            .field("pool", &self.pool)
            .field("registry", &self.registry)
            .field("cached", &self.cache.len())
            .finish()
    }
}

/// Runs every registered pass on the pool and waits for all of them
fn run_passes(
    pool: Arc<WorkerPool>,
    registry: &ExtractorRegistry,
    document: Arc<Document>,
    page_url: Url,
) -> Result<PassResults, PoolError> {
    let page_url = Arc::new(page_url);
    let mut group = TaskGroup::new(pool);

    for extractor in registry.iter() {
        let extractor = Arc::clone(extractor);
        let document = Arc::clone(&document);
        let page_url = Arc::clone(&page_url);
        group.add_task(extractor.name(), move || {
            run_pass(extractor.as_ref(), &document, &page_url)
        })?;
    }

    group.execute_all();
    Ok(group.into_results())
}
