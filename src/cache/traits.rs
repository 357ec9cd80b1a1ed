//! Cache trait

use crate::analysis::AnalysisRecord;

/// Store of completed analysis records keyed by submitted URL
///
/// Implementations must be safe to share between concurrent requests.
pub trait ResultCache: Send + Sync {
    /// Returns a copy of the record cached for `url`, if any
    fn get(&self, url: &str) -> Option<AnalysisRecord>;

    /// Stores `record` under `url`, replacing any previous entry
    fn set(&self, url: &str, record: AnalysisRecord);

    /// Number of cached records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
