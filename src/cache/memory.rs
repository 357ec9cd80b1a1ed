//! In-process cache implementations

use super::ResultCache;
use crate::analysis::AnalysisRecord;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Unbounded cache; entries live as long as the process
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, AnalysisRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultCache for MemoryCache {
    fn get(&self, url: &str) -> Option<AnalysisRecord> {
        self.entries.lock().get(url).cloned()
    }

    fn set(&self, url: &str, record: AnalysisRecord) {
        self.entries.lock().insert(url.to_string(), record);
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Holds at most `capacity` records, evicting the least recently used
#[derive(Debug)]
pub struct BoundedCache {
    entries: Mutex<LruCache<String, AnalysisRecord>>,
}

impl BoundedCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

impl ResultCache for BoundedCache {
    fn get(&self, url: &str) -> Option<AnalysisRecord> {
        // A hit refreshes recency, so this needs the write side too
        self.entries.lock().get(url).cloned()
    }

    fn set(&self, url: &str, record: AnalysisRecord) {
        if let Some((evicted, _)) = self.entries.lock().push(url.to_string(), record) {
            if evicted != url {
                tracing::debug!("Evicted cached analysis for {}", evicted);
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Never stores anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl ResultCache for NoopCache {
    fn get(&self, _url: &str) -> Option<AnalysisRecord> {
        None
    }

    fn set(&self, _url: &str, _record: AnalysisRecord) {}

    fn len(&self) -> usize {
        0
    }
}
