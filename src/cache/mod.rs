//! Result cache module
//!
//! Completed analysis records are cached by the exact URL string that was
//! submitted. A hit is returned unchanged, `analyzed_at` included.

mod memory;
mod traits;

pub use memory::{BoundedCache, MemoryCache, NoopCache};
pub use traits::ResultCache;

use crate::config::CacheConfig;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Builds the cache selected by configuration
///
/// A capacity of 0 selects the unbounded `MemoryCache`; anything else a
/// `BoundedCache` of that size.
pub fn build_cache(config: &CacheConfig) -> Arc<dyn ResultCache> {
    match NonZeroUsize::new(config.capacity) {
        Some(capacity) => Arc::new(BoundedCache::new(capacity)),
        None => Arc::new(MemoryCache::new()),
    }
}
