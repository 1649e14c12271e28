//! Cache implementations for record resolution.

mod record_cache;

pub use record_cache::{CacheStats, RecordCache};
