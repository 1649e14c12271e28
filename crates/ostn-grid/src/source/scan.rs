//! Streaming record source.
//!
//! Reads the dataset front to back on every lookup until all requested
//! records are found. Each lookup opens its own reader, so concurrent
//! callers never share a stream. Resolved records are kept in an LRU cache.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, info, trace, warn};

use super::RecordSource;
use crate::cache::{CacheStats, RecordCache};
use crate::error::{Result, TransformError};
use crate::geometry::MAX_NODE_ID;
use crate::record::{leading_node_id, DatasetLines, GridNodeRecord};

/// Opens a fresh reader over the dataset.
pub type ReaderFactory =
    Box<dyn Fn() -> std::io::Result<Box<dyn BufRead + Send>> + Send + Sync>;

/// Record source that scans the dataset for every cache miss.
pub struct ScanSource {
    open: ReaderFactory,
    max_node_id: u32,
    cache: Mutex<RecordCache>,
    malformed: AtomicUsize,
    suspect_threshold: usize,
}

impl ScanSource {
    /// Create a scanning source.
    ///
    /// The dataset is read once up front to validate every line and find
    /// the grid extent.
    ///
    /// # Arguments
    /// * `open` - Opens a new reader over the dataset
    /// * `cache_size` - Number of records kept in the LRU cache
    /// * `suspect_threshold` - Malformed lookups before the dataset is reported as suspect
    pub fn new<F>(open: F, cache_size: usize, suspect_threshold: usize) -> Result<Self>
    where
        F: Fn() -> std::io::Result<Box<dyn BufRead + Send>> + Send + Sync + 'static,
    {
        let capacity = NonZeroUsize::new(cache_size)
            .ok_or_else(|| TransformError::config("scan cache size must be > 0"))?;
        if suspect_threshold == 0 {
            return Err(TransformError::config("suspect threshold must be > 0"));
        }

        let mut source = Self {
            open: Box::new(open),
            max_node_id: 0,
            cache: Mutex::new(RecordCache::new(capacity)),
            malformed: AtomicUsize::new(0),
            suspect_threshold,
        };
        source.max_node_id = source.scan_extent()?;
        Ok(source)
    }

    /// Create a scanning source over a dataset file.
    pub fn from_path(
        path: impl Into<PathBuf>,
        cache_size: usize,
        suspect_threshold: usize,
    ) -> Result<Self> {
        let path = path.into();
        info!(path = %path.display(), "Opening OSTN correction grid for scanning");
        Self::new(
            move || {
                let file = File::open(&path)?;
                Ok(Box::new(BufReader::new(file)) as Box<dyn BufRead + Send>)
            },
            cache_size,
            suspect_threshold,
        )
    }

    /// Number of lookups that failed on a malformed record.
    pub fn malformed_count(&self) -> usize {
        self.malformed.load(Ordering::Relaxed)
    }

    /// Whether malformed records have been seen often enough to distrust the dataset.
    pub fn is_suspect(&self) -> bool {
        self.malformed_count() >= self.suspect_threshold
    }

    /// Get cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    fn lock_cache(&self) -> MutexGuard<'_, RecordCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate the whole dataset and return its highest node id.
    fn scan_extent(&self) -> Result<u32> {
        let start = Instant::now();
        let reader = (self.open)()?;
        let mut max_node_id = 0;
        let mut count = 0usize;
        let mut seen: Vec<bool> = Vec::new();

        for line in DatasetLines::new(reader) {
            let (line_number, line) = line?;
            let record = GridNodeRecord::parse(&line, line_number)?;
            if record.node_id > MAX_NODE_ID {
                return Err(TransformError::malformed(
                    line_number,
                    format!("node id {} is outside 1..={}", record.node_id, MAX_NODE_ID),
                ));
            }

            let index = record.node_id as usize;
            if index >= seen.len() {
                seen.resize(index + 1, false);
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(TransformError::malformed(
                    line_number,
                    format!("duplicate node id {}", record.node_id),
                ));
            }

            max_node_id = max_node_id.max(record.node_id);
            count += 1;
        }

        info!(
            records = count,
            max_node_id,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Validated OSTN correction grid"
        );
        Ok(max_node_id)
    }

    /// Scan the dataset for a sorted, deduplicated set of ids.
    fn scan(&self, wanted: &[u32]) -> Result<Vec<GridNodeRecord>> {
        let start = Instant::now();
        let reader = (self.open)()?;
        let mut found: Vec<GridNodeRecord> = Vec::with_capacity(wanted.len());

        for line in DatasetLines::new(reader) {
            let (line_number, line) = line?;
            let node_id = leading_node_id(&line, line_number)?;
            if wanted.binary_search(&node_id).is_err() || found.iter().any(|r| r.node_id == node_id)
            {
                continue;
            }

            found.push(GridNodeRecord::parse(&line, line_number)?);
            if found.len() == wanted.len() {
                break;
            }
        }

        trace!(
            wanted = ?wanted,
            found = found.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Scanned OSTN dataset"
        );
        Ok(found)
    }

    /// Count malformed-record failures and flag the dataset once they recur.
    fn track<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(TransformError::MalformedRecord { line, reason }) = &result {
            let count = self.malformed.fetch_add(1, Ordering::Relaxed) + 1;
            if count >= self.suspect_threshold {
                warn!(
                    count,
                    line,
                    reason = %reason,
                    "OSTN dataset is suspect: repeated malformed records"
                );
            } else {
                debug!(count, line, reason = %reason, "Malformed OSTN record");
            }
        }
        result
    }

    /// Resolve ids in order, serving what it can from the cache.
    fn resolve(&self, ids: &[u32]) -> Result<Vec<GridNodeRecord>> {
        let mut resolved: Vec<Option<GridNodeRecord>> = {
            let mut cache = self.lock_cache();
            ids.iter().map(|&id| cache.get(id)).collect()
        };

        let mut missing: Vec<u32> = ids
            .iter()
            .zip(&resolved)
            .filter(|(_, record)| record.is_none())
            .map(|(&id, _)| id)
            .collect();
        missing.sort_unstable();
        missing.dedup();

        if !missing.is_empty() {
            let found = self.track(self.scan(&missing))?;

            let mut cache = self.lock_cache();
            for record in &found {
                cache.insert(*record);
            }
            drop(cache);

            for (slot, &id) in resolved.iter_mut().zip(ids) {
                if slot.is_none() {
                    *slot = found.iter().find(|r| r.node_id == id).copied();
                }
            }
        }

        resolved
            .into_iter()
            .zip(ids)
            .map(|(record, &id)| record.ok_or(TransformError::RecordNotFound(id)))
            .collect()
    }
}

impl RecordSource for ScanSource {
    fn record(&self, node_id: u32) -> Result<GridNodeRecord> {
        let mut records = self.resolve(&[node_id])?;
        records
            .pop()
            .ok_or(TransformError::RecordNotFound(node_id))
    }

    fn max_node_id(&self) -> u32 {
        self.max_node_id
    }

    fn records(&self, ids: &[u32; 4]) -> Result<[GridNodeRecord; 4]> {
        let records = self.resolve(ids)?;
        Ok([records[0], records[1], records[2], records[3]])
    }
}

impl std::fmt::Debug for ScanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSource")
            .field("max_node_id", &self.max_node_id)
            .field("malformed", &self.malformed_count())
            .field("suspect_threshold", &self.suspect_threshold)
            .finish_non_exhaustive()
    }
}
