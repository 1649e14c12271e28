//! Record sources: where grid node records come from.
//!
//! The transformer only needs to read records by node id and to know the
//! extent of the grid. Two implementations are provided:
//!
//! - [`DenseGrid`]: the whole dataset parsed once into an array indexed by
//!   `node_id - 1`. O(1) lookups, no locking. This is the default.
//! - [`ScanSource`]: scans the dataset sequentially for every lookup, with
//!   an LRU cache in front. Useful when the dataset cannot be held in memory.

mod dense;
mod scan;

pub use dense::DenseGrid;
pub use scan::{ReaderFactory, ScanSource};

use std::sync::Arc;

use crate::error::Result;
use crate::record::GridNodeRecord;

/// Read access to grid node records by id.
pub trait RecordSource: Send + Sync {
    /// Record for a single node.
    ///
    /// Fails with `RecordNotFound` when the node has no record.
    fn record(&self, node_id: u32) -> Result<GridNodeRecord>;

    /// Highest node id the dataset covers.
    fn max_node_id(&self) -> u32;

    /// Records for the corners of a cell, in the order of `ids`.
    fn records(&self, ids: &[u32; 4]) -> Result<[GridNodeRecord; 4]> {
        Ok([
            self.record(ids[0])?,
            self.record(ids[1])?,
            self.record(ids[2])?,
            self.record(ids[3])?,
        ])
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn record(&self, node_id: u32) -> Result<GridNodeRecord> {
        (**self).record(node_id)
    }

    fn max_node_id(&self) -> u32 {
        (**self).max_node_id()
    }

    fn records(&self, ids: &[u32; 4]) -> Result<[GridNodeRecord; 4]> {
        (**self).records(ids)
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Arc<S> {
    fn record(&self, node_id: u32) -> Result<GridNodeRecord> {
        (**self).record(node_id)
    }

    fn max_node_id(&self) -> u32 {
        (**self).max_node_id()
    }

    fn records(&self, ids: &[u32; 4]) -> Result<[GridNodeRecord; 4]> {
        (**self).records(ids)
    }
}
