//! Dense in-memory correction grid.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use super::RecordSource;
use crate::error::{Result, TransformError};
use crate::geometry::{node_indices, MAX_NODE_ID};
use crate::record::{DatasetLines, GridNodeRecord};

/// Correction grid parsed once into an array indexed by `node_id - 1`.
///
/// Ids missing from the dataset are kept as holes and resolve to
/// `RecordNotFound`. The grid is never modified after loading, so it can
/// be shared between threads without locking.
#[derive(Debug, Clone)]
pub struct DenseGrid {
    records: Vec<Option<GridNodeRecord>>,
    count: usize,
}

impl DenseGrid {
    /// Load the dataset from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            TransformError::Io(format!("failed to open {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Loading OSTN correction grid");
        Self::from_reader(BufReader::new(file))
    }

    /// Parse a whole dataset from a reader.
    ///
    /// Fails on the first malformed line or duplicated node id.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let start = Instant::now();
        let mut grid = Self {
            records: Vec::new(),
            count: 0,
        };

        for line in DatasetLines::new(reader) {
            let (line_number, line) = line?;
            let record = GridNodeRecord::parse(&line, line_number)?;
            grid.insert(record, line_number)?;
        }

        grid.records.shrink_to_fit();
        info!(
            records = grid.count,
            max_node_id = grid.max_node_id(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded OSTN correction grid"
        );
        Ok(grid)
    }

    /// Build a grid from already parsed records.
    pub fn from_records(records: impl IntoIterator<Item = GridNodeRecord>) -> Result<Self> {
        let mut grid = Self {
            records: Vec::new(),
            count: 0,
        };
        for (i, record) in records.into_iter().enumerate() {
            grid.insert(record, i + 1)?;
        }
        Ok(grid)
    }

    fn insert(&mut self, record: GridNodeRecord, line_number: usize) -> Result<()> {
        if record.node_id == 0 || record.node_id > MAX_NODE_ID {
            return Err(TransformError::malformed(
                line_number,
                format!("node id {} is outside 1..={}", record.node_id, MAX_NODE_ID),
            ));
        }
        let index = (record.node_id - 1) as usize;
        if index >= self.records.len() {
            self.records.resize(index + 1, None);
        }

        let slot = &mut self.records[index];
        if slot.is_some() {
            return Err(TransformError::malformed(
                line_number,
                format!("duplicate node id {}", record.node_id),
            ));
        }
        *slot = Some(record);
        self.count += 1;
        Ok(())
    }

    /// Number of records present.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the grid holds no records.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether every id up to the maximum has a record.
    pub fn is_complete(&self) -> bool {
        self.count == self.records.len()
    }
}

impl RecordSource for DenseGrid {
    fn record(&self, node_id: u32) -> Result<GridNodeRecord> {
        let record = node_id
            .checked_sub(1)
            .and_then(|index| self.records.get(index as usize))
            .copied()
            .flatten();

        match record {
            Some(record) => Ok(record),
            None => {
                debug!(node_id, indices = ?node_indices(node_id), "No correction record");
                Err(TransformError::RecordNotFound(node_id))
            }
        }
    }

    fn max_node_id(&self) -> u32 {
        self.records.len() as u32
    }
}
