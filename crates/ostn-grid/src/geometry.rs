//! Geometry of the OSTN correction grid and the cell indexer.
//!
//! Nodes sit on a regular 1 km lattice anchored at the National Grid false
//! origin. Node ids are dense and 1-based, numbered row by row from the
//! south-west corner:
//!
//! ```text
//! node_id = east_index + north_index * ROW_WIDTH + 1
//! ```

use crate::error::{Result, TransformError};

/// Node spacing in meters (both axes).
pub const CELL_SIZE: f64 = 1000.0;

/// Number of nodes in one grid row.
pub const ROW_WIDTH: u32 = 701;

/// Highest node id a dataset may carry. The published grids have 1251 rows.
pub const MAX_NODE_ID: u32 = ROW_WIDTH * 2048;

/// Node id for a pair of grid indices.
pub fn node_id(east_index: u32, north_index: u32) -> u32 {
    east_index + north_index * ROW_WIDTH + 1
}

/// Grid indices `(east_index, north_index)` for a node id.
///
/// Returns `None` for id 0, which no node carries.
pub fn node_indices(node_id: u32) -> Option<(u32, u32)> {
    let zero_based = node_id.checked_sub(1)?;
    Some((zero_based % ROW_WIDTH, zero_based / ROW_WIDTH))
}

/// A located 1 km cell and the position of a point inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub east_index: u32,
    pub north_index: u32,
    /// Fractional easting within the cell
    pub t: f64,
    /// Fractional northing within the cell
    pub u: f64,
    /// Corner node ids ordered SW, SE, NE, NW
    pub corners: [u32; 4],
}

/// Extent of a loaded correction grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    max_node_id: u32,
}

impl GridGeometry {
    /// Geometry of a grid whose highest node id is `max_node_id`.
    pub fn new(max_node_id: u32) -> Self {
        Self { max_node_id }
    }

    /// Highest node id in the grid.
    pub fn max_node_id(&self) -> u32 {
        self.max_node_id
    }

    /// Number of node rows, counting a partially filled last row.
    pub fn rows(&self) -> u32 {
        self.max_node_id.div_ceil(ROW_WIDTH)
    }

    /// Whether the node at these indices lies within the grid extent.
    pub fn contains_node(&self, east_index: u32, north_index: u32) -> bool {
        east_index < ROW_WIDTH
            && north_index < self.rows()
            && node_id(east_index, north_index) <= self.max_node_id
    }

    /// Find the cell containing a point.
    ///
    /// The fractions are in `[0, 1)`: a point on a grid line belongs to the
    /// cell to its north and east.
    pub fn locate(&self, easting: f64, northing: f64) -> Result<GridCell> {
        if !easting.is_finite() || !northing.is_finite() {
            return Err(TransformError::out_of_range(
                easting,
                northing,
                "coordinate is not finite",
            ));
        }
        if easting < 0.0 || northing < 0.0 {
            return Err(TransformError::out_of_range(
                easting,
                northing,
                "coordinate is south or west of the grid origin",
            ));
        }

        let mut east = (easting / CELL_SIZE).floor();
        let mut north = (northing / CELL_SIZE).floor();

        // The quotient can round up onto the next grid line
        if east * CELL_SIZE > easting {
            east -= 1.0;
        }
        if north * CELL_SIZE > northing {
            north -= 1.0;
        }

        // Compare as floats first so huge inputs cannot overflow the casts
        if east + 1.0 >= ROW_WIDTH as f64 {
            return Err(TransformError::out_of_range(
                easting,
                northing,
                format!("east index {} is beyond the last grid column", east),
            ));
        }
        if north + 1.0 >= self.rows() as f64 {
            return Err(TransformError::out_of_range(
                easting,
                northing,
                format!("north index {} is beyond the last grid row", north),
            ));
        }

        self.cell_at(east as u32, north as u32, easting, northing)
    }

    /// Position of a point relative to a given cell.
    ///
    /// Unlike [`locate`](Self::locate) the point may sit on any edge of the
    /// cell, so the fractions are in `[0, 1]`. Used to evaluate a shared edge
    /// from both neighbouring cells.
    pub fn cell_at(
        &self,
        east_index: u32,
        north_index: u32,
        easting: f64,
        northing: f64,
    ) -> Result<GridCell> {
        if !self.contains_node(east_index, north_index)
            || !self.contains_node(east_index.saturating_add(1), north_index.saturating_add(1))
        {
            return Err(TransformError::out_of_range(
                easting,
                northing,
                format!(
                    "cell ({}, {}) is outside the grid extent of {} nodes",
                    east_index, north_index, self.max_node_id
                ),
            ));
        }

        let x0 = east_index as f64 * CELL_SIZE;
        let y0 = north_index as f64 * CELL_SIZE;
        let t = (easting - x0) / CELL_SIZE;
        let u = (northing - y0) / CELL_SIZE;

        if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
            return Err(TransformError::out_of_range(
                easting,
                northing,
                format!("point is not inside cell ({}, {})", east_index, north_index),
            ));
        }

        Ok(GridCell {
            east_index,
            north_index,
            t,
            u,
            corners: [
                node_id(east_index, north_index),
                node_id(east_index + 1, north_index),
                node_id(east_index + 1, north_index + 1),
                node_id(east_index, north_index + 1),
            ],
        })
    }
}
