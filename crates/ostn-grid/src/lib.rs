//! OSTN02/OSGM02 correction grid for ETRS89 → OSGB36 transformations.
//!
//! Ordnance Survey publishes the ETRS89 to OSGB36 datum shift and the
//! OSGM02 geoid as a grid of corrections on a regular 1 km lattice. This
//! crate loads that grid and applies it to National Grid coordinates by
//! bilinear interpolation between the four nodes around each point.
//!
//! # Architecture
//!
//! ```text
//! SourceCoordinate (ETRS89 E, N, h)
//!      │
//!      ▼
//! OstnTransformer::transform
//!      │
//!      ├─► GridGeometry::locate: cell indices, fractions, corner ids
//!      │
//!      ├─► RecordSource::records: SW, SE, NE, NW corner records
//!      │         │
//!      │         ├─► DenseGrid: array indexed by node id (default)
//!      │         │
//!      │         └─► ScanSource: sequential scan behind an LRU cache
//!      │
//!      └─► bilinear_correct: interpolated shifts, SW corner datum
//!               │
//!               ▼
//!          TargetCoordinate (OSGB36 E, N, ODN height, datum)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ostn_grid::{DenseGrid, OstnTransformer, SourceCoordinate};
//!
//! let grid = DenseGrid::from_path("OSTN02_OSGM02_GB.txt")?;
//! let transformer = OstnTransformer::new(grid);
//!
//! let target = transformer.transform(SourceCoordinate::new(651307.003, 313255.686, 108.05))?;
//! println!("{} {} {}", target.easting, target.northing, target.orthometric_height);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod geometry;
pub mod interpolation;
pub mod record;
pub mod shared;
pub mod source;
pub mod transform;

// Re-export commonly used types at crate root
pub use cache::{CacheStats, RecordCache};
pub use config::{OstnConfig, ResolverStrategy};
pub use error::{Result, TransformError};
pub use geometry::{node_id, node_indices, GridCell, GridGeometry, CELL_SIZE, ROW_WIDTH};
pub use interpolation::{bilinear_correct, bilinear_weights, Correction};
pub use record::GridNodeRecord;
pub use shared::SharedGrid;
pub use source::{DenseGrid, ReaderFactory, RecordSource, ScanSource};
pub use transform::OstnTransformer;

pub use ostn_common::{GeodeticCoordinate, SourceCoordinate, TargetCoordinate, VerticalDatum};
