//! Common coordinate and datum types shared across the ostn-transform workspace.

pub mod coord;
pub mod datum;

pub use coord::{GeodeticCoordinate, SourceCoordinate, TargetCoordinate};
pub use datum::{DatumCodeError, VerticalDatum};
