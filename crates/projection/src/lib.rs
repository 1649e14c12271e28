//! Ellipsoid and map projection maths for the British National Grid.
//!
//! Implements the Ordnance Survey Transverse Mercator formulae from scratch
//! without external dependencies.

pub mod ellipsoid;
pub mod transverse_mercator;

pub use ellipsoid::Ellipsoid;
pub use transverse_mercator::{dms_to_decimal, ProjectionError, TransverseMercator};
