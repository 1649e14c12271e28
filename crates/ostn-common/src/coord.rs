//! Coordinate types passed in and out of the transformation.

use crate::VerticalDatum;
use serde::{Deserialize, Serialize};

/// Position on the ETRS89 (GRS80) ellipsoid in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    /// Height above the GRS80 ellipsoid in metres
    pub ellipsoidal_height: f64,
}

impl GeodeticCoordinate {
    pub fn new(latitude: f64, longitude: f64, ellipsoidal_height: f64) -> Self {
        Self {
            latitude,
            longitude,
            ellipsoidal_height,
        }
    }
}

/// ETRS89 position already projected onto the National Grid plane.
///
/// This is the input of the grid correction. Easting and northing are in
/// metres and must be non-negative to fall on the correction grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceCoordinate {
    pub easting: f64,
    pub northing: f64,
    /// Height above the GRS80 ellipsoid in metres
    pub ellipsoidal_height: f64,
}

impl SourceCoordinate {
    pub fn new(easting: f64, northing: f64, ellipsoidal_height: f64) -> Self {
        Self {
            easting,
            northing,
            ellipsoidal_height,
        }
    }
}

/// OSGB36 National Grid position with an orthometric height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetCoordinate {
    pub easting: f64,
    pub northing: f64,
    /// Height above the local vertical datum in metres
    pub orthometric_height: f64,
    pub vertical_datum: VerticalDatum,
}

impl TargetCoordinate {
    /// Grid reference rounded to the millimetre, as published by OS.
    pub fn rounded_mm(&self) -> (f64, f64, f64) {
        let round = |v: f64| (v * 1000.0).round() / 1000.0;
        (
            round(self.easting),
            round(self.northing),
            round(self.orthometric_height),
        )
    }
}
