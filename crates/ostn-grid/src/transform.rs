//! ETRS89 → OSGB36/ODN transformation.
//!
//! Locates the 1 km cell around a point, fetches its four corner records,
//! interpolates their corrections and applies them:
//!
//! ```text
//! easting            = etrs_easting  + delta_east
//! northing           = etrs_northing + delta_north
//! orthometric_height = ellipsoidal_height - delta_height
//! ```

use ostn_common::{GeodeticCoordinate, SourceCoordinate, TargetCoordinate};
use projection::TransverseMercator;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{GridCell, GridGeometry};
use crate::interpolation::{bilinear_correct, Correction};
use crate::source::RecordSource;

/// Applies OSTN grid corrections read from a [`RecordSource`].
///
/// Holds no mutable state: every result depends only on the input and the
/// dataset behind the source.
pub struct OstnTransformer<S> {
    source: S,
    geometry: GridGeometry,
    projection: TransverseMercator,
}

impl<S: RecordSource> OstnTransformer<S> {
    /// Create a transformer over a record source.
    ///
    /// The grid extent is fixed to the source's highest node id.
    pub fn new(source: S) -> Self {
        let geometry = GridGeometry::new(source.max_node_id());
        debug!(
            max_node_id = geometry.max_node_id(),
            rows = geometry.rows(),
            "Created OSTN transformer"
        );
        Self {
            source,
            geometry,
            projection: TransverseMercator::british_national_grid(),
        }
    }

    /// The underlying record source.
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Cell containing an ETRS89 easting/northing.
    pub fn locate(&self, easting: f64, northing: f64) -> Result<GridCell> {
        self.geometry.locate(easting, northing)
    }

    /// Interpolated correction for a point already placed in a cell.
    pub fn correction_in_cell(&self, cell: &GridCell) -> Result<Correction> {
        let corners = self.source.records(&cell.corners)?;
        let correction = bilinear_correct(&corners, cell.t, cell.u);
        trace!(
            east_index = cell.east_index,
            north_index = cell.north_index,
            t = cell.t,
            u = cell.u,
            delta_east = correction.delta_east,
            delta_north = correction.delta_north,
            delta_height = correction.delta_height,
            "Interpolated OSTN correction"
        );
        Ok(correction)
    }

    /// Interpolated correction at an ETRS89 easting/northing, without applying it.
    pub fn correction_at(&self, easting: f64, northing: f64) -> Result<Correction> {
        let cell = self.locate(easting, northing)?;
        self.correction_in_cell(&cell)
    }

    /// Transform a projected ETRS89 coordinate to OSGB36 with an ODN height.
    pub fn transform(&self, source: SourceCoordinate) -> Result<TargetCoordinate> {
        let correction = self.correction_at(source.easting, source.northing)?;
        Ok(TargetCoordinate {
            easting: source.easting + correction.delta_east,
            northing: source.northing + correction.delta_north,
            orthometric_height: source.ellipsoidal_height - correction.delta_height,
            vertical_datum: correction.vertical_datum,
        })
    }

    /// Project an ETRS89 latitude/longitude onto the National Grid and transform it.
    pub fn transform_geodetic(&self, coord: GeodeticCoordinate) -> Result<TargetCoordinate> {
        let (easting, northing) = self
            .projection
            .geo_to_grid(coord.latitude, coord.longitude)?;
        debug!(
            latitude = coord.latitude,
            longitude = coord.longitude,
            easting,
            northing,
            "Projected ETRS89 coordinate"
        );
        self.transform(SourceCoordinate::new(
            easting,
            northing,
            coord.ellipsoidal_height,
        ))
    }

    /// Transform many coordinates in parallel.
    ///
    /// Results are in input order and fail independently.
    pub fn transform_batch(&self, coords: &[SourceCoordinate]) -> Vec<Result<TargetCoordinate>> {
        let results: Vec<Result<TargetCoordinate>> =
            coords.par_iter().map(|c| self.transform(*c)).collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        debug!(
            count = coords.len(),
            failed,
            threads = rayon::current_num_threads(),
            "Transformed coordinate batch"
        );
        results
    }
}

impl<S: RecordSource + std::fmt::Debug> std::fmt::Debug for OstnTransformer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OstnTransformer")
            .field("source", &self.source)
            .field("geometry", &self.geometry)
            .finish()
    }
}
