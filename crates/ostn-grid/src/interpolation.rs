//! Bilinear interpolation of node corrections within a grid cell.

use ostn_common::VerticalDatum;
use serde::Serialize;

use crate::record::GridNodeRecord;

/// Interpolated correction at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correction {
    /// Added to the ETRS89 easting (meters)
    pub delta_east: f64,
    /// Added to the ETRS89 northing (meters)
    pub delta_north: f64,
    /// Geoid undulation, subtracted from the ellipsoidal height (meters)
    pub delta_height: f64,
    /// Taken from the SW corner, never interpolated
    pub vertical_datum: VerticalDatum,
}

/// Corner weights in SW, SE, NE, NW order.
pub fn bilinear_weights(t: f64, u: f64) -> [f64; 4] {
    [
        (1.0 - t) * (1.0 - u),
        t * (1.0 - u),
        t * u,
        (1.0 - t) * u,
    ]
}

/// Interpolate the corrections of four corner records.
///
/// `corners` must be ordered SW, SE, NE, NW and `t`, `u` are the fractional
/// position inside the cell. Each field is summed in corner order so the
/// result is bit-for-bit reproducible, and evaluating a point on a shared
/// edge from either neighbouring cell gives the same value.
pub fn bilinear_correct(corners: &[GridNodeRecord; 4], t: f64, u: f64) -> Correction {
    let w = bilinear_weights(t, u);

    Correction {
        delta_east: blend(&w, corners, |r| r.shift_east),
        delta_north: blend(&w, corners, |r| r.shift_north),
        delta_height: blend(&w, corners, |r| r.geoid_undulation),
        vertical_datum: corners[0].vertical_datum,
    }
}

fn blend<F>(w: &[f64; 4], corners: &[GridNodeRecord; 4], field: F) -> f64
where
    F: Fn(&GridNodeRecord) -> f64,
{
    w[0] * field(&corners[0])
        + w[1] * field(&corners[1])
        + w[2] * field(&corners[2])
        + w[3] * field(&corners[3])
}
