//! Reference coordinates published by Ordnance Survey.

use crate::generators::NodeShift;

/// Caister water tower, the worked example of the OSTN transformation guide.
pub mod caister {
    use super::NodeShift;

    /// ETRS89 latitude as (degrees, minutes, seconds), north
    pub const ETRS89_LAT_DMS: (f64, f64, f64) = (52.0, 39.0, 28.8282);

    /// ETRS89 longitude as (degrees, minutes, seconds), east
    pub const ETRS89_LON_DMS: (f64, f64, f64) = (1.0, 42.0, 57.8663);

    /// ETRS89 height above the GRS80 ellipsoid
    pub const ETRS89_HEIGHT: f64 = 108.05;

    /// ETRS89 position projected onto the National Grid (GRS80)
    pub const ETRS89_EASTING: f64 = 651307.003;
    pub const ETRS89_NORTHING: f64 = 313255.686;

    /// Published OSGB36 National Grid coordinates
    pub const OSGB36_EASTING: f64 = 651409.804;
    pub const OSGB36_NORTHING: f64 = 313177.450;

    /// Grid indices of the enclosing 1 km cell
    pub const CELL: (u32, u32) = (651, 313);

    /// Corner node ids of the enclosing cell, ordered SW, SE, NE, NW
    pub const CORNER_IDS: [u32; 4] = [220065, 220066, 220767, 220766];

    /// Corner records of the enclosing cell, ordered SW, SE, NE, NW.
    ///
    /// Every corner differs, so any other corner order or a transposed
    /// `t`/`u` moves the interpolated position by at least 3 mm. Interpolated
    /// at the Caister position they reproduce the published OSGB36
    /// coordinates to well under a millimetre.
    pub const CORNERS: [NodeShift; 4] = [
        (102.775, -78.244, 44.252, 1),
        (102.850, -78.205, 44.212, 1),
        (102.850, -78.262, 44.236, 1),
        (102.790, -78.241, 44.228, 1),
    ];

    /// ODN height obtained by interpolating the geoid of [`CORNERS`]
    pub const ODN_HEIGHT: f64 = 63.813;

    /// Shift for a node around the Caister cell.
    ///
    /// The four corners carry [`CORNERS`]; every other node repeats the SW
    /// corner so neighbouring cells stay plausible.
    pub fn corner_shift(east_index: u32, north_index: u32) -> NodeShift {
        let (e, n) = CELL;
        match (east_index.wrapping_sub(e), north_index.wrapping_sub(n)) {
            (1, 0) => CORNERS[1],
            (1, 1) => CORNERS[2],
            (0, 1) => CORNERS[3],
            _ => CORNERS[0],
        }
    }
}

/// Annex C worked example of the OS coordinate systems guide (Airy 1830).
pub mod airy_projection {
    pub const LAT_DMS: (f64, f64, f64) = (52.0, 39.0, 27.2531);
    pub const LON_DMS: (f64, f64, f64) = (1.0, 43.0, 4.5177);
    pub const EASTING: f64 = 651409.903;
    pub const NORTHING: f64 = 313177.270;
}

/// Grid extents of the OSTN02 dataset.
pub mod extent {
    /// Number of node rows in the full dataset
    pub const ROWS: u32 = 1251;

    /// Highest node id in the full dataset
    pub const MAX_NODE_ID: u32 = 701 * ROWS;
}
