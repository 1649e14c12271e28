//! Transverse Mercator projection as defined for the British National Grid.
//!
//! The forward and inverse series follow the Ordnance Survey guide to
//! coordinate systems in Great Britain (annexes C.1 and C.2). The same
//! projection parameters are used for both datums; only the ellipsoid
//! differs:
//! - ETRS89 positions are projected on GRS80 before the OSTN correction
//! - OSGB36 positions are projected on Airy 1830

use std::f64::consts::PI;

use crate::ellipsoid::Ellipsoid;

/// Convergence tolerance of the inverse meridional arc iteration (meters).
const ARC_TOLERANCE: f64 = 0.00001;

/// Iteration cap for the inverse projection.
const MAX_ITERATIONS: usize = 64;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("Coordinate is not finite: ({0}, {1})")]
    NonFinite(f64, f64),

    #[error("Latitude {0} is outside the valid range for a transverse mercator projection")]
    LatitudeOutOfRange(f64),

    #[error("Inverse projection did not converge for ({0}, {1})")]
    NoConvergence(f64, f64),
}

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    pub ellipsoid: Ellipsoid,
    /// Scale factor on the central meridian
    pub f0: f64,
    /// Latitude of true origin in radians
    pub lat0: f64,
    /// Longitude of true origin (central meridian) in radians
    pub lon0: f64,
    /// False easting of true origin (meters)
    pub e0: f64,
    /// False northing of true origin (meters)
    pub n0: f64,
}

impl TransverseMercator {
    /// Create a projection from its defining parameters.
    ///
    /// # Arguments
    /// * `ellipsoid` - Reference ellipsoid
    /// * `f0` - Scale factor on the central meridian
    /// * `lat0_deg` - Latitude of true origin (degrees)
    /// * `lon0_deg` - Longitude of true origin (degrees)
    /// * `e0` - False easting (meters)
    /// * `n0` - False northing (meters)
    pub fn new(ellipsoid: Ellipsoid, f0: f64, lat0_deg: f64, lon0_deg: f64, e0: f64, n0: f64) -> Self {
        Self {
            ellipsoid,
            f0,
            lat0: lat0_deg.to_radians(),
            lon0: lon0_deg.to_radians(),
            e0,
            n0,
        }
    }

    /// National Grid parameters on the given ellipsoid.
    pub fn national_grid(ellipsoid: Ellipsoid) -> Self {
        Self::new(ellipsoid, 0.9996012717, 49.0, -2.0, 400000.0, -100000.0)
    }

    /// National Grid on GRS80, used to project ETRS89 positions before
    /// applying the OSTN grid shifts.
    pub fn british_national_grid() -> Self {
        Self::national_grid(Ellipsoid::GRS80)
    }

    /// National Grid on Airy 1830 (OSGB36 geographic ↔ grid).
    pub fn british_national_grid_airy() -> Self {
        Self::national_grid(Ellipsoid::AIRY_1830)
    }

    /// Convert geographic coordinates (lat/lon in degrees) to grid (easting, northing) in meters.
    pub fn geo_to_grid(&self, lat_deg: f64, lon_deg: f64) -> Result<(f64, f64), ProjectionError> {
        if !lat_deg.is_finite() || !lon_deg.is_finite() {
            return Err(ProjectionError::NonFinite(lat_deg, lon_deg));
        }
        if lat_deg.abs() >= 90.0 {
            return Err(ProjectionError::LatitudeOutOfRange(lat_deg));
        }

        let lat = lat_deg.to_radians();
        let mut dlon = lon_deg.to_radians() - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let (nu, rho, eta2) = self.radii(lat);
        let m = self.meridional_arc(lat);

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let tan2 = lat.tan().powi(2);
        let tan4 = tan2 * tan2;

        let i = m + self.n0;
        let ii = nu / 2.0 * sin_lat * cos_lat;
        let iii = nu / 24.0 * sin_lat * cos_lat.powi(3) * (5.0 - tan2 + 9.0 * eta2);
        let iiia = nu / 720.0 * sin_lat * cos_lat.powi(5) * (61.0 - 58.0 * tan2 + tan4);
        let iv = nu * cos_lat;
        let v = nu / 6.0 * cos_lat.powi(3) * (nu / rho - tan2);
        let vi = nu / 120.0
            * cos_lat.powi(5)
            * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

        let northing = i + ii * dlon.powi(2) + iii * dlon.powi(4) + iiia * dlon.powi(6);
        let easting = self.e0 + iv * dlon + v * dlon.powi(3) + vi * dlon.powi(5);

        Ok((easting, northing))
    }

    /// Convert grid (easting, northing) in meters to geographic coordinates (lat/lon in degrees).
    pub fn grid_to_geo(&self, easting: f64, northing: f64) -> Result<(f64, f64), ProjectionError> {
        if !easting.is_finite() || !northing.is_finite() {
            return Err(ProjectionError::NonFinite(easting, northing));
        }

        let af0 = self.ellipsoid.a * self.f0;

        // Iterate on latitude until the meridional arc matches the northing
        let mut lat = (northing - self.n0) / af0 + self.lat0;
        let mut m = self.meridional_arc(lat);
        let mut iterations = 0;
        while (northing - self.n0 - m).abs() >= ARC_TOLERANCE {
            if iterations == MAX_ITERATIONS {
                return Err(ProjectionError::NoConvergence(easting, northing));
            }
            lat += (northing - self.n0 - m) / af0;
            m = self.meridional_arc(lat);
            iterations += 1;
        }

        let (nu, rho, eta2) = self.radii(lat);
        let tan = lat.tan();
        let tan2 = tan * tan;
        let tan4 = tan2 * tan2;
        let tan6 = tan4 * tan2;
        let sec = 1.0 / lat.cos();

        let vii = tan / (2.0 * rho * nu);
        let viii = tan / (24.0 * rho * nu.powi(3)) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
        let ix = tan / (720.0 * rho * nu.powi(5)) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
        let x = sec / nu;
        let xi = sec / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan2);
        let xii = sec / (120.0 * nu.powi(5)) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
        let xiia = sec / (5040.0 * nu.powi(7)) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

        let de = easting - self.e0;
        let lat_out = lat - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
        let lon_out = self.lon0 + x * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);

        Ok((lat_out.to_degrees(), lon_out.to_degrees()))
    }

    /// Radii of curvature at a latitude: (nu, rho, eta²).
    fn radii(&self, lat: f64) -> (f64, f64, f64) {
        let a = self.ellipsoid.a;
        let e2 = self.ellipsoid.e2();
        let sin2 = lat.sin().powi(2);
        let nu = a * self.f0 / (1.0 - e2 * sin2).sqrt();
        let rho = a * self.f0 * (1.0 - e2) / (1.0 - e2 * sin2).powf(1.5);
        let eta2 = nu / rho - 1.0;
        (nu, rho, eta2)
    }

    /// Developed meridional arc from the true origin to `lat`.
    fn meridional_arc(&self, lat: f64) -> f64 {
        let n = self.ellipsoid.n();
        let n2 = n * n;
        let n3 = n2 * n;
        let dlat = lat - self.lat0;
        let slat = lat + self.lat0;

        self.ellipsoid.b
            * self.f0
            * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * dlat
                - (3.0 * n + 3.0 * n2 + 2.625 * n3) * dlat.sin() * slat.cos()
                + (1.875 * n2 + 1.875 * n3) * (2.0 * dlat).sin() * (2.0 * slat).cos()
                - (35.0 / 24.0) * n3 * (3.0 * dlat).sin() * (3.0 * slat).cos())
    }
}

/// Convert degrees, minutes and seconds to decimal degrees.
///
/// The sign of `degrees` applies to the whole angle.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    if degrees.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}
