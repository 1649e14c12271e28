//! Reference ellipsoids used around the National Grid.

/// Reference ellipsoid defined by its semi-axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Semi-minor axis (meters)
    pub b: f64,
}

impl Ellipsoid {
    /// GRS80, the ellipsoid of ETRS89.
    pub const GRS80: Ellipsoid = Ellipsoid {
        a: 6378137.000,
        b: 6356752.3141,
    };

    /// Airy 1830, the ellipsoid of OSGB36.
    pub const AIRY_1830: Ellipsoid = Ellipsoid {
        a: 6377563.396,
        b: 6356256.909,
    };

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.a * self.a)
    }

    /// Third flattening, `n` in the OS meridional arc series.
    pub fn n(&self) -> f64 {
        (self.a - self.b) / (self.a + self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grs80_eccentricity() {
        // Published value 0.00669438003
        let e2 = Ellipsoid::GRS80.e2();
        assert!((e2 - 0.00669438003).abs() < 1e-11, "e2 = {}", e2);
    }

    #[test]
    fn test_airy_eccentricity() {
        let airy = Ellipsoid::AIRY_1830;
        let e2 = airy.e2();
        assert!((e2 - (1.0 - (airy.b * airy.b) / (airy.a * airy.a))).abs() < 1e-14);

        // Published value 0.0066705397616 was derived from b rounded to the millimetre
        assert!((e2 - 0.0066705397616).abs() < 1e-9, "e2 = {}", e2);
    }
}
