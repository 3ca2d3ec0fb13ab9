//! Spherical Mercator projection.
//!
//! Conformal cylindrical projection, useful for mid-latitude maps.
//! Latitudes are clipped near the poles where the projection diverges.

use crate::MapProjection;
use std::f64::consts::PI;

/// Maximum latitude before clipping (the web-map convention).
const MAX_LAT: f64 = 85.05112878;

#[derive(Debug, Clone, Copy)]
pub struct Mercator {
    /// Central meridian in radians
    lon0: f64,
    /// Earth radius (meters)
    earth_radius: f64,
}

impl Mercator {
    pub fn new(central_lon_deg: f64) -> Self {
        Self {
            lon0: central_lon_deg * PI / 180.0,
            earth_radius: 6371229.0,
        }
    }
}

impl Default for Mercator {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl MapProjection for Mercator {
    fn name(&self) -> &'static str {
        "mercator"
    }

    fn project(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let to_rad = PI / 180.0;
        let lat = lat_deg.clamp(-MAX_LAT, MAX_LAT) * to_rad;
        let lon = crate::normalize_lon(lon_deg) * to_rad;

        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let x = self.earth_radius * dlon;
        let y = self.earth_radius * (PI / 4.0 + lat / 2.0).tan().ln();
        Some((x, y))
    }

    fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let to_deg = 180.0 / PI;
        let lon = self.lon0 + x / self.earth_radius;
        let lat = 2.0 * (y / self.earth_radius).exp().atan() - PI / 2.0;
        if lon.abs() > PI * 1.5 {
            return None;
        }
        Some((crate::normalize_lon(lon * to_deg), lat * to_deg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_is_y_zero() {
        let proj = Mercator::default();
        let (_, y) = proj.project(10.0, 0.0).unwrap();
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip() {
        let proj = Mercator::new(-10.0);
        let (x, y) = proj.project(-12.5, 53.4).unwrap();
        let (lon, lat) = proj.unproject(x, y).unwrap();
        assert!((lon - -12.5).abs() < 1e-9, "lon roundtrip: {}", lon);
        assert!((lat - 53.4).abs() < 1e-9, "lat roundtrip: {}", lat);
    }

    #[test]
    fn test_pole_clipping() {
        let proj = Mercator::default();
        let (_, y_pole) = proj.project(0.0, 90.0).unwrap();
        let (_, y_cap) = proj.project(0.0, MAX_LAT).unwrap();
        assert_eq!(y_pole, y_cap);
    }
}
