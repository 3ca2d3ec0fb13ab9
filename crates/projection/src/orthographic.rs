//! Orthographic projection.
//!
//! A perspective view of the globe from infinity, centered on a chosen
//! point. Only the near hemisphere is visible; points on the far side
//! project to None.

use crate::MapProjection;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy)]
pub struct Orthographic {
    /// Center longitude in radians
    lon0: f64,
    /// Center latitude in radians
    lat0: f64,
    /// Earth radius (meters)
    earth_radius: f64,
}

impl Orthographic {
    pub fn new(central_lon_deg: f64, central_lat_deg: f64) -> Self {
        let to_rad = PI / 180.0;
        Self {
            lon0: central_lon_deg * to_rad,
            lat0: central_lat_deg * to_rad,
            earth_radius: 6371229.0,
        }
    }
}

impl MapProjection for Orthographic {
    fn name(&self) -> &'static str {
        "orthographic"
    }

    fn project(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;
        let dlon = lon - self.lon0;

        // Cosine of the angular distance to the projection center;
        // non-positive means the point is on the far hemisphere.
        let cos_c =
            self.lat0.sin() * lat.sin() + self.lat0.cos() * lat.cos() * dlon.cos();
        if cos_c <= 0.0 {
            return None;
        }

        let x = self.earth_radius * lat.cos() * dlon.sin();
        let y = self.earth_radius
            * (self.lat0.cos() * lat.sin() - self.lat0.sin() * lat.cos() * dlon.cos());
        Some((x, y))
    }

    fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let to_deg = 180.0 / PI;
        let rho = (x * x + y * y).sqrt();
        if rho > self.earth_radius {
            return None;
        }
        if rho < 1e-9 {
            return Some((self.lon0 * to_deg, self.lat0 * to_deg));
        }

        let c = (rho / self.earth_radius).asin();
        let lat = (c.cos() * self.lat0.sin() + y * c.sin() * self.lat0.cos() / rho).asin();
        let lon = self.lon0
            + (x * c.sin())
                .atan2(rho * c.cos() * self.lat0.cos() - y * c.sin() * self.lat0.sin());

        Some((crate::normalize_lon(lon * to_deg), lat * to_deg))
    }
}
