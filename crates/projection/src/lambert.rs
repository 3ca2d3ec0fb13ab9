//! Lambert Conformal Conic projection.
//!
//! Maps a cone tangent or secant to the sphere onto a plane; the usual
//! choice for mid-latitude limited-area forecast charts.
//!
//! Parameters:
//! - Central meridian (lon0)
//! - Reference latitude (lat0): origin of the y axis
//! - Standard parallel(s): latin1 and latin2 (equal for a tangent cone)

use crate::{MapProjection, ProjectionError};
use std::f64::consts::PI;

#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    lon0: f64,
    /// Reference latitude in radians
    lat0: f64,
    /// Earth radius (meters)
    earth_radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the reference latitude
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from parameters in degrees.
    pub fn new(
        central_lon_deg: f64,
        ref_lat_deg: f64,
        latin1_deg: f64,
        latin2_deg: f64,
    ) -> Result<Self, ProjectionError> {
        if ref_lat_deg.abs() >= 90.0 || latin1_deg.abs() >= 90.0 || latin2_deg.abs() >= 90.0 {
            return Err(ProjectionError::InvalidParameters(
                "latitudes must be strictly between -90 and 90".into(),
            ));
        }

        let to_rad = PI / 180.0;
        let lon0 = central_lon_deg * to_rad;
        let lat0 = ref_lat_deg * to_rad;
        let latin1 = latin1_deg * to_rad;
        let latin2 = latin2_deg * to_rad;

        let earth_radius = 6371229.0;

        // Cone constant
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };
        if n.abs() < 1e-10 {
            return Err(ProjectionError::InvalidParameters(
                "standard parallels produce a degenerate cone".into(),
            ));
        }

        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;
        let rho0 = earth_radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Ok(Self {
            lon0,
            lat0,
            earth_radius,
            n,
            f,
            rho0,
        })
    }

    /// Classic CONUS setup: standard parallels 33/45, centered on 96W.
    pub fn conus() -> Self {
        // Parameters are well inside the valid range.
        Self::new(-96.0, 39.0, 33.0, 45.0).expect("CONUS parameters are valid")
    }
}

impl MapProjection for LambertConformal {
    fn name(&self) -> &'static str {
        "lambert_conformal"
    }

    fn project(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;

        // Poles on the wrong side of the cone are not representable
        if self.n > 0.0 && lat_deg <= -89.999 {
            return None;
        }
        if self.n < 0.0 && lat_deg >= 89.999 {
            return None;
        }

        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.earth_radius * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        Some((x, y))
    }

    fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let to_deg = 180.0 / PI;

        let rho = (x * x + (self.rho0 - y) * (self.rho0 - y)).sqrt();
        let rho = if self.n < 0.0 { -rho } else { rho };
        if rho.abs() < 1e-9 {
            // Apex of the cone: the pole
            let pole = if self.n > 0.0 { 90.0 } else { -90.0 };
            return Some((self.lon0 * to_deg, pole));
        }

        let theta = x.atan2(self.rho0 - y);
        let lat = 2.0 * ((self.earth_radius * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        Some((crate::normalize_lon(lon * to_deg), lat * to_deg))
    }
}
