//! Plate Carree (equirectangular) projection.
//!
//! The identity projection on lon/lat degrees. Default figure and data
//! coordinate system for the charts.

use crate::MapProjection;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlateCarree {
    /// Central meridian in degrees; longitudes are expressed relative to it.
    pub central_lon: f64,
}

impl PlateCarree {
    pub fn new() -> Self {
        Self { central_lon: 0.0 }
    }

    pub fn with_central_lon(central_lon: f64) -> Self {
        Self { central_lon }
    }
}

impl MapProjection for PlateCarree {
    fn name(&self) -> &'static str {
        "plate_carree"
    }

    fn project(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&lat_deg) {
            return None;
        }
        Some((crate::normalize_lon(lon_deg - self.central_lon), lat_deg))
    }

    fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !(-90.0..=90.0).contains(&y) {
            return None;
        }
        Some((crate::normalize_lon(x + self.central_lon), y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_roundtrip() {
        let proj = PlateCarree::new();
        let (x, y) = proj.project(-12.5, 53.4).unwrap();
        assert_eq!((x, y), (-12.5, 53.4));
        let (lon, lat) = proj.unproject(x, y).unwrap();
        assert_eq!((lon, lat), (-12.5, 53.4));
    }

    #[test]
    fn test_central_meridian_shift() {
        let proj = PlateCarree::with_central_lon(180.0);
        let (x, _) = proj.project(170.0, 0.0).unwrap();
        assert_eq!(x, -10.0);
    }

    #[test]
    fn test_out_of_range_latitude() {
        let proj = PlateCarree::new();
        assert!(proj.project(0.0, 91.0).is_none());
    }
}
