//! Map projections for chart rendering.
//!
//! Implements the projections from scratch without external dependencies.
//! All projections work in degrees on the geographic side; the projected
//! side is in projection-specific units (degrees for Plate Carree, meters
//! for the others).

pub mod lambert;
pub mod mercator;
pub mod orthographic;
pub mod plate_carree;
pub mod viewport;

pub use lambert::LambertConformal;
pub use mercator::Mercator;
pub use orthographic::Orthographic;
pub use plate_carree::PlateCarree;
pub use viewport::Viewport;

use met_common::BoundingBox;
use num_traits::Float;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Degenerate extent: {0}")]
    DegenerateExtent(String),

    #[error("Invalid projection parameters: {0}")]
    InvalidParameters(String),
}

/// A map projection between geographic coordinates (lon/lat in degrees)
/// and projected coordinates.
///
/// `project` returns None for points the projection cannot represent
/// (e.g. the far hemisphere of an orthographic view); `unproject` returns
/// None for projected points outside the image of the forward mapping.
pub trait MapProjection: Send + Sync {
    fn name(&self) -> &'static str;

    fn project(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)>;

    fn unproject(&self, x: f64, y: f64) -> Option<(f64, f64)>;
}

/// Normalize a longitude-like angle to the [-180, 180) range.
pub fn normalize_lon<T: Float>(lon: T) -> T {
    let turn = T::from(360.0).unwrap();
    let half = T::from(180.0).unwrap();
    let mut l = lon;
    while l >= half {
        l = l - turn;
    }
    while l < -half {
        l = l + turn;
    }
    l
}

/// Projected bounding box of a geographic extent, found by sampling the
/// extent's edges through the projection.
pub fn project_extent(
    proj: &dyn MapProjection,
    geo: &BoundingBox,
    samples: usize,
) -> Option<BoundingBox> {
    let n = samples.max(2);
    let mut points = Vec::with_capacity(n * 4);
    for k in 0..n {
        let t = k as f64 / (n - 1) as f64;
        let lon = geo.min_x + t * geo.width();
        let lat = geo.min_y + t * geo.height();
        // Bottom, top, left, right edges
        points.push((lon, geo.min_y));
        points.push((lon, geo.max_y));
        points.push((geo.min_x, lat));
        points.push((geo.max_x, lat));
    }
    BoundingBox::from_points(
        points
            .into_iter()
            .filter_map(|(lon, lat)| proj.project(lon, lat)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(190.0_f64), -170.0);
        assert_eq!(normalize_lon(-190.0_f64), 170.0);
        assert_eq!(normalize_lon(45.0_f64), 45.0);
    }

    #[test]
    fn test_project_extent_plate_carree() {
        let proj = PlateCarree::new();
        let geo = BoundingBox::new(-20.0, 45.0, 3.0, 60.0);
        let projected = project_extent(&proj, &geo, 8).unwrap();
        assert_eq!(projected, geo);
    }
}
