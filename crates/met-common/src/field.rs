//! Gridded scalar fields with geographic coordinates.

use crate::{BoundingBox, ChartError, ChartResult};
use serde::{Deserialize, Serialize};

/// Coordinate arrays attached to a gridded field.
///
/// Either separable 1-D axes (the common case, equivalent to a meshgrid of
/// the two axes) or full 2-D longitude/latitude arrays in row-major order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GridCoords {
    /// 1-D axes: `lons.len() == nx`, `lats.len() == ny`.
    Axes { lons: Vec<f64>, lats: Vec<f64> },
    /// Full 2-D arrays, both of length `nx * ny`, row-major.
    Full { lons: Vec<f64>, lats: Vec<f64> },
}

/// A gridded scalar field: `ny` rows of `nx` values, row-major, with
/// matching longitude/latitude coordinates.
#[derive(Debug, Clone)]
pub struct ScalarField {
    data: Vec<f32>,
    nx: usize,
    ny: usize,
    coords: GridCoords,
}

impl ScalarField {
    /// Field with default coordinates: index ranges `0..nx` and `0..ny`
    /// interpreted as degrees.
    pub fn new(data: Vec<f32>, nx: usize, ny: usize) -> ChartResult<Self> {
        let lons = (0..nx).map(|i| i as f64).collect();
        let lats = (0..ny).map(|j| j as f64).collect();
        Self::with_axes(data, nx, ny, lons, lats)
    }

    /// Field on a separable grid described by 1-D coordinate axes.
    pub fn with_axes(
        data: Vec<f32>,
        nx: usize,
        ny: usize,
        lons: Vec<f64>,
        lats: Vec<f64>,
    ) -> ChartResult<Self> {
        if nx == 0 || ny == 0 || data.len() != nx * ny {
            return Err(ChartError::ShapeMismatch(format!(
                "data has {} values, expected {}x{}",
                data.len(),
                nx,
                ny
            )));
        }
        if lons.len() != nx || lats.len() != ny {
            return Err(ChartError::InvalidCoordinates(format!(
                "axes of {}x{} do not match a {}x{} grid",
                lons.len(),
                lats.len(),
                nx,
                ny
            )));
        }
        Ok(Self {
            data,
            nx,
            ny,
            coords: GridCoords::Axes { lons, lats },
        })
    }

    /// Field with full 2-D coordinate arrays (both `nx * ny`, row-major).
    pub fn with_coords(
        data: Vec<f32>,
        nx: usize,
        ny: usize,
        lons: Vec<f64>,
        lats: Vec<f64>,
    ) -> ChartResult<Self> {
        if nx == 0 || ny == 0 || data.len() != nx * ny {
            return Err(ChartError::ShapeMismatch(format!(
                "data has {} values, expected {}x{}",
                data.len(),
                nx,
                ny
            )));
        }
        if lons.len() != nx * ny || lats.len() != nx * ny {
            return Err(ChartError::InvalidCoordinates(format!(
                "coordinate arrays of {} and {} values do not match a {}x{} grid",
                lons.len(),
                lats.len(),
                nx,
                ny
            )));
        }
        Ok(Self {
            data,
            nx,
            ny,
            coords: GridCoords::Full { lons, lats },
        })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }

    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// Value at grid position (i, j), row-major.
    pub fn value(&self, i: usize, j: usize) -> f32 {
        self.data[j * self.nx + i]
    }

    /// Longitude/latitude of grid position (i, j).
    pub fn coord(&self, i: usize, j: usize) -> (f64, f64) {
        match &self.coords {
            GridCoords::Axes { lons, lats } => (lons[i], lats[j]),
            GridCoords::Full { lons, lats } => {
                let idx = j * self.nx + i;
                (lons[idx], lats[idx])
            }
        }
    }

    /// Longitude axis. For full 2-D coordinates the first row is used,
    /// which inverts the meshgrid construction of separable grids.
    pub fn lon_axis(&self) -> Vec<f64> {
        match &self.coords {
            GridCoords::Axes { lons, .. } => lons.clone(),
            GridCoords::Full { lons, .. } => lons[..self.nx].to_vec(),
        }
    }

    /// Latitude axis. For full 2-D coordinates the first column is used.
    pub fn lat_axis(&self) -> Vec<f64> {
        match &self.coords {
            GridCoords::Axes { lats, .. } => lats.clone(),
            GridCoords::Full { lats, .. } => {
                (0..self.ny).map(|j| lats[j * self.nx]).collect()
            }
        }
    }

    /// Minimum and maximum of the data, ignoring NaN. None if all-NaN.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.data {
            if v.is_nan() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }

    /// Element-wise difference `self - other`. Coordinates are taken from
    /// `self`; the shapes must agree.
    pub fn diff(&self, other: &ScalarField) -> ChartResult<ScalarField> {
        if self.nx != other.nx || self.ny != other.ny {
            return Err(ChartError::ShapeMismatch(format!(
                "cannot difference a {}x{} field with a {}x{} field",
                self.nx, self.ny, other.nx, other.ny
            )));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(ScalarField {
            data,
            nx: self.nx,
            ny: self.ny,
            coords: self.coords.clone(),
        })
    }

    /// Geographic bounding box of the coordinates.
    pub fn bbox(&self) -> BoundingBox {
        match &self.coords {
            GridCoords::Axes { lons, lats } => {
                let (lon_min, lon_max) = axis_range(lons);
                let (lat_min, lat_max) = axis_range(lats);
                BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
            }
            GridCoords::Full { lons, lats } => {
                let (lon_min, lon_max) = axis_range(lons);
                let (lat_min, lat_max) = axis_range(lats);
                BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
            }
        }
    }

    /// Bilinear sample at a fractional grid index. NaN corners poison the
    /// result; outside the grid returns None.
    pub fn sample_index(&self, fi: f64, fj: f64) -> Option<f32> {
        if fi < 0.0 || fj < 0.0 || fi > (self.nx - 1) as f64 || fj > (self.ny - 1) as f64 {
            return None;
        }
        let i0 = fi.floor() as usize;
        let j0 = fj.floor() as usize;
        let i1 = (i0 + 1).min(self.nx - 1);
        let j1 = (j0 + 1).min(self.ny - 1);
        let dx = (fi - i0 as f64) as f32;
        let dy = (fj - j0 as f64) as f32;

        let v00 = self.value(i0, j0);
        let v10 = self.value(i1, j0);
        let v01 = self.value(i0, j1);
        let v11 = self.value(i1, j1);

        let top = v00 * (1.0 - dx) + v10 * dx;
        let bottom = v01 * (1.0 - dx) + v11 * dx;
        Some(top * (1.0 - dy) + bottom * dy)
    }
}

fn axis_range(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}
