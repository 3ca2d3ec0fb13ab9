//! Filled-field rendering: discrete level bins and continuous shades.
//!
//! Every output pixel is mapped back through the figure projection to a
//! geographic position, located in the field's coordinate arrays (data
//! CRS), and bilinearly sampled. Pixels outside the grid or over NaN data
//! are transparent.

use crate::style::ColorLevels;
use crate::Colormap;
use met_common::ScalarField;
use projection::{MapProjection, Viewport};
use rayon::prelude::*;

/// Locates geographic positions in a field with monotonic coordinate axes.
pub struct FieldSampler<'a> {
    field: &'a ScalarField,
    lon_axis: Vec<f64>,
    lat_axis: Vec<f64>,
}

impl<'a> FieldSampler<'a> {
    pub fn new(field: &'a ScalarField) -> Self {
        Self {
            field,
            lon_axis: field.lon_axis(),
            lat_axis: field.lat_axis(),
        }
    }

    /// Bilinear sample at a data-CRS position. None outside the grid.
    pub fn sample(&self, x: f64, y: f64) -> Option<f32> {
        let fi = frac_index(&self.lon_axis, x)?;
        let fj = frac_index(&self.lat_axis, y)?;
        self.field.sample_index(fi, fj)
    }
}

/// Fractional index of a value on a monotonic (ascending or descending)
/// axis. None outside the axis range or for degenerate axes.
fn frac_index(axis: &[f64], v: f64) -> Option<f64> {
    if axis.len() < 2 {
        return if axis.len() == 1 && axis[0] == v {
            Some(0.0)
        } else {
            None
        };
    }
    let ascending = axis[axis.len() - 1] >= axis[0];

    for k in 0..axis.len() - 1 {
        let (a, b) = (axis[k], axis[k + 1]);
        let inside = if ascending {
            v >= a && v <= b
        } else {
            v <= a && v >= b
        };
        if inside {
            let span = b - a;
            if span.abs() < 1e-12 {
                return Some(k as f64);
            }
            return Some(k as f64 + (v - a) / span);
        }
    }
    None
}

/// Symmetric value range around zero, for difference fields.
pub fn symmetric_range(field: &ScalarField) -> (f32, f32) {
    let absmax = field
        .min_max()
        .map(|(min, max)| min.abs().max(max.abs()))
        .unwrap_or(1.0);
    let absmax = if absmax > 0.0 { absmax } else { 1.0 };
    (-absmax, absmax)
}

/// Render a field through discrete color levels (filled-contour analog).
///
/// Returns an RGBA buffer of the viewport size. Out-of-range values clamp
/// into the extreme bins; NaN and off-grid pixels are transparent.
pub fn render_filled_levels(
    field: &ScalarField,
    levels: &ColorLevels,
    fig_proj: &dyn MapProjection,
    data_proj: &dyn MapProjection,
    vp: &Viewport,
) -> Vec<u8> {
    render_sampled(field, fig_proj, data_proj, vp, |value| {
        levels.color_for(value).unwrap_or([0, 0, 0, 0])
    })
}

/// Render a field through a continuous colormap (shaded analog).
pub fn render_shaded(
    field: &ScalarField,
    cmap: &Colormap,
    range: (f32, f32),
    fig_proj: &dyn MapProjection,
    data_proj: &dyn MapProjection,
    vp: &Viewport,
) -> Vec<u8> {
    let (min, max) = range;
    let span = if (max - min).abs() < 1e-12 {
        1.0
    } else {
        max - min
    };
    render_sampled(field, fig_proj, data_proj, vp, move |value| {
        cmap.sample((value - min) / span)
    })
}

fn render_sampled<F>(
    field: &ScalarField,
    fig_proj: &dyn MapProjection,
    data_proj: &dyn MapProjection,
    vp: &Viewport,
    color_fn: F,
) -> Vec<u8>
where
    F: Fn(f32) -> [u8; 4] + Sync,
{
    let width = vp.width() as usize;
    let height = vp.height() as usize;
    let sampler = FieldSampler::new(field);

    if let Some((min, max)) = field.min_max() {
        tracing::debug!(
            width,
            height,
            data_min = min,
            data_max = max,
            "rendering filled field"
        );
    }

    let mut pixels = vec![0u8; width * height * 4];

    pixels
        .par_chunks_mut(width * 4)
        .enumerate()
        .for_each(|(py, row)| {
            for px in 0..width {
                let (x, y) = vp.from_pixel(px as f64 + 0.5, py as f64 + 0.5);
                let value = fig_proj
                    .unproject(x, y)
                    .and_then(|(lon, lat)| data_proj.project(lon, lat))
                    .and_then(|(xd, yd)| sampler.sample(xd, yd));

                if let Some(v) = value {
                    if !v.is_nan() {
                        let c = color_fn(v);
                        let o = px * 4;
                        row[o] = c[0];
                        row[o + 1] = c[1];
                        row[o + 2] = c[2];
                        row[o + 3] = c[3];
                    }
                }
            }
        });

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use met_common::{BoundingBox, ScalarField};
    use projection::PlateCarree;

    fn field() -> ScalarField {
        // 3x3 ramp from 0 to 40 left to right
        let data = vec![
            0.0, 20.0, 40.0, //
            0.0, 20.0, 40.0, //
            0.0, 20.0, 40.0,
        ];
        ScalarField::with_axes(data, 3, 3, vec![0.0, 5.0, 10.0], vec![0.0, 5.0, 10.0]).unwrap()
    }

    #[test]
    fn test_frac_index_ascending() {
        let axis = [0.0, 5.0, 10.0];
        assert_eq!(frac_index(&axis, 0.0), Some(0.0));
        assert_eq!(frac_index(&axis, 7.5), Some(1.5));
        assert_eq!(frac_index(&axis, 10.0), Some(2.0));
        assert!(frac_index(&axis, -1.0).is_none());
        assert!(frac_index(&axis, 11.0).is_none());
    }

    #[test]
    fn test_frac_index_descending() {
        // Latitude axes often run north to south
        let axis = [60.0, 50.0, 40.0];
        assert_eq!(frac_index(&axis, 60.0), Some(0.0));
        assert_eq!(frac_index(&axis, 45.0), Some(1.5));
        assert!(frac_index(&axis, 65.0).is_none());
    }

    #[test]
    fn test_sampler_bilinear() {
        let f = field();
        let sampler = FieldSampler::new(&f);
        assert_eq!(sampler.sample(0.0, 0.0), Some(0.0));
        let mid = sampler.sample(5.0, 5.0).unwrap();
        assert!((mid - 20.0).abs() < 1e-6);
        assert!(sampler.sample(-1.0, 0.0).is_none());
    }

    #[test]
    fn test_symmetric_range() {
        let f = ScalarField::new(vec![-3.0, 1.0, 2.0, 0.5], 2, 2).unwrap();
        assert_eq!(symmetric_range(&f), (-3.0, 3.0));

        let flat = ScalarField::new(vec![0.0; 4], 2, 2).unwrap();
        assert_eq!(symmetric_range(&flat), (-1.0, 1.0));
    }

    #[test]
    fn test_render_shaded_covers_grid() {
        let f = field();
        let proj = PlateCarree::new();
        let vp = Viewport::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 20, 20).unwrap();
        let pixels = render_shaded(&f, &Colormap::viridis(), (0.0, 40.0), &proj, &proj, &vp);
        assert_eq!(pixels.len(), 20 * 20 * 4);
        // Center pixel is on-grid and opaque
        let center = (10 * 20 + 10) * 4;
        assert_eq!(pixels[center + 3], 255);
    }

    #[test]
    fn test_render_outside_grid_transparent() {
        let f = field();
        let proj = PlateCarree::new();
        // Viewport twice as large as the grid extent
        let vp = Viewport::new(BoundingBox::new(-10.0, -10.0, 20.0, 20.0), 30, 30).unwrap();
        let pixels = render_shaded(&f, &Colormap::viridis(), (0.0, 40.0), &proj, &proj, &vp);
        // Top-left corner is off-grid
        assert_eq!(pixels[3], 0);
    }

    #[test]
    fn test_render_nan_transparent() {
        let data = vec![f32::NAN; 9];
        let f = ScalarField::with_axes(data, 3, 3, vec![0.0, 5.0, 10.0], vec![0.0, 5.0, 10.0])
            .unwrap();
        let proj = PlateCarree::new();
        let vp = Viewport::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 10, 10).unwrap();
        let catalog = crate::StyleCatalog::builtin();
        let levels = catalog.color_levels("temperature").unwrap();
        let pixels = render_filled_levels(&f, levels, &proj, &proj, &vp);
        assert!(pixels.chunks_exact(4).all(|p| p[3] == 0));
    }
}
