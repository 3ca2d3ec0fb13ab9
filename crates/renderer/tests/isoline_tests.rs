//! Isoline rendering against the full primitive stack.

use met_common::{BoundingBox, ScalarField};
use projection::{MapProjection, PlateCarree, Viewport};
use renderer::contour::{draw_isolines, trace_contours, IsolineOptions};
use renderer::png;
use tiny_skia::Pixmap;

fn wave_field() -> ScalarField {
    let (nx, ny) = (41usize, 31usize);
    let lons: Vec<f64> = (0..nx).map(|i| i as f64).collect();
    let lats: Vec<f64> = (0..ny).map(|j| j as f64).collect();
    let mut data = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v = 1000.0
                + 10.0 * ((i as f32 / 6.0).sin() + (j as f32 / 5.0).cos());
            data.push(v);
        }
    }
    ScalarField::with_axes(data, nx, ny, lons, lats).unwrap()
}

#[test]
fn test_trace_contours_counts() {
    let field = wave_field();
    let contours = trace_contours(&field, &[995.0, 1000.0, 1005.0], 1);
    assert!(!contours.is_empty());
    for c in &contours {
        assert!(c.points.len() >= 2);
        assert!([995.0, 1000.0, 1005.0].contains(&c.level));
    }
}

#[test]
fn test_flat_field_has_no_contours() {
    let field = ScalarField::new(vec![5.0; 100], 10, 10).unwrap();
    assert!(trace_contours(&field, &[5.0], 1).is_empty());
}

#[test]
fn test_draw_isolines_to_png() {
    let field = wave_field();
    let proj = PlateCarree::new();
    let vp = Viewport::new(BoundingBox::new(0.0, 0.0, 40.0, 30.0), 400, 300).unwrap();

    let mut pixmap = Pixmap::new(400, 300).unwrap();
    let lon_axis = field.lon_axis();
    let lat_axis = field.lat_axis();

    fn axis_value(axis: &[f64], fi: f64) -> f64 {
        let i0 = (fi.floor() as usize).min(axis.len() - 1);
        let i1 = (i0 + 1).min(axis.len() - 1);
        let frac = fi - i0 as f64;
        axis[i0] * (1.0 - frac) + axis[i1] * frac
    }

    let opts = IsolineOptions {
        interval: Some(5.0),
        ..Default::default()
    };
    draw_isolines(&mut pixmap, &field, &opts, |fi, fj| {
        let lon = axis_value(&lon_axis, fi);
        let lat = axis_value(&lat_axis, fj);
        let (x, y) = proj.project(lon, lat)?;
        Some(vp.to_pixel(x, y))
    });

    assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));

    let rgba = png::pixmap_to_rgba(&pixmap);
    let bytes = png::encode_auto(&rgba, 400, 300).unwrap();
    assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("isolines.png");
    std::fs::write(&path, &bytes).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_isolines_invisible_in_far_hemisphere() {
    let field = wave_field();
    let proj = projection::Orthographic::new(160.0, -40.0);

    let mut pixmap = Pixmap::new(100, 100).unwrap();
    let before: Vec<u8> = pixmap.data().to_vec();

    // Every grid point is on the far side of the globe
    draw_isolines(
        &mut pixmap,
        &field,
        &IsolineOptions::default(),
        |fi, fj| {
            let (x, y) = proj.project(fi, fj)?;
            Some((x as f32, y as f32))
        },
    );

    assert_eq!(pixmap.data(), &before[..]);
}
