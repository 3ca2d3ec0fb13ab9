//! End-to-end chart tests on synthetic fields.

use met_common::{EnsembleSeries, ScalarField};
use metcharts::{
    color_levels, color_shades, isolines, plumes, quantiles, scatter, two_var_comparison,
    two_var_plot, ComparisonOptions, MapOptions, QuantileOptions, SeriesOptions,
};
use projection::Orthographic;
use renderer::basemap::Coastlines;
use renderer::contour::IsolineOptions;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Fields shaped like the usual smoke-test data: t2m and mslp waves over
/// the north-east Atlantic.
fn synthetic_fields() -> (ScalarField, ScalarField) {
    let (nx, ny) = (49usize, 53usize);
    let lons: Vec<f64> = (0..nx)
        .map(|i| -20.0 + 23.0 * i as f64 / (nx - 1) as f64)
        .collect();
    let lats: Vec<f64> = (0..ny)
        .map(|j| 45.0 + 15.0 * j as f64 / (ny - 1) as f64)
        .collect();

    let mut t2m = Vec::with_capacity(nx * ny);
    let mut mslp = Vec::with_capacity(nx * ny);
    for &lat in &lats {
        for &lon in &lons {
            let lat_r = lat.to_radians();
            let lon_r = lon.to_radians();
            t2m.push((30.0 * lat_r.cos() + (20.0 * lon_r).sin()) as f32);
            mslp.push((1015.0 + 10.0 * ((20.0 * lon_r).sin() + (25.0 * lat_r).cos())) as f32);
        }
    }

    (
        ScalarField::with_axes(t2m, nx, ny, lons.clone(), lats.clone()).unwrap(),
        ScalarField::with_axes(mslp, nx, ny, lons, lats).unwrap(),
    )
}

fn synthetic_ensemble() -> EnsembleSeries {
    let (n_mbr, n_ldt) = (21usize, 48usize);
    let mut data = Vec::with_capacity(n_mbr * n_ldt);
    for m in 0..n_mbr {
        let phase = m as f32 * 0.13;
        let offset = (m % 5) as f32;
        for t in 0..n_ldt {
            let x = std::f32::consts::PI * t as f32 / 24.0 + phase;
            data.push(15.0 * x.sin() + offset);
        }
    }
    EnsembleSeries::new(data, n_mbr, n_ldt).unwrap()
}

fn small_opts() -> MapOptions {
    MapOptions {
        size: 300,
        ..Default::default()
    }
}

#[test]
fn test_isolines() {
    let (_, mslp) = synthetic_fields();
    let mut opts = small_opts();
    opts.isoline = IsolineOptions {
        interval: Some(4.0),
        ..Default::default()
    };
    let fig = isolines(&mslp, &opts).unwrap();
    let png = fig.to_png().unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
}

#[test]
fn test_isolines_orthographic_figure_crs() {
    let (_, mslp) = synthetic_fields();
    let mut opts = small_opts();
    opts.fig_proj = Box::new(Orthographic::new(-8.0, 52.0));
    let fig = isolines(&mslp, &opts).unwrap();
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_color_levels() {
    let (t2m, _) = synthetic_fields();
    let mut opts = small_opts();
    opts.caption = "DEG C".to_string();
    let fig = color_levels(&t2m, "temperature", &opts).unwrap();
    assert_eq!(fig.width(), 300);
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_color_levels_unknown_family() {
    let (t2m, _) = synthetic_fields();
    assert!(color_levels(&t2m, "vorticity", &small_opts()).is_err());
}

#[test]
fn test_color_shades() {
    let (t2m, _) = synthetic_fields();
    let fig = color_shades(&t2m, "temperature", &small_opts()).unwrap();
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_color_shades_diff_family() {
    let (t2m, _) = synthetic_fields();
    let fig = color_shades(&t2m, "diff", &small_opts()).unwrap();
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_two_var_plot() {
    let (t2m, mslp) = synthetic_fields();
    let mut opts = small_opts();
    opts.title = Some("MSLP OVER T2M".to_string());
    let fig = two_var_plot(&mslp, &t2m, "temp", &opts).unwrap();
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_two_var_plot_with_coastlines() {
    let (t2m, mslp) = synthetic_fields();
    let geojson = r#"{
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[-10.5, 51.4], [-6.0, 51.4], [-5.4, 55.4], [-10.0, 55.3], [-10.5, 51.4]]]
        }
    }"#;
    let mut opts = small_opts();
    opts.coastlines = Some(Coastlines::from_geojson_str(geojson).unwrap());
    opts.land = true;
    let fig = two_var_plot(&mslp, &t2m, "temp", &opts).unwrap();
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_two_var_comparison() {
    let (t2m, mslp) = synthetic_fields();
    let t2m_r = ScalarField::with_axes(
        t2m.values().iter().map(|v| v + 0.1).collect(),
        t2m.nx(),
        t2m.ny(),
        t2m.lon_axis(),
        t2m.lat_axis(),
    )
    .unwrap();
    let mslp_r = ScalarField::with_axes(
        mslp.values().iter().map(|v| v + 0.5).collect(),
        mslp.nx(),
        mslp.ny(),
        mslp.lon_axis(),
        mslp.lat_axis(),
    )
    .unwrap();

    let opts = ComparisonOptions {
        base: MapOptions {
            size: 400,
            ..Default::default()
        },
        titles: [
            ["STATE 0".to_string(), "STATE 1".to_string()],
            ["MSLP DIFF".to_string(), "T2M DIFF".to_string()],
        ],
        captions: Default::default(),
    };

    let fig = two_var_comparison(&mslp, &mslp_r, &t2m, &t2m_r, "temp", &opts).unwrap();
    assert_eq!(fig.width(), 400);
    assert_eq!(fig.height(), 400);
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_comparison_shape_mismatch() {
    let (t2m, mslp) = synthetic_fields();
    let other = ScalarField::new(vec![0.0; 4], 2, 2).unwrap();
    assert!(
        two_var_comparison(&mslp, &other, &t2m, &t2m, "temp", &ComparisonOptions::default())
            .is_err()
    );
}

#[test]
fn test_scatter() {
    let n = 200;
    let lons: Vec<f64> = (0..n).map(|k| -20.0 + 70.0 * (k as f64 / n as f64)).collect();
    let lats: Vec<f64> = (0..n)
        .map(|k| 30.0 + 40.0 * ((k * 7 % n) as f64 / n as f64))
        .collect();
    let values: Vec<f32> = lons
        .iter()
        .zip(&lats)
        .map(|(lon, lat)| {
            (20.0 + 5.0 * ((lat.to_radians() * 4.0).cos() + (lon.to_radians() * 4.0).sin())) as f32
        })
        .collect();

    let fig = scatter(&values, &lons, &lats, "temperature", &small_opts()).unwrap();
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_scatter_rejects_mismatched_inputs() {
    let opts = small_opts();
    assert!(scatter(&[1.0, 2.0], &[0.0], &[0.0, 1.0], "temp", &opts).is_err());
    assert!(scatter(&[], &[], &[], "temp", &opts).is_err());
}

#[test]
fn test_plumes() {
    let series = synthetic_ensemble();
    let opts = SeriesOptions {
        width: 400,
        height: 300,
        title: Some("PLUMES".to_string()),
        xlabel: Some("LEAD TIME".to_string()),
        ..Default::default()
    };
    let fig = plumes(&series, &opts).unwrap();
    assert_eq!(fig.width(), 400);
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_quantiles() {
    let series = synthetic_ensemble();
    let opts = QuantileOptions {
        series: SeriesOptions {
            width: 400,
            height: 300,
            ..QuantileOptions::default().series
        },
        ..Default::default()
    };
    let fig = quantiles(&series, &opts).unwrap();
    assert!(fig.to_png().is_ok());
}

#[test]
fn test_save_png_roundtrip() {
    let (t2m, _) = synthetic_fields();
    let fig = color_shades(&t2m, "temperature", &small_opts()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shades.png");
    fig.save_png(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..8], &PNG_SIGNATURE);
}
