//! Demonstration renderer for the metcharts crates.
//!
//! Builds synthetic forecast fields and writes one PNG per chart type,
//! confirming that every entry point works end to end.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use met_common::{EnsembleSeries, RunTime, ScalarField};
use metcharts::{
    color_levels, color_shades, isolines, plumes, quantiles, scatter, two_var_comparison,
    two_var_plot, ComparisonOptions, MapOptions, QuantileOptions, SeriesOptions,
};
use projection::Orthographic;
use renderer::basemap::Coastlines;
use renderer::contour::IsolineOptions;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "metcharts")]
#[command(about = "Render demonstration meteorological charts to PNG")]
struct Args {
    /// Output directory for the rendered charts
    #[arg(short, long, default_value = "charts_out")]
    out_dir: PathBuf,

    /// Figure edge length in pixels
    #[arg(long, default_value_t = metcharts::DEFAULT_SIZE)]
    size: u32,

    /// Coastline GeoJSON file drawn on the map charts
    #[arg(long, env = "METCHARTS_COASTLINES")]
    coastlines: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("cannot create {}", args.out_dir.display()))?;

    let coastlines = match &args.coastlines {
        Some(path) => Some(
            Coastlines::from_file(path)
                .with_context(|| format!("cannot load coastlines from {}", path.display()))?,
        ),
        None => None,
    };

    let run = RunTime(Utc::now());
    render_all(&args, coastlines, run)?;

    info!(out_dir = %args.out_dir.display(), "all charts rendered");
    Ok(())
}

fn render_all(args: &Args, coastlines: Option<Coastlines>, run: RunTime) -> Result<()> {
    let (t2m, mslp) = synthetic_fields();
    let t2m_r = perturbed(&t2m, 0.4);
    let mslp_r = perturbed(&mslp, 0.8);

    let map_opts = || MapOptions {
        size: args.size,
        coastlines: coastlines.clone(),
        ..Default::default()
    };

    // Single-variable maps
    let mut opts = map_opts();
    opts.title = Some(format!("MSLP {}", run.caption()));
    opts.isoline = IsolineOptions {
        interval: Some(4.0),
        ..Default::default()
    };
    save(isolines(&mslp, &opts)?, &args.out_dir, "isolines.png")?;

    // The same field seen through a different figure projection
    let mut opts = map_opts();
    opts.title = Some("MSLP ORTHOGRAPHIC VIEW".to_string());
    opts.fig_proj = Box::new(Orthographic::new(-8.0, 52.0));
    opts.isoline = IsolineOptions {
        interval: Some(4.0),
        ..Default::default()
    };
    save(isolines(&mslp, &opts)?, &args.out_dir, "isolines_ortho.png")?;

    let mut opts = map_opts();
    opts.title = Some("T2M COLOR LEVELS".to_string());
    opts.caption = "DEG C".to_string();
    save(
        color_levels(&t2m, "temperature", &opts)?,
        &args.out_dir,
        "color_levels.png",
    )?;

    let mut opts = map_opts();
    opts.title = Some("T2M COLOR SHADES".to_string());
    opts.caption = "DEG C".to_string();
    save(
        color_shades(&t2m, "temperature", &opts)?,
        &args.out_dir,
        "color_shades.png",
    )?;

    // Overlay and comparison
    let mut opts = map_opts();
    opts.title = Some("MSLP OVER T2M".to_string());
    opts.caption = "DEG C".to_string();
    opts.isoline = IsolineOptions {
        interval: Some(4.0),
        ..Default::default()
    };
    save(
        two_var_plot(&mslp, &t2m, "temp", &opts)?,
        &args.out_dir,
        "two_var_plot.png",
    )?;

    let comparison = ComparisonOptions {
        base: MapOptions {
            land: true,
            ..map_opts()
        },
        titles: [
            ["STATE 0".to_string(), "STATE 1".to_string()],
            ["MSLP DIFF".to_string(), "T2M DIFF".to_string()],
        ],
        captions: [
            ["DEG C".to_string(), "DEG C".to_string()],
            ["HPA".to_string(), "DEG C".to_string()],
        ],
    };
    save(
        two_var_comparison(&mslp, &mslp_r, &t2m, &t2m_r, "temp", &comparison)?,
        &args.out_dir,
        "two_var_comparison.png",
    )?;

    // Scatter
    let (values, lons, lats) = synthetic_stations(500);
    let mut opts = map_opts();
    opts.title = Some("STATION T2M".to_string());
    opts.caption = "DEG C".to_string();
    save(
        scatter(&values, &lons, &lats, "temperature", &opts)?,
        &args.out_dir,
        "scatter.png",
    )?;

    // Ensemble series
    let series = synthetic_ensemble(51, 72);
    let series_opts = SeriesOptions {
        title: Some("ENSEMBLE PLUMES".to_string()),
        xlabel: Some("LEAD TIME (H)".to_string()),
        ylabel: Some("T2M (DEG C)".to_string()),
        ..Default::default()
    };
    save(plumes(&series, &series_opts)?, &args.out_dir, "plumes.png")?;

    let quantile_opts = QuantileOptions {
        series: SeriesOptions {
            title: Some("ENSEMBLE QUANTILES".to_string()),
            xlabel: Some("LEAD TIME (H)".to_string()),
            ylabel: Some("T2M (DEG C)".to_string()),
            ..QuantileOptions::default().series
        },
        ..Default::default()
    };
    save(
        quantiles(&series, &quantile_opts)?,
        &args.out_dir,
        "quantiles.png",
    )?;

    Ok(())
}

fn save(fig: metcharts::Figure, out_dir: &Path, name: &str) -> Result<()> {
    let path = out_dir.join(name);
    fig.save_png(&path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    info!(chart = name, "rendered");
    Ok(())
}

/// Smooth 2-m temperature and mean sea-level pressure fields over the
/// north-east Atlantic.
fn synthetic_fields() -> (ScalarField, ScalarField) {
    let (nx, ny) = (245usize, 265usize);
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

    let t2m = ScalarField::with_axes(t2m, nx, ny, lons.clone(), lats.clone())
        .expect("synthetic grid is well formed");
    let mslp =
        ScalarField::with_axes(mslp, nx, ny, lons, lats).expect("synthetic grid is well formed");
    (t2m, mslp)
}

/// Deterministic pseudo-random perturbation of a field (second "state").
fn perturbed(field: &ScalarField, amplitude: f32) -> ScalarField {
    let data: Vec<f32> = field
        .values()
        .iter()
        .enumerate()
        .map(|(k, v)| v + amplitude * hash_unit(k as u64))
        .collect();
    ScalarField::with_axes(
        data,
        field.nx(),
        field.ny(),
        field.lon_axis(),
        field.lat_axis(),
    )
    .expect("perturbed grid keeps the original shape")
}

/// Synthetic station observations scattered over the map.
fn synthetic_stations(n: usize) -> (Vec<f32>, Vec<f64>, Vec<f64>) {
    let mut values = Vec::with_capacity(n);
    let mut lons = Vec::with_capacity(n);
    let mut lats = Vec::with_capacity(n);
    for k in 0..n {
        let lon = -20.0 + 70.0 * hash_unit(k as u64 * 2 + 1) as f64;
        let lat = 30.0 + 40.0 * hash_unit(k as u64 * 2 + 2) as f64;
        let value = 20.0 + 5.0 * ((lat.to_radians() * 4.0).cos() + (lon.to_radians() * 4.0).sin());
        values.push(value as f32);
        lons.push(lon);
        lats.push(lat);
    }
    (values, lons, lats)
}

/// Synthetic ensemble: phase- and amplitude-shifted diurnal waves.
fn synthetic_ensemble(n_members: usize, n_lead_times: usize) -> EnsembleSeries {
    let mut data = Vec::with_capacity(n_members * n_lead_times);
    for m in 0..n_members {
        let period = 24.0 + 1.5 * hash_unit(m as u64 * 3 + 1);
        let phase = 0.8 * hash_unit(m as u64 * 3 + 2);
        let offset = 5.0 * hash_unit(m as u64 * 3 + 3);
        for t in 0..n_lead_times {
            let x = std::f32::consts::PI * t as f32 / period + phase;
            data.push(15.0 * x.sin() + offset);
        }
    }
    EnsembleSeries::new(data, n_members, n_lead_times).expect("synthetic ensemble is well formed")
}

/// Deterministic hash mapped to [0, 1).
fn hash_unit(k: u64) -> f32 {
    let h = k
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .rotate_left(31)
        .wrapping_mul(0xBF58_476D_1CE4_E5B9);
    (h >> 40) as f32 / (1u64 << 24) as f32
}
