//! Map chart entry points: isolines, filled levels, shades, scatter,
//! two-variable overlays, and the 2x2 comparison figure.

use crate::figure::{Figure, PlotRect};
use crate::opts::{ComparisonOptions, MapOptions};
use met_common::{BoundingBox, ChartError, ChartResult, ScalarField};
use projection::{project_extent, MapProjection, Viewport};
use rayon::prelude::*;
use renderer::basemap;
use renderer::colorbar::{self, ColorbarOptions};
use renderer::contour::{draw_isolines, IsolineOptions};
use renderer::fill::{render_filled_levels, render_shaded, symmetric_range};
use renderer::style::ColorLevels;
use renderer::Colormap;
use tiny_skia::{
    IntSize, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

/// The color-filled layer of a map panel.
enum FillLayer<'a> {
    /// Discrete filled levels for a variable family
    Levels(&'a ScalarField, &'a ColorLevels),
    /// Continuous shades over an explicit value range
    Shaded(&'a ScalarField, Colormap, (f32, f32)),
}

/// Everything one map panel draws.
struct MapPanelSpec<'a> {
    iso: Option<&'a ScalarField>,
    fill: Option<FillLayer<'a>>,
    title: Option<&'a str>,
    caption: &'a str,
}

/// Isoline map (e.g. mean sea-level pressure): black contours with
/// inline labels over the basemap.
pub fn isolines(field: &ScalarField, opts: &MapOptions) -> ChartResult<Figure> {
    single_panel(
        MapPanelSpec {
            iso: Some(field),
            fill: None,
            title: None,
            caption: "",
        },
        opts,
    )
}

/// Discrete filled levels for a variable family, with a colorbar.
pub fn color_levels(field: &ScalarField, family: &str, opts: &MapOptions) -> ChartResult<Figure> {
    let levels = opts.catalog.color_levels(family)?;
    single_panel(
        MapPanelSpec {
            iso: None,
            fill: Some(FillLayer::Levels(field, levels)),
            title: None,
            caption: &opts.caption,
        },
        opts,
    )
}

/// Continuous color shading for a variable family, with a colorbar.
/// The "diff" family is shaded over a range symmetric around zero.
pub fn color_shades(field: &ScalarField, family: &str, opts: &MapOptions) -> ChartResult<Figure> {
    let cmap = opts.catalog.colormap(family);
    let range = shade_range(field, family)?;
    single_panel(
        MapPanelSpec {
            iso: None,
            fill: Some(FillLayer::Shaded(field, cmap, range)),
            title: None,
            caption: &opts.caption,
        },
        opts,
    )
}

/// Two variables on one map: isolines drawn over filled levels.
pub fn two_var_plot(
    iso_field: &ScalarField,
    fill_field: &ScalarField,
    fill_family: &str,
    opts: &MapOptions,
) -> ChartResult<Figure> {
    let levels = opts.catalog.color_levels(fill_family)?;
    single_panel(
        MapPanelSpec {
            iso: Some(iso_field),
            fill: Some(FillLayer::Levels(fill_field, levels)),
            title: None,
            caption: &opts.caption,
        },
        opts,
    )
}

/// 2x2 comparison of a two-variable overlay at two states.
///
/// Top row: the overlay at state 0 and state 1. Bottom row: the state
/// differences (0 - 1) of each variable, shaded with the diverging map
/// over a symmetric range.
pub fn two_var_comparison(
    iso0: &ScalarField,
    iso1: &ScalarField,
    fill0: &ScalarField,
    fill1: &ScalarField,
    fill_family: &str,
    opts: &ComparisonOptions,
) -> ChartResult<Figure> {
    let base = &opts.base;
    let levels = base.catalog.color_levels(fill_family)?;
    let diff_cmap = base.catalog.colormap("diff");

    let iso_diff = iso0.diff(iso1)?;
    let fill_diff = fill0.diff(fill1)?;
    let iso_range = symmetric_range(&iso_diff);
    let fill_range = symmetric_range(&fill_diff);

    let panel_size = base.size / 2;
    let specs = [
        MapPanelSpec {
            iso: Some(iso0),
            fill: Some(FillLayer::Levels(fill0, levels)),
            title: Some(opts.titles[0][0].as_str()),
            caption: &opts.captions[0][0],
        },
        MapPanelSpec {
            iso: Some(iso1),
            fill: Some(FillLayer::Levels(fill1, levels)),
            title: Some(opts.titles[0][1].as_str()),
            caption: &opts.captions[0][1],
        },
        MapPanelSpec {
            iso: None,
            fill: Some(FillLayer::Shaded(&iso_diff, diff_cmap.clone(), iso_range)),
            title: Some(opts.titles[1][0].as_str()),
            caption: &opts.captions[1][0],
        },
        MapPanelSpec {
            iso: None,
            fill: Some(FillLayer::Shaded(&fill_diff, diff_cmap, fill_range)),
            title: Some(opts.titles[1][1].as_str()),
            caption: &opts.captions[1][1],
        },
    ];

    let panels: Vec<ChartResult<Pixmap>> = specs
        .par_iter()
        .map(|spec| render_map_panel(panel_size, panel_size, spec, base))
        .collect();

    let mut fig = Figure::square(base.size)?;
    for (k, panel) in panels.into_iter().enumerate() {
        let panel = panel?;
        let x = (k % 2) as i32 * panel_size as i32;
        let y = (k / 2) as i32 * panel_size as i32;
        fig.blit(&panel, x, y);
    }

    if let Some(title) = &base.title {
        fig.draw_title(title);
    }
    Ok(fig)
}

/// Station values as colored markers on the basemap.
pub fn scatter(
    values: &[f32],
    lons: &[f64],
    lats: &[f64],
    family: &str,
    opts: &MapOptions,
) -> ChartResult<Figure> {
    if values.len() != lons.len() || values.len() != lats.len() {
        return Err(ChartError::ShapeMismatch(format!(
            "{} values with {} lons and {} lats",
            values.len(),
            lons.len(),
            lats.len()
        )));
    }
    if values.is_empty() {
        return Err(ChartError::ShapeMismatch("no points to scatter".into()));
    }

    let cmap = opts.catalog.colormap(family);
    let (min, max) = scatter_range(values, family);
    let span = if (max - min).abs() < 1e-12 { 1.0 } else { max - min };

    // Point coordinates are expressed in the data CRS
    let geo = BoundingBox::from_points(
        lons.iter()
            .zip(lats.iter())
            .filter_map(|(&x, &y)| opts.data_proj.unproject(x, y)),
    )
    .ok_or_else(|| ChartError::ShapeMismatch("no points to scatter".into()))?
    .padded(0.05);

    let mut fig = Figure::square(opts.size)?;
    let plot = opts.margins.plot_rect(opts.size, opts.size)?;
    let fig_proj = opts.fig_proj.as_ref();
    let data_proj = opts.data_proj.as_ref();
    let vp = make_viewport(fig_proj, &geo, &plot)?;
    let origin = (plot.x, plot.y);

    draw_basemap_under(fig.pixmap_mut(), origin, fig_proj, &vp, opts);

    // Markers
    for ((&v, &lon), &lat) in values.iter().zip(lons).zip(lats) {
        if v.is_nan() {
            continue;
        }
        let Some((lon_geo, lat_geo)) = data_proj.unproject(lon, lat) else {
            continue;
        };
        let Some((x, y)) = fig_proj.project(lon_geo, lat_geo) else {
            continue;
        };
        let (px, py) = vp.to_pixel(x, y);
        if px < 0.0 || py < 0.0 || px > vp.width() as f32 || py > vp.height() as f32 {
            continue;
        }

        let c = cmap.sample((v - min) / span);
        let mut paint = Paint::default();
        paint.set_color_rgba8(c[0], c[1], c[2], c[3]);
        paint.anti_alias = true;
        let mut pb = PathBuilder::new();
        pb.push_circle(origin.0 + px, origin.1 + py, opts.marker_size);
        if let Some(path) = pb.finish() {
            fig.pixmap_mut().fill_path(
                &path,
                &paint,
                tiny_skia::FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    draw_basemap_over(fig.pixmap_mut(), origin, fig_proj, &geo, &vp, opts, &plot);

    colorbar::draw_colormap_colorbar(
        fig.pixmap_mut(),
        plot.x + plot.w + 10.0,
        plot.y,
        plot.h,
        &cmap,
        (min, max),
        &ColorbarOptions {
            caption: opts.caption.clone(),
            ..Default::default()
        },
    );

    if let Some(title) = &opts.title {
        fig.draw_title(title);
    }
    Ok(fig)
}

/// Shade range for a family: symmetric around zero for differences,
/// data min/max otherwise.
fn shade_range(field: &ScalarField, family: &str) -> ChartResult<(f32, f32)> {
    if family.eq_ignore_ascii_case("diff") {
        return Ok(symmetric_range(field));
    }
    field
        .min_max()
        .ok_or_else(|| ChartError::RenderError("field is all NaN".into()))
}

fn scatter_range(values: &[f32], family: &str) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if family.eq_ignore_ascii_case("diff") {
        let absmax = min.abs().max(max.abs()).max(f32::MIN_POSITIVE);
        (-absmax, absmax)
    } else {
        (min, max)
    }
}

fn single_panel(spec: MapPanelSpec<'_>, opts: &MapOptions) -> ChartResult<Figure> {
    let panel = render_map_panel(opts.size, opts.size, &spec, opts)?;
    let mut fig = Figure::square(opts.size)?;
    fig.blit(&panel, 0, 0);
    if let Some(title) = &opts.title {
        fig.draw_title(title);
    }
    Ok(fig)
}

/// Geographic (lon/lat) extent of a field whose coordinates are in the
/// data CRS.
fn geographic_extent(
    field: &ScalarField,
    data_proj: &dyn MapProjection,
) -> ChartResult<BoundingBox> {
    let data_bbox = field.bbox();
    const SAMPLES: usize = 16;
    let mut points = Vec::with_capacity(SAMPLES * 4);
    for k in 0..SAMPLES {
        let t = k as f64 / (SAMPLES - 1) as f64;
        let x = data_bbox.min_x + t * data_bbox.width();
        let y = data_bbox.min_y + t * data_bbox.height();
        points.push((x, data_bbox.min_y));
        points.push((x, data_bbox.max_y));
        points.push((data_bbox.min_x, y));
        points.push((data_bbox.max_x, y));
    }
    BoundingBox::from_points(
        points
            .into_iter()
            .filter_map(|(x, y)| data_proj.unproject(x, y)),
    )
    .ok_or_else(|| {
        ChartError::ProjectionError(
            "field extent is not visible in the data projection".to_string(),
        )
    })
}

fn make_viewport(
    fig_proj: &dyn MapProjection,
    geo: &BoundingBox,
    plot: &PlotRect,
) -> ChartResult<Viewport> {
    let projected = project_extent(fig_proj, geo, 24).ok_or_else(|| {
        ChartError::ProjectionError(
            "extent is not visible in the figure projection".to_string(),
        )
    })?;
    Viewport::new(projected, plot.w as u32, plot.h as u32)
        .map_err(|e| ChartError::ProjectionError(e.to_string()))
}

/// Layers under the data: land fill.
fn draw_basemap_under(
    pixmap: &mut Pixmap,
    origin: (f32, f32),
    fig_proj: &dyn MapProjection,
    vp: &Viewport,
    opts: &MapOptions,
) {
    if let Some(coast) = &opts.coastlines {
        if opts.land {
            coast.draw_land(pixmap, origin, fig_proj, vp, [222, 210, 180, 128]);
        }
    }
}

/// Layers over the data: coastlines, graticule, plot frame.
fn draw_basemap_over(
    pixmap: &mut Pixmap,
    origin: (f32, f32),
    fig_proj: &dyn MapProjection,
    geo: &BoundingBox,
    vp: &Viewport,
    opts: &MapOptions,
    plot: &PlotRect,
) {
    if let Some(coast) = &opts.coastlines {
        coast.draw(pixmap, origin, fig_proj, vp, renderer::BLACK, 0.5);
    }
    basemap::draw_graticule(pixmap, origin, fig_proj, geo, vp, &opts.graticule);
    draw_plot_frame(pixmap, plot);
}

fn draw_plot_frame(pixmap: &mut Pixmap, plot: &PlotRect) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = true;
    let mut stroke = Stroke::default();
    stroke.width = 1.0;
    stroke.line_cap = LineCap::Square;

    let mut pb = PathBuilder::new();
    pb.move_to(plot.x, plot.y);
    pb.line_to(plot.x + plot.w, plot.y);
    pb.line_to(plot.x + plot.w, plot.y + plot.h);
    pb.line_to(plot.x, plot.y + plot.h);
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Render one complete map panel: fills, basemap, isolines, colorbar,
/// panel title.
fn render_map_panel(
    panel_w: u32,
    panel_h: u32,
    spec: &MapPanelSpec<'_>,
    opts: &MapOptions,
) -> ChartResult<Pixmap> {
    let reference: &ScalarField = match (&spec.fill, spec.iso) {
        (Some(FillLayer::Levels(f, _)), _) | (Some(FillLayer::Shaded(f, _, _)), _) => f,
        (None, Some(f)) => f,
        (None, None) => {
            return Err(ChartError::RenderError("panel has nothing to draw".into()))
        }
    };

    let fig_proj = opts.fig_proj.as_ref();
    let data_proj = opts.data_proj.as_ref();

    let plot = opts.margins.plot_rect(panel_w, panel_h)?;
    let geo = geographic_extent(reference, data_proj)?;
    let vp = make_viewport(fig_proj, &geo, &plot)?;
    let origin = (plot.x, plot.y);

    let mut panel = Pixmap::new(panel_w, panel_h).ok_or_else(|| {
        ChartError::RenderError(format!("cannot allocate a {}x{} panel", panel_w, panel_h))
    })?;

    tracing::debug!(
        panel_w,
        panel_h,
        projection = fig_proj.name(),
        "rendering map panel"
    );

    draw_basemap_under(&mut panel, origin, fig_proj, &vp, opts);

    // Filled layer
    if let Some(fill) = &spec.fill {
        let pixels = match fill {
            FillLayer::Levels(field, levels) => {
                render_filled_levels(field, levels, fig_proj, data_proj, &vp)
            }
            FillLayer::Shaded(field, cmap, range) => {
                render_shaded(field, cmap, *range, fig_proj, data_proj, &vp)
            }
        };
        let size = IntSize::from_wh(vp.width(), vp.height()).ok_or_else(|| {
            ChartError::RenderError("empty fill viewport".to_string())
        })?;
        let layer = Pixmap::from_vec(pixels, size).ok_or_else(|| {
            ChartError::RenderError("fill layer does not match the viewport".to_string())
        })?;
        panel.draw_pixmap(
            origin.0 as i32,
            origin.1 as i32,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    // Isolines
    if let Some(field) = spec.iso {
        let lon_axis = field.lon_axis();
        let lat_axis = field.lat_axis();
        let to_pixel = |fi: f64, fj: f64| -> Option<(f32, f32)> {
            let xd = axis_value(&lon_axis, fi);
            let yd = axis_value(&lat_axis, fj);
            let (lon, lat) = data_proj.unproject(xd, yd)?;
            let (x, y) = fig_proj.project(lon, lat)?;
            let (px, py) = vp.to_pixel(x, y);
            if px < -1.0 || py < -1.0 || px > vp.width() as f32 + 1.0 || py > vp.height() as f32 + 1.0
            {
                return None;
            }
            Some((origin.0 + px, origin.1 + py))
        };
        draw_isolines(&mut panel, field, &opts.isoline, to_pixel);
    }

    draw_basemap_over(&mut panel, origin, fig_proj, &geo, &vp, opts, &plot);

    // Colorbar in the right margin
    if let Some(fill) = &spec.fill {
        let bar_opts = ColorbarOptions {
            caption: spec.caption.to_string(),
            ..Default::default()
        };
        match fill {
            FillLayer::Levels(_, levels) => colorbar::draw_levels_colorbar(
                &mut panel,
                plot.x + plot.w + 10.0,
                plot.y,
                plot.h,
                levels,
                &bar_opts,
            ),
            FillLayer::Shaded(_, cmap, range) => colorbar::draw_colormap_colorbar(
                &mut panel,
                plot.x + plot.w + 10.0,
                plot.y,
                plot.h,
                cmap,
                *range,
                &bar_opts,
            ),
        }
    }

    // Panel title
    if let Some(title) = spec.title {
        if !title.is_empty() {
            renderer::glyphs::draw_text(
                &mut panel,
                plot.x + plot.w / 2.0,
                plot.y - 14.0,
                0.0,
                title,
                12.0,
                renderer::BLACK,
            );
        }
    }

    Ok(panel)
}

/// Linear interpolation on a coordinate axis at a fractional index.
fn axis_value(axis: &[f64], fi: f64) -> f64 {
    if axis.is_empty() {
        return 0.0;
    }
    let max = (axis.len() - 1) as f64;
    let fi = fi.clamp(0.0, max);
    let i0 = fi.floor() as usize;
    let i1 = (i0 + 1).min(axis.len() - 1);
    let frac = fi - i0 as f64;
    axis[i0] * (1.0 - frac) + axis[i1] * frac
}

/// Isoline options for a given level interval (convenience).
pub fn isoline_interval(interval: f32) -> IsolineOptions {
    IsolineOptions {
        interval: Some(interval),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_value() {
        let axis = [0.0, 10.0, 20.0];
        assert_eq!(axis_value(&axis, 0.0), 0.0);
        assert_eq!(axis_value(&axis, 1.5), 15.0);
        assert_eq!(axis_value(&axis, 2.0), 20.0);
        // Clamped outside the axis
        assert_eq!(axis_value(&axis, -1.0), 0.0);
        assert_eq!(axis_value(&axis, 5.0), 20.0);
    }

    #[test]
    fn test_scatter_range_diff_symmetric() {
        let (lo, hi) = scatter_range(&[-1.0, 3.0], "diff");
        assert_eq!((lo, hi), (-3.0, 3.0));
        let (lo, hi) = scatter_range(&[5.0, 9.0], "temperature");
        assert_eq!((lo, hi), (5.0, 9.0));
    }
}
