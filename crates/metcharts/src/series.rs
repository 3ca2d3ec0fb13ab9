//! Ensemble time-series charts: spaghetti plumes and quantile fans.

use crate::axes::{draw_frame, draw_labels, padded_range, PlotArea};
use crate::figure::Figure;
use crate::opts::{QuantileOptions, SeriesOptions};
use met_common::{ChartError, ChartResult, EnsembleSeries};
use renderer::{glyphs, Rgba};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform,
};

/// One dashed, translucent line per ensemble member against lead time.
pub fn plumes(series: &EnsembleSeries, opts: &SeriesOptions) -> ChartResult<Figure> {
    let (mut fig, area) = series_figure(series, opts)?;

    let alpha = (opts.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    let color = [opts.color[0], opts.color[1], opts.color[2], alpha];

    for m in 0..series.n_members() {
        let points: Vec<(f32, f32)> = series
            .lead_times()
            .iter()
            .zip(series.member(m))
            .filter(|(_, v)| !v.is_nan())
            .map(|(&t, &v)| area.to_pixel(t, v))
            .collect();
        stroke_series(
            fig.pixmap_mut(),
            &points,
            color,
            opts.line_width,
            opts.dashed,
        );
    }

    finish_series_figure(&mut fig, &area, opts);
    Ok(fig)
}

/// Quantile fan chart: paired quantiles as dashed lines with shaded bands
/// between them, the odd middle quantile as a solid line, and a legend.
pub fn quantiles(series: &EnsembleSeries, opts: &QuantileOptions) -> ChartResult<Figure> {
    let qs = &opts.quantiles;
    if qs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ChartError::RenderError(
            "quantile levels must be strictly increasing".to_string(),
        ));
    }
    if qs.iter().any(|q| !(0.0..=1.0).contains(q)) {
        return Err(ChartError::RenderError(
            "quantile levels must lie in [0, 1]".to_string(),
        ));
    }

    let sopts = &opts.series;
    let (mut fig, area) = series_figure(series, sopts)?;

    let qvalues = series.quantiles(qs);
    let x = series.lead_times();
    let band_alpha = (opts.band_alpha.clamp(0.0, 1.0) * 255.0).round() as u8;

    let mut legend: Vec<(String, Rgba)> = Vec::new();

    // Paired quantiles, outermost first
    for i in 0..qs.len() / 2 {
        let j = qs.len() - 1 - i;
        let lower_color = opts.colormap.sample(qs[i]);
        let upper_color = opts.colormap.sample(qs[j]);

        fill_band(
            fig.pixmap_mut(),
            &area,
            x,
            &qvalues[i],
            &qvalues[j],
            [lower_color[0], lower_color[1], lower_color[2], band_alpha],
        );

        let lower: Vec<(f32, f32)> = curve_points(&area, x, &qvalues[i]);
        let upper: Vec<(f32, f32)> = curve_points(&area, x, &qvalues[j]);
        stroke_series(fig.pixmap_mut(), &lower, lower_color, sopts.line_width, true);
        stroke_series(fig.pixmap_mut(), &upper, upper_color, sopts.line_width, true);

        legend.push((format!("Quantile {}", trim_float(qs[i])), lower_color));
        legend.push((format!("Quantile {}", trim_float(qs[j])), upper_color));
    }

    // Odd middle quantile: solid line
    if qs.len() % 2 == 1 {
        let i = qs.len() / 2;
        let color = opts.colormap.sample(qs[i]);
        let points = curve_points(&area, x, &qvalues[i]);
        stroke_series(
            fig.pixmap_mut(),
            &points,
            color,
            sopts.line_width * 1.3,
            false,
        );
        legend.push((format!("Quantile {}", trim_float(qs[i])), color));
    }

    finish_series_figure(&mut fig, &area, sopts);
    if !legend.is_empty() {
        draw_legend(fig.pixmap_mut(), &area, &legend);
    }
    Ok(fig)
}

/// Figure and plot area sized to the series data.
fn series_figure(
    series: &EnsembleSeries,
    opts: &SeriesOptions,
) -> ChartResult<(Figure, PlotArea)> {
    let (min, max) = series
        .min_max()
        .ok_or_else(|| ChartError::RenderError("series is all NaN".to_string()))?;
    let (y_min, y_max) = padded_range(min, max, 0.05);

    let x = series.lead_times();
    let x_min = x.first().copied().unwrap_or(0.0);
    let x_max = x.last().copied().unwrap_or(1.0);
    let (x_min, x_max) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 0.5, x_min + 0.5)
    };

    let fig = Figure::new(opts.width, opts.height)?;
    let area = PlotArea {
        x0: 64.0,
        y0: 40.0,
        w: opts.width as f32 - 64.0 - 24.0,
        h: opts.height as f32 - 40.0 - 50.0,
        x_min,
        x_max,
        y_min,
        y_max,
    };
    if area.w < 16.0 || area.h < 16.0 {
        return Err(ChartError::RenderError(format!(
            "figure of {}x{} px leaves no room for the plot area",
            opts.width, opts.height
        )));
    }
    Ok((fig, area))
}

fn finish_series_figure(fig: &mut Figure, area: &PlotArea, opts: &SeriesOptions) {
    draw_frame(fig.pixmap_mut(), area, true);
    draw_labels(
        fig.pixmap_mut(),
        area,
        opts.title.as_deref(),
        opts.xlabel.as_deref(),
        opts.ylabel.as_deref(),
    );
}

fn curve_points(area: &PlotArea, x: &[f32], values: &[f32]) -> Vec<(f32, f32)> {
    x.iter()
        .zip(values)
        .filter(|(_, v)| !v.is_nan())
        .map(|(&t, &v)| area.to_pixel(t, v))
        .collect()
}

fn stroke_series(
    pixmap: &mut Pixmap,
    points: &[(f32, f32)],
    color: Rgba,
    width: f32,
    dashed: bool,
) {
    if points.len() < 2 {
        return;
    }

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let mut stroke = Stroke::default();
    stroke.width = width;
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;
    if dashed {
        stroke.dash = StrokeDash::new(vec![6.0, 4.0], 0.0);
    }

    let mut pb = PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        pb.line_to(x, y);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Fill the area between two quantile curves.
fn fill_band(
    pixmap: &mut Pixmap,
    area: &PlotArea,
    x: &[f32],
    lower: &[f32],
    upper: &[f32],
    color: Rgba,
) {
    let lo = curve_points(area, x, lower);
    let hi = curve_points(area, x, upper);
    if lo.len() < 2 || hi.len() < 2 {
        return;
    }

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let mut pb = PathBuilder::new();
    pb.move_to(lo[0].0, lo[0].1);
    for &(px, py) in &lo[1..] {
        pb.line_to(px, py);
    }
    for &(px, py) in hi.iter().rev() {
        pb.line_to(px, py);
    }
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Legend box in the top-right corner of the plot area.
fn draw_legend(pixmap: &mut Pixmap, area: &PlotArea, entries: &[(String, Rgba)]) {
    let label_size = 9.0;
    let row_h = 14.0;
    let sample_w = 18.0;
    let pad = 6.0;

    let text_w = entries
        .iter()
        .map(|(t, _)| glyphs::text_width(t, label_size))
        .fold(0.0_f32, f32::max);
    let box_w = pad * 3.0 + sample_w + text_w;
    let box_h = pad * 2.0 + row_h * entries.len() as f32;
    let box_x = area.x0 + area.w - box_w - 8.0;
    let box_y = area.y0 + 8.0;

    let mut bg = Paint::default();
    bg.set_color_rgba8(255, 255, 255, 235);
    bg.anti_alias = true;
    if let Some(rect) = Rect::from_xywh(box_x, box_y, box_w, box_h) {
        pixmap.fill_rect(rect, &bg, Transform::identity(), None);
    }

    let mut border = Paint::default();
    border.set_color_rgba8(120, 120, 120, 255);
    border.anti_alias = true;
    let mut stroke = Stroke::default();
    stroke.width = 1.0;
    let mut pb = PathBuilder::new();
    pb.move_to(box_x, box_y);
    pb.line_to(box_x + box_w, box_y);
    pb.line_to(box_x + box_w, box_y + box_h);
    pb.line_to(box_x, box_y + box_h);
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &border, &stroke, Transform::identity(), None);
    }

    for (k, (text, color)) in entries.iter().enumerate() {
        let y = box_y + pad + row_h * k as f32 + row_h / 2.0;
        stroke_series(
            pixmap,
            &[(box_x + pad, y), (box_x + pad + sample_w, y)],
            *color,
            1.5,
            false,
        );
        glyphs::draw_text_left(
            pixmap,
            box_x + pad * 2.0 + sample_w,
            y,
            text,
            label_size,
            renderer::BLACK,
        );
    }
}

fn trim_float(v: f32) -> String {
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> EnsembleSeries {
        // 3 members, 5 lead times
        let mut data = Vec::new();
        for m in 0..3 {
            for t in 0..5 {
                data.push(10.0 + m as f32 + (t as f32).sin());
            }
        }
        EnsembleSeries::new(data, 3, 5).unwrap()
    }

    #[test]
    fn test_plumes_renders() {
        let fig = plumes(&series(), &SeriesOptions::default()).unwrap();
        assert_eq!(fig.width(), crate::DEFAULT_SIZE);
        assert!(fig.to_png().is_ok());
    }

    #[test]
    fn test_quantiles_renders() {
        let fig = quantiles(&series(), &QuantileOptions::default()).unwrap();
        assert!(fig.to_png().is_ok());
    }

    #[test]
    fn test_quantiles_even_list() {
        let opts = QuantileOptions {
            quantiles: vec![0.25, 0.75],
            ..Default::default()
        };
        assert!(quantiles(&series(), &opts).is_ok());
    }

    #[test]
    fn test_quantiles_rejects_bad_levels() {
        let opts = QuantileOptions {
            quantiles: vec![0.75, 0.25],
            ..Default::default()
        };
        assert!(quantiles(&series(), &opts).is_err());

        let opts = QuantileOptions {
            quantiles: vec![0.5, 1.5],
            ..Default::default()
        };
        assert!(quantiles(&series(), &opts).is_err());
    }

    #[test]
    fn test_trim_float() {
        assert_eq!(trim_float(0.1), "0.1");
        assert_eq!(trim_float(0.25), "0.25");
        assert_eq!(trim_float(0.5), "0.5");
    }
}
