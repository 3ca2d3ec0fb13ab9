//! Cartesian axes for the time-series charts.

use renderer::colorbar::{format_tick, tick_values};
use renderer::glyphs;
use tiny_skia::{LineCap, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};

/// A plot area with linear axes mapping data coordinates to pixels.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub x0: f32,
    pub y0: f32,
    pub w: f32,
    pub h: f32,
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl PlotArea {
    pub fn to_pixel(&self, x: f32, y: f32) -> (f32, f32) {
        let tx = (x - self.x_min) / (self.x_max - self.x_min);
        let ty = (y - self.y_min) / (self.y_max - self.y_min);
        (self.x0 + tx * self.w, self.y0 + (1.0 - ty) * self.h)
    }
}

/// Pad a value range by a fraction; degenerate ranges get a unit span.
pub fn padded_range(min: f32, max: f32, fraction: f32) -> (f32, f32) {
    if !(max - min).is_finite() || max - min <= 0.0 {
        return (min - 0.5, min + 0.5);
    }
    let pad = (max - min) * fraction;
    (min - pad, max + pad)
}

fn stroke_line(pixmap: &mut Pixmap, points: &[(f32, f32)], paint: &Paint, stroke: &Stroke) {
    if points.len() < 2 {
        return;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].0, points[0].1);
    for &(x, y) in &points[1..] {
        pb.line_to(x, y);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
    }
}

/// Draw the frame, grid, ticks, and labels of a plot area.
pub fn draw_frame(pixmap: &mut Pixmap, area: &PlotArea, grid: bool) {
    let mut frame_paint = Paint::default();
    frame_paint.set_color_rgba8(0, 0, 0, 255);
    frame_paint.anti_alias = true;
    let mut frame_stroke = Stroke::default();
    frame_stroke.width = 1.0;
    frame_stroke.line_cap = LineCap::Square;

    // Frame
    stroke_line(
        pixmap,
        &[
            (area.x0, area.y0),
            (area.x0 + area.w, area.y0),
            (area.x0 + area.w, area.y0 + area.h),
            (area.x0, area.y0 + area.h),
            (area.x0, area.y0),
        ],
        &frame_paint,
        &frame_stroke,
    );

    let mut grid_paint = Paint::default();
    grid_paint.set_color_rgba8(160, 160, 160, 160);
    grid_paint.anti_alias = true;
    let mut grid_stroke = Stroke::default();
    grid_stroke.width = 0.8;
    grid_stroke.dash = StrokeDash::new(vec![3.0, 3.0], 0.0);

    let label_size = 9.0;

    // X ticks along the bottom edge
    for v in tick_values(area.x_min, area.x_max, 8) {
        let (px, _) = area.to_pixel(v, area.y_min);
        if grid {
            stroke_line(
                pixmap,
                &[(px, area.y0), (px, area.y0 + area.h)],
                &grid_paint,
                &grid_stroke,
            );
        }
        stroke_line(
            pixmap,
            &[(px, area.y0 + area.h), (px, area.y0 + area.h + 4.0)],
            &frame_paint,
            &frame_stroke,
        );
        glyphs::draw_text(
            pixmap,
            px,
            area.y0 + area.h + 12.0,
            0.0,
            &format_tick(v),
            label_size,
            renderer::BLACK,
        );
    }

    // Y ticks along the left edge
    for v in tick_values(area.y_min, area.y_max, 6) {
        let (_, py) = area.to_pixel(area.x_min, v);
        if grid {
            stroke_line(
                pixmap,
                &[(area.x0, py), (area.x0 + area.w, py)],
                &grid_paint,
                &grid_stroke,
            );
        }
        stroke_line(
            pixmap,
            &[(area.x0 - 4.0, py), (area.x0, py)],
            &frame_paint,
            &frame_stroke,
        );
        glyphs::draw_text_right(
            pixmap,
            area.x0 - 6.0,
            py,
            &format_tick(v),
            label_size,
            renderer::BLACK,
        );
    }
}

/// Draw title and axis labels around a plot area.
pub fn draw_labels(
    pixmap: &mut Pixmap,
    area: &PlotArea,
    title: Option<&str>,
    xlabel: Option<&str>,
    ylabel: Option<&str>,
) {
    if let Some(title) = title {
        glyphs::draw_text(
            pixmap,
            area.x0 + area.w / 2.0,
            area.y0 - 16.0,
            0.0,
            title,
            13.0,
            renderer::BLACK,
        );
    }
    if let Some(xlabel) = xlabel {
        glyphs::draw_text(
            pixmap,
            area.x0 + area.w / 2.0,
            area.y0 + area.h + 30.0,
            0.0,
            xlabel,
            11.0,
            renderer::BLACK,
        );
    }
    if let Some(ylabel) = ylabel {
        glyphs::draw_text(
            pixmap,
            area.x0 - 44.0,
            area.y0 + area.h / 2.0,
            -std::f32::consts::FRAC_PI_2,
            ylabel,
            11.0,
            renderer::BLACK,
        );
    }
}
