//! Vertical colorbars for filled-level and shaded plots.
//!
//! The bar occupies a fraction of the panel height (vertically centered),
//! has extend triangles at both ends, tick labels on the right, and an
//! optional rotated caption.

use crate::style::ColorLevels;
use crate::{glyphs, Colormap, Rgba};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

#[derive(Debug, Clone)]
pub struct ColorbarOptions {
    /// Caption drawn alongside the bar
    pub caption: String,
    pub label_size: f32,
    pub bar_width: f32,
    /// Bar height as a fraction of the panel height
    pub shrink: f32,
}

impl Default for ColorbarOptions {
    fn default() -> Self {
        Self {
            caption: String::new(),
            label_size: 10.0,
            bar_width: 16.0,
            shrink: 0.3,
        }
    }
}

/// Discrete colorbar: one cell per interior level interval, extend
/// triangles carrying the clamp colors, ticks at the interior bounds.
pub fn draw_levels_colorbar(
    pixmap: &mut Pixmap,
    bar_x: f32,
    panel_top: f32,
    panel_height: f32,
    levels: &ColorLevels,
    opts: &ColorbarOptions,
) {
    let n = levels.colors.len();
    if n < 3 {
        return;
    }

    let bar_h = panel_height * opts.shrink;
    let top = panel_top + (panel_height - bar_h) / 2.0;
    let tri_h = (opts.bar_width * 0.9).min(bar_h * 0.15);
    let body_top = top + tri_h;
    let body_h = bar_h - 2.0 * tri_h;

    // Interior cells, low values at the bottom
    let cells = n - 2;
    let cell_h = body_h / cells as f32;
    for (k, &color) in levels.colors[1..n - 1].iter().enumerate() {
        let y = body_top + body_h - (k + 1) as f32 * cell_h;
        fill_rect(pixmap, bar_x, y, opts.bar_width, cell_h + 0.5, color);
    }

    // Extend triangles: below-range color at the bottom, above-range on top
    fill_triangle(
        pixmap,
        (bar_x, body_top),
        (bar_x + opts.bar_width, body_top),
        (bar_x + opts.bar_width / 2.0, top),
        levels.colors[n - 1],
    );
    fill_triangle(
        pixmap,
        (bar_x, body_top + body_h),
        (bar_x + opts.bar_width, body_top + body_h),
        (bar_x + opts.bar_width / 2.0, top + bar_h),
        levels.colors[0],
    );

    // Ticks at the interior bounds
    let interior = levels.interior_bounds();
    let text_x = bar_x + opts.bar_width + 4.0;
    for (k, &bound) in interior.iter().enumerate() {
        let y = body_top + body_h - k as f32 * cell_h;
        glyphs::draw_text_left(
            pixmap,
            text_x,
            y,
            &format_tick(bound),
            opts.label_size,
            crate::BLACK,
        );
    }

    draw_caption(pixmap, bar_x, top, bar_h, opts);
}

/// Continuous colorbar over a value range.
pub fn draw_colormap_colorbar(
    pixmap: &mut Pixmap,
    bar_x: f32,
    panel_top: f32,
    panel_height: f32,
    cmap: &Colormap,
    range: (f32, f32),
    opts: &ColorbarOptions,
) {
    let bar_h = panel_height * opts.shrink;
    let top = panel_top + (panel_height - bar_h) / 2.0;
    let tri_h = (opts.bar_width * 0.9).min(bar_h * 0.15);
    let body_top = top + tri_h;
    let body_h = bar_h - 2.0 * tri_h;

    // One-pixel bands, bottom = range minimum
    let rows = body_h.ceil().max(1.0) as usize;
    for r in 0..rows {
        let t = 1.0 - r as f32 / (rows - 1).max(1) as f32;
        let color = cmap.sample(t);
        fill_rect(pixmap, bar_x, body_top + r as f32, opts.bar_width, 1.5, color);
    }

    fill_triangle(
        pixmap,
        (bar_x, body_top),
        (bar_x + opts.bar_width, body_top),
        (bar_x + opts.bar_width / 2.0, top),
        cmap.sample(1.0),
    );
    fill_triangle(
        pixmap,
        (bar_x, body_top + body_h),
        (bar_x + opts.bar_width, body_top + body_h),
        (bar_x + opts.bar_width / 2.0, top + bar_h),
        cmap.sample(0.0),
    );

    // About five round-valued ticks
    let (min, max) = range;
    let ticks = tick_values(min, max, 5);
    let span = if (max - min).abs() < 1e-12 {
        1.0
    } else {
        max - min
    };
    let text_x = bar_x + opts.bar_width + 4.0;
    for v in ticks {
        let t = (v - min) / span;
        let y = body_top + body_h * (1.0 - t);
        glyphs::draw_text_left(
            pixmap,
            text_x,
            y,
            &format_tick(v),
            opts.label_size,
            crate::BLACK,
        );
    }

    draw_caption(pixmap, bar_x, top, bar_h, opts);
}

fn draw_caption(pixmap: &mut Pixmap, bar_x: f32, top: f32, bar_h: f32, opts: &ColorbarOptions) {
    if opts.caption.is_empty() {
        return;
    }
    glyphs::draw_text(
        pixmap,
        bar_x + opts.bar_width + 44.0,
        top + bar_h / 2.0,
        -std::f32::consts::FRAC_PI_2,
        &opts.caption,
        opts.label_size,
        crate::BLACK,
    );
}

/// Round tick values at a 1/2/5 step covering [min, max].
pub fn tick_values(min: f32, max: f32, target: usize) -> Vec<f32> {
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return vec![min];
    }
    let raw = span / target.max(1) as f32;
    let mag = 10.0_f32.powf(raw.log10().floor());
    let norm = raw / mag;
    let step = if norm < 1.5 {
        1.0
    } else if norm < 3.5 {
        2.0
    } else if norm < 7.5 {
        5.0
    } else {
        10.0
    } * mag;

    let start = (min / step).ceil() * step;
    let mut out = Vec::new();
    let mut v = start;
    while v <= max + step * 1e-3 {
        out.push(v);
        v += step;
    }
    out
}

/// Compact numeric tick text.
pub fn format_tick(v: f32) -> String {
    if v.fract().abs() < 1e-3 {
        format!("{:.0}", v)
    } else if v.abs() >= 10.0 {
        format!("{:.1}", v)
    } else {
        let s = format!("{:.2}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn fill_rect(pixmap: &mut Pixmap, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = false;
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

fn fill_triangle(pixmap: &mut Pixmap, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Rgba) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let mut pb = PathBuilder::new();
    pb.move_to(a.0, a.1);
    pb.line_to(b.0, b.1);
    pb.line_to(c.0, c.1);
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StyleCatalog;

    #[test]
    fn test_tick_values() {
        let ticks = tick_values(0.0, 100.0, 5);
        assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);

        let ticks = tick_values(-3.0, 3.0, 5);
        assert!(ticks.contains(&0.0));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(20.0), "20");
        assert_eq!(format_tick(0.5), "0.5");
        assert_eq!(format_tick(-12.34), "-12.3");
    }

    #[test]
    fn test_levels_colorbar_draws() {
        let catalog = StyleCatalog::builtin();
        let levels = catalog.color_levels("wind").unwrap();
        let mut pixmap = Pixmap::new(120, 300).unwrap();
        draw_levels_colorbar(
            &mut pixmap,
            10.0,
            0.0,
            300.0,
            levels,
            &ColorbarOptions {
                caption: "KT".to_string(),
                ..Default::default()
            },
        );
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }

    #[test]
    fn test_colormap_colorbar_draws() {
        let mut pixmap = Pixmap::new(120, 300).unwrap();
        draw_colormap_colorbar(
            &mut pixmap,
            10.0,
            0.0,
            300.0,
            &Colormap::bwr(),
            (-2.0, 2.0),
            &ColorbarOptions::default(),
        );
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }
}
