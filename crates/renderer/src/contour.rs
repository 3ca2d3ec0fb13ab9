//! Isoline tracing and rendering using marching squares.
//!
//! Contours are traced in grid-index space, then mapped point by point
//! through a caller-supplied transform into pixel space. This keeps the
//! tracing independent of the figure projection: curved projections just
//! produce curved isolines.

use crate::labels::{collect_label_spots, draw_label_spots, LabelSpot};
use crate::Rgba;
use met_common::ScalarField;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// A point in 2D space (grid-index or pixel coordinates)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// A complete contour line (polyline) at one level
#[derive(Debug, Clone)]
pub struct Contour {
    pub level: f32,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Isoline rendering options
#[derive(Debug, Clone)]
pub struct IsolineOptions {
    /// Explicit contour levels; when empty, levels are generated from
    /// `interval` (or a round interval fitted to the data range).
    pub levels: Vec<f32>,
    /// Level interval used when `levels` is empty
    pub interval: Option<f32>,
    /// Line width in pixels
    pub line_width: f32,
    /// Line color
    pub color: Rgba,
    /// Number of corner-cutting smoothing passes (0 = none)
    pub smoothing_passes: u32,
    /// Whether to draw inline labels
    pub labels: bool,
    /// Label font size
    pub label_size: f32,
    /// Minimum spacing between labels along a line (pixels)
    pub label_spacing: f32,
}

impl Default for IsolineOptions {
    fn default() -> Self {
        Self {
            levels: vec![],
            interval: None,
            line_width: 1.5,
            color: crate::BLACK,
            smoothing_passes: 1,
            labels: true,
            label_size: 10.0,
            label_spacing: 150.0,
        }
    }
}

impl IsolineOptions {
    /// Levels to draw for a given field.
    pub fn resolve_levels(&self, field: &ScalarField) -> Vec<f32> {
        if !self.levels.is_empty() {
            return self.levels.clone();
        }
        let Some((min, max)) = field.min_max() else {
            return vec![];
        };
        let interval = self
            .interval
            .unwrap_or_else(|| round_interval(min, max, 8));
        generate_levels(min, max, interval)
    }
}

/// Generate contour levels on multiples of `interval` within [min, max].
pub fn generate_levels(min_value: f32, max_value: f32, interval: f32) -> Vec<f32> {
    if interval <= 0.0 || max_value <= min_value {
        return vec![];
    }

    let start = (min_value / interval).ceil() * interval;
    let mut levels = Vec::new();
    let mut level = start;
    while level <= max_value {
        levels.push(level);
        level += interval;
    }
    levels
}

/// A round 1/2/5 x 10^k interval giving about `target` levels.
fn round_interval(min: f32, max: f32, target: usize) -> f32 {
    let span = (max - min).abs();
    if span <= 0.0 {
        return 1.0;
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
    };
    step * mag
}

/// Marching squares over a row-major grid, producing unordered segments
/// in grid-index coordinates. Cells touching NaN are skipped.
pub fn march_squares(data: &[f32], width: usize, height: usize, level: f32) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            if tl.is_nan() || tr.is_nan() || bl.is_nan() || br.is_nan() {
                continue;
            }

            let mut cell_index = 0;
            if tl >= level {
                cell_index |= 1;
            }
            if tr >= level {
                cell_index |= 2;
            }
            if br >= level {
                cell_index |= 4;
            }
            if bl >= level {
                cell_index |= 8;
            }

            segments.extend(cell_segments(
                cell_index, x as f32, y as f32, tl, tr, br, bl, level,
            ));
        }
    }

    segments
}

#[allow(clippy::too_many_arguments)]
fn cell_segments(
    cell_index: u8,
    x: f32,
    y: f32,
    tl: f32,
    tr: f32,
    br: f32,
    bl: f32,
    level: f32,
) -> Vec<Segment> {
    let top = interpolate_edge(x, y, x + 1.0, y, tl, tr, level);
    let right = interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, tr, br, level);
    let bottom = interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, bl, br, level);
    let left = interpolate_edge(x, y, x, y + 1.0, tl, bl, level);

    match cell_index {
        0 | 15 => vec![],
        1 | 14 => vec![Segment { start: left, end: top }],
        2 | 13 => vec![Segment { start: top, end: right }],
        3 | 12 => vec![Segment { start: left, end: right }],
        4 | 11 => vec![Segment { start: right, end: bottom }],
        5 => vec![
            // Saddle
            Segment { start: left, end: top },
            Segment { start: right, end: bottom },
        ],
        6 | 9 => vec![Segment { start: top, end: bottom }],
        7 | 8 => vec![Segment { start: left, end: bottom }],
        10 => vec![
            // Saddle
            Segment { start: top, end: right },
            Segment { start: left, end: bottom },
        ],
        _ => vec![],
    }
}

fn interpolate_edge(x1: f32, y1: f32, x2: f32, y2: f32, val1: f32, val2: f32, level: f32) -> Point {
    if (val2 - val1).abs() < 1e-6 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }
    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);
    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Connect unordered segments into continuous polylines.
pub fn connect_segments(segments: Vec<Segment>) -> Vec<Contour> {
    if segments.is_empty() {
        return vec![];
    }

    let mut contours = Vec::new();
    let mut used = vec![false; segments.len()];
    let epsilon = 0.001;

    for start_idx in 0..segments.len() {
        if used[start_idx] {
            continue;
        }

        let mut points = vec![segments[start_idx].start, segments[start_idx].end];
        used[start_idx] = true;

        let mut changed = true;
        while changed {
            changed = false;
            let current_end = *points.last().expect("polyline is never empty");

            for (i, seg) in segments.iter().enumerate() {
                if used[i] {
                    continue;
                }

                let dist_start = (seg.start.x - current_end.x).hypot(seg.start.y - current_end.y);
                let dist_end = (seg.end.x - current_end.x).hypot(seg.end.y - current_end.y);

                if dist_start < epsilon {
                    points.push(seg.end);
                    used[i] = true;
                    changed = true;
                    break;
                } else if dist_end < epsilon {
                    points.push(seg.start);
                    used[i] = true;
                    changed = true;
                    break;
                }
            }
        }

        let first = points[0];
        let last = *points.last().expect("polyline is never empty");
        let closed = (first.x - last.x).hypot(first.y - last.y) < epsilon;

        if points.len() >= 2 {
            contours.push(Contour {
                level: 0.0, // set by the caller
                points,
                closed,
            });
        }
    }

    contours
}

/// Chaikin corner cutting.
pub fn smooth_contour(contour: &Contour, iterations: u32) -> Contour {
    if iterations == 0 || contour.points.len() < 3 {
        return contour.clone();
    }

    let mut points = contour.points.clone();

    for _ in 0..iterations {
        let mut new_points = Vec::with_capacity(points.len() * 2);

        for i in 0..points.len() {
            let p1 = points[i];
            let p2 = if contour.closed {
                points[(i + 1) % points.len()]
            } else if i + 1 < points.len() {
                points[i + 1]
            } else {
                break;
            };

            new_points.push(Point::new(0.75 * p1.x + 0.25 * p2.x, 0.75 * p1.y + 0.25 * p2.y));
            new_points.push(Point::new(0.25 * p1.x + 0.75 * p2.x, 0.25 * p1.y + 0.75 * p2.y));
        }

        if !contour.closed && !points.is_empty() {
            new_points.insert(0, points[0]);
            if let Some(&last) = points.last() {
                new_points.push(last);
            }
        }

        points = new_points;
    }

    Contour {
        level: contour.level,
        points,
        closed: contour.closed,
    }
}

/// Trace all contours of a field at the given levels, in grid-index
/// coordinates.
pub fn trace_contours(field: &ScalarField, levels: &[f32], smoothing_passes: u32) -> Vec<Contour> {
    let mut all = Vec::new();

    for &level in levels {
        let segments = march_squares(field.values(), field.nx(), field.ny(), level);
        let mut contours = connect_segments(segments);
        for contour in &mut contours {
            contour.level = level;
            if smoothing_passes > 0 {
                *contour = smooth_contour(contour, smoothing_passes);
            }
        }
        all.extend(contours);
    }

    tracing::debug!(
        num_levels = levels.len(),
        num_contours = all.len(),
        total_points = all.iter().map(|c| c.points.len()).sum::<usize>(),
        "traced isolines"
    );

    all
}

/// Draw isolines of a field onto a pixmap.
///
/// `to_pixel` maps fractional grid indices to pixel coordinates, returning
/// None for points the figure projection cannot show; polylines are split
/// at such points.
pub fn draw_isolines<F>(pixmap: &mut Pixmap, field: &ScalarField, opts: &IsolineOptions, to_pixel: F)
where
    F: Fn(f64, f64) -> Option<(f32, f32)>,
{
    let levels = opts.resolve_levels(field);
    let contours = trace_contours(field, &levels, opts.smoothing_passes);

    let mut paint = Paint::default();
    paint.set_color_rgba8(opts.color[0], opts.color[1], opts.color[2], opts.color[3]);
    paint.anti_alias = true;

    let mut stroke = Stroke::default();
    stroke.width = opts.line_width;
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;

    let mut spots: Vec<LabelSpot> = Vec::new();

    for contour in &contours {
        for piece in map_polyline(&contour.points, contour.closed, &to_pixel) {
            if piece.len() < 2 {
                continue;
            }

            let mut pb = PathBuilder::new();
            pb.move_to(piece[0].0, piece[0].1);
            for &(x, y) in &piece[1..] {
                pb.line_to(x, y);
            }
            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }

            if opts.labels {
                let text = format_level(contour.level);
                collect_label_spots(
                    &piece,
                    &text,
                    opts.label_spacing,
                    opts.label_size,
                    pixmap.width() as f32,
                    pixmap.height() as f32,
                    &mut spots,
                );
            }
        }
    }

    if opts.labels && !spots.is_empty() {
        draw_label_spots(pixmap, &spots, opts.label_size, opts.color);
    }
}

/// Integer-style level label (the `%4.f` convention of pressure charts).
pub fn format_level(level: f32) -> String {
    if level.fract().abs() < 0.01 {
        format!("{:.0}", level)
    } else {
        format!("{:.1}", level)
    }
}

/// Map a polyline through the transform, splitting where it is invisible.
fn map_polyline<F>(points: &[Point], closed: bool, to_pixel: &F) -> Vec<Vec<(f32, f32)>>
where
    F: Fn(f64, f64) -> Option<(f32, f32)>,
{
    let mut pieces = Vec::new();
    let mut current: Vec<(f32, f32)> = Vec::new();

    let iter: Box<dyn Iterator<Item = &Point>> = if closed && !points.is_empty() {
        Box::new(points.iter().chain(std::iter::once(&points[0])))
    } else {
        Box::new(points.iter())
    };

    for p in iter {
        match to_pixel(p.x as f64, p.y as f64) {
            Some(px) => current.push(px),
            None => {
                if current.len() >= 2 {
                    pieces.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
    }
    if current.len() >= 2 {
        pieces.push(current);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_levels() {
        let levels = generate_levels(0.0, 20.0, 5.0);
        assert_eq!(levels, vec![0.0, 5.0, 10.0, 15.0, 20.0]);

        let levels = generate_levels(2.0, 18.0, 5.0);
        assert_eq!(levels, vec![5.0, 10.0, 15.0]);

        assert!(generate_levels(5.0, 5.0, 1.0).is_empty());
        assert!(generate_levels(0.0, 10.0, -1.0).is_empty());
    }

    #[test]
    fn test_round_interval() {
        assert_eq!(round_interval(0.0, 80.0, 8), 10.0);
        assert_eq!(round_interval(1000.0, 1040.0, 8), 5.0);
    }

    #[test]
    fn test_interpolate_edge() {
        let p = interpolate_edge(0.0, 0.0, 1.0, 0.0, 0.0, 10.0, 5.0);
        assert!((p.x - 0.5).abs() < 0.01);
        assert!((p.y - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_march_squares_flat() {
        let data = vec![5.0; 9];
        let segments = march_squares(&data, 3, 3, 5.0);
        assert_eq!(segments.len(), 0);
    }

    #[test]
    fn test_march_squares_peak() {
        let data = vec![
            0.0, 0.0, 0.0, //
            0.0, 10.0, 0.0, //
            0.0, 0.0, 0.0,
        ];
        let segments = march_squares(&data, 3, 3, 5.0);
        assert!(!segments.is_empty());

        // The contour around an interior peak closes on itself
        let contours = connect_segments(segments);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].closed);
    }

    #[test]
    fn test_march_squares_skips_nan() {
        let data = vec![
            f32::NAN, 0.0, 0.0, //
            0.0, 10.0, 0.0, //
            0.0, 0.0, 0.0,
        ];
        // The top-left cell touches the NaN corner and is skipped; the
        // other three cells each cross the level once.
        let segments = march_squares(&data, 3, 3, 5.0);
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn test_smooth_preserves_endpoints() {
        let contour = Contour {
            level: 0.0,
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)],
            closed: false,
        };
        let smoothed = smooth_contour(&contour, 2);
        assert_eq!(smoothed.points[0], Point::new(0.0, 0.0));
        assert_eq!(*smoothed.points.last().unwrap(), Point::new(2.0, 0.0));
        assert!(smoothed.points.len() > contour.points.len());
    }

    #[test]
    fn test_map_polyline_splits_on_invisible() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ];
        // x == 2 is invisible
        let pieces = map_polyline(&points, false, &|x, y| {
            if (x - 2.0).abs() < 0.1 {
                None
            } else {
                Some((x as f32, y as f32))
            }
        });
        assert_eq!(pieces.len(), 1); // the single-point tail is dropped
        assert_eq!(pieces[0].len(), 2);
    }

    #[test]
    fn test_format_level() {
        assert_eq!(format_level(1015.0), "1015");
        assert_eq!(format_level(2.5), "2.5");
        assert_eq!(format_level(-4.0), "-4");
    }
}
