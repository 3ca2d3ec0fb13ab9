//! Inline label placement along polylines.
//!
//! Labels are spaced evenly along each line, rotated to follow it, kept
//! away from the canvas edges, and skipped when they would overlap an
//! already placed label. A translucent backing box keeps them readable
//! over filled fields.

use crate::{glyphs, Rgba};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

/// Position and orientation of one label.
#[derive(Debug, Clone)]
pub struct LabelSpot {
    pub x: f32,
    pub y: f32,
    /// Rotation in radians
    pub angle: f32,
    pub text: String,
}

fn polyline_length(points: &[(f32, f32)]) -> f32 {
    let mut length = 0.0;
    for w in points.windows(2) {
        length += (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1);
    }
    length
}

/// Collect label spots along a polyline in pixel coordinates.
pub fn collect_label_spots(
    points: &[(f32, f32)],
    text: &str,
    spacing: f32,
    font_size: f32,
    canvas_width: f32,
    canvas_height: f32,
    spots: &mut Vec<LabelSpot>,
) {
    if points.len() < 2 {
        return;
    }
    let total_length = polyline_length(points);
    if total_length < spacing * 0.5 {
        return; // too short for a label
    }

    let margin = font_size * 2.0;
    let num_labels = ((total_length / spacing).floor() as usize).max(1);
    let step = total_length / (num_labels as f32 + 1.0);

    let mut accumulated = 0.0;
    let mut next_at = step;
    let mut placed = 0;

    for w in points.windows(2) {
        if placed >= num_labels {
            break;
        }

        let (x1, y1) = w[0];
        let (x2, y2) = w[1];
        let dx = x2 - x1;
        let dy = y2 - y1;
        let seg_len = dx.hypot(dy);
        if seg_len <= 0.0 {
            continue;
        }

        while accumulated + seg_len >= next_at && placed < num_labels {
            let t = (next_at - accumulated) / seg_len;
            let x = x1 + t * dx;
            let y = y1 + t * dy;

            if x > margin && x < canvas_width - margin && y > margin && y < canvas_height - margin
            {
                let angle = dy.atan2(dx);
                // Keep text upright
                let angle = if angle.abs() > std::f32::consts::FRAC_PI_2 {
                    angle + std::f32::consts::PI
                } else {
                    angle
                };

                let min_distance = font_size * 4.0;
                let overlaps = spots.iter().any(|s| {
                    (s.x - x).powi(2) + (s.y - y).powi(2) < min_distance * min_distance
                });

                if !overlaps {
                    spots.push(LabelSpot {
                        x,
                        y,
                        angle,
                        text: text.to_string(),
                    });
                }
            }

            next_at += step;
            placed += 1;
        }

        accumulated += seg_len;
    }
}

/// Draw collected labels: a translucent white backing box, then the text.
pub fn draw_label_spots(pixmap: &mut Pixmap, spots: &[LabelSpot], font_size: f32, color: Rgba) {
    for spot in spots {
        draw_backing(pixmap, spot, font_size);
        glyphs::draw_text(
            pixmap, spot.x, spot.y, spot.angle, &spot.text, font_size, color,
        );
    }
}

fn draw_backing(pixmap: &mut Pixmap, spot: &LabelSpot, font_size: f32) {
    let pad = font_size * 0.2;
    let half_w = glyphs::text_width(&spot.text, font_size) / 2.0 + pad;
    let half_h = font_size / 2.0 + pad;

    let cos_a = spot.angle.cos();
    let sin_a = spot.angle.sin();

    let corners = [
        (-half_w, -half_h),
        (half_w, -half_h),
        (half_w, half_h),
        (-half_w, half_h),
    ];

    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 220);
    paint.anti_alias = true;

    let mut pb = PathBuilder::new();
    for (i, (cx, cy)) in corners.iter().enumerate() {
        let rx = cx * cos_a - cy * sin_a + spot.x;
        let ry = cx * sin_a + cy * cos_a + spot.y;
        if i == 0 {
            pb.move_to(rx, ry);
        } else {
            pb.line_to(rx, ry);
        }
    }
    pb.close();

    if let Some(path) = pb.finish() {
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_line(len: f32) -> Vec<(f32, f32)> {
        vec![(10.0, 100.0), (10.0 + len, 100.0)]
    }

    #[test]
    fn test_short_line_gets_no_label() {
        let mut spots = Vec::new();
        collect_label_spots(&horizontal_line(20.0), "5", 150.0, 10.0, 500.0, 200.0, &mut spots);
        assert!(spots.is_empty());
    }

    #[test]
    fn test_long_line_gets_labels() {
        let mut spots = Vec::new();
        collect_label_spots(&horizontal_line(400.0), "1015", 150.0, 10.0, 500.0, 200.0, &mut spots);
        assert!(!spots.is_empty());
        for s in &spots {
            assert_eq!(s.text, "1015");
            assert!(s.angle.abs() < 1e-6);
        }
    }

    #[test]
    fn test_labels_avoid_edges() {
        let mut spots = Vec::new();
        // Line hugging the top edge of the canvas
        let points = vec![(0.0, 2.0), (400.0, 2.0)];
        collect_label_spots(&points, "7", 100.0, 10.0, 400.0, 300.0, &mut spots);
        assert!(spots.is_empty());
    }

    #[test]
    fn test_labels_do_not_overlap() {
        let mut spots = Vec::new();
        collect_label_spots(&horizontal_line(400.0), "1", 50.0, 10.0, 500.0, 200.0, &mut spots);
        for (i, a) in spots.iter().enumerate() {
            for b in spots.iter().skip(i + 1) {
                let dist = (a.x - b.x).hypot(a.y - b.y);
                assert!(dist >= 40.0, "labels too close: {}", dist);
            }
        }
    }

    #[test]
    fn test_draw_label_spots_marks_canvas() {
        let mut pixmap = Pixmap::new(200, 100).unwrap();
        let spots = vec![LabelSpot {
            x: 100.0,
            y: 50.0,
            angle: 0.0,
            text: "42".to_string(),
        }];
        draw_label_spots(&mut pixmap, &spots, 12.0, crate::BLACK);
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }
}
