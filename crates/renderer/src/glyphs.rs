//! Stroke-font text rendering.
//!
//! Characters are drawn as stroked line segments, so no font asset is
//! needed. Covers digits, uppercase letters, and the punctuation used in
//! chart captions; lowercase input is drawn with the uppercase shapes.

use crate::Rgba;
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Glyph width as a fraction of the font size.
pub const GLYPH_ASPECT: f32 = 0.6;

/// Spacing between glyphs as a fraction of the font size.
pub const GLYPH_SPACING: f32 = 0.1;

/// Width in pixels of a rendered string.
pub fn text_width(text: &str, size: f32) -> f32 {
    let n = text.chars().count();
    if n == 0 {
        return 0.0;
    }
    n as f32 * (size * GLYPH_ASPECT + size * GLYPH_SPACING) - size * GLYPH_SPACING
}

/// Draw text centered at (x, y), rotated by `angle` radians.
pub fn draw_text(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    angle: f32,
    text: &str,
    size: f32,
    color: Rgba,
) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    let char_width = size * GLYPH_ASPECT;
    let advance = char_width + size * GLYPH_SPACING;
    let total = text_width(text, size);

    let cos_a = angle.cos();
    let sin_a = angle.sin();
    let start_x = -total / 2.0;

    for (i, ch) in text.chars().enumerate() {
        let cx = start_x + i as f32 * advance + char_width / 2.0;
        // Rotate glyph center around the anchor
        let gx = cx * cos_a + x;
        let gy = cx * sin_a + y;
        draw_glyph(pixmap, gx, gy, angle, ch, char_width, size, &paint);
    }
}

/// Draw text with its left edge at (x, y), unrotated.
pub fn draw_text_left(pixmap: &mut Pixmap, x: f32, y: f32, text: &str, size: f32, color: Rgba) {
    let half = text_width(text, size) / 2.0;
    draw_text(pixmap, x + half, y, 0.0, text, size, color);
}

/// Draw text with its right edge at (x, y), unrotated.
pub fn draw_text_right(pixmap: &mut Pixmap, x: f32, y: f32, text: &str, size: f32, color: Rgba) {
    let half = text_width(text, size) / 2.0;
    draw_text(pixmap, x - half, y, 0.0, text, size, color);
}

fn draw_glyph(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    angle: f32,
    ch: char,
    width: f32,
    height: f32,
    paint: &Paint,
) {
    let segments = glyph_segments(ch, width / 2.0, height / 2.0);
    if segments.is_empty() {
        return;
    }

    let mut stroke = Stroke::default();
    stroke.width = (height * 0.09).max(1.0);
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;

    let cos_a = angle.cos();
    let sin_a = angle.sin();
    let rotate = |px: f32, py: f32| -> (f32, f32) {
        (px * cos_a - py * sin_a + x, px * sin_a + py * cos_a + y)
    };

    let mut pb = PathBuilder::new();
    for ((x1, y1), (x2, y2)) in segments {
        let (rx1, ry1) = rotate(x1, y1);
        let (rx2, ry2) = rotate(x2, y2);
        pb.move_to(rx1, ry1);
        pb.line_to(rx2, ry2);
    }

    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}

type Seg = ((f32, f32), (f32, f32));

/// Segment shapes per character. Coordinates are relative to the glyph
/// center: x in [-hw, hw], y in [-hh, hh] with negative y up.
fn glyph_segments(ch: char, hw: f32, hh: f32) -> Vec<Seg> {
    let ch = if ch.is_ascii_lowercase() {
        ch.to_ascii_uppercase()
    } else {
        ch
    };
    match ch {
        '0' | 'O' | 'D' => vec![
            ((-hw, -hh), (hw, -hh)),
            ((hw, -hh), (hw, hh)),
            ((hw, hh), (-hw, hh)),
            ((-hw, hh), (-hw, -hh)),
        ],
        '1' => vec![((0.0, -hh), (0.0, hh))],
        '2' => vec![
            ((-hw, -hh), (hw, -hh)),
            ((hw, -hh), (hw, 0.0)),
            ((hw, 0.0), (-hw, 0.0)),
            ((-hw, 0.0), (-hw, hh)),
            ((-hw, hh), (hw, hh)),
        ],
        '3' => vec![
            ((-hw, -hh), (hw, -hh)),
            ((hw, -hh), (hw, hh)),
            ((hw, hh), (-hw, hh)),
            ((-hw, 0.0), (hw, 0.0)),
        ],
        '4' => vec![
            ((-hw, -hh), (-hw, 0.0)),
            ((-hw, 0.0), (hw, 0.0)),
            ((hw, -hh), (hw, hh)),
        ],
        '5' | 'S' => vec![
            ((hw, -hh), (-hw, -hh)),
            ((-hw, -hh), (-hw, 0.0)),
            ((-hw, 0.0), (hw, 0.0)),
            ((hw, 0.0), (hw, hh)),
            ((hw, hh), (-hw, hh)),
        ],
        '6' => vec![
            ((hw, -hh), (-hw, -hh)),
            ((-hw, -hh), (-hw, hh)),
            ((-hw, hh), (hw, hh)),
            ((hw, hh), (hw, 0.0)),
            ((hw, 0.0), (-hw, 0.0)),
        ],
        '7' => vec![((-hw, -hh), (hw, -hh)), ((hw, -hh), (0.0, hh))],
        '8' | 'B' => vec![
            ((-hw, -hh), (hw, -hh)),
            ((hw, -hh), (hw, hh)),
            ((hw, hh), (-hw, hh)),
            ((-hw, hh), (-hw, -hh)),
            ((-hw, 0.0), (hw, 0.0)),
        ],
        '9' => vec![
            ((-hw, 0.0), (hw, 0.0)),
            ((hw, 0.0), (hw, -hh)),
            ((hw, -hh), (-hw, -hh)),
            ((-hw, -hh), (-hw, 0.0)),
            ((hw, 0.0), (hw, hh)),
        ],
        'A' => vec![
            ((-hw, hh), (0.0, -hh)),
            ((0.0, -hh), (hw, hh)),
            ((-hw * 0.5, 0.0), (hw * 0.5, 0.0)),
        ],
        'C' => vec![
            ((hw, -hh), (-hw, -hh)),
            ((-hw, -hh), (-hw, hh)),
            ((-hw, hh), (hw, hh)),
        ],
        'E' => vec![
            ((hw, -hh), (-hw, -hh)),
            ((-hw, -hh), (-hw, hh)),
            ((-hw, hh), (hw, hh)),
            ((-hw, 0.0), (hw * 0.6, 0.0)),
        ],
        'F' => vec![
            ((hw, -hh), (-hw, -hh)),
            ((-hw, -hh), (-hw, hh)),
            ((-hw, 0.0), (hw * 0.6, 0.0)),
        ],
        'G' => vec![
            ((hw, -hh), (-hw, -hh)),
            ((-hw, -hh), (-hw, hh)),
            ((-hw, hh), (hw, hh)),
            ((hw, hh), (hw, 0.0)),
            ((hw, 0.0), (0.0, 0.0)),
        ],
        'H' => vec![
            ((-hw, -hh), (-hw, hh)),
            ((hw, -hh), (hw, hh)),
            ((-hw, 0.0), (hw, 0.0)),
        ],
        'I' => vec![
            ((-hw * 0.6, -hh), (hw * 0.6, -hh)),
            ((0.0, -hh), (0.0, hh)),
            ((-hw * 0.6, hh), (hw * 0.6, hh)),
        ],
        'J' => vec![
            ((hw, -hh), (hw, hh)),
            ((hw, hh), (-hw, hh)),
            ((-hw, hh), (-hw, hh * 0.4)),
        ],
        'K' => vec![
            ((-hw, -hh), (-hw, hh)),
            ((hw, -hh), (-hw, 0.0)),
            ((-hw, 0.0), (hw, hh)),
        ],
        'L' => vec![((-hw, -hh), (-hw, hh)), ((-hw, hh), (hw, hh))],
        'M' => vec![
            ((-hw, hh), (-hw, -hh)),
            ((-hw, -hh), (0.0, 0.0)),
            ((0.0, 0.0), (hw, -hh)),
            ((hw, -hh), (hw, hh)),
        ],
        'N' => vec![
            ((-hw, hh), (-hw, -hh)),
            ((-hw, -hh), (hw, hh)),
            ((hw, hh), (hw, -hh)),
        ],
        'P' => vec![
            ((-hw, hh), (-hw, -hh)),
            ((-hw, -hh), (hw, -hh)),
            ((hw, -hh), (hw, 0.0)),
            ((hw, 0.0), (-hw, 0.0)),
        ],
        'Q' => vec![
            ((-hw, -hh), (hw, -hh)),
            ((hw, -hh), (hw, hh)),
            ((hw, hh), (-hw, hh)),
            ((-hw, hh), (-hw, -hh)),
            ((0.0, 0.0), (hw, hh)),
        ],
        'R' => vec![
            ((-hw, hh), (-hw, -hh)),
            ((-hw, -hh), (hw, -hh)),
            ((hw, -hh), (hw, 0.0)),
            ((hw, 0.0), (-hw, 0.0)),
            ((0.0, 0.0), (hw, hh)),
        ],
        'T' => vec![((-hw, -hh), (hw, -hh)), ((0.0, -hh), (0.0, hh))],
        'U' => vec![
            ((-hw, -hh), (-hw, hh)),
            ((-hw, hh), (hw, hh)),
            ((hw, hh), (hw, -hh)),
        ],
        'V' => vec![((-hw, -hh), (0.0, hh)), ((0.0, hh), (hw, -hh))],
        'W' => vec![
            ((-hw, -hh), (-hw * 0.5, hh)),
            ((-hw * 0.5, hh), (0.0, 0.0)),
            ((0.0, 0.0), (hw * 0.5, hh)),
            ((hw * 0.5, hh), (hw, -hh)),
        ],
        'X' => vec![((-hw, -hh), (hw, hh)), ((hw, -hh), (-hw, hh))],
        'Y' => vec![
            ((-hw, -hh), (0.0, 0.0)),
            ((hw, -hh), (0.0, 0.0)),
            ((0.0, 0.0), (0.0, hh)),
        ],
        'Z' => vec![
            ((-hw, -hh), (hw, -hh)),
            ((hw, -hh), (-hw, hh)),
            ((-hw, hh), (hw, hh)),
        ],
        '-' => vec![((-hw, 0.0), (hw, 0.0))],
        '+' => vec![((-hw, 0.0), (hw, 0.0)), ((0.0, -hh * 0.6), (0.0, hh * 0.6))],
        '.' => vec![((0.0, hh * 0.7), (0.0, hh * 0.85))],
        ',' => vec![((0.0, hh * 0.6), (-hw * 0.3, hh))],
        ':' => vec![
            ((0.0, -hh * 0.5), (0.0, -hh * 0.35)),
            ((0.0, hh * 0.35), (0.0, hh * 0.5)),
        ],
        '/' => vec![((-hw, hh), (hw, -hh))],
        '=' => vec![
            ((-hw, -hh * 0.3), (hw, -hh * 0.3)),
            ((-hw, hh * 0.3), (hw, hh * 0.3)),
        ],
        '(' => vec![
            ((hw * 0.2, -hh), (-hw * 0.3, -hh * 0.4)),
            ((-hw * 0.3, -hh * 0.4), (-hw * 0.3, hh * 0.4)),
            ((-hw * 0.3, hh * 0.4), (hw * 0.2, hh)),
        ],
        ')' => vec![
            ((-hw * 0.2, -hh), (hw * 0.3, -hh * 0.4)),
            ((hw * 0.3, -hh * 0.4), (hw * 0.3, hh * 0.4)),
            ((hw * 0.3, hh * 0.4), (-hw * 0.2, hh)),
        ],
        '%' => vec![
            ((hw, -hh), (-hw, hh)),
            ((-hw, -hh), (-hw * 0.4, -hh * 0.6)),
            ((hw * 0.4, hh * 0.6), (hw, hh)),
        ],
        '\u{00B0}' => vec![
            ((0.0, -hh), (hw * 0.35, -hh * 0.7)),
            ((hw * 0.35, -hh * 0.7), (0.0, -hh * 0.4)),
            ((0.0, -hh * 0.4), (-hw * 0.35, -hh * 0.7)),
            ((-hw * 0.35, -hh * 0.7), (0.0, -hh)),
        ],
        // Space and unknown characters: advance with no strokes
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 10.0), 0.0);
        let one = text_width("7", 10.0);
        assert!((one - 6.0).abs() < 1e-6);
        let three = text_width("999", 10.0);
        assert!((three - 20.0).abs() < 1e-6); // 3 glyphs + 2 gaps
    }

    #[test]
    fn test_draw_leaves_marks() {
        let mut pixmap = Pixmap::new(60, 30).unwrap();
        draw_text(&mut pixmap, 30.0, 15.0, 0.0, "42", 16.0, crate::BLACK);
        let touched = pixmap.pixels().iter().any(|p| p.alpha() > 0);
        assert!(touched);
    }

    #[test]
    fn test_unknown_glyph_is_blank() {
        assert!(glyph_segments('~', 1.0, 1.0).is_empty());
        assert!(glyph_segments(' ', 1.0, 1.0).is_empty());
    }
}
