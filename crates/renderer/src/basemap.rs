//! Basemap decorations: graticule, coastlines, land fill.
//!
//! Coastline and land geometry comes from GeoJSON (e.g. a Natural Earth
//! export); nothing is bundled. With no geometry configured a map panel
//! still gets its graticule.

use crate::{glyphs, Rgba};
use met_common::{BoundingBox, ChartError, ChartResult};
use projection::{MapProjection, Viewport};
use serde_json::Value;
use std::path::Path;
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

/// Graticule (meridian/parallel grid) options.
#[derive(Debug, Clone)]
pub struct GraticuleOptions {
    /// Spacing in degrees; None picks a round value from the extent
    pub interval: Option<f64>,
    pub color: Rgba,
    pub line_width: f32,
    pub dashed: bool,
    /// Degree labels on the left and bottom edges
    pub labels: bool,
    pub label_size: f32,
}

impl Default for GraticuleOptions {
    fn default() -> Self {
        Self {
            interval: None,
            color: [90, 90, 90, 180],
            line_width: 1.0,
            dashed: true,
            labels: true,
            label_size: 9.0,
        }
    }
}

/// Round graticule spacing for a geographic extent.
fn auto_interval(geo: &BoundingBox) -> f64 {
    let span = geo.width().max(geo.height());
    for candidate in [0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 45.0] {
        if span / candidate <= 7.0 {
            return candidate;
        }
    }
    45.0
}

fn degree_label_lon(lon: f64) -> String {
    let lon = projection::normalize_lon(lon);
    if lon == 0.0 {
        "0\u{00B0}".to_string()
    } else if lon < 0.0 {
        format!("{}\u{00B0}W", format_degrees(-lon))
    } else {
        format!("{}\u{00B0}E", format_degrees(lon))
    }
}

fn degree_label_lat(lat: f64) -> String {
    if lat == 0.0 {
        "0\u{00B0}".to_string()
    } else if lat < 0.0 {
        format!("{}\u{00B0}S", format_degrees(-lat))
    } else {
        format!("{}\u{00B0}N", format_degrees(lat))
    }
}

fn format_degrees(v: f64) -> String {
    if v.fract().abs() < 1e-9 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Draw the graticule for a geographic extent.
///
/// `origin` is the pixel offset of the viewport inside the pixmap; degree
/// labels are drawn just outside the left and bottom viewport edges.
pub fn draw_graticule(
    pixmap: &mut Pixmap,
    origin: (f32, f32),
    fig_proj: &dyn MapProjection,
    geo: &BoundingBox,
    vp: &Viewport,
    opts: &GraticuleOptions,
) {
    let interval = opts.interval.unwrap_or_else(|| auto_interval(geo));
    if interval <= 0.0 {
        return;
    }

    let to_pixel = |lon: f64, lat: f64| -> Option<(f32, f32)> {
        let (x, y) = fig_proj.project(lon, lat)?;
        let (px, py) = vp.to_pixel(x, y);
        if px < -0.5 || py < -0.5 || px > vp.width() as f32 + 0.5 || py > vp.height() as f32 + 0.5
        {
            return None;
        }
        Some((origin.0 + px, origin.1 + py))
    };

    let first_lon = (geo.min_x / interval).ceil() * interval;
    let first_lat = (geo.min_y / interval).ceil() * interval;
    const SAMPLES: usize = 64;

    // Meridians
    let mut lon = first_lon;
    while lon <= geo.max_x + 1e-9 {
        let points: Vec<Option<(f32, f32)>> = (0..=SAMPLES)
            .map(|k| {
                let lat = geo.min_y + geo.height() * k as f64 / SAMPLES as f64;
                to_pixel(lon, lat)
            })
            .collect();
        stroke_pieces(pixmap, &points, opts);

        if opts.labels {
            if let Some((px, _)) = to_pixel(lon, geo.min_y) {
                glyphs::draw_text(
                    pixmap,
                    px,
                    origin.1 + vp.height() as f32 + opts.label_size,
                    0.0,
                    &degree_label_lon(lon),
                    opts.label_size,
                    crate::BLACK,
                );
            }
        }
        lon += interval;
    }

    // Parallels
    let mut lat = first_lat;
    while lat <= geo.max_y + 1e-9 {
        let points: Vec<Option<(f32, f32)>> = (0..=SAMPLES)
            .map(|k| {
                let lon = geo.min_x + geo.width() * k as f64 / SAMPLES as f64;
                to_pixel(lon, lat)
            })
            .collect();
        stroke_pieces(pixmap, &points, opts);

        if opts.labels {
            if let Some((_, py)) = to_pixel(geo.min_x, lat) {
                glyphs::draw_text_right(
                    pixmap,
                    origin.0 - 4.0,
                    py,
                    &degree_label_lat(lat),
                    opts.label_size,
                    crate::BLACK,
                );
            }
        }
        lat += interval;
    }
}

/// Stroke a polyline with gaps where points are None.
fn stroke_pieces(pixmap: &mut Pixmap, points: &[Option<(f32, f32)>], opts: &GraticuleOptions) {
    let mut paint = Paint::default();
    paint.set_color_rgba8(opts.color[0], opts.color[1], opts.color[2], opts.color[3]);
    paint.anti_alias = true;

    let mut stroke = Stroke::default();
    stroke.width = opts.line_width;
    stroke.line_cap = LineCap::Round;
    stroke.line_join = LineJoin::Round;
    if opts.dashed {
        stroke.dash = StrokeDash::new(vec![5.0, 4.0], 0.0);
    }

    let mut pb = PathBuilder::new();
    let mut piece_len = 0usize;
    for p in points {
        match p {
            Some((x, y)) => {
                if piece_len == 0 {
                    pb.move_to(*x, *y);
                } else {
                    pb.line_to(*x, *y);
                }
                piece_len += 1;
            }
            None => piece_len = 0,
        }
    }

    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

/// Coastline and land geometry in geographic coordinates.
#[derive(Debug, Clone, Default)]
pub struct Coastlines {
    /// Outlines (rings and lines) to stroke
    lines: Vec<Vec<(f64, f64)>>,
    /// Closed exterior rings to fill as land
    polygons: Vec<Vec<(f64, f64)>>,
}

impl Coastlines {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.polygons.is_empty()
    }

    /// Parse GeoJSON: FeatureCollection, Feature, or a bare geometry.
    /// Supports LineString, MultiLineString, Polygon, and MultiPolygon;
    /// interior rings of polygons are stroked but not subtracted from the
    /// land fill.
    pub fn from_geojson_str(text: &str) -> ChartResult<Self> {
        let root: Value = serde_json::from_str(text)?;
        let mut out = Self::default();
        collect_geometry(&root, &mut out)?;
        if out.is_empty() {
            return Err(ChartError::InvalidCoordinates(
                "GeoJSON contains no usable line or polygon geometry".to_string(),
            ));
        }
        Ok(out)
    }

    pub fn from_file(path: &Path) -> ChartResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_geojson_str(&text)
    }

    /// Stroke the outlines.
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        origin: (f32, f32),
        fig_proj: &dyn MapProjection,
        vp: &Viewport,
        color: Rgba,
        line_width: f32,
    ) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = true;

        let mut stroke = Stroke::default();
        stroke.width = line_width;
        stroke.line_cap = LineCap::Round;
        stroke.line_join = LineJoin::Round;

        let mut pb = PathBuilder::new();
        for ring in self.lines.iter().chain(self.polygons.iter()) {
            let mut piece_len = 0usize;
            for &(lon, lat) in ring {
                match self.to_pixel(lon, lat, origin, fig_proj, vp) {
                    Some((x, y)) => {
                        if piece_len == 0 {
                            pb.move_to(x, y);
                        } else {
                            pb.line_to(x, y);
                        }
                        piece_len += 1;
                    }
                    None => piece_len = 0,
                }
            }
        }

        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    /// Fill land polygons. Polygons that are partly invisible in the
    /// figure projection are skipped rather than distorted.
    pub fn draw_land(
        &self,
        pixmap: &mut Pixmap,
        origin: (f32, f32),
        fig_proj: &dyn MapProjection,
        vp: &Viewport,
        fill: Rgba,
    ) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(fill[0], fill[1], fill[2], fill[3]);
        paint.anti_alias = true;

        let mut pb = PathBuilder::new();
        'rings: for ring in &self.polygons {
            let mut mapped = Vec::with_capacity(ring.len());
            for &(lon, lat) in ring {
                match self.to_pixel_unclipped(lon, lat, origin, fig_proj, vp) {
                    Some(p) => mapped.push(p),
                    None => continue 'rings,
                }
            }
            if mapped.len() < 3 {
                continue;
            }
            pb.move_to(mapped[0].0, mapped[0].1);
            for &(x, y) in &mapped[1..] {
                pb.line_to(x, y);
            }
            pb.close();
        }

        if let Some(path) = pb.finish() {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    fn to_pixel(
        &self,
        lon: f64,
        lat: f64,
        origin: (f32, f32),
        fig_proj: &dyn MapProjection,
        vp: &Viewport,
    ) -> Option<(f32, f32)> {
        let (px, py) = self.to_pixel_unclipped(lon, lat, origin, fig_proj, vp)?;
        let (w, h) = (vp.width() as f32, vp.height() as f32);
        // Generous clip margin keeps strokes continuous at the edge
        if px < origin.0 - w || py < origin.1 - h || px > origin.0 + 2.0 * w || py > origin.1 + 2.0 * h {
            return None;
        }
        Some((px, py))
    }

    fn to_pixel_unclipped(
        &self,
        lon: f64,
        lat: f64,
        origin: (f32, f32),
        fig_proj: &dyn MapProjection,
        vp: &Viewport,
    ) -> Option<(f32, f32)> {
        let (x, y) = fig_proj.project(lon, lat)?;
        let (px, py) = vp.to_pixel(x, y);
        Some((origin.0 + px, origin.1 + py))
    }
}

fn collect_geometry(value: &Value, out: &mut Coastlines) -> ChartResult<()> {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            if let Some(features) = value.get("features").and_then(Value::as_array) {
                for f in features {
                    collect_geometry(f, out)?;
                }
            }
        }
        Some("Feature") => {
            if let Some(geom) = value.get("geometry") {
                collect_geometry(geom, out)?;
            }
        }
        Some("LineString") => {
            if let Some(ring) = parse_ring(value.get("coordinates")) {
                out.lines.push(ring);
            }
        }
        Some("MultiLineString") => {
            if let Some(rings) = value.get("coordinates").and_then(Value::as_array) {
                for r in rings {
                    if let Some(ring) = parse_ring(Some(r)) {
                        out.lines.push(ring);
                    }
                }
            }
        }
        Some("Polygon") => parse_polygon(value.get("coordinates"), out),
        Some("MultiPolygon") => {
            if let Some(polys) = value.get("coordinates").and_then(Value::as_array) {
                for p in polys {
                    parse_polygon(Some(p), out);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_polygon(coords: Option<&Value>, out: &mut Coastlines) {
    if let Some(rings) = coords.and_then(Value::as_array) {
        for (i, r) in rings.iter().enumerate() {
            if let Some(ring) = parse_ring(Some(r)) {
                if i == 0 {
                    out.polygons.push(ring.clone());
                }
                out.lines.push(ring);
            }
        }
    }
}

fn parse_ring(coords: Option<&Value>) -> Option<Vec<(f64, f64)>> {
    let arr = coords?.as_array()?;
    let mut ring = Vec::with_capacity(arr.len());
    for pos in arr {
        let pos = pos.as_array()?;
        let lon = pos.first()?.as_f64()?;
        let lat = pos.get(1)?.as_f64()?;
        ring.push((lon, lat));
    }
    if ring.len() >= 2 {
        Some(ring)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::PlateCarree;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-10.0, 50.0], [-5.0, 50.0], [-5.0, 55.0], [-10.0, 55.0], [-10.0, 50.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[0.0, 45.0], [2.0, 47.0]]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_geojson() {
        let coast = Coastlines::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(coast.polygons.len(), 1);
        assert_eq!(coast.lines.len(), 2); // polygon ring + line string
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(Coastlines::from_geojson_str(r#"{"type": "FeatureCollection", "features": []}"#).is_err());
        assert!(Coastlines::from_geojson_str("not json").is_err());
    }

    #[test]
    fn test_draw_land_and_lines() {
        let coast = Coastlines::from_geojson_str(SAMPLE).unwrap();
        let proj = PlateCarree::new();
        let vp = Viewport::new(BoundingBox::new(-20.0, 40.0, 10.0, 60.0), 120, 80).unwrap();
        let mut pixmap = Pixmap::new(120, 80).unwrap();
        coast.draw_land(&mut pixmap, (0.0, 0.0), &proj, &vp, [200, 200, 180, 128]);
        coast.draw(&mut pixmap, (0.0, 0.0), &proj, &vp, crate::BLACK, 0.5);
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }

    #[test]
    fn test_auto_interval() {
        assert_eq!(auto_interval(&BoundingBox::new(-20.0, 45.0, 3.0, 60.0)), 5.0);
        assert_eq!(auto_interval(&BoundingBox::new(-180.0, -90.0, 180.0, 90.0)), 45.0);
    }

    #[test]
    fn test_degree_labels() {
        assert_eq!(degree_label_lon(-20.0), "20\u{00B0}W");
        assert_eq!(degree_label_lon(15.0), "15\u{00B0}E");
        assert_eq!(degree_label_lat(-30.0), "30\u{00B0}S");
        assert_eq!(degree_label_lat(52.5), "52.5\u{00B0}N");
        assert_eq!(degree_label_lat(0.0), "0\u{00B0}");
    }

    #[test]
    fn test_graticule_draws() {
        let proj = PlateCarree::new();
        let geo = BoundingBox::new(-20.0, 45.0, 3.0, 60.0);
        let vp = Viewport::new(geo, 100, 100).unwrap();
        let mut pixmap = Pixmap::new(140, 140).unwrap();
        draw_graticule(
            &mut pixmap,
            (20.0, 10.0),
            &proj,
            &geo,
            &vp,
            &GraticuleOptions::default(),
        );
        assert!(pixmap.pixels().iter().any(|p| p.alpha() > 0));
    }
}
