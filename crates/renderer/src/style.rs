//! Color styles per variable family.
//!
//! A style catalog maps variable-family names (e.g. "temperature",
//! "wind_speed") to discrete color levels used for filled-level plots and
//! to continuous colormaps used for shaded plots. The built-in tables can
//! be overridden or extended from JSON files in the shape
//! `{"name", "N", "bounds", "colors"}` with color components in [0, 1].

use crate::colormap::Colormap;
use crate::Rgba;
use met_common::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Discrete color levels: `bounds.len() == colors.len() + 1`.
///
/// Values are binned between consecutive bounds; values outside the range
/// clamp into the extreme bins (the "extend both ends" convention).
#[derive(Debug, Clone)]
pub struct ColorLevels {
    pub name: String,
    pub bounds: Vec<f32>,
    pub colors: Vec<Rgba>,
}

impl ColorLevels {
    /// Color for a data value. None only for NaN.
    pub fn color_for(&self, value: f32) -> Option<Rgba> {
        if value.is_nan() {
            return None;
        }
        let last = self.colors.len() - 1;
        // bounds[i] <= value < bounds[i+1] selects colors[i]
        for i in 0..self.colors.len() {
            if value < self.bounds[i + 1] {
                return Some(self.colors[i]);
            }
        }
        Some(self.colors[last])
    }

    /// Interior bounds, i.e. all except the outermost two. These are the
    /// values the colorbar ticks are drawn at.
    pub fn interior_bounds(&self) -> &[f32] {
        &self.bounds[1..self.bounds.len() - 1]
    }
}

/// On-disk form of a discrete color scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelScaleFile {
    pub name: String,
    #[serde(rename = "N")]
    pub n: usize,
    pub bounds: Vec<f32>,
    /// RGB or RGBA components in [0, 1]
    pub colors: Vec<Vec<f32>>,
}

impl LevelScaleFile {
    fn into_levels(self) -> ChartResult<ColorLevels> {
        if self.colors.len() != self.n {
            return Err(ChartError::InvalidStyle(format!(
                "{}: N={} but {} colors",
                self.name,
                self.n,
                self.colors.len()
            )));
        }
        if self.bounds.len() != self.colors.len() + 1 {
            return Err(ChartError::InvalidStyle(format!(
                "{}: {} bounds do not enclose {} colors",
                self.name,
                self.bounds.len(),
                self.colors.len()
            )));
        }
        if self.bounds.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ChartError::InvalidStyle(format!(
                "{}: bounds must be strictly increasing",
                self.name
            )));
        }

        let mut colors = Vec::with_capacity(self.colors.len());
        for (i, c) in self.colors.iter().enumerate() {
            let rgba = match c.as_slice() {
                [r, g, b] => unit_rgba(*r, *g, *b, 1.0),
                [r, g, b, a] => unit_rgba(*r, *g, *b, *a),
                _ => {
                    return Err(ChartError::InvalidStyle(format!(
                        "{}: color {} has {} components",
                        self.name,
                        i,
                        c.len()
                    )))
                }
            };
            colors.push(rgba);
        }

        Ok(ColorLevels {
            name: self.name,
            bounds: self.bounds,
            colors,
        })
    }
}

fn unit_rgba(r: f32, g: f32, b: f32, a: f32) -> Rgba {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(r), q(g), q(b), q(a)]
}

/// Catalog of styles keyed by variable family.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    levels: HashMap<String, ColorLevels>,
}

impl StyleCatalog {
    /// Catalog with the built-in families: temperature, wind, radar.
    pub fn builtin() -> Self {
        let mut levels = HashMap::new();
        levels.insert("temperature".to_string(), temperature_levels());
        levels.insert("wind".to_string(), wind_levels());
        levels.insert("radar".to_string(), radar_levels());
        Self { levels }
    }

    /// Discrete color levels for a variable family. Aliases are resolved
    /// ("T", "temp", "FF", "RR", ...); unknown families are an error.
    pub fn color_levels(&self, family: &str) -> ChartResult<&ColorLevels> {
        let key = canonical_levels_family(family)
            .ok_or_else(|| ChartError::UnknownFamily(family.to_string()))?;
        self.levels
            .get(key)
            .or_else(|| self.levels.get(family))
            .ok_or_else(|| ChartError::UnknownFamily(family.to_string()))
    }

    /// Continuous colormap for a variable family. Unknown families fall
    /// back to the default colormap.
    pub fn colormap(&self, family: &str) -> Colormap {
        if canonical_levels_family(family) == Some("temperature") {
            Colormap::rainbow()
        } else if canonical_levels_family(family) == Some("wind") {
            Colormap::spring()
        } else if family.eq_ignore_ascii_case("diff") {
            Colormap::bwr()
        } else {
            Colormap::viridis()
        }
    }

    /// Register (or replace) a discrete scale from its JSON form. The
    /// scale is stored under its own name.
    pub fn insert_levels_json(&mut self, json: &str) -> ChartResult<()> {
        let file: LevelScaleFile = serde_json::from_str(json)?;
        let levels = file.into_levels()?;
        self.levels.insert(levels.name.clone(), levels);
        Ok(())
    }

    /// Register a discrete scale from a JSON file on disk.
    pub fn load_levels_file(&mut self, path: &Path) -> ChartResult<()> {
        let content = std::fs::read_to_string(path)?;
        self.insert_levels_json(&content)
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve variable-family aliases for discrete levels.
fn canonical_levels_family(family: &str) -> Option<&'static str> {
    match family {
        "T" | "temp" | "temperature" => Some("temperature"),
        _ if family.starts_with("air_temperature") => Some("temperature"),
        "FF" | "wind" | "wind_speed" => Some("wind"),
        "RR" | "radar" | "precipitation" => Some("radar"),
        _ => None,
    }
}

/// 2 degC bins from -32 to 42 degC over the ECMWF surface-temperature
/// palette.
fn temperature_levels() -> ColorLevels {
    let rgb: [[u8; 3]; 37] = [
        [76, 76, 76],
        [102, 102, 102],
        [128, 128, 128],
        [153, 153, 153],
        [179, 179, 179],
        [204, 204, 204],
        [89, 0, 153],
        [128, 0, 230],
        [153, 51, 255],
        [191, 102, 255],
        [217, 153, 255],
        [0, 0, 191],
        [0, 0, 255],
        [51, 102, 255],
        [102, 179, 255],
        [153, 230, 255],
        [0, 140, 48],
        [38, 191, 25],
        [128, 217, 0],
        [166, 243, 0],
        [204, 255, 51],
        [166, 166, 0],
        [204, 204, 0],
        [235, 235, 0],
        [255, 255, 0],
        [255, 255, 153],
        [217, 115, 0],
        [255, 128, 0],
        [255, 158, 0],
        [255, 189, 0],
        [255, 217, 0],
        [153, 0, 0],
        [204, 0, 0],
        [255, 0, 0],
        [255, 102, 102],
        [255, 153, 153],
        [255, 191, 191],
    ];
    ColorLevels {
        name: "temperature".to_string(),
        bounds: (0..=37).map(|i| -32.0 + 2.0 * i as f32).collect(),
        colors: rgb.iter().map(|&[r, g, b]| [r, g, b, 255]).collect(),
    }
}

/// Wind-speed bins in knots.
fn wind_levels() -> ColorLevels {
    let colors: [Rgba; 12] = [
        [255, 255, 255, 255], // white
        [173, 216, 230, 255], // lightblue
        [176, 196, 222, 255], // lightsteelblue
        [100, 149, 237, 255], // cornflowerblue
        [65, 105, 225, 255],  // royalblue
        [154, 205, 50, 255],  // yellowgreen
        [50, 205, 50, 255],   // limegreen
        [255, 255, 0, 255],   // yellow
        [255, 165, 0, 255],   // orange
        [255, 0, 0, 255],     // red
        [165, 42, 42, 255],   // brown
        [0, 0, 0, 255],       // black
    ];
    ColorLevels {
        name: "wind".to_string(),
        bounds: vec![
            0.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 300.0,
        ],
        colors: colors.to_vec(),
    }
}

/// Precipitation-rate bins in mm; the zero bin is fully transparent.
fn radar_levels() -> ColorLevels {
    let colors: [Rgba; 10] = [
        [255, 255, 255, 0],
        [255, 163, 52, 255],
        [116, 255, 78, 255],
        [0, 205, 61, 255],
        [0, 255, 254, 255],
        [133, 207, 232, 255],
        [30, 22, 246, 255],
        [241, 129, 232, 255],
        [211, 23, 140, 255],
        [153, 153, 153, 255],
    ];
    ColorLevels {
        name: "radar".to_string(),
        bounds: vec![0.0, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 25.0, 50.0, 100.0, 200.0],
        colors: colors.to_vec(),
    }
}
