//! Option structs for the chart entry points.

use crate::figure::Margins;
use crate::DEFAULT_SIZE;
use projection::{MapProjection, PlateCarree};
use renderer::basemap::{Coastlines, GraticuleOptions};
use renderer::contour::IsolineOptions;
use renderer::{Colormap, Rgba, StyleCatalog};

/// Options shared by the map chart entry points.
///
/// The defaults reproduce the standard look: Plate Carree figure and data
/// coordinates, built-in style catalog, dashed labeled graticule, no
/// coastlines until a GeoJSON file is supplied.
pub struct MapOptions {
    /// Edge length of the (square) figure in pixels
    pub size: u32,
    /// Figure-level title
    pub title: Option<String>,
    /// Colorbar caption
    pub caption: String,
    /// Figure coordinate system: what the map looks like
    pub fig_proj: Box<dyn MapProjection>,
    /// Data coordinate system: how the field coordinates are expressed
    pub data_proj: Box<dyn MapProjection>,
    /// Style catalog for variable families
    pub catalog: StyleCatalog,
    /// Coastline/land geometry; None draws the graticule only
    pub coastlines: Option<Coastlines>,
    /// Fill land polygons (used by comparison figures)
    pub land: bool,
    pub graticule: GraticuleOptions,
    pub isoline: IsolineOptions,
    /// Marker radius for scatter charts, in pixels
    pub marker_size: f32,
    pub margins: Margins,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            title: None,
            caption: String::new(),
            fig_proj: Box::new(PlateCarree::new()),
            data_proj: Box::new(PlateCarree::new()),
            catalog: StyleCatalog::builtin(),
            coastlines: None,
            land: false,
            graticule: GraticuleOptions::default(),
            isoline: IsolineOptions::default(),
            marker_size: 3.0,
            margins: Margins::default(),
        }
    }
}

/// Options for the 2x2 comparison figure.
pub struct ComparisonOptions {
    pub base: MapOptions,
    /// Per-panel titles, `titles[row][col]`
    pub titles: [[String; 2]; 2],
    /// Per-panel colorbar captions
    pub captions: [[String; 2]; 2],
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            base: MapOptions {
                land: true,
                ..Default::default()
            },
            titles: Default::default(),
            captions: Default::default(),
        }
    }
}

/// Options for the ensemble time-series charts.
#[derive(Debug, Clone)]
pub struct SeriesOptions {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Member line color (plumes)
    pub color: Rgba,
    pub line_width: f32,
    /// Member line opacity (plumes)
    pub alpha: f32,
    pub dashed: bool,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: 600,
            title: None,
            xlabel: None,
            ylabel: None,
            color: [100, 149, 237, 255], // cornflower blue
            line_width: 1.2,
            alpha: 0.2,
            dashed: true,
        }
    }
}

/// Options for the quantile fan chart.
#[derive(Debug, Clone)]
pub struct QuantileOptions {
    pub series: SeriesOptions,
    /// Quantile levels, ascending
    pub quantiles: Vec<f32>,
    /// Colormap sampled at the quantile value (a cyclic map works best)
    pub colormap: Colormap,
    /// Opacity of the shaded bands
    pub band_alpha: f32,
}

impl Default for QuantileOptions {
    fn default() -> Self {
        Self {
            series: SeriesOptions {
                dashed: false,
                ..Default::default()
            },
            quantiles: vec![0.1, 0.25, 0.5, 0.75, 0.9],
            colormap: Colormap::twilight(),
            band_alpha: 0.2,
        }
    }
}
