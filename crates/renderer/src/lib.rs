//! Rendering primitives for meteorological charts.
//!
//! Implements the drawing layers the chart compositions are built from:
//! - Color styles per variable family (discrete levels and colormaps)
//! - Filled fields (discrete level bins and continuous shades)
//! - Isolines (marching squares) with inline labels
//! - Basemap decorations (graticule, coastlines, land)
//! - Colorbars
//! - Stroke-font text
//! - PNG encoding

pub mod basemap;
pub mod colorbar;
pub mod colormap;
pub mod contour;
pub mod fill;
pub mod glyphs;
pub mod labels;
pub mod png;
pub mod style;

pub use colormap::Colormap;
pub use style::{ColorLevels, StyleCatalog};

/// Straight-alpha RGBA color.
pub type Rgba = [u8; 4];

pub const BLACK: Rgba = [0, 0, 0, 255];
pub const WHITE: Rgba = [255, 255, 255, 255];
