//! Pre-composed meteorological charts.
//!
//! Entry points mirror common forecast-chart conventions:
//! - [`mapchart::isolines`] — isoline map (e.g. mean sea-level pressure)
//! - [`mapchart::color_levels`] — discrete filled levels with a colorbar
//! - [`mapchart::color_shades`] — continuous shading with a colorbar
//! - [`mapchart::scatter`] — station values on a map
//! - [`mapchart::two_var_plot`] — isolines over filled levels
//! - [`mapchart::two_var_comparison`] — 2x2 figure comparing two states
//! - [`series::plumes`] — ensemble spaghetti plot
//! - [`series::quantiles`] — ensemble quantile fan chart
//!
//! Every entry point returns a [`Figure`] that can keep being drawn on
//! and finally encoded to PNG.

pub mod axes;
pub mod figure;
pub mod mapchart;
pub mod opts;
pub mod series;

pub use figure::{Figure, Margins, DEFAULT_SIZE};
pub use mapchart::{
    color_levels, color_shades, isolines, scatter, two_var_comparison, two_var_plot,
};
pub use opts::{ComparisonOptions, MapOptions, QuantileOptions, SeriesOptions};
pub use series::{plumes, quantiles};
