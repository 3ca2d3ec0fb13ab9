//! Common types shared across the metcharts crates.

pub mod bbox;
pub mod ensemble;
pub mod error;
pub mod field;
pub mod time;

pub use bbox::BoundingBox;
pub use ensemble::EnsembleSeries;
pub use error::{ChartError, ChartResult};
pub use field::{GridCoords, ScalarField};
pub use time::{lead_time_label, valid_time, RunTime};
