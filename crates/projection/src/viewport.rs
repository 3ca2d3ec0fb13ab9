//! Mapping from projected coordinates to pixel coordinates.

use crate::ProjectionError;
use met_common::BoundingBox;

/// Maps a projected-coordinate extent onto a pixel rectangle, preserving
/// the aspect ratio of the extent and centering it.
///
/// Pixel y grows downward; projected y grows upward.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    bbox: BoundingBox,
    width: u32,
    height: u32,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Viewport {
    pub fn new(bbox: BoundingBox, width: u32, height: u32) -> Result<Self, ProjectionError> {
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 || width == 0 || height == 0 {
            return Err(ProjectionError::DegenerateExtent(format!(
                "extent {:.3}x{:.3} into {}x{} pixels",
                bbox.width(),
                bbox.height(),
                width,
                height
            )));
        }

        let scale_x = width as f64 / bbox.width();
        let scale_y = height as f64 / bbox.height();
        let scale = scale_x.min(scale_y);

        // Center the drawn extent in the pixel rectangle
        let offset_x = (width as f64 - bbox.width() * scale) / 2.0;
        let offset_y = (height as f64 - bbox.height() * scale) / 2.0;

        Ok(Self {
            bbox,
            width,
            height,
            scale,
            offset_x,
            offset_y,
        })
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Projected coordinates to pixel coordinates.
    pub fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let px = self.offset_x + (x - self.bbox.min_x) * self.scale;
        let py = self.offset_y + (self.bbox.max_y - y) * self.scale;
        (px as f32, py as f32)
    }

    /// Pixel coordinates back to projected coordinates.
    pub fn from_pixel(&self, px: f64, py: f64) -> (f64, f64) {
        let x = self.bbox.min_x + (px - self.offset_x) / self.scale;
        let y = self.bbox.max_y - (py - self.offset_y) / self.scale;
        (x, y)
    }
}
