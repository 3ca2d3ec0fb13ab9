//! Figure canvas and panel geometry.

use met_common::{ChartError, ChartResult};
use renderer::{glyphs, png};
use std::path::Path;
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

/// Default edge length of a square figure in pixels.
pub const DEFAULT_SIZE: u32 = 900;

/// Panel margins in pixels around the plot area.
#[derive(Debug, Clone, Copy)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 64.0,
            right: 100.0,
            top: 40.0,
            bottom: 46.0,
        }
    }
}

/// Plot-area rectangle inside a panel.
#[derive(Debug, Clone, Copy)]
pub struct PlotRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Margins {
    /// Plot rectangle for a panel of the given size.
    pub fn plot_rect(&self, panel_w: u32, panel_h: u32) -> ChartResult<PlotRect> {
        let w = panel_w as f32 - self.left - self.right;
        let h = panel_h as f32 - self.top - self.bottom;
        if w < 16.0 || h < 16.0 {
            return Err(ChartError::RenderError(format!(
                "panel of {}x{} px leaves no room for the plot area",
                panel_w, panel_h
            )));
        }
        Ok(PlotRect {
            x: self.left,
            y: self.top,
            w,
            h,
        })
    }
}

/// A rendered figure: an RGBA canvas the chart functions draw onto.
pub struct Figure {
    pixmap: Pixmap,
}

impl Figure {
    /// White canvas of the given size.
    pub fn new(width: u32, height: u32) -> ChartResult<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            ChartError::RenderError(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        pixmap.fill(Color::WHITE);
        Ok(Self { pixmap })
    }

    /// Square canvas with the default figure size.
    pub fn square(size: u32) -> ChartResult<Self> {
        Self::new(size, size)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Composite a panel onto the canvas at a pixel offset.
    pub fn blit(&mut self, panel: &Pixmap, x: i32, y: i32) {
        self.pixmap.draw_pixmap(
            x,
            y,
            panel.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Figure-level title, centered near the top edge.
    pub fn draw_title(&mut self, text: &str) {
        let cx = self.width() as f32 / 2.0;
        glyphs::draw_text(
            &mut self.pixmap,
            cx,
            16.0,
            0.0,
            text,
            14.0,
            renderer::BLACK,
        );
    }

    /// Encode the canvas as PNG bytes.
    pub fn to_png(&self) -> ChartResult<Vec<u8>> {
        let rgba = png::pixmap_to_rgba(&self.pixmap);
        png::encode_auto(&rgba, self.width() as usize, self.height() as usize)
    }

    /// Encode and write to a file.
    pub fn save_png(&self, path: &Path) -> ChartResult<()> {
        let bytes = self.to_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_white() {
        let fig = Figure::new(8, 8).unwrap();
        let p = fig.pixmap().pixels()[0].demultiply();
        assert_eq!((p.red(), p.green(), p.blue(), p.alpha()), (255, 255, 255, 255));
    }

    #[test]
    fn test_plot_rect() {
        let m = Margins::default();
        let rect = m.plot_rect(450, 450).unwrap();
        assert_eq!(rect.x, 64.0);
        assert_eq!(rect.y, 40.0);
        assert_eq!(rect.w, 450.0 - 164.0);
        assert!(m.plot_rect(100, 20).is_err());
    }

    #[test]
    fn test_to_png_signature() {
        let fig = Figure::new(16, 16).unwrap();
        let bytes = fig.to_png().unwrap();
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_blit() {
        let mut fig = Figure::new(16, 16).unwrap();
        let mut panel = Pixmap::new(4, 4).unwrap();
        panel.fill(Color::from_rgba8(255, 0, 0, 255));
        fig.blit(&panel, 2, 2);
        let idx = (2 * 16 + 2) as usize;
        let p = fig.pixmap().pixels()[idx].demultiply();
        assert_eq!((p.red(), p.green(), p.blue()), (255, 0, 0));
    }
}
