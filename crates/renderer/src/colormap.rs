//! Continuous colormaps as piecewise-linear gradients.

use crate::Rgba;

/// A colormap sampled at positions t in [0, 1].
#[derive(Debug, Clone)]
pub struct Colormap {
    name: &'static str,
    /// (position, color) stops, positions strictly increasing from 0 to 1
    stops: Vec<(f32, Rgba)>,
}

impl Colormap {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sample the gradient; t is clamped to [0, 1].
    pub fn sample(&self, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let mut prev = self.stops[0];
        for &stop in &self.stops[1..] {
            if t <= stop.0 {
                let span = stop.0 - prev.0;
                let frac = if span > 0.0 { (t - prev.0) / span } else { 0.0 };
                return lerp_color(prev.1, stop.1, frac);
            }
            prev = stop;
        }
        self.stops[self.stops.len() - 1].1
    }

    /// Spectral violet-to-red map (temperature shades).
    pub fn rainbow() -> Self {
        Self {
            name: "rainbow",
            stops: vec![
                (0.0, [138, 43, 226, 255]),
                (1.0 / 6.0, [0, 0, 255, 255]),
                (2.0 / 6.0, [0, 255, 255, 255]),
                (3.0 / 6.0, [0, 255, 0, 255]),
                (4.0 / 6.0, [255, 255, 0, 255]),
                (5.0 / 6.0, [255, 165, 0, 255]),
                (1.0, [255, 0, 0, 255]),
            ],
        }
    }

    /// Magenta-to-yellow map (wind shades).
    pub fn spring() -> Self {
        Self {
            name: "spring",
            stops: vec![(0.0, [255, 0, 255, 255]), (1.0, [255, 255, 0, 255])],
        }
    }

    /// Blue-white-red diverging map (difference fields).
    pub fn bwr() -> Self {
        Self {
            name: "bwr",
            stops: vec![
                (0.0, [0, 0, 255, 255]),
                (0.5, [255, 255, 255, 255]),
                (1.0, [255, 0, 0, 255]),
            ],
        }
    }

    /// Perceptually uniform default map.
    pub fn viridis() -> Self {
        Self {
            name: "viridis",
            stops: vec![
                (0.0, [68, 1, 84, 255]),
                (0.25, [59, 82, 139, 255]),
                (0.5, [33, 145, 140, 255]),
                (0.75, [94, 201, 98, 255]),
                (1.0, [253, 231, 37, 255]),
            ],
        }
    }

    /// Cyclic map: light at both ends, dark at the center. Used for
    /// quantile charts so that symmetric quantiles get related colors.
    pub fn twilight() -> Self {
        Self {
            name: "twilight",
            stops: vec![
                (0.0, [225, 216, 226, 255]),
                (0.25, [97, 118, 183, 255]),
                (0.5, [47, 20, 54, 255]),
                (0.75, [181, 95, 91, 255]),
                (1.0, [225, 216, 226, 255]),
            ],
        }
    }
}

/// Linear interpolation between two colors.
pub fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    [
        (a[0] as f32 * t_inv + b[0] as f32 * t) as u8,
        (a[1] as f32 * t_inv + b[1] as f32 * t) as u8,
        (a[2] as f32 * t_inv + b[2] as f32 * t) as u8,
        (a[3] as f32 * t_inv + b[3] as f32 * t) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let cmap = Colormap::spring();
        assert_eq!(cmap.sample(0.0), [255, 0, 255, 255]);
        assert_eq!(cmap.sample(1.0), [255, 255, 0, 255]);
    }

    #[test]
    fn test_midpoint_interpolation() {
        let cmap = Colormap::bwr();
        let mid = cmap.sample(0.25);
        // Halfway from blue to white
        assert_eq!(mid[0], 127);
        assert_eq!(mid[2], 255);
    }

    #[test]
    fn test_clamping_and_nan() {
        let cmap = Colormap::viridis();
        assert_eq!(cmap.sample(-1.0), cmap.sample(0.0));
        assert_eq!(cmap.sample(2.0), cmap.sample(1.0));
        assert_eq!(cmap.sample(f32::NAN), cmap.sample(0.0));
    }

    #[test]
    fn test_twilight_is_cyclic() {
        let cmap = Colormap::twilight();
        assert_eq!(cmap.sample(0.0), cmap.sample(1.0));
    }
}
