//! CPU raster implementing [`Surface`], used for headless snapshots.
//!
//! The pixmap keeps an opaque RGB buffer in `f64` and composites every draw
//! call with source-over alpha blending, `dst = src * a + dst * (1 - a)`.
//! The opaque backdrop color plays the role of the page background that shows
//! through a freshly resized (transparent) canvas.

use glam::DVec2;

use crate::color::Rgba;
use crate::surface::{Size, Surface};

/// Opaque RGB raster with per-pixel alpha compositing.
#[derive(Debug, Clone)]
pub struct Pixmap {
    size: Size,
    background: Rgba,
    /// Row-major RGB triples in [0, 255].
    data: Vec<[f64; 3]>,
}

impl Pixmap {
    /// Creates a pixmap filled with `background` (its alpha is ignored).
    pub fn new(size: Size, background: Rgba) -> Self {
        let mut pixmap = Self {
            size,
            background,
            data: Vec::new(),
        };
        pixmap.reset();
        pixmap
    }

    fn reset(&mut self) {
        let bg = [
            self.background.r as f64,
            self.background.g as f64,
            self.background.b as f64,
        ];
        self.data.clear();
        self.data.resize(self.size.area() as usize, bg);
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// The pixel at `(x, y)` as opaque 8-bit RGB, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let px = self.data[y as usize * self.size.width as usize + x as usize];
        Some(px.map(|c| c.round().clamp(0.0, 255.0) as u8))
    }

    /// Flattens the raster into an RGBA8 buffer (alpha always 255).
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.data
            .iter()
            .flat_map(|px| {
                let [r, g, b] = px.map(|c| c.round().clamp(0.0, 255.0) as u8);
                [r, g, b, 255u8]
            })
            .collect()
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba, coverage: f64) {
        if x < 0 || y < 0 || x >= self.size.width as i64 || y >= self.size.height as i64 {
            return;
        }
        let a = (color.a * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = y as usize * self.size.width as usize + x as usize;
        let src = [color.r as f64, color.g as f64, color.b as f64];
        let dst = &mut self.data[idx];
        for c in 0..3 {
            dst[c] = src[c] * a + dst[c] * (1.0 - a);
        }
    }

    /// Visits every pixel center inside the disc, passing the distance from
    /// `center` to `f`.
    fn for_each_in_disc(
        &mut self,
        center: DVec2,
        radius: f64,
        mut f: impl FnMut(&mut Self, i64, i64, f64),
    ) {
        if radius <= 0.0 {
            return;
        }
        let x0 = (center.x - radius).floor() as i64;
        let x1 = (center.x + radius).ceil() as i64;
        let y0 = (center.y - radius).floor() as i64;
        let y1 = (center.y + radius).ceil() as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let d = DVec2::new(x as f64 + 0.5, y as f64 + 0.5).distance(center);
                if d <= radius {
                    f(self, x, y, d);
                }
            }
        }
    }

    fn stroke_segment(&mut self, a: DVec2, b: DVec2, line_width: f64, color: Rgba) {
        // Hairlines cover one pixel at partial strength, like canvas antialiasing.
        let coverage = line_width.min(1.0);
        let samples = (b - a).abs().max_element().ceil().max(1.0) as usize;
        let mut last = None;
        for i in 0..=samples {
            let p = a.lerp(b, i as f64 / samples as f64);
            let cell = (p.x.floor() as i64, p.y.floor() as i64);
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);
            self.blend(cell.0, cell.1, color, coverage);
        }
    }
}

impl Surface for Pixmap {
    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
        self.reset();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        let x0 = x.max(0.0).floor() as i64;
        let y0 = y.max(0.0).floor() as i64;
        let x1 = (x + width).min(self.size.width as f64).ceil() as i64;
        let y1 = (y + height).min(self.size.height as f64).ceil() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, 1.0);
            }
        }
    }

    fn stroke_polyline(&mut self, points: &[DVec2], line_width: f64, color: Rgba) {
        for pair in points.windows(2) {
            self.stroke_segment(pair[0], pair[1], line_width, color);
        }
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba, glow_blur: f64) {
        if glow_blur > 0.0 {
            let halo = radius + glow_blur;
            self.for_each_in_disc(center, halo, |pm, x, y, d| {
                if d > radius {
                    let falloff = 1.0 - (d - radius) / glow_blur;
                    pm.blend(x, y, color, 0.5 * falloff);
                }
            });
        }
        self.for_each_in_disc(center, radius, |pm, x, y, _| pm.blend(x, y, color, 1.0));
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        self.for_each_in_disc(center, radius, |pm, x, y, d| {
            pm.blend(x, y, inner.lerp(outer, d / radius), 1.0);
        });
    }
}
