//! The drawing surface abstraction and its manager.
//!
//! A [`Surface`] is the 2D raster the backdrop paints onto: a browser canvas
//! context, the CPU [`Pixmap`](crate::raster::Pixmap), or a
//! [`RecordingSurface`] in tests. The engine only ever issues the five draw
//! primitives below and never reads pixels back.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Pixel dimensions of a surface or viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel count, computed in u64 so 4K-and-up viewports cannot overflow.
    pub fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether `p` lies within `[0, width] x [0, height]` (edges inclusive).
    pub fn contains(self, p: DVec2) -> bool {
        p.x >= 0.0 && p.x <= self.width as f64 && p.y >= 0.0 && p.y <= self.height as f64
    }
}

/// A 2D drawing target.
///
/// This trait is **object-safe**; fields draw through `&mut dyn Surface`.
pub trait Surface {
    /// Current pixel dimensions.
    fn size(&self) -> Size;

    /// Resizes the backing store. Like a canvas, resizing discards content.
    fn set_size(&mut self, size: Size);

    /// Fills an axis-aligned rectangle, blending with `color.a`.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba);

    /// Strokes one connected path through `points`, in order.
    fn stroke_polyline(&mut self, points: &[DVec2], line_width: f64, color: Rgba);

    /// Fills a solid circle. A positive `glow_blur` adds a soft halo of the
    /// same color, like canvas `shadowBlur`.
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba, glow_blur: f64);

    /// Fills a circle with a radial gradient from `inner` at the center to
    /// `outer` at `radius`.
    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba);
}

/// Owns the surface and keeps its dimensions in step with the viewport.
#[derive(Debug)]
pub struct SurfaceManager<S> {
    surface: S,
}

impl<S: Surface> SurfaceManager<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Sets the surface to exactly the viewport's pixel dimensions.
    ///
    /// Anything derived from the old size (particle counts, node layout) is
    /// now stale; the caller re-initializes its field afterwards.
    pub fn resize(&mut self, viewport: Size) {
        self.surface.set_size(viewport);
    }

    /// Paints a translucent rectangle over the whole surface.
    ///
    /// This is the only way old content decays: each frame partially covers
    /// the previous one, which leaves short glowing trails behind moving
    /// strokes. There is no clear.
    pub fn fade(&mut self, color: Rgba) {
        let size = self.surface.size();
        self.surface
            .fill_rect(0.0, 0.0, size.width as f64, size.height as f64, color);
    }

    pub fn size(&self) -> Size {
        self.surface.size()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_inner(self) -> S {
        self.surface
    }
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    },
    StrokePolyline {
        points: Vec<DVec2>,
        line_width: f64,
        color: Rgba,
    },
    FillCircle {
        center: DVec2,
        radius: f64,
        color: Rgba,
        glow_blur: f64,
    },
    FillRadialGradient {
        center: DVec2,
        radius: f64,
        inner: Rgba,
        outer: Rgba,
    },
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Size,
    calls: Vec<DrawCall>,
    resizes: usize,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            calls: Vec::new(),
            resizes: 0,
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Number of `set_size` calls seen so far.
    pub fn resizes(&self) -> usize {
        self.resizes
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn strokes(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::StrokePolyline { .. }))
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes().count()
    }

    pub fn circle_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillCircle { .. }))
            .count()
    }

    pub fn gradient_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRadialGradient { .. }))
            .count()
    }

    pub fn rect_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillRect { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
        self.resizes += 1;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        self.calls.push(DrawCall::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[DVec2], line_width: f64, color: Rgba) {
        self.calls.push(DrawCall::StrokePolyline {
            points: points.to_vec(),
            line_width,
            color,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba, glow_blur: f64) {
        self.calls.push(DrawCall::FillCircle {
            center,
            radius,
            color,
            glow_blur,
        });
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        self.calls.push(DrawCall::FillRadialGradient {
            center,
            radius,
            inner,
            outer,
        });
    }
}
