//! [`Surface`] over a `<canvas>` 2D rendering context.

use std::f64::consts::TAU;

use backdrop_core::{BackdropError, DVec2, Rgba, Size, Surface};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Takes the canvas's 2D context.
    ///
    /// Fails with `SurfaceUnavailable` if the canvas already holds a context
    /// of another kind or the browser refuses one.
    pub fn acquire(canvas: HtmlCanvasElement) -> Result<Self, BackdropError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| BackdropError::SurfaceUnavailable("getContext(\"2d\") threw".into()))?
            .ok_or_else(|| BackdropError::SurfaceUnavailable("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BackdropError::SurfaceUnavailable("not a 2d context".into()))?;
        Ok(Self { canvas, ctx })
    }

    fn circle_path(&self, center: DVec2, radius: f64) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Size {
        Size::new(self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, size: Size) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_polyline(&mut self, points: &[DVec2], line_width: f64, color: Rgba) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.is_empty() {
            return;
        }
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.set_stroke_style_str(&color.to_string());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba, glow_blur: f64) {
        let css = color.to_string();
        if glow_blur > 0.0 {
            self.ctx.set_shadow_blur(glow_blur);
            self.ctx.set_shadow_color(&css);
        }
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&css);
        self.ctx.fill();
        if glow_blur > 0.0 {
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn fill_radial_gradient(&mut self, center: DVec2, radius: f64, inner: Rgba, outer: Rgba) {
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)
        else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &inner.to_string());
        let _ = gradient.add_color_stop(1.0, &outer.to_string());
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle_path(center, radius);
        self.ctx.fill();
    }
}
