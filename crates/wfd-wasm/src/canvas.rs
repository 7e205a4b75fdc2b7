//! Canvas2D backend.
//!
//! Maps designer primitives onto an HTML `<canvas>` through
//! `CanvasRenderingContext2d`. Every draw call sets its own transform inside
//! a `save`/`restore` pair so calls never leak state into each other.

use wasm_bindgen::JsValue;
use wfd_core::{MonospaceMeasure, TextMeasure, Vector};
use wfd_render::color::to_hex;
use wfd_render::kurbo::{Affine, PathEl, Point};
use wfd_render::peniko::Color;
use wfd_render::{Primitive, Surface};
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule};

/// Font used for activity and connection labels.
pub const LABEL_FONT: &str = "12px Inter, system-ui, sans-serif";
const LINE_HEIGHT: f64 = 14.0;
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Measures label text with the canvas's own font metrics.
#[derive(Clone)]
pub struct CanvasMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasMeasure {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for CanvasMeasure {
    fn text_size(&self, text: &str) -> Vector {
        measure(&self.ctx, text)
    }
}

fn measure(ctx: &CanvasRenderingContext2d, text: &str) -> Vector {
    ctx.save();
    ctx.set_font(LABEL_FONT);
    let metrics = ctx.measure_text(text);
    ctx.restore();
    match metrics {
        Ok(m) => Vector::new(m.width(), LINE_HEIGHT),
        Err(err) => {
            log::warn!("measure_text failed: {err:?}");
            MonospaceMeasure::default().text_size(text)
        }
    }
}

/// A [`Surface`] drawing straight onto a 2D context.
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn begin(&self, transform: Affine) {
        self.ctx.save();
        let [a, b, c, d, e, f] = transform.as_coeffs();
        check(self.ctx.set_transform(a, b, c, d, e, f));
    }

    fn trace(&self, shape: &Primitive) {
        self.ctx.begin_path();
        for el in shape.to_path(FLATTEN_TOLERANCE).elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => {
                    self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
    }
}

impl TextMeasure for CanvasSurface<'_> {
    fn text_size(&self, text: &str) -> Vector {
        measure(self.ctx, text)
    }
}

impl Surface for CanvasSurface<'_> {
    fn fill(&mut self, shape: &Primitive, transform: Affine, color: Color) {
        self.begin(transform);
        self.trace(shape);
        self.ctx.set_fill_style_str(&to_hex(color));
        match shape {
            // Cut-outs in icons rely on even-odd filling.
            Primitive::Path(_) => self
                .ctx
                .fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd),
            _ => self.ctx.fill(),
        }
        self.ctx.restore();
    }

    fn stroke(&mut self, shape: &Primitive, transform: Affine, color: Color, width: f64) {
        self.begin(transform);
        self.trace(shape);
        self.ctx.set_stroke_style_str(&to_hex(color));
        self.ctx.set_line_width(width);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn text(&mut self, text: &str, center: Point, transform: Affine, color: Color) {
        self.begin(transform);
        self.ctx.set_font(LABEL_FONT);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&to_hex(color));
        check(self.ctx.fill_text(text, center.x, center.y));
        self.ctx.restore();
    }
}

fn check(result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::warn!("canvas call failed: {err:?}");
    }
}
