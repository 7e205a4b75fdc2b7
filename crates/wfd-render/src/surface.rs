//! The drawing surface abstraction.
//!
//! The designer never talks to a concrete graphics API. It emits a small set
//! of primitives (shapes, lines, text) onto a [`Surface`]; backends map them
//! onto an HTML canvas or a recording for tests.

use kurbo::{Affine, BezPath, Circle, Line, Point, RoundedRect, Shape};
use peniko::Color;
use wfd_core::{MonospaceMeasure, TextMeasure, Vector};

/// A drawable shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(RoundedRect),
    Circle(Circle),
    Line(Line),
    Path(BezPath),
}

impl Primitive {
    /// Outline as a Bézier path, for backends without native shapes.
    pub fn to_path(&self, tolerance: f64) -> BezPath {
        match self {
            Primitive::Rect(r) => r.to_path(tolerance),
            Primitive::Circle(c) => c.to_path(tolerance),
            Primitive::Line(l) => l.to_path(tolerance),
            Primitive::Path(p) => p.clone(),
        }
    }
}

/// An opaque canvas the designer draws onto. Text measurement comes from the
/// same surface so layout matches what is painted.
pub trait Surface: TextMeasure {
    fn fill(&mut self, shape: &Primitive, transform: Affine, color: Color);

    fn stroke(&mut self, shape: &Primitive, transform: Affine, color: Color, width: f64);

    /// Draw `text` centred on `center`.
    fn text(&mut self, text: &str, center: Point, transform: Affine, color: Color);
}

/// One recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawOp {
    Fill {
        shape: Primitive,
        transform: Affine,
        color: Color,
    },
    Stroke {
        shape: Primitive,
        transform: Affine,
        color: Color,
        width: f64,
    },
    Text {
        text: String,
        center: Point,
        transform: Affine,
        color: Color,
    },
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
    pub measure: MonospaceMeasure,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasure for Recorder {
    fn text_size(&self, text: &str) -> Vector {
        self.measure.text_size(text)
    }
}

impl Surface for Recorder {
    fn fill(&mut self, shape: &Primitive, transform: Affine, color: Color) {
        self.ops.push(DrawOp::Fill {
            shape: shape.clone(),
            transform,
            color,
        });
    }

    fn stroke(&mut self, shape: &Primitive, transform: Affine, color: Color, width: f64) {
        self.ops.push(DrawOp::Stroke {
            shape: shape.clone(),
            transform,
            color,
            width,
        });
    }

    fn text(&mut self, text: &str, center: Point, transform: Affine, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            center,
            transform,
            color,
        });
    }
}

pub(crate) fn point(v: Vector) -> Point {
    Point::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_outline_is_move_then_line() {
        let line = Primitive::Line(Line::new((0.0, 0.0), (10.0, 5.0)));
        let path = line.to_path(0.1);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 5.0)),
            ]
        );
    }

    #[test]
    fn circle_outline_is_curved() {
        let circle = Primitive::Circle(Circle::new((0.0, 0.0), 5.0));
        let path = circle.to_path(0.1);
        assert!(matches!(path.elements().first(), Some(PathEl::MoveTo(_))));
        assert!(path.elements().iter().any(|el| matches!(el, PathEl::CurveTo(..))));
    }
}
