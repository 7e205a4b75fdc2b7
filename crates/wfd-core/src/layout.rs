//! Layout engine: activity sizing, connector placement, and connection
//! geometry.
//!
//! All coordinates are unscaled model space. Connector positions are offsets
//! from their activity's top-left corner; absolute positions are derived on
//! every query from the activity's live position and never cached.

use crate::model::Activity;
use crate::vector::Vector;

// ─── Constants ───────────────────────────────────────────────────────────

pub const DESIGNER_MIN_SCALE: f64 = 0.3;
pub const DESIGNER_MAX_SCALE: f64 = 2.0;
pub const DESIGNER_SCALE_STEP: f64 = 0.15;

pub const GRID_SIZE: f64 = 20.0;

pub const ACTIVITY_MIN_WIDTH: f64 = 90.0;
pub const ACTIVITY_HEIGHT: f64 = 40.0;
pub const ACTIVITY_LABEL_PADDING_X: f64 = 60.0;
pub const ACTIVITY_CORNER_RADIUS: f64 = 3.0;

pub const ACTIVITY_INVALID_ICON_WIDTH: f64 = 17.0;
pub const ACTIVITY_INVALID_ICON_HEIGHT: f64 = 15.0;

pub const CONNECTOR_WIDTH: f64 = 24.0;
pub const CONNECTOR_HEIGHT: f64 = 18.0;
pub const CONNECTOR_RADIUS: f64 = CONNECTOR_HEIGHT / 2.0;

pub const CONNECTION_STROKE_WIDTH: f64 = 5.0;
pub const CONNECTION_END_SIZE: f64 = 11.0;
pub const CONNECTION_LABEL_MIN_DISTANCE: f64 = 35.0;
pub const CONNECTION_LABEL_PADDING: Vector = Vector::new(10.0, 6.0);

/// Default duration of programmatic scroll animations.
pub const SCROLL_DURATION_MS: f64 = 300.0;

// ─── Text measurement ────────────────────────────────────────────────────

/// Measures rendered text. Supplied by the drawing surface, since only it
/// knows the font in use.
pub trait TextMeasure {
    /// Width and height of `text` as it would be drawn.
    fn text_size(&self, text: &str) -> Vector;
}

/// Fixed-advance measurement for surfaces without font metrics.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 14.0,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_size(&self, text: &str) -> Vector {
        Vector::new(
            text.chars().count() as f64 * self.char_width,
            self.line_height,
        )
    }
}

// ─── Bounds ──────────────────────────────────────────────────────────────

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of `size` centred on `center`.
    pub fn centered(center: Vector, size: Vector) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    pub fn contains(&self, p: Vector) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Vector {
        Vector::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translate(&self, by: Vector) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.width, self.height)
    }
}

// ─── Viewport ────────────────────────────────────────────────────────────

/// Where the canvas surface sits on the page, and how big it is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Page coordinates of the canvas's top-left corner.
    pub origin: Vector,
    pub size: Vector,
}

impl Viewport {
    pub fn new(origin: Vector, size: Vector) -> Self {
        Self { origin, size }
    }

    /// Page → canvas-local coordinates.
    pub fn to_local(&self, page: Vector) -> Vector {
        page.subtract(self.origin)
    }

    pub fn contains_page(&self, page: Vector) -> bool {
        Bounds::new(self.origin.x, self.origin.y, self.size.x, self.size.y).contains(page)
    }
}

/// Pan/zoom transform between model space and canvas-local view space:
/// `view = model * scale + scroll`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub scroll: Vector,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scroll: Vector::ZERO,
        }
    }
}

impl ViewTransform {
    pub fn to_model(&self, view: Vector) -> Vector {
        view.subtract(self.scroll).divide_const(self.scale)
    }

    pub fn to_view(&self, model: Vector) -> Vector {
        model.multiply_const(self.scale).add(self.scroll)
    }
}

// ─── Activity layout ─────────────────────────────────────────────────────

/// Measured geometry of one activity, relative to its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityLayout {
    pub width: f64,
    pub label_width: f64,
}

impl ActivityLayout {
    /// The coloured body. It starts half a connector below the origin so
    /// input connectors straddle its top edge.
    pub fn body(&self) -> Bounds {
        Bounds::new(0.0, CONNECTOR_HEIGHT / 2.0, self.width, ACTIVITY_HEIGHT)
    }

    pub fn label_center(&self) -> Vector {
        Vector::new(
            self.width / 2.0,
            ACTIVITY_HEIGHT / 2.0 + CONNECTOR_HEIGHT / 2.0,
        )
    }

    /// Top-left of the warning icon drawn for invalid activities.
    pub fn invalid_icon_origin(&self) -> Vector {
        let center = self.label_center();
        let icon_x = (self.width - self.label_width) / 4.0;
        Vector::new(
            icon_x - ACTIVITY_INVALID_ICON_WIDTH / 2.0,
            center.y - ACTIVITY_INVALID_ICON_HEIGHT / 2.0,
        )
    }
}

/// Size the activity around its label and connectors, then place the
/// connectors: inputs centred along the top edge, outputs along the bottom,
/// in list order left to right.
pub fn layout_activity(activity: &mut Activity, measure: &dyn TextMeasure) -> ActivityLayout {
    let inputs_width = activity.inputs.len() as f64 * CONNECTOR_WIDTH;
    let outputs_width = activity.outputs.len() as f64 * CONNECTOR_WIDTH;
    let label_width = measure.text_size(&activity.label).x;

    let width = inputs_width
        .max(outputs_width)
        .max(label_width + ACTIVITY_LABEL_PADDING_X)
        .max(ACTIVITY_MIN_WIDTH);
    let inputs_offset_x = (width - inputs_width) / 2.0;
    let outputs_offset_x = (width - outputs_width) / 2.0;

    for (i, connector) in activity.inputs.iter_mut().enumerate() {
        connector.position = Some(Vector::new(
            CONNECTOR_WIDTH * i as f64 + inputs_offset_x,
            0.0,
        ));
    }
    for (o, connector) in activity.outputs.iter_mut().enumerate() {
        connector.position = Some(Vector::new(
            CONNECTOR_WIDTH * o as f64 + outputs_offset_x,
            ACTIVITY_HEIGHT,
        ));
    }

    let layout = ActivityLayout { width, label_width };
    activity.layout = Some(layout);
    log::trace!(
        "LAYOUT @{} width={} inputs={} outputs={}",
        activity.name(),
        width,
        activity.inputs.len(),
        activity.outputs.len()
    );
    layout
}

/// Centre of a connector placed at `offset` inside an activity at
/// `activity_position`.
pub fn connector_center(activity_position: Vector, offset: Vector) -> Vector {
    activity_position
        .add(offset)
        .add(Vector::new(CONNECTOR_WIDTH, CONNECTOR_HEIGHT).divide_const(2.0))
}

// ─── Connection geometry ─────────────────────────────────────────────────

/// Label drawn at the middle of a long enough connection.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub text: String,
    pub center: Vector,
    /// Background box around the text.
    pub rect: Bounds,
}

/// Derived drawing geometry of one connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionGeometry {
    /// Output end (start circle).
    pub start: Vector,
    /// Input end (arrow head).
    pub end: Vector,
    /// Rotation of the arrow head in degrees.
    pub arrow_angle: f64,
    pub label: Option<LabelPlacement>,
}

impl ConnectionGeometry {
    /// `label` is the output connector's name, present only when the output
    /// end is attached.
    pub fn between(
        start: Vector,
        end: Vector,
        label: Option<&str>,
        measure: &dyn TextMeasure,
    ) -> Self {
        let arrow_angle = start.angle_deg(end) - 270.0;
        let label = label
            .filter(|_| start.distance(end) > CONNECTION_LABEL_MIN_DISTANCE)
            .map(|text| {
                let center = start.midpoint(end);
                let size = measure.text_size(text).add(CONNECTION_LABEL_PADDING);
                LabelPlacement {
                    text: text.to_string(),
                    center,
                    rect: Bounds::centered(center, size),
                }
            });
        Self {
            start,
            end,
            arrow_angle,
            label,
        }
    }
}
