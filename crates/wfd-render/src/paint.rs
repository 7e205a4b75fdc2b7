//! Workflow graph → surface drawing commands.
//!
//! Paint order mirrors the layer stack: background, grid, activities (body,
//! label, warning icon, connectors), then connections on top. Everything but
//! the background and grid is drawn in model space under the pan/zoom
//! transform.

use crate::color;
use crate::surface::{Primitive, Surface, point};
use crate::theme::Theme;
use kurbo::{Affine, BezPath, Circle, Line, Rect};
use wfd_core::layout::*;
use wfd_core::model::Activity;
use wfd_core::{Result, Vector, ViewTransform, WorkflowGraph};

/// Everything the painter needs besides the graph.
#[derive(Debug, Clone, Copy)]
pub struct PaintContext<'a> {
    pub transform: ViewTransform,
    /// Canvas size in view pixels.
    pub size: Vector,
    pub theme: &'a Theme,
}

impl PaintContext<'_> {
    fn view_affine(&self) -> Affine {
        Affine::translate((self.transform.scroll.x, self.transform.scroll.y))
            * Affine::scale(self.transform.scale)
    }
}

/// Paint the whole designer. Call once per frame on a cleared surface.
pub fn paint_designer<S: Surface>(
    surface: &mut S,
    graph: &WorkflowGraph,
    cx: &PaintContext<'_>,
) -> Result<()> {
    let canvas = Rect::new(0.0, 0.0, cx.size.x, cx.size.y).to_rounded_rect(0.0);
    surface.fill(&Primitive::Rect(canvas), Affine::IDENTITY, cx.theme.background);
    paint_grid(surface, cx);

    let view = cx.view_affine();
    for activity in graph.activities() {
        paint_activity(surface, activity, view, cx.theme);
    }
    for id in graph.unique_connections() {
        let geometry = graph.connection_geometry(id, &*surface)?;
        paint_connection(surface, &geometry, view, cx.theme);
    }
    Ok(())
}

/// Grid lines every `GRID_SIZE` model units, following pan and zoom.
pub fn paint_grid<S: Surface>(surface: &mut S, cx: &PaintContext<'_>) {
    let size = GRID_SIZE * cx.transform.scale;
    if size <= 0.0 || !size.is_finite() {
        return;
    }
    let start_x = cx.transform.scroll.x.rem_euclid(size);
    let start_y = cx.transform.scroll.y.rem_euclid(size);

    let mut x = start_x;
    while x <= cx.size.x {
        let line = Line::new((x, 0.0), (x, cx.size.y));
        surface.stroke(&Primitive::Line(line), Affine::IDENTITY, cx.theme.grid, 1.0);
        x += size;
    }
    let mut y = start_y;
    while y <= cx.size.y {
        let line = Line::new((0.0, y), (cx.size.x, y));
        surface.stroke(&Primitive::Line(line), Affine::IDENTITY, cx.theme.grid, 1.0);
        y += size;
    }
}

fn paint_activity<S: Surface>(surface: &mut S, activity: &Activity, view: Affine, theme: &Theme) {
    let Some(layout) = activity.layout else {
        log::trace!("PAINT skip @{} (no layout)", activity.name());
        return;
    };
    let at = view * Affine::translate((activity.position.x, activity.position.y));
    let fill = color::parse_or(&activity.color, theme.activity_fallback);

    let body = layout.body();
    let rect = Primitive::Rect(
        Rect::new(body.x, body.y, body.x + body.width, body.y + body.height)
            .to_rounded_rect(ACTIVITY_CORNER_RADIUS),
    );
    surface.fill(&rect, at, fill);
    let outline = if activity.is_selected {
        theme.selection
    } else {
        fill
    };
    surface.stroke(&rect, at, outline, 1.0);

    surface.text(&activity.label, point(layout.label_center()), at, theme.activity_text);

    if activity.is_invalid {
        let origin = layout.invalid_icon_origin();
        let icon = warning_icon(origin);
        surface.fill(&Primitive::Path(icon), at, theme.invalid_icon);
    }

    for (_, connector) in activity.all_connectors() {
        if let Some(offset) = connector.position {
            let center = offset.add(Vector::new(CONNECTOR_WIDTH, CONNECTOR_HEIGHT).divide_const(2.0));
            let circle = Circle::new(point(center), CONNECTOR_RADIUS);
            surface.fill(&Primitive::Circle(circle), at, theme.connector);
        }
    }
}

/// Line from output to input, a dot at the output end, an arrow head at the
/// input end, and the output name as a label when there is room.
pub fn paint_connection<S: Surface>(
    surface: &mut S,
    geometry: &ConnectionGeometry,
    view: Affine,
    theme: &Theme,
) {
    let line = Line::new(point(geometry.start), point(geometry.end));
    surface.stroke(&Primitive::Line(line), view, theme.connection, CONNECTION_STROKE_WIDTH);

    let dot = Circle::new(point(geometry.start), CONNECTION_END_SIZE / 2.0);
    surface.fill(&Primitive::Circle(dot), view, theme.connection);

    let arrow_at = view
        * Affine::translate((geometry.end.x, geometry.end.y))
        * Affine::rotate(geometry.arrow_angle.to_radians());
    surface.fill(&Primitive::Path(arrow_head()), arrow_at, theme.connection);

    if let Some(label) = &geometry.label {
        let r = label.rect;
        let rect = Rect::new(r.x, r.y, r.x + r.width, r.y + r.height).to_rounded_rect(3.0);
        surface.fill(&Primitive::Rect(rect), view, theme.label_background);
        surface.text(&label.text, point(label.center), view, theme.label_text);
    }
}

/// Triangle pointing down (+y) centred on the origin.
fn arrow_head() -> BezPath {
    let r = CONNECTION_END_SIZE / 3.0;
    let a = CONNECTION_END_SIZE / 3.0_f64.sqrt();
    let mut path = BezPath::new();
    path.move_to((-a, -r));
    path.line_to((a, -r));
    path.line_to((0.0, r * 2.0));
    path.close_path();
    path
}

/// Warning triangle with a cut-out exclamation mark.
fn warning_icon(origin: Vector) -> BezPath {
    let (w, h) = (ACTIVITY_INVALID_ICON_WIDTH, ACTIVITY_INVALID_ICON_HEIGHT);
    let (x, y) = (origin.x, origin.y);
    let mut path = BezPath::new();
    path.move_to((x + w / 2.0, y));
    path.line_to((x + w, y + h));
    path.line_to((x, y + h));
    path.close_path();
    // Exclamation bar and dot, wound the other way to punch through.
    let cx = x + w / 2.0;
    path.move_to((cx - 1.0, y + 4.0));
    path.line_to((cx - 1.0, y + h - 6.0));
    path.line_to((cx + 1.0, y + h - 6.0));
    path.line_to((cx + 1.0, y + 4.0));
    path.close_path();
    path.move_to((cx - 1.0, y + h - 4.0));
    path.line_to((cx - 1.0, y + h - 2.0));
    path.line_to((cx + 1.0, y + h - 2.0));
    path.line_to((cx + 1.0, y + h - 4.0));
    path.close_path();
    path
}
