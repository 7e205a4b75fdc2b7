//! Hit testing: point → visual element lookup.
//!
//! Walks activities in reverse paint order (last painted = topmost) and
//! reports the lowest-level element under the point: a connector circle
//! before the activity body it sits on. Connections are never hit; they are
//! drawn on a layer that lets the pointer through.

use wfd_core::layout::{CONNECTOR_RADIUS, connector_center};
use wfd_core::model::{Activity, ConnectorRef};
use wfd_core::{ActivityId, Bounds, Vector, ViewTransform, Viewport, WorkflowGraph};

/// The visual element under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// A connector circle.
    Connector(ConnectorRef),
    /// An activity's body, label, or icon.
    Activity(ActivityId),
    /// Empty canvas background.
    Canvas,
}

/// Find the topmost activity element at a model-space point.
/// Returns `None` if the point is over no activity.
pub fn hit_test(graph: &WorkflowGraph, point: Vector) -> Option<HitTarget> {
    graph
        .activities()
        .iter()
        .rev()
        .find_map(|activity| hit_test_activity(activity, point))
}

/// Resolve a page-coordinate point through the viewport and pan/zoom
/// transform. Points outside the canvas hit nothing.
pub fn hit_test_page(
    graph: &WorkflowGraph,
    viewport: &Viewport,
    transform: &ViewTransform,
    page: Vector,
) -> Option<HitTarget> {
    if !viewport.contains_page(page) {
        return None;
    }
    let model = transform.to_model(viewport.to_local(page));
    hit_test(graph, model).or(Some(HitTarget::Canvas))
}

fn hit_test_activity(activity: &Activity, point: Vector) -> Option<HitTarget> {
    let layout = activity.layout?;

    for (r, connector) in activity.all_connectors() {
        if let Some(offset) = connector.position {
            let center = connector_center(activity.position, offset);
            if center.distance(point) <= CONNECTOR_RADIUS {
                return Some(HitTarget::Connector(r));
            }
        }
    }

    let body: Bounds = layout.body().translate(activity.position);
    body.contains(point).then(|| HitTarget::Activity(activity.id()))
}
