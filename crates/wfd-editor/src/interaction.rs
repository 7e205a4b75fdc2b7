//! Click classification: which kind of drag a press on an element starts.

use wfd_core::model::{Activity, ConnectorRef, Direction};
use wfd_core::{ActivityId, WorkflowGraph};
use wfd_render::HitTarget;

/// The drag a press starts. Named after what moves: pressing an input
/// connector drags the output end of a connection, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    MoveOutputConnection,
    MoveInputConnection,
    MoveActivity,
    Scroll,
}

impl InteractionKind {
    /// Kind reported by a press on a connector of the given direction.
    pub fn for_connector(direction: Direction) -> Self {
        match direction {
            Direction::Input => Self::MoveOutputConnection,
            Direction::Output => Self::MoveInputConnection,
        }
    }

    /// Kind a connection drag must be dropped on to complete.
    pub fn drop_target(self) -> Option<Self> {
        match self {
            Self::MoveOutputConnection => Some(Self::MoveInputConnection),
            Self::MoveInputConnection => Some(Self::MoveOutputConnection),
            Self::MoveActivity | Self::Scroll => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionInfo {
    pub kind: InteractionKind,
    pub activity: Option<ActivityId>,
    pub connector: Option<ConnectorRef>,
}

impl InteractionInfo {
    pub fn scroll() -> Self {
        Self {
            kind: InteractionKind::Scroll,
            activity: None,
            connector: None,
        }
    }

    fn connector(connector: ConnectorRef) -> Self {
        Self {
            kind: InteractionKind::for_connector(connector.direction),
            activity: Some(connector.activity),
            connector: Some(connector),
        }
    }

    fn activity(id: ActivityId) -> Self {
        Self {
            kind: InteractionKind::MoveActivity,
            activity: Some(id),
            connector: None,
        }
    }
}

/// Classify a hit. Activities are scanned in order; for each one its input
/// connectors, then its output connectors, then its body. A hit that belongs
/// to no activity but lies on the canvas starts a pan. Anything else is
/// `None`.
pub fn check_click(graph: &WorkflowGraph, target: Option<HitTarget>) -> Option<InteractionInfo> {
    let target = target?;
    if let Some(info) = graph
        .activities()
        .iter()
        .find_map(|activity| activity_check_click(activity, target))
    {
        return Some(info);
    }
    match target {
        HitTarget::Canvas => Some(InteractionInfo::scroll()),
        HitTarget::Connector(_) | HitTarget::Activity(_) => {
            log::debug!("CLICK stale target {target:?}");
            None
        }
    }
}

fn activity_check_click(activity: &Activity, target: HitTarget) -> Option<InteractionInfo> {
    match target {
        HitTarget::Connector(r) if r.activity == activity.id() => activity
            .all_connectors()
            .find(|(candidate, _)| *candidate == r)
            .map(|(r, _)| InteractionInfo::connector(r)),
        HitTarget::Activity(id) if id == activity.id() => Some(InteractionInfo::activity(id)),
        _ => None,
    }
}
