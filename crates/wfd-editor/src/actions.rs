//! Drag actions and one-shot gestures.
//!
//! A drag runs `start → move* → finish` against the shared
//! [`DesignerState`]. Selection and edit requests are not applied here;
//! actions return [`HostRequest`]s and the host façade applies them so its
//! notifications fire.
//!
//! | Press on         | Action                 | Read-only |
//! |------------------|------------------------|-----------|
//! | activity body    | [`MoveActivityAction`] | ignored   |
//! | connector        | [`MoveConnectionAction`] | ignored |
//! | empty canvas     | [`ScrollAction`]       | allowed   |

use crate::input::Interaction;
use crate::interaction::{InteractionInfo, InteractionKind, check_click};
use crate::state::DesignerState;
use wfd_core::model::{ConnectorRef, Direction};
use wfd_core::{ActivityId, ConnectionId, Result, Vector};
use wfd_render::HitTarget;

/// Something only the host façade may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRequest {
    Select(ActivityId),
    Unselect,
    EditRequested(ActivityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    MoveActivity,
    MoveConnection,
    Scroll,
}

/// A drag in progress.
pub trait Action {
    fn kind(&self) -> ActionKind;

    fn start(&mut self, state: &mut DesignerState, i: &Interaction) -> Result<Vec<HostRequest>>;

    fn move_to(&mut self, state: &mut DesignerState, i: &Interaction)
    -> Result<Vec<HostRequest>>;

    fn finish(&mut self, state: &mut DesignerState, i: &Interaction) -> Result<Vec<HostRequest>>;

    /// End the drag without committing a drop or issuing requests. Changes
    /// already made by `move_to` stay.
    fn cancel(&mut self, _state: &mut DesignerState) -> Result<()> {
        Ok(())
    }
}

/// Build the action a press starts, or `None` when the press is ignored.
pub fn action_for(info: &InteractionInfo, is_read_only: bool) -> Option<Box<dyn Action>> {
    match info.kind {
        InteractionKind::MoveActivity if !is_read_only => info
            .activity
            .map(|id| Box::new(MoveActivityAction::new(id)) as Box<dyn Action>),
        InteractionKind::MoveOutputConnection | InteractionKind::MoveInputConnection
            if !is_read_only =>
        {
            info.connector
                .map(|c| Box::new(MoveConnectionAction::new(info.kind, c)) as Box<dyn Action>)
        }
        InteractionKind::Scroll => Some(Box::new(ScrollAction::new())),
        _ => None,
    }
}

// ─── Move activity ───────────────────────────────────────────────────────

/// Drags an activity. A press without movement selects it instead.
pub struct MoveActivityAction {
    activity: ActivityId,
    offset: Vector,
    moved: bool,
}

impl MoveActivityAction {
    pub fn new(activity: ActivityId) -> Self {
        Self {
            activity,
            offset: Vector::ZERO,
            moved: false,
        }
    }
}

impl Action for MoveActivityAction {
    fn kind(&self) -> ActionKind {
        ActionKind::MoveActivity
    }

    fn start(&mut self, state: &mut DesignerState, i: &Interaction) -> Result<Vec<HostRequest>> {
        let position = state.graph.activity(self.activity)?.position;
        if let Some(pointer) = i.position {
            self.offset = pointer.divide_const(state.scale()).subtract(position);
        }
        self.moved = false;
        Ok(Vec::new())
    }

    fn move_to(
        &mut self,
        state: &mut DesignerState,
        i: &Interaction,
    ) -> Result<Vec<HostRequest>> {
        let Some(pointer) = i.position else {
            return Ok(Vec::new());
        };
        let position = pointer
            .divide_const(state.scale())
            .subtract(self.offset)
            .round();
        state.graph.activity_mut(self.activity)?.position = position;
        state.request_redraw();
        self.moved = true;
        Ok(Vec::new())
    }

    fn finish(&mut self, _state: &mut DesignerState, _i: &Interaction) -> Result<Vec<HostRequest>> {
        if self.moved {
            Ok(Vec::new())
        } else {
            Ok(vec![HostRequest::Select(self.activity)])
        }
    }
}

// ─── Move connection ─────────────────────────────────────────────────────

/// Drags one end of a new connection from a connector to a connector of the
/// opposite direction on another activity.
///
/// Inputs hold at most one connection: pressing an input connector drops
/// whatever it was connected to before the drag begins, and completing a
/// drag on an input drops that input's previous connections. The detach on
/// press is not undone when the drag is cancelled.
pub struct MoveConnectionAction {
    kind: InteractionKind,
    connector: ConnectorRef,
    offset: Vector,
    last_target: Option<HitTarget>,
    connection: Option<ConnectionId>,
}

impl MoveConnectionAction {
    pub fn new(kind: InteractionKind, connector: ConnectorRef) -> Self {
        Self {
            kind,
            connector,
            offset: Vector::ZERO,
            last_target: None,
            connection: None,
        }
    }

    fn accepts(&self, info: &InteractionInfo) -> Option<ConnectorRef> {
        let target = info.connector?;
        let expected = self.kind.drop_target()?;
        (info.kind == expected && target.activity != self.connector.activity).then_some(target)
    }
}

impl Action for MoveConnectionAction {
    fn kind(&self) -> ActionKind {
        ActionKind::MoveConnection
    }

    fn start(&mut self, state: &mut DesignerState, i: &Interaction) -> Result<Vec<HostRequest>> {
        let position = state.graph.connector_position(self.connector)?;
        self.last_target = i.target;
        if let Some(pointer) = i.position {
            self.offset = pointer.divide_const(state.scale()).subtract(position);
        }

        if self.connector.direction == Direction::Input {
            let dropped = state.graph.disconnect_and_delete_connections(self.connector)?;
            if !dropped.is_empty() {
                log::debug!(
                    "REWIRE {} detached {} connection(s)",
                    self.connector.activity,
                    dropped.len()
                );
            }
        }
        self.connection = Some(state.graph.open_connection(self.connector, position)?);
        state.request_redraw();
        Ok(Vec::new())
    }

    fn move_to(
        &mut self,
        state: &mut DesignerState,
        i: &Interaction,
    ) -> Result<Vec<HostRequest>> {
        let (Some(pointer), Some(id)) = (i.position, self.connection) else {
            return Ok(Vec::new());
        };
        self.last_target = i.target;
        let free = pointer.divide_const(state.scale()).subtract(self.offset);
        state.graph.set_free_position(id, free)?;
        state.request_redraw();
        Ok(Vec::new())
    }

    fn finish(&mut self, state: &mut DesignerState, i: &Interaction) -> Result<Vec<HostRequest>> {
        let Some(id) = self.connection.take() else {
            return Ok(Vec::new());
        };
        state.request_redraw();

        let target = check_click(&state.graph, i.target.or(self.last_target))
            .and_then(|info| self.accepts(&info));
        match target {
            Some(target) => {
                if target.direction == Direction::Input {
                    state.graph.disconnect_and_delete_connections(target)?;
                }
                state.graph.attach(id, target)?;
                log::debug!("REWIRE {} attached to {}", id, target.activity);
            }
            None => {
                state.graph.discard_connection(id)?;
                log::debug!("REWIRE {} dropped", id);
            }
        }
        Ok(Vec::new())
    }

    fn cancel(&mut self, state: &mut DesignerState) -> Result<()> {
        if let Some(id) = self.connection.take() {
            state.graph.discard_connection(id)?;
            state.request_redraw();
            log::debug!("REWIRE {} cancelled", id);
        }
        Ok(())
    }
}

// ─── Scroll ──────────────────────────────────────────────────────────────

/// Pans the canvas. A press without movement clears the selection.
#[derive(Debug, Default)]
pub struct ScrollAction {
    offset: Vector,
    moved: bool,
}

impl ScrollAction {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Action for ScrollAction {
    fn kind(&self) -> ActionKind {
        ActionKind::Scroll
    }

    fn start(&mut self, state: &mut DesignerState, i: &Interaction) -> Result<Vec<HostRequest>> {
        if let Some(pointer) = i.position {
            self.offset = pointer.subtract(state.scroll());
        }
        Ok(Vec::new())
    }

    fn move_to(
        &mut self,
        state: &mut DesignerState,
        i: &Interaction,
    ) -> Result<Vec<HostRequest>> {
        if let Some(pointer) = i.position {
            state.set_scroll(pointer.subtract(self.offset));
            self.moved = true;
        }
        Ok(Vec::new())
    }

    fn finish(&mut self, state: &mut DesignerState, _i: &Interaction) -> Result<Vec<HostRequest>> {
        if !self.moved && !state.is_read_only {
            Ok(vec![HostRequest::Unselect])
        } else {
            Ok(Vec::new())
        }
    }
}

// ─── One-shot gestures ───────────────────────────────────────────────────

/// Zoom one step per wheel event, keeping the model point under the canvas
/// origin fixed. A zero delta does nothing.
pub fn wheel_action(state: &mut DesignerState, delta_y: f64) {
    let step = if delta_y > 0.0 {
        state.zoom.step
    } else if delta_y < 0.0 {
        -state.zoom.step
    } else {
        return;
    };
    let old = state.scale();
    let new = state.zoom.clamp(old - step);
    if new == old {
        return;
    }
    state.transform.scroll = state.scroll().multiply_const(new / old);
    state.transform.scale = new;
    state.request_redraw();
    log::trace!("ZOOM {old} -> {new}");
}

/// A double-click on an activity body asks the host to edit it.
pub fn double_click_action(state: &DesignerState, i: &Interaction) -> Option<HostRequest> {
    let info = check_click(&state.graph, i.target)?;
    match (info.kind, info.activity) {
        (InteractionKind::MoveActivity, Some(id)) if !state.is_read_only => {
            Some(HostRequest::EditRequested(id))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DesignerConfig;
    use pretty_assertions::assert_eq;
    use wfd_core::model::ActivityDefinition;

    fn state() -> DesignerState {
        let mut s = DesignerState::new(&DesignerConfig::default());
        let def = ActivityDefinition {
            name: "act_a".into(),
            label: "A".into(),
            color: "#000".into(),
            left: 100.0,
            top: 40.0,
            is_invalid: false,
            can_delete: true,
            input_names: vec!["in".into()],
            output_names: vec!["out".into()],
        };
        let m = wfd_core::MonospaceMeasure::default();
        s.graph.add_activity(&def, &m).unwrap();
        s
    }

    fn at(x: f64, y: f64) -> Interaction {
        Interaction::at(Vector::new(x, y), None)
    }

    #[test]
    fn move_activity_keeps_grab_offset_and_rounds() {
        let mut s = state();
        s.transform.scale = 2.0;
        let id = ActivityId::intern("act_a");
        let mut a = MoveActivityAction::new(id);
        a.start(&mut s, &at(220.0, 100.0)).unwrap();
        a.move_to(&mut s, &at(241.0, 120.0)).unwrap();
        assert_eq!(s.graph.activity(id).unwrap().position, Vector::new(111.0, 50.0));
        assert_eq!(a.finish(&mut s, &at(241.0, 120.0)).unwrap(), vec![]);
    }

    #[test]
    fn move_activity_without_motion_selects() {
        let mut s = state();
        let id = ActivityId::intern("act_a");
        let mut a = MoveActivityAction::new(id);
        a.start(&mut s, &at(110.0, 60.0)).unwrap();
        assert_eq!(a.finish(&mut s, &at(110.0, 60.0)).unwrap(), vec![HostRequest::Select(id)]);
    }

    #[test]
    fn scroll_tracks_pointer() {
        let mut s = state();
        s.transform.scroll = Vector::new(5.0, 5.0);
        let mut a = ScrollAction::new();
        a.start(&mut s, &at(10.0, 10.0)).unwrap();
        a.move_to(&mut s, &at(30.0, 0.0)).unwrap();
        assert_eq!(s.scroll(), Vector::new(25.0, -5.0));
        assert_eq!(a.finish(&mut s, &at(30.0, 0.0)).unwrap(), vec![]);
    }

    #[test]
    fn scroll_click_unselects_unless_read_only() {
        let mut s = state();
        let mut a = ScrollAction::new();
        a.start(&mut s, &at(0.0, 0.0)).unwrap();
        assert_eq!(a.finish(&mut s, &at(0.0, 0.0)).unwrap(), vec![HostRequest::Unselect]);

        s.is_read_only = true;
        let mut a = ScrollAction::new();
        a.start(&mut s, &at(0.0, 0.0)).unwrap();
        assert_eq!(a.finish(&mut s, &at(0.0, 0.0)).unwrap(), vec![]);
    }

    #[test]
    fn wheel_zooms_and_scales_scroll() {
        let mut s = state();
        s.transform.scroll = Vector::new(100.0, 40.0);
        wheel_action(&mut s, 1.0);
        assert!((s.scale() - 0.85).abs() < 1e-9);
        assert!((s.scroll().x - 85.0).abs() < 1e-9);
        assert!((s.scroll().y - 34.0).abs() < 1e-9);
    }

    #[test]
    fn wheel_zero_delta_is_ignored() {
        let mut s = state();
        s.take_redraw();
        wheel_action(&mut s, 0.0);
        assert_eq!(s.scale(), 1.0);
        assert!(!s.take_redraw());
    }

    #[test]
    fn wheel_never_reaches_zero_scale() {
        let mut s = DesignerState::new(&DesignerConfig {
            min_scale: 0.0,
            ..DesignerConfig::default()
        });
        s.transform.scroll = Vector::new(40.0, -20.0);
        for _ in 0..20 {
            wheel_action(&mut s, 1.0);
        }
        assert_eq!(s.scale(), crate::config::SMALLEST_SCALE);
        assert!(s.scroll().x.is_finite() && s.scroll().y.is_finite());
        assert!(s.scroll().x > 0.0);
    }

    #[test]
    fn read_only_ignores_edits_but_pans() {
        let id = ActivityId::intern("act_a");
        let body = InteractionInfo {
            kind: InteractionKind::MoveActivity,
            activity: Some(id),
            connector: None,
        };
        assert!(action_for(&body, true).is_none());
        assert_eq!(
            action_for(&body, false).map(|a| a.kind()),
            Some(ActionKind::MoveActivity)
        );
        assert_eq!(
            action_for(&InteractionInfo::scroll(), true).map(|a| a.kind()),
            Some(ActionKind::Scroll)
        );
    }

    #[test]
    fn double_click_requests_edit() {
        let mut s = state();
        let id = ActivityId::intern("act_a");
        let i = Interaction::at(Vector::ZERO, Some(HitTarget::Activity(id)));
        assert_eq!(double_click_action(&s, &i), Some(HostRequest::EditRequested(id)));

        let canvas = Interaction::at(Vector::ZERO, Some(HitTarget::Canvas));
        assert_eq!(double_click_action(&s, &canvas), None);

        s.is_read_only = true;
        assert_eq!(double_click_action(&s, &i), None);
    }
}
