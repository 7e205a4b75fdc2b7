//! The designer: routes input events to at most one active drag.
//!
//! Idle until a press lands on something [`check_click`] recognises. While a
//! drag is active the designer is *capturing*: move and release events from
//! anywhere on the page are routed to it. When idle, moves and releases are
//! dropped without any work.

use crate::actions::{
    Action, ActionKind, HostRequest, action_for, double_click_action, wheel_action,
};
use crate::config::DesignerConfig;
use crate::input::{InputEvent, Interaction, read_interaction};
use crate::interaction::{InteractionInfo, check_click};
use crate::state::DesignerState;
use wfd_core::model::Activity;
use wfd_core::{ConnectionId, Result};
use wfd_render::HitTarget;

pub struct Designer {
    pub state: DesignerState,
    action: Option<Box<dyn Action>>,
}

impl Designer {
    pub fn new(config: &DesignerConfig) -> Self {
        Self {
            state: DesignerState::new(config),
            action: None,
        }
    }

    /// Whether page-wide move and release events should be delivered.
    pub fn is_capturing(&self) -> bool {
        self.action.is_some()
    }

    pub fn active_action(&self) -> Option<ActionKind> {
        self.action.as_ref().map(|a| a.kind())
    }

    /// Feed one host event. Returns the requests the host must apply.
    pub fn handle(&mut self, event: &InputEvent) -> Result<Vec<HostRequest>> {
        match event {
            InputEvent::Wheel { delta_y } => {
                wheel_action(&mut self.state, *delta_y);
                Ok(Vec::new())
            }
            InputEvent::DoubleClick(_) => {
                let i = read_interaction(event, &self.state);
                Ok(double_click_action(&self.state, &i).into_iter().collect())
            }
            InputEvent::MouseDown(_) | InputEvent::TouchStart(_) => {
                let i = read_interaction(event, &self.state);
                self.start_action(&i)
            }
            InputEvent::MouseMove(_) | InputEvent::TouchMove(_) => {
                if !self.is_capturing() {
                    return Ok(Vec::new());
                }
                let i = read_interaction(event, &self.state);
                self.move_action(&i)
            }
            InputEvent::MouseUp(_) | InputEvent::TouchEnd(_) => {
                if !self.is_capturing() {
                    return Ok(Vec::new());
                }
                let i = read_interaction(event, &self.state);
                self.finish_action(&i)
            }
        }
    }

    /// A press while a drag is active finishes that drag and starts nothing.
    fn start_action(&mut self, i: &Interaction) -> Result<Vec<HostRequest>> {
        if self.action.is_some() {
            log::debug!("DESIGNER press during drag; finishing it");
            return self.finish_action(i);
        }
        if i.position.is_none() {
            return Ok(Vec::new());
        }
        let Some(info) = self.check_click(i.target) else {
            return Ok(Vec::new());
        };
        let Some(mut action) = action_for(&info, self.state.is_read_only) else {
            log::trace!("DESIGNER {:?} ignored (read-only)", info.kind);
            return Ok(Vec::new());
        };
        let requests = action.start(&mut self.state, i)?;
        log::trace!("DESIGNER start {:?}", action.kind());
        self.action = Some(action);
        Ok(requests)
    }

    fn move_action(&mut self, i: &Interaction) -> Result<Vec<HostRequest>> {
        match self.action.as_mut() {
            Some(action) => action.move_to(&mut self.state, i),
            None => Ok(Vec::new()),
        }
    }

    fn finish_action(&mut self, i: &Interaction) -> Result<Vec<HostRequest>> {
        match self.action.take() {
            Some(mut action) => {
                log::trace!("DESIGNER finish {:?}", action.kind());
                action.finish(&mut self.state, i)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Cancel any drag in place, e.g. before the graph is cleared. Nothing
    /// is dropped and no requests are produced.
    pub fn abort(&mut self) -> Result<()> {
        match self.action.take() {
            Some(mut action) => {
                log::debug!("DESIGNER cancel {:?}", action.kind());
                action.cancel(&mut self.state)
            }
            None => Ok(()),
        }
    }

    pub fn check_click(&self, target: Option<HitTarget>) -> Option<InteractionInfo> {
        check_click(&self.state.graph, target)
    }

    pub fn get_activity(&self, name: &str) -> Result<&Activity> {
        self.state.graph.get_activity(name)
    }

    pub fn try_get_selected_activity(&self) -> Option<&Activity> {
        let id = self.state.graph.selected()?;
        self.state.graph.activity(id).ok()
    }

    pub fn unique_connections(&self) -> Vec<ConnectionId> {
        self.state.graph.unique_connections()
    }

    pub fn take_redraw(&mut self) -> bool {
        self.state.take_redraw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wfd_core::model::ActivityDefinition;
    use wfd_core::{ActivityId, Vector, Viewport};

    fn designer(read_only: bool) -> Designer {
        let mut d = Designer::new(&DesignerConfig {
            is_read_only: read_only,
            ..DesignerConfig::default()
        });
        d.state.viewport = Viewport::new(Vector::ZERO, Vector::new(800.0, 600.0));
        let def = ActivityDefinition {
            name: "des_a".into(),
            label: "A".into(),
            color: "#000".into(),
            left: 100.0,
            top: 100.0,
            is_invalid: false,
            can_delete: true,
            input_names: vec![],
            output_names: vec![],
        };
        let m = wfd_core::MonospaceMeasure::default();
        d.state.graph.add_activity(&def, &m).unwrap();
        d
    }

    // Inside the body of des_a (body starts 9 below the activity origin).
    const BODY: Vector = Vector::new(120.0, 120.0);

    #[test]
    fn idle_ignores_moves_and_releases() {
        let mut d = designer(false);
        assert_eq!(d.handle(&InputEvent::MouseMove(BODY)).unwrap(), vec![]);
        assert_eq!(d.handle(&InputEvent::MouseUp(BODY)).unwrap(), vec![]);
        assert!(!d.is_capturing());
    }

    #[test]
    fn press_on_body_captures_until_release() {
        let mut d = designer(false);
        d.handle(&InputEvent::MouseDown(BODY)).unwrap();
        assert!(d.is_capturing());
        assert_eq!(d.active_action(), Some(ActionKind::MoveActivity));
        let req = d.handle(&InputEvent::MouseUp(BODY)).unwrap();
        assert_eq!(req, vec![HostRequest::Select(ActivityId::intern("des_a"))]);
        assert!(!d.is_capturing());
    }

    #[test]
    fn second_press_force_finishes() {
        let mut d = designer(false);
        d.handle(&InputEvent::MouseDown(BODY)).unwrap();
        let req = d.handle(&InputEvent::MouseDown(Vector::new(500.0, 500.0))).unwrap();
        assert_eq!(req, vec![HostRequest::Select(ActivityId::intern("des_a"))]);
        assert!(!d.is_capturing());
    }

    #[test]
    fn read_only_body_press_does_nothing() {
        let mut d = designer(true);
        assert_eq!(d.handle(&InputEvent::MouseDown(BODY)).unwrap(), vec![]);
        assert!(!d.is_capturing());

        d.handle(&InputEvent::MouseDown(Vector::new(500.0, 500.0))).unwrap();
        assert_eq!(d.active_action(), Some(ActionKind::Scroll));
    }

    #[test]
    fn press_outside_canvas_is_ignored() {
        let mut d = designer(false);
        d.handle(&InputEvent::MouseDown(Vector::new(900.0, 10.0))).unwrap();
        assert!(!d.is_capturing());
    }

    #[test]
    fn touch_end_without_points_finishes() {
        let mut d = designer(false);
        d.handle(&InputEvent::TouchStart(vec![Vector::new(500.0, 500.0)])).unwrap();
        assert!(d.is_capturing());
        let req = d.handle(&InputEvent::TouchEnd(vec![])).unwrap();
        assert_eq!(req, vec![HostRequest::Unselect]);
        assert!(!d.is_capturing());
    }
}
