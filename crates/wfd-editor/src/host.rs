//! Host façade: the only surface an embedding application talks to.
//!
//! Translates host commands into graph mutations, applies the requests that
//! drags return, and fires the four notification channels synchronously in
//! listener-registration order.

use crate::actions::HostRequest;
use crate::animation::Animator;
use crate::config::DesignerConfig;
use crate::designer::Designer;
use crate::emitter::EventEmitter;
use crate::input::InputEvent;
use crate::toolbar::{ToolbarCommand, ToolbarState};
use wfd_core::model::{ActivityDefinition, ConnectionDefinition};
use wfd_core::{ActivityId, Result, TextMeasure, Vector, Viewport};
use wfd_render::{PaintContext, Surface, Theme, paint_designer};

pub struct DesignerHost {
    designer: Designer,
    animator: Animator,
    config: DesignerConfig,
    theme: Theme,
    pub on_selected: EventEmitter<str>,
    pub on_unselected: EventEmitter<str>,
    pub on_deleted: EventEmitter<str>,
    pub on_edit_requested: EventEmitter<str>,
}

impl DesignerHost {
    pub fn new(config: DesignerConfig) -> Self {
        let theme = Theme::named(&config.theme);
        Self {
            designer: Designer::new(&config),
            animator: Animator::new(),
            config,
            theme,
            on_selected: EventEmitter::new(),
            on_unselected: EventEmitter::new(),
            on_deleted: EventEmitter::new(),
            on_edit_requested: EventEmitter::new(),
        }
    }

    pub fn designer(&self) -> &Designer {
        &self.designer
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Canvas moved or resized on the page.
    pub fn resize(&mut self, viewport: Viewport) {
        self.designer.state.viewport = viewport;
        self.designer.state.request_redraw();
    }

    pub fn set_text_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.designer.state.set_measure(measure);
    }

    // ─── Graph ───────────────────────────────────────────────────────────

    /// Append activities in order. Stops at the first failure; activities
    /// added before it stay.
    pub fn add_activities(&mut self, definitions: &[ActivityDefinition]) -> Result<()> {
        for def in definitions {
            self.designer.state.add_activity(def)?;
        }
        self.designer.state.request_redraw();
        Ok(())
    }

    pub fn add_connections(&mut self, definitions: &[ConnectionDefinition]) -> Result<()> {
        for def in definitions {
            self.designer.state.graph.add_connection(def)?;
        }
        self.designer.state.request_redraw();
        Ok(())
    }

    pub fn update_activity(&mut self, definition: &ActivityDefinition) -> Result<()> {
        self.designer.state.update_activity(definition)?;
        self.designer.state.request_redraw();
        Ok(())
    }

    /// Sever the activity's connections, remove it, and notify. A drag in
    /// progress is cancelled first.
    pub fn delete_activity(&mut self, name: &str) -> Result<()> {
        let id = self.designer.state.graph.resolve(name)?;
        self.designer.abort()?;
        self.designer.state.graph.remove_activity(id)?;
        self.designer.state.request_redraw();
        self.on_deleted.fire(name);
        Ok(())
    }

    pub fn get_activities(&self) -> Vec<ActivityDefinition> {
        self.designer
            .state
            .graph
            .activities()
            .iter()
            .map(|a| a.to_definition())
            .collect()
    }

    pub fn get_activity(&self, name: &str) -> Result<ActivityDefinition> {
        Ok(self.designer.get_activity(name)?.to_definition())
    }

    /// Fails if any connection is half-open.
    pub fn get_connections(&self) -> Result<Vec<ConnectionDefinition>> {
        let graph = &self.designer.state.graph;
        self.designer
            .unique_connections()
            .into_iter()
            .map(|id| graph.connection_definition(id))
            .collect()
    }

    /// Drop every activity and connection. Any drag in progress is
    /// cancelled and any scroll animation stops.
    pub fn clear(&mut self) -> Result<()> {
        self.designer.abort()?;
        self.animator.cancel();
        self.designer.state.graph.clear();
        self.designer.state.request_redraw();
        Ok(())
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_activity(&mut self, name: &str) -> Result<()> {
        let id = self.designer.state.graph.resolve(name)?;
        self.try_unselect_activity();
        self.designer.state.graph.select(id)?;
        self.designer.state.request_redraw();
        self.on_selected.fire(id.as_str());
        Ok(())
    }

    /// Clear the selection. Returns whether anything was selected.
    pub fn try_unselect_activity(&mut self) -> bool {
        match self.designer.state.graph.unselect() {
            Some(id) => {
                self.designer.state.request_redraw();
                self.on_unselected.fire(id.as_str());
                true
            }
            None => false,
        }
    }

    pub fn try_get_selected_activity_name(&self) -> Option<&str> {
        self.designer.try_get_selected_activity().map(|a| a.name())
    }

    // ─── Modes and viewport ──────────────────────────────────────────────

    pub fn set_read_only(&mut self, is_read_only: bool) {
        self.designer.state.is_read_only = is_read_only;
        self.designer.state.request_redraw();
    }

    pub fn is_read_only(&self) -> bool {
        self.designer.state.is_read_only
    }

    /// Model position currently under the canvas's top-left corner.
    pub fn position_for_new_activity(&self) -> Vector {
        let state = &self.designer.state;
        state.scroll().divide_const(-state.scale())
    }

    /// Animate the view so the activity's origin lands in the middle of the
    /// canvas. `duration_ms` defaults to the configured scroll duration.
    pub fn scroll_to_activity(
        &mut self,
        name: &str,
        duration_ms: Option<f64>,
        now_ms: f64,
    ) -> Result<()> {
        let state = &self.designer.state;
        let position = self.designer.get_activity(name)?.position;
        let target = state
            .viewport
            .size
            .divide_const(2.0)
            .subtract(position.multiply_const(state.scale()));
        self.scroll_to(target, duration_ms, now_ms);
        Ok(())
    }

    pub fn scroll_to_center(&mut self, duration_ms: Option<f64>, now_ms: f64) {
        self.scroll_to(Vector::ZERO, duration_ms, now_ms);
    }

    fn scroll_to(&mut self, target: Vector, duration_ms: Option<f64>, now_ms: f64) {
        let duration = duration_ms.unwrap_or(self.config.scroll_duration_ms);
        let from = self.designer.state.scroll();
        self.animator.start(from, target, now_ms, duration);
    }

    /// Advance the scroll animation. Returns whether the host should keep
    /// ticking.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if let Some(scroll) = self.animator.tick(now_ms) {
            self.designer.state.set_scroll(scroll);
        }
        self.animator.is_running()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Whether page-wide move and release events must be forwarded.
    pub fn is_capturing(&self) -> bool {
        self.designer.is_capturing()
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> Result<()> {
        for request in self.designer.handle(event)? {
            self.apply(request)?;
        }
        Ok(())
    }

    fn apply(&mut self, request: HostRequest) -> Result<()> {
        match request {
            HostRequest::Select(id) => self.select_activity(id.as_str()),
            HostRequest::Unselect => {
                self.try_unselect_activity();
                Ok(())
            }
            HostRequest::EditRequested(id) => {
                self.fire_edit(id);
                Ok(())
            }
        }
    }

    fn fire_edit(&mut self, id: ActivityId) {
        self.on_edit_requested.fire(id.as_str());
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    pub fn toolbar(&self) -> ToolbarState {
        ToolbarState::for_selection(self.designer.try_get_selected_activity(), self.is_read_only())
    }

    pub fn run_command(&mut self, command: ToolbarCommand, now_ms: f64) -> Result<()> {
        let selected = self.designer.state.graph.selected();
        match command {
            // Only reachable while the delete button is shown.
            ToolbarCommand::DeleteSelected => match selected {
                Some(id) if self.toolbar().delete_visible => self.delete_activity(id.as_str()),
                _ => Ok(()),
            },
            ToolbarCommand::EditSelected => {
                if let Some(id) = selected {
                    self.fire_edit(id);
                }
                Ok(())
            }
            ToolbarCommand::Center => {
                self.scroll_to_center(None, now_ms);
                Ok(())
            }
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    /// Whether anything visible changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        self.designer.take_redraw()
    }

    pub fn render<S: Surface>(&self, surface: &mut S) -> Result<()> {
        let state = &self.designer.state;
        let cx = PaintContext {
            transform: state.transform,
            size: state.viewport.size,
            theme: &self.theme,
        };
        paint_designer(surface, &state.graph, &cx)
    }
}
