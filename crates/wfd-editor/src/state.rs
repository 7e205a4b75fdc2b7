//! Mutable designer state shared by every action.

use crate::config::{DesignerConfig, ZoomLimits};
use crate::input::HitResolver;
use wfd_core::model::ActivityDefinition;
use wfd_core::{
    ActivityId, MonospaceMeasure, Result, TextMeasure, Vector, ViewTransform, Viewport,
    WorkflowGraph,
};
use wfd_render::{HitTarget, hit_test_page};

pub struct DesignerState {
    pub graph: WorkflowGraph,
    /// Pan and zoom. `scroll` is in view pixels.
    pub transform: ViewTransform,
    /// Where the canvas sits on the page.
    pub viewport: Viewport,
    pub is_read_only: bool,
    pub zoom: ZoomLimits,
    measure: Box<dyn TextMeasure>,
    needs_redraw: bool,
}

impl DesignerState {
    pub fn new(config: &DesignerConfig) -> Self {
        Self {
            graph: WorkflowGraph::new(),
            transform: ViewTransform::default(),
            viewport: Viewport::default(),
            is_read_only: config.is_read_only,
            zoom: config.zoom(),
            measure: Box::new(MonospaceMeasure::default()),
            needs_redraw: true,
        }
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn scroll(&self) -> Vector {
        self.transform.scroll
    }

    pub fn set_scroll(&mut self, scroll: Vector) {
        self.transform.scroll = scroll;
        self.request_redraw();
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        &*self.measure
    }

    /// Swap the text measure and lay every activity out again.
    pub fn set_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
        self.graph.relayout(&*self.measure);
        self.request_redraw();
    }

    /// Append and lay out an activity.
    pub fn add_activity(&mut self, def: &ActivityDefinition) -> Result<ActivityId> {
        self.graph.add_activity(def, &*self.measure)
    }

    /// Apply a definition's mutable fields and lay the activity out again.
    pub fn update_activity(&mut self, def: &ActivityDefinition) -> Result<ActivityId> {
        self.graph.update_activity(def, &*self.measure)
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Returns whether anything changed since the last call, and resets.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

impl HitResolver for DesignerState {
    fn element_at(&self, page: Vector) -> Option<HitTarget> {
        hit_test_page(&self.graph, &self.viewport, &self.transform, page)
    }
}
