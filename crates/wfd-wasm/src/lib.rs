//! WASM bridge for the workflow designer.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the canvas and
//! the event listeners; it forwards DOM events here and repaints whenever a
//! call reports that something changed.

mod canvas;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;
use std::rc::Rc;

use canvas::{CanvasMeasure, CanvasSurface};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;
use wfd_core::model::{ActivityDefinition, ConnectionDefinition};
use wfd_core::{Vector, Viewport};
use wfd_editor::{DesignerConfig, DesignerHost, InputEvent, ListenerId, ToolbarCommand};

/// Notification channel a JS callback can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Selected,
    Unselected,
    Deleted,
    EditRequested,
}

fn parse_channel(name: &str) -> Option<Channel> {
    match name {
        "selected" => Some(Channel::Selected),
        "unselected" => Some(Channel::Unselected),
        "deleted" => Some(Channel::Deleted),
        "editRequested" => Some(Channel::EditRequested),
        _ => None,
    }
}

fn parse_command(name: &str) -> Option<ToolbarCommand> {
    match name {
        "delete" => Some(ToolbarCommand::DeleteSelected),
        "edit" => Some(ToolbarCommand::EditSelected),
        "center" => Some(ToolbarCommand::Center),
        _ => None,
    }
}

/// `[x0, y0, x1, y1, ...]` → points. A trailing odd value is dropped.
fn points_from_flat(flat: &[f64]) -> Vec<Vector> {
    flat.chunks_exact(2)
        .map(|p| Vector::new(p[0], p[1]))
        .collect()
}

fn js_error(e: impl Display) -> JsValue {
    JsError::new(&e.to_string()).into()
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| js_error(format!("invalid JSON: {e}")))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_error)
}

/// The JS-facing designer controller.
///
/// Every mutating call returns `true` when the canvas needs a repaint.
#[wasm_bindgen]
pub struct WfdDesigner {
    host: DesignerHost,
    listeners: HashMap<u32, (Channel, ListenerId)>,
    next_listener: u32,
    /// First error thrown by a JS listener during the current call.
    listener_error: Rc<RefCell<Option<JsValue>>>,
}

#[wasm_bindgen]
impl WfdDesigner {
    /// `config_json` may be empty for the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WfdDesigner, JsValue> {
        console_error_panic_hook_setup();
        let config: DesignerConfig = if config_json.trim().is_empty() {
            DesignerConfig::default()
        } else {
            parse_json(config_json)?
        };
        log::debug!("designer created, theme {}", config.theme);
        Ok(Self {
            host: DesignerHost::new(config),
            listeners: HashMap::new(),
            next_listener: 1,
            listener_error: Rc::new(RefCell::new(None)),
        })
    }

    /// Measure labels with this context's font metrics from now on.
    pub fn use_canvas_metrics(&mut self, ctx: CanvasRenderingContext2d) -> bool {
        self.host.set_text_measure(Box::new(CanvasMeasure::new(ctx)));
        self.host.take_redraw()
    }

    /// Canvas position on the page and its size, in CSS pixels.
    pub fn resize(&mut self, left: f64, top: f64, width: f64, height: f64) -> bool {
        self.host.resize(Viewport::new(
            Vector::new(left, top),
            Vector::new(width, height),
        ));
        self.host.take_redraw()
    }

    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let size = self.host.designer().state.viewport.size;
        ctx.clear_rect(0.0, 0.0, size.x, size.y);
        let mut surface = CanvasSurface::new(ctx);
        self.host.render(&mut surface).map_err(js_error)
    }

    // ─── Graph ───────────────────────────────────────────────────────────

    /// `json` is an array of activity definitions.
    pub fn add_activities(&mut self, json: &str) -> Result<bool, JsValue> {
        let defs: Vec<ActivityDefinition> = parse_json(json)?;
        self.host.add_activities(&defs).map_err(js_error)?;
        Ok(self.host.take_redraw())
    }

    /// `json` is an array of connection definitions.
    pub fn add_connections(&mut self, json: &str) -> Result<bool, JsValue> {
        let defs: Vec<ConnectionDefinition> = parse_json(json)?;
        self.host.add_connections(&defs).map_err(js_error)?;
        Ok(self.host.take_redraw())
    }

    pub fn update_activity(&mut self, json: &str) -> Result<bool, JsValue> {
        let def: ActivityDefinition = parse_json(json)?;
        self.host.update_activity(&def).map_err(js_error)?;
        Ok(self.host.take_redraw())
    }

    pub fn delete_activity(&mut self, name: &str) -> Result<bool, JsValue> {
        let result = self.host.delete_activity(name);
        self.finish(result)
    }

    pub fn get_activities(&self) -> Result<String, JsValue> {
        to_json(&self.host.get_activities())
    }

    pub fn get_activity(&self, name: &str) -> Result<String, JsValue> {
        let def = self.host.get_activity(name).map_err(js_error)?;
        to_json(&def)
    }

    pub fn get_connections(&self) -> Result<String, JsValue> {
        let defs = self.host.get_connections().map_err(js_error)?;
        to_json(&defs)
    }

    pub fn clear(&mut self) -> Result<bool, JsValue> {
        self.host.clear().map_err(js_error)?;
        Ok(self.host.take_redraw())
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_activity(&mut self, name: &str) -> Result<bool, JsValue> {
        let result = self.host.select_activity(name);
        self.finish(result)
    }

    /// Returns whether an activity was selected.
    pub fn try_unselect_activity(&mut self) -> Result<bool, JsValue> {
        let unselected = self.host.try_unselect_activity();
        self.take_listener_error()?;
        Ok(unselected)
    }

    pub fn try_get_selected_activity_name(&self) -> Option<String> {
        self.host.try_get_selected_activity_name().map(str::to_string)
    }

    // ─── Modes and viewport ──────────────────────────────────────────────

    pub fn set_read_only(&mut self, is_read_only: bool) -> bool {
        self.host.set_read_only(is_read_only);
        self.host.take_redraw()
    }

    pub fn is_read_only(&self) -> bool {
        self.host.is_read_only()
    }

    /// `{"left":..,"top":..}` in model coordinates.
    pub fn get_position_for_new_activity(&self) -> Result<String, JsValue> {
        let p = self.host.position_for_new_activity();
        to_json(&serde_json::json!({ "left": p.x, "top": p.y }))
    }

    /// Start an animated scroll; drive it with [`WfdDesigner::tick`].
    pub fn scroll_to_activity(
        &mut self,
        name: &str,
        duration_ms: Option<f64>,
        now_ms: f64,
    ) -> Result<(), JsValue> {
        self.host
            .scroll_to_activity(name, duration_ms, now_ms)
            .map_err(js_error)
    }

    pub fn scroll_to_center(&mut self, duration_ms: Option<f64>, now_ms: f64) {
        self.host.scroll_to_center(duration_ms, now_ms);
    }

    /// Call once per animation frame. Returns whether to keep ticking.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.host.tick(now_ms)
    }

    /// Whether anything changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        self.host.take_redraw()
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// While `true`, the page must forward document-wide move and release
    /// events, not only those on the canvas.
    pub fn is_capturing(&self) -> bool {
        self.host.is_capturing()
    }

    pub fn mouse_down(&mut self, page_x: f64, page_y: f64) -> Result<bool, JsValue> {
        self.input(InputEvent::MouseDown(Vector::new(page_x, page_y)))
    }

    pub fn mouse_move(&mut self, page_x: f64, page_y: f64) -> Result<bool, JsValue> {
        self.input(InputEvent::MouseMove(Vector::new(page_x, page_y)))
    }

    pub fn mouse_up(&mut self, page_x: f64, page_y: f64) -> Result<bool, JsValue> {
        self.input(InputEvent::MouseUp(Vector::new(page_x, page_y)))
    }

    /// Touches as flattened page coordinates `[x0, y0, x1, y1, ...]`.
    pub fn touch_start(&mut self, touches: &[f64]) -> Result<bool, JsValue> {
        self.input(InputEvent::TouchStart(points_from_flat(touches)))
    }

    pub fn touch_move(&mut self, touches: &[f64]) -> Result<bool, JsValue> {
        self.input(InputEvent::TouchMove(points_from_flat(touches)))
    }

    pub fn touch_end(&mut self, touches: &[f64]) -> Result<bool, JsValue> {
        self.input(InputEvent::TouchEnd(points_from_flat(touches)))
    }

    pub fn double_click(&mut self, page_x: f64, page_y: f64) -> Result<bool, JsValue> {
        self.input(InputEvent::DoubleClick(Vector::new(page_x, page_y)))
    }

    pub fn wheel(&mut self, delta_y: f64) -> Result<bool, JsValue> {
        self.input(InputEvent::Wheel { delta_y })
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    /// `{"activityBarVisible":..,"deleteVisible":..}`
    pub fn toolbar_json(&self) -> Result<String, JsValue> {
        to_json(&self.host.toolbar())
    }

    /// `name` is one of `delete`, `edit`, `center`.
    pub fn run_command(&mut self, name: &str, now_ms: f64) -> Result<bool, JsValue> {
        let command =
            parse_command(name).ok_or_else(|| js_error(format!("unknown command: {name}")))?;
        let result = self.host.run_command(command, now_ms);
        self.finish(result)
    }

    // ─── Listeners ───────────────────────────────────────────────────────

    /// Subscribe `callback(name)` to `selected`, `unselected`, `deleted` or
    /// `editRequested`. Returns a handle for [`WfdDesigner::remove_listener`].
    pub fn add_listener(
        &mut self,
        channel: &str,
        callback: js_sys::Function,
    ) -> Result<u32, JsValue> {
        let channel =
            parse_channel(channel).ok_or_else(|| js_error(format!("unknown channel: {channel}")))?;
        let slot = Rc::clone(&self.listener_error);
        let listener = move |name: &str| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(name)) {
                slot.borrow_mut().get_or_insert(err);
            }
        };
        let id = match channel {
            Channel::Selected => self.host.on_selected.add_listener(listener),
            Channel::Unselected => self.host.on_unselected.add_listener(listener),
            Channel::Deleted => self.host.on_deleted.add_listener(listener),
            Channel::EditRequested => self.host.on_edit_requested.add_listener(listener),
        };
        let handle = self.next_listener;
        self.next_listener += 1;
        self.listeners.insert(handle, (channel, id));
        Ok(handle)
    }

    pub fn remove_listener(&mut self, handle: u32) -> Result<(), JsValue> {
        let (channel, id) = self
            .listeners
            .remove(&handle)
            .ok_or_else(|| js_error(format!("listener {handle} not found")))?;
        let emitter = match channel {
            Channel::Selected => &mut self.host.on_selected,
            Channel::Unselected => &mut self.host.on_unselected,
            Channel::Deleted => &mut self.host.on_deleted,
            Channel::EditRequested => &mut self.host.on_edit_requested,
        };
        emitter.remove_listener(id).map_err(js_error)
    }
}

impl WfdDesigner {
    fn input(&mut self, event: InputEvent) -> Result<bool, JsValue> {
        let result = self.host.handle_input(&event);
        self.finish(result)
    }

    /// Surface a listener exception before a designer error: the listener
    /// ran first.
    fn finish(&mut self, result: wfd_core::Result<()>) -> Result<bool, JsValue> {
        self.take_listener_error()?;
        result.map_err(js_error)?;
        Ok(self.host.take_redraw())
    }

    fn take_listener_error(&self) -> Result<(), JsValue> {
        match self.listener_error.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("WFD WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
