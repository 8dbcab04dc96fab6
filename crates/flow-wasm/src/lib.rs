//! WASM bridge for the process designer: exposes the editor session to the
//! browser host.
//!
//! Compiled via `wasm-pack build --target web`. The host owns the DOM and
//! painting; it forwards raw events here and redraws from `get_scene_json()`
//! whenever a call returns `true`.

mod console;

use flow_core::{
    ConnectionId, ConnectionPatch, NodeId, NodeKind, NodePatch, Selection, Size, Snapshot,
};
use flow_editor::{
    EditorConfig, EditorSession, InputEvent, Modifiers, PointerButton, ShortcutMap,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
///
/// One instance per designer canvas. All interaction from the host goes
/// through this struct.
#[wasm_bindgen]
pub struct FlowCanvas {
    session: EditorSession,
}

#[wasm_bindgen]
impl FlowCanvas {
    /// Create a controller for a canvas element of the given size (px).
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        console::panic_hook_setup();
        console::init_logger(log::LevelFilter::Info);

        Self {
            session: EditorSession::new(Size::new(width, height)),
        }
    }

    /// Override editor settings (partial JSON, camelCase keys).
    /// Returns `false` and keeps the current config on malformed input.
    pub fn set_config_json(&mut self, json: &str) -> bool {
        match EditorConfig::from_json(json) {
            Ok(config) => {
                self.session.set_config(config);
                true
            }
            Err(e) => {
                log::warn!("ignoring editor config: {e}");
                false
            }
        }
    }

    /// Set console verbosity: "off", "error", "warn", "info", "debug", "trace".
    pub fn set_log_level(&self, level: &str) -> bool {
        match console::parse_level(level) {
            Some(filter) => {
                console::init_logger(filter);
                true
            }
            None => false,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.session.resize(Size::new(width, height));
    }

    // ─── Raw input ───────────────────────────────────────────────────────

    /// Handle pointer down. `button` is `MouseEvent.button`.
    /// Returns true if the scene needs repainting.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.session.handle(&InputEvent::PointerDown {
            x,
            y,
            button: PointerButton::from_dom(button),
            modifiers: mods(shift, ctrl, alt, meta),
        })
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.session.handle(&InputEvent::PointerMove {
            x,
            y,
            modifiers: mods(shift, ctrl, alt, meta),
        })
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.session.handle(&InputEvent::PointerUp {
            x,
            y,
            modifiers: mods(shift, ctrl, alt, meta),
        })
    }

    pub fn handle_wheel(
        &mut self,
        dx: f64,
        dy: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.session.handle(&InputEvent::Wheel {
            dx,
            dy,
            modifiers: mods(shift, ctrl, alt, meta),
        })
    }

    /// Handle a palette drop. `payload` is the drag data the palette set.
    pub fn handle_drop(&mut self, x: f64, y: f64, payload: &str) -> bool {
        self.session.handle(&InputEvent::drop(x, y, payload))
    }

    /// Handle a keyboard event. Returns JSON:
    /// `{"changed":bool,"action":"<action_name>"}` (`"none"` when unbound).
    pub fn handle_key(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let modifiers = mods(shift, ctrl, alt, meta);
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return r#"{"changed":false,"action":"none"}"#.to_string();
        };
        let changed = self.session.dispatch(action);
        serde_json::json!({ "changed": changed, "action": action.name() }).to_string()
    }

    // ─── Palette & property panel ────────────────────────────────────────

    /// Palette click: add a node centered in the view. Returns the new node
    /// ID, or an empty string for an unknown kind.
    pub fn add_node(&mut self, kind: &str) -> String {
        match kind.parse::<NodeKind>() {
            Ok(kind) => self.session.add_node(kind).as_str().to_string(),
            Err(e) => {
                log::warn!("{e}");
                String::new()
            }
        }
    }

    /// Apply a partial node update (`{"label":..,"description":..,"properties":{..},"style":{..}}`).
    pub fn update_node_json(&mut self, node_id: &str, json: &str) -> bool {
        match serde_json::from_str::<NodePatch>(json) {
            Ok(patch) => self.session.update_node_data(NodeId::intern(node_id), patch),
            Err(e) => {
                log::warn!("ignoring node patch for {node_id}: {e}");
                false
            }
        }
    }

    /// Apply a partial connection update (`{"kind":"step","label":"yes"}`).
    pub fn update_connection_json(&mut self, connection_id: &str, json: &str) -> bool {
        match serde_json::from_str::<ConnectionPatch>(json) {
            Ok(patch) => self
                .session
                .update_connection(ConnectionId::intern(connection_id), patch),
            Err(e) => {
                log::warn!("ignoring connection patch for {connection_id}: {e}");
                false
            }
        }
    }

    pub fn delete_node(&mut self, node_id: &str) -> bool {
        self.session.delete_node(NodeId::intern(node_id))
    }

    pub fn delete_connection(&mut self, connection_id: &str) -> bool {
        self.session
            .delete_connection(ConnectionId::intern(connection_id))
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selection()
    }

    pub fn duplicate_selected(&mut self) -> bool {
        match self.session.selection().node() {
            Some(id) => self.session.duplicate_node(id).is_some(),
            None => false,
        }
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select_node(&mut self, node_id: &str) -> bool {
        self.session.select(Selection::Node(NodeId::intern(node_id)))
    }

    pub fn select_connection(&mut self, connection_id: &str) -> bool {
        self.session
            .select(Selection::Connection(ConnectionId::intern(connection_id)))
    }

    pub fn clear_selection(&mut self) -> bool {
        self.session.select(Selection::None)
    }

    /// `{"type":"none"}`, `{"type":"node","id":..}` or `{"type":"connection","id":..}`.
    pub fn get_selection_json(&self) -> String {
        to_json(&self.session.selection())
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Enter connect mode from `node_id` (e.g. a "connect" button in the
    /// property panel). The next click on a node completes it.
    pub fn start_connection(&mut self, node_id: &str) -> bool {
        self.session.begin_connection(NodeId::intern(node_id))
    }

    pub fn cancel_connection(&mut self) -> bool {
        self.session.cancel_connection()
    }

    /// `"idle"`, `"panning"`, `"dragging"` or `"connecting"`.
    pub fn get_state_name(&self) -> String {
        self.session.state().name().to_string()
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn zoom_in(&mut self) -> bool {
        self.session.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.session.zoom_out()
    }

    pub fn set_scale(&mut self, scale: f64) -> bool {
        self.session.set_scale(scale)
    }

    pub fn get_scale(&self) -> f64 {
        self.session.transform().scale()
    }

    pub fn reset_view(&mut self) -> bool {
        self.session.reset_view()
    }

    pub fn fit_to_view(&mut self) -> bool {
        self.session.fit_to_view()
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// The full render description for the current frame.
    pub fn get_scene_json(&self) -> String {
        to_json(&self.session.scene())
    }

    pub fn get_lint_json(&self) -> String {
        to_json(&self.session.lint())
    }

    /// Graph state for the backend (`{"nodes":[..],"connections":[..]}`).
    pub fn get_snapshot_json(&self) -> String {
        to_json(&self.session.snapshot())
    }

    /// Replace the graph. Throws if the JSON is malformed or a gesture is
    /// in progress; invalid entries inside a well-formed snapshot are dropped.
    pub fn load_snapshot_json(&mut self, json: &str) -> Result<(), JsValue> {
        let snapshot = Snapshot::from_json(json).map_err(js_error)?;
        self.session.load_snapshot(snapshot).map_err(js_error)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaletteEntry {
    kind: NodeKind,
    label: &'static str,
    default_width: f64,
    default_height: f64,
}

/// Palette catalogue: every node kind with its default label and size.
#[wasm_bindgen]
pub fn node_kinds_json() -> String {
    let entries: Vec<PaletteEntry> = NodeKind::ALL
        .iter()
        .map(|&kind| {
            let d = kind.defaults();
            PaletteEntry {
                kind,
                label: d.label,
                default_width: d.width,
                default_height: d.height,
            }
        })
        .collect();
    to_json(&entries)
}

fn mods(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("serialization failed: {e}");
        "null".to_string()
    })
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canvas() -> FlowCanvas {
        FlowCanvas {
            session: EditorSession::new(Size::new(800.0, 600.0)),
        }
    }

    #[test]
    fn drop_then_drag_via_bridge() {
        let mut c = canvas();
        assert!(c.handle_drop(100.0, 100.0, "task"));
        assert!(c.handle_pointer_down(110.0, 110.0, 0, false, false, false, false));
        assert_eq!(c.get_state_name(), "dragging");
        assert!(c.handle_pointer_move(160.0, 130.0, false, false, false, false));
        assert!(c.handle_pointer_up(160.0, 130.0, false, false, false, false));

        let snap: serde_json::Value = serde_json::from_str(&c.get_snapshot_json()).unwrap();
        assert_eq!(snap["nodes"][0]["position"]["x"], 150.0);
        assert_eq!(snap["nodes"][0]["position"]["y"], 120.0);
    }

    #[test]
    fn key_reports_action() {
        let mut c = canvas();
        c.add_node("start");
        let out: serde_json::Value =
            serde_json::from_str(&c.handle_key("Delete", false, false, false, false)).unwrap();
        assert_eq!(out["changed"], true);
        assert_eq!(out["action"], "deleteSelection");

        let none = c.handle_key("q", false, false, false, false);
        assert_eq!(none, r#"{"changed":false,"action":"none"}"#);
    }

    #[test]
    fn key_modifiers_follow_pointer_order() {
        let mut c = canvas();
        c.add_node("task");
        let action = |c: &mut FlowCanvas, key, shift, ctrl| {
            let out: serde_json::Value =
                serde_json::from_str(&c.handle_key(key, shift, ctrl, false, false)).unwrap();
            out["action"].as_str().unwrap().to_string()
        };
        assert_eq!(action(&mut c, "!", true, false), "fitToView");
        assert_eq!(action(&mut c, "=", false, true), "zoomIn");
        assert_eq!(action(&mut c, "=", true, false), "none");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut c = canvas();
        assert_eq!(c.add_node("bogus"), "");
        assert!(!c.update_node_json("nobody", r#"{"label":"x"}"#));
        assert!(!c.update_node_json("nobody", "not json"));
    }

    #[test]
    fn palette_lists_every_kind() {
        let list: Vec<serde_json::Value> = serde_json::from_str(&node_kinds_json()).unwrap();
        assert_eq!(list.len(), NodeKind::ALL.len());
        assert_eq!(list[0]["kind"], "start");
        assert_eq!(list[0]["defaultWidth"], 120.0);
    }

    #[test]
    fn connect_from_panel_button() {
        let mut c = canvas();
        let a = c.add_node("start");
        c.session.pan(flow_core::Vec2::new(-300.0, 0.0));
        let b = c.add_node("end");
        assert!(c.start_connection(&a));
        assert!(c.session.complete_connection(NodeId::intern(&b)).is_some());
        let scene: serde_json::Value = serde_json::from_str(&c.get_scene_json()).unwrap();
        assert_eq!(scene["edges"].as_array().unwrap().len(), 1);
    }
}
