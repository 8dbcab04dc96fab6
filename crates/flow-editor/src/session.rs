//! The editor session: single owner of the process graph and the view.
//!
//! All mutation goes through this type, either via explicit operations
//! (palette, property panel, toolbar) or via [`EditorSession::handle`] for raw
//! input. Everything happens synchronously inside the call; gestures persist
//! only as [`InteractionState`] between events.
//!
//! Stale references (an event naming a node deleted a moment ago) are
//! no-ops, never errors. Operations report whether anything visible changed
//! so the host knows when to repaint.
//!
//! ## Pointer transitions
//!
//! | State       | Event                                  | Result                        |
//! |-------------|----------------------------------------|-------------------------------|
//! | Idle        | down, middle button / modifier+canvas  | Panning                       |
//! | Idle        | down on output port                    | Connecting                    |
//! | Idle        | down on node                           | DraggingNode (node selected)  |
//! | Idle        | down on connection / canvas            | select / clear, stay Idle     |
//! | Panning     | move / up                              | pan / Idle                    |
//! | DraggingNode| move / up                              | move node / Idle              |
//! | Connecting  | move                                   | update preview                |
//! | Connecting  | down on node / elsewhere               | complete / cancel → Idle      |
//! | Connecting  | up over another node                   | complete → Idle               |
//! | any         | drop with a valid kind                 | create node → Idle            |

use crate::config::{EditorConfig, PanModifier};
use crate::error::EditorError;
use crate::input::{InputEvent, Modifiers, PointerButton, parse_drop_payload};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::state::InteractionState;
use flow_core::snapshot::{capture, restore};
use flow_core::{
    ConnectionId, ConnectionPatch, ConnectionRegistry, LintDiagnostic, NodeId, NodeKind,
    NodePatch, NodeRegistry, Point, Selection, Size, Snapshot, Transform, Vec2,
    fit_to_view, lint_graph,
};
use flow_scene::hit::{self, Hit};
use flow_scene::{Overlay, Scene};

pub struct EditorSession {
    nodes: NodeRegistry,
    connections: ConnectionRegistry,
    transform: Transform,
    state: InteractionState,
    selection: Selection,
    hovered: Option<NodeId>,
    /// Canvas element size in screen pixels.
    viewport: Size,
    config: EditorConfig,
}

impl EditorSession {
    pub fn new(viewport: Size) -> Self {
        Self::with_config(viewport, EditorConfig::default())
    }

    pub fn with_config(viewport: Size, config: EditorConfig) -> Self {
        Self {
            nodes: NodeRegistry::new(),
            connections: ConnectionRegistry::new(),
            transform: Transform::IDENTITY,
            state: InteractionState::Idle,
            selection: Selection::None,
            hovered: None,
            viewport,
            config,
        }
    }

    // ─── Read access ─────────────────────────────────────────────────────

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    /// Derive the read-only render description for the current frame.
    pub fn scene(&self) -> Scene {
        let preview = match self.state {
            InteractionState::Connecting { source, current } => Some((source, current)),
            _ => None,
        };
        let overlay = Overlay {
            selection: self.selection,
            hovered: self.hovered,
            preview,
        };
        Scene::build(&self.nodes, &self.connections, self.transform, &overlay)
    }

    pub fn lint(&self) -> Vec<LintDiagnostic> {
        lint_graph(&self.nodes, &self.connections)
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn to_canvas(&self, screen: Point) -> Point {
        self.transform.to_canvas(screen)
    }

    pub fn to_screen(&self, canvas: Point) -> Point {
        self.transform.to_screen(canvas)
    }

    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_scale(&mut self, scale: f64) -> bool {
        let before = self.transform.scale();
        self.transform.set_scale(scale);
        self.transform.scale() != before
    }

    pub fn zoom_by(&mut self, delta: f64) -> bool {
        let before = self.transform.scale();
        self.transform.zoom_by(delta);
        self.transform.scale() != before
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-self.config.zoom_step)
    }

    pub fn pan(&mut self, screen_delta: Vec2) -> bool {
        let before = self.transform.offset();
        self.transform.pan(screen_delta);
        self.transform.offset() != before
    }

    pub fn reset_view(&mut self) -> bool {
        let changed = self.transform != Transform::IDENTITY;
        self.transform.reset();
        changed
    }

    /// Frame all nodes in the viewport. No-op on an empty graph.
    pub fn fit_to_view(&mut self) -> bool {
        match fit_to_view(self.nodes.iter(), self.viewport, self.config.fit_padding) {
            Some(t) => {
                let changed = t != self.transform;
                self.transform = t;
                changed
            }
            None => false,
        }
    }

    // ─── Nodes ───────────────────────────────────────────────────────────

    /// Place a node of `kind` with its top-left at `position` (canvas space)
    /// and select it.
    pub fn create_node(&mut self, kind: NodeKind, position: Point) -> NodeId {
        let id = self.nodes.create(kind, position).id;
        self.selection = Selection::Node(id);
        id
    }

    /// Palette click: place a node centered in the visible viewport.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let center = self.to_canvas(Point::new(
            self.viewport.width / 2.0,
            self.viewport.height / 2.0,
        ));
        let size = kind.default_size();
        let top_left = center - Vec2::new(size.width / 2.0, size.height / 2.0);
        self.create_node(kind, top_left)
    }

    pub fn move_node(&mut self, id: NodeId, position: Point) -> bool {
        self.nodes.move_to(id, position)
    }

    pub fn update_node_data(&mut self, id: NodeId, patch: NodePatch) -> bool {
        self.nodes.update(id, patch)
    }

    /// Remove a node and every connection touching it.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if self.nodes.remove(id).is_none() {
            log::debug!("delete_node: unknown {id}");
            return false;
        }
        let removed = self.connections.cascade_delete_for_node(id);

        let selection_gone = match self.selection {
            Selection::Node(sel) => sel == id,
            Selection::Connection(sel) => removed.contains(&sel),
            Selection::None => false,
        };
        if selection_gone {
            self.selection = Selection::None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.state.node() == Some(id) {
            self.transition(InteractionState::Idle);
        }
        true
    }

    /// Copy a node (data and size) next to the original and select the copy.
    pub fn duplicate_node(&mut self, id: NodeId) -> Option<NodeId> {
        let offset = self.config.duplicate_offset;
        let position = self.nodes.get(id)?.position + Vec2::new(offset, offset);
        let copy = self.nodes.duplicate(id, position)?;
        self.selection = Selection::Node(copy);
        Some(copy)
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Enter `Connecting` from `source`. Only allowed while idle.
    pub fn begin_connection(&mut self, source: NodeId) -> bool {
        if !self.state.is_idle() {
            log::debug!("begin_connection ignored while {}", self.state.name());
            return false;
        }
        let Some(node) = self.nodes.get(source) else {
            log::debug!("begin_connection: unknown {source}");
            return false;
        };
        let current = node.center();
        self.transition(InteractionState::Connecting { source, current });
        true
    }

    pub fn update_connection_preview(&mut self, canvas: Point) -> bool {
        match &mut self.state {
            InteractionState::Connecting { current, .. } => {
                *current = canvas;
                true
            }
            _ => false,
        }
    }

    /// Finish the in-progress connection at `target`. Self-loops and unknown
    /// targets are rejected; either way the machine returns to `Idle`.
    pub fn complete_connection(&mut self, target: NodeId) -> Option<ConnectionId> {
        let InteractionState::Connecting { source, .. } = self.state else {
            return None;
        };
        self.transition(InteractionState::Idle);
        match self.connections.connect(&self.nodes, source, target) {
            Ok(id) => Some(id),
            Err(reason) => {
                log::debug!("connection rejected: {reason}");
                None
            }
        }
    }

    pub fn cancel_connection(&mut self) -> bool {
        if matches!(self.state, InteractionState::Connecting { .. }) {
            self.transition(InteractionState::Idle);
            true
        } else {
            false
        }
    }

    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        if self.connections.remove(id).is_none() {
            return false;
        }
        if self.selection == Selection::Connection(id) {
            self.selection = Selection::None;
        }
        true
    }

    pub fn update_connection(&mut self, id: ConnectionId, patch: ConnectionPatch) -> bool {
        self.connections.update(id, patch)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select something that exists; unknown IDs leave the selection alone.
    pub fn select(&mut self, selection: Selection) -> bool {
        let exists = match selection {
            Selection::None => true,
            Selection::Node(id) => self.nodes.contains(id),
            Selection::Connection(id) => self.connections.contains(id),
        };
        if !exists || selection == self.selection {
            return false;
        }
        self.selection = selection;
        true
    }

    pub fn delete_selection(&mut self) -> bool {
        match self.selection {
            Selection::Node(id) => self.delete_node(id),
            Selection::Connection(id) => self.delete_connection(id),
            Selection::None => false,
        }
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        capture(&self.nodes, &self.connections)
    }

    /// Replace the whole graph. Only allowed while idle; invalid entries in
    /// the snapshot are dropped (see [`flow_core::snapshot::restore`]).
    pub fn load_snapshot(&mut self, snapshot: Snapshot) -> Result<(), EditorError> {
        if !self.state.is_idle() {
            return Err(EditorError::Busy(self.state.name()));
        }
        let (nodes, connections) = restore(snapshot);
        log::debug!(
            "loaded {} node(s), {} connection(s)",
            nodes.len(),
            connections.len()
        );
        self.nodes = nodes;
        self.connections = connections;
        self.selection = Selection::None;
        self.hovered = None;
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), EditorError> {
        let snapshot = Snapshot::from_json(json)?;
        self.load_snapshot(snapshot)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Hit test a screen point.
    pub fn hit_test(&self, screen: Point) -> Hit {
        self.hit_test_canvas(self.to_canvas(screen))
    }

    fn hit_test_canvas(&self, canvas: Point) -> Hit {
        hit::hit_test(
            &self.nodes,
            &self.connections,
            canvas,
            self.transform.screen_len_to_canvas(self.config.port_radius),
            self.transform
                .screen_len_to_canvas(self.config.connection_tolerance),
        )
    }

    /// Feed one input event. Returns `true` if the scene needs repainting.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        if let Some(p) = event.position().filter(|p| !p.is_finite()) {
            log::debug!("ignoring {} at non-finite ({}, {})", event.name(), p.x, p.y);
            return false;
        }
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.on_pointer_down(Point::new(*x, *y), *button, *modifiers),
            InputEvent::PointerMove { x, y, .. } => self.on_pointer_move(Point::new(*x, *y)),
            InputEvent::PointerUp { x, y, .. } => self.on_pointer_up(Point::new(*x, *y)),
            InputEvent::Wheel { dx, dy, modifiers } => self.on_wheel(*dx, *dy, *modifiers),
            InputEvent::Drop { x, y, payload } => self.on_drop(Point::new(*x, *y), payload),
            InputEvent::Key { key, modifiers } => match ShortcutMap::resolve(key, *modifiers) {
                Some(action) => self.dispatch(action),
                None => false,
            },
        }
    }

    /// Run a shortcut action (also used by toolbar buttons).
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::DeleteSelection => self.delete_selection(),
            ShortcutAction::Duplicate => match self.selection.node() {
                Some(id) => self.duplicate_node(id).is_some(),
                None => false,
            },
            ShortcutAction::Cancel => self.cancel_connection() || self.select(Selection::None),
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::ResetView => self.reset_view(),
            ShortcutAction::FitToView => self.fit_to_view(),
        }
    }

    fn pan_modifier_held(&self, modifiers: Modifiers) -> bool {
        match self.config.pan_modifier {
            PanModifier::Command => modifiers.command(),
            PanModifier::Alt => modifiers.alt,
            PanModifier::Shift => modifiers.shift,
        }
    }

    fn on_pointer_down(
        &mut self,
        screen: Point,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> bool {
        let canvas = self.to_canvas(screen);

        match self.state {
            // A click while connecting is always a connection attempt.
            InteractionState::Connecting { .. } => {
                return match self.hit_test_canvas(canvas).node() {
                    Some(target) => {
                        self.complete_connection(target);
                        true
                    }
                    None => self.cancel_connection(),
                };
            }
            InteractionState::Panning { .. } | InteractionState::DraggingNode { .. } => {
                log::debug!(
                    "pointer-down while {}; ending stale gesture",
                    self.state.name()
                );
                self.transition(InteractionState::Idle);
            }
            InteractionState::Idle => {}
        }

        let hit = self.hit_test_canvas(canvas);

        let modifier_pan = hit == Hit::Canvas
            && button == PointerButton::Primary
            && self.pan_modifier_held(modifiers);
        if button == PointerButton::Middle || modifier_pan {
            self.transition(InteractionState::Panning {
                anchor: screen,
                anchor_offset: self.transform.offset(),
            });
            return false;
        }
        if button != PointerButton::Primary {
            return false;
        }

        match hit {
            Hit::Port(id) => self.begin_connection(id),
            Hit::Node(id) => {
                let Some(node) = self.nodes.get(id) else {
                    return false;
                };
                let grab_offset = canvas - node.position;
                self.selection = Selection::Node(id);
                self.transition(InteractionState::DraggingNode {
                    node: id,
                    grab_offset,
                });
                true
            }
            Hit::Connection(id) => self.select(Selection::Connection(id)),
            Hit::Canvas => self.select(Selection::None),
        }
    }

    fn on_pointer_move(&mut self, screen: Point) -> bool {
        let canvas = self.to_canvas(screen);
        match self.state {
            InteractionState::Panning {
                anchor,
                anchor_offset,
            } => {
                self.transform.set_offset(anchor_offset + (screen - anchor));
                true
            }
            InteractionState::DraggingNode { node, grab_offset } => {
                let moved = self.nodes.move_to(node, canvas - grab_offset);
                if !moved {
                    // Node vanished mid-drag.
                    self.transition(InteractionState::Idle);
                }
                log::trace!("drag {node} to ({:.1}, {:.1})", canvas.x, canvas.y);
                moved
            }
            InteractionState::Connecting { .. } => {
                self.hovered = hit::node_at(&self.nodes, canvas);
                self.update_connection_preview(canvas)
            }
            InteractionState::Idle => {
                let hovered = hit::node_at(&self.nodes, canvas);
                let changed = hovered != self.hovered;
                self.hovered = hovered;
                changed
            }
        }
    }

    fn on_pointer_up(&mut self, screen: Point) -> bool {
        match self.state {
            InteractionState::Panning { .. } | InteractionState::DraggingNode { .. } => {
                self.transition(InteractionState::Idle);
                true
            }
            // Drag-to-connect: releasing over another node completes; releasing
            // anywhere else keeps the click-to-connect gesture alive.
            InteractionState::Connecting { source, .. } => {
                match self.hit_test(screen).node() {
                    Some(target) if target != source => {
                        self.complete_connection(target);
                        true
                    }
                    _ => false,
                }
            }
            InteractionState::Idle => false,
        }
    }

    fn on_wheel(&mut self, dx: f64, dy: f64, modifiers: Modifiers) -> bool {
        if self.pan_modifier_held(modifiers) {
            return self.pan(Vec2::new(-dx, -dy));
        }
        if dy < 0.0 {
            self.zoom_in()
        } else if dy > 0.0 {
            self.zoom_out()
        } else {
            false
        }
    }

    fn on_drop(&mut self, screen: Point, payload: &str) -> bool {
        let Some(kind) = parse_drop_payload(payload) else {
            log::debug!("ignoring drop payload {payload:?}");
            return false;
        };
        if !self.state.is_idle() {
            self.transition(InteractionState::Idle);
        }
        let position = self.to_canvas(screen);
        self.create_node(kind, position);
        true
    }

    fn transition(&mut self, next: InteractionState) {
        if self.state.name() != next.name() {
            log::debug!("state: {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }
}
