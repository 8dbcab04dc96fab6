//! Interaction state: what the pointer is doing right now.
//!
//! Exactly one state is active. Gestures that span several events (pan, drag,
//! connect) keep their data here between callbacks instead of in loose flags.

use flow_core::{NodeId, Point, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging the view. `offset = anchor_offset + (pointer - anchor)`.
    Panning { anchor: Point, anchor_offset: Vec2 },
    /// Dragging a node. `grab_offset` is pointer minus node position, in canvas units.
    DraggingNode { node: NodeId, grab_offset: Vec2 },
    /// Drawing a connection out of `source`; `current` is the canvas pointer.
    Connecting { source: NodeId, current: Point },
}

impl InteractionState {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Panning { .. } => "panning",
            InteractionState::DraggingNode { .. } => "dragging",
            InteractionState::Connecting { .. } => "connecting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// The node this gesture is bound to, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            InteractionState::DraggingNode { node, .. } => Some(*node),
            InteractionState::Connecting { source, .. } => Some(*source),
            _ => None,
        }
    }
}
