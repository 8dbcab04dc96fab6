//! Input abstraction layer.
//!
//! Normalizes host pointer, wheel, keyboard and drag-and-drop events into a
//! unified `InputEvent` consumed by the editor session. All positions are in
//! screen space (pixels relative to the canvas element).

use flow_core::{NodeKind, Point};
use serde::Deserialize;

/// Keyboard modifier state at the time of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Windows/Linux, ⌘ on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Which pointer button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => PointerButton::Middle,
            2 => PointerButton::Secondary,
            _ => PointerButton::Primary,
        }
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    /// Mouse wheel / trackpad scroll. Positive `dy` scrolls down.
    Wheel {
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
    },
    /// A palette item dropped on the canvas. `payload` is the raw drag data.
    Drop { x: f64, y: f64, payload: String },
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        Self::PointerDown {
            x,
            y,
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn pointer_up(x: f64, y: f64) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn drop(x: f64, y: f64, payload: impl Into<String>) -> Self {
        Self::Drop {
            x,
            y,
            payload: payload.into(),
        }
    }

    pub fn key(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.into(),
            modifiers,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::PointerDown { .. } => "pointer-down",
            Self::PointerMove { .. } => "pointer-move",
            Self::PointerUp { .. } => "pointer-up",
            Self::Wheel { .. } => "wheel",
            Self::Drop { .. } => "drop",
            Self::Key { .. } => "key",
        }
    }

    /// Screen position if this is a positional event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Drop { x, y, .. } => Some(Point::new(*x, *y)),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct PalettePayload {
    kind: Option<String>,
    #[serde(rename = "type")]
    type_: Option<String>,
}

/// Extract the node kind from a palette drop payload.
///
/// Accepts a bare kind (`task`) or a JSON object (`{"kind":"task"}`, with
/// `type` as an alias). Anything else yields `None`.
pub fn parse_drop_payload(payload: &str) -> Option<NodeKind> {
    let trimmed = payload.trim();
    if trimmed.starts_with('{') {
        let parsed: PalettePayload = serde_json::from_str(trimmed).ok()?;
        return parsed.kind.or(parsed.type_)?.parse().ok();
    }
    trimmed.parse().ok()
}
