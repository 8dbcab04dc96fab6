//! Interactive editing layer for the process canvas.
//!
//! [`EditorSession`] owns the graph, the view transform and the interaction
//! state machine. Hosts feed it [`InputEvent`]s and read back a
//! [`flow_scene::Scene`] to paint.

pub mod config;
pub mod error;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod state;

pub use config::{EditorConfig, PanModifier};
pub use error::EditorError;
pub use input::{InputEvent, Modifiers, PointerButton, parse_drop_payload};
pub use session::EditorSession;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use state::InteractionState;
