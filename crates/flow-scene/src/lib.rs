//! Render contract for the process designer canvas.
//!
//! - [`scene`]: the read-only frame description handed to renderers
//! - [`path`]: connection path geometry per connection style
//! - [`hit`]: point → port/node/connection lookup

pub mod hit;
pub mod path;
pub mod scene;

pub use hit::{Hit, hit_test};
pub use scene::{EdgeView, NodeView, Overlay, PreviewEdge, Scene};
