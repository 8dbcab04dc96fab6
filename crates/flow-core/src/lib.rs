pub mod connections;
pub mod fit;
pub mod geometry;
pub mod id;
pub mod lint;
pub mod model;
pub mod nodes;
pub mod snapshot;

pub use connections::{ConnectionRegistry, ConnectionRejected};
pub use fit::fit_to_view;
pub use geometry::{MAX_SCALE, MIN_SCALE, Transform, to_canvas, to_screen};
pub use id::{ConnectionId, NodeId};
pub use lint::{LintDiagnostic, LintSeverity, LintTarget, lint_graph};
pub use model::*;
pub use nodes::NodeRegistry;
pub use snapshot::{ProcessDocument, Snapshot, SnapshotError};

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Size, Vec2};
