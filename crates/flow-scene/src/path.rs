//! Connection path geometry.
//!
//! Paths run from the source's output port to the target's input port, in
//! canvas space. The renderer applies the view transform.

use flow_core::{Connection, ConnectionKind, NodeRegistry};
use kurbo::{BezPath, Point};

/// Minimum horizontal reach of bezier control points.
const MIN_CONTROL_REACH: f64 = 40.0;
/// Corner radius for `smooth` step paths.
const CORNER_RADIUS: f64 = 8.0;

/// Port-to-port endpoints for a connection, or `None` if either node is gone.
pub fn endpoints(nodes: &NodeRegistry, conn: &Connection) -> Option<(Point, Point)> {
    let source = nodes.get(conn.source)?;
    let target = nodes.get(conn.target)?;
    Some((source.output_port(), target.input_port()))
}

/// Build the path for a connection style between two points.
pub fn connection_path(from: Point, to: Point, kind: ConnectionKind) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from);
    match kind {
        ConnectionKind::Straight => {
            path.line_to(to);
        }
        ConnectionKind::Default => {
            let reach = ((to.x - from.x).abs() * 0.5).max(MIN_CONTROL_REACH);
            path.curve_to(
                Point::new(from.x + reach, from.y),
                Point::new(to.x - reach, to.y),
                to,
            );
        }
        ConnectionKind::Step => {
            let mid_x = (from.x + to.x) / 2.0;
            path.line_to((mid_x, from.y));
            path.line_to((mid_x, to.y));
            path.line_to(to);
        }
        ConnectionKind::Smooth => smooth_step(&mut path, from, to),
    }
    path
}

/// Orthogonal step with quadratic rounded corners.
fn smooth_step(path: &mut BezPath, from: Point, to: Point) {
    let mid_x = (from.x + to.x) / 2.0;
    let dy = to.y - from.y;
    let r = CORNER_RADIUS
        .min(dy.abs() / 2.0)
        .min((mid_x - from.x).abs())
        .min((to.x - mid_x).abs());

    if r <= f64::EPSILON {
        path.line_to((mid_x, from.y));
        path.line_to((mid_x, to.y));
        path.line_to(to);
        return;
    }

    let sx = (mid_x - from.x).signum();
    let sy = dy.signum();
    let ex = (to.x - mid_x).signum();

    path.line_to((mid_x - sx * r, from.y));
    path.quad_to((mid_x, from.y), (mid_x, from.y + sy * r));
    path.line_to((mid_x, to.y - sy * r));
    path.quad_to((mid_x, to.y), (mid_x + ex * r, to.y));
    path.line_to(to);
}
