//! Fit-to-view: frame every node inside the viewport.

use crate::geometry::Transform;
use crate::model::Node;
use kurbo::{Rect, Size, Vec2};

/// Compute a transform that shows every node with `padding` canvas units of
/// margin, centered in `viewport`.
///
/// Never zooms in past 100%; only zooms out to make the content fit.
/// Returns `None` when there are no nodes.
pub fn fit_to_view<'a, I>(nodes: I, viewport: Size, padding: f64) -> Option<Transform>
where
    I: IntoIterator<Item = &'a Node>,
{
    let bbox = nodes
        .into_iter()
        .map(Node::bounds)
        .reduce(|acc, r| acc.union(r))?;
    Some(fit_rect(bbox, viewport, padding))
}

/// [`fit_to_view`] for an already-computed content rectangle.
pub fn fit_rect(bbox: Rect, viewport: Size, padding: f64) -> Transform {
    let padded = bbox.inflate(padding, padding);
    let content = padded.size();

    let mut scale = 1.0_f64;
    if content.width > 0.0 {
        scale = scale.min(viewport.width / content.width);
    }
    if content.height > 0.0 {
        scale = scale.min(viewport.height / content.height);
    }

    let mut t = Transform::IDENTITY;
    t.set_scale(scale);

    let viewport_center = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);
    t.set_offset(viewport_center - padded.center().to_vec2() * t.scale());
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MAX_SCALE, MIN_SCALE};
    use crate::id::NodeId;
    use crate::model::NodeKind;
    use kurbo::Point;

    fn sized(id: &str, x: f64, y: f64, w: f64, h: f64) -> Node {
        let mut n = Node::new(NodeId::intern(id), NodeKind::Task, Point::new(x, y));
        n.size = Size::new(w, h);
        n
    }

    #[test]
    fn empty_is_noop() {
        let nodes: Vec<Node> = Vec::new();
        assert!(fit_to_view(&nodes, Size::new(800.0, 600.0), 50.0).is_none());
    }

    #[test]
    fn single_node_fits_at_full_scale_and_centers() {
        let nodes = vec![sized("fit_a", 50.0, 50.0, 100.0, 100.0)];
        let t = fit_to_view(&nodes, Size::new(200.0, 200.0), 0.0).unwrap();
        assert_eq!(t.scale(), 1.0);
        let c = t.to_screen(nodes[0].center());
        assert!((c.x - 100.0).abs() < 1e-9 && (c.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn never_zooms_in_past_one() {
        let nodes = vec![sized("fit_b", 0.0, 0.0, 10.0, 10.0)];
        let t = fit_to_view(&nodes, Size::new(1000.0, 1000.0), 0.0).unwrap();
        assert_eq!(t.scale(), 1.0);
    }

    #[test]
    fn zooms_out_to_limiting_axis() {
        let nodes = vec![
            sized("fit_c", 0.0, 0.0, 100.0, 100.0),
            sized("fit_d", 1900.0, 300.0, 100.0, 100.0),
        ];
        // content 2000x400 + 2*50 padding = 2100x500
        let t = fit_to_view(&nodes, Size::new(1050.0, 1000.0), 50.0).unwrap();
        assert!((t.scale() - 0.5).abs() < 1e-9);

        // Padded box is centered.
        let tl = t.to_screen(Point::new(-50.0, -50.0));
        let br = t.to_screen(Point::new(2050.0, 450.0));
        assert!((tl.x - 0.0).abs() < 1e-9);
        assert!((br.x - 1050.0).abs() < 1e-9);
        assert!(((tl.y + br.y) / 2.0 - 500.0).abs() < 1e-9);
    }

    #[test]
    fn scale_is_clamped_for_huge_content() {
        let nodes = vec![sized("fit_e", 0.0, 0.0, 100_000.0, 100.0)];
        let t = fit_to_view(&nodes, Size::new(800.0, 600.0), 0.0).unwrap();
        assert_eq!(t.scale(), MIN_SCALE);
        assert!(t.scale() <= MAX_SCALE);
    }
}
