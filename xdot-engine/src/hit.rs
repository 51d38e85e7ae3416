use xdot_core::geometry::{Point2, cubic_bezier_point, distance_to_segment, point_in_polygon};
use xdot_core::graph::{ElementKey, ElementRef, Graph, JumpTarget};
use xdot_core::shape::Shape;

use crate::transform::ViewTransform;

/// 每段贝塞尔曲线拆分的折线段数。
const BEZIER_SAMPLES: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    pub element: ElementKey,
    pub jump: Option<JumpTarget>,
}

/// 设备点命中测试：先逆序检查边，再逆序检查节点，后绘制者优先。
///
/// 线条没有内部，按 `tolerance_px`（设备像素）换算的点距离判断。
pub fn hit_test(
    graph: &Graph,
    transform: &ViewTransform,
    device_point: Point2,
    tolerance_px: f64,
) -> Option<HitResult> {
    let point = transform.to_graph(device_point);
    let tolerance = tolerance_px.max(0.0) / transform.zoom();

    let candidates = graph
        .edges()
        .iter()
        .rev()
        .map(ElementRef::Edge)
        .chain(graph.nodes().iter().rev().map(ElementRef::Node));

    for element in candidates {
        if element_contains(&element, point, tolerance) {
            return Some(HitResult {
                element: element.key(),
                jump: element.jump_at(point).cloned(),
            });
        }
    }
    None
}

pub fn element_contains(element: &ElementRef<'_>, point: Point2, tolerance: f64) -> bool {
    if let Some(bounds) = element.bounds() {
        if !bounds.expanded(tolerance).contains(point) {
            return false;
        }
    }
    element
        .shapes()
        .iter()
        .any(|shape| shape_contains(shape, point, tolerance))
}

/// 单个图形的点包含判定（点坐标）。不可见图形不参与命中。
pub fn shape_contains(shape: &Shape, point: Point2, tolerance: f64) -> bool {
    if shape.pen().is_some_and(|pen| pen.is_invisible()) {
        return false;
    }
    match shape {
        Shape::Ellipse(ellipse) => {
            let (rx, ry) = (ellipse.rx.abs(), ellipse.ry.abs());
            if rx <= f64::EPSILON || ry <= f64::EPSILON {
                return false;
            }
            let dx = (point.x() - ellipse.center.x()) / rx;
            let dy = (point.y() - ellipse.center.y()) / ry;
            dx * dx + dy * dy <= 1.0
        }
        Shape::Polygon(polygon) => point_in_polygon(point, &polygon.points),
        Shape::Polyline(polyline) => near_polyline(point, &polyline.points, tolerance),
        Shape::Bezier(bezier) => {
            let flattened = flatten_bezier(&bezier.points);
            near_polyline(point, &flattened, tolerance)
                || (bezier.filled && point_in_polygon(point, &flattened))
        }
        Shape::Text(_) | Shape::Image(_) => shape
            .bounds()
            .is_some_and(|bounds| bounds.contains(point)),
        Shape::Style(_) => false,
    }
}

fn near_polyline(point: Point2, points: &[Point2], tolerance: f64) -> bool {
    match points {
        [] => false,
        [single] => single.distance_squared(point) <= tolerance * tolerance,
        _ => points
            .windows(2)
            .any(|pair| distance_to_segment(point, pair[0], pair[1]) <= tolerance),
    }
}

fn flatten_bezier(points: &[Point2]) -> Vec<Point2> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let mut flattened = vec![*first];
    for segment in points[1..].chunks_exact(3) {
        let p0 = *flattened.last().unwrap_or(first);
        for step in 1..=BEZIER_SAMPLES {
            let t = step as f64 / BEZIER_SAMPLES as f64;
            flattened.push(cubic_bezier_point(p0, segment[0], segment[1], segment[2], t));
        }
    }
    flattened
}

#[cfg(test)]
mod tests {
    use xdot_core::geometry::{Bounds2D, Vector2};
    use xdot_core::graph::{Edge, EdgeKey, Node};
    use xdot_core::pen::Pen;
    use xdot_core::shape::{
        BezierShape, EllipseShape, PolygonShape, PolylineShape, TextAlign, TextShape,
    };

    use super::*;
    use crate::transform::ViewState;

    fn ellipse_node(id: &str, cx: f64, cy: f64, rx: f64, ry: f64) -> Node {
        Node::new(
            id,
            vec![Shape::Ellipse(EllipseShape {
                pen: Pen::default(),
                center: Point2::new(cx, cy),
                rx,
                ry,
                filled: false,
            })],
            None,
            None,
        )
    }

    fn graph_with(nodes: Vec<Node>, edges: Vec<Edge>) -> Graph {
        Graph::new(
            Some(Bounds2D::new(Point2::new(0.0, 0.0), Point2::new(100.0, 100.0))),
            Vec::new(),
            nodes,
            edges,
        )
    }

    fn identity(graph: &Graph) -> ViewTransform {
        ViewTransform::new(graph.bounds(), ViewState::default())
    }

    /// 点坐标 (x, y) 在恒等视图下的设备坐标。
    fn device(x: f64, y: f64) -> Point2 {
        Point2::new(x, 100.0 - y)
    }

    #[test]
    fn ellipse_equation_decides_node_hit() {
        let graph = graph_with(vec![ellipse_node("a", 50.0, 50.0, 20.0, 10.0)], Vec::new());
        let transform = identity(&graph);

        let hit = hit_test(&graph, &transform, device(55.0, 55.0), 0.0).unwrap();
        assert_eq!(hit.element, ElementKey::Node("a".into()));
        assert_eq!(hit.jump, Some(JumpTarget::Node("a".into())));

        assert!(hit_test(&graph, &transform, device(80.0, 80.0), 0.0).is_none());
        // 在包围盒角上但不在椭圆内。
        assert!(hit_test(&graph, &transform, device(68.0, 58.0), 0.0).is_none());
    }

    #[test]
    fn later_nodes_win_and_edges_before_nodes() {
        let edge = Edge::new(
            EdgeKey::new("a", "b"),
            vec![Shape::Bezier(BezierShape {
                pen: Pen::default(),
                points: vec![
                    Point2::new(0.0, 50.0),
                    Point2::new(30.0, 50.0),
                    Point2::new(70.0, 50.0),
                    Point2::new(100.0, 50.0),
                ],
                filled: false,
            })],
            None,
        );
        let graph = graph_with(
            vec![
                ellipse_node("a", 50.0, 50.0, 20.0, 20.0),
                ellipse_node("b", 55.0, 50.0, 20.0, 20.0),
            ],
            vec![edge],
        );
        let transform = identity(&graph);

        let on_edge = hit_test(&graph, &transform, device(50.0, 50.5), 2.0).unwrap();
        assert_eq!(on_edge.element, ElementKey::Edge(EdgeKey::new("a", "b")));

        let overlap = hit_test(&graph, &transform, device(50.0, 60.0), 2.0).unwrap();
        assert_eq!(overlap.element, ElementKey::Node("b".into()));

        let only_a = hit_test(&graph, &transform, device(32.0, 55.0), 2.0).unwrap();
        assert_eq!(only_a.element, ElementKey::Node("a".into()));
    }

    #[test]
    fn line_tolerance_is_in_device_pixels() {
        let edge = Edge::new(
            EdgeKey::new("a", "b"),
            vec![Shape::Polyline(PolylineShape {
                pen: Pen::default(),
                points: vec![Point2::new(10.0, 10.0), Point2::new(90.0, 10.0)],
            })],
            None,
        );
        let graph = graph_with(Vec::new(), vec![edge]);

        let zoomed = ViewTransform::new(graph.bounds(), ViewState::new(Vector2::zero(), 4.0));
        // 3px 容差在 4 倍缩放下为 0.75 点。
        let near = zoomed.to_device(Point2::new(50.0, 10.5));
        assert!(hit_test(&graph, &zoomed, near, 3.0).is_some());
        let far = zoomed.to_device(Point2::new(50.0, 11.5));
        assert!(hit_test(&graph, &zoomed, far, 3.0).is_none());
    }

    #[test]
    fn polygon_and_text_regions() {
        let triangle = Shape::Polygon(PolygonShape {
            pen: Pen::default(),
            points: vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(0.0, 10.0),
            ],
            filled: false,
        });
        assert!(shape_contains(&triangle, Point2::new(2.0, 2.0), 0.0));
        assert!(!shape_contains(&triangle, Point2::new(8.0, 8.0), 0.0));

        let text = Shape::Text(TextShape {
            pen: Pen::default(),
            anchor: Point2::new(30.0, 40.0),
            align: TextAlign::Right,
            width: 10.0,
            text: "hello".into(),
        });
        assert!(shape_contains(&text, Point2::new(25.0, 41.0), 0.0));
        assert!(!shape_contains(&text, Point2::new(31.0, 41.0), 0.0));
    }

    #[test]
    fn invisible_shapes_are_not_hit() {
        let mut pen = Pen::default();
        pen.set_invisible();
        let shape = Shape::Ellipse(EllipseShape {
            pen,
            center: Point2::new(0.0, 0.0),
            rx: 5.0,
            ry: 5.0,
            filled: true,
        });
        assert!(!shape_contains(&shape, Point2::new(0.0, 0.0), 1.0));
    }
}
