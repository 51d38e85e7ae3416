use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use xdot_core::geometry::{Bounds2D, Point2};
use xdot_core::graph::{Edge, EdgeKey, ElementKey, Graph, Node};
use xdot_core::shape::Shape;

use crate::XdotError;
use crate::parser::XdotParser;

/// 布局引擎输出的图，已按元素拆好属性。
///
/// `draw` 依次保存 `_draw_`、`_ldraw_` 等 xdot 属性字符串，
/// 每个字符串都从默认画笔开始解析。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSource {
    /// `bb` 属性：`[x0, y0, x1, y1]`。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extents: Option<[f64; 4]>,
    #[serde(default)]
    pub draw: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<NodeSource>,
    #[serde(default)]
    pub edges: Vec<EdgeSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSource {
    pub id: String,
    #[serde(default)]
    pub draw: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// 节点中心（点）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    /// 节点宽高（点）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeSource {
    pub tail: String,
    pub head: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub draw: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// 加载过程中的可恢复问题。`element` 为空表示图级别属性。
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDiagnostic {
    pub element: Option<ElementKey>,
    pub error: XdotError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub graph: Graph,
    pub diagnostics: Vec<ElementDiagnostic>,
    /// 组装时被改写路径的图片数。
    pub resolved_images: usize,
}

impl LoadReport {
    /// 被整体清空的元素数。
    pub fn failed_elements(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.error.is_element_scoped())
            .count()
    }
}

/// 把布局输出组装成场景图。
///
/// 单个元素解析失败只会清空该元素的图形并记录诊断；
/// 只有整份输入没有任何元素和几何时才返回 `GraphAssembly`。
pub fn assemble_graph(source: &GraphSource) -> Result<LoadReport, XdotError> {
    assemble_graph_with(source, |_| None)
}

/// 同 [`assemble_graph`]，但在元素构造前用 `resolve_image` 改写图片路径。
/// 返回 `None` 的路径保持原样。
pub fn assemble_graph_with<F>(
    source: &GraphSource,
    mut resolve_image: F,
) -> Result<LoadReport, XdotError>
where
    F: FnMut(&str) -> Option<String>,
{
    if source.nodes.is_empty()
        && source.edges.is_empty()
        && source.draw.iter().all(|draw| draw.trim().is_empty())
        && source.extents.is_none()
    {
        return Err(XdotError::GraphAssembly(
            "layout output has no nodes, edges, drawing or extents".to_string(),
        ));
    }

    let mut diagnostics = Vec::new();
    let mut images = ImageRewriter {
        resolve: &mut resolve_image,
        resolved: 0,
    };

    let (graph_shapes, graph_segments) =
        parse_element(None, &source.draw, &mut diagnostics, &mut images);

    let mut nodes = Vec::with_capacity(source.nodes.len());
    for node in &source.nodes {
        let key = ElementKey::Node(node.id.clone());
        let (shapes, segments) =
            parse_element(Some(&key), &node.draw, &mut diagnostics, &mut images);
        nodes.push(
            Node::new(
                node.id.clone(),
                shapes,
                intrinsic_bounds(node),
                node.url.clone(),
            )
            .with_segments(segments),
        );
    }

    let mut edges = Vec::with_capacity(source.edges.len());
    for edge in &source.edges {
        let mut edge_key = EdgeKey::new(edge.tail.clone(), edge.head.clone());
        edge_key.label = edge.label.clone();
        for endpoint in [&edge.tail, &edge.head] {
            if !source.nodes.iter().any(|node| &node.id == endpoint) {
                warn!(edge = %ElementKey::Edge(edge_key.clone()), node = %endpoint, "边引用了未声明的节点");
            }
        }
        let key = ElementKey::Edge(edge_key.clone());
        let (shapes, segments) =
            parse_element(Some(&key), &edge.draw, &mut diagnostics, &mut images);
        edges.push(Edge::new(edge_key, shapes, edge.url.clone()).with_segments(segments));
    }

    let extents = source
        .extents
        .map(|[x0, y0, x1, y1]| Bounds2D::new(Point2::new(x0, y0), Point2::new(x1, y1)));
    let resolved_images = images.resolved;
    let graph = Graph::new(extents, graph_shapes, nodes, edges).with_segments(graph_segments);

    info!(
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        diagnostics = diagnostics.len(),
        resolved_images,
        width = graph.bounds().width(),
        height = graph.bounds().height(),
        "xdot 图组装完成"
    );

    Ok(LoadReport {
        graph,
        diagnostics,
        resolved_images,
    })
}

struct ImageRewriter<'a> {
    resolve: &'a mut dyn FnMut(&str) -> Option<String>,
    resolved: usize,
}

impl ImageRewriter<'_> {
    fn rewrite(&mut self, shapes: &mut [Shape]) {
        for shape in shapes {
            if let Shape::Image(image) = shape {
                if let Some(path) = (self.resolve)(&image.path) {
                    image.path = path;
                    self.resolved += 1;
                }
            }
        }
    }
}

/// 返回元素的全部图形，以及每个属性字符串贡献的图形数。
fn parse_element(
    key: Option<&ElementKey>,
    draws: &[String],
    diagnostics: &mut Vec<ElementDiagnostic>,
    images: &mut ImageRewriter<'_>,
) -> (Vec<Shape>, Vec<usize>) {
    let mut shapes = Vec::new();
    let mut segments = Vec::with_capacity(draws.len());
    for draw in draws {
        match XdotParser::new(draw).parse() {
            Ok(mut parsed) => {
                images.rewrite(&mut parsed.shapes);
                segments.push(parsed.shapes.len());
                shapes.extend(parsed.shapes);
                diagnostics.extend(parsed.warnings.into_iter().map(|error| ElementDiagnostic {
                    element: key.cloned(),
                    error,
                }));
            }
            Err(error) => {
                warn!(
                    element = %describe(key),
                    error = %error,
                    "元素绘制指令无法解析，已清空该元素的图形"
                );
                diagnostics.push(ElementDiagnostic {
                    element: key.cloned(),
                    error,
                });
                return (Vec::new(), Vec::new());
            }
        }
    }
    debug!(element = %describe(key), shapes = shapes.len(), "元素解析完成");
    (shapes, segments)
}

fn describe(key: Option<&ElementKey>) -> String {
    key.map_or_else(|| "<graph>".to_string(), ToString::to_string)
}

fn intrinsic_bounds(node: &NodeSource) -> Option<Bounds2D> {
    let [x, y] = node.position?;
    let [width, height] = node.size.unwrap_or([0.0, 0.0]);
    let half_w = width.abs() * 0.5;
    let half_h = height.abs() * 0.5;
    Some(Bounds2D::new(
        Point2::new(x - half_w, y - half_h),
        Point2::new(x + half_w, y + half_h),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, draw: &str) -> NodeSource {
        NodeSource {
            id: id.to_string(),
            draw: vec![draw.to_string()],
            ..NodeSource::default()
        }
    }

    #[test]
    fn empty_source_is_rejected() {
        let err = assemble_graph(&GraphSource::default()).unwrap_err();
        assert!(matches!(err, XdotError::GraphAssembly(_)));
    }

    #[test]
    fn extents_alone_make_a_graph() {
        let source = GraphSource {
            extents: Some([0.0, 0.0, 100.0, 50.0]),
            ..GraphSource::default()
        };
        let report = assemble_graph(&source).unwrap();
        assert_eq!(report.graph.bounds().width(), 100.0);
        assert_eq!(report.graph.bounds().height(), 50.0);
    }

    #[test]
    fn broken_element_is_emptied_others_survive() {
        let source = GraphSource {
            nodes: vec![
                node("a", "e 0 0 10 10"),
                node("b", "e 50 50 10 10 Q 1"),
                node("c", "e 100 100 10 10"),
            ],
            ..GraphSource::default()
        };
        let report = assemble_graph(&source).unwrap();
        let graph = &report.graph;
        assert_eq!(graph.nodes().len(), 3);
        assert_eq!(graph.node("a").unwrap().shapes().len(), 1);
        assert!(graph.node("b").unwrap().shapes().is_empty());
        assert_eq!(graph.node("c").unwrap().shapes().len(), 1);
        assert_eq!(report.failed_elements(), 1);
        assert_eq!(
            report.diagnostics[0].element,
            Some(ElementKey::Node("b".to_string()))
        );
    }

    #[test]
    fn failure_in_label_string_empties_whole_element() {
        let source = GraphSource {
            nodes: vec![NodeSource {
                id: "a".into(),
                draw: vec!["e 0 0 10 10".into(), "T 0 0 0 10 99 -short".into()],
                ..NodeSource::default()
            }],
            ..GraphSource::default()
        };
        let report = assemble_graph(&source).unwrap();
        assert!(report.graph.node("a").unwrap().shapes().is_empty());
    }

    #[test]
    fn each_draw_string_starts_from_default_pen() {
        let source = GraphSource {
            nodes: vec![NodeSource {
                id: "a".into(),
                draw: vec!["c 3 -red e 0 0 1 1".into(), "e 0 0 2 2".into()],
                ..NodeSource::default()
            }],
            ..GraphSource::default()
        };
        let report = assemble_graph(&source).unwrap();
        let shapes = report.graph.node("a").unwrap().shapes();
        assert_eq!(
            shapes[0].pen().unwrap().color.representative().to_u8(),
            [255, 0, 0, 255]
        );
        assert_eq!(
            shapes[1].pen().unwrap().color.representative().to_u8(),
            [0, 0, 0, 255]
        );
    }

    #[test]
    fn shapes_stay_grouped_by_draw_string() {
        let source = GraphSource {
            draw: vec!["C 5 -white P 3 0 0 1 0 1 1".into()],
            edges: vec![EdgeSource {
                tail: "a".into(),
                head: "b".into(),
                draw: vec![
                    "S 4 -bold B 4 0 0 1 1 2 1 3 0".into(),
                    "".into(),
                    "F 14 11 -Times-Roman T 1 1 0 5 1 -x".into(),
                ],
                ..EdgeSource::default()
            }],
            ..GraphSource::default()
        };
        let report = assemble_graph(&source).unwrap();
        let edge = report.graph.element(&report.graph.edges()[0].key()).unwrap();
        let lengths: Vec<usize> = edge.draw_segments().iter().map(|s| s.len()).collect();
        assert_eq!(lengths, vec![1, 0, 1]);
        assert_eq!(report.graph.draw_segments().len(), 1);
    }

    #[test]
    fn image_paths_are_rewritten_before_assembly() {
        let source = GraphSource {
            nodes: vec![NodeSource {
                id: "a".into(),
                draw: vec!["I 0 0 10 5 8 -logo.png I 0 0 1 1 3 -x.y".into()],
                ..NodeSource::default()
            }],
            ..GraphSource::default()
        };
        let report = assemble_graph_with(&source, |path| {
            (path == "logo.png").then(|| format!("/assets/{path}"))
        })
        .unwrap();
        assert_eq!(report.resolved_images, 1);
        let paths: Vec<&str> = report
            .graph
            .node("a")
            .unwrap()
            .shapes()
            .iter()
            .filter_map(|shape| match shape {
                Shape::Image(image) => Some(image.path.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(paths, vec!["/assets/logo.png", "x.y"]);
        assert_eq!(assemble_graph(&source).unwrap().resolved_images, 0);
    }

    #[test]
    fn node_position_gives_bounds_without_shapes() {
        let source = GraphSource {
            nodes: vec![NodeSource {
                id: "a".into(),
                position: Some([50.0, 50.0]),
                size: Some([40.0, 20.0]),
                ..NodeSource::default()
            }],
            ..GraphSource::default()
        };
        let report = assemble_graph(&source).unwrap();
        let bounds = report.graph.node("a").unwrap().bounds().unwrap();
        assert_eq!(bounds.min(), Point2::new(30.0, 40.0));
        assert_eq!(bounds.max(), Point2::new(70.0, 60.0));
    }

    #[test]
    fn source_round_trips_through_json() {
        let json = r#"{
            "extents": [0, 0, 200, 100],
            "draw": ["C 5 -white P 4 0 0 200 0 200 100 0 100"],
            "nodes": [{"id": "a", "draw": ["e 50 50 20 10"], "url": "https://example.org"}],
            "edges": [{"tail": "a", "head": "a", "label": "loop", "draw": ["B 4 0 0 1 1 2 2 3 3"]}]
        }"#;
        let source: GraphSource = serde_json::from_str(json).unwrap();
        assert_eq!(source.nodes[0].url.as_deref(), Some("https://example.org"));
        assert_eq!(source.edges[0].label.as_deref(), Some("loop"));
        let report = assemble_graph(&source).unwrap();
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.graph.shapes().len(), 1);
        assert_eq!(report.graph.edges().len(), 1);
    }
}
