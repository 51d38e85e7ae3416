use std::collections::HashSet;
use std::fmt::Display;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::{debug, info, warn};
use xdot_core::geometry::{Bounds2D, Point2, Vector2};
use xdot_core::graph::{ElementKey, Graph};
use xdot_core::shape::Shape;

use crate::animation::Animator;
use crate::errors::EngineError;
use crate::hit::{HitResult, hit_test};
use crate::render::{Canvas, RenderStats, Renderer};
use crate::transform::{
    ViewState, ViewTransform, Viewport, area_view, clamp_zoom, fit_view, jump_view,
};

/// 交互参数，通常来自配置文件。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub animation: Duration,
    /// 缩放到整图时四周保留的设备像素。
    pub fit_margin: f64,
    pub zoom_increment: f64,
    pub hit_tolerance_px: f64,
    pub pan_step_px: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            animation: Duration::from_millis(500),
            fit_margin: 0.0,
            zoom_increment: 1.25,
            hit_tolerance_px: 4.0,
            pan_step_px: 100.0,
        }
    }
}

/// 引擎层维护当前图与运行时视图状态（平移缩放、动画、悬停与查找高亮）。
#[derive(Debug)]
pub struct Scene {
    graph: Option<Graph>,
    viewport: Viewport,
    view: ViewState,
    animator: Animator,
    settings: ViewSettings,
    hovered: Option<ElementKey>,
    found: Vec<ElementKey>,
    highlighted: HashSet<ElementKey>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_settings(viewport, ViewSettings::default())
    }

    pub fn with_settings(viewport: Viewport, settings: ViewSettings) -> Self {
        Self {
            graph: None,
            viewport,
            view: ViewState::default(),
            animator: Animator::new(),
            settings,
            hovered: None,
            found: Vec::new(),
            highlighted: HashSet::new(),
        }
    }

    #[inline]
    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    #[inline]
    pub fn view(&self) -> ViewState {
        self.view
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform::new(self.bounding_box(), self.view)
    }

    /// 整图范围；尚未加载时为原点处的零尺寸范围。
    pub fn bounding_box(&self) -> Bounds2D {
        self.graph.as_ref().map_or_else(
            || Bounds2D::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0)),
            Graph::bounds,
        )
    }

    /// 替换当前图并立即缩放到整图。
    pub fn load_graph(&mut self, graph: Graph) {
        info!(
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            "载入新图"
        );
        self.graph = Some(graph);
        self.reset_interaction();
        self.animator.cancel();
        self.view = self.fit_target();
    }

    /// 在旁路构建新图后整体替换，保留当前视图；失败时保留旧图。
    pub fn reload<E, F>(&mut self, build: F) -> Result<(), E>
    where
        E: Display,
        F: FnOnce() -> Result<Graph, E>,
    {
        match build() {
            Ok(graph) => {
                if self.graph.is_none() {
                    self.load_graph(graph);
                } else {
                    info!(
                        nodes = graph.nodes().len(),
                        edges = graph.edges().len(),
                        "重新加载图"
                    );
                    self.graph = Some(graph);
                    self.reset_interaction();
                }
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "重新加载失败，保留当前图");
                Err(err)
            }
        }
    }

    fn reset_interaction(&mut self) {
        self.hovered = None;
        self.found.clear();
        self.rebuild_highlight();
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) -> RenderStats {
        let Some(graph) = &self.graph else {
            return RenderStats::default();
        };
        Renderer::new(graph, self.transform())
            .with_highlighted(&self.highlighted)
            .render(canvas)
    }

    pub fn hit_test(&self, device_point: Point2) -> Option<HitResult> {
        let graph = self.graph.as_ref()?;
        hit_test(
            graph,
            &self.transform(),
            device_point,
            self.settings.hit_tolerance_px,
        )
    }

    fn fit_target(&self) -> ViewState {
        fit_view(self.bounding_box(), self.viewport, self.settings.fit_margin)
    }

    fn animate_to(&mut self, target: ViewState) {
        if self.settings.animation.is_zero() {
            self.animator.cancel();
            self.view = target;
        } else {
            self.animator.start(self.view, target, self.settings.animation);
        }
    }

    pub fn zoom_to_fit(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let target = self.fit_target();
        debug!(zoom = target.zoom, "缩放到整图");
        self.animate_to(target);
    }

    /// 将设备矩形放大到填满视口。
    pub fn zoom_to_area(&mut self, area: Bounds2D) {
        if area.is_empty() || area.width() <= 0.0 || area.height() <= 0.0 {
            debug!("忽略零面积的缩放区域");
            return;
        }
        let target = area_view(&self.transform(), area, self.viewport);
        self.animate_to(target);
    }

    pub fn jump_to(&mut self, key: &ElementKey) -> Result<(), EngineError> {
        let graph = self.graph.as_ref().ok_or(EngineError::GraphNotLoaded)?;
        let element = graph
            .element(key)
            .ok_or_else(|| EngineError::ElementNotFound(key.to_string()))?;
        let Some(bounds) = element.bounds() else {
            debug!(element = %key, "元素没有几何范围，不移动视图");
            return Ok(());
        };
        let target = jump_view(&self.transform(), bounds, self.viewport);
        debug!(element = %key, zoom = target.zoom, "跳转到元素");
        self.animate_to(target);
        Ok(())
    }

    /// 推进动画，返回是否仍需继续请求帧。
    pub fn advance_animation(&mut self, now: Instant) -> bool {
        if let Some(view) = self.animator.advance(now) {
            self.view = view;
        }
        self.animator.is_animating()
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// 停止动画，保持当前插值位置。
    pub fn halt_animation(&mut self) -> bool {
        self.animator.cancel()
    }

    pub fn pan_by(&mut self, delta: Vector2) {
        self.animator.cancel();
        let pan = Vector2::from(self.view.pan.as_vec2() + delta.as_vec2());
        self.view = ViewState::new(pan, self.view.zoom);
    }

    /// 按配置步长平移，`dx`/`dy` 为步数（正值使图向右/向下移动）。
    pub fn pan_steps(&mut self, dx: i32, dy: i32) {
        let step = self.settings.pan_step_px;
        self.pan_by(Vector2::new(dx as f64 * step, dy as f64 * step));
    }

    /// 设置缩放，`anchor` 为保持不动的设备点，缺省为视口中心。
    pub fn set_zoom(&mut self, zoom: f64, anchor: Option<Point2>) {
        self.animator.cancel();
        let anchor = anchor.unwrap_or_else(|| self.viewport.center());
        self.view = self.transform().zoom_about(anchor, clamp_zoom(zoom));
    }

    pub fn zoom_in(&mut self, anchor: Option<Point2>) {
        self.set_zoom(self.view.zoom * self.settings.zoom_increment, anchor);
    }

    pub fn zoom_out(&mut self, anchor: Option<Point2>) {
        self.set_zoom(self.view.zoom / self.settings.zoom_increment, anchor);
    }

    /// 更新悬停元素，返回高亮是否变化。
    pub fn hover(&mut self, device_point: Point2) -> bool {
        let hovered = self.hit_test(device_point).map(|hit| hit.element);
        if hovered == self.hovered {
            return false;
        }
        self.hovered = hovered;
        self.rebuild_highlight();
        true
    }

    #[inline]
    pub fn hovered(&self) -> Option<&ElementKey> {
        self.hovered.as_ref()
    }

    #[inline]
    pub fn highlighted(&self) -> &HashSet<ElementKey> {
        &self.highlighted
    }

    /// 按正则查找元素文字，高亮全部结果并跳转到第一个。
    pub fn find(&mut self, pattern: &str) -> Result<Vec<ElementKey>, EngineError> {
        let regex = Regex::new(pattern).map_err(|err| EngineError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        let graph = self.graph.as_ref().ok_or(EngineError::GraphNotLoaded)?;
        let matches: Vec<ElementKey> = graph
            .elements()
            .filter(|element| {
                element.shapes().iter().any(|shape| match shape {
                    Shape::Text(text) => regex.is_match(&text.text),
                    _ => false,
                })
            })
            .map(|element| element.key())
            .collect();

        debug!(pattern, matches = matches.len(), "查找元素");
        self.found = matches.clone();
        self.rebuild_highlight();
        if let Some(first) = matches.first() {
            self.jump_to(first)?;
        }
        Ok(matches)
    }

    pub fn clear_find(&mut self) {
        self.found.clear();
        self.rebuild_highlight();
    }

    fn rebuild_highlight(&mut self) {
        self.highlighted = self
            .found
            .iter()
            .cloned()
            .chain(self.hovered.clone())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use xdot_core::graph::{Edge, EdgeKey, Node};
    use xdot_core::pen::Pen;
    use xdot_core::shape::{EllipseShape, TextAlign, TextShape};

    use super::*;
    use crate::render::RecordingCanvas;

    fn labelled_node(id: &str, cx: f64, cy: f64, label: &str) -> Node {
        Node::new(
            id,
            vec![
                Shape::Ellipse(EllipseShape {
                    pen: Pen::default(),
                    center: Point2::new(cx, cy),
                    rx: 20.0,
                    ry: 10.0,
                    filled: false,
                }),
                Shape::Text(TextShape {
                    pen: Pen::default(),
                    anchor: Point2::new(cx, cy - 4.0),
                    align: TextAlign::Center,
                    width: 10.0,
                    text: label.to_string(),
                }),
            ],
            None,
            None,
        )
    }

    fn demo_graph() -> Graph {
        Graph::new(
            Some(Bounds2D::new(Point2::new(0.0, 0.0), Point2::new(200.0, 100.0))),
            Vec::new(),
            vec![
                labelled_node("a", 50.0, 50.0, "alpha"),
                labelled_node("b", 150.0, 50.0, "beta"),
            ],
            vec![Edge::new(EdgeKey::new("a", "b"), Vec::new(), None)],
        )
    }

    fn scene() -> Scene {
        let mut scene = Scene::new(Viewport::new(100.0, 100.0));
        scene.load_graph(demo_graph());
        scene
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn loading_fits_graph_immediately() {
        let scene = scene();
        assert!(approx(scene.view().zoom, 0.5));
        assert!(approx(scene.view().pan.y(), 25.0));
        assert!(!scene.is_animating());
        assert_eq!(scene.bounding_box().width(), 200.0);
    }

    #[test]
    fn empty_scene_draws_nothing_and_cannot_jump() {
        let mut scene = Scene::new(Viewport::new(100.0, 100.0));
        let mut canvas = RecordingCanvas::new(scene.viewport());
        assert_eq!(scene.draw(&mut canvas), RenderStats::default());
        assert!(scene.hit_test(Point2::new(1.0, 1.0)).is_none());
        assert_eq!(
            scene.jump_to(&ElementKey::Node("a".into())),
            Err(EngineError::GraphNotLoaded)
        );
    }

    #[test]
    fn jump_animates_and_centers_element() {
        let mut scene = scene();
        scene.set_zoom(1.0, None);
        scene
            .jump_to(&ElementKey::Node("b".into()))
            .expect("node exists");
        assert!(scene.is_animating());

        let t0 = Instant::now();
        assert!(scene.advance_animation(t0));
        assert!(scene.advance_animation(t0 + Duration::from_millis(250)));
        assert!(!scene.advance_animation(t0 + Duration::from_millis(500)));

        let center = scene.transform().to_device(Point2::new(150.0, 50.0));
        assert!(approx(center.x(), 50.0) && approx(center.y(), 50.0));
        assert!(approx(scene.view().zoom, 1.0));
    }

    #[test]
    fn jump_to_unknown_element_fails() {
        let mut scene = scene();
        let err = scene.jump_to(&ElementKey::Node("zzz".into())).unwrap_err();
        assert_eq!(err, EngineError::ElementNotFound("zzz".into()));
    }

    #[test]
    fn manual_pan_cancels_animation_and_keeps_view() {
        let mut scene = scene();
        scene.zoom_to_area(Bounds2D::new(Point2::new(0.0, 25.0), Point2::new(50.0, 75.0)));
        let t0 = Instant::now();
        scene.advance_animation(t0);
        scene.advance_animation(t0 + Duration::from_millis(100));
        let mid = scene.view();

        scene.pan_steps(1, 0);
        assert!(!scene.is_animating());
        assert!(approx(scene.view().pan.x(), mid.pan.x() + 100.0));
        assert!(approx(scene.view().zoom, mid.zoom));
        assert!(!scene.advance_animation(t0 + Duration::from_secs(5)));
        assert!(approx(scene.view().zoom, mid.zoom));
    }

    #[test]
    fn zoom_steps_keep_anchor() {
        let mut scene = scene();
        let anchor = Point2::new(30.0, 40.0);
        let before = scene.transform().to_graph(anchor);
        scene.zoom_in(Some(anchor));
        assert!(approx(scene.view().zoom, 0.625));
        let after = scene.transform().to_graph(anchor);
        assert!(approx(before.x(), after.x()) && approx(before.y(), after.y()));
        scene.zoom_out(None);
        assert!(approx(scene.view().zoom, 0.5));
    }

    #[test]
    fn zoom_to_fit_animates_back() {
        let mut scene = scene();
        scene.set_zoom(3.0, None);
        scene.zoom_to_fit(Viewport::new(100.0, 100.0));
        assert!(scene.is_animating());
        let t0 = Instant::now();
        scene.advance_animation(t0);
        scene.advance_animation(t0 + Duration::from_secs(1));
        assert!(approx(scene.view().zoom, 0.5));
        assert!(approx(scene.view().pan.y(), 25.0));
    }

    #[test]
    fn hover_highlights_element_under_pointer() {
        let mut scene = scene();
        let device = scene.transform().to_device(Point2::new(50.0, 50.0));
        assert!(scene.hover(device));
        assert_eq!(scene.hovered(), Some(&ElementKey::Node("a".into())));
        assert!(!scene.hover(device));
        assert!(scene.highlighted().contains(&ElementKey::Node("a".into())));

        assert!(scene.hover(Point2::new(-50.0, -50.0)));
        assert!(scene.highlighted().is_empty());
    }

    #[test]
    fn find_highlights_matches_and_jumps_to_first() {
        let mut scene = scene();
        let found = scene.find("^b").expect("valid pattern");
        assert_eq!(found, vec![ElementKey::Node("b".into())]);
        assert!(scene.is_animating());
        assert!(scene.highlighted().contains(&ElementKey::Node("b".into())));

        let found = scene.find("a").unwrap();
        assert_eq!(found.len(), 2);

        assert!(matches!(
            scene.find("("),
            Err(EngineError::InvalidPattern { .. })
        ));
        scene.clear_find();
        assert!(scene.highlighted().is_empty());
    }

    #[test]
    fn failed_reload_keeps_previous_graph() {
        let mut scene = scene();
        let result: Result<(), String> = scene.reload(|| Err("dot crashed".to_string()));
        assert!(result.is_err());
        assert_eq!(scene.graph().unwrap().nodes().len(), 2);

        let view = scene.view();
        scene
            .reload(|| {
                Ok::<_, String>(Graph::new(
                    None,
                    Vec::new(),
                    vec![labelled_node("c", 10.0, 10.0, "gamma")],
                    Vec::new(),
                ))
            })
            .unwrap();
        assert_eq!(scene.graph().unwrap().nodes().len(), 1);
        assert_eq!(scene.view(), view);
    }

    #[test]
    fn draw_renders_highlighted_scene() {
        let mut scene = scene();
        scene.find("alpha").unwrap();
        let mut canvas = RecordingCanvas::new(scene.viewport());
        let stats = scene.draw(&mut canvas);
        assert_eq!(stats.drawn, 4);
    }
}
