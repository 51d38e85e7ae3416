pub mod animation;
pub mod command;
pub mod hit;
pub mod render;
pub mod scene;

pub mod errors {
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq)]
    pub enum EngineError {
        #[error("no graph is loaded")]
        GraphNotLoaded,
        #[error("element {0} not found")]
        ElementNotFound(String),
        #[error("invalid search pattern `{pattern}`: {message}")]
        InvalidPattern { pattern: String, message: String },
    }
}

pub mod transform {
    use xdot_core::geometry::{Bounds2D, Point2, Vector2};

    pub const DEFAULT_ZOOM: f64 = 1.0;
    pub const MIN_ZOOM: f64 = 0.01;
    pub const MAX_ZOOM: f64 = 1_000.0;

    #[inline]
    pub fn clamp_zoom(value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(MIN_ZOOM, MAX_ZOOM)
        } else if value > 0.0 {
            MAX_ZOOM
        } else {
            MIN_ZOOM
        }
    }

    /// 设备像素尺寸的可见区域，原点在左上，y 轴向下。
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Viewport {
        pub width: f64,
        pub height: f64,
    }

    impl Viewport {
        pub fn new(width: f64, height: f64) -> Self {
            Self {
                width: width.max(0.0),
                height: height.max(0.0),
            }
        }

        #[inline]
        pub fn bounds(&self) -> Bounds2D {
            Bounds2D::from_origin_size(Point2::new(0.0, 0.0), self.width, self.height)
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            Point2::new(self.width * 0.5, self.height * 0.5)
        }
    }

    /// 平移（设备像素）与缩放。缩放始终位于 `[MIN_ZOOM, MAX_ZOOM]`。
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ViewState {
        pub pan: Vector2,
        pub zoom: f64,
    }

    impl ViewState {
        pub fn new(pan: Vector2, zoom: f64) -> Self {
            Self {
                pan,
                zoom: clamp_zoom(zoom),
            }
        }

        /// 平移与缩放各自线性插值。
        pub fn lerp(self, target: ViewState, t: f64) -> ViewState {
            let pan = self.pan.as_vec2().lerp(target.pan.as_vec2(), t);
            ViewState::new(Vector2::from(pan), self.zoom + (target.zoom - self.zoom) * t)
        }
    }

    impl Default for ViewState {
        fn default() -> Self {
            Self {
                pan: Vector2::zero(),
                zoom: DEFAULT_ZOOM,
            }
        }
    }

    /// 点坐标（左下原点、y 向上）与设备坐标之间的仿射变换。
    ///
    /// `device_x = (x - min_x) * z + pan_x`，`device_y = (max_y - y) * z + pan_y`。
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ViewTransform {
        min_x: f64,
        max_y: f64,
        state: ViewState,
    }

    impl ViewTransform {
        pub fn new(graph_bounds: Bounds2D, state: ViewState) -> Self {
            let (min_x, max_y) = if graph_bounds.is_empty() {
                (0.0, 0.0)
            } else {
                (graph_bounds.min().x(), graph_bounds.max().y())
            };
            Self {
                min_x,
                max_y,
                state: ViewState::new(state.pan, state.zoom),
            }
        }

        #[inline]
        pub fn zoom(&self) -> f64 {
            self.state.zoom
        }

        #[inline]
        pub fn state(&self) -> ViewState {
            self.state
        }

        pub fn to_device(&self, point: Point2) -> Point2 {
            let z = self.state.zoom;
            Point2::new(
                (point.x() - self.min_x) * z + self.state.pan.x(),
                (self.max_y - point.y()) * z + self.state.pan.y(),
            )
        }

        pub fn to_graph(&self, device: Point2) -> Point2 {
            let z = self.state.zoom;
            Point2::new(
                (device.x() - self.state.pan.x()) / z + self.min_x,
                self.max_y - (device.y() - self.state.pan.y()) / z,
            )
        }

        #[inline]
        pub fn scale_length(&self, length: f64) -> f64 {
            length * self.state.zoom
        }

        pub fn bounds_to_device(&self, bounds: &Bounds2D) -> Bounds2D {
            if bounds.is_empty() {
                return *bounds;
            }
            Bounds2D::new(self.to_device(bounds.min()), self.to_device(bounds.max()))
        }

        pub fn bounds_to_graph(&self, bounds: &Bounds2D) -> Bounds2D {
            if bounds.is_empty() {
                return *bounds;
            }
            Bounds2D::new(self.to_graph(bounds.min()), self.to_graph(bounds.max()))
        }

        /// 让点坐标 `center` 落在视口中心所需的视图。
        pub fn centered_on(&self, center: Point2, zoom: f64, viewport: Viewport) -> ViewState {
            let zoom = clamp_zoom(zoom);
            let screen = viewport.center();
            ViewState::new(
                Vector2::new(
                    screen.x() - (center.x() - self.min_x) * zoom,
                    screen.y() - (self.max_y - center.y()) * zoom,
                ),
                zoom,
            )
        }

        /// 以设备点 `anchor` 为不动点改变缩放。
        pub fn zoom_about(&self, anchor: Point2, zoom: f64) -> ViewState {
            let zoom = clamp_zoom(zoom);
            let fixed = self.to_graph(anchor);
            ViewState::new(
                Vector2::new(
                    anchor.x() - (fixed.x() - self.min_x) * zoom,
                    anchor.y() - (self.max_y - fixed.y()) * zoom,
                ),
                zoom,
            )
        }
    }

    /// 让 `bounds` 在 `available` 大小内完整可见的最大缩放；零尺寸轴不参与约束。
    fn fit_zoom(width: f64, height: f64, available_w: f64, available_h: f64) -> f64 {
        let mut zoom = f64::INFINITY;
        if width > 0.0 {
            zoom = zoom.min(available_w / width);
        }
        if height > 0.0 {
            zoom = zoom.min(available_h / height);
        }
        if zoom.is_finite() {
            clamp_zoom(zoom)
        } else {
            DEFAULT_ZOOM
        }
    }

    /// 缩放到整图可见：`z = min(vw / bw, vh / bh)`，剩余方向居中。
    pub fn fit_view(bounds: Bounds2D, viewport: Viewport, margin: f64) -> ViewState {
        let margin = margin.max(0.0);
        let available_w = (viewport.width - 2.0 * margin).max(1.0);
        let available_h = (viewport.height - 2.0 * margin).max(1.0);
        let zoom = fit_zoom(bounds.width(), bounds.height(), available_w, available_h);
        ViewState::new(
            Vector2::new(
                margin + (available_w - bounds.width() * zoom) * 0.5,
                margin + (available_h - bounds.height() * zoom) * 0.5,
            ),
            zoom,
        )
    }

    /// 设备矩形 `area` 放大到填满视口。
    pub fn area_view(transform: &ViewTransform, area: Bounds2D, viewport: Viewport) -> ViewState {
        let graph_area = transform.bounds_to_graph(&area);
        let zoom = fit_zoom(
            graph_area.width(),
            graph_area.height(),
            viewport.width.max(1.0),
            viewport.height.max(1.0),
        );
        transform.centered_on(graph_area.center(), zoom, viewport)
    }

    /// 居中显示元素；保持当前缩放，元素放不下时缩小到刚好放下。
    pub fn jump_view(
        transform: &ViewTransform,
        element: Bounds2D,
        viewport: Viewport,
    ) -> ViewState {
        let mut zoom = transform.zoom();
        if element.width() * zoom > viewport.width || element.height() * zoom > viewport.height {
            zoom = zoom.min(fit_zoom(
                element.width(),
                element.height(),
                viewport.width.max(1.0),
                viewport.height.max(1.0),
            ));
        }
        transform.centered_on(element.center(), zoom, viewport)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn approx(a: f64, b: f64) -> bool {
            (a - b).abs() < 1e-9
        }

        fn bounds(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds2D {
            Bounds2D::new(Point2::new(x0, y0), Point2::new(x1, y1))
        }

        #[test]
        fn fit_wide_graph_into_square_viewport() {
            let view = fit_view(bounds(0.0, 0.0, 200.0, 100.0), Viewport::new(100.0, 100.0), 0.0);
            assert!(approx(view.zoom, 0.5));
            assert!(approx(view.pan.x(), 0.0));
            assert!(approx(view.pan.y(), 25.0));

            let transform = ViewTransform::new(bounds(0.0, 0.0, 200.0, 100.0), view);
            let top_left = transform.to_device(Point2::new(0.0, 100.0));
            let bottom_right = transform.to_device(Point2::new(200.0, 0.0));
            assert!(approx(top_left.x(), 0.0) && approx(top_left.y(), 25.0));
            assert!(approx(bottom_right.x(), 100.0) && approx(bottom_right.y(), 75.0));
        }

        #[test]
        fn fit_honours_margin() {
            let view = fit_view(bounds(0.0, 0.0, 100.0, 100.0), Viewport::new(120.0, 120.0), 10.0);
            assert!(approx(view.zoom, 1.0));
            assert!(approx(view.pan.x(), 10.0));
            assert!(approx(view.pan.y(), 10.0));
        }

        #[test]
        fn degenerate_graph_fits_at_default_zoom() {
            let view = fit_view(bounds(0.0, 0.0, 0.0, 0.0), Viewport::new(100.0, 80.0), 0.0);
            assert!(approx(view.zoom, DEFAULT_ZOOM));
            assert!(approx(view.pan.x(), 50.0));
            assert!(approx(view.pan.y(), 40.0));
        }

        #[test]
        fn transform_round_trips() {
            let graph = bounds(-30.0, 12.0, 410.0, 95.5);
            for zoom in [0.01, 0.37, 1.0, 2.5, 999.0] {
                for pan in [(0.0, 0.0), (-120.5, 33.25), (1e4, -7.0)] {
                    let transform =
                        ViewTransform::new(graph, ViewState::new(Vector2::new(pan.0, pan.1), zoom));
                    for point in [(0.0, 0.0), (-30.0, 95.5), (123.456, -789.0)] {
                        let p = Point2::new(point.0, point.1);
                        let back = transform.to_graph(transform.to_device(p));
                        assert!((back.x() - p.x()).abs() < 1e-6, "{zoom} {pan:?} {point:?}");
                        assert!((back.y() - p.y()).abs() < 1e-6, "{zoom} {pan:?} {point:?}");
                    }
                }
            }
        }

        #[test]
        fn zoom_is_clamped() {
            assert_eq!(ViewState::new(Vector2::zero(), 0.0).zoom, MIN_ZOOM);
            assert_eq!(ViewState::new(Vector2::zero(), -3.0).zoom, MIN_ZOOM);
            assert_eq!(ViewState::new(Vector2::zero(), 1e9).zoom, MAX_ZOOM);
            assert_eq!(ViewState::new(Vector2::zero(), f64::NAN).zoom, MIN_ZOOM);
        }

        #[test]
        fn zoom_about_keeps_anchor_fixed() {
            let graph = bounds(0.0, 0.0, 100.0, 100.0);
            let transform = ViewTransform::new(graph, ViewState::new(Vector2::new(5.0, 7.0), 1.0));
            let anchor = Point2::new(30.0, 40.0);
            let before = transform.to_graph(anchor);
            let zoomed = ViewTransform::new(graph, transform.zoom_about(anchor, 2.5));
            let after = zoomed.to_graph(anchor);
            assert!(approx(before.x(), after.x()) && approx(before.y(), after.y()));
        }

        #[test]
        fn area_fills_viewport() {
            let graph = bounds(0.0, 0.0, 200.0, 200.0);
            let transform = ViewTransform::new(graph, ViewState::default());
            let viewport = Viewport::new(100.0, 100.0);
            let view = area_view(&transform, bounds(0.0, 0.0, 50.0, 25.0), viewport);
            assert!(approx(view.zoom, 2.0));
            let zoomed = ViewTransform::new(graph, view);
            let center = zoomed.to_device(Point2::new(25.0, 187.5));
            assert!(approx(center.x(), 50.0) && approx(center.y(), 50.0));
        }

        #[test]
        fn jump_keeps_zoom_when_element_fits() {
            let graph = bounds(0.0, 0.0, 1000.0, 1000.0);
            let transform = ViewTransform::new(graph, ViewState::new(Vector2::zero(), 2.0));
            let viewport = Viewport::new(200.0, 100.0);

            let small = bounds(500.0, 500.0, 540.0, 520.0);
            let view = jump_view(&transform, small, viewport);
            assert!(approx(view.zoom, 2.0));
            let center = ViewTransform::new(graph, view).to_device(small.center());
            assert!(approx(center.x(), 100.0) && approx(center.y(), 50.0));

            let large = bounds(0.0, 0.0, 400.0, 100.0);
            let view = jump_view(&transform, large, viewport);
            assert!(approx(view.zoom, 0.5));
        }
    }
}

pub use errors::EngineError;
pub use transform::{ViewState, ViewTransform, Viewport};
