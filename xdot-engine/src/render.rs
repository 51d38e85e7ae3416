use std::collections::HashSet;

use tracing::trace;
use xdot_core::geometry::{Bounds2D, Point2};
use xdot_core::graph::{ElementKey, Graph};
use xdot_core::pen::Pen;
use xdot_core::shape::Shape;

use crate::transform::{ViewTransform, Viewport};

/// 抽象 2D 画布。所有坐标均为设备像素，按调用顺序叠加绘制。
pub trait Canvas {
    fn viewport(&self) -> Viewport;
    /// 在后续绘制调用前应用画笔（线宽、虚线与字号已换算为设备像素）。
    fn set_pen(&mut self, pen: &Pen);
    fn draw_ellipse(&mut self, center: Point2, rx: f64, ry: f64, filled: bool);
    fn draw_polygon(&mut self, points: &[Point2], filled: bool);
    fn draw_polyline(&mut self, points: &[Point2]);
    fn draw_bezier(&mut self, points: &[Point2], filled: bool);
    /// `origin` 为文字左侧基线点。
    fn draw_text(&mut self, origin: Point2, text: &str, width: f64);
    fn draw_image(&mut self, rect: Bounds2D, path: &str);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub culled: usize,
    pub invisible: usize,
}

/// 按图形、节点、边的顺序回放图形，不修改图本身。
pub struct Renderer<'a> {
    graph: &'a Graph,
    transform: ViewTransform,
    highlighted: Option<&'a HashSet<ElementKey>>,
}

impl<'a> Renderer<'a> {
    pub fn new(graph: &'a Graph, transform: ViewTransform) -> Self {
        Self {
            graph,
            transform,
            highlighted: None,
        }
    }

    pub fn with_highlighted(mut self, highlighted: &'a HashSet<ElementKey>) -> Self {
        self.highlighted = Some(highlighted);
        self
    }

    pub fn render(&self, canvas: &mut dyn Canvas) -> RenderStats {
        let clip = canvas.viewport().bounds();
        let mut stats = RenderStats::default();

        for shape in self.graph.shapes() {
            self.draw_shape(shape, false, &clip, canvas, &mut stats);
        }
        for element in self.graph.elements() {
            let highlight = self
                .highlighted
                .is_some_and(|keys| keys.contains(&element.key()));
            for shape in element.shapes() {
                self.draw_shape(shape, highlight, &clip, canvas, &mut stats);
            }
        }

        trace!(
            drawn = stats.drawn,
            culled = stats.culled,
            invisible = stats.invisible,
            "渲染完成"
        );
        stats
    }

    fn draw_shape(
        &self,
        shape: &Shape,
        highlight: bool,
        clip: &Bounds2D,
        canvas: &mut dyn Canvas,
        stats: &mut RenderStats,
    ) {
        let Some(pen) = shape.pen() else {
            return;
        };
        if pen.is_invisible() {
            stats.invisible += 1;
            return;
        }
        if let Some(bounds) = shape.bounds() {
            // 描边宽度会超出几何范围，按线宽外扩后再裁剪。
            let device = self
                .transform
                .bounds_to_device(&bounds)
                .expanded(self.transform.scale_length(pen.line_width) * 0.5);
            if !device.intersects(clip) {
                stats.culled += 1;
                return;
            }
        }

        let pen = if highlight { pen.highlighted() } else { pen.clone() };
        canvas.set_pen(&self.device_pen(pen));

        let t = &self.transform;
        match shape {
            Shape::Ellipse(ellipse) => canvas.draw_ellipse(
                t.to_device(ellipse.center),
                t.scale_length(ellipse.rx),
                t.scale_length(ellipse.ry),
                ellipse.filled,
            ),
            Shape::Polygon(polygon) => {
                canvas.draw_polygon(&self.device_points(&polygon.points), polygon.filled)
            }
            Shape::Polyline(polyline) => {
                canvas.draw_polyline(&self.device_points(&polyline.points))
            }
            Shape::Bezier(bezier) => {
                canvas.draw_bezier(&self.device_points(&bezier.points), bezier.filled)
            }
            Shape::Text(text) => canvas.draw_text(
                t.to_device(Point2::new(text.left(), text.anchor.y())),
                &text.text,
                t.scale_length(text.width),
            ),
            Shape::Image(image) => {
                canvas.draw_image(t.bounds_to_device(&image.rect()), &image.path)
            }
            Shape::Style(_) => return,
        }
        stats.drawn += 1;
    }

    fn device_points(&self, points: &[Point2]) -> Vec<Point2> {
        points
            .iter()
            .map(|point| self.transform.to_device(*point))
            .collect()
    }

    fn device_pen(&self, mut pen: Pen) -> Pen {
        let zoom = self.transform.zoom();
        pen.line_width *= zoom;
        pen.font_size *= zoom;
        for dash in &mut pen.dash {
            *dash *= zoom;
        }
        pen
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Pen(Pen),
    Ellipse {
        center: Point2,
        rx: f64,
        ry: f64,
        filled: bool,
    },
    Polygon {
        points: Vec<Point2>,
        filled: bool,
    },
    Polyline {
        points: Vec<Point2>,
    },
    Bezier {
        points: Vec<Point2>,
        filled: bool,
    },
    Text {
        origin: Point2,
        text: String,
        width: f64,
    },
    Image {
        rect: Bounds2D,
        path: String,
    },
}

impl DrawCommand {
    pub fn is_primitive(&self) -> bool {
        !matches!(self, DrawCommand::Pen(_))
    }
}

/// 记录所有绘制调用的画布，供命令行与测试使用。
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn primitives(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|command| command.is_primitive())
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_pen(&mut self, pen: &Pen) {
        self.commands.push(DrawCommand::Pen(pen.clone()));
    }

    fn draw_ellipse(&mut self, center: Point2, rx: f64, ry: f64, filled: bool) {
        self.commands.push(DrawCommand::Ellipse {
            center,
            rx,
            ry,
            filled,
        });
    }

    fn draw_polygon(&mut self, points: &[Point2], filled: bool) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            filled,
        });
    }

    fn draw_polyline(&mut self, points: &[Point2]) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
        });
    }

    fn draw_bezier(&mut self, points: &[Point2], filled: bool) {
        self.commands.push(DrawCommand::Bezier {
            points: points.to_vec(),
            filled,
        });
    }

    fn draw_text(&mut self, origin: Point2, text: &str, width: f64) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
            width,
        });
    }

    fn draw_image(&mut self, rect: Bounds2D, path: &str) {
        self.commands.push(DrawCommand::Image {
            rect,
            path: path.to_string(),
        });
    }
}
