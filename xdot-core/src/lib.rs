mod named_colors;

pub use named_colors::ColorScheme;

pub mod geometry {
    use glam::DVec2;
    use serde::{Deserialize, Serialize};

    /// 二维点（Graphviz 点坐标：原点在左下，y 轴向上），内部以 `glam::DVec2` 表示。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn distance_squared(self, other: Point2) -> f64 {
            self.0.distance_squared(other.0)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维向量，用于平移量与尺寸。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn zero() -> Self {
            Self(DVec2::ZERO)
        }

        #[inline]
        pub fn from_points(start: Point2, end: Point2) -> Self {
            Self(end.0 - start.0)
        }

        #[inline]
        pub fn length_squared(self) -> f64 {
            self.0.length_squared()
        }

        #[inline]
        pub fn scale(self, factor: f64) -> Self {
            Self(self.0 * factor)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 轴对齐边界框，用于估算元素/整图范围。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        /// 以任意两个对角点构造，内部会规整 min/max。
        #[inline]
        pub fn new(a: Point2, b: Point2) -> Self {
            Self {
                min: Point2::from_vec(a.as_vec2().min(b.as_vec2())),
                max: Point2::from_vec(a.as_vec2().max(b.as_vec2())),
            }
        }

        #[inline]
        pub fn from_origin_size(origin: Point2, width: f64, height: f64) -> Self {
            Self::new(origin, Point2::new(origin.x() + width, origin.y() + height))
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        pub fn from_points<I>(points: I) -> Self
        where
            I: IntoIterator<Item = Point2>,
        {
            let mut bounds = Self::empty();
            for point in points {
                bounds.include_point(point);
            }
            bounds
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        #[inline]
        pub fn width(&self) -> f64 {
            if self.is_empty() {
                0.0
            } else {
                self.max.x() - self.min.x()
            }
        }

        #[inline]
        pub fn height(&self) -> f64 {
            if self.is_empty() {
                0.0
            } else {
                self.max.y() - self.min.y()
            }
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            let min_vec = self.min.as_vec2().min(point.as_vec2());
            let max_vec = self.max.as_vec2().max(point.as_vec2());
            self.min = Point2::from_vec(min_vec);
            self.max = Point2::from_vec(max_vec);
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            let center = (self.min.as_vec2() + self.max.as_vec2()) * 0.5;
            Point2::from_vec(center)
        }

        /// 闭区间包含判定，边界上的点视为在内。
        #[inline]
        pub fn contains(&self, point: Point2) -> bool {
            !self.is_empty()
                && point.x() >= self.min.x()
                && point.x() <= self.max.x()
                && point.y() >= self.min.y()
                && point.y() <= self.max.y()
        }

        pub fn contains_bounds(&self, other: &Bounds2D) -> bool {
            other.is_empty() || (self.contains(other.min) && self.contains(other.max))
        }

        pub fn intersects(&self, other: &Bounds2D) -> bool {
            !self.is_empty()
                && !other.is_empty()
                && self.min.x() <= other.max.x()
                && other.min.x() <= self.max.x()
                && self.min.y() <= other.max.y()
                && other.min.y() <= self.max.y()
        }

        /// 四周各外扩 `margin`。
        pub fn expanded(&self, margin: f64) -> Self {
            if self.is_empty() {
                return *self;
            }
            let offset = glam::DVec2::splat(margin);
            Self {
                min: Point2::from_vec(self.min.as_vec2() - offset),
                max: Point2::from_vec(self.max.as_vec2() + offset),
            }
        }
    }

    /// 奇偶规则的点在多边形内判定。
    pub fn point_in_polygon(point: Point2, polygon: &[Point2]) -> bool {
        if polygon.len() < 3 {
            return false;
        }
        let (px, py) = (point.x(), point.y());
        let mut inside = false;
        let mut j = polygon.len() - 1;
        for i in 0..polygon.len() {
            let (xi, yi) = (polygon[i].x(), polygon[i].y());
            let (xj, yj) = (polygon[j].x(), polygon[j].y());
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// 点到线段的最短距离。
    pub fn distance_to_segment(point: Point2, start: Point2, end: Point2) -> f64 {
        let p = point.as_vec2();
        let a = start.as_vec2();
        let b = end.as_vec2();
        let ab = b - a;
        let len_sq = ab.length_squared();
        if len_sq <= f64::EPSILON {
            return p.distance(a);
        }
        let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        p.distance(a + ab * t)
    }

    /// 对三次贝塞尔段 `p0 p1 p2 p3` 求参数 `t` 处的点。
    pub fn cubic_bezier_point(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Point2 {
        let u = 1.0 - t;
        let v = p0.as_vec2() * (u * u * u)
            + p1.as_vec2() * (3.0 * u * u * t)
            + p2.as_vec2() * (3.0 * u * t * t)
            + p3.as_vec2() * (t * t * t);
        Point2::from_vec(v)
    }
}

pub mod color {
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    use crate::geometry::Point2;
    use crate::named_colors::{self, ColorScheme};

    /// 归一化 RGBA，各分量位于 [0, 1]。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Rgba {
        pub r: f64,
        pub g: f64,
        pub b: f64,
        pub a: f64,
    }

    impl Rgba {
        pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
        pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
        pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

        #[inline]
        pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
            Self { r, g, b, a }
        }

        #[inline]
        pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
            Self::new(
                r as f64 / 255.0,
                g as f64 / 255.0,
                b as f64 / 255.0,
                a as f64 / 255.0,
            )
        }

        /// HSV（各分量 [0, 1]）转换为 RGB。
        pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
            let h = h.clamp(0.0, 1.0);
            let s = s.clamp(0.0, 1.0);
            let v = v.clamp(0.0, 1.0);
            if s <= 0.0 {
                return Self::new(v, v, v, 1.0);
            }
            let scaled = h * 6.0;
            let sector = scaled.floor();
            let f = scaled - sector;
            let p = v * (1.0 - s);
            let q = v * (1.0 - s * f);
            let t = v * (1.0 - s * (1.0 - f));
            let (r, g, b) = match (sector as i64).rem_euclid(6) {
                0 => (v, t, p),
                1 => (q, v, p),
                2 => (p, v, t),
                3 => (p, q, v),
                4 => (t, p, v),
                _ => (v, p, q),
            };
            Self::new(r, g, b, 1.0)
        }

        pub fn to_u8(self) -> [u8; 4] {
            let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
            [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
        }

        /// `#rrggbb`，不透明度非 1 时为 `#rrggbbaa`。
        pub fn to_hex(self) -> String {
            let [r, g, b, a] = self.to_u8();
            if a == 255 {
                format!("#{r:02x}{g:02x}{b:02x}")
            } else {
                format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
            }
        }

        #[inline]
        pub fn is_transparent(self) -> bool {
            self.a <= 0.0
        }

        /// 按名称查找（X11 方案）。
        pub fn named(name: &str) -> Option<Self> {
            named_colors::lookup(name, ColorScheme::X11)
        }

        pub fn named_in(name: &str, scheme: ColorScheme) -> Option<Self> {
            named_colors::lookup(name, scheme)
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum GradientKind {
        Linear {
            start: Point2,
            end: Point2,
        },
        Radial {
            inner_center: Point2,
            inner_radius: f64,
            outer_center: Point2,
            outer_radius: f64,
        },
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct GradientStop {
        pub offset: f64,
        pub color: Rgba,
    }

    #[derive(Debug, Clone, PartialEq, Error)]
    pub enum GradientError {
        #[error("gradient needs at least 2 stops, got {0}")]
        TooFewStops(usize),
        #[error("gradient stop offset {0} is outside [0, 1]")]
        OffsetOutOfRange(f64),
        #[error("gradient stop offsets must be non-decreasing")]
        OffsetsNotSorted,
    }

    /// 渐变色。构造时校验色标：至少两个，偏移量位于 [0,1] 且单调不减。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Gradient {
        kind: GradientKind,
        stops: Vec<GradientStop>,
    }

    impl Gradient {
        pub fn new(kind: GradientKind, stops: Vec<GradientStop>) -> Result<Self, GradientError> {
            if stops.len() < 2 {
                return Err(GradientError::TooFewStops(stops.len()));
            }
            let mut previous = 0.0;
            for stop in &stops {
                if !(0.0..=1.0).contains(&stop.offset) {
                    return Err(GradientError::OffsetOutOfRange(stop.offset));
                }
                if stop.offset < previous {
                    return Err(GradientError::OffsetsNotSorted);
                }
                previous = stop.offset;
            }
            Ok(Self { kind, stops })
        }

        #[inline]
        pub fn kind(&self) -> &GradientKind {
            &self.kind
        }

        #[inline]
        pub fn stops(&self) -> &[GradientStop] {
            &self.stops
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", content = "value", rename_all = "snake_case")]
    pub enum Color {
        Solid(Rgba),
        Gradient(Gradient),
    }

    impl Color {
        #[inline]
        pub fn solid(rgba: Rgba) -> Self {
            Color::Solid(rgba)
        }

        /// 供不支持渐变的画布使用：渐变取首个色标。
        pub fn representative(&self) -> Rgba {
            match self {
                Color::Solid(rgba) => *rgba,
                Color::Gradient(gradient) => gradient
                    .stops()
                    .first()
                    .map(|stop| stop.color)
                    .unwrap_or(Rgba::BLACK),
            }
        }
    }

    impl Default for Color {
        fn default() -> Self {
            Color::Solid(Rgba::BLACK)
        }
    }

    impl From<Rgba> for Color {
        fn from(value: Rgba) -> Self {
            Color::Solid(value)
        }
    }

}

pub mod pen {
    use serde::{Deserialize, Serialize};

    use crate::color::{Color, Rgba};

    pub const DEFAULT_FONT_NAME: &str = "Times-Roman";
    pub const DEFAULT_FONT_SIZE: f64 = 14.0;
    pub const DEFAULT_LINE_WIDTH: f64 = 1.0;
    pub const BOLD_LINE_WIDTH: f64 = 2.0;

    /// 线型标记。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct LineStyle {
        pub dashed: bool,
        pub dotted: bool,
        pub bold: bool,
        pub invisible: bool,
    }

    /// `t` 操作码的字体特征位。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct FontFlags(u32);

    impl FontFlags {
        pub const BOLD: FontFlags = FontFlags(1);
        pub const ITALIC: FontFlags = FontFlags(2);
        pub const UNDERLINE: FontFlags = FontFlags(4);
        pub const SUPERSCRIPT: FontFlags = FontFlags(8);
        pub const SUBSCRIPT: FontFlags = FontFlags(16);
        pub const STRIKE_THROUGH: FontFlags = FontFlags(32);
        pub const OVERLINE: FontFlags = FontFlags(64);

        #[inline]
        pub const fn from_bits(bits: u32) -> Self {
            Self(bits)
        }

        #[inline]
        pub const fn bits(self) -> u32 {
            self.0
        }

        #[inline]
        pub const fn contains(self, other: FontFlags) -> bool {
            self.0 & other.0 == other.0
        }
    }

    /// 画笔状态。解析时作为可变上下文，每个图形发出时复制一份快照。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Pen {
        pub color: Color,
        pub fill_color: Color,
        pub line_width: f64,
        pub dash: Vec<f64>,
        pub style: LineStyle,
        pub font_name: String,
        pub font_size: f64,
        pub font_flags: FontFlags,
    }

    impl Default for Pen {
        fn default() -> Self {
            Self {
                color: Color::Solid(Rgba::BLACK),
                fill_color: Color::Solid(Rgba::BLACK),
                line_width: DEFAULT_LINE_WIDTH,
                dash: Vec::new(),
                style: LineStyle::default(),
                font_name: DEFAULT_FONT_NAME.to_string(),
                font_size: DEFAULT_FONT_SIZE,
                font_flags: FontFlags::default(),
            }
        }
    }

    impl Pen {
        /// xdot 没有独立的字体颜色，文字使用画笔颜色。
        #[inline]
        pub fn font_color(&self) -> &Color {
            &self.color
        }

        #[inline]
        pub fn is_invisible(&self) -> bool {
            self.style.invisible
        }

        pub fn set_line_width(&mut self, width: f64) {
            self.line_width = width;
        }

        pub fn set_solid(&mut self) {
            self.dash.clear();
            self.style.dashed = false;
            self.style.dotted = false;
        }

        pub fn set_dashed(&mut self) {
            self.dash = vec![6.0];
            self.style.dashed = true;
            self.style.dotted = false;
        }

        pub fn set_dotted(&mut self) {
            self.dash = vec![2.0, 4.0];
            self.style.dotted = true;
            self.style.dashed = false;
        }

        pub fn set_bold(&mut self) {
            self.style.bold = true;
            self.line_width = BOLD_LINE_WIDTH;
        }

        pub fn set_invisible(&mut self) {
            self.style.invisible = true;
        }

        /// 悬停高亮用的画笔：红色描边、浅红填充。
        pub fn highlighted(&self) -> Pen {
            let mut pen = self.clone();
            pen.color = Color::Solid(Rgba::new(1.0, 0.0, 0.0, 1.0));
            pen.fill_color = Color::Solid(Rgba::new(1.0, 0.8, 0.8, 1.0));
            pen
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn style_setters_toggle_dash_patterns() {
            let mut pen = Pen::default();
            pen.set_dashed();
            assert_eq!(pen.dash, vec![6.0]);
            assert!(pen.style.dashed);

            pen.set_dotted();
            assert_eq!(pen.dash, vec![2.0, 4.0]);
            assert!(!pen.style.dashed);
            assert!(pen.style.dotted);

            pen.set_solid();
            assert!(pen.dash.is_empty());
            assert!(!pen.style.dotted);

            pen.set_bold();
            assert_eq!(pen.line_width, BOLD_LINE_WIDTH);
        }

        #[test]
        fn font_flags_are_bitmasks() {
            let flags = FontFlags::from_bits(3);
            assert!(flags.contains(FontFlags::BOLD));
            assert!(flags.contains(FontFlags::ITALIC));
            assert!(!flags.contains(FontFlags::UNDERLINE));
        }
    }
}

pub mod shape {
    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds2D, Point2};
    use crate::pen::Pen;

    /// 文字水平对齐。xdot 编码：-1 左、0 中、1 右。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TextAlign {
        Left,
        Center,
        Right,
    }

    impl TextAlign {
        pub fn from_code(code: i64) -> Option<Self> {
            match code {
                -1 => Some(TextAlign::Left),
                0 => Some(TextAlign::Center),
                1 => Some(TextAlign::Right),
                _ => None,
            }
        }

        pub fn code(self) -> i64 {
            match self {
                TextAlign::Left => -1,
                TextAlign::Center => 0,
                TextAlign::Right => 1,
            }
        }

        /// 渲染时锚点 x 的偏移系数（乘以宽度）。
        pub fn anchor_factor(self) -> f64 {
            match self {
                TextAlign::Left => 0.0,
                TextAlign::Center => -0.5,
                TextAlign::Right => -1.0,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct EllipseShape {
        pub pen: Pen,
        pub center: Point2,
        pub rx: f64,
        pub ry: f64,
        pub filled: bool,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PolygonShape {
        pub pen: Pen,
        pub points: Vec<Point2>,
        pub filled: bool,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PolylineShape {
        pub pen: Pen,
        pub points: Vec<Point2>,
    }

    /// 三次贝塞尔曲线，点数满足 `(n - 1) % 3 == 0`。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct BezierShape {
        pub pen: Pen,
        pub points: Vec<Point2>,
        pub filled: bool,
    }

    impl BezierShape {
        /// 依次返回每一段的四个控制点。
        pub fn segments(&self) -> impl Iterator<Item = [Point2; 4]> + '_ {
            let count = self.points.len().saturating_sub(1) / 3;
            (0..count).map(move |i| {
                let base = i * 3;
                [
                    self.points[base],
                    self.points[base + 1],
                    self.points[base + 2],
                    self.points[base + 3],
                ]
            })
        }
    }

    /// 文字图形。`anchor` 保留原始锚点，对齐偏移在渲染时计算。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TextShape {
        pub pen: Pen,
        pub anchor: Point2,
        pub align: TextAlign,
        pub width: f64,
        pub text: String,
    }

    impl TextShape {
        /// 按对齐方式换算出的左侧起点。
        pub fn left(&self) -> f64 {
            self.anchor.x() + self.width * self.align.anchor_factor()
        }
    }

    /// 图片图形：左下角 + 宽高（点坐标）。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ImageShape {
        pub pen: Pen,
        pub position: Point2,
        pub width: f64,
        pub height: f64,
        pub path: String,
    }

    impl ImageShape {
        #[inline]
        pub fn rect(&self) -> Bounds2D {
            Bounds2D::from_origin_size(self.position, self.width, self.height)
        }
    }

    /// 未直接绘制的样式指令，作用于紧随其后的图元。
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StyleAttribute {
        pub key: String,
        pub value: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind", rename_all = "snake_case")]
    pub enum Shape {
        Ellipse(EllipseShape),
        Polygon(PolygonShape),
        Polyline(PolylineShape),
        Bezier(BezierShape),
        Text(TextShape),
        Image(ImageShape),
        Style(StyleAttribute),
    }

    impl Shape {
        pub fn pen(&self) -> Option<&Pen> {
            match self {
                Shape::Ellipse(shape) => Some(&shape.pen),
                Shape::Polygon(shape) => Some(&shape.pen),
                Shape::Polyline(shape) => Some(&shape.pen),
                Shape::Bezier(shape) => Some(&shape.pen),
                Shape::Text(shape) => Some(&shape.pen),
                Shape::Image(shape) => Some(&shape.pen),
                Shape::Style(_) => None,
            }
        }

        /// 定义几何的关键点（贝塞尔为控制点）。
        pub fn control_points(&self) -> Vec<Point2> {
            match self {
                Shape::Ellipse(ellipse) => vec![ellipse.center],
                Shape::Polygon(polygon) => polygon.points.clone(),
                Shape::Polyline(polyline) => polyline.points.clone(),
                Shape::Bezier(bezier) => bezier.points.clone(),
                Shape::Text(text) => vec![text.anchor],
                Shape::Image(image) => vec![image.rect().min(), image.rect().max()],
                Shape::Style(_) => Vec::new(),
            }
        }

        /// 计算点坐标下的轴对齐范围。贝塞尔直接使用控制点，结果偏保守。
        pub fn bounds(&self) -> Option<Bounds2D> {
            let bounds = match self {
                Shape::Ellipse(ellipse) => {
                    let rx = ellipse.rx.abs();
                    let ry = ellipse.ry.abs();
                    let c = ellipse.center;
                    Bounds2D::new(
                        Point2::new(c.x() - rx, c.y() - ry),
                        Point2::new(c.x() + rx, c.y() + ry),
                    )
                }
                Shape::Polygon(polygon) => Bounds2D::from_points(polygon.points.iter().copied()),
                Shape::Polyline(polyline) => {
                    Bounds2D::from_points(polyline.points.iter().copied())
                }
                Shape::Bezier(bezier) => Bounds2D::from_points(bezier.points.iter().copied()),
                Shape::Text(text) => {
                    // 基线以下约留 1/4 字号，以上约 3/4 字号。
                    let size = text.pen.font_size.abs();
                    let left = text.left();
                    Bounds2D::new(
                        Point2::new(left, text.anchor.y() - size * 0.25),
                        Point2::new(left + text.width.abs(), text.anchor.y() + size * 0.75),
                    )
                }
                Shape::Image(image) => image.rect(),
                Shape::Style(_) => return None,
            };
            if bounds.is_empty() { None } else { Some(bounds) }
        }
    }

}

pub mod graph {
    use std::fmt;

    use serde::{Deserialize, Serialize};

    use crate::geometry::{Bounds2D, Point2};
    use crate::shape::Shape;

    /// 边端点附近的跳转半径（点）。
    pub const EDGE_JUMP_RADIUS: f64 = 10.0;

    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EdgeKey {
        pub tail: String,
        pub head: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub label: Option<String>,
    }

    impl EdgeKey {
        pub fn new(tail: impl Into<String>, head: impl Into<String>) -> Self {
            Self {
                tail: tail.into(),
                head: head.into(),
                label: None,
            }
        }

        pub fn with_label(mut self, label: impl Into<String>) -> Self {
            self.label = Some(label.into());
            self
        }
    }

    /// 图元素标识：节点 ID 或边的（尾, 头, 标签）。
    #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(tag = "kind", content = "id", rename_all = "snake_case")]
    pub enum ElementKey {
        Node(String),
        Edge(EdgeKey),
    }

    impl fmt::Display for ElementKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ElementKey::Node(id) => write!(f, "{id}"),
                ElementKey::Edge(edge) => match &edge.label {
                    Some(label) => write!(f, "{} -> {} [{}]", edge.tail, edge.head, label),
                    None => write!(f, "{} -> {}", edge.tail, edge.head),
                },
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(tag = "kind", content = "target", rename_all = "snake_case")]
    pub enum JumpTarget {
        Node(String),
        Edge(EdgeKey),
        Url(String),
    }

    /// 可点击区域及其跳转目标，归属于唯一的节点或边。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Jump {
        pub region: Bounds2D,
        pub target: JumpTarget,
    }

    /// 按每个属性字符串产生的图形数切分图形序列。
    ///
    /// `lengths` 为空表示整体只来自一个字符串。
    fn split_segments<'a>(shapes: &'a [Shape], lengths: &[usize]) -> Vec<&'a [Shape]> {
        if lengths.is_empty() {
            return if shapes.is_empty() { Vec::new() } else { vec![shapes] };
        }
        let mut rest = shapes;
        let mut segments = Vec::with_capacity(lengths.len());
        for &len in lengths {
            let (segment, tail) = rest.split_at(len.min(rest.len()));
            segments.push(segment);
            rest = tail;
        }
        segments
    }

    fn checked_segments(shapes: &[Shape], lengths: Vec<usize>) -> Vec<usize> {
        if lengths.iter().sum::<usize>() == shapes.len() {
            lengths
        } else {
            Vec::new()
        }
    }

    fn union_bounds(shapes: &[Shape]) -> Option<Bounds2D> {
        let mut bounds = Bounds2D::empty();
        for shape in shapes {
            if let Some(shape_bounds) = shape.bounds() {
                bounds.include_bounds(&shape_bounds);
            }
        }
        if bounds.is_empty() { None } else { Some(bounds) }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Node {
        id: String,
        shapes: Vec<Shape>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        segments: Vec<usize>,
        bounds: Option<Bounds2D>,
        url: Option<String>,
        jumps: Vec<Jump>,
    }

    impl Node {
        /// `intrinsic` 为节点属性（位置与尺寸）给出的范围，图形为空时仍能定位节点。
        pub fn new(
            id: impl Into<String>,
            shapes: Vec<Shape>,
            intrinsic: Option<Bounds2D>,
            url: Option<String>,
        ) -> Self {
            let id = id.into();
            let mut bounds = Bounds2D::empty();
            if let Some(intrinsic) = intrinsic {
                bounds.include_bounds(&intrinsic);
            }
            if let Some(shape_bounds) = union_bounds(&shapes) {
                bounds.include_bounds(&shape_bounds);
            }
            let bounds = (!bounds.is_empty()).then_some(bounds);

            let mut jumps = Vec::new();
            if let Some(bounds) = bounds {
                if let Some(url) = &url {
                    jumps.push(Jump {
                        region: bounds,
                        target: JumpTarget::Url(url.clone()),
                    });
                }
                jumps.push(Jump {
                    region: bounds,
                    target: JumpTarget::Node(id.clone()),
                });
            }

            Self {
                id,
                shapes,
                segments: Vec::new(),
                bounds,
                url,
                jumps,
            }
        }

        /// 记录每个属性字符串贡献的图形数；总数与图形不符时忽略。
        pub fn with_segments(mut self, lengths: Vec<usize>) -> Self {
            self.segments = checked_segments(&self.shapes, lengths);
            self
        }

        #[inline]
        pub fn id(&self) -> &str {
            &self.id
        }

        #[inline]
        pub fn shapes(&self) -> &[Shape] {
            &self.shapes
        }

        #[inline]
        pub fn bounds(&self) -> Option<Bounds2D> {
            self.bounds
        }

        #[inline]
        pub fn url(&self) -> Option<&str> {
            self.url.as_deref()
        }

        #[inline]
        pub fn jumps(&self) -> &[Jump] {
            &self.jumps
        }

        pub fn key(&self) -> ElementKey {
            ElementKey::Node(self.id.clone())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Edge {
        key: EdgeKey,
        shapes: Vec<Shape>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        segments: Vec<usize>,
        bounds: Option<Bounds2D>,
        url: Option<String>,
        jumps: Vec<Jump>,
    }

    impl Edge {
        pub fn new(key: EdgeKey, shapes: Vec<Shape>, url: Option<String>) -> Self {
            let bounds = union_bounds(&shapes);
            let mut jumps = Vec::new();

            // 点击起点附近跳到头节点，点击终点附近跳到尾节点。
            if let Some((first, last)) = spline_endpoints(&shapes) {
                jumps.push(Jump {
                    region: endpoint_region(first),
                    target: JumpTarget::Node(key.head.clone()),
                });
                jumps.push(Jump {
                    region: endpoint_region(last),
                    target: JumpTarget::Node(key.tail.clone()),
                });
            }
            if let Some(bounds) = bounds {
                if let Some(url) = &url {
                    jumps.push(Jump {
                        region: bounds,
                        target: JumpTarget::Url(url.clone()),
                    });
                }
                jumps.push(Jump {
                    region: bounds,
                    target: JumpTarget::Edge(key.clone()),
                });
            }

            Self {
                key,
                shapes,
                segments: Vec::new(),
                bounds,
                url,
                jumps,
            }
        }

        pub fn with_segments(mut self, lengths: Vec<usize>) -> Self {
            self.segments = checked_segments(&self.shapes, lengths);
            self
        }

        #[inline]
        pub fn edge_key(&self) -> &EdgeKey {
            &self.key
        }

        #[inline]
        pub fn tail(&self) -> &str {
            &self.key.tail
        }

        #[inline]
        pub fn head(&self) -> &str {
            &self.key.head
        }

        #[inline]
        pub fn label(&self) -> Option<&str> {
            self.key.label.as_deref()
        }

        #[inline]
        pub fn shapes(&self) -> &[Shape] {
            &self.shapes
        }

        #[inline]
        pub fn bounds(&self) -> Option<Bounds2D> {
            self.bounds
        }

        #[inline]
        pub fn url(&self) -> Option<&str> {
            self.url.as_deref()
        }

        #[inline]
        pub fn jumps(&self) -> &[Jump] {
            &self.jumps
        }

        pub fn key(&self) -> ElementKey {
            ElementKey::Edge(self.key.clone())
        }
    }

    fn spline_endpoints(shapes: &[Shape]) -> Option<(Point2, Point2)> {
        shapes.iter().find_map(|shape| {
            let points = match shape {
                Shape::Bezier(bezier) => &bezier.points,
                Shape::Polyline(polyline) => &polyline.points,
                _ => return None,
            };
            Some((*points.first()?, *points.last()?))
        })
    }

    fn endpoint_region(point: Point2) -> Bounds2D {
        Bounds2D::new(point, point).expanded(EDGE_JUMP_RADIUS)
    }

    /// 对节点或边的统一只读视图。
    #[derive(Debug, Clone, Copy)]
    pub enum ElementRef<'a> {
        Node(&'a Node),
        Edge(&'a Edge),
    }

    impl<'a> ElementRef<'a> {
        pub fn key(&self) -> ElementKey {
            match self {
                ElementRef::Node(node) => node.key(),
                ElementRef::Edge(edge) => edge.key(),
            }
        }

        pub fn shapes(&self) -> &'a [Shape] {
            match self {
                ElementRef::Node(node) => node.shapes(),
                ElementRef::Edge(edge) => edge.shapes(),
            }
        }

        /// 按来源属性字符串分组的图形，每组都从默认画笔开始。
        pub fn draw_segments(&self) -> Vec<&'a [Shape]> {
            match self {
                ElementRef::Node(node) => split_segments(&node.shapes, &node.segments),
                ElementRef::Edge(edge) => split_segments(&edge.shapes, &edge.segments),
            }
        }

        pub fn bounds(&self) -> Option<Bounds2D> {
            match self {
                ElementRef::Node(node) => node.bounds(),
                ElementRef::Edge(edge) => edge.bounds(),
            }
        }

        pub fn url(&self) -> Option<&'a str> {
            match self {
                ElementRef::Node(node) => node.url(),
                ElementRef::Edge(edge) => edge.url(),
            }
        }

        pub fn jumps(&self) -> &'a [Jump] {
            match self {
                ElementRef::Node(node) => node.jumps(),
                ElementRef::Edge(edge) => edge.jumps(),
            }
        }

        /// 返回包含该点的第一个跳转目标。
        pub fn jump_at(&self, point: Point2) -> Option<&'a JumpTarget> {
            self.jumps()
                .iter()
                .find(|jump| jump.region.contains(point))
                .map(|jump| &jump.target)
        }
    }

    /// 一次解析得到的整图。构造后不可修改，重新加载时整体替换。
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Graph {
        bounds: Bounds2D,
        extents: Option<Bounds2D>,
        shapes: Vec<Shape>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        segments: Vec<usize>,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
    }

    impl Graph {
        /// 整图范围为各元素范围的并集，并扩展到声明的 `extents`。
        /// 没有任何几何信息时退化为原点处的零尺寸范围。
        pub fn new(
            extents: Option<Bounds2D>,
            shapes: Vec<Shape>,
            nodes: Vec<Node>,
            edges: Vec<Edge>,
        ) -> Self {
            let mut bounds = Bounds2D::empty();
            if let Some(shape_bounds) = union_bounds(&shapes) {
                bounds.include_bounds(&shape_bounds);
            }
            for node in &nodes {
                if let Some(node_bounds) = node.bounds() {
                    bounds.include_bounds(&node_bounds);
                }
            }
            for edge in &edges {
                if let Some(edge_bounds) = edge.bounds() {
                    bounds.include_bounds(&edge_bounds);
                }
            }
            if let Some(extents) = &extents {
                bounds.include_bounds(extents);
            }
            if bounds.is_empty() {
                bounds = Bounds2D::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0));
            }

            Self {
                bounds,
                extents,
                shapes,
                segments: Vec::new(),
                nodes,
                edges,
            }
        }

        #[inline]
        pub fn bounds(&self) -> Bounds2D {
            self.bounds
        }

        #[inline]
        pub fn extents(&self) -> Option<Bounds2D> {
            self.extents
        }

        /// 图级别的图形（背景、子图框等）。
        #[inline]
        pub fn shapes(&self) -> &[Shape] {
            &self.shapes
        }

        pub fn with_segments(mut self, lengths: Vec<usize>) -> Self {
            self.segments = checked_segments(&self.shapes, lengths);
            self
        }

        /// 图级别图形按来源属性字符串分组。
        pub fn draw_segments(&self) -> Vec<&[Shape]> {
            split_segments(&self.shapes, &self.segments)
        }

        #[inline]
        pub fn nodes(&self) -> &[Node] {
            &self.nodes
        }

        #[inline]
        pub fn edges(&self) -> &[Edge] {
            &self.edges
        }

        pub fn node(&self, id: &str) -> Option<&Node> {
            self.nodes.iter().find(|node| node.id() == id)
        }

        pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
            self.edges.iter().find(|edge| edge.edge_key() == key)
        }

        pub fn element(&self, key: &ElementKey) -> Option<ElementRef<'_>> {
            match key {
                ElementKey::Node(id) => self.node(id).map(ElementRef::Node),
                ElementKey::Edge(edge) => self.edge(edge).map(ElementRef::Edge),
            }
        }

        #[inline]
        pub fn element_bounds(&self, key: &ElementKey) -> Option<Bounds2D> {
            self.element(key).and_then(|element| element.bounds())
        }

        /// 按绘制顺序迭代：先节点后边。
        pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
            self.nodes
                .iter()
                .map(ElementRef::Node)
                .chain(self.edges.iter().map(ElementRef::Edge))
        }
    }

}

#[cfg(test)]
mod tests {
    use crate::geometry::{Bounds2D, Point2, distance_to_segment, point_in_polygon};

    #[test]
    fn bounds_track_points_and_containment() {
        let mut bounds = Bounds2D::empty();
        assert!(bounds.is_empty());
        bounds.include_point(Point2::new(3.0, -1.0));
        bounds.include_point(Point2::new(-2.0, 4.0));
        assert_eq!(bounds.min(), Point2::new(-2.0, -1.0));
        assert_eq!(bounds.max(), Point2::new(3.0, 4.0));
        assert_eq!(bounds.width(), 5.0);
        assert_eq!(bounds.center(), Point2::new(0.5, 1.5));
        assert!(bounds.contains(Point2::new(3.0, 4.0)));
        assert!(!bounds.contains(Point2::new(3.1, 4.0)));
    }

    #[test]
    fn polygon_uses_even_odd_rule() {
        let square = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Point2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Point2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Point2::new(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn shapes_serialize_with_kind_tag() {
        use crate::pen::Pen;
        use crate::shape::{PolylineShape, Shape};

        let shape = Shape::Polyline(PolylineShape {
            pen: Pen::default(),
            points: vec![Point2::new(0.0, 0.0), Point2::new(1.0, 2.0)],
        });
        let value = serde_json::to_value(&shape).expect("serialize shape");
        assert_eq!(value["kind"], "polyline");
        let back: Shape = serde_json::from_value(value).expect("deserialize shape");
        assert_eq!(back, shape);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert!((distance_to_segment(Point2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((distance_to_segment(Point2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((distance_to_segment(Point2::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-12);
    }
}
