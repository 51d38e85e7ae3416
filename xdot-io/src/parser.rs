use tracing::{trace, warn};
use xdot_core::color::Color;
use xdot_core::geometry::Point2;
use xdot_core::pen::{FontFlags, Pen};
use xdot_core::shape::{
    BezierShape, EllipseShape, ImageShape, PolygonShape, PolylineShape, Shape, StyleAttribute,
    TextAlign, TextShape,
};

use crate::XdotError;
use crate::color::{FALLBACK_COLOR, parse_color};
use crate::lexer::XdotLexer;

/// xdot 操作码。新增操作码时编译器会要求补全解析分支。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    FilledEllipse,
    Ellipse,
    FilledPolygon,
    Polygon,
    Polyline,
    FilledBezier,
    Bezier,
    Text,
    FontFlags,
    FillColor,
    PenColor,
    Font,
    Style,
    Image,
}

impl Opcode {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let opcode = match keyword {
            "E" => Opcode::FilledEllipse,
            "e" => Opcode::Ellipse,
            "P" => Opcode::FilledPolygon,
            "p" => Opcode::Polygon,
            "L" => Opcode::Polyline,
            "B" => Opcode::Bezier,
            "b" => Opcode::FilledBezier,
            "T" => Opcode::Text,
            "t" => Opcode::FontFlags,
            "C" => Opcode::FillColor,
            "c" => Opcode::PenColor,
            "F" => Opcode::Font,
            "S" => Opcode::Style,
            "I" => Opcode::Image,
            _ => return None,
        };
        Some(opcode)
    }

    pub fn keyword(self) -> char {
        match self {
            Opcode::FilledEllipse => 'E',
            Opcode::Ellipse => 'e',
            Opcode::FilledPolygon => 'P',
            Opcode::Polygon => 'p',
            Opcode::Polyline => 'L',
            Opcode::Bezier => 'B',
            Opcode::FilledBezier => 'b',
            Opcode::Text => 'T',
            Opcode::FontFlags => 't',
            Opcode::FillColor => 'C',
            Opcode::PenColor => 'c',
            Opcode::Font => 'F',
            Opcode::Style => 'S',
            Opcode::Image => 'I',
        }
    }
}

/// 单个属性字符串的解析结果：图形序列与可恢复的告警。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedShapes {
    pub shapes: Vec<Shape>,
    pub warnings: Vec<XdotError>,
}

/// 解析一个 xdot 属性字符串（如 `_draw_`）。
///
/// 画笔是本次解析私有的可变上下文，每个图形发出时复制快照；
/// 不同属性字符串之间不共享画笔。
pub struct XdotParser<'a> {
    lexer: XdotLexer<'a>,
    pen: Pen,
    shapes: Vec<Shape>,
    warnings: Vec<XdotError>,
}

impl<'a> XdotParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: XdotLexer::new(source),
            pen: Pen::default(),
            shapes: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// 词法错误或未知操作码会中止整个属性字符串；
    /// 几何非法（如贝塞尔点数）和未知颜色只记录告警。
    pub fn parse(mut self) -> Result<ParsedShapes, XdotError> {
        while let Some((offset, keyword)) = self.lexer.next_keyword()? {
            let opcode =
                Opcode::from_keyword(keyword).ok_or_else(|| XdotError::UnsupportedOpcode {
                    opcode: keyword.to_string(),
                    offset,
                })?;
            self.handle(opcode)?;
        }
        Ok(ParsedShapes {
            shapes: self.shapes,
            warnings: self.warnings,
        })
    }

    fn handle(&mut self, opcode: Opcode) -> Result<(), XdotError> {
        match opcode {
            Opcode::FilledEllipse | Opcode::Ellipse => {
                let center = self.read_point()?;
                let rx = self.lexer.read_float()?;
                let ry = self.lexer.read_float()?;
                self.emit(Shape::Ellipse(EllipseShape {
                    pen: self.pen.clone(),
                    center,
                    rx,
                    ry,
                    filled: opcode == Opcode::FilledEllipse,
                }));
            }
            Opcode::FilledPolygon | Opcode::Polygon => {
                let points = self.read_points()?;
                if points.is_empty() {
                    self.reject(opcode, "polygon has no points");
                } else {
                    self.emit(Shape::Polygon(PolygonShape {
                        pen: self.pen.clone(),
                        points,
                        filled: opcode == Opcode::FilledPolygon,
                    }));
                }
            }
            Opcode::Polyline => {
                let points = self.read_points()?;
                if points.is_empty() {
                    self.reject(opcode, "polyline has no points");
                } else {
                    self.emit(Shape::Polyline(PolylineShape {
                        pen: self.pen.clone(),
                        points,
                    }));
                }
            }
            Opcode::FilledBezier | Opcode::Bezier => {
                let points = self.read_points()?;
                if points.is_empty() || (points.len() - 1) % 3 != 0 {
                    let message = format!(
                        "bezier needs 3k+1 points, got {}",
                        points.len()
                    );
                    self.reject(opcode, message);
                } else {
                    self.emit(Shape::Bezier(BezierShape {
                        pen: self.pen.clone(),
                        points,
                        filled: opcode == Opcode::FilledBezier,
                    }));
                }
            }
            Opcode::Text => {
                let anchor = self.read_point()?;
                let offset = self.lexer.offset();
                let code = self.lexer.read_int()?;
                let align = TextAlign::from_code(code).ok_or_else(|| XdotError::MalformedToken {
                    offset,
                    message: format!("text alignment {code} is not one of -1, 0, 1"),
                })?;
                let width = self.lexer.read_float()?;
                let text = self.lexer.read_string()?;
                self.emit(Shape::Text(TextShape {
                    pen: self.pen.clone(),
                    anchor,
                    align,
                    width,
                    text: text.to_string(),
                }));
            }
            Opcode::FontFlags => {
                let offset = self.lexer.offset();
                let bits = self.lexer.read_int()?;
                let bits = u32::try_from(bits).map_err(|_| XdotError::MalformedToken {
                    offset,
                    message: format!("font flags {bits} out of range"),
                })?;
                self.pen.font_flags = FontFlags::from_bits(bits);
            }
            Opcode::FillColor => {
                let spec = self.lexer.read_string()?;
                self.pen.fill_color = self.resolve_color(spec);
            }
            Opcode::PenColor => {
                let spec = self.lexer.read_string()?;
                self.pen.color = self.resolve_color(spec);
            }
            Opcode::Font => {
                let size = self.lexer.read_float()?;
                let name = self.lexer.read_string()?;
                self.pen.font_size = size;
                self.pen.font_name = name.to_string();
            }
            Opcode::Style => {
                let directive = self.lexer.read_string()?;
                self.apply_style(directive);
            }
            Opcode::Image => {
                let position = self.read_point()?;
                let width = self.lexer.read_float()?;
                let height = self.lexer.read_float()?;
                let path = self.lexer.read_string()?;
                self.emit(Shape::Image(ImageShape {
                    pen: self.pen.clone(),
                    position,
                    width,
                    height,
                    path: path.to_string(),
                }));
            }
        }
        Ok(())
    }

    fn emit(&mut self, shape: Shape) {
        trace!(?shape, "xdot 图形");
        self.shapes.push(shape);
    }

    fn reject(&mut self, opcode: Opcode, message: impl Into<String>) {
        let error = XdotError::InvalidGeometry {
            opcode: opcode.keyword(),
            message: message.into(),
        };
        warn!(error = %error, "丢弃几何非法的图形");
        self.warnings.push(error);
    }

    fn resolve_color(&mut self, spec: &str) -> Color {
        match parse_color(spec) {
            Ok(color) => color,
            Err(error) => {
                warn!(color = spec, error = %error, "颜色无法识别，使用回退颜色");
                self.warnings.push(error);
                Color::Solid(FALLBACK_COLOR)
            }
        }
    }

    /// 处理 `S` 指令。能识别的线型直接修改画笔，其余作为样式属性交给后续图元。
    fn apply_style(&mut self, directive: &str) {
        let directive = directive.trim();
        let (key, value) = split_style(directive);
        match (key, value) {
            ("setlinewidth", Some(raw)) => match raw.trim().parse::<f64>() {
                Ok(width) if width.is_finite() && width >= 0.0 => self.pen.set_line_width(width),
                _ => {
                    let error = XdotError::MalformedToken {
                        offset: self.lexer.offset(),
                        message: format!("invalid line width `{raw}`"),
                    };
                    warn!(error = %error, "忽略非法线宽");
                    self.warnings.push(error);
                }
            },
            ("solid", None) => self.pen.set_solid(),
            ("dashed", None) => self.pen.set_dashed(),
            ("dotted", None) => self.pen.set_dotted(),
            ("bold", None) => self.pen.set_bold(),
            ("invis", None) | ("invisible", None) => self.pen.set_invisible(),
            (key, value) => self.emit(Shape::Style(StyleAttribute {
                key: key.to_string(),
                value: value.map(str::to_string),
            })),
        }
    }

    fn read_point(&mut self) -> Result<Point2, XdotError> {
        let x = self.lexer.read_float()?;
        let y = self.lexer.read_float()?;
        Ok(Point2::new(x, y))
    }

    fn read_points(&mut self) -> Result<Vec<Point2>, XdotError> {
        let offset = self.lexer.offset();
        let count = self.lexer.read_int()?;
        let count = usize::try_from(count).map_err(|_| XdotError::MalformedToken {
            offset,
            message: format!("negative point count {count}"),
        })?;
        let mut points = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            points.push(self.read_point()?);
        }
        Ok(points)
    }
}

/// `name(value)`、`name=value` 或裸 `name`。
fn split_style(directive: &str) -> (&str, Option<&str>) {
    if let Some((key, rest)) = directive.split_once('(') {
        let value = rest.strip_suffix(')').unwrap_or(rest);
        return (key.trim(), Some(value));
    }
    if let Some((key, value)) = directive.split_once('=') {
        return (key.trim(), Some(value.trim()));
    }
    (directive, None)
}

/// 便捷入口：解析单个属性字符串。
pub fn parse_shapes(source: &str) -> Result<ParsedShapes, XdotError> {
    XdotParser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use xdot_core::color::Rgba;

    use super::*;

    fn only_shape(source: &str) -> Shape {
        let parsed = parse_shapes(source).expect("parse should succeed");
        assert_eq!(parsed.shapes.len(), 1, "shapes: {:?}", parsed.shapes);
        parsed.shapes.into_iter().next().unwrap()
    }

    #[test]
    fn colored_ellipse() {
        let Shape::Ellipse(ellipse) = only_shape("c 5 -black C 5 -white E 50 50 20 10") else {
            panic!("expected ellipse");
        };
        assert_eq!(ellipse.center, Point2::new(50.0, 50.0));
        assert_eq!((ellipse.rx, ellipse.ry), (20.0, 10.0));
        assert!(ellipse.filled);
        assert_eq!(ellipse.pen.color, Color::Solid(Rgba::BLACK));
        assert_eq!(ellipse.pen.fill_color, Color::Solid(Rgba::WHITE));
    }

    #[test]
    fn centered_text() {
        let Shape::Text(text) = only_shape("T 30 40 0 10 5 -hello") else {
            panic!("expected text");
        };
        assert_eq!(text.anchor, Point2::new(30.0, 40.0));
        assert_eq!(text.align, TextAlign::Center);
        assert_eq!(text.width, 10.0);
        assert_eq!(text.text, "hello");
    }

    #[test]
    fn snapshots_do_not_see_later_pen_changes() {
        let parsed = parse_shapes("c 3 -red e 0 0 1 1 c 4 -blue e 5 5 1 1").unwrap();
        let colors: Vec<_> = parsed
            .shapes
            .iter()
            .map(|shape| shape.pen().unwrap().color.representative().to_u8())
            .collect();
        assert_eq!(colors, vec![[255, 0, 0, 255], [0, 0, 255, 255]]);
    }

    #[test]
    fn opcode_arity_for_point_lists() {
        let parsed =
            parse_shapes("P 3 0 0 10 0 5 8 p 2 1 1 2 2 L 2 0 0 3 3 B 4 0 0 1 1 2 1 3 0").unwrap();
        assert_eq!(parsed.shapes.len(), 4);
        assert!(matches!(&parsed.shapes[0], Shape::Polygon(p) if p.filled && p.points.len() == 3));
        assert!(matches!(&parsed.shapes[1], Shape::Polygon(p) if !p.filled));
        assert!(matches!(&parsed.shapes[2], Shape::Polyline(p) if p.points.len() == 2));
        assert!(matches!(&parsed.shapes[3], Shape::Bezier(b) if !b.filled));
    }

    #[test]
    fn invalid_bezier_is_dropped_but_neighbours_survive() {
        let parsed = parse_shapes("e 0 0 1 1 B 3 0 0 1 1 2 2 e 4 4 1 1").unwrap();
        assert_eq!(parsed.shapes.len(), 2);
        assert_eq!(parsed.warnings.len(), 1);
        assert!(matches!(
            parsed.warnings[0],
            XdotError::InvalidGeometry { opcode: 'B', .. }
        ));
    }

    #[test]
    fn empty_polygon_is_invalid_geometry() {
        let parsed = parse_shapes("P 0 e 0 0 1 1").unwrap();
        assert_eq!(parsed.shapes.len(), 1);
        assert!(matches!(
            parsed.warnings[0],
            XdotError::InvalidGeometry { opcode: 'P', .. }
        ));
    }

    #[test]
    fn unknown_opcode_aborts_the_string() {
        let err = parse_shapes("e 0 0 1 1 X 1 2").unwrap_err();
        assert_eq!(
            err,
            XdotError::UnsupportedOpcode {
                opcode: "X".to_string(),
                offset: 10,
            }
        );
    }

    #[test]
    fn wrong_arity_is_malformed() {
        assert!(matches!(
            parse_shapes("E 1 2 3"),
            Err(XdotError::MalformedToken { .. })
        ));
        assert!(matches!(
            parse_shapes("T 1 2 7 10 1 -x"),
            Err(XdotError::MalformedToken { .. })
        ));
    }

    #[test]
    fn style_directives_update_pen() {
        let parsed = parse_shapes(
            "S 15 -setlinewidth(3) S 6 -dashed L 2 0 0 1 1 S 4 -bold S 5 -invis L 2 0 0 1 1",
        )
        .unwrap();
        let first = parsed.shapes[0].pen().unwrap();
        assert_eq!(first.line_width, 3.0);
        assert!(first.style.dashed);
        assert!(!first.style.invisible);

        let second = parsed.shapes[1].pen().unwrap();
        assert_eq!(second.line_width, 2.0);
        assert!(second.style.bold);
        assert!(second.is_invisible());
    }

    #[test]
    fn unrecognized_style_becomes_attribute() {
        let parsed = parse_shapes("S 13 -arrowhead=vee L 2 0 0 1 1").unwrap();
        assert_eq!(
            parsed.shapes[0],
            Shape::Style(StyleAttribute {
                key: "arrowhead".to_string(),
                value: Some("vee".to_string()),
            })
        );
        assert!(matches!(parsed.shapes[1], Shape::Polyline(_)));
    }

    #[test]
    fn font_and_flags() {
        let Shape::Text(text) = only_shape("F 12 9 -Helvetica t 3 T 0 0 -1 20 2 -hi") else {
            panic!("expected text");
        };
        assert_eq!(text.pen.font_size, 12.0);
        assert_eq!(text.pen.font_name, "Helvetica");
        assert!(text.pen.font_flags.contains(FontFlags::BOLD));
        assert!(text.pen.font_flags.contains(FontFlags::ITALIC));
        assert_eq!(text.align, TextAlign::Left);
    }

    #[test]
    fn unknown_color_falls_back() {
        let parsed = parse_shapes("c 7 -nocolor e 0 0 1 1").unwrap();
        assert_eq!(parsed.shapes.len(), 1);
        assert_eq!(
            parsed.shapes[0].pen().unwrap().color,
            Color::Solid(FALLBACK_COLOR)
        );
        assert_eq!(
            parsed.warnings,
            vec![XdotError::UnknownColor("nocolor".to_string())]
        );
    }

    #[test]
    fn image_rect_from_origin_and_size() {
        let Shape::Image(image) = only_shape("I 10 20 30 40 9 -photo.png") else {
            panic!("expected image");
        };
        assert_eq!(image.path, "photo.png");
        assert_eq!(image.rect().min(), Point2::new(10.0, 20.0));
        assert_eq!(image.rect().max(), Point2::new(40.0, 60.0));
    }

    #[test]
    fn opcode_keywords_round_trip() {
        for keyword in ["E", "e", "P", "p", "L", "B", "b", "T", "t", "C", "c", "F", "S", "I"] {
            let opcode = Opcode::from_keyword(keyword).expect("known opcode");
            assert_eq!(opcode.keyword().to_string(), keyword);
        }
        assert!(Opcode::from_keyword("X").is_none());
        assert!(Opcode::from_keyword("EE").is_none());
    }
}
