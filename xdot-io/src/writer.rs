use std::fmt::Write as _;

use xdot_core::color::{Color, GradientKind, Rgba};
use xdot_core::geometry::Point2;
use xdot_core::pen::Pen;
use xdot_core::shape::{Shape, StyleAttribute};

/// 把图形序列写回 xdot 属性字符串。
///
/// 只在画笔与上一个图形不同时输出 `c`/`C`/`S`/`F`/`t` 指令，
/// 再次解析得到的图形与输入一致。
pub fn write_shapes(shapes: &[Shape]) -> String {
    let mut writer = XdotWriter::default();
    for shape in shapes {
        writer.shape(shape);
    }
    writer.out
}

/// 每组图形写成一个独立的属性字符串。
///
/// xdot 无法关闭 `bold` 和 `invis`，来自不同属性字符串的图形
/// 必须分开写，各自从默认画笔开始。
pub fn write_segments(segments: &[&[Shape]]) -> Vec<String> {
    segments.iter().map(|shapes| write_shapes(shapes)).collect()
}

#[derive(Default)]
struct XdotWriter {
    out: String,
    pen: Pen,
}

impl XdotWriter {
    fn token(&mut self, token: impl std::fmt::Display) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        let _ = write!(self.out, "{token}");
    }

    fn string(&mut self, text: &str) {
        self.token(format_args!("{} -{}", text.len(), text));
    }

    fn point(&mut self, point: Point2) {
        self.token(point.x());
        self.token(point.y());
    }

    fn points(&mut self, points: &[Point2]) {
        self.token(points.len());
        for point in points {
            self.point(*point);
        }
    }

    fn shape(&mut self, shape: &Shape) {
        if let Some(pen) = shape.pen() {
            self.sync_pen(pen);
        }
        match shape {
            Shape::Ellipse(ellipse) => {
                self.token(if ellipse.filled { 'E' } else { 'e' });
                self.point(ellipse.center);
                self.token(ellipse.rx);
                self.token(ellipse.ry);
            }
            Shape::Polygon(polygon) => {
                self.token(if polygon.filled { 'P' } else { 'p' });
                self.points(&polygon.points);
            }
            Shape::Polyline(polyline) => {
                self.token('L');
                self.points(&polyline.points);
            }
            Shape::Bezier(bezier) => {
                self.token(if bezier.filled { 'b' } else { 'B' });
                self.points(&bezier.points);
            }
            Shape::Text(text) => {
                self.token('T');
                self.point(text.anchor);
                self.token(text.align.code());
                self.token(text.width);
                self.string(&text.text);
            }
            Shape::Image(image) => {
                self.token('I');
                self.point(image.position);
                self.token(image.width);
                self.token(image.height);
                self.string(&image.path);
            }
            Shape::Style(attribute) => self.style_attribute(attribute),
        }
    }

    fn style_attribute(&mut self, attribute: &StyleAttribute) {
        let directive = match &attribute.value {
            Some(value) => format!("{}({})", attribute.key, value),
            None => attribute.key.clone(),
        };
        self.token('S');
        self.string(&directive);
    }

    fn style(&mut self, directive: &str) {
        self.token('S');
        self.string(directive);
    }

    fn sync_pen(&mut self, target: &Pen) {
        if target.color != self.pen.color {
            self.token('c');
            self.string(&color_spec(&target.color));
        }
        if target.fill_color != self.pen.fill_color {
            self.token('C');
            self.string(&color_spec(&target.fill_color));
        }

        let dash_changed = target.dash != self.pen.dash
            || target.style.dashed != self.pen.style.dashed
            || target.style.dotted != self.pen.style.dotted;
        if dash_changed {
            if target.style.dashed {
                self.style("dashed");
            } else if target.style.dotted {
                self.style("dotted");
            } else {
                self.style("solid");
            }
        }
        let mut line_width = self.pen.line_width;
        if target.style.bold && !self.pen.style.bold {
            self.style("bold");
            line_width = xdot_core::pen::BOLD_LINE_WIDTH;
        }
        if target.line_width != line_width {
            self.style(&format!("setlinewidth({})", target.line_width));
        }
        if target.style.invisible && !self.pen.style.invisible {
            self.style("invis");
        }

        if target.font_size != self.pen.font_size || target.font_name != self.pen.font_name {
            self.token('F');
            self.token(target.font_size);
            self.string(&target.font_name);
        }
        if target.font_flags != self.pen.font_flags {
            self.token('t');
            self.token(target.font_flags.bits());
        }

        self.pen = target.clone();
    }
}

/// 能被 8 位通道精确表示时写十六进制，否则写归一化 RGBA 四元组。
fn solid_spec(rgba: Rgba) -> String {
    let [r, g, b, a] = rgba.to_u8();
    if Rgba::from_u8(r, g, b, a) == rgba {
        rgba.to_hex()
    } else {
        format!("{},{},{},{}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

fn color_spec(color: &Color) -> String {
    let gradient = match color {
        Color::Solid(rgba) => return solid_spec(*rgba),
        Color::Gradient(gradient) => gradient,
    };

    let mut stops = String::new();
    for stop in gradient.stops() {
        let spec = solid_spec(stop.color);
        let _ = write!(stops, " {} {} -{}", stop.offset, spec.len(), spec);
    }
    match gradient.kind() {
        GradientKind::Linear { start, end } => format!(
            "[{} {} {} {} {}{}]",
            start.x(),
            start.y(),
            end.x(),
            end.y(),
            gradient.stops().len(),
            stops
        ),
        GradientKind::Radial {
            inner_center,
            inner_radius,
            outer_center,
            outer_radius,
        } => format!(
            "({} {} {} {} {} {} {}{})",
            inner_center.x(),
            inner_center.y(),
            inner_radius,
            outer_center.x(),
            outer_center.y(),
            outer_radius,
            gradient.stops().len(),
            stops
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_shapes;

    fn round_trip(source: &str) -> (Vec<Shape>, String) {
        let shapes = parse_shapes(source).expect("source parses").shapes;
        let written = write_shapes(&shapes);
        let reparsed = parse_shapes(&written).expect("written output parses").shapes;
        assert_eq!(reparsed, shapes, "written: {written}");
        (shapes, written)
    }

    #[test]
    fn default_pen_emits_no_state_ops() {
        let (_, written) = round_trip("e 50 50 20 10");
        assert_eq!(written, "e 50 50 20 10");
    }

    #[test]
    fn pen_changes_are_written_once() {
        let (_, written) = round_trip("c 3 -red C 4 -blue E 0 0 1 1 P 3 0 0 1 0 0 1");
        assert_eq!(
            written,
            "c 7 -#ff0000 C 7 -#0000ff E 0 0 1 1 P 3 0 0 1 0 0 1"
        );
    }

    #[test]
    fn styles_fonts_and_text_survive() {
        round_trip(
            "S 6 -dotted S 4 -bold S 17 -setlinewidth(3.5) F 10.5 9 -Helvetica t 5 \
             T 10 20 1 42.25 11 -hello world L 3 0 0 1 1 2 0",
        );
        round_trip("S 5 -invis S 13 -arrowhead=vee B 4 0 0 1 2 3 2 4 0 b 4 0 0 1 1 2 1 3 0");
    }

    #[test]
    fn non_byte_colors_use_component_form() {
        let (shapes, written) = round_trip("c 15 -0.1 0.7 0.3 0.5 e 0 0 1 1");
        assert!(written.starts_with("c 15 -0.1,0.7,0.3,0.5"), "{written}");
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn gradients_and_images_round_trip() {
        round_trip("C 35 -[0 0 100 0 2 0 5 -black 1 5 -white] P 3 0 0 100 0 50 50");
        round_trip("C 35 -(5 5 0 5 5 10 2 0 3 -red 1 4 -blue) E 5 5 10 10");
        round_trip("I 10 20 30 40 9 -photo.png");
    }

    #[test]
    fn bold_edge_and_plain_label_stay_separate() {
        let draws = [
            "S 4 -bold c 5 -black B 4 0 0 10 10 20 10 30 0",
            "F 14 11 -Times-Roman c 5 -black T 1 1 0 5 1 -x",
        ];
        let parsed: Vec<Vec<Shape>> = draws
            .iter()
            .map(|draw| parse_shapes(draw).unwrap().shapes)
            .collect();
        let segments: Vec<&[Shape]> = parsed.iter().map(Vec::as_slice).collect();

        let written = write_segments(&segments);
        assert_eq!(written.len(), 2);
        assert!(!written[1].contains("bold"), "{}", written[1]);
        for (text, original) in written.iter().zip(&parsed) {
            assert_eq!(&parse_shapes(text).unwrap().shapes, original);
        }
        let label = &parse_shapes(&written[1]).unwrap().shapes[0];
        assert!(!label.pen().unwrap().style.bold);

        let invisible = parse_shapes("S 5 -invis e 0 0 1 1").unwrap().shapes;
        let plain = parse_shapes("e 0 0 2 2").unwrap().shapes;
        let written = write_segments(&[invisible.as_slice(), plain.as_slice()]);
        assert_eq!(written[1], "e 0 0 2 2");
    }

    #[test]
    fn output_is_idempotent() {
        let source = "c 9 -#ff000080 S 6 -dashed p 2 0 0 1 1 F 8 5 -Arial T 1 1 -1 4 2 -ab";
        let first = write_shapes(&parse_shapes(source).unwrap().shapes);
        let second = write_shapes(&parse_shapes(&first).unwrap().shapes);
        assert_eq!(first, second);
    }
}
