use xdot_core::ColorScheme;
use xdot_core::color::{Color, Gradient, GradientKind, GradientStop, Rgba};
use xdot_core::geometry::Point2;

use crate::XdotError;
use crate::lexer::XdotLexer;

/// 无法解析的颜色统一替换为不透明黑色。
pub const FALLBACK_COLOR: Rgba = Rgba::BLACK;

/// 解析 `c`/`C` 操作码携带的颜色字符串。
///
/// 支持 `#RRGGBB`、`#RRGGBBAA`、HSV 三元组、归一化 RGBA 四元组、
/// X11/SVG 颜色名（可带 `/x11/`、`/svg/` 前缀）以及线性/径向渐变。
pub fn parse_color(spec: &str) -> Result<Color, XdotError> {
    let trimmed = spec.trim();
    if let Some(body) = trimmed.strip_prefix('[') {
        let body = body.strip_suffix(']').unwrap_or(body);
        return parse_linear_gradient(spec, body).map(Color::Gradient);
    }
    if let Some(body) = trimmed.strip_prefix('(') {
        let body = body.strip_suffix(')').unwrap_or(body);
        return parse_radial_gradient(spec, body).map(Color::Gradient);
    }
    parse_solid(trimmed).map(Color::Solid)
}

pub fn parse_solid(spec: &str) -> Result<Rgba, XdotError> {
    let spec = spec.trim();
    let unknown = || XdotError::UnknownColor(spec.to_string());

    if let Some(hex) = spec.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(unknown);
    }

    if spec.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return parse_components(spec).ok_or_else(unknown);
    }

    if let Some(rest) = spec.strip_prefix('/') {
        let (scheme, name) = rest.split_once('/').ok_or_else(unknown)?;
        let scheme = match scheme.to_ascii_lowercase().as_str() {
            "" | "x11" => ColorScheme::X11,
            "svg" => ColorScheme::Svg,
            _ => return Err(unknown()),
        };
        return Rgba::named_in(name, scheme).ok_or_else(unknown);
    }

    Rgba::named(spec).ok_or_else(unknown)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Rgba::from_u8(channel(0)?, channel(2)?, channel(4)?, alpha))
}

/// 三个分量按 Graphviz 约定视为 HSV，四个分量视为归一化 RGBA。
fn parse_components(spec: &str) -> Option<Rgba> {
    let values = spec
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>().ok().filter(|v| (0.0..=1.0).contains(v)))
        .collect::<Option<Vec<f64>>>()?;
    match values.as_slice() {
        [h, s, v] => Some(Rgba::from_hsv(*h, *s, *v)),
        [r, g, b, a] => Some(Rgba::new(*r, *g, *b, *a)),
        _ => None,
    }
}

fn parse_linear_gradient(spec: &str, body: &str) -> Result<Gradient, XdotError> {
    let mut lexer = XdotLexer::new(body);
    let start = read_point(&mut lexer)?;
    let end = read_point(&mut lexer)?;
    let stops = read_stops(&mut lexer)?;
    Gradient::new(GradientKind::Linear { start, end }, stops)
        .map_err(|_| XdotError::UnknownColor(spec.to_string()))
}

fn parse_radial_gradient(spec: &str, body: &str) -> Result<Gradient, XdotError> {
    let mut lexer = XdotLexer::new(body);
    let inner_center = read_point(&mut lexer)?;
    let inner_radius = lexer.read_float()?;
    let outer_center = read_point(&mut lexer)?;
    let outer_radius = lexer.read_float()?;
    let stops = read_stops(&mut lexer)?;
    Gradient::new(
        GradientKind::Radial {
            inner_center,
            inner_radius,
            outer_center,
            outer_radius,
        },
        stops,
    )
    .map_err(|_| XdotError::UnknownColor(spec.to_string()))
}

fn read_point(lexer: &mut XdotLexer<'_>) -> Result<Point2, XdotError> {
    let x = lexer.read_float()?;
    let y = lexer.read_float()?;
    Ok(Point2::new(x, y))
}

fn read_stops(lexer: &mut XdotLexer<'_>) -> Result<Vec<GradientStop>, XdotError> {
    let count = lexer.read_int()?;
    let count = usize::try_from(count).map_err(|_| XdotError::MalformedToken {
        offset: lexer.offset(),
        message: format!("negative gradient stop count {count}"),
    })?;
    let mut stops = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let offset = lexer.read_float()?;
        let color = parse_solid(lexer.read_string()?)?;
        stops.push(GradientStop { offset, color });
    }
    Ok(stops)
}
