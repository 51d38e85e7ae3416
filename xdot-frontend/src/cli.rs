use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, warn};
use xdot_config::AppConfig;
use xdot_core::geometry::{Bounds2D, Point2};
use xdot_core::graph::JumpTarget;
use xdot_engine::command::{CommandBus, CommandContext, CommandRequest};
use xdot_engine::render::RecordingCanvas;
use xdot_engine::scene::Scene;
use xdot_engine::transform::Viewport;
use xdot_io::write_segments;

use crate::errors::FrontendError;
use crate::loader::{GraphInput, load_scene};

/// 命令行参数解析后的选项。
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub source: Option<PathBuf>,
    pub viewport: Option<Viewport>,
    /// 设备坐标命中探测点。
    pub probe: Option<Point2>,
    pub commands: Vec<CommandRequest>,
    pub dump_xdot: bool,
}

/// 解析 `宽x高`，如 `800x600`。
pub fn parse_viewport(text: &str) -> Option<Viewport> {
    let (w, h) = text.split_once(['x', 'X'])?;
    let (w, h): (f64, f64) = (w.trim().parse().ok()?, h.trim().parse().ok()?);
    (w > 0.0 && h > 0.0).then(|| Viewport::new(w, h))
}

/// 解析 `x,y`。
pub fn parse_point(text: &str) -> Option<Point2> {
    let (x, y) = text.split_once(',')?;
    Some(Point2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// 解析 `名称[=参数]`，如 `jump_to=a->b`。
pub fn parse_command(text: &str) -> Option<CommandRequest> {
    let (name, arg) = match text.split_once('=') {
        Some((name, arg)) => (name.trim(), Some(arg)),
        None => (text.trim(), None),
    };
    if name.is_empty() {
        return None;
    }
    let request = CommandRequest::new(name);
    Some(match arg {
        Some(arg) => request.arg(arg),
        None => request,
    })
}

/// 载入图、执行命令、在记录画布上渲染一次，返回文字概览。
pub fn run(options: &CliOptions, config: &AppConfig) -> Result<String, FrontendError> {
    let mut loaded = load_scene(options.source.as_deref(), config)?;
    if let Some(viewport) = options.viewport {
        loaded.scene.zoom_to_fit(viewport);
        finish_animation(&mut loaded.scene);
    }

    let mut out = String::new();
    let _ = writeln!(out, "xdot 场景查看器 CLI");
    match &loaded.input {
        GraphInput::Json(path) => {
            let _ = writeln!(out, "已从 JSON 加载图：{}", path.display());
        }
        GraphInput::Demo => {
            let _ = writeln!(out, "未指定图文件，使用内置示例");
        }
    }
    for diagnostic in &loaded.diagnostics {
        let owner = diagnostic
            .element
            .as_ref()
            .map_or_else(|| "<graph>".to_string(), ToString::to_string);
        let _ = writeln!(out, "  ! {owner}: {}", diagnostic.error);
    }

    let bus = CommandBus::new();
    for request in &options.commands {
        let mut context = CommandContext {
            scene: &mut loaded.scene,
        };
        match dispatch_cli_command(&bus, request, &mut context) {
            Ok(message) => {
                let _ = writeln!(out, "> {}: {message}", request.name);
            }
            Err(err) => {
                warn!("CLI 命令执行失败: {err}");
                let _ = writeln!(out, "> {}: 失败 ({err})", request.name);
            }
        }
        finish_animation(&mut loaded.scene);
    }

    let scene = &mut loaded.scene;
    if let Some(graph) = scene.graph() {
        info!(
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            "CLI 图统计"
        );
        let _ = writeln!(
            out,
            "节点 {} 个，边 {} 个，范围 {}",
            graph.nodes().len(),
            graph.edges().len(),
            format_bounds(graph.bounds())
        );
    }

    let viewport = scene.viewport();
    let view = scene.view();
    let _ = writeln!(
        out,
        "视口 {:.0}x{:.0}，平移=({:.2}, {:.2})，缩放={:.3}",
        viewport.width,
        viewport.height,
        view.pan.x(),
        view.pan.y(),
        view.zoom
    );

    if let Some(point) = options.probe {
        scene.hover(point);
        match scene.hit_test(point) {
            Some(hit) => {
                let jump = hit
                    .jump
                    .as_ref()
                    .map_or_else(|| "<无>".to_string(), describe_jump);
                let _ = writeln!(
                    out,
                    "探测 {}：命中 {}，跳转 {jump}",
                    format_point(point),
                    hit.element
                );
            }
            None => {
                let _ = writeln!(out, "探测 {}：未命中", format_point(point));
            }
        }
    }

    let mut canvas = RecordingCanvas::new(viewport);
    let stats = scene.draw(&mut canvas);
    let _ = writeln!(
        out,
        "渲染：绘制 {}，裁剪 {}，不可见 {}",
        stats.drawn, stats.culled, stats.invisible
    );

    if options.dump_xdot {
        if let Some(graph) = scene.graph() {
            let _ = writeln!(out, "xdot 输出：");
            // 每个属性字符串单独一行，画笔状态不跨行延续。
            for draw in write_segments(&graph.draw_segments()) {
                let _ = writeln!(out, "  <graph> {draw}");
            }
            for element in graph.elements() {
                for draw in write_segments(&element.draw_segments()) {
                    let _ = writeln!(out, "  {} {draw}", element.key());
                }
            }
        }
    }

    Ok(out)
}

fn dispatch_cli_command(
    bus: &CommandBus,
    request: &CommandRequest,
    context: &mut CommandContext<'_>,
) -> Result<String, FrontendError> {
    let response = bus.dispatch(request, context);
    let message = response.message.unwrap_or_default();
    if response.success {
        Ok(message)
    } else {
        Err(FrontendError::Command {
            name: request.name.clone(),
            message,
        })
    }
}

/// 命令行没有帧循环，直接推进到动画终点。
fn finish_animation(scene: &mut Scene) {
    if !scene.is_animating() {
        return;
    }
    let start = Instant::now();
    scene.advance_animation(start);
    scene.advance_animation(start + scene.settings().animation);
}

fn describe_jump(target: &JumpTarget) -> String {
    match target {
        JumpTarget::Node(id) => format!("节点 {id}"),
        JumpTarget::Edge(key) => format!("边 {} -> {}", key.tail, key.head),
        JumpTarget::Url(url) => format!("链接 {url}"),
    }
}

fn format_point(point: Point2) -> String {
    format!("({:.2}, {:.2})", point.x(), point.y())
}

fn format_bounds(bounds: Bounds2D) -> String {
    format!("{} - {}", format_point(bounds.min()), format_point(bounds.max()))
}
