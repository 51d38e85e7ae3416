use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};
use xdot_config::AppConfig;
use xdot_core::graph::Graph;
use xdot_engine::scene::{Scene, ViewSettings};
use xdot_engine::transform::Viewport;
use xdot_io::{
    EdgeSource, ElementDiagnostic, GraphLoader, GraphSource, NodeSource, XdotFacade,
};

use crate::errors::FrontendError;
use crate::resource_locator::ImageLocator;

/// 图来源，便于前端呈现加载信息。
#[derive(Debug, Clone, PartialEq)]
pub enum GraphInput {
    Json(PathBuf),
    Demo,
}

/// 统一封装加载后的场景与元信息。
#[derive(Debug)]
pub struct LoadedScene {
    pub scene: Scene,
    pub input: GraphInput,
    pub diagnostics: Vec<ElementDiagnostic>,
}

pub fn view_settings(config: &AppConfig) -> ViewSettings {
    let view = &config.view;
    ViewSettings {
        animation: Duration::from_millis(view.animation_ms),
        fit_margin: view.fit_margin,
        zoom_increment: view.zoom_increment,
        hit_tolerance_px: view.hit_tolerance_px,
        pan_step_px: view.pan_step_px,
    }
}

pub fn configured_viewport(config: &AppConfig) -> Viewport {
    Viewport::new(config.frontend.viewport_width, config.frontend.viewport_height)
}

/// 读取布局引擎导出的 JSON 图描述。
pub fn read_graph_source(path: &Path) -> Result<GraphSource, FrontendError> {
    let content = fs::read_to_string(path).map_err(|source| FrontendError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| FrontendError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// 内置示例：两个节点与一条边。
pub fn demo_source() -> GraphSource {
    let node = |id: &str, y: f64, label_y: f64| NodeSource {
        id: id.to_string(),
        draw: vec![
            format!("c 5 -black e 27 {y} 27 18"),
            format!("F 14 11 -Times-Roman c 5 -black T 27 {label_y} 0 7 1 -{id}"),
        ],
        url: None,
        position: Some([27.0, y]),
        size: Some([54.0, 36.0]),
    };
    GraphSource {
        extents: Some([0.0, 0.0, 62.0, 108.0]),
        draw: vec!["C 5 -white c 11 -transparent P 4 0 0 0 108 62 108 62 0".to_string()],
        nodes: vec![node("a", 90.0, 86.3), node("b", 18.0, 14.3)],
        edges: vec![EdgeSource {
            tail: "a".to_string(),
            head: "b".to_string(),
            label: None,
            draw: vec![
                "c 5 -black B 4 27 71.7 27 63.98 27 54.71 27 46.11".to_string(),
                "S 5 -solid c 5 -black C 5 -black P 3 30.5 46.1 27 36.1 23.5 46.1".to_string(),
            ],
            url: None,
        }],
    }
}

fn build_graph(
    input: &GraphInput,
    config: &AppConfig,
) -> Result<(Graph, Vec<ElementDiagnostic>), FrontendError> {
    let (source, base_dir) = match input {
        GraphInput::Json(path) => (read_graph_source(path)?, path.parent()),
        GraphInput::Demo => (demo_source(), None),
    };
    let locator = ImageLocator::from_config(base_dir, config);
    let report = XdotFacade::new()
        .load_with_images(&source, &mut |path: &str| locator.resolve_str(path))?;
    for diagnostic in &report.diagnostics {
        warn!(
            element = ?diagnostic.element,
            error = %diagnostic.error,
            "元素解析存在问题"
        );
    }
    if report.resolved_images > 0 {
        debug!(resolved = report.resolved_images, "已解析图片路径");
    }
    Ok((report.graph, report.diagnostics))
}

/// 加载指定 JSON 图；未指定路径时使用内置示例。
pub fn load_scene(path: Option<&Path>, config: &AppConfig) -> Result<LoadedScene, FrontendError> {
    let input = path.map_or(GraphInput::Demo, |path| GraphInput::Json(path.to_path_buf()));
    let (graph, diagnostics) = build_graph(&input, config)?;
    match &input {
        GraphInput::Json(path) => info!(path = %path.display(), "从 JSON 加载图成功"),
        GraphInput::Demo => info!("使用内置示例图"),
    }

    let mut scene = Scene::with_settings(configured_viewport(config), view_settings(config));
    scene.load_graph(graph);
    Ok(LoadedScene {
        scene,
        input,
        diagnostics,
    })
}

/// 重新读取同一来源并替换图，保留视图；失败时保留旧图。
pub fn reload_scene(loaded: &mut LoadedScene, config: &AppConfig) -> Result<(), FrontendError> {
    let mut diagnostics = Vec::new();
    loaded.scene.reload(|| {
        let (graph, found) = build_graph(&loaded.input, config)?;
        diagnostics = found;
        Ok::<_, FrontendError>(graph)
    })?;
    loaded.diagnostics = diagnostics;
    Ok(())
}
