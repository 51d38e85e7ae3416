use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub resources: ResourceConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 自动发现配置文件：优先读取环境变量 `XDOT_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os("XDOT_CONFIG") {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let view = &self.view;
        if !(view.zoom_increment.is_finite() && view.zoom_increment > 1.0) {
            return Err(ConfigError::Invalid {
                key: "view.zoom_increment",
                message: format!("必须大于 1，实际为 {}", view.zoom_increment),
            });
        }
        for (key, value) in [
            ("view.fit_margin", view.fit_margin),
            ("view.hit_tolerance_px", view.hit_tolerance_px),
            ("view.pan_step_px", view.pan_step_px),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    key,
                    message: format!("必须是非负数，实际为 {value}"),
                });
            }
        }
        let frontend = &self.frontend;
        if !(frontend.viewport_width > 0.0 && frontend.viewport_height > 0.0) {
            return Err(ConfigError::Invalid {
                key: "frontend.viewport_width/viewport_height",
                message: format!(
                    "视口尺寸必须为正，实际为 {}x{}",
                    frontend.viewport_width, frontend.viewport_height
                ),
            });
        }
        Ok(())
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 视图交互参数。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// 视图动画时长（毫秒），0 表示直接跳到目标。
    pub animation_ms: u64,
    pub fit_margin: f64,
    pub zoom_increment: f64,
    pub hit_tolerance_px: f64,
    pub pan_step_px: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            animation_ms: 500,
            fit_margin: 0.0,
            zoom_increment: 1.25,
            hit_tolerance_px: 4.0,
            pan_step_px: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            viewport_width: 610.0,
            viewport_height: 610.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub image_roots: Vec<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("配置项 {key} 无效: {message}")]
    Invalid { key: &'static str, message: String },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}
