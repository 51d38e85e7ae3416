use std::path::PathBuf;

use thiserror::Error;
use xdot_engine::EngineError;
use xdot_io::XdotError;

#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("读取图文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析图文件 {path:?} 失败: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Load(#[from] XdotError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("命令 `{name}` 执行失败: {message}")]
    Command { name: String, message: String },
}
