pub mod assembly;
pub mod color;
pub mod lexer;
pub mod parser;
pub mod writer;

use thiserror::Error;

pub use assembly::{
    EdgeSource, ElementDiagnostic, GraphSource, LoadReport, NodeSource, assemble_graph,
    assemble_graph_with,
};
pub use color::{FALLBACK_COLOR, parse_color};
pub use parser::{Opcode, ParsedShapes, XdotParser, parse_shapes};
pub use writer::{write_segments, write_shapes};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XdotError {
    #[error("malformed token at byte {offset}: {message}")]
    MalformedToken { offset: usize, message: String },
    #[error("unsupported opcode `{opcode}` at byte {offset}")]
    UnsupportedOpcode { opcode: String, offset: usize },
    #[error("unknown color `{0}`")]
    UnknownColor(String),
    #[error("invalid geometry for `{opcode}`: {message}")]
    InvalidGeometry { opcode: char, message: String },
    #[error("graph assembly failed: {0}")]
    GraphAssembly(String),
}

impl XdotError {
    /// 是否使整个属性字符串失效（否则只影响单个图形或颜色）。
    pub fn is_element_scoped(&self) -> bool {
        matches!(
            self,
            XdotError::MalformedToken { .. } | XdotError::UnsupportedOpcode { .. }
        )
    }
}

pub trait GraphLoader {
    fn load(&self, source: &GraphSource) -> Result<LoadReport, XdotError>;

    /// 加载时用 `resolve_image` 改写图片路径，图在构造完成后不再变动。
    fn load_with_images(
        &self,
        source: &GraphSource,
        resolve_image: &mut dyn FnMut(&str) -> Option<String>,
    ) -> Result<LoadReport, XdotError>;
}

/// 默认的 xdot 加载入口。
#[derive(Debug, Default, Clone, Copy)]
pub struct XdotFacade;

impl XdotFacade {
    pub fn new() -> Self {
        Self
    }
}

impl GraphLoader for XdotFacade {
    fn load(&self, source: &GraphSource) -> Result<LoadReport, XdotError> {
        assemble_graph(source)
    }

    fn load_with_images(
        &self,
        source: &GraphSource,
        resolve_image: &mut dyn FnMut(&str) -> Option<String>,
    ) -> Result<LoadReport, XdotError> {
        assemble_graph_with(source, resolve_image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_scope_classification() {
        assert!(
            XdotError::MalformedToken {
                offset: 0,
                message: String::new()
            }
            .is_element_scoped()
        );
        assert!(
            XdotError::UnsupportedOpcode {
                opcode: "X".into(),
                offset: 3
            }
            .is_element_scoped()
        );
        assert!(!XdotError::UnknownColor("x".into()).is_element_scoped());
        assert!(
            !XdotError::InvalidGeometry {
                opcode: 'B',
                message: String::new()
            }
            .is_element_scoped()
        );
    }

    #[test]
    fn error_messages_name_the_location() {
        let err = XdotError::UnsupportedOpcode {
            opcode: "X".into(),
            offset: 12,
        };
        assert_eq!(err.to_string(), "unsupported opcode `X` at byte 12");
    }
}
