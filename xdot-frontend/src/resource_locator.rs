use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use xdot_config::AppConfig;

const IMAGE_ROOTS_ENV: &str = "XDOT_IMAGE_ROOTS";

/// 按图文件目录、配置目录、环境变量的顺序查找图片。
#[derive(Debug, Clone, Default)]
pub struct ImageLocator {
    search_roots: Vec<PathBuf>,
}

impl ImageLocator {
    pub fn from_config(base_dir: Option<&Path>, config: &AppConfig) -> Self {
        let env_roots = env::var_os(IMAGE_ROOTS_ENV)
            .map(|paths| env::split_paths(&paths).collect())
            .unwrap_or_default();
        Self::with_roots(base_dir, &config.resources.image_roots, env_roots)
    }

    fn with_roots(base_dir: Option<&Path>, configured: &[PathBuf], extra: Vec<PathBuf>) -> Self {
        let mut roots: Vec<PathBuf> = Vec::new();

        if let Some(dir) = base_dir {
            roots.push(dir.to_path_buf());
        }
        roots.extend(configured.iter().cloned().filter(|path| path.is_dir()));
        roots.extend(extra.into_iter().filter(|path| path.is_dir()));

        // 去重，保持靠前优先级。
        let mut deduped: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !deduped.iter().any(|existing| existing == &root) {
                deduped.push(root);
            }
        }

        ImageLocator {
            search_roots: deduped,
        }
    }

    pub fn search_roots(&self) -> &[PathBuf] {
        &self.search_roots
    }

    pub fn resolve(&self, path_str: &str) -> Option<PathBuf> {
        let raw_path = Path::new(path_str);
        if raw_path.is_absolute() {
            if raw_path.exists() {
                return Some(Self::canonicalize_or_clone(raw_path));
            }
            debug!(path = %raw_path.display(), "图片路径为绝对路径但未找到对应文件");
            return None;
        }

        for root in &self.search_roots {
            let candidate = root.join(raw_path);
            trace!(candidate = %candidate.display(), "image locator candidate");
            if candidate.exists() {
                return Some(Self::canonicalize_or_clone(&candidate));
            }
        }
        None
    }

    /// 供组装阶段使用的字符串形式，找不到时返回 `None` 以保留原路径。
    pub fn resolve_str(&self, path_str: &str) -> Option<String> {
        self.resolve(path_str)
            .map(|resolved| resolved.to_string_lossy().into_owned())
    }

    fn canonicalize_or_clone(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }
}
