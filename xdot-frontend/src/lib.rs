pub mod cli;
pub mod errors;
pub mod loader;
pub mod resource_locator;

use xdot_config::AppConfig;

use cli::CliOptions;
use errors::FrontendError;
use tracing::info;

/// 执行一次命令行查看并打印概览。
pub fn run_cli(options: &CliOptions, config: &AppConfig) -> Result<(), FrontendError> {
    info!("启动 CLI 前端");
    let report = cli::run(options, config)?;
    print!("{report}");
    Ok(())
}
