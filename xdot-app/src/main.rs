use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use xdot_config::{AppConfig, ConfigError};
use xdot_frontend::cli::{CliOptions, parse_command, parse_point, parse_viewport};

fn main() {
    let mut args = std::env::args().skip(1);
    let mut options = CliOptions::default();
    let mut config_override: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_override = Some(PathBuf::from(require_value(&mut args, &arg))),
            "--source" => options.source = Some(PathBuf::from(require_value(&mut args, &arg))),
            "--viewport" => {
                let value = require_value(&mut args, &arg);
                options.viewport = Some(parse_viewport(&value).unwrap_or_else(|| {
                    exit_with_usage(&format!("`--viewport` 需要形如 800x600 的尺寸：{value}"))
                }));
            }
            "--probe" => {
                let value = require_value(&mut args, &arg);
                options.probe = Some(parse_point(&value).unwrap_or_else(|| {
                    exit_with_usage(&format!("`--probe` 需要形如 10,20 的设备坐标：{value}"))
                }));
            }
            "--command" => {
                let value = require_value(&mut args, &arg);
                options.commands.push(parse_command(&value).unwrap_or_else(|| {
                    exit_with_usage(&format!("无法解析命令：{value}"))
                }));
            }
            "--dump-xdot" => options.dump_xdot = true,
            other => exit_with_usage(&format!("未知参数：{other}")),
        }
    }

    let explicit = config_override.is_some();
    let (config, config_error) = load_configuration(config_override);
    init_logging(&config);
    if let Some(err) = &config_error {
        report_config_error(err, explicit);
    }
    info!("启动 xdot 场景查看器");

    if let Err(err) = xdot_frontend::run_cli(&options, &config) {
        error!(error = %err, "执行 CLI 失败");
        std::process::exit(1);
    }
}

fn require_value(args: &mut impl Iterator<Item = String>, flag: &str) -> String {
    args.next()
        .unwrap_or_else(|| exit_with_usage(&format!("`{flag}` 需要提供参数")))
}

fn exit_with_usage(message: &str) -> ! {
    eprintln!("{message}");
    eprintln!(
        "用法: xdot-view [--config 路径] [--source 图.json] [--viewport 宽x高] \
         [--probe x,y] [--command 名称[=参数]]... [--dump-xdot]"
    );
    std::process::exit(1);
}

/// 失败时回退到默认配置；错误留到日志初始化之后再报告。
fn load_configuration(override_path: Option<PathBuf>) -> (AppConfig, Option<ConfigError>) {
    let loaded = match override_path {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::discover(),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    }
}

fn report_config_error(err: &ConfigError, explicit: bool) {
    let message = if explicit {
        "加载指定配置失败，使用默认配置"
    } else {
        "加载默认配置失败，使用内建默认值"
    };
    match err {
        ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
            warn!(path = %path.display(), error = %err, "{message}");
        }
        ConfigError::Invalid { .. } | ConfigError::Context { .. } => {
            warn!(error = %err, "{message}");
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}
