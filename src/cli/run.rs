// src/cli/run.rs
//! Run / validate / facts 命令
//!
//! `run` 是计划任务调用的入口：加载配置、判定场景并展示通知。

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::output::{format_facts, format_outcome, format_output};
use crate::config::{default_config_path, load_config, validate, ConfigError};
use crate::facts::{EnvironmentFacts, SystemProbe};
use crate::notification::presenters::{ConsolePresenter, DesktopPresenter};
use crate::notification::{Presenter, ToastDispatcher};

/// 配置被禁用或无效时的退出码
pub const EXIT_CONFIG_FAILURE: i32 = 1;

/// Run 命令参数
#[derive(Args, Default)]
pub struct RunArgs {
    /// 只打印通知，不真正展示
    #[arg(long)]
    pub dry_run: bool,

    /// dry-run 时以 JSON 输出通知文档
    #[arg(long)]
    pub json: bool,
}

/// Validate 命令参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 输出解析后的配置（JSON）
    #[arg(long)]
    pub json: bool,
}

/// Facts 命令参数
#[derive(Args)]
pub struct FactsArgs {
    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// 解析配置路径（未指定时使用默认路径）
pub fn resolve_config_path(config: Option<PathBuf>) -> PathBuf {
    config.unwrap_or_else(default_config_path)
}

/// 处理 run 命令，返回进程退出码
pub fn handle_run(config_path: &Path, args: RunArgs) -> Result<i32> {
    let config = load_config(config_path)?;
    let probe = SystemProbe::new(&config.probe);

    let console;
    let desktop;
    let presenter: &dyn Presenter = if args.dry_run {
        console = ConsolePresenter::stdout(args.json);
        &console
    } else {
        desktop = DesktopPresenter::new();
        &desktop
    };

    match ToastDispatcher::new(presenter).run(config, &probe) {
        Ok(outcome) => {
            info!("{}", format_outcome(&outcome));
            Ok(0)
        }
        Err(e) => Ok(report_config_error(&e)),
    }
}

/// 处理 validate 命令
pub fn handle_validate(config_path: &Path, args: ValidateArgs) -> Result<i32> {
    let config = load_config(config_path)?;
    match validate(config) {
        Ok(config) => {
            if args.json {
                println!("{}", format_output(&config));
            } else {
                println!("Configuration is valid: {}", config_path.display());
            }
            Ok(0)
        }
        Err(e) => Ok(report_config_error(&e)),
    }
}

/// 处理 facts 命令（探测全部主机状态）
pub fn handle_facts(config_path: &Path, args: FactsArgs) -> Result<i32> {
    // 没有配置文件时仍然可以用默认探测设置
    let settings = if config_path.exists() {
        load_config(config_path)?.probe
    } else {
        Default::default()
    };
    let facts = EnvironmentFacts::probe_all(&SystemProbe::new(&settings));

    if args.json {
        println!("{}", format_output(&facts));
    } else {
        println!("{}", format_facts(&facts));
    }
    Ok(0)
}

fn report_config_error(err: &ConfigError) -> i32 {
    if err.is_disabled() {
        info!("Toast notifications are disabled in the config, nothing to do");
    } else {
        error!(error = %err, "Invalid configuration");
        eprintln!("Invalid configuration: {}", err);
    }
    EXIT_CONFIG_FAILURE
}
