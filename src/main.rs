//! Toast Notifier CLI
//!
//! 按配置展示桌面提醒通知，通常由计划任务定期调用。

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use toast_notifier::cli::{
    handle_facts, handle_init, handle_run, handle_validate, resolve_config_path, FactsArgs,
    InitArgs, RunArgs, ValidateArgs,
};

#[derive(Parser)]
#[command(name = "toast")]
#[command(about = "Toast Notifier - 按配置展示桌面提醒通知")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认: <config dir>/toast-notifier/config-toast.json）
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 判定场景并展示通知（默认命令）
    Run(RunArgs),
    /// 只校验配置文件
    Validate(ValidateArgs),
    /// 显示探测到的主机状态
    Facts(FactsArgs),
    /// 生成默认配置文件
    Init(InitArgs),
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    // 例如: RUST_LOG=debug toast run --dry-run
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("toast_notifier=info,toast=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config);

    let code = match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => handle_run(&config_path, args)?,
        Commands::Validate(args) => handle_validate(&config_path, args)?,
        Commands::Facts(args) => handle_facts(&config_path, args)?,
        Commands::Init(args) => handle_init(&config_path, args)?,
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
