// src/cli/init.rs
//! Init 命令 - 生成默认配置文件
//!
//! 写入带有全部条目和默认值的配置，已有文件时先确认是否覆盖。

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::Confirm;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::render_default_config;

/// Init 命令参数
#[derive(Args)]
pub struct InitArgs {
    /// 跳过确认，直接覆盖已有配置
    #[arg(short, long)]
    pub yes: bool,

    /// 只打印配置内容，不写入文件
    #[arg(long)]
    pub dry_run: bool,
}

/// 处理 init 命令
pub fn handle_init(config_path: &Path, args: InitArgs) -> Result<i32> {
    let content = render_default_config();

    if args.dry_run {
        println!("{}", content);
        return Ok(0);
    }

    if config_path.exists() {
        println!("检测到已有配置: {}", config_path.display());
        if !args.yes {
            let overwrite = Confirm::new()
                .with_prompt("是否覆盖现有配置？")
                .default(false)
                .interact()
                .unwrap_or(false);
            if !overwrite {
                println!("已取消。");
                return Ok(0);
            }
        }
    }

    write_config(config_path, &content)?;
    info!(path = %config_path.display(), "Wrote default config");
    println!("配置已写入: {}", config_path.display());
    Ok(0)
}

fn write_config(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    // 先写临时文件再原子替换
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
