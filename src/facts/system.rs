//! 系统探测 - 基于 sysinfo、平台命令和标记文件的 `PredicateProvider`
//!
//! Windows 上读取注册表和 ConfigMgr 客户端；其他平台使用 reboot-required
//! 标记文件和 `needs-restarting -r`。

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;
use sysinfo::System;
use tracing::{debug, warn};

use super::PredicateProvider;
use crate::config::ProbeSettings;

/// 表示挂起重启的注册表项
const REBOOT_REGISTRY_KEYS: &[&str] = &[
    r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Component Based Servicing\RebootPending",
    r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\WindowsUpdate\Auto Update\RebootRequired",
];

const CCM_SERVICE: &str = "ccmexec";

const CCM_REBOOT_QUERY: &str = r"(Invoke-CimMethod -Namespace root\ccm\ClientSDK -ClassName CCM_ClientUtilities -MethodName DetermineIfRebootPending).RebootPending";

/// 截止时间窗口（前后各 24 小时）
const DEADLINE_WINDOW_HOURS: i64 = 24;

const SECONDS_PER_DAY: u64 = 86_400;

/// 本机探测器
pub struct SystemProbe {
    reboot_marker_files: Vec<PathBuf>,
    deadlines_file: Option<PathBuf>,
}

impl SystemProbe {
    pub fn new(settings: &ProbeSettings) -> Self {
        Self {
            reboot_marker_files: settings.reboot_marker_files.clone(),
            deadlines_file: settings.deadlines_file.clone(),
        }
    }

    fn registry_key_exists(key: &str) -> bool {
        run_command("reg", &["query", key])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn ccm_reboot_pending() -> bool {
        let service_present = run_command("sc", &["query", CCM_SERVICE])
            .map(|output| output.status.success())
            .unwrap_or(false);
        if !service_present {
            warn!(service = CCM_SERVICE, "ConfigMgr client not found, skipping reboot check");
            return false;
        }

        match run_command("powershell", &["-NoProfile", "-NonInteractive", "-Command", CCM_REBOOT_QUERY]) {
            Some(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                stdout.trim().eq_ignore_ascii_case("true")
            }
            Some(output) => {
                warn!(
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "ConfigMgr reboot query failed"
                );
                false
            }
            None => false,
        }
    }

    fn needs_restarting() -> bool {
        let Ok(path) = which::which("needs-restarting") else {
            warn!("needs-restarting not found, skipping service reboot check");
            return false;
        };
        // exit code 1 means a reboot is required
        run_command(&path.to_string_lossy(), &["-r"])
            .map(|output| output.status.code() == Some(1))
            .unwrap_or(false)
    }

    fn load_deadlines(path: &Path) -> Vec<DateTime<Utc>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read deadlines file");
                return Vec::new();
            }
        };
        let entries: Vec<String> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Deadlines file is not a JSON string array");
                return Vec::new();
            }
        };
        entries
            .iter()
            .filter_map(|entry| match DateTime::parse_from_rfc3339(entry) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    warn!(entry = %entry, error = %e, "Skipping malformed deadline");
                    None
                }
            })
            .collect()
    }
}

impl PredicateProvider for SystemProbe {
    fn registry_reboot_pending(&self) -> bool {
        let pending = if cfg!(windows) {
            REBOOT_REGISTRY_KEYS.iter().any(|key| Self::registry_key_exists(key))
        } else {
            self.reboot_marker_files.iter().any(|path| path.exists())
        };
        debug!(pending, "Registry reboot check");
        pending
    }

    fn service_reboot_pending(&self) -> bool {
        let pending = if cfg!(windows) {
            Self::ccm_reboot_pending()
        } else {
            Self::needs_restarting()
        };
        debug!(pending, "Service reboot check");
        pending
    }

    fn uptime_days(&self) -> i64 {
        (System::uptime() / SECONDS_PER_DAY) as i64
    }

    fn running_build_number(&self) -> u32 {
        let kernel = System::kernel_version().unwrap_or_default();
        match parse_build_number(&kernel) {
            Some(build) => build,
            None => {
                warn!(kernel = %kernel, "Cannot determine OS build number");
                0
            }
        }
    }

    fn recent_or_upcoming_deadline_count(&self) -> usize {
        let Some(path) = &self.deadlines_file else {
            debug!("No deadlines file configured");
            return 0;
        };
        let deadlines = Self::load_deadlines(path);
        count_deadlines_within(&deadlines, Utc::now(), Duration::hours(DEADLINE_WINDOW_HOURS))
    }
}

fn run_command(program: &str, args: &[&str]) -> Option<Output> {
    match Command::new(program).args(args).output() {
        Ok(output) => Some(output),
        Err(e) => {
            warn!(program, error = %e, "Failed to run probe command");
            None
        }
    }
}

/// 取版本字符串中的第一段数字（Windows 上即 build 号）
pub fn parse_build_number(version: &str) -> Option<u32> {
    static BUILD_RE: OnceLock<Regex> = OnceLock::new();
    let re = BUILD_RE.get_or_init(|| Regex::new(r"\d+").expect("valid build number pattern"));
    re.find(version).and_then(|m| m.as_str().parse().ok())
}

/// 统计落在 `now ± window` 内的截止时间
pub fn count_deadlines_within(deadlines: &[DateTime<Utc>], now: DateTime<Utc>, window: Duration) -> usize {
    deadlines
        .iter()
        .filter(|deadline| **deadline >= now - window && **deadline <= now + window)
        .count()
}
