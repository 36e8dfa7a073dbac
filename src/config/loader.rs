//! 配置加载 - 把松散类型的配置文件转换为 `Configuration`
//!
//! 文件格式沿用 feature / option / text 三段式条目：
//!
//! ```json
//! {
//!   "features": [{ "name": "UpgradeOS", "enabled": "True" }],
//!   "options":  [{ "name": "TargetOS", "build": "18351" }],
//!   "texts":    [{ "name": "TitleText", "value": "New feature update available" }]
//! }
//! ```
//!
//! 布尔值接受 "True"/"False"（不区分大小写）或 JSON 布尔；缺失的条目使用
//! `Configuration::default()` 的值。

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use super::{Configuration, DeadlinePriority};
use crate::notification::style::ScenarioStyle;

/// 截止时间接受的格式
const DEADLINE_FORMATS: &[&str] = &["%d-%m-%Y %H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// 原始配置文件
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    features: Vec<RawEntry>,
    options: Vec<RawEntry>,
    texts: Vec<RawEntry>,
}

/// 单个条目，所有属性都是可选的
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    name: String,
    enabled: Option<Value>,
    value: Option<Value>,
    build: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(rename = "textToSpeech")]
    text_to_speech: Option<String>,
}

impl RawEntry {
    fn enabled(&self) -> Result<Option<bool>> {
        self.enabled
            .as_ref()
            .map(|v| parse_bool(v).with_context(|| format!("{}: invalid Enabled", self.name)))
            .transpose()
    }

    fn text(&self) -> Option<String> {
        self.value.as_ref().and_then(value_as_text)
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toast-notifier")
        .join("config-toast.json")
}

/// 从文件加载配置
pub fn load_config(path: &Path) -> Result<Configuration> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

/// 解析配置文本
pub fn parse_config(content: &str) -> Result<Configuration> {
    let raw: RawConfig = serde_json::from_str(content)?;
    let mut config = Configuration::default();

    for entry in &raw.features {
        let Some(enabled) = entry.enabled()? else {
            continue;
        };
        let features = &mut config.features;
        match entry.name.to_lowercase().as_str() {
            "toast" => config.toast_enabled = enabled,
            "upgradeos" => features.upgrade_os = enabled,
            "pendingrebootuptime" => features.pending_reboot_uptime = enabled,
            "pendingrebootcheck" => features.pending_reboot_check = enabled,
            "recentdeadlinecheck" => features.recent_deadline_check = enabled,
            other => debug!(feature = other, "Ignoring unknown feature"),
        }
    }

    for entry in &raw.options {
        apply_option(&mut config, entry)?;
    }

    for entry in &raw.texts {
        let Some(text) = entry.text() else {
            continue;
        };
        let texts = &mut config.texts;
        match entry.name.to_lowercase().as_str() {
            "attributiontext" => texts.attribution = text,
            "headertext" => texts.header = text,
            "titletext" => texts.title = text,
            "bodytext1" => texts.body1 = text,
            "bodytext2" => texts.body2 = text,
            "snoozetext" => texts.snooze_prompt = text,
            "deadlinetext" => texts.deadline_label = text,
            other => debug!(text = other, "Ignoring unknown text"),
        }
    }

    Ok(config)
}

fn apply_option(config: &mut Configuration, entry: &RawEntry) -> Result<()> {
    let enabled = entry.enabled()?;
    let text = entry.text().filter(|s| !s.trim().is_empty());

    match entry.name.to_lowercase().as_str() {
        "targetos" => {
            config.target_build_number = entry
                .build
                .as_ref()
                .or(entry.value.as_ref())
                .map(|v| parse_int::<u32>(v).context("TargetOS: invalid Build"))
                .transpose()?
                .flatten();
        }
        "maxuptimedays" => {
            config.max_uptime_days = entry
                .value
                .as_ref()
                .map(|v| parse_int::<i64>(v).context("MaxUptimeDays: invalid Value"))
                .transpose()?
                .flatten();
        }
        "deadline" => {
            if let Some(enabled) = enabled {
                config.deadline.enabled = enabled;
            }
            config.deadline.value = text.as_deref().map(parse_deadline).transpose()?;
        }
        "pendingrebootuptimetext" => {
            if let Some(enabled) = enabled {
                config.pending_reboot_uptime_text.enabled = enabled;
            }
            config.pending_reboot_uptime_text.value = text;
        }
        "pendingrebootchecktext" => {
            if let Some(enabled) = enabled {
                config.pending_reboot_check_text.enabled = enabled;
            }
            config.pending_reboot_check_text.value = text;
        }
        "usesoftwarecenterapp" => {
            if let Some(enabled) = enabled {
                config.presenter.software_center = enabled;
            }
        }
        "usepowershellapp" => {
            if let Some(enabled) = enabled {
                config.presenter.powershell = enabled;
            }
        }
        "customaudio" => {
            if let Some(enabled) = enabled {
                config.custom_audio.enabled = enabled;
            }
            if let Some(speech) = &entry.text_to_speech {
                config.custom_audio.speech_text = speech.clone();
            }
        }
        "actionbutton" | "dismissbutton" | "snoozebutton" => {
            let button = match entry.name.to_lowercase().as_str() {
                "actionbutton" => &mut config.action_button,
                "dismissbutton" => &mut config.dismiss_button,
                _ => &mut config.snooze_button,
            };
            if let Some(enabled) = enabled {
                button.enabled = enabled;
            }
            if let Some(label) = text {
                button.label = label;
            }
        }
        "scenario" => {
            if let Some(kind) = entry.kind.as_deref().or(text.as_deref()) {
                config.scenario_style = ScenarioStyle::from_str(kind)?;
            }
        }
        "action" => {
            if let Some(target) = text {
                config.action_target = target;
            }
        }
        "logoimagename" => {
            if let Some(logo) = text {
                config.images.logo = logo;
            }
        }
        "heroimagename" => {
            if let Some(hero) = text {
                config.images.hero = hero;
            }
        }
        "deadlinepriority" => {
            if let Some(priority) = text {
                config.deadline_priority = parse_priority(&priority)?;
            }
        }
        "deadlinesfile" => {
            config.probe.deadlines_file = text.map(PathBuf::from);
        }
        "rebootmarkerfiles" => {
            config.probe.reboot_marker_files = match &entry.value {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(value_as_text)
                    .map(PathBuf::from)
                    .collect(),
                _ => text.into_iter().map(PathBuf::from).collect(),
            };
        }
        other => debug!(option = other, "Ignoring unknown option"),
    }

    Ok(())
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn parse_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.trim().eq_ignore_ascii_case("false") => Ok(false),
        other => Err(anyhow!("expected \"True\" or \"False\", got {}", other)),
    }
}

/// 空字符串视为未设置
fn parse_int<T: TryFrom<i64>>(value: &Value) -> Result<Option<T>> {
    let number = match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| anyhow!("not an integer: {}", n))?,
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| anyhow!("not an integer: {}", s))?,
        Value::Null => return Ok(None),
        other => bail!("not an integer: {}", other),
    };
    T::try_from(number)
        .map(Some)
        .map_err(|_| anyhow!("integer out of range: {}", number))
}

fn parse_deadline(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    DEADLINE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| anyhow!("Deadline: unrecognised date '{}'", s))
}

fn parse_priority(s: &str) -> Result<DeadlinePriority> {
    match s.trim().to_lowercase().as_str() {
        "afterdefault" => Ok(DeadlinePriority::AfterDefault),
        "beforedefault" => Ok(DeadlinePriority::BeforeDefault),
        _ => Err(anyhow!("Unknown deadline priority: {}", s)),
    }
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "True"
    } else {
        "False"
    }
}

/// 生成默认配置文件内容（`toast init` 使用）
pub fn render_default_config() -> String {
    let c = Configuration::default();
    let priority = match c.deadline_priority {
        DeadlinePriority::AfterDefault => "AfterDefault",
        DeadlinePriority::BeforeDefault => "BeforeDefault",
    };
    let markers: Vec<String> = c
        .probe
        .reboot_marker_files
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect();

    let doc = json!({
        "features": [
            { "name": "Toast", "enabled": flag(c.toast_enabled) },
            { "name": "UpgradeOS", "enabled": flag(c.features.upgrade_os) },
            { "name": "PendingRebootUptime", "enabled": flag(c.features.pending_reboot_uptime) },
            { "name": "PendingRebootCheck", "enabled": flag(c.features.pending_reboot_check) },
            { "name": "RecentDeadlineCheck", "enabled": flag(c.features.recent_deadline_check) },
        ],
        "options": [
            { "name": "TargetOS", "build": "" },
            { "name": "MaxUptimeDays", "value": "" },
            { "name": "PendingRebootUptimeText", "enabled": flag(c.pending_reboot_uptime_text.enabled),
              "value": "Your computer is required to restart due to having exceeded the maximum allowed uptime." },
            { "name": "PendingRebootCheckText", "enabled": flag(c.pending_reboot_check_text.enabled),
              "value": "Reason: Pending reboots was found in registry or WMI." },
            { "name": "Deadline", "enabled": flag(c.deadline.enabled), "value": "" },
            { "name": "UseSoftwareCenterApp", "enabled": flag(c.presenter.software_center) },
            { "name": "UsePowershellApp", "enabled": flag(c.presenter.powershell) },
            { "name": "CustomAudio", "enabled": flag(c.custom_audio.enabled), "textToSpeech": c.custom_audio.speech_text },
            { "name": "ActionButton", "enabled": flag(c.action_button.enabled), "value": c.action_button.label },
            { "name": "DismissButton", "enabled": flag(c.dismiss_button.enabled), "value": c.dismiss_button.label },
            { "name": "SnoozeButton", "enabled": flag(c.snooze_button.enabled), "value": c.snooze_button.label },
            { "name": "Scenario", "type": c.scenario_style.as_str() },
            { "name": "Action", "value": c.action_target },
            { "name": "LogoImageName", "value": c.images.logo },
            { "name": "HeroImageName", "value": c.images.hero },
            { "name": "DeadlinePriority", "value": priority },
            { "name": "DeadlinesFile", "value": "" },
            { "name": "RebootMarkerFiles", "value": markers },
        ],
        "texts": [
            { "name": "AttributionText", "value": c.texts.attribution },
            { "name": "HeaderText", "value": c.texts.header },
            { "name": "TitleText", "value": c.texts.title },
            { "name": "BodyText1", "value": c.texts.body1 },
            { "name": "BodyText2", "value": c.texts.body2 },
            { "name": "SnoozeText", "value": c.texts.snooze_prompt },
            { "name": "DeadlineText", "value": c.texts.deadline_label },
        ],
    });

    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_string_booleans() {
        let config = parse_config(
            r#"{
                "features": [
                    { "name": "Toast", "enabled": "False" },
                    { "name": "UpgradeOS", "enabled": "true" },
                    { "name": "RecentDeadlineCheck", "enabled": true }
                ]
            }"#,
        )
        .unwrap();
        assert!(!config.toast_enabled);
        assert!(config.features.upgrade_os);
        assert!(config.features.recent_deadline_check);
    }

    #[test]
    fn test_invalid_boolean_is_rejected() {
        let err = parse_config(r#"{ "features": [{ "name": "Toast", "enabled": "Yes" }] }"#)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Toast"));
    }

    #[test]
    fn test_numeric_options_accept_strings_and_numbers() {
        let config = parse_config(
            r#"{
                "options": [
                    { "name": "TargetOS", "build": "18351" },
                    { "name": "MaxUptimeDays", "value": 6 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.target_build_number, Some(18351));
        assert_eq!(config.max_uptime_days, Some(6));

        let config = parse_config(r#"{ "options": [{ "name": "TargetOS", "build": "" }] }"#).unwrap();
        assert_eq!(config.target_build_number, None);

        assert!(parse_config(r#"{ "options": [{ "name": "TargetOS", "build": "abc" }] }"#).is_err());
    }

    #[test]
    fn test_buttons_and_presenter_options() {
        let config = parse_config(
            r#"{
                "options": [
                    { "name": "UseSoftwareCenterApp", "enabled": "True" },
                    { "name": "UsePowershellApp", "enabled": "False" },
                    { "name": "SnoozeButton", "enabled": "True", "value": "Remind me" },
                    { "name": "Action", "value": "softwarecenter:Page=Updates" },
                    { "name": "Scenario", "type": "long" }
                ]
            }"#,
        )
        .unwrap();
        assert!(config.presenter.software_center);
        assert!(!config.presenter.powershell);
        assert!(config.snooze_button.enabled);
        assert_eq!(config.snooze_button.label, "Remind me");
        assert_eq!(config.action_target, "softwarecenter:Page=Updates");
        assert_eq!(config.scenario_style, ScenarioStyle::Long);
    }

    #[test]
    fn test_deadline_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 9, 30)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(parse_deadline("30-09-2019 08:00").unwrap(), expected);
        assert_eq!(parse_deadline("2019-09-30 08:00").unwrap(), expected);
        assert_eq!(parse_deadline("2019-09-30T08:00:00").unwrap(), expected);
        assert!(parse_deadline("next tuesday").is_err());
    }

    #[test]
    fn test_text_fields() {
        let config = parse_config(
            r#"{
                "texts": [
                    { "name": "TitleText", "value": "Restart required" },
                    { "name": "BodyText2", "value": "Thanks" }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.texts.title, "Restart required");
        assert_eq!(config.texts.body2, "Thanks");
        assert_eq!(config.texts.header, Configuration::default().texts.header);
    }

    #[test]
    fn test_reboot_marker_files_array() {
        let config = parse_config(
            r#"{ "options": [{ "name": "RebootMarkerFiles", "value": ["/tmp/a", "/tmp/b"] }] }"#,
        )
        .unwrap();
        assert_eq!(
            config.probe.reboot_marker_files,
            vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]
        );
    }

    #[test]
    fn test_deadline_priority_option() {
        let config = parse_config(
            r#"{ "options": [{ "name": "DeadlinePriority", "value": "BeforeDefault" }] }"#,
        )
        .unwrap();
        assert_eq!(config.deadline_priority, DeadlinePriority::BeforeDefault);
    }

    #[test]
    fn test_rendered_defaults_parse_back() {
        let rendered = render_default_config();
        let config = parse_config(&rendered).unwrap();
        let defaults = Configuration::default();
        assert_eq!(config.toast_enabled, defaults.toast_enabled);
        assert_eq!(config.features, defaults.features);
        assert_eq!(config.presenter, defaults.presenter);
        assert_eq!(config.action_button, defaults.action_button);
        assert_eq!(config.texts, defaults.texts);
        assert_eq!(config.probe, defaults.probe);
        assert!(!config.pending_reboot_uptime_text.enabled);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/config-toast.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
