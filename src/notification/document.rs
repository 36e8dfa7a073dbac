//! 通知文档 - 交给 presenter 渲染的结构化内容

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::scenario::{ExtraBlock, ResolvedScenario, ScenarioKind};
use super::style::ScenarioStyle;
use crate::config::Configuration;

/// 截止时间显示格式，例如 "30 September 2019 08:00"
pub const DEADLINE_FORMAT: &str = "%d %B %Y %H:%M";

/// 贪睡选项（分钟, 显示文本）
pub const SNOOZE_OPTIONS: &[(u32, &str)] = &[
    (15, "15 minutes"),
    (60, "1 hour"),
    (240, "4 hours"),
    (480, "8 hours"),
];

/// 文本块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// 块的用途，例如 `title`、`deadline`
    pub role: String,
    pub text: String,
}

impl TextBlock {
    fn new(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnoozeOption {
    pub minutes: u32,
    pub label: String,
}

/// 通知上的按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToastAction {
    Action { label: String, target: String },
    Snooze { label: String, prompt: String, options: Vec<SnoozeOption> },
    Dismiss { label: String },
}

impl ToastAction {
    pub fn label(&self) -> &str {
        match self {
            ToastAction::Action { label, .. }
            | ToastAction::Snooze { label, .. }
            | ToastAction::Dismiss { label } => label,
        }
    }
}

/// 与展示方式无关的通知内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDocument {
    pub scenario: ScenarioKind,
    pub style: ScenarioStyle,
    pub logo_image: String,
    pub hero_image: String,
    pub attribution: String,
    pub header: String,
    /// title, body1, body2, then extra blocks in order
    pub blocks: Vec<TextBlock>,
    /// action, snooze, dismiss (each only when included)
    pub actions: Vec<ToastAction>,
}

impl NotificationDocument {
    pub fn title(&self) -> &str {
        self.blocks.first().map(|b| b.text.as_str()).unwrap_or("")
    }

    /// 标题之后的所有文本，每块一行
    pub fn body_text(&self) -> String {
        self.blocks
            .iter()
            .skip(1)
            .map(|b| b.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 组装通知文档
///
/// 调用方需先确认 `resolved.should_fire`。
pub fn assemble(config: &Configuration, resolved: &ResolvedScenario) -> NotificationDocument {
    let texts = &config.texts;

    let mut blocks = vec![
        TextBlock::new("title", texts.title.as_str()),
        TextBlock::new("body1", texts.body1.as_str()),
        TextBlock::new("body2", texts.body2.as_str()),
    ];
    for extra in &resolved.extra_blocks {
        match extra {
            ExtraBlock::Deadline(deadline) => {
                blocks.push(TextBlock::new("deadline_label", texts.deadline_label.as_str()));
                blocks.push(TextBlock::new("deadline", format_deadline(deadline)));
            }
            ExtraBlock::PendingRebootReason(reason) => {
                blocks.push(TextBlock::new("pending_reboot_reason", reason.as_str()));
            }
            ExtraBlock::UptimeText(text) => {
                blocks.push(TextBlock::new("uptime_text", text.as_str()));
            }
            ExtraBlock::UptimeDays(days) => {
                blocks.push(TextBlock::new("uptime", format!("Computer uptime: {} days", days)));
            }
        }
    }

    let mut actions = Vec::new();
    if resolved.include_action_button {
        actions.push(ToastAction::Action {
            label: config.action_button.label.clone(),
            target: config.action_target.clone(),
        });
    }
    if resolved.include_snooze_button {
        actions.push(ToastAction::Snooze {
            label: config.snooze_button.label.clone(),
            prompt: texts.snooze_prompt.clone(),
            options: SNOOZE_OPTIONS
                .iter()
                .map(|(minutes, label)| SnoozeOption {
                    minutes: *minutes,
                    label: label.to_string(),
                })
                .collect(),
        });
    }
    if resolved.include_dismiss_button {
        actions.push(ToastAction::Dismiss {
            label: config.dismiss_button.label.clone(),
        });
    }

    NotificationDocument {
        scenario: resolved.scenario_kind,
        style: config.scenario_style,
        logo_image: config.images.logo.clone(),
        hero_image: config.images.hero.clone(),
        attribution: texts.attribution.clone(),
        header: texts.header.clone(),
        blocks,
        actions,
    }
}

pub fn format_deadline(deadline: &NaiveDateTime) -> String {
    deadline.format(DEADLINE_FORMAT).to_string()
}
