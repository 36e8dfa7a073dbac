//! 场景判定 - 根据配置和主机状态选出唯一的通知形态
//!
//! Rules are evaluated in a fixed priority order and the first match wins.
//! A non-firing result is a normal outcome, not an error.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::{Configuration, DeadlinePriority};
use crate::facts::EnvironmentFacts;

/// 通知场景
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    UpgradeOs,
    PendingRebootUptime,
    PendingRebootRegistry,
    PendingRebootWmi,
    RecentDeadline,
    Default,
    None,
}

impl ScenarioKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::UpgradeOs => "UpgradeOS",
            ScenarioKind::PendingRebootUptime => "PendingRebootUptime",
            ScenarioKind::PendingRebootRegistry => "PendingRebootRegistry",
            ScenarioKind::PendingRebootWmi => "PendingRebootWMI",
            ScenarioKind::RecentDeadline => "RecentDeadline",
            ScenarioKind::Default => "Default",
            ScenarioKind::None => "None",
        }
    }
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 正文之后追加的附加块，顺序固定：截止时间 → 重启原因 → 开机时长
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtraBlock {
    Deadline(NaiveDateTime),
    PendingRebootReason(String),
    UptimeText(String),
    UptimeDays(i64),
}

/// 判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedScenario {
    pub should_fire: bool,
    pub scenario_kind: ScenarioKind,
    pub include_action_button: bool,
    pub include_dismiss_button: bool,
    pub include_snooze_button: bool,
    pub extra_blocks: Vec<ExtraBlock>,
}

/// 单条规则的判定
enum Rule {
    Fire(ScenarioKind),
    Suppress,
    Skip,
}

/// 判定场景（纯函数）
pub fn resolve(config: &Configuration, facts: &EnvironmentFacts) -> ResolvedScenario {
    let kind = match evaluate_rules(config, facts) {
        Some(kind) => kind,
        None => return ResolvedScenario::silent(config),
    };

    let mut extra_blocks = Vec::new();
    if let Some(deadline) = config.deadline.active() {
        extra_blocks.push(ExtraBlock::Deadline(*deadline));
    }
    match kind {
        ScenarioKind::PendingRebootRegistry | ScenarioKind::PendingRebootWmi => {
            if let Some(reason) = config.pending_reboot_check_text.active() {
                extra_blocks.push(ExtraBlock::PendingRebootReason(reason.clone()));
            }
        }
        ScenarioKind::PendingRebootUptime => {
            if let Some(text) = config.pending_reboot_uptime_text.active() {
                extra_blocks.push(ExtraBlock::UptimeText(text.clone()));
            }
            extra_blocks.push(ExtraBlock::UptimeDays(facts.uptime_days));
        }
        _ => {}
    }

    ResolvedScenario {
        should_fire: true,
        scenario_kind: kind,
        extra_blocks,
        ..ResolvedScenario::silent(config)
    }
}

/// 依次评估规则，返回命中的场景；`None` 表示不发送
fn evaluate_rules(config: &Configuration, facts: &EnvironmentFacts) -> Option<ScenarioKind> {
    let rules: [fn(&Configuration, &EnvironmentFacts) -> Rule; 6] = match config.deadline_priority {
        DeadlinePriority::AfterDefault => [
            upgrade_os_rule,
            uptime_rule,
            registry_rule,
            service_rule,
            default_rule,
            recent_deadline_rule,
        ],
        DeadlinePriority::BeforeDefault => [
            upgrade_os_rule,
            uptime_rule,
            registry_rule,
            service_rule,
            recent_deadline_rule,
            default_rule,
        ],
    };

    for rule in rules {
        match rule(config, facts) {
            Rule::Fire(kind) => return Some(kind),
            Rule::Suppress => return None,
            Rule::Skip => {}
        }
    }
    None
}

fn upgrade_os_rule(config: &Configuration, facts: &EnvironmentFacts) -> Rule {
    if !config.features.upgrade_os {
        return Rule::Skip;
    }
    match config.target_build_number {
        Some(target) if facts.running_build_number < target => Rule::Fire(ScenarioKind::UpgradeOs),
        // already on (or past) the target build
        _ => Rule::Suppress,
    }
}

fn uptime_rule(config: &Configuration, facts: &EnvironmentFacts) -> Rule {
    match config.max_uptime_days {
        Some(max) if config.features.pending_reboot_uptime && facts.uptime_days > max => {
            Rule::Fire(ScenarioKind::PendingRebootUptime)
        }
        _ => Rule::Skip,
    }
}

fn registry_rule(config: &Configuration, facts: &EnvironmentFacts) -> Rule {
    if config.features.pending_reboot_check && facts.registry_reboot_pending {
        Rule::Fire(ScenarioKind::PendingRebootRegistry)
    } else {
        Rule::Skip
    }
}

fn service_rule(config: &Configuration, facts: &EnvironmentFacts) -> Rule {
    if config.features.pending_reboot_check && facts.service_reboot_pending {
        Rule::Fire(ScenarioKind::PendingRebootWmi)
    } else {
        Rule::Skip
    }
}

fn default_rule(config: &Configuration, _facts: &EnvironmentFacts) -> Rule {
    if config.features.no_reboot_scenario() {
        Rule::Fire(ScenarioKind::Default)
    } else {
        Rule::Skip
    }
}

fn recent_deadline_rule(config: &Configuration, facts: &EnvironmentFacts) -> Rule {
    if config.features.recent_deadline_check && facts.recent_or_upcoming_deadline_count > 0 {
        Rule::Fire(ScenarioKind::RecentDeadline)
    } else {
        Rule::Skip
    }
}

impl ResolvedScenario {
    /// 不发送的结果（按钮标志仍按配置计算）
    fn silent(config: &Configuration) -> Self {
        let snooze = config.snooze_button.enabled;
        Self {
            should_fire: false,
            scenario_kind: ScenarioKind::None,
            include_action_button: config.action_button.enabled || snooze,
            include_dismiss_button: config.dismiss_button.enabled || snooze,
            include_snooze_button: snooze,
            extra_blocks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextOption;
    use chrono::NaiveDate;

    fn facts() -> EnvironmentFacts {
        EnvironmentFacts::default()
    }

    fn upgrade_config(target: u32) -> Configuration {
        let mut config = Configuration::default();
        config.features.upgrade_os = true;
        config.target_build_number = Some(target);
        config
    }

    #[test]
    fn test_upgrade_os_fires_below_target() {
        let config = upgrade_config(18351);
        let resolved = resolve(&config, &EnvironmentFacts { running_build_number: 17763, ..facts() });
        assert!(resolved.should_fire);
        assert_eq!(resolved.scenario_kind, ScenarioKind::UpgradeOs);
        assert!(resolved.extra_blocks.is_empty());
    }

    #[test]
    fn test_upgrade_os_suppressed_at_target() {
        let mut config = upgrade_config(18351);
        config.features.recent_deadline_check = true;
        let resolved = resolve(
            &config,
            &EnvironmentFacts {
                running_build_number: 18351,
                recent_or_upcoming_deadline_count: 3,
                ..facts()
            },
        );
        assert!(!resolved.should_fire);
        assert_eq!(resolved.scenario_kind, ScenarioKind::None);
    }

    #[test]
    fn test_upgrade_os_includes_deadline_block() {
        let deadline = NaiveDate::from_ymd_opt(2019, 9, 30).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let mut config = upgrade_config(18351);
        config.deadline = TextOption { enabled: true, value: Some(deadline) };
        let resolved = resolve(&config, &EnvironmentFacts { running_build_number: 17763, ..facts() });
        assert_eq!(resolved.extra_blocks, vec![ExtraBlock::Deadline(deadline)]);
    }

    #[test]
    fn test_uptime_exceeded() {
        let mut config = Configuration::default();
        config.features.pending_reboot_uptime = true;
        config.max_uptime_days = Some(5);
        config.pending_reboot_uptime_text = TextOption {
            enabled: true,
            value: Some("Please restart".to_string()),
        };

        let resolved = resolve(&config, &EnvironmentFacts { uptime_days: 10, ..facts() });
        assert_eq!(resolved.scenario_kind, ScenarioKind::PendingRebootUptime);
        assert_eq!(
            resolved.extra_blocks,
            vec![
                ExtraBlock::UptimeText("Please restart".to_string()),
                ExtraBlock::UptimeDays(10),
            ]
        );

        let resolved = resolve(&config, &EnvironmentFacts { uptime_days: 5, ..facts() });
        assert!(!resolved.should_fire);
    }

    #[test]
    fn test_registry_takes_precedence_over_service() {
        let mut config = Configuration::default();
        config.features.pending_reboot_check = true;
        let resolved = resolve(
            &config,
            &EnvironmentFacts {
                registry_reboot_pending: true,
                service_reboot_pending: true,
                ..facts()
            },
        );
        assert_eq!(resolved.scenario_kind, ScenarioKind::PendingRebootRegistry);
    }

    #[test]
    fn test_service_check_without_registry_flag() {
        let mut config = Configuration::default();
        config.features.pending_reboot_check = true;
        config.pending_reboot_check_text = TextOption {
            enabled: true,
            value: Some("Reason: pending reboot".to_string()),
        };
        let resolved = resolve(
            &config,
            &EnvironmentFacts {
                registry_reboot_pending: false,
                service_reboot_pending: true,
                ..facts()
            },
        );
        assert!(resolved.should_fire);
        assert_eq!(resolved.scenario_kind, ScenarioKind::PendingRebootWmi);
        assert_eq!(
            resolved.extra_blocks,
            vec![ExtraBlock::PendingRebootReason("Reason: pending reboot".to_string())]
        );
    }

    #[test]
    fn test_pending_reboot_check_nothing_pending() {
        let mut config = Configuration::default();
        config.features.pending_reboot_check = true;
        let resolved = resolve(&config, &facts());
        assert!(!resolved.should_fire);
        assert_eq!(resolved.scenario_kind, ScenarioKind::None);
    }

    #[test]
    fn test_default_when_no_feature_enabled() {
        let resolved = resolve(&Configuration::default(), &facts());
        assert!(resolved.should_fire);
        assert_eq!(resolved.scenario_kind, ScenarioKind::Default);
        assert!(resolved.extra_blocks.is_empty());
    }

    #[test]
    fn test_recent_deadline_after_unmatched_feature() {
        let mut config = Configuration::default();
        config.features.pending_reboot_check = true;
        config.features.recent_deadline_check = true;
        let resolved = resolve(
            &config,
            &EnvironmentFacts { recent_or_upcoming_deadline_count: 1, ..facts() },
        );
        assert_eq!(resolved.scenario_kind, ScenarioKind::RecentDeadline);
    }

    #[test]
    fn test_deadline_priority_ordering() {
        let mut config = Configuration::default();
        config.features.recent_deadline_check = true;
        let with_deadline = EnvironmentFacts { recent_or_upcoming_deadline_count: 2, ..facts() };

        assert_eq!(resolve(&config, &with_deadline).scenario_kind, ScenarioKind::Default);

        config.deadline_priority = DeadlinePriority::BeforeDefault;
        assert_eq!(resolve(&config, &with_deadline).scenario_kind, ScenarioKind::RecentDeadline);
        assert_eq!(resolve(&config, &facts()).scenario_kind, ScenarioKind::Default);
    }

    #[test]
    fn test_snooze_forces_action_and_dismiss() {
        let mut config = Configuration::default();
        config.action_button.enabled = false;
        config.dismiss_button.enabled = false;
        config.snooze_button.enabled = true;
        let resolved = resolve(&config, &facts());
        assert!(resolved.include_action_button);
        assert!(resolved.include_dismiss_button);
        assert!(resolved.include_snooze_button);
    }

    #[test]
    fn test_buttons_follow_flags_without_snooze() {
        let mut config = Configuration::default();
        config.action_button.enabled = false;
        config.dismiss_button.enabled = true;
        let resolved = resolve(&config, &facts());
        assert!(!resolved.include_action_button);
        assert!(resolved.include_dismiss_button);
        assert!(!resolved.include_snooze_button);
    }
}
