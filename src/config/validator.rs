//! 配置校验 - 互斥与完整性规则
//!
//! Rules run in a fixed order and the first violation is reported.

use thiserror::Error;

use super::Configuration;

/// 可以互相冲突的开关
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    UpgradeOs,
    PendingRebootUptime,
    PendingRebootCheck,
    PendingRebootUptimeText,
    PendingRebootCheckText,
}

impl Toggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Toggle::UpgradeOs => "UpgradeOS",
            Toggle::PendingRebootUptime => "PendingRebootUptime",
            Toggle::PendingRebootCheck => "PendingRebootCheck",
            Toggle::PendingRebootUptimeText => "PendingRebootUptimeText",
            Toggle::PendingRebootCheckText => "PendingRebootCheckText",
        }
    }
}

impl std::fmt::Display for Toggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 总开关关闭，调用方应当直接退出
    #[error("toast notifications are disabled in the config")]
    Disabled,

    #[error("features {0} and {1} cannot both be enabled")]
    ConflictingFeatures(Toggle, Toggle),

    #[error("exactly one of UseSoftwareCenterApp and UsePowershellApp must be enabled")]
    ZeroOrBothPresenters,

    #[error("{0} cannot be enabled together with {1}")]
    ConflictingTextOption(Toggle, Toggle),

    #[error("{0} does not belong to the enabled feature {1}")]
    MismatchedTextOption(Toggle, Toggle),

    #[error("{0} is enabled but its required value is missing")]
    MissingValue(&'static str),
}

impl ConfigError {
    /// `Disabled` 是正常的空操作，其余才是配置错误
    pub fn is_disabled(&self) -> bool {
        matches!(self, ConfigError::Disabled)
    }
}

/// 校验配置，返回通过的配置或第一个违反的规则
pub fn validate(config: Configuration) -> Result<Configuration, ConfigError> {
    if !config.toast_enabled {
        return Err(ConfigError::Disabled);
    }

    let features = &config.features;
    let exclusive = [
        (Toggle::UpgradeOs, features.upgrade_os),
        (Toggle::PendingRebootCheck, features.pending_reboot_check),
        (Toggle::PendingRebootUptime, features.pending_reboot_uptime),
    ];
    for (i, (a, a_on)) in exclusive.iter().enumerate() {
        for (b, b_on) in &exclusive[i + 1..] {
            if *a_on && *b_on {
                return Err(ConfigError::ConflictingFeatures(*a, *b));
            }
        }
    }

    if config.presenter.app_identity().is_none() {
        return Err(ConfigError::ZeroOrBothPresenters);
    }

    let uptime_text = config.pending_reboot_uptime_text.enabled;
    let check_text = config.pending_reboot_check_text.enabled;

    if features.upgrade_os {
        if uptime_text {
            return Err(ConfigError::ConflictingTextOption(
                Toggle::UpgradeOs,
                Toggle::PendingRebootUptimeText,
            ));
        }
        if check_text {
            return Err(ConfigError::ConflictingTextOption(
                Toggle::UpgradeOs,
                Toggle::PendingRebootCheckText,
            ));
        }
    }

    if uptime_text && check_text {
        return Err(ConfigError::ConflictingTextOption(
            Toggle::PendingRebootUptimeText,
            Toggle::PendingRebootCheckText,
        ));
    }

    if features.pending_reboot_check && uptime_text {
        return Err(ConfigError::MismatchedTextOption(
            Toggle::PendingRebootUptimeText,
            Toggle::PendingRebootCheck,
        ));
    }
    if features.pending_reboot_uptime && check_text {
        return Err(ConfigError::MismatchedTextOption(
            Toggle::PendingRebootCheckText,
            Toggle::PendingRebootUptime,
        ));
    }

    if features.upgrade_os && config.target_build_number.is_none() {
        return Err(ConfigError::MissingValue("TargetOS"));
    }
    if features.pending_reboot_uptime && config.max_uptime_days.is_none() {
        return Err(ConfigError::MissingValue("MaxUptimeDays"));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PresenterSelection, TextOption};

    fn base() -> Configuration {
        Configuration::default()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(base()).is_ok());
    }

    #[test]
    fn test_disabled_wins_over_everything() {
        let mut config = base();
        config.toast_enabled = false;
        config.features.upgrade_os = true;
        config.features.pending_reboot_check = true;
        config.presenter = PresenterSelection { software_center: false, powershell: false };
        let err = validate(config).unwrap_err();
        assert_eq!(err, ConfigError::Disabled);
        assert!(err.is_disabled());
    }

    #[test]
    fn test_conflicting_feature_pairs() {
        let cases = [
            ((true, true, false), (Toggle::UpgradeOs, Toggle::PendingRebootCheck)),
            ((true, false, true), (Toggle::UpgradeOs, Toggle::PendingRebootUptime)),
            ((false, true, true), (Toggle::PendingRebootCheck, Toggle::PendingRebootUptime)),
            ((true, true, true), (Toggle::UpgradeOs, Toggle::PendingRebootCheck)),
        ];
        for ((upgrade, check, uptime), (a, b)) in cases {
            let mut config = base();
            config.features.upgrade_os = upgrade;
            config.features.pending_reboot_check = check;
            config.features.pending_reboot_uptime = uptime;
            assert_eq!(
                validate(config).unwrap_err(),
                ConfigError::ConflictingFeatures(a, b),
                "upgrade={} check={} uptime={}",
                upgrade,
                check,
                uptime
            );
        }
    }

    #[test]
    fn test_presenter_zero_or_both() {
        for (sc, ps) in [(false, false), (true, true)] {
            let mut config = base();
            config.presenter = PresenterSelection { software_center: sc, powershell: ps };
            assert_eq!(validate(config).unwrap_err(), ConfigError::ZeroOrBothPresenters);
        }
    }

    #[test]
    fn test_upgrade_os_rejects_reboot_texts() {
        let mut config = base();
        config.features.upgrade_os = true;
        config.target_build_number = Some(18351);
        config.pending_reboot_check_text = TextOption { enabled: true, value: Some("x".into()) };
        assert_eq!(
            validate(config).unwrap_err(),
            ConfigError::ConflictingTextOption(Toggle::UpgradeOs, Toggle::PendingRebootCheckText)
        );
    }

    #[test]
    fn test_both_reboot_texts_conflict() {
        let mut config = base();
        config.pending_reboot_check_text.enabled = true;
        config.pending_reboot_uptime_text.enabled = true;
        assert_eq!(
            validate(config).unwrap_err(),
            ConfigError::ConflictingTextOption(
                Toggle::PendingRebootUptimeText,
                Toggle::PendingRebootCheckText
            )
        );
    }

    #[test]
    fn test_mismatched_text_options() {
        let mut config = base();
        config.features.pending_reboot_check = true;
        config.pending_reboot_uptime_text.enabled = true;
        assert_eq!(
            validate(config).unwrap_err(),
            ConfigError::MismatchedTextOption(
                Toggle::PendingRebootUptimeText,
                Toggle::PendingRebootCheck
            )
        );

        let mut config = base();
        config.features.pending_reboot_uptime = true;
        config.max_uptime_days = Some(5);
        config.pending_reboot_check_text.enabled = true;
        assert_eq!(
            validate(config).unwrap_err(),
            ConfigError::MismatchedTextOption(
                Toggle::PendingRebootCheckText,
                Toggle::PendingRebootUptime
            )
        );
    }

    #[test]
    fn test_missing_threshold_values() {
        let mut config = base();
        config.features.upgrade_os = true;
        assert_eq!(validate(config).unwrap_err(), ConfigError::MissingValue("TargetOS"));

        let mut config = base();
        config.features.pending_reboot_uptime = true;
        assert_eq!(validate(config).unwrap_err(), ConfigError::MissingValue("MaxUptimeDays"));
    }

    #[test]
    fn test_matching_text_option_is_accepted() {
        let mut config = base();
        config.features.pending_reboot_uptime = true;
        config.max_uptime_days = Some(7);
        config.pending_reboot_uptime_text = TextOption { enabled: true, value: Some("Restart".into()) };
        assert!(validate(config).is_ok());
    }

    #[test]
    fn test_error_messages_name_the_pair() {
        let err = ConfigError::ConflictingFeatures(Toggle::UpgradeOs, Toggle::PendingRebootCheck);
        assert_eq!(
            err.to_string(),
            "features UpgradeOS and PendingRebootCheck cannot both be enabled"
        );
    }
}
