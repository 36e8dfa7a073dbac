//! 配置模型 - 通知的所有可调选项
//!
//! `Configuration` 只在加载时构建一次，之后只读。
//! 加载见 [`loader`]，一致性校验见 [`validator`]。

pub mod loader;
pub mod validator;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::notification::style::ScenarioStyle;

pub use loader::{default_config_path, load_config, parse_config, render_default_config};
pub use validator::{validate, ConfigError, Toggle};

/// 功能开关
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    /// 运行的系统版本低于目标版本时提醒升级
    pub upgrade_os: bool,
    /// 开机时间超过阈值时提醒重启
    pub pending_reboot_uptime: bool,
    /// 检测到挂起的重启时提醒
    pub pending_reboot_check: bool,
    /// 24 小时内存在更新截止时间时提醒
    pub recent_deadline_check: bool,
}

impl Features {
    /// 三个以重启为目的的场景是否全部关闭
    pub fn no_reboot_scenario(&self) -> bool {
        !self.upgrade_os && !self.pending_reboot_uptime && !self.pending_reboot_check
    }
}

/// 带开关的附加文本选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOption<T> {
    pub enabled: bool,
    pub value: Option<T>,
}

impl<T> TextOption<T> {
    pub fn disabled() -> Self {
        Self { enabled: false, value: None }
    }

    /// 仅在开启且有值时返回
    pub fn active(&self) -> Option<&T> {
        if self.enabled {
            self.value.as_ref()
        } else {
            None
        }
    }
}

impl<T> Default for TextOption<T> {
    fn default() -> Self {
        Self::disabled()
    }
}

/// 由哪个应用身份展示通知
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppIdentity {
    SoftwareCenter,
    PowerShellHost,
}

impl AppIdentity {
    /// 展示给用户的应用名
    pub fn display_name(&self) -> &'static str {
        match self {
            AppIdentity::SoftwareCenter => "Software Center",
            AppIdentity::PowerShellHost => "Windows PowerShell",
        }
    }
}

impl std::fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// 配置文件中的两个应用身份开关（原样保留，由校验器保证恰好一个）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenterSelection {
    pub software_center: bool,
    pub powershell: bool,
}

impl PresenterSelection {
    /// 恰好选中一个时返回对应身份
    pub fn app_identity(&self) -> Option<AppIdentity> {
        match (self.software_center, self.powershell) {
            (true, false) => Some(AppIdentity::SoftwareCenter),
            (false, true) => Some(AppIdentity::PowerShellHost),
            _ => None,
        }
    }
}

impl Default for PresenterSelection {
    fn default() -> Self {
        Self {
            software_center: false,
            powershell: true,
        }
    }
}

/// 按钮配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub enabled: bool,
    pub label: String,
}

impl Button {
    pub fn new(enabled: bool, label: impl Into<String>) -> Self {
        Self {
            enabled,
            label: label.into(),
        }
    }
}

/// 必填的显示文本
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFields {
    pub attribution: String,
    pub header: String,
    pub title: String,
    pub body1: String,
    pub body2: String,
    /// 贪睡选择框上方的提示
    pub snooze_prompt: String,
    /// 截止时间块的标题
    pub deadline_label: String,
}

impl Default for TextFields {
    fn default() -> Self {
        Self {
            attribution: "www.imab.dk".to_string(),
            header: "Helpdesk kindly reminds you...".to_string(),
            title: "New feature update available".to_string(),
            body1: "A new feature update is available for your computer.".to_string(),
            body2: "Please install the update at your earliest convenience.".to_string(),
            snooze_prompt: "Click snooze to be reminded again in:".to_string(),
            deadline_label: "Your deadline is:".to_string(),
        }
    }
}

/// 自定义语音
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAudio {
    pub enabled: bool,
    pub speech_text: String,
}

/// 图片引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Images {
    pub logo: String,
    pub hero: String,
}

impl Default for Images {
    fn default() -> Self {
        Self {
            logo: "ToastLogoImage.jpg".to_string(),
            hero: "ToastHeroImage.jpg".to_string(),
        }
    }
}

/// RecentDeadline 规则相对 Default 规则的位置
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadlinePriority {
    /// 功能全关时 Default 优先
    #[default]
    AfterDefault,
    /// 先检查截止时间，再回落到 Default
    BeforeDefault,
}

/// 系统探测需要的输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// 更新截止时间列表（JSON 时间戳数组）
    pub deadlines_file: Option<PathBuf>,
    /// 非 Windows 平台上表示需要重启的标记文件
    pub reboot_marker_files: Vec<PathBuf>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            deadlines_file: None,
            reboot_marker_files: vec![
                PathBuf::from("/var/run/reboot-required"),
                PathBuf::from("/run/reboot-required"),
            ],
        }
    }
}

/// 完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub toast_enabled: bool,
    pub features: Features,
    pub target_build_number: Option<u32>,
    pub max_uptime_days: Option<i64>,
    pub deadline: TextOption<NaiveDateTime>,
    pub pending_reboot_check_text: TextOption<String>,
    pub pending_reboot_uptime_text: TextOption<String>,
    pub presenter: PresenterSelection,
    pub action_button: Button,
    /// 点击动作按钮时打开的目标
    pub action_target: String,
    pub dismiss_button: Button,
    pub snooze_button: Button,
    pub scenario_style: ScenarioStyle,
    pub texts: TextFields,
    pub custom_audio: CustomAudio,
    pub images: Images,
    pub deadline_priority: DeadlinePriority,
    pub probe: ProbeSettings,
}

impl Configuration {
    /// 校验通过后恰好为 `Some`
    pub fn app_identity(&self) -> Option<AppIdentity> {
        self.presenter.app_identity()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            toast_enabled: true,
            features: Features::default(),
            target_build_number: None,
            max_uptime_days: None,
            deadline: TextOption::disabled(),
            pending_reboot_check_text: TextOption::disabled(),
            pending_reboot_uptime_text: TextOption::disabled(),
            presenter: PresenterSelection::default(),
            action_button: Button::new(true, "Install now"),
            action_target: "ms-settings:windowsupdate".to_string(),
            dismiss_button: Button::new(true, "Later"),
            snooze_button: Button::new(false, "Snooze"),
            scenario_style: ScenarioStyle::Reminder,
            texts: TextFields::default(),
            custom_audio: CustomAudio::default(),
            images: Images::default(),
            deadline_priority: DeadlinePriority::default(),
            probe: ProbeSettings::default(),
        }
    }
}
