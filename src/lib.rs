//! Toast Notifier - 按配置生成桌面提醒通知
//!
//! 根据配置文件和主机状态（挂起的重启、开机时长、系统版本、更新截止时间）
//! 决定是否展示通知以及展示哪种通知。

pub mod cli;
pub mod config;
pub mod facts;
pub mod notification;

pub use config::{load_config, validate, AppIdentity, ConfigError, Configuration};
pub use facts::{EnvironmentFacts, PredicateProvider, SystemProbe};
pub use notification::{
    assemble, resolve, NotificationDocument, PresentError, Presenter, ResolvedScenario,
    RunOutcome, ScenarioKind, ToastDispatcher,
};
