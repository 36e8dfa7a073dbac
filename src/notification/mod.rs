//! 通知核心 - 场景判定、文档组装与展示
//!
//! # 流程
//! 1. `config::validate` 校验配置
//! 2. `EnvironmentFacts::collect` 按需探测主机状态
//! 3. `scenario::resolve` 选出唯一的场景
//! 4. `document::assemble` 组装通知文档
//! 5. `Presenter::render` 展示
//!
//! # 使用示例
//! ```ignore
//! use toast_notifier::notification::{ToastDispatcher, presenters::DesktopPresenter};
//!
//! let presenter = DesktopPresenter::new();
//! let outcome = ToastDispatcher::new(&presenter).run(config, &probe)?;
//! ```

pub mod dispatcher;
pub mod document;
pub mod presenter;
pub mod presenters;
pub mod scenario;
pub mod speech;
pub mod style;

pub use dispatcher::{RunOutcome, ToastDispatcher};
pub use document::{assemble, NotificationDocument, SnoozeOption, TextBlock, ToastAction};
pub use presenter::{PresentError, Presenter};
pub use scenario::{resolve, ExtraBlock, ResolvedScenario, ScenarioKind};
pub use style::ScenarioStyle;
