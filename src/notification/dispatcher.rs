//! 通知分发器 - 一次完整的判定与展示流程
//!
//! validate → collect facts → resolve → assemble → render

use tracing::{info, warn};

use super::document::{assemble, NotificationDocument};
use super::presenter::Presenter;
use super::scenario::{resolve, ScenarioKind};
use crate::config::{validate, ConfigError, Configuration};
use crate::facts::{EnvironmentFacts, PredicateProvider};

/// 运行结果
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// 通知已展示
    Presented(ScenarioKind),
    /// 没有需要发送的通知
    Suppressed,
    /// 展示失败（已记录日志，不影响退出码）
    PresentFailed { scenario: ScenarioKind, error: String },
}

impl RunOutcome {
    pub fn is_presented(&self) -> bool {
        matches!(self, RunOutcome::Presented(_))
    }
}

/// 通知分发器
pub struct ToastDispatcher<'a> {
    presenter: &'a dyn Presenter,
}

impl<'a> ToastDispatcher<'a> {
    pub fn new(presenter: &'a dyn Presenter) -> Self {
        Self { presenter }
    }

    /// 只判定不展示，返回将要展示的文档
    pub fn preview(
        config: Configuration,
        provider: &dyn PredicateProvider,
    ) -> Result<Option<NotificationDocument>, ConfigError> {
        let config = validate(config)?;
        let facts = EnvironmentFacts::collect(provider, &config);
        let resolved = resolve(&config, &facts);
        Ok(resolved.should_fire.then(|| assemble(&config, &resolved)))
    }

    /// 执行一次完整流程
    pub fn run(
        &self,
        config: Configuration,
        provider: &dyn PredicateProvider,
    ) -> Result<RunOutcome, ConfigError> {
        let config = validate(config)?;
        let app = config.app_identity().ok_or(ConfigError::ZeroOrBothPresenters)?;

        let facts = EnvironmentFacts::collect(provider, &config);
        let resolved = resolve(&config, &facts);

        if !resolved.should_fire {
            info!(?facts, "No notification needed");
            return Ok(RunOutcome::Suppressed);
        }

        let scenario = resolved.scenario_kind;
        info!(%scenario, presenter = self.presenter.name(), "Presenting notification");
        let document = assemble(&config, &resolved);

        if let Err(e) = self.presenter.render(&document, app) {
            warn!(presenter = self.presenter.name(), error = %e, "Failed to present notification");
            return Ok(RunOutcome::PresentFailed {
                scenario,
                error: e.to_string(),
            });
        }

        if config.custom_audio.enabled {
            self.presenter.speak(&config.custom_audio.speech_text);
        }

        Ok(RunOutcome::Presented(scenario))
    }
}
