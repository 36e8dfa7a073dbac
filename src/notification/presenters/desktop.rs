//! 桌面通知渠道（notify-rust）

use notify_rust::{Notification, Timeout};
use tracing::{debug, info};

use crate::config::AppIdentity;
use crate::notification::document::{NotificationDocument, ToastAction};
use crate::notification::presenter::{PresentError, Presenter};
use crate::notification::speech;
use crate::notification::style::ScenarioStyle;

/// Long 样式的显示时长
const LONG_TIMEOUT_MS: u32 = 25_000;

/// 系统通知中心渠道
pub struct DesktopPresenter;

impl DesktopPresenter {
    pub fn new() -> Self {
        Self
    }

    fn timeout(style: ScenarioStyle) -> Timeout {
        match style {
            ScenarioStyle::Reminder => Timeout::Never,
            ScenarioStyle::Long => Timeout::Milliseconds(LONG_TIMEOUT_MS),
            ScenarioStyle::Short => Timeout::Default,
        }
    }

    fn action_id(action: &ToastAction) -> &'static str {
        match action {
            ToastAction::Action { .. } => "action",
            ToastAction::Snooze { .. } => "snooze",
            ToastAction::Dismiss { .. } => "dismiss",
        }
    }
}

impl Default for DesktopPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for DesktopPresenter {
    fn name(&self) -> &str {
        "desktop"
    }

    fn render(&self, document: &NotificationDocument, app: AppIdentity) -> Result<(), PresentError> {
        let mut notification = Notification::new();
        notification
            .appname(app.display_name())
            .summary(document.title())
            .body(&document.body_text())
            .icon(&document.logo_image)
            .timeout(Self::timeout(document.style));

        for action in &document.actions {
            notification.action(Self::action_id(action), action.label());
        }

        debug!(
            header = %document.header,
            attribution = %document.attribution,
            hero = %document.hero_image,
            "Rendering desktop notification"
        );

        notification
            .show()
            .map_err(|e| PresentError::Unavailable(e.to_string()))?;

        info!(scenario = %document.scenario, app = %app, "Notification shown");
        Ok(())
    }

    fn speak(&self, text: &str) {
        speech::speak(text);
    }
}
