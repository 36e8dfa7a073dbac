//! 展示接口定义

use thiserror::Error;

use super::document::NotificationDocument;
use crate::config::AppIdentity;

/// 展示失败
#[derive(Debug, Error)]
pub enum PresentError {
    /// 系统通知服务不可用
    #[error("notification service unavailable: {0}")]
    Unavailable(String),

    /// 通知服务拒绝了这条通知
    #[error("notification rejected: {0}")]
    Rejected(String),

    #[error("failed to write notification: {0}")]
    Io(#[from] std::io::Error),
}

/// 展示渠道 trait
pub trait Presenter {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 渲染通知
    fn render(&self, document: &NotificationDocument, app: AppIdentity) -> Result<(), PresentError>;

    /// 朗读文本，尽力而为，失败只记录日志
    fn speak(&self, text: &str);
}
