//! 通知能力契约

use async_trait::async_trait;
use thiserror::Error;

/// 通知发送错误类型
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("组合的通知地址无效: {url}, 原因: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("通知传输失败: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },
}

/// 通知能力
///
/// 传输失败不在内部捕获，原样向调用方传播；没有重试。
#[async_trait]
pub trait Notificator: Send + Sync {
    /// 发送一条通知消息
    async fn send_message(&self, message: &str) -> Result<(), NotifyError>;
}
