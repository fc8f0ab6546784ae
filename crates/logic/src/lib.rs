//! # Sentry Logic
//!
//! 通知能力契约与 Telegram 通知客户端。
//!
//! ## 核心组件
//!
//! - [`Notificator`] - 通知能力契约
//! - [`TelegramNotificator`] - 通过 Telegram Bot API 发送消息的实现

pub mod contract;
pub mod telegram;

pub use contract::*;
pub use telegram::*;
