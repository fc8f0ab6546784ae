//! # Sentry App
//!
//! 进程入口编排：初始化日志，加载配置，执行一次发现-分类-注册，
//! 解析通知能力并发送一条消息。

pub mod startup;

pub use startup::*;
