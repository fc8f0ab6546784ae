//! # Sentry Config
//!
//! 分层配置加载：配置文件、环境变量与命令行参数按优先级合并，
//! 最终绑定为类型化的设置对象。
//!
//! ## 核心组件
//!
//! - [`ConfigProvider`] - 配置提供者 trait
//! - [`ConfigurationBuilder`] / [`Configuration`] - 配置合并与读取
//! - [`TelegramSettings`] - 通知客户端的类型化设置
//!
//! 配置在启动时加载一次；必需设置缺失在绑定时刻就是致命错误。

pub mod provider;
pub mod providers;
pub mod settings;

pub use provider::*;
pub use providers::*;
pub use settings::*;
