//! 启动编排
//!
//! 发现与注册在任何组件被解析之前同步执行完毕，每个进程只执行一次。
//! 任何致命条件都以错误的形式传播到 `main`，由进程边界映射为非零退出码。

use anyhow::Context;
use chrono::Local;
use sentry_config::{load_settings, TelegramSettings};
use sentry_di::{
    name_contains, ModuleRegistry, ModuleScanner, Registrar, ServiceCollection, ServiceProvider,
    TypeClassifier,
};
use sentry_logic::Notificator;
use std::sync::Arc;
use tracing::info;

/// 应用自身模块的名称匹配令牌
const MODULE_NAME_TOKEN: &str = "sentry";

/// 消息时间戳格式
const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// 启动编排器
#[derive(Debug, Default)]
pub struct Startup;

impl Startup {
    /// 创建新的启动编排器
    pub fn new() -> Self {
        Self
    }

    /// 初始化并运行
    ///
    /// 成功时恰好发送一条带时间戳与问候语的消息。
    pub async fn init_and_run(&self, args: &[String]) -> anyhow::Result<()> {
        let settings = load_settings(args).context("加载配置失败")?;
        let greeting = settings.greeting.clone();

        let provider = self.build_provider(settings)?;
        let scope = provider.create_scope();

        let notificator = scope
            .resolve::<dyn Notificator>()
            .context("解析通知能力失败")?;

        let message = format!("[{}] {}", Local::now().format(TIMESTAMP_FORMAT), greeting);
        notificator
            .send_message(&message)
            .await
            .context("发送通知失败")?;

        Ok(())
    }

    /// 扫描、分类并注册全部组件，构建服务提供者
    fn build_provider(&self, settings: TelegramSettings) -> anyhow::Result<Arc<ServiceProvider>> {
        let mut services = ServiceCollection::new();
        services.register_instance(Arc::new(settings));

        let report =
            ModuleScanner::new().discover(ModuleRegistry::global(), name_contains(MODULE_NAME_TOKEN));

        let classifier = TypeClassifier::new();
        let registrar = Registrar::new();
        for candidate in report.extract_types() {
            if let Some(descriptor) = classifier.classify(&candidate)? {
                registrar.register(&descriptor, &mut services);
            }
        }

        info!("组件注册完成，共 {} 项", services.len());
        Ok(services.build_provider())
    }
}

/// 初始化日志输出
///
/// 级别来自 `RUST_LOG`，默认 `info`。重复初始化时忽略错误，
/// 测试可以多次调用。
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
