//! TGSentry 进程入口
//!
//! 没有子命令；命令行参数作为配置覆盖传入。失败时进程以非零状态退出，
//! 原因写入错误流。

use sentry_app::{init_logging, Startup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    Startup::new().init_and_run(&args).await
}
