//! # Sentry Macros
//!
//! 这个 crate 提供组件自动注册的过程宏。
//!
//! ## 核心宏
//!
//! - [`macro@component`] - 组件声明宏：实现生命周期标记并在程序初始化时
//!   把候选记录提交到全局模块注册表
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use sentry_macros::component;
//!
//! #[component(scoped, provides(Notificator))]
//! #[derive(Debug)]
//! pub struct TelegramNotificator {
//!     settings: Arc<TelegramSettings>,
//! }
//! ```

use proc_macro::TokenStream;

mod component;

/// 组件声明宏
///
/// 为结构体实现 `Component` 与对应的生命周期标记 trait，并生成一个
/// `ctor` 初始化函数，在进入 `main` 之前把该类型的候选记录提交到
/// 全局模块注册表。结构体必须实现 `sentry_di::Injectable`。
///
/// # 参数
///
/// - `singleton` / `scoped` / `transient` - 生命周期标记（默认 `singleton`，
///   最多声明一个，声明多个是编译错误）
/// - `provides(TraitA, TraitB)` - 组件暴露的接口集合（标记 trait 本身
///   永远不会被注册）
/// - `name = "custom_name"` - 自定义组件名称
/// - `priority = N` - 组件优先级（默认 0）
/// - `disabled` - 声明组件但不参与注册
///
/// 泛型结构体不支持，会产生编译错误。
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::component_impl(args, input)
}
