//! # Dependency Injection
//!
//! 基于能力标记的组件自动注册引擎：发现、分类、注册与解析。
//!
//! ## 核心组件
//!
//! - [`ModuleRegistry`] - 进程级模块注册表（启动前由 `ctor` 函数填充）
//! - [`ModuleScanner`] - 模块扫描器
//! - [`TypeClassifier`] - 类型分类器
//! - [`Registrar`] - 注册器
//! - [`ServiceCollection`] / [`ServiceProvider`] / [`ServiceScope`] - 依赖解析容器
//!
//! ## 控制流
//!
//! 扫描器 → 分类器 → 注册器在启动时填充容器，执行一次；
//! 之后入口点创建作用域并解析所需能力。

pub mod classifier;
pub mod container;
pub mod descriptor;
pub mod registrar;
pub mod registry;
pub mod scanner;

pub use classifier::*;
pub use container::*;
pub use descriptor::*;
pub use registrar::*;
pub use registry::*;
pub use scanner::*;
