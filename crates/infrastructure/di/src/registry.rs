//! 模块注册表
//!
//! 模块是属于应用自身的可加载代码单元。注册表有两类来源：
//! `#[component]` 宏生成的 `ctor` 函数在进入 `main` 之前提交的候选组件
//! （按提交者的 crate 名称分组，这类模块总是加载成功），以及显式注册的
//! 可失败模块加载器（宿主与测试使用）。

use crate::descriptor::CandidateComponent;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use sentry_common::DiscoveryError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 模块加载函数
pub type ModuleLoader =
    Arc<dyn Fn() -> Result<Vec<CandidateComponent>, DiscoveryError> + Send + Sync>;

/// 模块描述符
///
/// 标识一个可加载单元。发现阶段每个进程启动只物化一次；
/// 加载失败的模块会被记录并丢弃，不会中止扫描。
#[derive(Clone)]
pub struct ModuleDescriptor {
    /// 模块名称
    pub name: String,
    /// 模块加载函数
    pub loader: ModuleLoader,
}

impl ModuleDescriptor {
    /// 创建新的模块描述符
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<Vec<CandidateComponent>, DiscoveryError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            loader: Arc::new(loader),
        }
    }
}

impl std::fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("name", &self.name)
            .field("loader", &"<function>")
            .finish()
    }
}

/// 进程级全局模块注册表
static GLOBAL_MODULE_REGISTRY: Lazy<ModuleRegistry> = Lazy::new(ModuleRegistry::new);

/// 模块注册表
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    /// ctor 提交的候选组件，按模块名分组
    candidates: RwLock<BTreeMap<String, Vec<CandidateComponent>>>,
    /// 显式注册的模块加载器
    modules: RwLock<Vec<ModuleDescriptor>>,
}

impl ModuleRegistry {
    /// 创建新的模块注册表（测试与宿主使用；生产代码使用 [`ModuleRegistry::global`]）
    pub fn new() -> Self {
        Self {
            candidates: RwLock::new(BTreeMap::new()),
            modules: RwLock::new(Vec::new()),
        }
    }

    /// 获取全局模块注册表
    pub fn global() -> &'static ModuleRegistry {
        &GLOBAL_MODULE_REGISTRY
    }

    /// 提交一个候选组件（由 `#[component]` 宏生成的 `ctor` 函数调用）
    pub fn submit_candidate(&self, candidate: CandidateComponent) {
        self.candidates
            .write()
            .entry(candidate.module.to_string())
            .or_default()
            .push(candidate);
    }

    /// 注册一个显式模块加载器
    pub fn register_module(&self, descriptor: ModuleDescriptor) {
        self.modules.write().push(descriptor);
    }

    /// 当前注册表的模块描述符快照
    ///
    /// 候选分组被包装为总是成功的加载器；显式模块保持各自的加载语义。
    pub fn snapshot(&self) -> Vec<ModuleDescriptor> {
        let mut snapshot: Vec<ModuleDescriptor> = self
            .candidates
            .read()
            .iter()
            .map(|(name, candidates)| {
                let loaded = candidates.clone();
                ModuleDescriptor::new(name.clone(), move || Ok(loaded.clone()))
            })
            .collect();
        snapshot.extend(self.modules.read().iter().cloned());
        snapshot
    }
}
