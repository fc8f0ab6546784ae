//! 模块扫描器
//!
//! 枚举注册表中名称匹配的模块并尝试加载。单个模块加载失败不会中止
//! 扫描：失败被记录到错误流和发现报告中，其余模块继续处理。

use crate::descriptor::CandidateComponent;
use crate::registry::ModuleRegistry;
use sentry_common::DiscoveryError;
use tracing::{debug, error, info};

/// 已加载模块
#[derive(Debug)]
pub struct LoadedModule {
    /// 模块名称
    pub name: String,
    /// 模块提供的候选组件
    pub candidates: Vec<CandidateComponent>,
}

/// 模块加载失败记录
#[derive(Debug)]
pub struct ModuleFailure {
    /// 模块名称
    pub name: String,
    /// 失败原因
    pub error: DiscoveryError,
}

/// 发现报告
///
/// 没有任何模块匹配时报告为空，这不是错误；注册阶段随后不产生任何
/// 绑定，通知能力的缺失会在解析时刻暴露。
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// 成功加载的模块
    pub modules: Vec<LoadedModule>,
    /// 加载失败的模块
    pub failures: Vec<ModuleFailure>,
}

impl DiscoveryReport {
    /// 展开所有已加载模块的候选组件
    ///
    /// 结果按完整限定类型名排序，与模块加载顺序无关，
    /// 保证注册顺序在多次运行间可复现。
    pub fn extract_types(&self) -> Vec<CandidateComponent> {
        let mut types: Vec<CandidateComponent> = self
            .modules
            .iter()
            .flat_map(|module| module.candidates.iter().cloned())
            .collect();
        types.sort_by(|a, b| a.type_info.full_name.cmp(&b.type_info.full_name));
        types
    }
}

/// 模块扫描器
#[derive(Debug, Default)]
pub struct ModuleScanner;

impl ModuleScanner {
    /// 创建新的模块扫描器
    pub fn new() -> Self {
        Self
    }

    /// 发现名称匹配谓词的模块并尝试加载
    pub fn discover<P>(&self, registry: &ModuleRegistry, predicate: P) -> DiscoveryReport
    where
        P: Fn(&str) -> bool,
    {
        let mut report = DiscoveryReport::default();

        for descriptor in registry.snapshot() {
            if !predicate(&descriptor.name) {
                debug!("模块 {} 不匹配名称谓词，跳过", descriptor.name);
                continue;
            }

            match (descriptor.loader)() {
                Ok(candidates) => {
                    debug!(
                        "模块 {} 加载完成，提取 {} 个候选组件",
                        descriptor.name,
                        candidates.len()
                    );
                    report.modules.push(LoadedModule {
                        name: descriptor.name,
                        candidates,
                    });
                }
                Err(err) => {
                    error!("模块 {} 加载失败: {}", descriptor.name, err);
                    report.failures.push(ModuleFailure {
                        name: descriptor.name,
                        error: err,
                    });
                }
            }
        }

        info!(
            "模块扫描完成: {} 个已加载, {} 个失败",
            report.modules.len(),
            report.failures.len()
        );
        report
    }
}

/// 大小写不敏感的子串匹配谓词
pub fn name_contains(token: impl Into<String>) -> impl Fn(&str) -> bool {
    let token = token.into().to_lowercase();
    move |name: &str| name.to_lowercase().contains(&token)
}
