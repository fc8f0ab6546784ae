//! 类型分类器
//!
//! 候选组件在宏展开时已经保证是具体、非泛型的结构体；分类器负责
//! 生命周期标记的判定。分类是纯函数，没有隐藏状态。

use crate::descriptor::{CandidateComponent, TypeDescriptor};
use sentry_common::{ClassificationError, Lifetime};
use tracing::debug;

/// 类型分类器
#[derive(Debug, Default)]
pub struct TypeClassifier;

impl TypeClassifier {
    /// 创建新的类型分类器
    pub fn new() -> Self {
        Self
    }

    /// 对候选组件进行分类
    ///
    /// - 禁用的候选与未声明任何生命周期标记的类型被排除（`Ok(None)`），
    ///   这不是错误：不是每个类型都需要成为注册的服务。
    /// - 声明多个不同标记的类型产生显式的分类错误，而不是未定义的优先级。
    /// - 标记唯一但接口集合为空的类型仍产生描述符（惰性描述符），
    ///   注册阶段不会为它产生任何绑定。
    pub fn classify(
        &self,
        candidate: &CandidateComponent,
    ) -> Result<Option<TypeDescriptor>, ClassificationError> {
        if !candidate.enabled {
            debug!("跳过禁用组件: {}", candidate.type_info);
            return Ok(None);
        }

        let mut distinct: Vec<Lifetime> = Vec::new();
        for marker in &candidate.markers {
            if !distinct.contains(marker) {
                distinct.push(*marker);
            }
        }

        match distinct.as_slice() {
            [] => {
                debug!("类型 {} 未声明生命周期标记，跳过注册", candidate.type_info);
                Ok(None)
            }
            [lifetime] => {
                if candidate.bindings.is_empty() {
                    debug!("类型 {} 没有可注册接口", candidate.type_info);
                }
                Ok(Some(TypeDescriptor {
                    type_info: candidate.type_info.clone(),
                    lifetime: *lifetime,
                    construct: candidate.construct.clone(),
                    registrations: candidate.bindings.clone(),
                }))
            }
            _ => Err(ClassificationError::AmbiguousLifetime {
                type_name: candidate.type_info.full_name.clone(),
                markers: distinct.iter().map(Lifetime::to_string).collect(),
            }),
        }
    }
}
