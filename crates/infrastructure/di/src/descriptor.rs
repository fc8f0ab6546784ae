//! 候选组件与类型描述符模型
//!
//! 候选组件是发现阶段的原始记录；类型描述符是分类阶段的产物，
//! 只在注册过程中存活。

use crate::container::ServiceScope;
use sentry_common::{DependencyError, Lifetime, TypeInfo};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// 共享的具体组件实例
pub type SharedInstance = Arc<dyn Any + Send + Sync>;

/// 已适配为某个接口视图的服务实例（内部为 `Arc<I>`）
pub type SharedService = Box<dyn Any + Send + Sync>;

/// 组件实例构建函数
pub type InstanceFactory =
    Arc<dyn Fn(&ServiceScope) -> Result<SharedInstance, DependencyError> + Send + Sync>;

/// 接口适配函数，把具体实例转换为接口视图
pub type ServiceAdapter =
    Arc<dyn Fn(SharedInstance) -> Result<SharedService, DependencyError> + Send + Sync>;

/// 接口类型键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
    /// 接口类型ID
    pub id: TypeId,
    /// 接口类型名称
    pub name: &'static str,
}

impl TypeKey {
    /// 从接口类型（trait 对象或具体类型）创建类型键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

/// 接口绑定
///
/// 绑定列表由组件声明产生，生命周期标记本身永远不会出现在其中。
#[derive(Clone)]
pub struct InterfaceBinding {
    /// 被绑定的接口
    pub interface: TypeKey,
    /// 接口适配函数
    pub adapt: ServiceAdapter,
}

impl std::fmt::Debug for InterfaceBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceBinding")
            .field("interface", &self.interface)
            .field("adapt", &"<function>")
            .finish()
    }
}

/// 候选组件
///
/// 由 `#[component]` 宏在程序初始化时提交，或由宿主/测试手工构建。
#[derive(Clone)]
pub struct CandidateComponent {
    /// 类型元数据
    pub type_info: TypeInfo,
    /// 来源模块名称
    pub module: &'static str,
    /// 声明的生命周期标记（可能为零个或多个）
    pub markers: Vec<Lifetime>,
    /// 是否启用
    pub enabled: bool,
    /// 实例构建函数
    pub construct: InstanceFactory,
    /// 接口绑定列表
    pub bindings: Vec<InterfaceBinding>,
}

impl std::fmt::Debug for CandidateComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateComponent")
            .field("type_info", &self.type_info)
            .field("module", &self.module)
            .field("markers", &self.markers)
            .field("enabled", &self.enabled)
            .field("bindings", &self.bindings)
            .field("construct", &"<function>")
            .finish()
    }
}

/// 类型描述符
///
/// 分类结果：唯一的生命周期加上可注册的接口集合。不可变，
/// 只在注册过程中存活。
#[derive(Clone)]
pub struct TypeDescriptor {
    /// 类型元数据
    pub type_info: TypeInfo,
    /// 匹配到的生命周期
    pub lifetime: Lifetime,
    /// 实例构建函数
    pub construct: InstanceFactory,
    /// 可注册的接口绑定集合（可能为空，此时类型不产生任何注册）
    pub registrations: Vec<InterfaceBinding>,
}

impl std::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_info", &self.type_info)
            .field("lifetime", &self.lifetime)
            .field("registrations", &self.registrations)
            .field("construct", &"<function>")
            .finish()
    }
}

/// 可发现组件 trait
///
/// 由 `#[component]` 宏实现，产生该类型的候选记录。
pub trait Discoverable {
    /// 获取候选组件记录
    fn candidate() -> CandidateComponent;
}
