//! 组件基础接口定义
//!
//! 提供所有可注册组件必须实现的基础 trait

use std::any::TypeId;
use std::fmt::Debug;

/// 组件基础 trait
///
/// 所有通过自动注册引擎注册的组件都实现此 trait（通常由
/// `#[component]` 宏生成实现）。
pub trait Component: Send + Sync + Debug + 'static {
    /// 组件名称
    fn name(&self) -> &'static str;

    /// 组件优先级，数值越高优先级越高
    fn priority(&self) -> i32 {
        0
    }

    /// 组件是否启用
    fn is_enabled(&self) -> bool {
        true
    }

    /// 组件类型ID
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}
