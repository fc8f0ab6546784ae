//! 类型元数据
//!
//! 提供组件类型的元数据信息

use std::any::TypeId;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 简短类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整限定名称（含模块路径）
    pub full_name: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: full_name.split("::").last().unwrap_or(full_name).to_string(),
            id: TypeId::of::<T>(),
            full_name: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_name)
    }
}
