//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {message}")]
    TypeConversionError { message: String },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 模块发现错误类型
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("模块加载失败: {module}, 原因: {message}")]
    ModuleLoadFailed { module: String, message: String },
}

/// 类型分类错误类型
#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("组件 {type_name} 声明了多个生命周期标记: {markers:?}")]
    AmbiguousLifetime {
        type_name: String,
        markers: Vec<String>,
    },
}

/// 依赖解析错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("组件类型转换失败: {type_name}")]
    TypeMismatch { type_name: String },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },
}

impl DependencyError {
    /// 创建组件创建失败错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: Box::new(source),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
