//! 配置提供者抽象与合并

use sentry_common::ConfigError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Debug;
use tracing::debug;

/// 配置提供者 trait
///
/// 每个提供者产出一棵 JSON 配置树；构建器按优先级合并所有提供者。
pub trait ConfigProvider: Send + Sync + Debug {
    /// 提供者名称
    fn name(&self) -> &str;

    /// 提供者优先级，数值越高优先级越高
    fn priority(&self) -> i32;

    /// 加载配置树
    fn load(&self) -> Result<Value, ConfigError>;
}

/// 配置构建器
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ConfigurationBuilder {
    /// 创建新的配置构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置提供者
    pub fn add_provider<T: ConfigProvider + 'static>(mut self, provider: T) -> Self {
        debug!("添加配置提供者: {}", provider.name());
        self.providers.push(Box::new(provider));
        self
    }

    /// 加载所有提供者并按优先级合并
    pub fn build(mut self) -> Result<Configuration, ConfigError> {
        self.providers.sort_by_key(|provider| provider.priority());

        let mut root = Value::Object(serde_json::Map::new());
        for provider in &self.providers {
            let layer = provider.load()?;
            debug!("合并配置层: {}", provider.name());
            merge_values(&mut root, layer);
        }

        Ok(Configuration { root })
    }
}

/// 合并后的配置树
#[derive(Debug, Clone)]
pub struct Configuration {
    root: Value,
}

impl Configuration {
    /// 按点分路径读取配置值
    pub fn get_value(&self, path: &str) -> Option<&Value> {
        let mut current = &self.root;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// 按点分路径读取配置节并反序列化为类型化对象
    pub fn get_section<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let value = self
            .get_value(path)
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: path.to_string(),
            })?;
        serde_json::from_value(value.clone()).map_err(|e| ConfigError::TypeConversionError {
            message: format!("配置节 {} 绑定失败: {}", path, e),
        })
    }
}

/// 递归合并两棵配置树，后者覆盖前者
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct StaticProvider {
        priority: i32,
        value: Value,
    }

    impl ConfigProvider for StaticProvider {
        fn name(&self) -> &str {
            "StaticProvider"
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn load(&self) -> Result<Value, ConfigError> {
            Ok(self.value.clone())
        }
    }

    #[test]
    fn higher_priority_provider_overrides_lower() {
        let configuration = ConfigurationBuilder::new()
            .add_provider(StaticProvider {
                priority: 20,
                value: json!({"telegram": {"chat_id": "override"}}),
            })
            .add_provider(StaticProvider {
                priority: 10,
                value: json!({"telegram": {"chat_id": "base", "api_url": "kept"}}),
            })
            .build()
            .unwrap();

        assert_eq!(
            configuration.get_value("telegram.chat_id"),
            Some(&json!("override"))
        );
        // 未被覆盖的键保留低优先级的值
        assert_eq!(
            configuration.get_value("telegram.api_url"),
            Some(&json!("kept"))
        );
    }

    #[test]
    fn missing_section_is_key_not_found() {
        let configuration = ConfigurationBuilder::new().build().unwrap();
        let error = configuration
            .get_section::<serde_json::Value>("telegram")
            .unwrap_err();
        assert!(matches!(error, ConfigError::KeyNotFound { .. }));
    }
}
