//! 配置提供者实现
//!
//! 文件提供者（JSON / TOML）、环境变量提供者与命令行提供者。
//! 环境变量与命令行的值保持字符串类型，与文件层的类型化值在绑定
//! 阶段统一处理。

use crate::provider::ConfigProvider;
use sentry_common::ConfigError;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON 配置文件提供者
#[derive(Debug)]
pub struct JsonFileProvider {
    file_path: PathBuf,
    optional: bool,
    priority: i32,
}

impl JsonFileProvider {
    /// 创建必需的 JSON 配置提供者，文件缺失时加载失败
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            optional: false,
            priority: 10,
        }
    }

    /// 创建可选的 JSON 配置提供者，文件缺失时产出空配置树
    pub fn optional<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            optional: true,
            priority: 10,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigProvider for JsonFileProvider {
    fn name(&self) -> &str {
        "JsonFileProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn load(&self) -> Result<Value, ConfigError> {
        if self.optional && !self.file_path.exists() {
            debug!("配置文件不存在，跳过: {}", self.file_path.display());
            return Ok(Value::Object(serde_json::Map::new()));
        }

        debug!("加载 JSON 配置文件: {}", self.file_path.display());
        let content = std::fs::read_to_string(&self.file_path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError { source: Box::new(e) })
    }
}

/// TOML 配置文件提供者
#[derive(Debug)]
pub struct TomlFileProvider {
    file_path: PathBuf,
    optional: bool,
    priority: i32,
}

impl TomlFileProvider {
    /// 创建必需的 TOML 配置提供者，文件缺失时加载失败
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            optional: false,
            priority: 5,
        }
    }

    /// 创建可选的 TOML 配置提供者，文件缺失时产出空配置树
    pub fn optional<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            optional: true,
            priority: 5,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigProvider for TomlFileProvider {
    fn name(&self) -> &str {
        "TomlFileProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn load(&self) -> Result<Value, ConfigError> {
        if self.optional && !self.file_path.exists() {
            debug!("配置文件不存在，跳过: {}", self.file_path.display());
            return Ok(Value::Object(serde_json::Map::new()));
        }

        debug!("加载 TOML 配置文件: {}", self.file_path.display());
        let content = std::fs::read_to_string(&self.file_path)?;
        let value: toml::Value =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError { source: Box::new(e) })?;
        Ok(toml_to_json(&value))
    }
}

/// 将 TOML 值转换为 JSON 值
fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
        toml::Value::Float(f) => Value::Number(
            serde_json::Number::from_f64(*f).unwrap_or_else(|| serde_json::Number::from(0)),
        ),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(arr) => Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
    }
}

/// 环境变量配置提供者
///
/// 带前缀的变量进入配置树：`TGSENTRY_TELEGRAM__CHAT_ID` 映射为
/// `telegram.chat_id`。`__` 分隔嵌套层级，键统一转为小写。
#[derive(Debug)]
pub struct EnvironmentProvider {
    prefix: String,
    priority: i32,
}

impl EnvironmentProvider {
    /// 创建新的环境变量提供者
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            priority: 20,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigProvider for EnvironmentProvider {
    fn name(&self) -> &str {
        "EnvironmentProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn load(&self) -> Result<Value, ConfigError> {
        let marker = format!("{}_", self.prefix);
        let mut root = Value::Object(serde_json::Map::new());

        for (key, value) in std::env::vars() {
            let Some(stripped) = key.strip_prefix(&marker) else {
                continue;
            };
            let path: Vec<String> = stripped
                .split("__")
                .map(|part| part.to_lowercase())
                .collect();
            debug!("环境变量覆盖配置键: {}", path.join("."));
            set_path(&mut root, &path, Value::String(value));
        }

        Ok(root)
    }
}

/// 命令行配置提供者
///
/// 支持 `--section.key=value` 与 `--section.key value` 两种形式；
/// 无值的开关记为 `"true"`。
#[derive(Debug)]
pub struct CommandLineProvider {
    args: Vec<String>,
    priority: i32,
}

impl CommandLineProvider {
    /// 创建新的命令行提供者
    pub fn new(args: &[String]) -> Self {
        Self {
            args: args.to_vec(),
            priority: 30,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigProvider for CommandLineProvider {
    fn name(&self) -> &str {
        "CommandLineProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn load(&self) -> Result<Value, ConfigError> {
        let mut root = Value::Object(serde_json::Map::new());
        let mut iter = self.args.iter().peekable();

        while let Some(arg) = iter.next() {
            let Some(flag) = arg.strip_prefix("--") else {
                continue;
            };

            let (key, value) = match flag.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => match iter.peek() {
                    Some(next) if !next.starts_with("--") => {
                        let value = (*next).clone();
                        iter.next();
                        (flag.to_string(), value)
                    }
                    _ => (flag.to_string(), "true".to_string()),
                },
            };

            let path: Vec<String> = key.split('.').map(|part| part.to_lowercase()).collect();
            set_path(&mut root, &path, Value::String(value));
        }

        Ok(root)
    }
}

/// 沿点分路径写入配置值，按需创建中间对象
fn set_path(root: &mut Value, path: &[String], value: Value) {
    let mut current = root;
    for (index, part) in path.iter().enumerate() {
        let map = match current {
            Value::Object(map) => map,
            other => {
                *other = Value::Object(serde_json::Map::new());
                match other {
                    Value::Object(map) => map,
                    _ => unreachable!(),
                }
            }
        };

        if index == path.len() - 1 {
            map.insert(part.clone(), value);
            return;
        }
        current = map
            .entry(part.clone())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ConfigurationBuilder;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn json_file_provider_reads_nested_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"telegram": {{"api_url": "https://example.invalid/{{0}}/{{1}}", "chat_id": 42}}}}"#
        )
        .unwrap();

        let configuration = ConfigurationBuilder::new()
            .add_provider(JsonFileProvider::new(file.path()))
            .build()
            .unwrap();

        assert_eq!(
            configuration.get_value("telegram.chat_id"),
            Some(&json!(42))
        );
    }

    #[test]
    fn missing_optional_file_yields_empty_tree() {
        let provider = JsonFileProvider::optional("does/not/exist.json");
        assert_eq!(provider.load().unwrap(), json!({}));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let provider = JsonFileProvider::new("does/not/exist.json");
        assert!(matches!(
            provider.load().unwrap_err(),
            ConfigError::FileReadError { .. }
        ));
    }

    #[test]
    fn toml_file_provider_converts_to_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[telegram]\nbot_api_token = \"T1\"\nenabled = true\n"
        )
        .unwrap();

        let provider = TomlFileProvider::new(file.path());
        let value = provider.load().unwrap();

        assert_eq!(value["telegram"]["bot_api_token"], json!("T1"));
        assert_eq!(value["telegram"]["enabled"], json!(true));
    }

    #[test]
    fn environment_provider_maps_nested_keys() {
        // 独立前缀，避免测试间相互影响
        std::env::set_var("ENVTEST_TELEGRAM__CHAT_ID", "42");

        let provider = EnvironmentProvider::new("ENVTEST");
        let value = provider.load().unwrap();

        assert_eq!(value["telegram"]["chat_id"], json!("42"));
        std::env::remove_var("ENVTEST_TELEGRAM__CHAT_ID");
    }

    #[test]
    fn command_line_provider_supports_both_flag_forms() {
        let args = vec![
            "--telegram.chat_id=42".to_string(),
            "--telegram.bot_api_token".to_string(),
            "T1".to_string(),
            "--verbose".to_string(),
        ];

        let provider = CommandLineProvider::new(&args);
        let value = provider.load().unwrap();

        assert_eq!(value["telegram"]["chat_id"], json!("42"));
        assert_eq!(value["telegram"]["bot_api_token"], json!("T1"));
        assert_eq!(value["verbose"], json!("true"));
    }
}
