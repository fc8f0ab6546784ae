//! 通知客户端的类型化设置

use crate::provider::ConfigurationBuilder;
use crate::providers::{
    CommandLineProvider, EnvironmentProvider, JsonFileProvider, TomlFileProvider,
};
use sentry_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 通知设置所在的配置节
pub const TELEGRAM_SECTION: &str = "telegram";

/// 环境变量前缀
pub const ENV_PREFIX: &str = "TGSENTRY";

fn default_greeting() -> String {
    "Buon giorno!".to_string()
}

/// 目标标识既可能是字符串也可能是数字
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "期望字符串或数字，得到 {}",
            other
        ))),
    }
}

/// Telegram 通知设置
///
/// 由配置协作方加载一次，只读注入通知客户端。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramSettings {
    /// 端点 URL 模板，包含 `{0}`（令牌）与 `{1}`（目标标识）两个替换槽
    pub api_url: String,
    /// 机器人 API 令牌
    pub bot_api_token: String,
    /// 目标会话标识
    #[serde(deserialize_with = "string_or_number")]
    pub chat_id: String,
    /// 问候语文本
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

impl TelegramSettings {
    /// 验证必需设置
    ///
    /// 缺失的必需值与缺失替换槽的模板都是致命的配置错误，
    /// 在使用这些设置的组件被构建之前就终止启动。
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "telegram.api_url 不能为空".to_string(),
            });
        }
        if !self.api_url.contains("{0}") || !self.api_url.contains("{1}") {
            return Err(ConfigError::ValidationError {
                message: "telegram.api_url 必须包含 {0} 与 {1} 两个替换槽".to_string(),
            });
        }
        if self.bot_api_token.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "telegram.bot_api_token 不能为空".to_string(),
            });
        }
        if self.chat_id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "telegram.chat_id 不能为空".to_string(),
            });
        }
        Ok(())
    }
}

/// 加载并验证通知设置
///
/// 配置层按优先级从低到高：可选配置文件（TOML、JSON）、
/// 环境变量（前缀 `TGSENTRY`）、命令行参数。
pub fn load_settings(args: &[String]) -> ConfigResult<TelegramSettings> {
    let configuration = ConfigurationBuilder::new()
        .add_provider(TomlFileProvider::optional("appsettings.toml"))
        .add_provider(JsonFileProvider::optional("appsettings.json"))
        .add_provider(EnvironmentProvider::new(ENV_PREFIX))
        .add_provider(CommandLineProvider::new(args))
        .build()?;

    let settings: TelegramSettings = configuration.get_section(TELEGRAM_SECTION)?;
    settings.validate()?;
    Ok(settings)
}
