//! Telegram 通知客户端
//!
//! 把令牌与目标标识替换进配置的 URL 模板，追加百分号编码的消息文本，
//! 发出一次 GET 请求并在信息级别记录完整响应体。

use crate::contract::{Notificator, NotifyError};
use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sentry_common::DependencyError;
use sentry_config::TelegramSettings;
use sentry_di::{Injectable, ServiceScope};
use sentry_macros::component;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// 查询参数编码集：RFC 3986 非保留字符之外全部转义，空格编码为 `%20`
const QUERY_TEXT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Telegram 通知客户端
///
/// 设置对象只读注入；客户端本身没有可变状态。
#[component(scoped, provides(Notificator))]
#[derive(Debug)]
pub struct TelegramNotificator {
    settings: Arc<TelegramSettings>,
    http: reqwest::Client,
}

impl Injectable for TelegramNotificator {
    fn construct(scope: &ServiceScope) -> Result<Self, DependencyError> {
        Ok(Self {
            settings: scope.resolve::<TelegramSettings>()?,
            http: reqwest::Client::new(),
        })
    }
}

impl TelegramNotificator {
    /// 组合目标地址
    ///
    /// 模板中的 `{0}` 替换为令牌，`{1}` 替换为目标标识，
    /// 然后追加 `&text=<UTF-8 百分号编码的消息>`。
    pub fn compose_url(&self, message: &str) -> Result<String, NotifyError> {
        let base = self
            .settings
            .api_url
            .replace("{0}", &self.settings.bot_api_token)
            .replace("{1}", &self.settings.chat_id);
        let composed = format!("{}&text={}", base, utf8_percent_encode(message, QUERY_TEXT));

        if let Err(source) = Url::parse(&composed) {
            return Err(NotifyError::InvalidUrl {
                url: composed,
                source,
            });
        }
        Ok(composed)
    }
}

#[async_trait]
impl Notificator for TelegramNotificator {
    async fn send_message(&self, message: &str) -> Result<(), NotifyError> {
        info!("发送通知消息..");

        let url = self.compose_url(message)?;
        let response = self.http.get(&url).send().await?;
        let body = response.text().await?;

        info!("收到响应: {}", body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notificator_with(api_url: &str, token: &str, chat_id: &str) -> TelegramNotificator {
        TelegramNotificator {
            settings: Arc::new(TelegramSettings {
                api_url: api_url.to_string(),
                bot_api_token: token.to_string(),
                chat_id: chat_id.to_string(),
                greeting: "Buon giorno!".to_string(),
            }),
            http: reqwest::Client::new(),
        }
    }

    #[test]
    fn composes_url_with_substitutions_and_percent_encoding() {
        let notificator = notificator_with(
            "https://api.example.com/send?token={0}&chat={1}",
            "T1",
            "42",
        );

        let url = notificator.compose_url("hello world").unwrap();

        assert_eq!(
            url,
            "https://api.example.com/send?token=T1&chat=42&text=hello%20world"
        );
    }

    #[test]
    fn encodes_message_text_as_utf8() {
        let notificator = notificator_with(
            "https://api.example.com/send?token={0}&chat={1}",
            "T1",
            "42",
        );

        let url = notificator.compose_url("héllo & ciao").unwrap();

        assert!(url.ends_with("&text=h%C3%A9llo%20%26%20ciao"));
    }

    #[test]
    fn invalid_template_fails_url_validation() {
        let notificator = notificator_with("not a url {0} {1}", "T1", "42");

        let error = notificator.compose_url("hi").unwrap_err();
        assert!(matches!(error, NotifyError::InvalidUrl { .. }));
    }
}
