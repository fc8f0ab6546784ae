//! 端到端测试：完整入口点 + 模拟 HTTP 端点

use chrono::NaiveDateTime;
use sentry_app::Startup;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn entry_point_sends_exactly_one_timestamped_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/send"))
        .and(query_param("token", "T1"))
        .and(query_param("chat", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let args = vec![
        format!(
            "--telegram.api_url={}/send?token={{0}}&chat={{1}}",
            server.uri()
        ),
        "--telegram.bot_api_token=T1".to_string(),
        "--telegram.chat_id=42".to_string(),
        "--telegram.greeting=Ciao!".to_string(),
    ];

    Startup::new().init_and_run(&args).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let text = requests[0]
        .url
        .query_pairs()
        .find(|(key, _)| key == "text")
        .map(|(_, value)| value.to_string())
        .expect("text query parameter expected");

    // 消息以格式化时间戳开头，以配置的问候语结尾
    assert!(text.starts_with('['));
    assert!(text.ends_with("Ciao!"));
    NaiveDateTime::parse_from_str(&text[1..20], "%d.%m.%Y %H:%M:%S").unwrap();
}

#[tokio::test]
async fn transport_failure_propagates_to_the_entry_point() {
    // 端口 9 (discard) 上没有监听者，发送必然失败且没有重试
    let args = vec![
        "--telegram.api_url=http://127.0.0.1:9/send?token={0}&chat={1}".to_string(),
        "--telegram.bot_api_token=T1".to_string(),
        "--telegram.chat_id=42".to_string(),
    ];

    assert!(Startup::new().init_and_run(&args).await.is_err());
}

#[tokio::test]
async fn missing_required_configuration_is_fatal() {
    let args = vec!["--telegram.bot_api_token=T1".to_string()];

    assert!(Startup::new().init_and_run(&args).await.is_err());
}
