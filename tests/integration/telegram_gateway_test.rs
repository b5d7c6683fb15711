// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use listwatch::domain::models::record::Record;
use listwatch::domain::services::notification_service::{
    GatewayError, MessageGateway, NotificationDispatcher,
};
use listwatch::infrastructure::services::telegram_gateway_impl::TelegramGateway;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_send_posts_html_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:abc/sendMessage"))
        .and(body_partial_json(json!({
            "chat_id": "-100",
            "text": "<b>hi</b>",
            "parse_mode": "HTML",
            "disable_web_page_preview": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = TelegramGateway::new(&server.uri(), "123:abc", "-100");
    gateway.send_text("<b>hi</b>").await.unwrap();
}

#[tokio::test]
async fn test_rejected_message_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("message is too long"))
        .mount(&server)
        .await;

    let gateway = TelegramGateway::new(&format!("{}/", server.uri()), "t", "1");
    match gateway.send_text("x").await {
        Err(GatewayError::Rejected { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("too long"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_dispatcher_over_telegram_counts_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let gateway = Arc::new(TelegramGateway::new(&server.uri(), "t", "1"));
    let dispatcher = NotificationDispatcher::new(gateway, 4000);
    let record = Record::new(
        "Title".to_string(),
        "2025-01-01".to_string(),
        "Open".to_string(),
        "https://example.com/a".to_string(),
    );

    let report = dispatcher.dispatch(&[record.clone()]).await;
    assert_eq!(report.messages_failed, 1);
    assert!(report.delivered.is_empty());
    assert_eq!(report.undelivered, vec![record.id]);
}
