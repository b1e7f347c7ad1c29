//! End-to-end notification classification tests

use std::time::Duration;

use serde_json::{json, Value};
use tike::{
    ClassifierConfig, EmbedClassifier, EmbedType, HttpClientConfig, Notification,
    NotificationFilter, NotificationKind,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifications(values: Vec<Value>) -> Vec<Notification> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

fn page(server: &MockServer) -> Vec<Notification> {
    notifications(vec![
        json!({
            "object": "notification",
            "type": "likes",
            "most_recent_timestamp": "2024-05-01T12:00:00.000Z",
            "cast": {"hash": "0x1", "embeds": [{"url": format!("{}/cat.webp", server.uri())}]},
            "reactions": [{"object": "likes", "user": {"fid": 10}}]
        }),
        json!({
            "object": "notification",
            "type": "mention",
            "most_recent_timestamp": "2024-05-01T11:00:00.000Z",
            "cast": {"hash": "0x2", "embeds": [{"url": format!("{}/cat.webp", server.uri())}]}
        }),
        json!({
            "object": "notification",
            "type": "follows",
            "most_recent_timestamp": "2024-05-01T10:00:00.000Z",
            "follows": [
                {"object": "follow", "user": {"fid": 11, "username": "alice"}},
                {"object": "follow", "user": {"fid": 12, "username": "bob"}}
            ]
        }),
        json!({
            "object": "notification",
            "type": "recasts",
            "most_recent_timestamp": "2024-05-01T09:00:00.000Z",
            "cast": {"hash": "0x4", "embeds": [{"url": format!("{}/landing", server.uri())}]}
        }),
    ])
}

async fn mount(server: &MockServer) {
    Mock::given(method("HEAD"))
        .and(path("/cat.webp"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/webp"))
        .mount(server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;
}

fn http() -> HttpClientConfig {
    HttpClientConfig::new().with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn test_notification_page_default_filter() {
    let server = MockServer::start().await;
    mount(&server).await;

    let classifier = EmbedClassifier::with_http(ClassifierConfig::new().with_http(http())).unwrap();
    let output = classifier.classify_notification_batch(&page(&server)).await;

    let kinds: Vec<_> = output.iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Likes, NotificationKind::Follows]);

    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value[0]["cast"]["embedType"], "image");
    assert_eq!(value[0]["reactions"][0]["user"]["fid"], 10);
    assert_eq!(value[1]["follows"][1]["username"], "bob");
    assert_eq!(value[1]["most_recent_timestamp"], "2024-05-01T10:00:00.000Z");
}

#[tokio::test]
async fn test_notification_page_with_mentions_allowed() {
    let server = MockServer::start().await;
    mount(&server).await;

    let config = ClassifierConfig::new()
        .with_http(http())
        .with_notifications(NotificationFilter::allow_all());
    let classifier = EmbedClassifier::with_http(config).unwrap();
    let output = classifier.classify_notification_batch(&page(&server)).await;

    assert_eq!(output.len(), 3);
    assert_eq!(output[1].kind, NotificationKind::Mention);
    assert_eq!(output[1].cast().unwrap().embed_type, EmbedType::Image);
}
