//! End-to-end cast classification tests
//!
//! A wiremock server stands in for third-party media hosts; casts are built
//! from JSON shaped like the social-graph API's responses.

use std::time::Duration;

use serde_json::{json, Value};
use tike::{
    Cast, CastContext, ClassifierConfig, ClassifyError, EmbedClassifier, EmbedType,
    HttpClientConfig, ProbeError,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn cast_json(hash: &str, url: &str) -> Value {
    json!({
        "object": "cast",
        "hash": hash,
        "author": {"fid": 3, "username": "dwr.eth"},
        "text": "check this out",
        "embeds": [{"url": url}],
        "reactions": {"likes_count": 2, "recasts_count": 0}
    })
}

fn casts(values: Vec<Value>) -> Vec<Cast> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

async fn mount_media(server: &MockServer, p: &str, content_type: &str) {
    Mock::given(method("HEAD"))
        .and(path(p))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", content_type))
        .mount(server)
        .await;
}

fn classifier(timeout: Duration) -> EmbedClassifier {
    let config = ClassifierConfig::new()
        .with_http(HttpClientConfig::new().with_timeout(timeout));
    EmbedClassifier::with_http(config).unwrap()
}

#[tokio::test]
async fn test_batch_with_timeout_keeps_remaining_order() {
    init_tracing();
    let server = MockServer::start().await;

    mount_media(&server, "/1.png", "image/png").await;
    mount_media(&server, "/2.mp4", "video/mp4").await;
    Mock::given(method("HEAD"))
        .and(path("/3.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_media(&server, "/4.mp3", "audio/mpeg").await;
    mount_media(&server, "/5.gif", "image/gif").await;

    let input = casts(
        (1..=5)
            .map(|i| {
                let ext = ["png", "mp4", "png", "mp3", "gif"][i - 1];
                cast_json(&format!("0x{i}"), &format!("{}/{i}.{ext}", server.uri()))
            })
            .collect(),
    );

    let classifier = classifier(Duration::from_millis(300));
    let output = classifier.classify_batch(&input, CastContext::Normal).await;

    assert_eq!(output.len(), 4);
    let hashes: Vec<_> = output.iter().filter_map(|c| c.cast.hash()).collect();
    assert_eq!(hashes, vec!["0x1", "0x2", "0x4", "0x5"]);
    let types: Vec<_> = output.iter().map(|c| c.embed_type).collect();
    assert_eq!(
        types,
        vec![EmbedType::Image, EmbedType::Video, EmbedType::Audio, EmbedType::Image]
    );

    let detailed = classifier
        .classify_batch_detailed(&input, CastContext::Normal)
        .await;
    assert_eq!(
        detailed[2],
        Err(ClassifyError::ProbeFailed(ProbeError::Timeout))
    );
}

#[tokio::test]
async fn test_html_page_dropped_in_batch_but_other_when_single() {
    init_tracing();
    let server = MockServer::start().await;

    mount_media(&server, "/article", "text/html; charset=utf-8").await;
    mount_media(&server, "/photo.jpg", "image/jpeg").await;

    let input = casts(vec![
        cast_json("0xa", &format!("{}/article", server.uri())),
        cast_json("0xb", &format!("{}/photo.jpg", server.uri())),
    ]);

    let classifier = classifier(Duration::from_secs(5));

    let batch = classifier.classify_batch(&input, CastContext::Normal).await;
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].cast.hash(), Some("0xb"));

    let single = classifier.classify_single(&input[0]).await;
    assert_eq!(single.embed_type, EmbedType::Other);
    assert_eq!(single.cast.hash(), Some("0xa"));
}

#[tokio::test]
async fn test_missing_host_is_dropped() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/deleted.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let input = casts(vec![cast_json("0xd", &format!("{}/deleted.png", server.uri()))]);
    let classifier = classifier(Duration::from_secs(5));

    assert!(classifier
        .classify_batch(&input, CastContext::Normal)
        .await
        .is_empty());
}

#[tokio::test]
async fn test_output_json_shape() {
    init_tracing();
    let server = MockServer::start().await;
    mount_media(&server, "/clip.mp4", "video/mp4").await;

    let input = casts(vec![
        cast_json("0xv", &format!("{}/clip.mp4", server.uri())),
        json!({
            "hash": "0xf",
            "embeds": [{"url": "https://frames.example.com/mint"}],
            "frames": [{"version": "vNext", "buttons": []}]
        }),
        json!({
            "hash": "0xy",
            "embeds": [{"url": "https://youtu.be/dQw4w9WgXcQ"}]
        }),
    ]);

    let classifier = classifier(Duration::from_secs(5));
    let output = classifier.classify_batch(&input, CastContext::Normal).await;
    let value = serde_json::to_value(&output).unwrap();

    assert_eq!(value[0]["embedType"], "video");
    assert_eq!(value[0]["author"]["username"], "dwr.eth");
    assert_eq!(value[0]["reactions"]["likes_count"], 2);
    assert_eq!(value[1]["embedType"], "frame");
    assert_eq!(value[1]["frames"][0]["version"], "vNext");
    assert_eq!(value[2]["embedType"], "youtube");

    // Only the video needed a probe
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_comment_thread_allows_text_only_replies() {
    init_tracing();
    let input = casts(vec![
        json!({"hash": "0xr1", "text": "agreed", "embeds": []}),
        json!({"hash": "0xr2", "text": "same"}),
    ]);

    let classifier = classifier(Duration::from_secs(5));

    let replies = classifier.classify_batch(&input, CastContext::Comment).await;
    assert_eq!(replies.len(), 2);
    assert!(replies.iter().all(|c| c.embed_type == EmbedType::Other));

    let feed = classifier.classify_batch(&input, CastContext::Normal).await;
    assert!(feed.is_empty());
}
