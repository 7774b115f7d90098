// tests/handler_e2e.rs
use anyhow::{bail, Result};
use async_trait::async_trait;
use fanout_producer::ingest::providers::jsonplaceholder::JsonPlaceholderProvider;
use fanout_producer::ingest::providers::weather::WeatherProvider;
use fanout_producer::ingest::types::{DataProvider, RawPayload};
use fanout_producer::{handle, AppContext, Broker, MessageEnvelope, PublishAttributes};
use parking_lot::Mutex;
use serde_json::json;
use std::fs;
use std::sync::Arc;

/// Shares its log with the test so bodies stay inspectable after the
/// AppContext takes ownership of the broker box.
struct RecordingBroker {
    published: Arc<Mutex<Vec<String>>>,
}

impl RecordingBroker {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let published = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                published: published.clone(),
            },
            published,
        )
    }
}

#[async_trait]
impl Broker for RecordingBroker {
    async fn publish(
        &self,
        body: &str,
        _subject: &str,
        _attributes: &PublishAttributes,
    ) -> Result<String> {
        let mut published = self.published.lock();
        published.push(body.to_string());
        Ok(format!("mid-{}", published.len()))
    }
}

struct DeadBroker;

#[async_trait]
impl Broker for DeadBroker {
    async fn publish(&self, _: &str, _: &str, _: &PublishAttributes) -> Result<String> {
        bail!("endpoint unreachable")
    }
}

struct BrokenProvider;

#[async_trait]
impl DataProvider for BrokenProvider {
    async fn fetch(&self) -> Result<RawPayload> {
        bail!("dns failure")
    }
    fn name(&self) -> &'static str {
        "weather"
    }
}

fn fixture_providers() -> Vec<Box<dyn DataProvider>> {
    let posts = fs::read_to_string("tests/fixtures/jsonplaceholder_posts.json").unwrap();
    let weather = fs::read_to_string("tests/fixtures/weather_london.json").unwrap();
    vec![
        Box::new(JsonPlaceholderProvider::from_fixture_str(&posts)),
        Box::new(WeatherProvider::from_fixture_str(&weather)),
    ]
}

#[tokio::test]
async fn full_pipeline_publishes_every_envelope() {
    let (broker, published) = RecordingBroker::new();
    let ctx = AppContext {
        broker: Box::new(broker),
        providers: fixture_providers(),
    };

    let resp = handle(&ctx, json!({})).await;
    assert_eq!(resp.status_code, 200);

    let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
    // 5 capped blog posts + 1 weather record
    assert_eq!(body["messages_sent"], 6);
    assert_eq!(
        body["sources_processed"],
        json!(["jsonplaceholder", "weather"])
    );
    assert_eq!(body["failures"], json!([]));
    assert_eq!(
        body["message"],
        "Successfully processed and sent 6 messages"
    );

    // Every published body round-trips as a well-formed envelope.
    let published = published.lock();
    assert_eq!(published.len(), 6);
    for body in published.iter() {
        let env: MessageEnvelope = serde_json::from_str(body).expect("valid envelope json");
        assert!(matches!(
            env.message_type.as_str(),
            "blog_post" | "weather_data"
        ));
    }
}

#[tokio::test]
async fn all_providers_failing_still_publishes_demo_data() {
    let (broker, published) = RecordingBroker::new();
    let ctx = AppContext {
        broker: Box::new(broker),
        providers: vec![Box::new(BrokenProvider)],
    };

    let resp = handle(&ctx, json!({})).await;
    assert_eq!(resp.status_code, 200);

    let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(body["messages_sent"], 2);
    assert_eq!(body["sources_processed"], json!(["demo"]));

    let published = published.lock();
    for body in published.iter() {
        let env: MessageEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(env.message_type, "demo_data");
    }
}

#[tokio::test]
async fn unreachable_broker_yields_500_with_error_body() {
    let ctx = AppContext {
        broker: Box::new(DeadBroker),
        providers: fixture_providers(),
    };

    let resp = handle(&ctx, json!({})).await;
    assert_eq!(resp.status_code, 500);

    let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("endpoint unreachable"), "body: {error}");
}

#[tokio::test]
async fn empty_provider_set_still_returns_200() {
    let (broker, _published) = RecordingBroker::new();
    let ctx = AppContext {
        broker: Box::new(broker),
        providers: vec![],
    };

    let resp = handle(&ctx, json!({"detail": "scheduled event"})).await;
    assert_eq!(resp.status_code, 200);

    let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(body["messages_sent"], 2, "fallback data still flows");
}
