//! Demo that runs the pipeline once against embedded fixtures with a stdout
//! broker (no AWS credentials or network needed).

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use fanout_producer::ingest::providers::jsonplaceholder::JsonPlaceholderProvider;
use fanout_producer::ingest::providers::weather::WeatherProvider;
use fanout_producer::ingest::types::DataProvider;
use fanout_producer::{handle, AppContext, Broker, PublishAttributes};

struct StdoutBroker {
    seq: AtomicU64,
}

#[async_trait]
impl Broker for StdoutBroker {
    async fn publish(
        &self,
        body: &str,
        subject: &str,
        attributes: &PublishAttributes,
    ) -> Result<String> {
        let n = self.seq.fetch_add(1, Ordering::Relaxed) + 1;
        println!("[{subject}] source={} body={body}", attributes.source);
        Ok(format!("local-{n}"))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let posts = include_str!("../../tests/fixtures/jsonplaceholder_posts.json");
    let weather = include_str!("../../tests/fixtures/weather_london.json");

    let providers: Vec<Box<dyn DataProvider>> = vec![
        Box::new(JsonPlaceholderProvider::from_fixture_str(posts)),
        Box::new(WeatherProvider::from_fixture_str(weather)),
    ];

    let ctx = AppContext {
        broker: Box::new(StdoutBroker {
            seq: AtomicU64::new(0),
        }),
        providers,
    };

    let resp = handle(&ctx, serde_json::json!({})).await;
    println!("statusCode={} body={}", resp.status_code, resp.body);
}
