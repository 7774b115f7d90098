//! Data Fan-out Producer — Lambda Entrypoint
//! Wires the broker client and provider set once, then serves invocations.

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fanout_producer::config::{self, BrokerConfig};
use fanout_producer::handler::{handle, AppContext, LambdaResponse};
use fanout_producer::ingest::providers;
use fanout_producer::publish::sns::SnsBroker;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_ansi(false))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let broker_cfg = BrokerConfig::from_env().map_err(|e| Error::from(e.to_string()))?;
    let broker = SnsBroker::connect(&broker_cfg)
        .await
        .map_err(|e| Error::from(e.to_string()))?;

    let sources = config::load_sources_default().map_err(|e| Error::from(e.to_string()))?;
    let providers = providers::from_endpoints(&sources);

    let ctx = Arc::new(AppContext {
        broker: Box::new(broker),
        providers,
    });

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let ctx = ctx.clone();
        async move { Ok::<LambdaResponse, Error>(handle(ctx.as_ref(), event.payload).await) }
    }))
    .await
}
