// src/ingest/mod.rs
pub mod providers;
pub mod types;

use std::collections::BTreeMap;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde_json::json;

use crate::ingest::types::{DataProvider, RawPayload};

/// Upper bound on a single provider call. One slow provider must not starve
/// the others or eat the invocation deadline.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Source substituted when every provider fails.
pub const FALLBACK_SOURCE: &str = "demo";

/// One-time metrics registration (so series show up wherever a recorder is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "fetch_provider_errors_total",
            "Provider fetch/parse errors and timeouts."
        );
        describe_counter!(
            "fetch_fallback_total",
            "Invocations where all providers failed and the demo fallback was substituted."
        );
        describe_counter!("fetch_sources_total", "Sources fetched successfully.");
        describe_histogram!("fetch_duration_ms", "Wall time of one fetch_all pass.");
    });
}

/// Fixed payload for the `demo` fallback source.
pub fn fallback_payload() -> RawPayload {
    json!([
        {"id": 1, "title": "Demo Post 1", "body": "This is demo content"},
        {"id": 2, "title": "Demo Post 2", "body": "More demo content"}
    ])
}

/// Run all providers once and collect successful payloads by source name.
///
/// Providers run concurrently, each bounded by [`FETCH_TIMEOUT`]. A failed or
/// timed-out provider is logged and omitted; it never aborts the others.
/// When the map would come back empty, the `demo` fallback is substituted so
/// downstream always has at least one source — total upstream failure is
/// visible in the logs, not in the return value.
pub async fn fetch_all(providers: &[Box<dyn DataProvider>]) -> BTreeMap<String, RawPayload> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let fetches = providers.iter().map(|p| async move {
        let res = tokio::time::timeout(FETCH_TIMEOUT, p.fetch()).await;
        (p.name(), res)
    });

    let mut out = BTreeMap::new();
    for (name, res) in futures::future::join_all(fetches).await {
        match res {
            Ok(Ok(payload)) => {
                counter!("fetch_sources_total").increment(1);
                out.insert(name.to_string(), payload);
            }
            Ok(Err(e)) => {
                tracing::warn!(error = ?e, provider = name, "provider error");
                counter!("fetch_provider_errors_total").increment(1);
            }
            Err(_) => {
                tracing::warn!(
                    provider = name,
                    timeout_secs = FETCH_TIMEOUT.as_secs(),
                    "provider timed out"
                );
                counter!("fetch_provider_errors_total").increment(1);
            }
        }
    }

    if out.is_empty() {
        tracing::warn!("all providers failed, substituting demo fallback payload");
        counter!("fetch_fallback_total").increment(1);
        out.insert(FALLBACK_SOURCE.to_string(), fallback_payload());
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("fetch_duration_ms").record(ms);

    out
}
