// src/publish/mod.rs
pub mod sns;

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::normalize::MessageEnvelope;

/// Metadata carried alongside an envelope for consumer-side filtering.
/// Always derivable from the envelope; independent of the body content.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PublishAttributes {
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

/// External broker capability: one publish, fan-out to all subscribers.
#[async_trait::async_trait]
pub trait Broker: Send + Sync {
    /// Submit one message; returns the broker-assigned message id.
    async fn publish(
        &self,
        body: &str,
        subject: &str,
        attributes: &PublishAttributes,
    ) -> Result<String>;
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PublishFailure {
    pub source: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub error: String,
}

/// Per-invocation accounting. `messages_sent` counts individually successful
/// publish calls; `sources_processed` holds sources with at least one success.
#[derive(Debug, Default, serde::Serialize)]
pub struct InvocationResult {
    pub messages_sent: usize,
    pub sources_processed: BTreeSet<String>,
    pub failures: Vec<PublishFailure>,
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("publish_messages_total", "Messages published to the topic.");
        describe_counter!("publish_errors_total", "Per-envelope publish failures.");
    });
}

/// Publish every envelope, accumulating a per-item result.
///
/// One envelope's broker failure never discards work already committed for
/// the others: the failure is logged, recorded, and the loop continues.
pub async fn publish_all(
    broker: &dyn Broker,
    envelopes: &[MessageEnvelope],
) -> Result<InvocationResult> {
    ensure_metrics_described();

    let mut result = InvocationResult::default();
    for envelope in envelopes {
        let body = serde_json::to_string(envelope).context("serializing envelope")?;
        let subject = format!("Data from {}", envelope.source);
        let attributes = PublishAttributes {
            source: envelope.source.clone(),
            timestamp: Utc::now(),
        };

        match broker.publish(&body, &subject, &attributes).await {
            Ok(message_id) => {
                tracing::info!(message_id = %message_id, source = %envelope.source, "published message");
                counter!("publish_messages_total").increment(1);
                result.messages_sent += 1;
                result.sources_processed.insert(envelope.source.clone());
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = %envelope.source, "publish failed");
                counter!("publish_errors_total").increment(1);
                result.failures.push(PublishFailure {
                    source: envelope.source.clone(),
                    message_type: envelope.message_type.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(result)
}
