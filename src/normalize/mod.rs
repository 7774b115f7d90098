// src/normalize/mod.rs
//! Maps heterogeneous provider payloads into the uniform message envelope.
//!
//! Dispatch is a registry from source name to a pure projection function,
//! built once at first use. Unrecognized sources produce zero envelopes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::{Lazy, OnceCell};
use serde_json::{json, Value};

use crate::ingest::types::RawPayload;

/// The uniform unit published downstream, regardless of source.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MessageEnvelope {
    pub source: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub data: Value,
    pub processed_at: DateTime<Utc>,
}

struct SourceRule {
    message_type: &'static str,
    project: fn(&RawPayload) -> Vec<Value>,
}

static REGISTRY: Lazy<HashMap<&'static str, SourceRule>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "jsonplaceholder",
        SourceRule {
            message_type: "blog_post",
            project: project_blog_posts,
        },
    );
    m.insert(
        "weather",
        SourceRule {
            message_type: "weather_data",
            project: project_weather,
        },
    );
    m.insert(
        "demo",
        SourceRule {
            message_type: "demo_data",
            project: project_demo,
        },
    );
    m
});

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("normalize_envelopes_total", "Envelopes produced.");
        describe_counter!(
            "normalize_unrecognized_total",
            "Payloads dropped because no rule matched the source name."
        );
    });
}

/// Missing attributes project to null, never an error.
fn field(record: &Value, key: &str) -> Value {
    record.get(key).cloned().unwrap_or(Value::Null)
}

/// A list payload yields its items; a single record yields itself.
fn as_records(payload: &RawPayload) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

fn project_blog_posts(payload: &RawPayload) -> Vec<Value> {
    as_records(payload)
        .iter()
        .map(|item| {
            json!({
                "id": field(item, "id"),
                "title": field(item, "title"),
                "content": field(item, "body"),
                "user_id": field(item, "userId"),
            })
        })
        .collect()
}

fn project_weather(payload: &RawPayload) -> Vec<Value> {
    vec![json!({
        "location": field(payload, "name"),
        "temperature": payload.pointer("/main/temp").cloned().unwrap_or(Value::Null),
        "description": payload
            .pointer("/weather/0/description")
            .cloned()
            .unwrap_or(Value::Null),
    })]
}

fn project_demo(payload: &RawPayload) -> Vec<Value> {
    as_records(payload)
}

/// Convert one source's raw payload into envelopes.
///
/// Each envelope gets its own `processed_at` stamped at normalization time.
/// A source with no registered rule yields an empty vec; nothing else signals
/// that, so it is logged here.
pub fn normalize(source: &str, payload: &RawPayload) -> Vec<MessageEnvelope> {
    ensure_metrics_described();

    let Some(rule) = REGISTRY.get(source) else {
        tracing::warn!(source, "no normalization rule for source, dropping payload");
        counter!("normalize_unrecognized_total").increment(1);
        return Vec::new();
    };

    let envelopes: Vec<MessageEnvelope> = (rule.project)(payload)
        .into_iter()
        .map(|data| MessageEnvelope {
            source: source.to_string(),
            message_type: rule.message_type.to_string(),
            data,
            processed_at: Utc::now(),
        })
        .collect();

    counter!("normalize_envelopes_total").increment(envelopes.len() as u64);
    envelopes
}
