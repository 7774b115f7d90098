// src/handler.rs
//! One invocation: fetch -> normalize -> publish, shaped into the
//! `{statusCode, body}` contract the platform expects.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::ingest::{self, types::DataProvider};
use crate::normalize;
use crate::publish::{self, Broker, InvocationResult};

/// Collaborators injected once at startup and shared across invocations.
pub struct AppContext {
    pub broker: Box<dyn Broker>,
    pub providers: Vec<Box<dyn DataProvider>>,
}

#[derive(Debug, serde::Serialize)]
pub struct LambdaResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

/// Run the pipeline once. The event payload is opaque; invocation is purely
/// schedule-driven. Never panics out of the handler: any unrecovered error
/// becomes a 500 response.
pub async fn handle(ctx: &AppContext, _event: Value) -> LambdaResponse {
    match run_pipeline(ctx).await {
        Ok(result) => success_response(&result),
        Err(e) => {
            tracing::error!(error = ?e, "invocation failed");
            error_response(&e)
        }
    }
}

async fn run_pipeline(ctx: &AppContext) -> Result<InvocationResult> {
    let sources = ingest::fetch_all(&ctx.providers).await;

    let mut envelopes = Vec::new();
    for (source, payload) in &sources {
        envelopes.extend(normalize::normalize(source, payload));
    }

    let result = publish::publish_all(ctx.broker.as_ref(), &envelopes).await?;

    // Envelopes existed but none got through: the broker is unreachable, which
    // the caller must see as a failed invocation rather than a quiet zero.
    if result.messages_sent == 0 && !result.failures.is_empty() {
        bail!(
            "broker rejected all {} messages: {}",
            result.failures.len(),
            result.failures[0].error
        );
    }

    Ok(result)
}

fn success_response(result: &InvocationResult) -> LambdaResponse {
    let body = serde_json::json!({
        "message": format!(
            "Successfully processed and sent {} messages",
            result.messages_sent
        ),
        "messages_sent": result.messages_sent,
        "sources_processed": result.sources_processed,
        "failures": result.failures,
    });
    LambdaResponse {
        status_code: 200,
        body: body.to_string(),
    }
}

fn error_response(err: &anyhow::Error) -> LambdaResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    LambdaResponse {
        status_code: 500,
        body: body.to_string(),
    }
}
