// src/ingest/types.rs
use anyhow::Result;

/// Raw provider payload. Shape varies per provider; the normalizer projects
/// it into envelopes, so it stays opaque here.
pub type RawPayload = serde_json::Value;

#[async_trait::async_trait]
pub trait DataProvider: Send + Sync {
    async fn fetch(&self) -> Result<RawPayload>;
    fn name(&self) -> &'static str;
}
