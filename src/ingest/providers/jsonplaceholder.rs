// src/ingest/providers/jsonplaceholder.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::ingest::types::{DataProvider, RawPayload};

/// The upstream returns ~100 posts; only the head of the list is published.
const MAX_RECORDS: usize = 5;

pub struct JsonPlaceholderProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl JsonPlaceholderProvider {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
        }
    }

    /// Accepts any &str (e.g. a loaded fixture file), copies internally.
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    fn parse_records_from_str(s: &str) -> Result<RawPayload> {
        let records: Value = serde_json::from_str(s).context("parsing jsonplaceholder json")?;
        let limited = match records {
            Value::Array(items) => Value::Array(items.into_iter().take(MAX_RECORDS).collect()),
            other => other,
        };
        Ok(limited)
    }
}

#[async_trait]
impl DataProvider for JsonPlaceholderProvider {
    async fn fetch(&self) -> Result<RawPayload> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_records_from_str(s),

            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("jsonplaceholder get()")?
                    .error_for_status()
                    .context("jsonplaceholder non-2xx")?
                    .text()
                    .await
                    .context("jsonplaceholder .text()")?;
                Self::parse_records_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "jsonplaceholder"
    }
}
