// src/ingest/providers/weather.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::ingest::types::{DataProvider, RawPayload};

/// Current-conditions provider. Returns a single record per fetch rather than
/// a list, which exercises the single-envelope path in the normalizer.
pub struct WeatherProvider {
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl WeatherProvider {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
        }
    }

    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    fn parse_record_from_str(s: &str) -> Result<RawPayload> {
        let record: Value = serde_json::from_str(s).context("parsing weather json")?;
        Ok(record)
    }
}

#[async_trait]
impl DataProvider for WeatherProvider {
    async fn fetch(&self) -> Result<RawPayload> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_record_from_str(s),

            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .context("weather get()")?
                    .error_for_status()
                    .context("weather non-2xx")?
                    .text()
                    .await
                    .context("weather .text()")?;
                Self::parse_record_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "weather"
    }
}
