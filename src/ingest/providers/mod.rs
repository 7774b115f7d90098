// src/ingest/providers/mod.rs
pub mod jsonplaceholder;
pub mod weather;

use crate::config::SourceEndpoint;
use crate::ingest::types::DataProvider;

use jsonplaceholder::JsonPlaceholderProvider;
use weather::WeatherProvider;

/// Build providers from configured endpoints. Unknown source names are
/// skipped with a warning so a typo in the config cannot take the pipeline down.
pub fn from_endpoints(endpoints: &[SourceEndpoint]) -> Vec<Box<dyn DataProvider>> {
    let mut out: Vec<Box<dyn DataProvider>> = Vec::with_capacity(endpoints.len());
    for ep in endpoints {
        match ep.name.as_str() {
            "jsonplaceholder" => {
                out.push(Box::new(JsonPlaceholderProvider::from_url(ep.url.clone())))
            }
            "weather" => out.push(Box::new(WeatherProvider::from_url(ep.url.clone()))),
            other => {
                tracing::warn!(source = other, "unknown source in configuration, skipping")
            }
        }
    }
    out
}
