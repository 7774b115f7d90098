// src/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_TOPIC_ARN: &str = "SNS_TOPIC_ARN";
pub const ENV_ENDPOINT_URL: &str = "SNS_ENDPOINT_URL";
pub const ENV_REGION: &str = "AWS_REGION";

const ENV_SOURCES_PATH: &str = "PRODUCER_SOURCES_PATH";
const DEFAULT_REGION: &str = "us-east-1";

/// Broker connection settings, read from the environment.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub topic_arn: String,
    /// Override for a local broker emulator (e.g. LocalStack); None in prod.
    pub endpoint_url: Option<String>,
    pub region: String,
}

impl BrokerConfig {
    pub fn from_env() -> Result<Self> {
        let topic_arn = std::env::var(ENV_TOPIC_ARN)
            .with_context(|| format!("{ENV_TOPIC_ARN} is not set"))?;
        let endpoint_url = std::env::var(ENV_ENDPOINT_URL)
            .ok()
            .filter(|s| !s.is_empty());
        let region = std::env::var(ENV_REGION).unwrap_or_else(|_| DEFAULT_REGION.to_string());
        Ok(Self {
            topic_arn,
            endpoint_url,
            region,
        })
    }
}

/// One configured provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SourceEndpoint {
    pub name: String,
    pub url: String,
}

/// Endpoints used when no sources file is present.
pub fn default_sources() -> Vec<SourceEndpoint> {
    vec![
        SourceEndpoint {
            name: "jsonplaceholder".to_string(),
            url: "https://jsonplaceholder.typicode.com/posts".to_string(),
        },
        SourceEndpoint {
            name: "weather".to_string(),
            url: "https://api.openweathermap.org/data/2.5/weather?q=London&appid=demo".to_string(),
        },
    ]
}

/// Load the source list from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<Vec<SourceEndpoint>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load the source list using env var + fallbacks:
/// 1) $PRODUCER_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in defaults
pub fn load_sources_default() -> Result<Vec<SourceEndpoint>> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("PRODUCER_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(default_sources())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<SourceEndpoint>> {
    // Try TOML first if hinted or content looks like toml.
    let try_toml = hint_ext == "toml" || s.contains("[[sources]]");
    if try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    // Try JSON array
    if let Ok(v) = parse_json(s) {
        return Ok(v);
    }
    // Fallback: also try TOML if not attempted
    if !try_toml {
        if let Ok(v) = parse_toml(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported sources format"))
}

fn parse_toml(s: &str) -> Result<Vec<SourceEndpoint>> {
    #[derive(serde::Deserialize)]
    struct TomlSources {
        sources: Vec<SourceEndpoint>,
    }
    let v: TomlSources = toml::from_str(s)?;
    Ok(clean_list(v.sources))
}

fn parse_json(s: &str) -> Result<Vec<SourceEndpoint>> {
    let v: Vec<SourceEndpoint> = serde_json::from_str(s)?;
    Ok(clean_list(v))
}

fn clean_list(items: Vec<SourceEndpoint>) -> Vec<SourceEndpoint> {
    use std::collections::BTreeMap;
    let mut map = BTreeMap::new();
    for it in items {
        let name = it.name.trim().to_string();
        let url = it.url.trim().to_string();
        if !name.is_empty() && !url.is_empty() {
            map.entry(name.clone()).or_insert(SourceEndpoint { name, url });
        }
    }
    map.into_values().collect()
}
