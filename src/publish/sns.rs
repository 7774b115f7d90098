// src/publish/sns.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_sns::types::MessageAttributeValue;
use aws_sdk_sns::Client;

use super::{Broker, PublishAttributes};
use crate::config::BrokerConfig;

/// SNS-backed broker. The topic has two durable queue subscribers; one
/// publish here fans out to both. Construct once and reuse across
/// invocations; the client is cheap to clone and holds no invocation state.
pub struct SnsBroker {
    client: Client,
    topic_arn: String,
}

impl SnsBroker {
    pub async fn connect(cfg: &BrokerConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(cfg.region.clone()));
        if let Some(endpoint) = &cfg.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Ok(Self {
            client: Client::new(&sdk_config),
            topic_arn: cfg.topic_arn.clone(),
        })
    }

    fn string_attribute(value: &str) -> Result<MessageAttributeValue> {
        MessageAttributeValue::builder()
            .data_type("String")
            .string_value(value)
            .build()
            .context("building sns message attribute")
    }
}

#[async_trait]
impl Broker for SnsBroker {
    async fn publish(
        &self,
        body: &str,
        subject: &str,
        attributes: &PublishAttributes,
    ) -> Result<String> {
        let out = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .message(body)
            .subject(subject)
            .message_attributes("source", Self::string_attribute(&attributes.source)?)
            .message_attributes(
                "timestamp",
                Self::string_attribute(&attributes.timestamp.to_rfc3339())?,
            )
            .send()
            .await
            .context("sns publish")?;

        Ok(out.message_id().unwrap_or_default().to_string())
    }
}
