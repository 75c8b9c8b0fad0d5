//! Remote key-value configuration store
//!
//! Reads one item per collection key and writes with a PATCH carrying an
//! `upsert` item operation. Reads may lag writes: the service is
//! eventually consistent.

use std::time::Duration;

use async_trait::async_trait;
use folio_core::model::Record;
use folio_core_types::Sensitive;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

use super::{records_to_value, CollectionBackend};
use crate::errors::{from_reqwest, unavailable, Result};

/// Connection settings for the remote store
#[derive(Debug, Clone)]
pub struct RemoteKvConfig {
    /// Endpoint accepting PATCH writes
    pub write_url: String,
    /// Base URL for reads; items are fetched from `{read_url}/item/{key}`
    pub read_url: String,
    pub token: Sensitive<String>,
    pub timeout: Duration,
}

#[derive(Serialize)]
struct PatchBody<'a> {
    items: [PatchItem<'a>; 1],
}

#[derive(Serialize)]
struct PatchItem<'a> {
    operation: &'static str,
    key: &'a str,
    value: Value,
}

pub struct RemoteKvBackend {
    client: reqwest::Client,
    config: RemoteKvConfig,
}

impl RemoteKvBackend {
    pub fn new(config: RemoteKvConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(from_reqwest)?;
        Ok(Self { client, config })
    }

    fn item_url(&self, key: &str) -> String {
        format!("{}/item/{}", self.config.read_url.trim_end_matches('/'), key)
    }
}

/// Pull a human-readable reason out of an error response body
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let detail = parsed.as_ref().and_then(|v| {
        v.get("message")
            .and_then(Value::as_str)
            .or_else(|| v.pointer("/error/message").and_then(Value::as_str))
            .or_else(|| v.get("error").and_then(Value::as_str))
    });
    match detail {
        Some(detail) => format!("{}: {}", status, detail),
        None => format!("{}: Unknown error", status),
    }
}

#[async_trait]
impl CollectionBackend for RemoteKvBackend {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let response = self
            .client
            .get(self.item_url(key))
            .bearer_auth(self.config.token.expose())
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.text().await.map_err(from_reqwest)?;
        if !status.is_success() {
            return Err(unavailable("remote", error_message(status, &body)));
        }

        // an unreadable payload is treated like a malformed stored value
        Ok(serde_json::from_str(&body).ok())
    }

    async fn save(&self, key: &str, records: &[Record]) -> Result<()> {
        let body = PatchBody {
            items: [PatchItem {
                operation: "upsert",
                key,
                value: records_to_value(records),
            }],
        };

        let response = self
            .client
            .patch(&self.config.write_url)
            .bearer_auth(self.config.token.expose())
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(unavailable("remote", error_message(status, &text)));
        }

        tracing::debug!(collection = key, records = records.len(), "remote store updated");
        Ok(())
    }
}
