//! HTTP client for the remote movement service.
//!
//! Wire contract:
//! - `POST /movimientos { id_movimiento }` records a movement and returns
//!   the latest record.
//! - `GET /movimientos/ultimo` returns the latest record.
//! - `GET /movimientos/ultimos?n=<count>` returns recent records.
//!
//! The deployed service is loose about response framing: success bodies
//! arrive bare, wrapped as `{ "data": ... }`, or as a single-element
//! array. Failures carry a non-2xx status and a JSON body with a
//! `message` field.

use crate::config::MovementsConfig;
use crate::error::{Result, VoiceError};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One recorded movement as reported by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementRecord {
    /// Record or movement id; the service uses either name.
    #[serde(default, alias = "id_movimiento")]
    pub id: Option<i64>,
    /// Movement description.
    #[serde(alias = "descripcion")]
    pub movimiento: String,
    /// When the movement was recorded, as sent by the service. The
    /// service's timestamp format varies between deployments, so the raw
    /// value is carried as-is; see [`MovementRecord::fecha_hora_parsed`].
    #[serde(default, deserialize_with = "lenient_string")]
    pub fecha_hora: Option<String>,
}

impl MovementRecord {
    /// The timestamp parsed as RFC 3339, when the service sent one.
    #[must_use]
    pub fn fecha_hora_parsed(&self) -> Option<DateTime<FixedOffset>> {
        self.fecha_hora
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }
}

/// Accept whatever JSON the service puts in a timestamp slot: strings
/// pass through, null/absent stay `None`, anything else is stringified.
/// A movement that was recorded must never be reported as failed just
/// because its timestamp is unparseable.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Client for the movement service API.
#[derive(Clone)]
pub struct MovementsClient {
    base_url: String,
    client: reqwest::Client,
}

impl MovementsClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &MovementsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_s))
            .build()
            .map_err(|e| VoiceError::Api(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    /// Build a client against an explicit base URL with default settings.
    /// Intended for tests against a mock server.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// Record a movement by wire id and return the resulting record.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Api`] on transport failure or a non-2xx
    /// response (with the service's `message` when present).
    pub async fn post_movement(&self, id_movimiento: u8) -> Result<MovementRecord> {
        let url = format!("{}/movimientos", self.base_url);
        let body = serde_json::json!({ "id_movimiento": id_movimiento });
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::Api(e.to_string()))?;
        let value = Self::check(response).await?;
        Self::unwrap_record(value)
    }

    /// Fetch the latest recorded movement.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`MovementsClient::post_movement`].
    pub async fn latest(&self) -> Result<MovementRecord> {
        let url = format!("{}/movimientos/ultimo", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VoiceError::Api(e.to_string()))?;
        let value = Self::check(response).await?;
        Self::unwrap_record(value)
    }

    /// Fetch the `n` most recent movements, newest first.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`MovementsClient::post_movement`].
    pub async fn recent(&self, n: u32) -> Result<Vec<MovementRecord>> {
        let url = format!("{}/movimientos/ultimos", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("n", n)])
            .send()
            .await
            .map_err(|e| VoiceError::Api(e.to_string()))?;
        let value = Self::check(response).await?;
        Self::unwrap_rows(value)
    }

    /// Read the body as JSON and map non-2xx statuses to [`VoiceError::Api`]
    /// with the service's `message` when the body carries one.
    async fn check(response: reqwest::Response) -> Result<serde_json::Value> {
        let status = response.status();
        let value: Option<serde_json::Value> = response.json().await.ok();
        if !status.is_success() {
            let message = value
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(serde_json::Value::as_str)
                .map_or_else(|| format!("Error HTTP {}", status.as_u16()), str::to_owned);
            return Err(VoiceError::Api(message));
        }
        value.ok_or_else(|| VoiceError::Api("empty response body".to_owned()))
    }

    /// Unwrap a single record from bare, `{ "data": ... }`, or
    /// single-element-array framing.
    fn unwrap_record(value: serde_json::Value) -> Result<MovementRecord> {
        let inner = match value {
            serde_json::Value::Array(mut arr) => {
                if arr.is_empty() {
                    return Err(VoiceError::Api("empty record array".to_owned()));
                }
                arr.swap_remove(0)
            }
            serde_json::Value::Object(mut obj) if obj.contains_key("data") => {
                let data = obj
                    .remove("data")
                    .unwrap_or(serde_json::Value::Null);
                return Self::unwrap_record(data);
            }
            other => other,
        };
        serde_json::from_value(inner).map_err(|e| VoiceError::Api(e.to_string()))
    }

    /// Unwrap a record list from bare-array or `{ "data": [...] }` framing.
    fn unwrap_rows(value: serde_json::Value) -> Result<Vec<MovementRecord>> {
        let rows = match value {
            serde_json::Value::Array(arr) => arr,
            serde_json::Value::Object(mut obj) => match obj.remove("data") {
                Some(serde_json::Value::Array(arr)) => arr,
                Some(serde_json::Value::Null) | None => Vec::new(),
                Some(other) => vec![other],
            },
            _ => Vec::new(),
        };
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| VoiceError::Api(e.to_string())))
            .collect()
    }
}
