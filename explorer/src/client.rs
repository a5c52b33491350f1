use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chain::config::API_VERSION_PATH;
use containers::{Epoch, EpochRef};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::types::{ApiResponse, EpochSlotEntry, FinalizedEpoch};

/// Remote reads the sync engine depends on.
///
/// Abstracts the explorer so the engine can be driven by test doubles.
#[async_trait]
pub trait EpochClient: Send + Sync {
    /// Slot listing of one epoch.
    ///
    /// An empty list is a valid answer (nobody proposed with graffiti, or
    /// the explorer has nothing yet) and is returned as `Ok`.
    async fn fetch_epoch(&self, epoch: EpochRef) -> Result<Vec<EpochSlotEntry>, ClientError>;

    /// Epoch the remote currently considers finalized.
    async fn fetch_finalized_epoch(&self) -> Result<Epoch, ClientError>;
}

#[async_trait]
impl<T: EpochClient + ?Sized> EpochClient for Arc<T> {
    async fn fetch_epoch(&self, epoch: EpochRef) -> Result<Vec<EpochSlotEntry>, ClientError> {
        (**self).fetch_epoch(epoch).await
    }

    async fn fetch_finalized_epoch(&self) -> Result<Epoch, ClientError> {
        (**self).fetch_finalized_epoch().await
    }
}

/// HTTP client for a beaconcha.in-compatible explorer.
///
/// The API key travels as the `apikey` query parameter. Endpoints are
/// logged and reported in errors without it.
#[derive(Clone)]
pub struct BeaconchainClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BeaconchainClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn epoch_slots_endpoint(&self, epoch: EpochRef) -> String {
        format!("{}/{}/epoch/{}/slots", self.base_url, API_VERSION_PATH, epoch)
    }

    pub fn finalized_epoch_endpoint(&self) -> String {
        format!("{}/{}/epoch/finalized", self.base_url, API_VERSION_PATH)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<ApiResponse<T>, ClientError> {
        let response = self
            .http
            .get(endpoint)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| ClientError::Unavailable {
                endpoint: endpoint.to_string(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %endpoint, status = status.as_u16(), "Explorer request rejected");
            return Err(ClientError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ClientError::Unavailable {
            endpoint: endpoint.to_string(),
            source: source.without_url(),
        })?;

        let body: Value =
            serde_json::from_str(&body).map_err(|err| ClientError::malformed(endpoint, err.to_string()))?;
        check_envelope(endpoint, &body)?;

        serde_json::from_value(body).map_err(|err| ClientError::malformed(endpoint, err.to_string()))
    }
}

/// Rejects bodies the explorer flagged as failed and bodies without a payload.
///
/// The explorer answers some failures (rate limits among them) with a 2xx
/// status and an `ERROR: ...` status string. Only an explicit `data` of `[]`
/// or `null` stands for an empty listing.
fn check_envelope(endpoint: &str, body: &Value) -> Result<(), ClientError> {
    if let Some(status) = body.get("status").and_then(Value::as_str) {
        if status.starts_with("ERROR") {
            warn!(endpoint = %endpoint, status = %status, "Explorer reported an error");
            return Err(ClientError::malformed(endpoint, format!("explorer reported `{status}`")));
        }
    }
    if body.get("data").is_none() {
        return Err(ClientError::malformed(endpoint, "response has no data field"));
    }
    Ok(())
}

#[async_trait]
impl EpochClient for BeaconchainClient {
    async fn fetch_epoch(&self, epoch: EpochRef) -> Result<Vec<EpochSlotEntry>, ClientError> {
        let endpoint = self.epoch_slots_endpoint(epoch);
        let response: ApiResponse<Option<Vec<EpochSlotEntry>>> = self.get_json(&endpoint).await?;
        let entries = response.data.unwrap_or_default();

        debug!(epoch = %epoch, entries = entries.len(), "Fetched epoch slots");
        Ok(entries)
    }

    async fn fetch_finalized_epoch(&self) -> Result<Epoch, ClientError> {
        let endpoint = self.finalized_epoch_endpoint();
        let response: ApiResponse<Option<FinalizedEpoch>> = self.get_json(&endpoint).await?;

        let epoch = response
            .data
            .and_then(|payload| payload.epoch)
            .ok_or_else(|| ClientError::malformed(&endpoint, "finalized payload has no epoch field"))?;

        debug!(finalized_epoch = epoch, "Fetched finalized epoch");
        Ok(Epoch(epoch))
    }
}
