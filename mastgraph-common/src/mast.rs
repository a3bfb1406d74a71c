//! MAST archive client with connection pooling and rate limiting
//!
//! HTTP client for the MAST "invoke" API used to pull observation metadata
//! for a telescope mission, including authentication, rate limiting, bounded
//! retries, and response envelope handling.

use crate::error::{MastGraphError, Result};
use crate::types::{Telescope, TimeRange};
use crate::utils::{now, timestamp_to_mjd};
use crate::{bail, ensure};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, error, info, instrument, warn};

/// Configuration for the MAST archive client
#[derive(Debug, Clone)]
pub struct MastConfig {
    /// Base URL of the archive (default: "https://mast.stsci.edu")
    pub base_url: String,
    /// Optional archive auth token for proprietary data
    pub auth_token: Option<String>,
    /// Request timeout in seconds (default: 300; archive-scale queries are slow)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Rate limit: requests per second (default: 5)
    pub rate_limit_per_sec: u32,
    /// Maximum number of retry attempts for transient failures (default: 3)
    pub max_retries: usize,
    /// Upper bound on rows retained from one query. `None` accepts whatever
    /// the archive returns; an unbounded time range can then produce a result
    /// set too large to hold in memory.
    pub max_records: Option<usize>,
}

impl Default for MastConfig {
    fn default() -> Self {
        Self {
            base_url: "https://mast.stsci.edu".to_string(),
            auth_token: None,
            timeout_secs: 300,
            max_idle_per_host: 10,
            rate_limit_per_sec: 5,
            max_retries: 3,
            max_records: None,
        }
    }
}

impl MastConfig {
    /// Create a new configuration for a given archive URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the archive auth token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the connection pool size
    pub fn with_pool_size(mut self, max_idle_per_host: usize) -> Self {
        self.max_idle_per_host = max_idle_per_host;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Cap the number of rows retained from one query
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.base_url.is_empty(), "MAST base URL cannot be empty");
        if self.timeout_secs == 0 {
            bail!("Request timeout must be greater than 0 seconds");
        }
        Ok(())
    }
}

/// Capability to query an observation archive.
///
/// The production implementation is [`MastClient`]; tests substitute
/// in-memory stubs so aggregation and chart logic stay deterministic.
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    /// Fetch all observations for `telescope` within `range`, optionally
    /// capped to `limit` records.
    async fn query_observations(
        &self,
        telescope: Telescope,
        range: &TimeRange,
        limit: Option<usize>,
    ) -> Result<Vec<Observation>>;
}

/// MAST archive client with connection pooling and rate limiting
#[derive(Debug, Clone)]
pub struct MastClient {
    client: Client,
    config: MastConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl MastClient {
    /// Create a new archive client with the given configuration
    pub fn new(config: MastConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| MastGraphError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| MastGraphError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Create a new client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(MastConfig::default())
    }

    /// URL of the archive's invoke endpoint
    fn invoke_url(&self) -> String {
        format!("{}/api/v0/invoke", self.config.base_url.trim_end_matches('/'))
    }

    /// Assemble the invoke request envelope for one observation query.
    ///
    /// Times go over the wire as Modified Julian Dates against the `t_min`
    /// column; an entirely open range omits the time filter so the archive
    /// returns its full history for the mission.
    fn build_query(
        telescope: Telescope,
        range: &TimeRange,
        limit: Option<usize>,
    ) -> serde_json::Value {
        let mut filters = vec![json!({
            "paramName": "obs_collection",
            "values": [telescope.collection()],
        })];

        if !range.is_unbounded() {
            let min = range.start.map(|t| timestamp_to_mjd(&t)).unwrap_or(0.0);
            let max = range
                .end
                .map(|t| timestamp_to_mjd(&t))
                .unwrap_or_else(|| timestamp_to_mjd(&now()));
            filters.push(json!({
                "paramName": "t_min",
                "values": [{"min": min, "max": max}],
            }));
        }

        let mut params = json!({
            "columns": "*",
            "filters": filters,
        });
        if let Some(limit) = limit {
            params["pagesize"] = json!(limit);
            params["page"] = json!(1);
        }

        json!({
            "service": "Mast.Caom.Filtered",
            "format": "json",
            "params": params,
        })
    }

    /// Whether a failed attempt is worth retrying (transport errors and
    /// server-side failures; client errors are not)
    fn is_transient(error: &MastGraphError) -> bool {
        match error {
            MastGraphError::Network { .. } => true,
            MastGraphError::Archive { status_code, .. } => {
                matches!(status_code, Some(status) if *status >= 500)
            }
            _ => false,
        }
    }

    /// Send one invoke request with rate limiting and bounded retries
    #[instrument(skip(self, request))]
    async fn invoke(&self, request: &serde_json::Value) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let url = self.invoke_url();
        let payload = serde_json::to_string(request)?;
        debug!("Sending invoke request to: {}", url);

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        let response = RetryIf::spawn(
            retry_strategy,
            || async {
                let mut req = self
                    .client
                    .post(&url)
                    .form(&[("request", payload.as_str())]);
                if let Some(token) = &self.config.auth_token {
                    req = req.header("Authorization", format!("token {}", token));
                }

                match req.send().await {
                    Ok(response) => {
                        let status = response.status();
                        if status.is_success() {
                            debug!("Request successful: {}", status);
                            Ok(response)
                        } else if status.is_client_error() {
                            error!("Client error: {}", status);
                            Err(MastGraphError::archive_with_status(
                                format!("Archive returned client error: {}", status),
                                status.as_u16(),
                            ))
                        } else {
                            warn!("Server error, will retry: {}", status);
                            Err(MastGraphError::archive_with_status(
                                format!("Archive returned server error: {}", status),
                                status.as_u16(),
                            ))
                        }
                    }
                    Err(e) if e.is_timeout() => {
                        warn!("Request timeout, will retry: {}", e);
                        Err(MastGraphError::network_with_source("Request timeout", e))
                    }
                    Err(e) if e.is_connect() => {
                        warn!("Connection error, will retry: {}", e);
                        Err(MastGraphError::network_with_source("Connection error", e))
                    }
                    Err(e) => {
                        error!("Request failed: {}", e);
                        Err(MastGraphError::network_with_source("Request failed", e))
                    }
                }
            },
            Self::is_transient,
        )
        .await?;

        Ok(response)
    }

    /// Parse a JSON response body into the expected envelope
    async fn parse_response<T>(&self, response: Response) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let text = response
            .text()
            .await
            .map_err(|e| MastGraphError::network_with_source("Failed to read response body", e))?;

        serde_json::from_str(&text).map_err(MastGraphError::from)
    }

    /// Fetch all observations for a mission within a time window.
    ///
    /// Blocks until the archive query resolves. There is no paging fallback:
    /// the whole result set is materialized in memory, and queries over wide
    /// windows can fail with a resource error when a record cap is configured
    /// (or exhaust memory when it is not).
    #[instrument(skip(self), fields(telescope = %telescope))]
    pub async fn query_observations(
        &self,
        telescope: Telescope,
        range: &TimeRange,
        limit: Option<usize>,
    ) -> Result<Vec<Observation>> {
        info!("Querying MAST for {} observations {}", telescope, range.label());

        let request = Self::build_query(telescope, range, limit);
        let response = self.invoke(&request).await?;
        let envelope: MastResponse<Vec<Observation>> = self.parse_response(response).await?;

        if !envelope.is_complete() {
            return Err(MastGraphError::archive(
                envelope
                    .error_message()
                    .unwrap_or("Archive query did not complete")
                    .to_string(),
            ));
        }

        let rows = envelope.into_data().unwrap_or_default();
        if let Some(cap) = self.config.max_records {
            if rows.len() > cap {
                return Err(MastGraphError::resource(format!(
                    "archive returned {} rows, more than the configured cap of {}; narrow the time range",
                    rows.len(),
                    cap
                )));
            }
        }

        info!("Fetched {} observations from MAST", rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl ArchiveClient for MastClient {
    async fn query_observations(
        &self,
        telescope: Telescope,
        range: &TimeRange,
        limit: Option<usize>,
    ) -> Result<Vec<Observation>> {
        MastClient::query_observations(self, telescope, range, limit).await
    }
}

// ============================================================================
// API Response Models
// ============================================================================

/// Envelope every invoke response arrives in
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MastResponse<T> {
    /// Query status ("COMPLETE", "EXECUTING", or "ERROR")
    pub status: String,
    /// Optional message (usually present on errors)
    pub msg: Option<String>,
    /// The actual data payload
    pub data: Option<T>,
}

impl<T> MastResponse<T> {
    /// Check if the query ran to completion
    pub fn is_complete(&self) -> bool {
        self.status == "COMPLETE"
    }

    /// Take the data payload, if present
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Get error message, if any
    pub fn error_message(&self) -> Option<&str> {
        self.msg.as_deref()
    }
}

/// One row of observation metadata.
///
/// Only the columns the aggregations need are typed; everything else the
/// archive returns is carried through opaquely in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Observation {
    /// Observation identifier
    pub obs_id: Option<String>,
    /// Mission name (e.g. "JWST")
    pub obs_collection: Option<String>,
    /// Instrument that captured the observation (e.g. "NIRCam")
    pub instrument_name: Option<String>,
    /// Data product type (e.g. "image", "spectrum")
    pub dataproduct_type: Option<String>,
    /// Target of the observation
    pub target_name: Option<String>,
    /// Observation start, as a Modified Julian Date
    pub t_min: Option<f64>,
    /// Observation end, as a Modified Julian Date
    pub t_max: Option<f64>,
    /// Exposure length in seconds
    pub t_exptime: Option<f64>,
    /// Remaining archive columns, passed through uninterpreted
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Observation {
    /// Numeric value of a column by name, checking the typed fields first and
    /// the passthrough columns second
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match name {
            "t_min" => self.t_min,
            "t_max" => self.t_max,
            "t_exptime" => self.t_exptime,
            _ => self.extra.get(name).and_then(|value| value.as_f64()),
        }
    }
}
