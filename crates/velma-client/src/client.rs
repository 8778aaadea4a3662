//! HTTP client for the Velma API.
//!
//! [`VelmaClient`] owns the transport configuration, hands out command
//! packets pre-seeded with the configured sponsor credentials, and
//! submits them to the `job` route. Submission is a single attempt:
//! transport failures and non-2xx responses surface immediately as
//! [`VelmaError`] values.

use crate::error::{VelmaError, VelmaResult};
use crate::packet::CommandPacket;
use crate::types::{VelmaConfig, VelmaResponse};
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Header carrying the static API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Route accepting serialized command packets.
const JOB_ROUTE: &str = "job";

/// Client for one Velma sponsor account.
#[derive(Clone)]
pub struct VelmaClient {
    http: reqwest::Client,
    config: VelmaConfig,
}

impl std::fmt::Debug for VelmaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VelmaClient")
            .field("base_url", &self.config.base_url())
            .field("sponsor_name", &self.config.sponsor_name)
            .field("api_key_preview", &self.masked_key())
            .finish()
    }
}

impl VelmaClient {
    /// Create a new client from configuration.
    pub fn new(config: &VelmaConfig) -> VelmaResult<Self> {
        if config.api_key.is_empty() {
            return Err(VelmaError::invalid_config("Velma api_key must not be empty"));
        }
        url::Url::parse(&config.base_url())
            .map_err(|e| VelmaError::invalid_config(format!("Invalid Velma base URL: {}", e)))?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_sec as u64))
            .timeout(Duration::from_secs(config.timeout_sec as u64))
            .build()
            .map_err(|e| VelmaError::network(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Current config reference.
    pub fn config(&self) -> &VelmaConfig {
        &self.config
    }

    /// Build a route URL: `{base}/{route}`.
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.config.base_url(), route)
    }

    /// Masked api key for logging.
    pub fn masked_key(&self) -> String {
        let key = &self.config.api_key;
        if key.len() <= 8 {
            "****".into()
        } else {
            format!("{}…{}", &key[..4], &key[key.len() - 4..])
        }
    }

    /// Create a command packet pre-seeded with the configured sponsor
    /// name, sponsor key, and client key.
    pub fn create_command_packet(&self) -> CommandPacket {
        CommandPacket::new(
            &self.config.sponsor_name,
            &self.config.sponsor_key,
            &self.config.client_key,
        )
    }

    /// Submit a command packet to the `job` route.
    ///
    /// One attempt only — Velma submissions are not idempotent, so a
    /// failed send is reported to the caller rather than retried.
    pub async fn send_command_packet(
        &self,
        packet: &CommandPacket,
    ) -> VelmaResult<VelmaResponse> {
        let url = self.url(JOB_ROUTE);
        debug!("POST {} (job {})", url, packet.job_unique_id());
        if self.config.debug {
            debug!("Payload: {}", packet.to_payload());
        }

        let resp = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(packet)
            .send()
            .await
            .map_err(|e| VelmaError::network(format!("HTTP request to {} failed: {}", url, e)))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();

        if !(200..300).contains(&status) {
            return Err(VelmaError::from_api_response(status, &body));
        }

        let response: VelmaResponse = serde_json::from_str(&body).map_err(|e| {
            VelmaError::serialization(format!("Failed to parse Velma response: {}", e))
        })?;

        info!(
            "Velma job {} -> {} ({})",
            packet.job_unique_id(),
            response.status,
            response.code
        );
        Ok(response)
    }
}
