//! Shared types for the Velma API integration.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
//  Configuration
// ═══════════════════════════════════════════════════════════════════════

/// API configuration for connecting to Velma.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelmaConfig {
    /// Service host; the endpoint resolves to `https://api.{host}/...`.
    pub host: String,
    /// Endpoint path segment under the API host.
    pub endpoint: String,
    /// Key sent as the `x-api-key` header on every request.
    pub api_key: String,
    /// Sponsor name seeded into created command packets.
    pub sponsor_name: String,
    /// Sponsor key seeded into created command packets.
    pub sponsor_key: String,
    /// Client key seeded into created command packets.
    pub client_key: String,
    /// Full base-URL override (testing / staging).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_sec: u32,
    /// Total request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_sec: u32,
    /// Log outgoing payloads at debug level.
    #[serde(default)]
    pub debug: bool,
}

fn default_connect_timeout() -> u32 {
    3
}
fn default_timeout() -> u32 {
    5
}

impl VelmaConfig {
    /// Resolved base URL, always with a trailing slash.
    pub fn base_url(&self) -> String {
        let url = match self.base_url {
            Some(ref url) => url.clone(),
            None => format!("https://api.{}/{}/", self.host, self.endpoint),
        };
        if url.ends_with('/') {
            url
        } else {
            format!("{}/", url)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  Response
// ═══════════════════════════════════════════════════════════════════════

/// Typed response from a `job` submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelmaResponse {
    /// Dotted status code, e.g. "100.0.0".
    #[serde(default)]
    pub code: String,
    /// Outcome keyword, "success" on acceptance.
    #[serde(default)]
    pub status: String,
    /// Human-readable detail.
    #[serde(default)]
    pub message: String,
    /// Id the service assigned to the submitted job. The service has
    /// emitted both spellings over time.
    #[serde(rename = "jobid", alias = "jobId", default)]
    pub job_id: String,
}

impl VelmaResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_json(extra: &str) -> String {
        format!(
            r#"{{"host":"velma.example","endpoint":"v1",
                "apiKey":"k","sponsorName":"Acme",
                "sponsorKey":"skey","clientKey":"ckey"{}}}"#,
            extra
        )
    }

    #[test]
    fn config_defaults() {
        let cfg: VelmaConfig = serde_json::from_str(&config_json("")).unwrap();
        assert_eq!(cfg.connect_timeout_sec, 3);
        assert_eq!(cfg.timeout_sec, 5);
        assert!(!cfg.debug);
        assert!(cfg.base_url.is_none());
    }

    #[test]
    fn base_url_built_from_host_and_endpoint() {
        let cfg: VelmaConfig = serde_json::from_str(&config_json("")).unwrap();
        assert_eq!(cfg.base_url(), "https://api.velma.example/v1/");
    }

    #[test]
    fn base_url_override_wins_and_is_normalised() {
        let cfg: VelmaConfig =
            serde_json::from_str(&config_json(r#","baseUrl":"http://127.0.0.1:9999/velma""#))
                .unwrap();
        assert_eq!(cfg.base_url(), "http://127.0.0.1:9999/velma/");
    }

    #[test]
    fn response_success() {
        let json = r#"{"code":"100.0.0","status":"success","message":"Job accepted","jobid":"abc123"}"#;
        let r: VelmaResponse = serde_json::from_str(json).unwrap();
        assert!(r.is_success());
        assert!(!r.is_failure());
        assert_eq!(r.code, "100.0.0");
        assert_eq!(r.job_id, "abc123");
    }

    #[test]
    fn response_accepts_job_id_alias() {
        let json = r#"{"code":"100.0.0","status":"success","message":"ok","jobId":"abc123"}"#;
        let r: VelmaResponse = serde_json::from_str(json).unwrap();
        assert_eq!(r.job_id, "abc123");
    }

    #[test]
    fn response_failure() {
        let json = r#"{"code":"500.0.0","status":"failure","message":"Bad key"}"#;
        let r: VelmaResponse = serde_json::from_str(json).unwrap();
        assert!(r.is_failure());
        assert!(r.job_id.is_empty());
    }
}
