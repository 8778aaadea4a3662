//! Crate-level error types for the Velma integration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alias for `Result<T, VelmaError>`.
pub type VelmaResult<T> = Result<T, VelmaError>;

/// Uniform error type used across the Velma crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelmaError {
    pub code: VelmaErrorCode,
    pub message: String,
    /// Optional detail from the upstream API body.
    pub details: Option<String>,
    /// HTTP status code if originated from an API call.
    pub http_status: Option<u16>,
}

impl fmt::Display for VelmaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.numeric(), self.message)?;
        if let Some(ref d) = self.details {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for VelmaError {}

/// Categorised error codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VelmaErrorCode {
    // ── Packet contract ──────────────────────────────────
    BadPacketDefinition,
    // ── Transport ────────────────────────────────────────
    NetworkError,
    ApiError,
    SerializationError,
    // ── Internal ─────────────────────────────────────────
    InvalidConfig,
}

impl VelmaErrorCode {
    /// Stable numeric discriminant for programmatic handling.
    pub fn numeric(&self) -> u16 {
        match self {
            VelmaErrorCode::BadPacketDefinition => 1000,
            VelmaErrorCode::NetworkError => 1100,
            VelmaErrorCode::ApiError => 1200,
            VelmaErrorCode::SerializationError => 1300,
            VelmaErrorCode::InvalidConfig => 1400,
        }
    }
}

impl VelmaError {
    /// Email-only field accessed on a packet whose type is not `email`.
    ///
    /// Fixed message and code; raised at the call site, never deferred
    /// to serialization time.
    pub fn bad_packet_definition() -> Self {
        Self {
            code: VelmaErrorCode::BadPacketDefinition,
            message: "Bad packet definition detected".to_string(),
            details: None,
            http_status: None,
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self {
            code: VelmaErrorCode::NetworkError,
            message: msg.into(),
            details: None,
            http_status: None,
        }
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self {
            code: VelmaErrorCode::SerializationError,
            message: msg.into(),
            details: None,
            http_status: None,
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self {
            code: VelmaErrorCode::InvalidConfig,
            message: msg.into(),
            details: None,
            http_status: None,
        }
    }

    /// Build from a non-2xx API response.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        // Velma error bodies follow the response envelope:
        //   { "code": "...", "status": "...", "message": "..." }
        let (msg, details) = Self::parse_body(status, body);
        Self {
            code: VelmaErrorCode::ApiError,
            message: msg,
            details,
            http_status: Some(status),
        }
    }

    fn parse_body(status: u16, body: &str) -> (String, Option<String>) {
        if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
            let msg = v["message"]
                .as_str()
                .filter(|m| !m.is_empty())
                .unwrap_or("Velma API error")
                .to_string();
            let detail = format!(
                "status={}, code={}",
                v["status"].as_str().unwrap_or(""),
                v["code"].as_str().unwrap_or(""),
            );
            (msg, Some(detail))
        } else {
            (
                format!("Velma API error {}", status),
                Some(body.chars().take(500).collect()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_packet_definition_is_stable() {
        let err = VelmaError::bad_packet_definition();
        assert_eq!(err.code, VelmaErrorCode::BadPacketDefinition);
        assert_eq!(err.code.numeric(), 1000);
        assert_eq!(err.message, "Bad packet definition detected");
        assert!(err.http_status.is_none());
    }

    #[test]
    fn display_includes_numeric_code() {
        let err = VelmaError::bad_packet_definition();
        assert!(err.to_string().starts_with("[1000]"));
    }

    #[test]
    fn from_api_response_parses_envelope() {
        let body = r#"{"code":"500.1.2","status":"failure","message":"Unknown sponsor"}"#;
        let err = VelmaError::from_api_response(403, body);
        assert_eq!(err.code, VelmaErrorCode::ApiError);
        assert_eq!(err.message, "Unknown sponsor");
        assert_eq!(err.http_status, Some(403));
        assert!(err.details.unwrap().contains("500.1.2"));
    }

    #[test]
    fn from_api_response_unparseable_body() {
        let err = VelmaError::from_api_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.code, VelmaErrorCode::ApiError);
        assert!(err.message.contains("502"));
        assert!(err.details.unwrap().contains("Bad Gateway"));
    }

    #[test]
    fn numeric_codes_are_distinct() {
        let codes = [
            VelmaErrorCode::BadPacketDefinition,
            VelmaErrorCode::NetworkError,
            VelmaErrorCode::ApiError,
            VelmaErrorCode::SerializationError,
            VelmaErrorCode::InvalidConfig,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a.numeric(), b.numeric());
            }
        }
    }
}
