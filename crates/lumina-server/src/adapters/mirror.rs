//! HTTP Progress Mirror
//!
//! Posts character snapshots to an external endpoint using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use lumina::{DomainError, MirrorEvent, ProgressMirror};

const SIGNATURE_HEADER: &str = "X-Lumina-Signature";
const EVENT_ID_HEADER: &str = "X-Lumina-Event-Id";

/// Configuration for mirror delivery
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub url: String,
    pub secret: Option<String>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl MirrorConfig {
    pub fn new(url: String, secret: Option<String>) -> Self {
        Self {
            url,
            secret,
            timeout: Duration::from_secs(10),
            user_agent: "Lumina-Mirror/1.0".to_string(),
        }
    }
}

/// HTTP implementation of ProgressMirror
pub struct HttpProgressMirror {
    client: Client,
    config: MirrorConfig,
}

impl HttpProgressMirror {
    pub fn new(config: MirrorConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DomainError::ExternalService(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// HMAC-SHA256 of a serialized event body, `sha256=<hex>`
    pub fn sign_payload(&self, secret: &str, payload: &[u8]) -> String {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        type HmacSha256 = Hmac<Sha256>;

        let mut mac =
            HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
        mac.update(payload);
        let bytes = mac.finalize().into_bytes();

        // Hex-encoded signature with sha256= prefix
        format!("sha256={}", hex::encode(bytes))
    }
}

#[async_trait]
impl ProgressMirror for HttpProgressMirror {
    async fn mirror(&self, event: &MirrorEvent) -> Result<(), DomainError> {
        let body = serde_json::to_vec(event).map_err(|e| {
            DomainError::ExternalService(format!("Failed to serialize mirror event: {e}"))
        })?;

        let mut request = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json")
            .header(EVENT_ID_HEADER, event.id.to_string());

        if let Some(secret) = &self.config.secret {
            request = request.header(SIGNATURE_HEADER, self.sign_payload(secret, &body));
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Mirror request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ExternalService(format!(
                "Mirror responded with {status}"
            )));
        }

        tracing::debug!(user_id = %event.user_id, kind = ?event.kind, "Mirrored character snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror() -> HttpProgressMirror {
        HttpProgressMirror::new(MirrorConfig::new(
            "http://localhost:9/mirror".to_string(),
            Some("test-secret".to_string()),
        ))
        .unwrap()
    }

    #[test]
    fn test_sign_payload() {
        let signature = mirror().sign_payload("test-secret", b"test payload");

        assert!(signature.starts_with("sha256="));
        assert_eq!(signature.len(), 7 + 64); // "sha256=" + 64 hex chars
    }

    #[test]
    fn test_signature_depends_on_secret() {
        let m = mirror();
        assert_ne!(m.sign_payload("a", b"body"), m.sign_payload("b", b"body"));
        assert_eq!(m.sign_payload("a", b"body"), m.sign_payload("a", b"body"));
    }
}
