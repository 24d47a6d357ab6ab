//! License key validation against the remote license authority.
//!
//! One POST, one response, no retries. The gate's public surface is
//! infallible: every failure mode — absent key, transport failure, non-2xx
//! status, malformed body, rejected key, unknown tier string — funnels into
//! the same `(valid: false, tier: Free)` fallback. Failures are logged at
//! `warn!` and otherwise manifest only as a narrower feature set.

use ghostchat_core::{LicenseError, Tier};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default validation endpoint; overridable via `license_api_url`.
pub const DEFAULT_LICENSE_API_URL: &str = "https://license.ghostchat.dev/api/validate-license";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The outcome of license resolution, immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicenseStatus {
    pub valid: bool,
    pub tier: Tier,
}

impl LicenseStatus {
    /// The fallback every failure path resolves to.
    pub fn free_fallback() -> Self {
        Self {
            valid: false,
            tier: Tier::Free,
        }
    }
}

/// Validates a license key with a single remote round trip.
pub struct LicenseGate {
    endpoint: String,
    client: reqwest::Client,
}

impl LicenseGate {
    /// Create a gate pointing at `endpoint`, or the default license server.
    pub fn new(endpoint: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.unwrap_or(DEFAULT_LICENSE_API_URL).to_string(),
            client,
        }
    }

    /// Resolve the effective tier for `key`.
    ///
    /// An absent or empty key resolves immediately without any network call.
    /// Otherwise exactly one request is issued; a failed attempt is terminal
    /// for the session. Never returns an error past this boundary.
    pub async fn resolve(&self, key: Option<&str>) -> LicenseStatus {
        let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) else {
            info!("No license key configured, using free tier");
            return LicenseStatus::free_fallback();
        };

        match self.validate(key).await {
            Ok(status) => {
                info!(tier = %status.tier, "License validated");
                status
            }
            Err(e) => {
                warn!(error = %e, "License validation failed, falling back to free tier");
                LicenseStatus::free_fallback()
            }
        }
    }

    async fn validate(&self, key: &str) -> Result<LicenseStatus, LicenseError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ValidateRequest { license_key: key })
            .send()
            .await
            .map_err(|e| LicenseError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LicenseError::Http(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LicenseError::Network(e.to_string()))?;

        parse_validation_body(&body)
    }
}

/// Parse a success-status response body into a license status.
fn parse_validation_body(body: &str) -> Result<LicenseStatus, LicenseError> {
    let parsed: ValidateResponse =
        serde_json::from_str(body).map_err(|e| LicenseError::MalformedBody(e.to_string()))?;

    if !parsed.valid {
        return Err(LicenseError::Rejected);
    }

    let tier = Tier::parse(&parsed.tier)
        .ok_or_else(|| LicenseError::MalformedBody(format!("unknown tier '{}'", parsed.tier)))?;

    Ok(LicenseStatus { valid: true, tier })
}

#[derive(Serialize)]
struct ValidateRequest<'a> {
    #[serde(rename = "licenseKey")]
    license_key: &'a str,
}

#[derive(Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    valid: bool,
    #[serde(default)]
    tier: String,
}
