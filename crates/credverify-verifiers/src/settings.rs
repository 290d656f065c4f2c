use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use credverify_core::VerifierError;

use crate::registry::OnlineBackend;

pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 120;

/// Process-wide verification settings, supplied by the bootstrap layer.
#[derive(Clone, Serialize, Deserialize)]
pub struct VerificationSettings {
    /// Timeout for each outbound backend call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Online backends callers may select.
    #[serde(default = "default_enabled_backends")]
    pub enabled_backends: Vec<String>,
    /// Endpoint per backend, used when a request does not name one.
    #[serde(default)]
    pub default_endpoints: BTreeMap<String, String>,
    /// Bearer token per backend, used when a request does not carry one.
    #[serde(default, skip_serializing)]
    pub default_tokens: BTreeMap<String, String>,
    /// Extra raw → friendly error translations.
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_enabled_backends() -> Vec<String> {
    OnlineBackend::all().map(|b| b.name().to_string()).collect()
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            enabled_backends: default_enabled_backends(),
            default_endpoints: BTreeMap::new(),
            default_tokens: BTreeMap::new(),
            translations: BTreeMap::new(),
        }
    }
}

// Tokens are listed by backend name only.
impl fmt::Debug for VerificationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationSettings")
            .field("timeout_secs", &self.timeout_secs)
            .field("enabled_backends", &self.enabled_backends)
            .field("default_endpoints", &self.default_endpoints)
            .field("default_tokens", &self.default_tokens.keys().collect::<Vec<_>>())
            .field("translations", &self.translations.len())
            .finish()
    }
}

impl VerificationSettings {
    /// Outbound call timeout, validated against the allowed range.
    pub fn timeout(&self) -> Result<Duration, VerifierError> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&self.timeout_secs) {
            return Err(VerifierError::InvalidSettings(format!(
                "timeout_secs must be between {} and {}, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }
}
