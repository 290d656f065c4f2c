//! Verification against a named trust-issuer backend.
//!
//! The credential's expiry attribute is checked locally before any network
//! call. The backend is then asked to verify the credential, optionally
//! authenticated with a bearer token. Successful results carry no checks.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

use credverify_core::{
    Credential, ErrorCategory, ErrorTranslator, ResponseBuilder, TranslatedError,
    VerificationResult, VerifierError,
};

use crate::transport::BackendClient;
use crate::verifier::{Verifier, VerifierKind};

use super::empty_credential_result;

/// Attribute probed for the expiry timestamp unless configured otherwise.
pub const DEFAULT_EXPIRY_FIELD: &str = "validUntil";

const EXPIRED_MESSAGE: &str = "The credential has expired and is no longer valid.";
const EXPIRED_RAW: &str = "VC expiration check failed";
const MALFORMED_EXPIRY_MESSAGE: &str = "The credential's expiry date could not be read.";
const MALFORMED_EXPIRY_RAW: &str = "VC expiration date is malformed";

/// Outcome of the local expiry pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    /// No expiry attribute; nothing to check.
    Absent,
    /// Expires at the given instant, which is still in the future.
    Valid(DateTime<Utc>),
    /// Expired at the given instant.
    Expired(DateTime<Utc>),
    /// The attribute exists but is not a recognisable timestamp.
    Malformed,
}

/// Online verifier for trust-issuer backends.
#[derive(Debug, Clone)]
pub struct TrustIssuerVerifier {
    client: BackendClient,
    translator: Arc<ErrorTranslator>,
    expiry_field: String,
}

impl TrustIssuerVerifier {
    /// `token`, when present, is sent as a bearer credential.
    pub fn new(
        http: reqwest::Client,
        endpoint: &str,
        token: Option<String>,
        translator: Arc<ErrorTranslator>,
    ) -> Result<Self, VerifierError> {
        let client = BackendClient::new(http, "dhiway", endpoint, token)?;
        Ok(Self {
            client,
            translator,
            expiry_field: DEFAULT_EXPIRY_FIELD.to_string(),
        })
    }

    /// Probe a different credential attribute for the expiry timestamp.
    pub fn with_expiry_field(mut self, field: impl Into<String>) -> Self {
        self.expiry_field = field.into();
        self
    }

    pub fn expiry_field(&self) -> &str {
        &self.expiry_field
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint().as_str()
    }

    /// Evaluate the credential's expiry attribute against `now`.
    pub fn expiry_status(&self, credential: &Credential, now: DateTime<Utc>) -> ExpiryStatus {
        match credential.get(&self.expiry_field) {
            None | Some(Value::Null) => ExpiryStatus::Absent,
            Some(Value::String(raw)) => match parse_expiry(raw) {
                Some(at) if at <= now => ExpiryStatus::Expired(at),
                Some(at) => ExpiryStatus::Valid(at),
                None => ExpiryStatus::Malformed,
            },
            Some(_) => ExpiryStatus::Malformed,
        }
    }
}

#[async_trait]
impl Verifier for TrustIssuerVerifier {
    async fn verify(&self, credential: &Credential) -> VerificationResult {
        if credential.is_empty() {
            return empty_credential_result();
        }

        match self.expiry_status(credential, Utc::now()) {
            ExpiryStatus::Expired(at) => {
                tracing::info!(
                    category = %ErrorCategory::Expiry,
                    field = %self.expiry_field,
                    expired_at = %at,
                    "credential expired"
                );
                return ResponseBuilder::failure(vec![TranslatedError::new(
                    EXPIRED_MESSAGE,
                    EXPIRED_RAW,
                )]);
            }
            ExpiryStatus::Malformed => {
                tracing::info!(
                    category = %ErrorCategory::Expiry,
                    field = %self.expiry_field,
                    "credential expiry attribute malformed"
                );
                return ResponseBuilder::failure(vec![TranslatedError::new(
                    MALFORMED_EXPIRY_MESSAGE,
                    MALFORMED_EXPIRY_RAW,
                )]);
            }
            ExpiryStatus::Absent | ExpiryStatus::Valid(_) => {}
        }

        match self.client.post(credential).await {
            Ok(response) => ResponseBuilder::from_errors(response.collect_errors(&self.translator)),
            Err(e) => e.into_result(),
        }
    }

    fn kind(&self) -> VerifierKind {
        VerifierKind::TrustIssuer
    }
}

/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (UTC), and date-only
/// values. A bare date stays valid through the end of that UTC day.
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.succ_opt())
        .and_then(|next| next.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
