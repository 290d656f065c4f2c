//! The single verification entry point.
//!
//! [`VerificationService::verify`] validates the incoming credential, asks the
//! factory for a verifier, and returns that verifier's result untouched. Any
//! dispatch error, and any panic unwinding out of a verifier, is converted to
//! a minimal failure result so the service itself never fails.

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::Instrument;

use credverify_core::{Credential, VerificationConfig, VerificationResult, VerifierError};

use crate::factory::VerifierFactory;
use crate::verifier::Verifier;

/// A credential together with the configuration selecting how to verify it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationRequest {
    #[serde(default)]
    pub credential: Option<Value>,
    #[serde(default)]
    pub config: VerificationConfig,
}

impl VerificationRequest {
    pub fn new(credential: Value, config: VerificationConfig) -> Self {
        Self {
            credential: Some(credential),
            config,
        }
    }
}

/// Orchestrates credential verification.
#[derive(Debug, Clone)]
pub struct VerificationService {
    factory: VerifierFactory,
}

impl VerificationService {
    pub fn new(factory: VerifierFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &VerifierFactory {
        &self.factory
    }

    /// Verify `credential` using the strategy selected by `config`.
    pub async fn verify_credential(
        &self,
        credential: Value,
        config: VerificationConfig,
    ) -> VerificationResult {
        self.verify(VerificationRequest::new(credential, config)).await
    }

    /// Verify a request. Never fails: every problem becomes a result with
    /// `success == false`.
    pub async fn verify(&self, request: VerificationRequest) -> VerificationResult {
        let request_id = uuid::Uuid::now_v7();
        let span = tracing::info_span!("verification", %request_id);

        async move {
            match AssertUnwindSafe(self.dispatch(request)).catch_unwind().await {
                Ok(Ok(result)) => {
                    tracing::info!(
                        success = result.success,
                        errors = result.error_count(),
                        "verification finished"
                    );
                    result
                }
                Ok(Err(e)) => {
                    tracing::warn!(category = %e.category(), error = %e, "verification rejected");
                    VerificationResult::fault(e.to_string())
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    tracing::error!(error = %message, "verifier panicked");
                    VerificationResult::fault(message)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn dispatch(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationResult, VerifierError> {
        let credential = validate_credential(request.credential)?;
        let verifier = self.factory.get_verifier(&request.config)?;
        tracing::debug!(verifier = %verifier.kind(), "dispatching verification");
        Ok(verifier.verify(&credential).await)
    }
}

/// The credential must be a non-empty JSON object.
fn validate_credential(credential: Option<Value>) -> Result<Credential, VerifierError> {
    let value = credential.ok_or_else(|| {
        VerifierError::InvalidCredential("missing required parameter: credential".into())
    })?;
    let credential = Credential::from_value(value)?;
    if credential.is_empty() {
        return Err(VerifierError::InvalidCredential(
            "credential must not be empty".into(),
        ));
    }
    Ok(credential)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "no details".to_string());
    VerifierError::Internal(format!("unexpected verification failure: {}", detail)).to_string()
}
