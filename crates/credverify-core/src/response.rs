//! Construction of canonical [`VerificationResult`] values.
//!
//! Every verifier funnels its outcome through [`ResponseBuilder`] so that
//! `errors` is present exactly when `success` is false.

use crate::types::{TranslatedError, VerificationResult};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Credential verified successfully.";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Credential verification failed.";

/// Shapes verifier outcomes into the canonical result contract.
pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Build a result from raw parts. `errors` is dropped on success and
    /// always present (possibly empty) on failure.
    pub fn build(
        success: bool,
        message: Option<String>,
        errors: Vec<TranslatedError>,
    ) -> VerificationResult {
        if success {
            VerificationResult {
                success: true,
                message: message.unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
                errors: None,
                checks: None,
            }
        } else {
            VerificationResult {
                success: false,
                message: message.unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
                errors: Some(errors),
                checks: None,
            }
        }
    }

    pub fn success() -> VerificationResult {
        Self::build(true, None, Vec::new())
    }

    pub fn failure(errors: Vec<TranslatedError>) -> VerificationResult {
        Self::build(false, None, errors)
    }

    /// Success when no errors were collected, failure otherwise.
    pub fn from_errors(errors: Vec<TranslatedError>) -> VerificationResult {
        Self::build(errors.is_empty(), None, errors)
    }
}
