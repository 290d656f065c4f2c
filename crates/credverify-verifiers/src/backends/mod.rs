//! Concrete verification strategies.

mod remote_api;
mod signature;
mod trust_issuer;

pub use remote_api::RemoteApiVerifier;
pub use signature::SignatureVerifier;
pub use trust_issuer::{ExpiryStatus, TrustIssuerVerifier, DEFAULT_EXPIRY_FIELD};

use credverify_core::{ResponseBuilder, TranslatedError, VerificationResult};

/// Failure returned by any verifier handed an empty credential.
pub(crate) fn empty_credential_result() -> VerificationResult {
    ResponseBuilder::failure(vec![TranslatedError::new(
        "The credential is empty or malformed.",
        "credential must be a non-empty object",
    )])
}
