use async_trait::async_trait;

use credverify_core::{Credential, ResponseBuilder, TranslatedError, VerificationResult};

use crate::verifier::{Verifier, VerifierKind};

/// Offline signature verification.
///
/// No proof algorithm is wired in yet, so every credential is rejected with
/// a deterministic failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Verifier for SignatureVerifier {
    async fn verify(&self, _credential: &Credential) -> VerificationResult {
        tracing::debug!("offline signature verification requested but not available");
        ResponseBuilder::build(
            false,
            Some("Credential verification using signature failed.".into()),
            vec![TranslatedError::new(
                "Offline signature verification is not available yet.",
                "signature verification not implemented",
            )],
        )
    }

    fn kind(&self) -> VerifierKind {
        VerifierKind::Signature
    }
}
