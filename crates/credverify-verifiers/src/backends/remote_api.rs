use async_trait::async_trait;
use std::sync::Arc;

use credverify_core::{
    Credential, ErrorCategory, ErrorTranslator, ResponseBuilder, VerificationResult,
    VerifierError,
};

use crate::transport::BackendClient;
use crate::verifier::{Verifier, VerifierKind};

use super::empty_credential_result;

/// Delegates verification to an unauthenticated HTTP backend and echoes its
/// checks back on success.
#[derive(Debug, Clone)]
pub struct RemoteApiVerifier {
    client: BackendClient,
    translator: Arc<ErrorTranslator>,
}

impl RemoteApiVerifier {
    /// Create a verifier posting to `endpoint` (used verbatim).
    pub fn new(
        http: reqwest::Client,
        endpoint: &str,
        translator: Arc<ErrorTranslator>,
    ) -> Result<Self, VerifierError> {
        let client = BackendClient::new(http, "api", endpoint, None)?;
        Ok(Self { client, translator })
    }

    /// The backend URL this verifier posts to.
    pub fn endpoint(&self) -> &str {
        self.client.endpoint().as_str()
    }
}

#[async_trait]
impl Verifier for RemoteApiVerifier {
    async fn verify(&self, credential: &Credential) -> VerificationResult {
        if credential.is_empty() {
            return empty_credential_result();
        }

        let response = match self.client.post(credential).await {
            Ok(response) => response,
            Err(e) => return e.into_result(),
        };

        let errors = response.collect_errors(&self.translator);
        if !errors.is_empty() {
            tracing::info!(
                category = %ErrorCategory::BackendVerification,
                errors = errors.len(),
                "remote backend rejected credential"
            );
            return ResponseBuilder::failure(errors);
        }

        ResponseBuilder::success().with_checks(response.into_checks())
    }

    fn kind(&self) -> VerifierKind {
        VerifierKind::RemoteApi
    }
}
