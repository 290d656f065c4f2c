use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use credverify_core::{ErrorTranslator, VerificationConfig, VerificationMethod, VerifierError};

use crate::backends::{RemoteApiVerifier, SignatureVerifier, TrustIssuerVerifier};
use crate::registry::{BackendRegistry, OnlineBackend};
use crate::settings::VerificationSettings;
use crate::transport::build_http_client;
use crate::verifier::AnyVerifier;

/// Selects and constructs a verifier for each request configuration.
///
/// Holds only immutable state built at startup and is safe to share across
/// concurrent requests.
#[derive(Clone)]
pub struct VerifierFactory {
    http: reqwest::Client,
    registry: BackendRegistry,
    translator: Arc<ErrorTranslator>,
    default_endpoints: HashMap<OnlineBackend, String>,
    default_tokens: HashMap<OnlineBackend, String>,
    timeout: Duration,
}

impl VerifierFactory {
    /// Validate settings and build a factory. Unknown backend names in any
    /// settings table are rejected here rather than at request time.
    pub fn new(settings: &VerificationSettings) -> Result<Self, VerifierError> {
        let timeout = settings.timeout()?;
        let registry = BackendRegistry::with_enabled(&settings.enabled_backends)?;

        let mut translator = ErrorTranslator::new();
        translator.extend(settings.translations.clone());

        Ok(Self {
            http: build_http_client(timeout)?,
            registry,
            translator: Arc::new(translator),
            default_endpoints: backend_table(&settings.default_endpoints)?,
            default_tokens: backend_table(&settings.default_tokens)?,
            timeout,
        })
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve `config` to a concrete verifier.
    pub fn get_verifier(&self, config: &VerificationConfig) -> Result<AnyVerifier, VerifierError> {
        match config.resolved_method()? {
            VerificationMethod::Online => self.online_verifier(config),
            VerificationMethod::Offline => Ok(SignatureVerifier::new().into()),
        }
    }

    fn online_verifier(&self, config: &VerificationConfig) -> Result<AnyVerifier, VerifierError> {
        let name = config
            .verifier_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(VerifierError::MissingVerifierName)?;
        let backend = self.registry.resolve(name)?;

        let endpoint = config
            .api_endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| self.default_endpoints.get(&backend).map(String::as_str))
            .ok_or_else(|| VerifierError::MissingEndpoint(backend.name().to_string()))?;

        tracing::debug!(%backend, verifier = %backend.kind(), "constructing online verifier");

        let verifier = match backend {
            OnlineBackend::Api => {
                RemoteApiVerifier::new(self.http.clone(), endpoint, Arc::clone(&self.translator))?
                    .into()
            }
            OnlineBackend::Dhiway => {
                let token = config
                    .api_token
                    .clone()
                    .or_else(|| self.default_tokens.get(&backend).cloned());
                let mut verifier = TrustIssuerVerifier::new(
                    self.http.clone(),
                    endpoint,
                    token,
                    Arc::clone(&self.translator),
                )?;
                if let Some(field) = config.expiry_field.as_deref().filter(|f| !f.is_empty()) {
                    verifier = verifier.with_expiry_field(field);
                }
                verifier.into()
            }
        };

        Ok(verifier)
    }
}

impl fmt::Debug for VerifierFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierFactory")
            .field("registry", &self.registry)
            .field("translations", &self.translator.len())
            .field("default_endpoints", &self.default_endpoints)
            .field("default_tokens", &self.default_tokens.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn backend_table<V: Clone>(
    entries: &BTreeMap<String, V>,
) -> Result<HashMap<OnlineBackend, V>, VerifierError> {
    entries
        .iter()
        .map(|(name, value)| Ok((OnlineBackend::lookup(name)?, value.clone())))
        .collect()
}
