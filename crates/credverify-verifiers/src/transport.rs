//! Outbound calls to remote verification backends and parsing of their replies.

use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use credverify_core::translator::UNLABELLED_CHECK_MESSAGE;
use credverify_core::{
    CheckResult, Credential, ErrorCategory, ErrorTranslator, RawError, ResponseBuilder,
    TranslatedError, VerificationResult, VerifierError,
};

/// Message of every result produced by a transport failure.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Verification API error";

/// The backend could not be reached or did not answer intelligibly.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    /// Canonical failure shape: the transport message is both `error` and `raw`.
    pub fn into_result(self) -> VerificationResult {
        let entry = TranslatedError::new(self.0.clone(), self.0);
        ResponseBuilder::build(false, Some(TRANSPORT_FAILURE_MESSAGE.into()), vec![entry])
    }
}

/// Backend `error` field: a single entry, a list of entries, or bare text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawErrorField {
    Many(Vec<RawError>),
    One(RawError),
    Text(String),
}

/// A check as reported on the wire. Backends disagree on field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct BackendCheck {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "isValid")]
    is_valid: Option<bool>,
    #[serde(default)]
    status: Option<bool>,
}

impl BackendCheck {
    /// First non-empty of `title` and `message`.
    fn label(&self) -> Option<&str> {
        [self.title.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
    }

    /// Only an explicit `false` counts as a failed check.
    fn passed(&self) -> bool {
        self.is_valid.or(self.status).unwrap_or(true)
    }

    fn into_check_result(self) -> CheckResult {
        CheckResult {
            title: self.label().unwrap_or(UNLABELLED_CHECK_MESSAGE).to_string(),
            status: self.passed(),
        }
    }
}

/// Body returned by a verification backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct BackendResponse {
    #[serde(default)]
    error: Option<RawErrorField>,
    #[serde(default)]
    checks: Option<Vec<BackendCheck>>,
}

impl BackendResponse {
    /// Translate failed checks first, then reported errors, preserving order.
    pub(crate) fn collect_errors(&self, translator: &ErrorTranslator) -> Vec<TranslatedError> {
        let mut errors: Vec<TranslatedError> = self
            .checks
            .iter()
            .flatten()
            .filter(|check| !check.passed())
            .map(|check| {
                translator.translate_message(check.label().unwrap_or(UNLABELLED_CHECK_MESSAGE))
            })
            .collect();

        match &self.error {
            Some(RawErrorField::Many(list)) => {
                errors.extend(list.iter().map(|e| translator.translate_error(e)));
            }
            Some(RawErrorField::One(single)) => errors.push(translator.translate_error(single)),
            Some(RawErrorField::Text(text)) if !text.is_empty() => {
                errors.push(translator.translate_message(text));
            }
            _ => {}
        }

        errors
    }

    pub(crate) fn has_failures(&self) -> bool {
        let failed_check = self.checks.iter().flatten().any(|c| !c.passed());
        let reported = match &self.error {
            Some(RawErrorField::Many(list)) => !list.is_empty(),
            Some(RawErrorField::One(_)) => true,
            Some(RawErrorField::Text(text)) => !text.is_empty(),
            None => false,
        };
        failed_check || reported
    }

    pub(crate) fn into_checks(self) -> Vec<CheckResult> {
        self.checks
            .unwrap_or_default()
            .into_iter()
            .map(BackendCheck::into_check_result)
            .collect()
    }
}

/// Posts credentials to a single backend endpoint.
#[derive(Clone)]
pub(crate) struct BackendClient {
    http: reqwest::Client,
    endpoint: Url,
    token: Option<String>,
}

impl BackendClient {
    /// `endpoint` must be an absolute http(s) URL; it is used verbatim.
    pub(crate) fn new(
        http: reqwest::Client,
        backend: &str,
        endpoint: &str,
        token: Option<String>,
    ) -> Result<Self, VerifierError> {
        let endpoint = parse_endpoint(backend, endpoint)?;
        Ok(Self {
            http,
            endpoint,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub(crate) fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub(crate) async fn post(
        &self,
        credential: &Credential,
    ) -> Result<BackendResponse, TransportError> {
        let mut request = self.http.post(self.endpoint.clone()).json(credential);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let host = self.endpoint.host_str().unwrap_or_default();
        tracing::debug!(host, attributes = credential.len(), "posting credential to backend");

        let response = request.send().await.map_err(|e| {
            tracing::warn!(
                category = %ErrorCategory::Transport,
                host,
                error = %e,
                timeout = e.is_timeout(),
                "verification backend unreachable"
            );
            TransportError(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        parse_body(status, &body)
    }
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

fn parse_endpoint(backend: &str, endpoint: &str) -> Result<Url, VerifierError> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(VerifierError::MissingEndpoint(backend.to_string()));
    }
    let url = Url::parse(trimmed)
        .map_err(|e| VerifierError::InvalidEndpoint(format!("{}: {}", trimmed, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(VerifierError::InvalidEndpoint(format!(
            "{}: unsupported scheme '{}'",
            trimmed, other
        ))),
    }
}

/// Interpret a backend reply. Non-2xx replies are only trusted when they
/// carry concrete failures; everything unintelligible is a transport error.
pub(crate) fn parse_body(
    status: StatusCode,
    body: &[u8],
) -> Result<BackendResponse, TransportError> {
    if status.is_success() && body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BackendResponse::default());
    }

    match serde_json::from_slice::<BackendResponse>(body) {
        Ok(parsed) if status.is_success() || parsed.has_failures() => Ok(parsed),
        Ok(_) => Err(TransportError(format!("backend returned HTTP {}", status))),
        Err(e) if status.is_success() => Err(TransportError(format!(
            "unparseable backend response: {}",
            e
        ))),
        Err(_) => Err(TransportError(format!("backend returned HTTP {}", status))),
    }
}

/// Construct the shared HTTP client with a bounded request timeout.
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, VerifierError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("credverify/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| VerifierError::HttpClient(e.to_string()))
}
