use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::VerifierError;

/// An opaque credential document: a JSON object of arbitrary claims.
///
/// No internal shape is imposed here. Individual verifiers may probe
/// specific attributes (for example an expiry timestamp) themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(Map<String, Value>);

impl Credential {
    /// Wrap an arbitrary JSON value, rejecting anything that is not an object.
    pub fn from_value(value: Value) -> Result<Self, VerifierError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(VerifierError::InvalidCredential(
                "credential is required".into(),
            )),
            other => Err(VerifierError::InvalidCredential(format!(
                "credential must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Look up a top-level attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Credential {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Credential {
    type Error = VerifierError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// How a credential is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    /// Delegate to a remote HTTP backend named by `verifierName`.
    #[default]
    Online,
    /// Check the credential locally without any network call.
    Offline,
}

impl fmt::Display for VerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
        }
    }
}

impl FromStr for VerificationMethod {
    type Err = VerifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            other => Err(VerifierError::UnknownMethod(other.to_string())),
        }
    }
}

/// Caller-supplied selection of a verification strategy and its parameters.
///
/// `method` stays a raw string so that an unrecognised value surfaces as a
/// verification failure rather than a deserialization error at the boundary.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Credential attribute holding the expiry timestamp (trust-issuer backends).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_field: Option<String>,
}

impl VerificationConfig {
    /// Online verification through the named backend.
    pub fn online(verifier_name: impl Into<String>) -> Self {
        Self {
            method: Some(VerificationMethod::Online.to_string()),
            verifier_name: Some(verifier_name.into()),
            ..Default::default()
        }
    }

    /// Offline (local signature) verification.
    pub fn offline() -> Self {
        Self {
            method: Some(VerificationMethod::Offline.to_string()),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_expiry_field(mut self, field: impl Into<String>) -> Self {
        self.expiry_field = Some(field.into());
        self
    }

    /// The requested method, `online` when unset or empty.
    pub fn resolved_method(&self) -> Result<VerificationMethod, VerifierError> {
        match self.method.as_deref() {
            None | Some("") => Ok(VerificationMethod::default()),
            Some(raw) => raw.parse(),
        }
    }
}

// Hand-written so bearer tokens never reach the logs.
impl fmt::Debug for VerificationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationConfig")
            .field("method", &self.method)
            .field("verifier_name", &self.verifier_name)
            .field("api_endpoint", &self.api_endpoint)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("expiry_field", &self.expiry_field)
            .finish()
    }
}

/// One atomic fact checked by a remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub title: String,
    pub status: bool,
}

/// An error entry as reported by a remote backend. Never user-facing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawError {
    #[serde(default)]
    pub message: Option<String>,
}

/// A stable user-facing explanation paired with the backend's own wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedError {
    /// Human-readable explanation from the translation table.
    pub error: String,
    /// Original backend message, kept for diagnostics.
    pub raw: String,
}

impl TranslatedError {
    pub fn new(error: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            raw: raw.into(),
        }
    }
}

/// The canonical outcome of a verification, whatever strategy produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<TranslatedError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<CheckResult>>,
}

impl VerificationResult {
    /// Minimal failure with no structured cause, used when dispatch itself fails.
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            checks: None,
        }
    }

    /// Attach backend checks to a successful result. Ignored on failures.
    pub fn with_checks(mut self, checks: Vec<CheckResult>) -> Self {
        if self.success {
            self.checks = Some(checks);
        }
        self
    }

    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Vec::len)
    }
}
