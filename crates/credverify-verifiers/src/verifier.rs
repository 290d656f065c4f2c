use async_trait::async_trait;
use std::fmt;

use credverify_core::{Credential, VerificationResult};

use crate::backends::{RemoteApiVerifier, SignatureVerifier, TrustIssuerVerifier};

/// The verification capability every strategy provides.
///
/// Expected failures (bad credential, unreachable backend, rejected proof)
/// are reported in the returned result, never as a panic or error value.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Verify a credential and return the normalized outcome.
    async fn verify(&self, credential: &Credential) -> VerificationResult;

    /// Which strategy this is.
    fn kind(&self) -> VerifierKind;
}

/// The closed set of verification strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerifierKind {
    RemoteApi,
    TrustIssuer,
    Signature,
}

impl fmt::Display for VerifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteApi => write!(f, "remote_api"),
            Self::TrustIssuer => write!(f, "trust_issuer"),
            Self::Signature => write!(f, "signature"),
        }
    }
}

/// A verifier produced by the factory.
#[derive(Debug, Clone)]
pub enum AnyVerifier {
    RemoteApi(RemoteApiVerifier),
    TrustIssuer(TrustIssuerVerifier),
    Signature(SignatureVerifier),
}

#[async_trait]
impl Verifier for AnyVerifier {
    async fn verify(&self, credential: &Credential) -> VerificationResult {
        match self {
            Self::RemoteApi(v) => v.verify(credential).await,
            Self::TrustIssuer(v) => v.verify(credential).await,
            Self::Signature(v) => v.verify(credential).await,
        }
    }

    fn kind(&self) -> VerifierKind {
        match self {
            Self::RemoteApi(_) => VerifierKind::RemoteApi,
            Self::TrustIssuer(_) => VerifierKind::TrustIssuer,
            Self::Signature(_) => VerifierKind::Signature,
        }
    }
}

impl From<RemoteApiVerifier> for AnyVerifier {
    fn from(v: RemoteApiVerifier) -> Self {
        Self::RemoteApi(v)
    }
}

impl From<TrustIssuerVerifier> for AnyVerifier {
    fn from(v: TrustIssuerVerifier) -> Self {
        Self::TrustIssuer(v)
    }
}

impl From<SignatureVerifier> for AnyVerifier {
    fn from(v: SignatureVerifier) -> Self {
        Self::Signature(v)
    }
}
