//! The static table of online verification backends.
//!
//! Backend identifiers supplied by callers are looked up here and nowhere
//! else; there is no name-driven code loading.

use std::collections::BTreeSet;
use std::fmt;

use credverify_core::VerifierError;

use crate::verifier::VerifierKind;

/// A known online backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OnlineBackend {
    /// Generic verification API, unauthenticated, echoes checks.
    Api,
    /// Dhiway trust-issuer service.
    Dhiway,
}

const BACKEND_TABLE: &[(&str, OnlineBackend)] = &[
    ("api", OnlineBackend::Api),
    ("dhiway", OnlineBackend::Dhiway),
];

impl OnlineBackend {
    /// Every backend in the table.
    pub fn all() -> impl Iterator<Item = OnlineBackend> {
        BACKEND_TABLE.iter().map(|(_, backend)| *backend)
    }

    /// Canonical identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Dhiway => "dhiway",
        }
    }

    /// Strategy constructed for this backend.
    pub fn kind(&self) -> VerifierKind {
        match self {
            Self::Api => VerifierKind::RemoteApi,
            Self::Dhiway => VerifierKind::TrustIssuer,
        }
    }

    /// Resolve an identifier. Only ASCII letters are accepted; matching
    /// ignores case.
    pub fn lookup(name: &str) -> Result<Self, VerifierError> {
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(VerifierError::InvalidVerifierName(name.to_string()));
        }
        BACKEND_TABLE
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(name))
            .map(|(_, backend)| *backend)
            .ok_or_else(|| VerifierError::UnknownVerifier(name.to_string()))
    }
}

impl fmt::Display for OnlineBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The subset of backends a factory is allowed to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRegistry {
    enabled: BTreeSet<OnlineBackend>,
}

impl BackendRegistry {
    /// Every known backend enabled.
    pub fn all() -> Self {
        Self {
            enabled: OnlineBackend::all().collect(),
        }
    }

    /// Enable only the named backends. Unknown names are rejected up front.
    pub fn with_enabled<I, S>(names: I) -> Result<Self, VerifierError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let enabled = names
            .into_iter()
            .map(|name| OnlineBackend::lookup(name.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { enabled })
    }

    pub fn is_enabled(&self, backend: OnlineBackend) -> bool {
        self.enabled.contains(&backend)
    }

    pub fn enabled(&self) -> impl Iterator<Item = OnlineBackend> + '_ {
        self.enabled.iter().copied()
    }

    /// Resolve a caller-supplied identifier. Disabled backends are reported
    /// exactly like unknown ones.
    pub fn resolve(&self, name: &str) -> Result<OnlineBackend, VerifierError> {
        let backend = OnlineBackend::lookup(name)?;
        if self.is_enabled(backend) {
            Ok(backend)
        } else {
            Err(VerifierError::UnknownVerifier(name.to_string()))
        }
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::all()
    }
}
