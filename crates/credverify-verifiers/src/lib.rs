//! Credverify Verifiers: the verifier capability, its backend strategies,
//! the factory that selects them, and the verification service.

pub mod backends;
pub mod factory;
pub mod registry;
pub mod service;
pub mod settings;
pub mod transport;
pub mod verifier;

pub use backends::{ExpiryStatus, RemoteApiVerifier, SignatureVerifier, TrustIssuerVerifier};
pub use factory::VerifierFactory;
pub use registry::{BackendRegistry, OnlineBackend};
pub use service::{VerificationRequest, VerificationService};
pub use settings::VerificationSettings;
pub use transport::{TransportError, TRANSPORT_FAILURE_MESSAGE};
pub use verifier::{AnyVerifier, Verifier, VerifierKind};
