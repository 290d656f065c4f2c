//! Credverify Core: data model, error taxonomy, and result shaping shared
//! by every verification strategy.

pub mod error;
pub mod response;
pub mod translator;
pub mod types;

pub use error::{ErrorCategory, VerifierError};
pub use response::ResponseBuilder;
pub use translator::ErrorTranslator;
pub use types::{
    CheckResult, Credential, RawError, TranslatedError, VerificationConfig, VerificationMethod,
    VerificationResult,
};
