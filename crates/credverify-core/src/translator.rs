//! Translation of backend error wording into stable user-facing messages.
//!
//! Backend messages are unstable and occasionally leak implementation
//! detail, so callers only ever see the translated text. The original
//! wording travels alongside in [`TranslatedError::raw`].

use std::collections::HashMap;

use crate::types::{RawError, TranslatedError};

/// Returned for any backend message missing from the table.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred during verification.";

/// Raw text used when a backend error entry carries no message.
pub const MISSING_RAW_MESSAGE: &str = "An unknown error occurred";

/// Raw text used when a failed backend check carries no label.
pub const UNLABELLED_CHECK_MESSAGE: &str = "Unknown error in check";

const BUILTIN_TRANSLATIONS: &[(&str, &str)] = &[
    (
        "verifyDisclosed Attribute",
        "Some information in the credential couldn't be verified. Please ensure the credential is complete and hasn't been modified.",
    ),
    (
        "Failed to verify CordProof2024",
        "The credential's authenticity couldn't be verified. It may be expired, revoked, altered, or issued by an untrusted source.",
    ),
    (
        "Error verifyDisclosedAttributes",
        "Some information in the credential couldn't be verified. Please ensure the credential is complete and hasn't been modified.",
    ),
    (
        UNLABELLED_CHECK_MESSAGE,
        "An unexpected issue occurred during credential verification. Please try again later.",
    ),
];

/// Maps raw backend messages to human-readable explanations.
#[derive(Debug, Clone)]
pub struct ErrorTranslator {
    table: HashMap<String, String>,
}

impl ErrorTranslator {
    /// A translator seeded with the built-in table.
    pub fn new() -> Self {
        let table = BUILTIN_TRANSLATIONS
            .iter()
            .map(|(raw, friendly)| (raw.to_string(), friendly.to_string()))
            .collect();
        Self { table }
    }

    /// Add or replace a single entry.
    pub fn with_entry(mut self, raw: impl Into<String>, friendly: impl Into<String>) -> Self {
        self.table.insert(raw.into(), friendly.into());
        self
    }

    /// Merge extra entries over the current table.
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (raw, friendly) in entries {
            self.table.insert(raw.into(), friendly.into());
        }
    }

    /// Number of known messages.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Translate a raw backend message. Never returns the raw text itself
    /// unless the table explicitly maps it to itself.
    pub fn translate(&self, raw_message: &str) -> &str {
        match self.table.get(raw_message) {
            Some(friendly) => friendly,
            None => {
                tracing::debug!(raw = raw_message, "no translation for backend message");
                UNKNOWN_ERROR_MESSAGE
            }
        }
    }

    /// Translate a raw message and pair it with the original.
    pub fn translate_message(&self, raw_message: &str) -> TranslatedError {
        TranslatedError::new(self.translate(raw_message), raw_message)
    }

    /// Translate a backend error entry, filling in a placeholder for missing
    /// or empty text.
    pub fn translate_error(&self, error: &RawError) -> TranslatedError {
        let raw = error
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(MISSING_RAW_MESSAGE);
        self.translate_message(raw)
    }
}

impl Default for ErrorTranslator {
    fn default() -> Self {
        Self::new()
    }
}
