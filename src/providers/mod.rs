//! External providers consulted by the email and domain rules
//!
//! The engine depends only on the traits below. Implementations are injected
//! into [`crate::engine::Validator`] and shared across validations, so every
//! implementation must be `Send + Sync` and synchronize its own state.
//!
//! Shipped implementations:
//! - [`RegexEmailChecker`]: local email syntax check
//! - [`PatternDomainChecker`]: syntactic domain-name check
//! - [`DnsDomainChecker`]: MX / SPF / DMARC existence check over a [`DnsResolver`]
//! - [`DisposableBlockList`]: configurable disposable-domain list

mod disposable;
mod dns;
mod email;
mod pattern;

pub use disposable::{DisposableBlockList, DEFAULT_DISPOSABLE_DOMAINS};
pub use dns::{DnsDomainChecker, DnsError, DnsResolver, StaticResolver};
pub use email::RegexEmailChecker;
pub use pattern::PatternDomainChecker;

use thiserror::Error;

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider failures. Never a statement about the data being checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not answer (network failure, timeout, ...)
    #[error("{provider} unavailable: {reason}")]
    Unavailable {
        provider: &'static str,
        reason: String,
    },
}

impl ProviderError {
    pub fn unavailable(provider: &'static str, reason: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            provider,
            reason: reason.into(),
        }
    }

    /// Name of the failing provider
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderError::Unavailable { provider, .. } => provider,
        }
    }
}

/// Options forwarded to the email checker on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Whether catch-all mailbox detection should run
    pub catch_all: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self { catch_all: true }
    }
}

/// Outcome of an email syntax check
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmailSyntax {
    pub valid: bool,
    /// Local part, empty when invalid
    pub username: String,
    /// Domain part, lowercased, empty when invalid
    pub domain: String,
}

impl EmailSyntax {
    pub fn invalid() -> Self {
        Self::default()
    }
}

/// Checks the syntax of an email address
pub trait EmailSyntaxChecker: Send + Sync {
    /// Verify an address.
    ///
    /// # Returns
    /// * `Ok(EmailSyntax)` - Syntax verdict and the address parts
    /// * `Err(ProviderError)` - If the check could not be performed
    fn verify(&self, address: &str, options: &VerifyOptions) -> ProviderResult<EmailSyntax>;
}

/// Decides whether a domain exists
pub trait DomainExistenceChecker: Send + Sync {
    /// `Ok(false)` means the domain does not exist; a lookup failure must be
    /// reported as `Err`, never as `Ok(false)`.
    fn exists(&self, domain: &str) -> ProviderResult<bool>;
}

/// Classifies disposable (throwaway) email domains
pub trait DisposableDomainClassifier: Send + Sync {
    fn is_disposable(&self, domain: &str) -> bool;
}
