//! Local email syntax checker

use std::sync::OnceLock;

use regex::Regex;

use super::{EmailSyntax, EmailSyntaxChecker, ProviderResult, VerifyOptions};

/// Maximum address length (RFC 5321 path limit)
const MAX_ADDRESS_LEN: usize = 254;

/// Maximum local-part length
const MAX_LOCAL_LEN: usize = 64;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is valid")
    })
}

/// Syntax-only email checker.
///
/// Never performs I/O, so it never returns a provider error. Catch-all
/// detection needs an SMTP probe and is not performed; the option is
/// accepted and ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexEmailChecker;

impl RegexEmailChecker {
    pub fn new() -> Self {
        Self
    }
}

impl EmailSyntaxChecker for RegexEmailChecker {
    fn verify(&self, address: &str, _options: &VerifyOptions) -> ProviderResult<EmailSyntax> {
        if address.len() > MAX_ADDRESS_LEN || !email_regex().is_match(address) {
            return Ok(EmailSyntax::invalid());
        }

        let Some((username, domain)) = address.rsplit_once('@') else {
            return Ok(EmailSyntax::invalid());
        };

        if username.len() > MAX_LOCAL_LEN {
            return Ok(EmailSyntax::invalid());
        }

        Ok(EmailSyntax {
            valid: true,
            username: username.to_string(),
            domain: domain.to_ascii_lowercase(),
        })
    }
}
