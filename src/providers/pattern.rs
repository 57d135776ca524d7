//! Syntactic domain-name checker

use std::sync::OnceLock;

use regex::Regex;

use super::{DomainExistenceChecker, ProviderResult};

fn domain_regex() -> &'static Regex {
    static DOMAIN: OnceLock<Regex> = OnceLock::new();
    DOMAIN.get_or_init(|| {
        Regex::new(r"(?i)^(?:[a-z0-9-]{1,61}\.)*[a-z0-9-]{1,61}\.[a-z0-9]{2,7}$").expect("domain pattern is valid")
    })
}

/// Treats any well-formed `(sub.)*label.tld` name as existing.
///
/// Labels are 1 to 61 characters, the TLD 2 to 7 alphanumerics. No lookup is
/// performed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternDomainChecker;

impl PatternDomainChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn is_well_formed(domain: &str) -> bool {
        domain_regex().is_match(domain)
    }
}

impl DomainExistenceChecker for PatternDomainChecker {
    fn exists(&self, domain: &str) -> ProviderResult<bool> {
        Ok(Self::is_well_formed(domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_domains() {
        for domain in ["google.com", "chcfl.org", "mail.sub.example.co", "GO.DEV", "a-b.io"] {
            assert!(PatternDomainChecker::is_well_formed(domain), "{}", domain);
        }
    }

    #[test]
    fn test_malformed_domains() {
        for domain in ["apple", "", ".com", "example.c", "example.toolongtld", "ex ample.com", "example..com"] {
            assert!(!PatternDomainChecker::is_well_formed(domain), "{}", domain);
        }
    }

    #[test]
    fn test_label_length_limit() {
        let ok = format!("{}.com", "a".repeat(61));
        let too_long = format!("{}.com", "a".repeat(62));
        assert!(PatternDomainChecker::is_well_formed(&ok));
        assert!(!PatternDomainChecker::is_well_formed(&too_long));
    }

    #[test]
    fn test_exists_never_fails() {
        let checker = PatternDomainChecker::new();
        assert_eq!(checker.exists("google.com"), Ok(true));
        assert_eq!(checker.exists("apple"), Ok(false));
    }
}
