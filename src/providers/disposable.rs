//! Disposable-domain block list

use std::collections::HashSet;
use std::sync::RwLock;

use tracing::debug;

use super::DisposableDomainClassifier;

/// Domains treated as disposable out of the box
pub const DEFAULT_DISPOSABLE_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.co",
    "example.net",
    "test.com",
    "test.org",
    "mailinator.com",
    "guerrillamail.com",
    "10minutemail.com",
    "yopmail.com",
    "trashmail.com",
    "temp-mail.org",
];

/// Case-insensitive, exact-match block list.
///
/// Extra domains can be added while the list is shared; lookups and
/// registrations synchronize on an internal lock.
#[derive(Debug)]
pub struct DisposableBlockList {
    domains: RwLock<HashSet<String>>,
}

impl DisposableBlockList {
    /// Block list with no domains
    pub fn empty() -> Self {
        Self {
            domains: RwLock::new(HashSet::new()),
        }
    }

    /// Adds domains at construction time
    pub fn with_domains<I, S>(self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.register(domains);
        self
    }

    /// Adds domains to a list that may already be shared
    pub fn register<I, S>(&self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = self.domains.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = set.len();
        set.extend(domains.into_iter().map(|d| normalize(d.as_ref())));
        debug!(added = set.len() - before, total = set.len(), "disposable domains registered");
    }

    pub fn len(&self) -> usize {
        self.domains.read().map(|set| set.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DisposableBlockList {
    fn default() -> Self {
        Self::empty().with_domains(DEFAULT_DISPOSABLE_DOMAINS)
    }
}

fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

impl DisposableDomainClassifier for DisposableBlockList {
    fn is_disposable(&self, domain: &str) -> bool {
        let set = self.domains.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        set.contains(&normalize(domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_default_list() {
        let list = DisposableBlockList::default();
        assert!(list.is_disposable("example.com"));
        assert!(list.is_disposable("test.org"));
        assert!(!list.is_disposable("chcfl.org"));
        assert!(!list.is_disposable("gmail.com"));
        assert_eq!(list.len(), DEFAULT_DISPOSABLE_DOMAINS.len());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let list = DisposableBlockList::default();
        assert!(list.is_disposable("Example.COM"));
        assert!(list.is_disposable("example.com."));
    }

    #[test]
    fn test_subdomains_are_not_matched() {
        let list = DisposableBlockList::default();
        assert!(!list.is_disposable("mail.example.com"));
    }

    #[test]
    fn test_with_domains_extends_list() {
        let list = DisposableBlockList::empty().with_domains(["throwaway.io"]);
        assert!(list.is_disposable("throwaway.io"));
        assert!(!list.is_disposable("example.com"));
    }

    #[test]
    fn test_register_while_shared() {
        let list = Arc::new(DisposableBlockList::default());

        let writer = {
            let list = Arc::clone(&list);
            thread::spawn(move || list.register(["burner.dev"]))
        };
        let reader = {
            let list = Arc::clone(&list);
            thread::spawn(move || list.is_disposable("example.com"))
        };

        writer.join().unwrap();
        assert!(reader.join().unwrap());
        assert!(list.is_disposable("burner.dev"));
    }
}
