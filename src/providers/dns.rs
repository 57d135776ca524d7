//! DNS-backed domain existence checker
//!
//! A domain exists when it publishes at least one of:
//! 1. An MX record
//! 2. An SPF policy (`v=spf1` TXT record)
//! 3. A DMARC policy (`v=DMARC1` TXT record at `_dmarc.<domain>`)
//!
//! Lookups go through [`DnsResolver`]; the crate ships no network resolver.
//! A non-existent name (NXDOMAIN) answers `false`, a transport failure
//! answers `Err`.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, warn};

use super::{DomainExistenceChecker, ProviderError, ProviderResult};

const PROVIDER: &str = "dns";

/// Resolver failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    /// NXDOMAIN: the name does not exist
    #[error("no such domain")]
    NoSuchDomain,

    /// The name exists but has no records of the requested type
    #[error("no records")]
    NoRecords,

    /// The lookup itself failed
    #[error("lookup failed: {0}")]
    Transport(String),
}

/// Minimal resolver interface used by [`DnsDomainChecker`]
pub trait DnsResolver: Send + Sync {
    /// Mail exchanger host names for `domain`
    fn lookup_mx(&self, domain: &str) -> Result<Vec<String>, DnsError>;

    /// TXT record strings for `name`
    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError>;
}

/// Existence checker over MX, SPF and DMARC records
#[derive(Debug, Clone)]
pub struct DnsDomainChecker<R> {
    resolver: R,
}

impl<R: DnsResolver> DnsDomainChecker<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    fn txt_records(&self, name: &str) -> ProviderResult<Vec<String>> {
        match self.resolver.lookup_txt(name) {
            Ok(records) => Ok(records),
            Err(DnsError::NoSuchDomain | DnsError::NoRecords) => Ok(Vec::new()),
            Err(DnsError::Transport(reason)) => Err(unavailable(name, reason)),
        }
    }
}

fn unavailable(name: &str, reason: String) -> ProviderError {
    warn!(name, %reason, "dns lookup failed");
    ProviderError::unavailable(PROVIDER, format!("{}: {}", name, reason))
}

fn has_prefix_ignore_case(record: &str, prefix: &str) -> bool {
    record
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

impl<R: DnsResolver> DomainExistenceChecker for DnsDomainChecker<R> {
    fn exists(&self, domain: &str) -> ProviderResult<bool> {
        match self.resolver.lookup_mx(domain) {
            Ok(hosts) if !hosts.is_empty() => {
                debug!(domain, mx = hosts.len(), "domain has mx records");
                return Ok(true);
            }
            Ok(_) | Err(DnsError::NoRecords) => {}
            Err(DnsError::NoSuchDomain) => {
                debug!(domain, "no such domain");
                return Ok(false);
            }
            Err(DnsError::Transport(reason)) => return Err(unavailable(domain, reason)),
        }

        let spf = self
            .txt_records(domain)?
            .iter()
            .any(|record| has_prefix_ignore_case(record, "v=spf1"));
        if spf {
            debug!(domain, "domain has spf record");
            return Ok(true);
        }

        let dmarc_name = format!("_dmarc.{}", domain);
        let dmarc = self
            .txt_records(&dmarc_name)?
            .iter()
            .any(|record| has_prefix_ignore_case(record, "v=DMARC1"));
        debug!(domain, dmarc, "domain checked for dmarc record");
        Ok(dmarc)
    }
}

/// In-memory resolver with fixed answers.
///
/// Names never configured answer NXDOMAIN; configured names without records
/// of the requested type answer `NoRecords`.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    mx: HashMap<String, Vec<String>>,
    txt: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mx(mut self, domain: &str, hosts: &[&str]) -> Self {
        self.mx
            .insert(domain.to_ascii_lowercase(), hosts.iter().map(|h| h.to_string()).collect());
        self
    }

    pub fn with_txt(mut self, name: &str, records: &[&str]) -> Self {
        self.txt
            .insert(name.to_ascii_lowercase(), records.iter().map(|r| r.to_string()).collect());
        self
    }

    /// Every lookup of `name` fails with a transport error
    pub fn with_failure(mut self, name: &str) -> Self {
        self.failing.insert(name.to_ascii_lowercase());
        self
    }

    fn lookup(&self, table: &HashMap<String, Vec<String>>, name: &str) -> Result<Vec<String>, DnsError> {
        let name = name.to_ascii_lowercase();
        if self.failing.contains(&name) {
            return Err(DnsError::Transport("connection refused".into()));
        }
        if let Some(records) = table.get(&name) {
            return Ok(records.clone());
        }
        if self.mx.contains_key(&name) || self.txt.contains_key(&name) {
            return Err(DnsError::NoRecords);
        }
        Err(DnsError::NoSuchDomain)
    }
}

impl DnsResolver for StaticResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<String>, DnsError> {
        self.lookup(&self.mx, domain)
    }

    fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        self.lookup(&self.txt, name)
    }
}
