//! Domain name tokenization and registrable-domain split
//!
//! ```
//! use dn_core::{DomainName, RuleList};
//!
//! let list = RuleList::parse("com\n*.uk\n").unwrap();
//! let name = DomainName::parse("www.google.co.uk").unwrap();
//! let parts = name.split(&list).unwrap();
//!
//! assert_eq!(parts.tld, "co.uk");
//! assert_eq!(parts.sld, "google");
//! assert_eq!(parts.domain(), "google.co.uk");
//! ```
//!
//! Only ASCII lowercasing is applied. Internationalized names must be
//! converted to their A-label form by the caller.

use std::fmt;
use std::str::FromStr;

use crate::rule_list::RuleList;

/// Error type for domain name handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Empty domain name")]
    Empty,
    #[error("Invalid label in '{name}'")]
    InvalidLabel { name: String },
    #[error("Domain not allowed: '{name}' is a public suffix")]
    NotAllowed { name: String },
}

// =============================================================================
// Domain Name
// =============================================================================

/// A tokenized hostname, labels TLD last.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName {
    name: String,
    labels: Vec<String>,
}

impl DomainName {
    /// Tokenize `host`: one trailing dot is dropped and ASCII is lowercased.
    pub fn parse(host: &str) -> Result<Self, DomainError> {
        let host = host.trim();
        let host = host.strip_suffix('.').unwrap_or(host);
        if host.is_empty() {
            return Err(DomainError::Empty);
        }

        let name = host.to_ascii_lowercase();
        let labels: Vec<String> = name.split('.').map(str::to_string).collect();

        if labels
            .iter()
            .any(|label| label.is_empty() || label.contains(char::is_whitespace))
        {
            return Err(DomainError::InvalidLabel { name });
        }

        Ok(Self { name, labels })
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Split into public suffix, registrable label and subdomain.
    pub fn split(&self, list: &RuleList) -> Result<DomainParts, DomainError> {
        // decomposition only fails when the name is its own public suffix
        let parts = list
            .decompose(&self.labels)
            .map_err(|_| DomainError::NotAllowed {
                name: self.name.clone(),
            })?;

        let subdomain = parts.subdomain();
        Ok(DomainParts {
            tld: parts.suffix_string(),
            sld: parts.registrable_label().to_string(),
            trd: (!subdomain.is_empty()).then(|| subdomain.join(".")),
        })
    }

    /// Every suffix of the name, longest first: `a.b.c`, `b.c`, `c`.
    pub fn suffixes(&self) -> SuffixIter<'_> {
        SuffixIter {
            current: &self.name,
            min_len: 0,
        }
    }

    /// Suffixes from the full name down to its registrable domain.
    pub fn walk_to_registrable(&self, list: &RuleList) -> Result<SuffixIter<'_>, DomainError> {
        let parts = self.split(list)?;
        Ok(SuffixIter {
            current: &self.name,
            min_len: parts.domain().len(),
        })
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// =============================================================================
// Domain Parts
// =============================================================================

/// A name split at its public suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts {
    /// Public suffix, e.g. `co.uk`
    pub tld: String,
    /// Registrable label, e.g. `google`
    pub sld: String,
    /// Remaining subdomain labels, e.g. `www`
    pub trd: Option<String>,
}

impl DomainParts {
    /// Registrable domain (eTLD+1).
    pub fn domain(&self) -> String {
        format!("{}.{}", self.sld, self.tld)
    }

    /// Full name when a subdomain is present.
    pub fn subdomain(&self) -> Option<String> {
        self.trd
            .as_ref()
            .map(|trd| format!("{}.{}.{}", trd, self.sld, self.tld))
    }
}

// =============================================================================
// Suffix Walking
// =============================================================================

/// Strip the leftmost label.
pub fn parent_domain(host: &str) -> Option<&str> {
    match host.find('.') {
        Some(idx) if idx < host.len() - 1 => Some(&host[idx + 1..]),
        _ => None,
    }
}

/// Iterator over successively shorter suffixes of a name.
pub struct SuffixIter<'a> {
    current: &'a str,
    min_len: usize,
}

impl<'a> Iterator for SuffixIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_empty() || self.current.len() < self.min_len {
            return None;
        }

        let result = self.current;
        self.current = match parent_domain(self.current) {
            Some(parent) if parent.len() >= self.min_len => parent,
            _ => "",
        };

        Some(result)
    }
}

/// Check whether two hosts share a registrable domain under `list`.
pub fn is_same_site(list: &RuleList, a: &str, b: &str) -> Result<bool, DomainError> {
    let a = DomainName::parse(a)?.split(list)?;
    let b = DomainName::parse(b)?.split(list)?;
    Ok(a.tld == b.tld && a.sld == b.sld)
}
