//! Suffix rule representation
//!
//! A rule is one line of a Public Suffix List definition. Three kinds exist:
//!
//! - plain (`co.uk`) matches names ending in its labels
//! - wildcard (`*.ck`) additionally consumes one arbitrary label
//! - exception (`!www.ck`) carves a registrable name out of a wildcard
//!
//! Labels are stored most-significant last, the same order a caller
//! produces by splitting a hostname on `.`.

use std::fmt;
use std::str::FromStr;

/// Error type for rule construction and decomposition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Malformed rule definition '{definition}': {reason}")]
    MalformedDefinition {
        definition: String,
        reason: &'static str,
    },
    #[error("Domain not allowed: '{name}' has no registrable label")]
    DomainNotAllowed { name: String },
}

// =============================================================================
// Rule Kind
// =============================================================================

/// Kind of a suffix rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Literal suffix, e.g. `com.ac`
    Plain,
    /// `*.` prefixed suffix, e.g. `*.ar`
    Wildcard,
    /// `!` prefixed suffix, e.g. `!congresodelalengua3.ar`
    Exception,
}

// =============================================================================
// Rule
// =============================================================================

/// A single suffix rule.
#[derive(Debug, Clone)]
pub struct Rule {
    kind: RuleKind,
    definition: String,
    labels: Vec<String>,
}

/// Fallback returned by lookups when no rule matches.
pub(crate) static DEFAULT_RULE: Rule = Rule {
    kind: RuleKind::Plain,
    definition: String::new(),
    labels: Vec::new(),
};

impl Rule {
    /// Build a rule from one definition line.
    pub fn build(definition: &str) -> Result<Self, RuleError> {
        let malformed = |reason| RuleError::MalformedDefinition {
            definition: definition.to_string(),
            reason,
        };

        if definition.is_empty() {
            return Err(malformed("empty definition"));
        }

        let (kind, body) = if let Some(rest) = definition.strip_prefix('!') {
            if rest.is_empty() {
                return Err(malformed("exception marker without a suffix"));
            }
            (RuleKind::Exception, rest)
        } else if definition == "*" {
            (RuleKind::Wildcard, "")
        } else if let Some(rest) = definition.strip_prefix("*.") {
            if rest.is_empty() {
                return Err(malformed("wildcard marker without a suffix"));
            }
            (RuleKind::Wildcard, rest)
        } else if definition.starts_with('*') {
            return Err(malformed("wildcard must be a whole label"));
        } else {
            (RuleKind::Plain, definition)
        };

        let labels = if body.is_empty() {
            Vec::new()
        } else {
            split_labels(body).map_err(malformed)?
        };

        // an exception keeps at least one label as its public suffix
        if kind == RuleKind::Exception && labels.len() < 2 {
            return Err(malformed("exception must have a parent suffix"));
        }

        Ok(Self {
            kind,
            definition: definition.to_string(),
            labels,
        })
    }

    /// The implicit rule used when nothing in a list matches.
    ///
    /// Plain, no labels, length 1: the right-most label of any name is
    /// treated as its public suffix.
    pub fn default_rule() -> Self {
        DEFAULT_RULE.clone()
    }

    /// Check whether this is the implicit fallback rule.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.kind == RuleKind::Plain && self.labels.is_empty()
    }

    #[inline]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Original definition text, marker included.
    #[inline]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Labels after marker removal, TLD last.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of name labels this rule consumes when it matches.
    #[inline]
    pub fn length(&self) -> usize {
        match self.kind {
            RuleKind::Wildcard => self.labels.len() + 1,
            RuleKind::Plain => self.labels.len().max(1),
            RuleKind::Exception => self.labels.len(),
        }
    }

    /// Number of trailing labels that form the public suffix.
    ///
    /// An exception's leftmost label is registrable, so its suffix is one
    /// label shorter than the rule itself.
    #[inline]
    pub fn suffix_length(&self) -> usize {
        match self.kind {
            RuleKind::Exception => self.labels.len() - 1,
            _ => self.length(),
        }
    }

    /// Check whether `name` (labels, TLD last) falls under this rule.
    pub fn matches<S: AsRef<str>>(&self, name: &[S]) -> bool {
        if name.len() < self.length() {
            return false;
        }

        // Compare from the TLD leftwards; the wildcard label is unconstrained.
        self.labels
            .iter()
            .rev()
            .zip(name.iter().rev())
            .all(|(rule_label, name_label)| rule_label == name_label.as_ref())
    }

    /// Split `name` into `(suffix, registrable)` label slices.
    ///
    /// Fails with [`RuleError::DomainNotAllowed`] when the name is its own
    /// public suffix (or shorter) and nothing is left to register.
    pub fn decompose<'n, S: AsRef<str>>(
        &self,
        name: &'n [S],
    ) -> Result<Decomposition<'n, S>, RuleError> {
        let n = name.len();
        let suffix_len = self.suffix_length();

        if suffix_len >= n {
            return Err(RuleError::DomainNotAllowed {
                name: join_labels(name),
            });
        }

        let (registrable, suffix) = name.split_at(n - suffix_len);
        Ok(Decomposition { suffix, registrable })
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.labels == other.labels
    }
}

impl Eq for Rule {}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::build(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.definition)
    }
}

// =============================================================================
// Decomposition
// =============================================================================

/// A name split at its public suffix boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposition<'n, S> {
    /// Trailing labels forming the public suffix
    pub suffix: &'n [S],
    /// Leading labels left of the suffix; never empty
    pub registrable: &'n [S],
}

impl<'n, S: AsRef<str>> Decomposition<'n, S> {
    /// The label directly left of the suffix.
    pub fn registrable_label(&self) -> &'n str {
        let registrable: &'n [S] = self.registrable;
        // non-empty by construction
        registrable[registrable.len() - 1].as_ref()
    }

    /// Labels left of the registrable label, if any.
    pub fn subdomain(&self) -> &'n [S] {
        let registrable: &'n [S] = self.registrable;
        &registrable[..registrable.len() - 1]
    }

    pub fn suffix_string(&self) -> String {
        join_labels(self.suffix)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn split_labels(body: &str) -> Result<Vec<String>, &'static str> {
    body.split('.')
        .map(|label| {
            if label.is_empty() {
                Err("empty label")
            } else if label.contains(['*', '!']) {
                Err("marker inside a label")
            } else if label.contains(char::is_whitespace) {
                Err("whitespace inside a label")
            } else {
                Ok(label.to_string())
            }
        })
        .collect()
}

pub(crate) fn join_labels<S: AsRef<str>>(labels: &[S]) -> String {
    labels
        .iter()
        .map(|label| label.as_ref())
        .collect::<Vec<&str>>()
        .join(".")
}
