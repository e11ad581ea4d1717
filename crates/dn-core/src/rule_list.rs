//! Ordered rule container and governing-rule selection
//!
//! Selection follows the Public Suffix List algorithm:
//!
//! 1. Collect every rule matching the name ([`RuleList::select`]).
//! 2. If any exception rule matches, it wins (longest first).
//! 3. Otherwise the longest plain or wildcard rule wins.
//! 4. If nothing matches, the implicit `*` equivalent ([`Rule::default_rule`])
//!    governs, so [`RuleList::find`] never comes back empty.
//!
//! Ties go to the rule that appears first in the list.

use std::ops::ShlAssign;

use crate::parser::{parse_rule_list, ParseError, ParseOptions, ParseStats};
use crate::rule::{Decomposition, Rule, RuleError, RuleKind, DEFAULT_RULE};

/// Ordered list of suffix rules. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleList {
    rules: Vec<Rule>,
}

impl RuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a definition with the default (strict) policy.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_rule_list(text, &ParseOptions::default()).map(|(list, _)| list)
    }

    /// Parse a definition with explicit options, returning parse counters.
    pub fn parse_with(text: &str, options: &ParseOptions) -> Result<(Self, ParseStats), ParseError> {
        parse_rule_list(text, options)
    }

    /// Append a rule; returns the list for chaining.
    pub fn add(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Remove every rule; returns the list for chaining.
    pub fn clear(&mut self) -> &mut Self {
        self.rules.clear();
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Every rule matching `name`, in list order.
    pub fn select<S: AsRef<str>>(&self, name: &[S]) -> Vec<&Rule> {
        self.rules.iter().filter(|rule| rule.matches(name)).collect()
    }

    /// The rule governing `name`.
    pub fn find<S: AsRef<str>>(&self, name: &[S]) -> &Rule {
        let candidates = self.select(name);

        let exception = longest(
            candidates
                .iter()
                .copied()
                .filter(|rule| rule.kind() == RuleKind::Exception),
        );

        exception
            .or_else(|| longest(candidates.iter().copied()))
            .unwrap_or(&DEFAULT_RULE)
    }

    /// Split `name` at the boundary set by its governing rule.
    pub fn decompose<'n, S: AsRef<str>>(
        &self,
        name: &'n [S],
    ) -> Result<Decomposition<'n, S>, RuleError> {
        self.find(name).decompose(name)
    }
}

/// Longest rule, first one wins on ties.
fn longest<'a>(rules: impl Iterator<Item = &'a Rule>) -> Option<&'a Rule> {
    rules.fold(None::<&'a Rule>, |best, rule| match best {
        Some(current) if current.length() >= rule.length() => Some(current),
        _ => Some(rule),
    })
}

impl ShlAssign<Rule> for RuleList {
    fn shl_assign(&mut self, rule: Rule) {
        self.add(rule);
    }
}

impl Extend<Rule> for RuleList {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        self.rules.extend(iter);
    }
}

impl FromIterator<Rule> for RuleList {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl IntoIterator for RuleList {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}
