//! Public Suffix List definition parser
//!
//! The format is line oriented: one rule per line, `//` comment lines and
//! blank lines ignored. Surrounding whitespace is trimmed before a line is
//! handed to [`Rule::build`].

use crate::rule::{Rule, RuleError};
use crate::rule_list::RuleList;

/// Error raised when a definition line cannot be turned into a rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Line {line}: {source}")]
pub struct ParseError {
    /// 1-based line number in the input text
    pub line: usize,
    #[source]
    pub source: RuleError,
}

/// What to do with a malformed definition line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// Abort parsing at the first malformed line
    #[default]
    Strict,
    /// Skip malformed lines and keep going
    Lenient,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub policy: ParsePolicy,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self { policy: ParsePolicy::Strict }
    }

    pub fn lenient() -> Self {
        Self { policy: ParsePolicy::Lenient }
    }
}

/// Counters collected while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseStats {
    pub lines: usize,
    pub comments: usize,
    pub blank: usize,
    pub rules: usize,
    pub skipped: usize,
}

pub fn parse_rule_list(text: &str, options: &ParseOptions) -> Result<(RuleList, ParseStats), ParseError> {
    let mut list = RuleList::new();
    let mut stats = ParseStats::default();

    for (index, raw_line) in text.lines().enumerate() {
        stats.lines += 1;

        let line = raw_line.trim();
        if line.is_empty() {
            stats.blank += 1;
            continue;
        }
        if is_comment_line(line) {
            stats.comments += 1;
            continue;
        }

        match Rule::build(line) {
            Ok(rule) => {
                list.add(rule);
                stats.rules += 1;
            }
            Err(source) => match options.policy {
                ParsePolicy::Strict => {
                    return Err(ParseError { line: index + 1, source });
                }
                ParsePolicy::Lenient => {
                    log::warn!("skipping line {}: {}", index + 1, source);
                    stats.skipped += 1;
                }
            },
        }
    }

    log::debug!(
        "parsed {} rules from {} lines ({} comments, {} skipped)",
        stats.rules,
        stats.lines,
        stats.comments,
        stats.skipped
    );

    Ok((list, stats))
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with("//")
}
