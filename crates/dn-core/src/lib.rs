//! Public Suffix rule engine
//!
//! This crate decides which Public Suffix List rule governs a domain name and
//! where the registrable part of the name ends.
//!
//! # Architecture
//!
//! A registry definition (PSL text) is parsed line by line into a
//! [`RuleList`]. Lookups take the queried name as a label sequence, TLD
//! last, and return the governing [`Rule`] using longest match with
//! exception override. Name normalization (IDNA, case folding beyond ASCII)
//! is left to the caller.
//!
//! # Modules
//!
//! - `rule`: Rule kinds, construction and per-rule matching
//! - `rule_list`: Ordered rule container and governing-rule selection
//! - `parser`: Line-oriented definition parser
//! - `registry`: Lazily-built default list with reload support
//! - `domain`: Hostname tokenization and registrable-domain split
//! - `cache`: LRU cache for registrable-domain lookups

pub mod cache;
pub mod domain;
pub mod parser;
pub mod registry;
pub mod rule;
pub mod rule_list;

// Re-export commonly used types
pub use domain::{DomainError, DomainName, DomainParts};
pub use parser::{ParseError, ParseOptions, ParsePolicy, ParseStats};
pub use registry::{DefinitionSource, FnDefinition, Registry, RegistryConfig, RegistryError};
#[cfg(feature = "bundled")]
pub use registry::BundledDefinition;
pub use rule::{Decomposition, Rule, RuleError, RuleKind};
pub use rule_list::RuleList;
