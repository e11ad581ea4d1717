//! Default rule list registry
//!
//! [`Registry`] owns the lazily-built "default" rule list. The list is parsed
//! from a [`DefinitionSource`] on first access and cached until it is
//! cleared, overridden or reloaded. Callers hold the registry explicitly;
//! nothing here is process-global.
//!
//! # Examples
//!
//! ```
//! use dn_core::Registry;
//!
//! let mut registry = Registry::new("com\n*.uk\n!bl.uk\n");
//! assert!(!registry.is_initialized());
//!
//! let list = registry.default_list().unwrap();
//! assert_eq!(list.len(), 3);
//! assert!(registry.is_initialized());
//!
//! assert_eq!(registry.registrable_domain("www.google.co.uk").unwrap(), "google.co.uk");
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::cache::LruCache;
use crate::domain::{DomainError, DomainName};
use crate::parser::{ParseError, ParseOptions};
use crate::rule_list::RuleList;

/// Error type for registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to parse registry definition: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

// =============================================================================
// Definition Sources
// =============================================================================

/// Supplies the registry text the default list is built from.
pub trait DefinitionSource {
    fn definition(&self) -> Cow<'static, str>;
}

impl DefinitionSource for &'static str {
    fn definition(&self) -> Cow<'static, str> {
        Cow::Borrowed(*self)
    }
}

impl DefinitionSource for String {
    fn definition(&self) -> Cow<'static, str> {
        Cow::Owned(self.clone())
    }
}

/// Source backed by a closure, re-invoked on every build.
pub struct FnDefinition<F>(pub F);

impl<F> DefinitionSource for FnDefinition<F>
where
    F: Fn() -> String,
{
    fn definition(&self) -> Cow<'static, str> {
        Cow::Owned((self.0)())
    }
}

/// Registry snapshot embedded at build time.
#[cfg(feature = "bundled")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledDefinition;

#[cfg(feature = "bundled")]
impl BundledDefinition {
    pub const TEXT: &'static str = include_str!("../data/public_suffix_list.dat");
}

#[cfg(feature = "bundled")]
impl DefinitionSource for BundledDefinition {
    fn definition(&self) -> Cow<'static, str> {
        Cow::Borrowed(Self::TEXT)
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Registry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Options used whenever the default list is (re)built
    pub parse: ParseOptions,
    /// Entries kept in the registrable-domain cache; 0 disables it
    pub cache_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            cache_capacity: 4096,
        }
    }
}

/// Handle owning the lazily-built default rule list.
pub struct Registry {
    source: Box<dyn DefinitionSource>,
    config: RegistryConfig,
    list: Option<Arc<RuleList>>,
    cache: LruCache<String, String>,
}

impl Registry {
    pub fn new(source: impl DefinitionSource + 'static) -> Self {
        Self::with_config(source, RegistryConfig::default())
    }

    pub fn with_config(source: impl DefinitionSource + 'static, config: RegistryConfig) -> Self {
        Self {
            source: Box::new(source),
            config,
            list: None,
            cache: LruCache::new(config.cache_capacity),
        }
    }

    /// Registry backed by the embedded snapshot.
    #[cfg(feature = "bundled")]
    pub fn bundled() -> Self {
        Self::new(BundledDefinition)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Whether the default list has been built (or set) and not cleared.
    pub fn is_initialized(&self) -> bool {
        self.list.is_some()
    }

    /// The default list, built from the source on first access.
    pub fn default_list(&mut self) -> Result<Arc<RuleList>, ParseError> {
        if let Some(list) = &self.list {
            return Ok(Arc::clone(list));
        }

        let list = Arc::new(self.build()?);
        self.list = Some(Arc::clone(&list));
        Ok(list)
    }

    /// Override the cached list; `None` clears it.
    pub fn set_default(&mut self, list: Option<RuleList>) {
        self.cache.clear();
        self.list = list.map(Arc::new);
    }

    /// Drop the cached list so the next access rebuilds it.
    pub fn clear(&mut self) {
        log::debug!("clearing default rule list");
        self.cache.clear();
        self.list = None;
    }

    /// Re-read the source and replace the cached list.
    ///
    /// On a parse failure the registry is left cleared.
    pub fn reload(&mut self) -> Result<Arc<RuleList>, ParseError> {
        self.clear();
        let list = self.default_list()?;
        log::info!("reloaded default rule list ({} rules)", list.len());
        Ok(list)
    }

    /// Registrable domain (eTLD+1) of `host` under the default list.
    pub fn registrable_domain(&mut self, host: &str) -> Result<String, RegistryError> {
        let name = DomainName::parse(host)?;
        if let Some(cached) = self.cache.get(name.as_str()) {
            return Ok(cached.clone());
        }

        let list = self.default_list()?;
        let domain = name.split(&list)?.domain();
        self.cache.insert(name.as_str().to_string(), domain.clone());
        Ok(domain)
    }

    /// Check whether two hosts share a registrable domain.
    pub fn is_same_site(&mut self, a: &str, b: &str) -> Result<bool, RegistryError> {
        Ok(self.registrable_domain(a)? == self.registrable_domain(b)?)
    }

    fn build(&self) -> Result<RuleList, ParseError> {
        let text = self.source.definition();
        let (list, stats) = RuleList::parse_with(&text, &self.config.parse)?;
        log::debug!(
            "built default rule list: {} rules, {} skipped",
            stats.rules,
            stats.skipped
        );
        Ok(list)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .field("cached_lookups", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::rule::Rule;

    const SOURCE: &str = "\
// com
com
// uk
*.uk
!british-library.uk
";

    #[test]
    fn test_default_is_lazy() {
        let mut registry = Registry::new(SOURCE);
        assert!(!registry.is_initialized());
        registry.default_list().unwrap();
        assert!(registry.is_initialized());
    }

    #[test]
    fn test_default_is_cached() {
        let mut registry = Registry::new(SOURCE);
        let first = registry.default_list().unwrap();
        let second = registry.default_list().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, RuleList::parse(SOURCE).unwrap());
    }

    #[test]
    fn test_set_default() {
        let mut registry = Registry::new(SOURCE);
        registry.default_list().unwrap();
        registry.set_default(None);
        assert!(!registry.is_initialized());

        let mut custom = RuleList::new();
        custom.add(Rule::build("net").unwrap());
        registry.set_default(Some(custom.clone()));
        assert!(registry.is_initialized());
        assert_eq!(*registry.default_list().unwrap(), custom);
    }

    #[test]
    fn test_clear() {
        let mut registry = Registry::new(SOURCE);
        registry.default_list().unwrap();
        registry.clear();
        assert!(!registry.is_initialized());
        assert_eq!(registry.default_list().unwrap().len(), 3);
    }

    #[test]
    fn test_reload_reads_source_again() {
        let text = Rc::new(RefCell::new(SOURCE.to_string()));
        let source = {
            let text = Rc::clone(&text);
            move || text.borrow().clone()
        };

        let mut registry = Registry::new(FnDefinition(source));
        assert_eq!(registry.default_list().unwrap().len(), 3);

        *text.borrow_mut() = String::new();
        assert_eq!(registry.default_list().unwrap().len(), 3);

        let reloaded = registry.reload().unwrap();
        assert_eq!(*reloaded, RuleList::new());
        assert_eq!(*registry.default_list().unwrap(), RuleList::new());
    }

    #[test]
    fn test_reload_failure_leaves_cleared() {
        let text = Rc::new(RefCell::new(SOURCE.to_string()));
        let source = {
            let text = Rc::clone(&text);
            move || text.borrow().clone()
        };

        let mut registry = Registry::new(FnDefinition(source));
        registry.default_list().unwrap();
        *text.borrow_mut() = "com\n*.\n".to_string();
        assert!(registry.reload().is_err());
        assert!(!registry.is_initialized());
    }

    #[test]
    fn test_lenient_config() {
        let config = RegistryConfig {
            parse: ParseOptions::lenient(),
            ..RegistryConfig::default()
        };
        let mut registry = Registry::with_config("com\n!\nnet\n", config);
        assert_eq!(registry.default_list().unwrap().len(), 2);
    }

    #[test]
    fn test_registrable_domain() {
        let mut registry = Registry::new(SOURCE);
        assert_eq!(registry.registrable_domain("WWW.Google.com").unwrap(), "google.com");
        assert_eq!(registry.registrable_domain("foo.google.co.uk").unwrap(), "google.co.uk");
        assert_eq!(registry.registrable_domain("british-library.uk").unwrap(), "british-library.uk");
        assert!(matches!(
            registry.registrable_domain("co.uk"),
            Err(RegistryError::Domain(DomainError::NotAllowed { .. }))
        ));
        assert!(matches!(registry.registrable_domain(""), Err(RegistryError::Domain(DomainError::Empty))));
    }

    #[test]
    fn test_registrable_domain_cache_reset_on_reload() {
        let text = Rc::new(RefCell::new(SOURCE.to_string()));
        let source = {
            let text = Rc::clone(&text);
            move || text.borrow().clone()
        };

        let mut registry = Registry::new(FnDefinition(source));
        assert_eq!(registry.registrable_domain("a.b.example.com").unwrap(), "example.com");

        *text.borrow_mut() = "com\nexample.com\n".to_string();
        registry.reload().unwrap();
        assert_eq!(registry.registrable_domain("a.b.example.com").unwrap(), "b.example.com");
    }

    #[test]
    fn test_registrable_domain_cache_reset_on_set_default() {
        let mut registry = Registry::new(SOURCE);
        assert_eq!(registry.registrable_domain("a.b.example.com").unwrap(), "example.com");

        registry.set_default(Some(RuleList::parse("com\nexample.com\n").unwrap()));
        assert_eq!(registry.registrable_domain("a.b.example.com").unwrap(), "b.example.com");
    }

    #[test]
    fn test_is_same_site() {
        let mut registry = Registry::new(SOURCE);
        assert!(registry.is_same_site("a.google.com", "b.google.com").unwrap());
        assert!(!registry.is_same_site("google.com", "google.co.uk").unwrap());
    }

    #[test]
    fn test_parse_error_surfaces() {
        let mut registry = Registry::new("com\n*foo\n");
        let err = registry.default_list().unwrap_err();
        assert_eq!(err.line, 2);
        assert!(!registry.is_initialized());
    }

    #[cfg(feature = "bundled")]
    #[test]
    fn test_bundled() {
        let mut registry = Registry::bundled();
        let list = registry.default_list().unwrap();
        assert!(list.len() > 100);
        assert_eq!(registry.registrable_domain("www.example.co.uk").unwrap(), "example.co.uk");
        assert_eq!(registry.registrable_domain("foo.bar.example.com").unwrap(), "example.com");
        assert_eq!(registry.registrable_domain("www.city.kawasaki.jp").unwrap(), "city.kawasaki.jp");
        assert_eq!(registry.registrable_domain("a.b.c.kawasaki.jp").unwrap(), "b.c.kawasaki.jp");
    }
}
