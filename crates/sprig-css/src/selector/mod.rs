//! CSS selector syntax: tree types and the text parser.
//!
//! This module implements selector parsing per
//! [Selectors Level 3](https://www.w3.org/TR/selectors-3/) with namespace
//! prefixes from [CSS Namespaces](https://www.w3.org/TR/css-namespaces-3/).

pub mod ast;
pub mod parser;

use std::collections::HashMap;

pub use ast::{
    AttributeOperator, AttributeSelector, CombinedSelector, Combinator, CompoundSelector,
    FunctionalPseudoClassSelector, ParsedSelector, SelectorNode, SimpleSelector, Specificity,
};
pub use parser::parse;

/// [CSS Namespaces § 3](https://www.w3.org/TR/css-namespaces-3/#declaration)
///
/// The declarations an `@namespace` block would provide: an optional default
/// namespace for type selectors and a prefix table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceMap {
    /// Namespace URL applied to type selectors without a prefix.
    pub default: Option<String>,
    /// Prefix to namespace URL.
    pub prefixes: HashMap<String, String>,
}

impl NamespaceMap {
    /// An empty table with no default namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default namespace.
    #[must_use]
    pub fn with_default(mut self, url: impl Into<String>) -> Self {
        self.default = Some(url.into());
        self
    }

    /// Declare `prefix` as `url`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, url: impl Into<String>) -> Self {
        let _ = self.prefixes.insert(prefix.into(), url.into());
        self
    }

    /// Look up a declared prefix.
    #[must_use]
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }
}
