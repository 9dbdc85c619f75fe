//! Selector compilation.
//!
//! A parsed selector is compiled once into a [`CompiledSelector`], which can
//! then be applied to any number of elements, from any number of threads.
//!
//! Compilation turns each tree node into a three-state [`Expression`]:
//! always true, always false, or a general [`Predicate`]. Constant parts are
//! folded away, so `a:hover b` compiles to a matcher that never runs and
//! `* > p` only checks the local name and that a parent exists.

pub mod expression;
pub mod predicate;
mod pseudo;

use sprig_dom::Element;

use crate::error::{CompileError, SelectorError};
use crate::selector::{NamespaceMap, ParsedSelector, SimpleSelector, Specificity, parse};

pub use expression::Expression;
pub use predicate::{AttributeTest, NthKind, Predicate};

/// The executable form of a selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Matches every element.
    Always,
    /// Matches no element.
    Never,
    /// Matches when the predicate holds.
    Predicate(Predicate),
}

impl Matcher {
    /// Whether `element` is a subject of the selector.
    #[must_use]
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Predicate(predicate) => predicate.matches(element),
        }
    }
}

impl From<Expression> for Matcher {
    fn from(expression: Expression) -> Self {
        match expression {
            Expression::True => Self::Always,
            Expression::False => Self::Never,
            Expression::General(predicate) => Self::Predicate(predicate),
        }
    }
}

/// A selector ready to be matched.
///
/// Immutable after construction. The fast-reject hints come from the
/// subject compound only and let a caller skip selectors that cannot apply
/// to an element; they never replace [`CompiledSelector::matches`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSelector {
    /// The compiled test.
    pub matcher: Matcher,
    /// The selector folded to "always false": no element can match.
    pub never_matches: bool,
    /// Passed through from the parser.
    pub specificity: Specificity,
    /// Passed through from the parser; never tested against the tree.
    pub pseudo_element: Option<String>,
    /// First ID selector of the subject compound.
    pub id: Option<String>,
    /// First class selector of the subject compound.
    pub class_name: Option<String>,
    /// First type selector of the subject compound.
    pub local_name: Option<String>,
    /// First namespace selector of the subject compound.
    pub namespace: Option<String>,
}

impl CompiledSelector {
    /// Compile one parsed selector.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] when the selector uses an unknown
    /// pseudo-class, malformed functional arguments, or an attribute
    /// selector in any namespace.
    pub fn new(parsed: &ParsedSelector) -> Result<Self, CompileError> {
        let matcher = Matcher::from(expression::build(&parsed.parsed_tree)?);

        let mut compiled = Self {
            never_matches: matcher == Matcher::Never,
            matcher,
            specificity: parsed.specificity,
            pseudo_element: parsed.pseudo_element.clone(),
            id: None,
            class_name: None,
            local_name: None,
            namespace: None,
        };

        for simple in &parsed.parsed_tree.subject().simple_selectors {
            let (slot, value) = match simple {
                SimpleSelector::Id(id) => (&mut compiled.id, id),
                SimpleSelector::Class(name) => (&mut compiled.class_name, name),
                SimpleSelector::LocalName(name) => (&mut compiled.local_name, name),
                SimpleSelector::Namespace(url) => (&mut compiled.namespace, url),
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.clone());
            }
        }

        Ok(compiled)
    }

    /// Whether `element` is a subject of this selector.
    #[must_use]
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        self.matcher.matches(element)
    }
}

/// Parse and compile a comma-separated selector list, one
/// [`CompiledSelector`] per selector, in source order.
///
/// # Errors
///
/// Syntax errors are returned as [`SelectorError::Parse`], semantic errors
/// as [`SelectorError::Compile`].
pub fn compile_selector_list(
    text: &str,
    namespaces: &NamespaceMap,
) -> Result<Vec<CompiledSelector>, SelectorError> {
    parse(text, namespaces)?
        .iter()
        .map(|parsed| CompiledSelector::new(parsed).map_err(SelectorError::from))
        .collect()
}
