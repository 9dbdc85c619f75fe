//! Executable predicates over elements.
//!
//! A [`Predicate`] is a plain data tree: it borrows nothing from the selector
//! it was built from and nothing from any document, so one compiled selector
//! can be shared across threads and applied to any [`Element`] implementation.

use sprig_dom::{Element, ns, split_whitespace};

use crate::nth::nth_matches;

/// An attribute test, after namespace resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeTest {
    /// `[att]`
    Exists,
    /// `[att=val]`
    Equals(String),
    /// `[att~=val]`, with `val` a single token.
    Includes(String),
    /// `[att|=val]`
    DashMatch(String),
    /// `[att^=val]`, with `val` non-empty.
    Prefix(String),
    /// `[att$=val]`, with `val` non-empty.
    Suffix(String),
    /// `[att*=val]`, with `val` non-empty.
    Substring(String),
}

impl AttributeTest {
    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equals(expected) => value == expected.as_str(),
            Self::Includes(token) => split_whitespace(value).any(|part| part == token.as_str()),
            Self::DashMatch(expected) => {
                value == expected.as_str()
                    || value
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            Self::Prefix(prefix) => value.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => value.ends_with(suffix.as_str()),
            Self::Substring(needle) => value.contains(needle.as_str()),
        }
    }
}

/// Which siblings an `nth-*` pseudo-class counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthKind {
    /// `:nth-child()`: all preceding siblings.
    Child,
    /// `:nth-last-child()`: all following siblings.
    LastChild,
    /// `:nth-of-type()`: preceding siblings of the same type.
    OfType,
    /// `:nth-last-of-type()`: following siblings of the same type.
    LastOfType,
}

/// A boolean test over one element, possibly reaching its relatives.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Every member holds, tested in order.
    And(Vec<Predicate>),
    /// Some member holds, tested in order.
    Or(Vec<Predicate>),
    /// The inner predicate does not hold.
    Not(Box<Predicate>),

    /// The element has a parent element.
    HasParent,
    /// The element has a previous sibling element.
    HasPrevious,
    /// Some strict ancestor satisfies the predicate.
    Ancestor(Box<Predicate>),
    /// The parent exists and satisfies the predicate.
    Parent(Box<Predicate>),
    /// The previous sibling exists and satisfies the predicate.
    Previous(Box<Predicate>),
    /// Some preceding sibling satisfies the predicate.
    PrecedingSibling(Box<Predicate>),

    /// Local name equality.
    LocalName(String),
    /// Namespace URL equality; `""` is no namespace.
    Namespace(String),
    /// Class membership.
    Class(String),
    /// ID equality.
    Id(String),
    /// Attribute test in a given namespace (`""` for none).
    Attribute {
        /// Attribute namespace URL.
        namespace: String,
        /// Attribute local name.
        name: String,
        /// Test applied to the value, if present.
        test: AttributeTest,
    },
    /// An HTML element whose local name is in the set.
    HtmlElement(&'static [&'static str]),

    /// No parent element.
    Root,
    /// First among its siblings.
    FirstChild,
    /// Last among its siblings.
    LastChild,
    /// No preceding sibling of the same type.
    FirstOfType,
    /// No following sibling of the same type.
    LastOfType,
    /// The only sibling.
    OnlyChild,
    /// No other sibling of the same type.
    OnlyOfType,
    /// No child elements and no text.
    Empty,
    /// Language is the tag or starts with the tag and a hyphen.
    Lang(String),
    /// `x = A·n + (B - 1)` for some `n ≥ 0`.
    Nth {
        /// Which siblings are counted.
        kind: NthKind,
        /// Step.
        a: i64,
        /// Offset.
        b: i64,
    },
}

impl Predicate {
    /// Evaluate the predicate for `element`.
    #[must_use]
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        match self {
            Self::And(all) => all.iter().all(|p| p.matches(element)),
            Self::Or(any) => any.iter().any(|p| p.matches(element)),
            Self::Not(inner) => !inner.matches(element),

            Self::HasParent => element.parent().is_some(),
            Self::HasPrevious => element.previous_sibling().is_some(),
            Self::Ancestor(inner) => element.ancestors().any(|a| inner.matches(&a)),
            Self::Parent(inner) => element.parent().is_some_and(|p| inner.matches(&p)),
            Self::Previous(inner) => element.previous_sibling().is_some_and(|s| inner.matches(&s)),
            Self::PrecedingSibling(inner) => element.preceding_siblings().any(|s| inner.matches(&s)),

            Self::LocalName(name) => element.local_name() == name.as_str(),
            Self::Namespace(url) => element.namespace_url().unwrap_or("") == url.as_str(),
            Self::Class(name) => element.has_class(name),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Attribute {
                namespace,
                name,
                test,
            } => element
                .attribute(namespace, name)
                .is_some_and(|value| test.matches(value)),
            Self::HtmlElement(names) => {
                element.namespace_url() == Some(ns::HTML)
                    && names.iter().any(|&name| name == element.local_name())
            }

            Self::Root => element.parent().is_none(),
            Self::FirstChild => element.sibling_index() == 0,
            Self::LastChild => element.sibling_index() + 1 == element.sibling_count(),
            Self::FirstOfType => !element.preceding_siblings().any(|s| element.is_same_type(&s)),
            Self::LastOfType => following_siblings(element).all(|s| !element.is_same_type(&s)),
            Self::OnlyChild => element.sibling_count() == 1,
            Self::OnlyOfType => {
                let index = element.sibling_index();
                !element
                    .siblings()
                    .enumerate()
                    .any(|(i, s)| i != index && element.is_same_type(&s))
            }
            Self::Empty => !element.has_content(),
            Self::Lang(tag) => element.lang().is_some_and(|lang| {
                lang == tag.as_str()
                    || lang
                        .strip_prefix(tag.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }),
            Self::Nth { kind, a, b } => nth_matches(*a, *b, nth_position(element, *kind)),
        }
    }
}

fn following_siblings<E: Element>(element: &E) -> impl Iterator<Item = E> {
    element.siblings().skip(element.sibling_index() + 1)
}

/// Count of the siblings an `nth-*` pseudo-class considers before `element`.
fn nth_position<E: Element>(element: &E, kind: NthKind) -> usize {
    match kind {
        NthKind::Child => element.sibling_index(),
        NthKind::LastChild => element
            .sibling_count()
            .saturating_sub(element.sibling_index() + 1),
        NthKind::OfType => element
            .preceding_siblings()
            .filter(|s| element.is_same_type(s))
            .count(),
        NthKind::LastOfType => following_siblings(element)
            .filter(|s| element.is_same_type(s))
            .count(),
    }
}
