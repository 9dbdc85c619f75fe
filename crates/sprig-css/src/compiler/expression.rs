//! Selector tree to three-state boolean expression.
//!
//! Every node becomes [`Expression::True`], [`Expression::False`] or a
//! general [`Predicate`]. Constants are folded as the tree is walked, so a
//! selector that can never match reduces to `False` before any element is
//! seen.

use sprig_dom::{is_css_whitespace, split_whitespace};

use crate::error::CompileError;
use crate::selector::{
    AttributeOperator, AttributeSelector, CombinedSelector, Combinator, CompoundSelector,
    SelectorNode, SimpleSelector,
};

use super::predicate::{AttributeTest, Predicate};
use super::pseudo;

/// The result of compiling one selector node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Matches every element.
    True,
    /// Matches no element.
    False,
    /// Depends on the element.
    General(Predicate),
}

impl Expression {
    /// Conjunction with constant folding. Members keep their order, so the
    /// cheapest test should come first.
    #[must_use]
    pub fn all(members: impl IntoIterator<Item = Self>) -> Self {
        let mut predicates = Vec::new();
        for member in members {
            match member {
                Self::True => {}
                Self::False => return Self::False,
                Self::General(predicate) => predicates.push(predicate),
            }
        }
        match predicates.len() {
            0 => Self::True,
            1 => predicates.pop().map_or(Self::True, Self::General),
            _ => Self::General(Predicate::And(predicates)),
        }
    }

    /// Disjunction with constant folding.
    #[must_use]
    pub fn any(members: impl IntoIterator<Item = Self>) -> Self {
        let mut predicates = Vec::new();
        for member in members {
            match member {
                Self::True => return Self::True,
                Self::False => {}
                Self::General(predicate) => predicates.push(predicate),
            }
        }
        match predicates.len() {
            0 => Self::False,
            1 => predicates.pop().map_or(Self::False, Self::General),
            _ => Self::General(Predicate::Or(predicates)),
        }
    }

    /// Logical negation; constants swap.
    #[must_use]
    pub fn negate(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
            Self::General(predicate) => Self::General(Predicate::Not(Box::new(predicate))),
        }
    }
}

/// Compile a complex selector.
///
/// # Errors
///
/// Returns a [`CompileError`] for unknown pseudo-classes, malformed
/// functional pseudo-class arguments, and attribute selectors in any
/// namespace. Both sides of every combinator are compiled, so an error is
/// reported even when the other side already folded to `False`.
pub fn build(node: &SelectorNode) -> Result<Expression, CompileError> {
    match node {
        SelectorNode::Combined(combined) => build_combined(combined),
        SelectorNode::Compound(compound) => build_compound(compound),
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// `right` describes the subject and is tested first; the tree walk for
/// `left` only happens once the subject itself matches.
fn build_combined(combined: &CombinedSelector) -> Result<Expression, CompileError> {
    let left = build(&combined.left)?;
    let right = build_compound(&combined.right)?;

    let relation = match left {
        Expression::False => return Ok(Expression::False),
        // The related element still has to exist.
        Expression::True => match combined.combinator {
            Combinator::Descendant | Combinator::Child => Predicate::HasParent,
            Combinator::NextSibling | Combinator::SubsequentSibling => Predicate::HasPrevious,
        },
        Expression::General(left) => {
            let left = Box::new(left);
            match combined.combinator {
                Combinator::Descendant => Predicate::Ancestor(left),
                Combinator::Child => Predicate::Parent(left),
                Combinator::NextSibling => Predicate::Previous(left),
                Combinator::SubsequentSibling => Predicate::PrecedingSibling(left),
            }
        }
    };

    Ok(Expression::all([right, Expression::General(relation)]))
}

/// "A compound selector represents a set of simultaneous conditions on a
/// single element." The empty compound is `*`.
fn build_compound(compound: &CompoundSelector) -> Result<Expression, CompileError> {
    let members = compound
        .simple_selectors
        .iter()
        .map(build_simple)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expression::all(members))
}

fn build_simple(simple: &SimpleSelector) -> Result<Expression, CompileError> {
    Ok(match simple {
        SimpleSelector::LocalName(name) => Expression::General(Predicate::LocalName(name.clone())),
        SimpleSelector::Namespace(url) => Expression::General(Predicate::Namespace(url.clone())),
        SimpleSelector::Class(name) => Expression::General(Predicate::Class(name.clone())),
        SimpleSelector::Id(id) => Expression::General(Predicate::Id(id.clone())),
        SimpleSelector::Attribute(attribute) => build_attribute(attribute)?,
        SimpleSelector::PseudoClass(name) => pseudo::build_pseudo_class(name)?,
        SimpleSelector::FunctionalPseudoClass(function) => pseudo::build_functional(function)?,
        SimpleSelector::Negation(inner) => build_compound(inner)?.negate(),
    })
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
fn build_attribute(attribute: &AttributeSelector) -> Result<Expression, CompileError> {
    let Some(namespace) = &attribute.namespace else {
        return Err(CompileError::AnyNamespaceAttribute(attribute.name.clone()));
    };
    let value = attribute.value.clone();

    let test = match attribute.operator {
        None => AttributeTest::Exists,
        Some(AttributeOperator::Equals) => AttributeTest::Equals(value),
        // "If 'val' contains whitespace, it will never represent anything
        // (since the words are separated by spaces). Also if 'val' is the
        // empty string, it will never represent anything."
        Some(AttributeOperator::Includes) => {
            if split_whitespace(&value).count() != 1 || value.contains(is_css_whitespace) {
                return Ok(Expression::False);
            }
            AttributeTest::Includes(value)
        }
        Some(AttributeOperator::DashMatch) => AttributeTest::DashMatch(value),
        // "If 'val' is the empty string then the selector does not represent
        // anything."
        Some(AttributeOperator::Prefix | AttributeOperator::Suffix | AttributeOperator::Substring)
            if value.is_empty() =>
        {
            return Ok(Expression::False);
        }
        Some(AttributeOperator::Prefix) => AttributeTest::Prefix(value),
        Some(AttributeOperator::Suffix) => AttributeTest::Suffix(value),
        Some(AttributeOperator::Substring) => AttributeTest::Substring(value),
    };

    Ok(Expression::General(Predicate::Attribute {
        namespace: namespace.clone(),
        name: attribute.name.clone(),
        test,
    }))
}
