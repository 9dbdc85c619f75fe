//! Selector syntax tree.
//!
//! The tree is produced by [`parse`](super::parse) and consumed by the
//! compiler. It is immutable once built; compilation borrows it and the
//! [`CompiledSelector`](crate::CompiledSelector) outlives it.

use crate::error::CompileError;
use crate::tokenizer::CssToken;

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// `A B`: B is a descendant of A.
    Descendant,
    /// `A > B`: B is a child of A.
    Child,
    /// `A + B`: B immediately follows A.
    NextSibling,
    /// `A ~ B`: B follows A.
    SubsequentSibling,
}

impl Combinator {
    /// Map a combinator symbol to its variant.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnknownCombinator`] for any other symbol.
    pub fn from_symbol(symbol: char) -> Result<Self, CompileError> {
        match symbol {
            ' ' => Ok(Self::Descendant),
            '>' => Ok(Self::Child),
            '+' => Ok(Self::NextSibling),
            '~' => Ok(Self::SubsequentSibling),
            other => Err(CompileError::UnknownCombinator(other.to_string())),
        }
    }

    /// The symbol written between the two compounds.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Descendant => ' ',
            Self::Child => '>',
            Self::NextSibling => '+',
            Self::SubsequentSibling => '~',
        }
    }
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeOperator {
    /// `[att=val]`
    Equals,
    /// `[att~=val]`
    Includes,
    /// `[att|=val]`
    DashMatch,
    /// `[att^=val]`
    Prefix,
    /// `[att$=val]`
    Suffix,
    /// `[att*=val]`
    Substring,
}

impl AttributeOperator {
    /// Map an operator spelling to its variant.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnknownAttributeOperator`] for any other spelling.
    pub fn from_symbol(symbol: &str) -> Result<Self, CompileError> {
        match symbol {
            "=" => Ok(Self::Equals),
            "~=" => Ok(Self::Includes),
            "|=" => Ok(Self::DashMatch),
            "^=" => Ok(Self::Prefix),
            "$=" => Ok(Self::Suffix),
            "*=" => Ok(Self::Substring),
            other => Err(CompileError::UnknownAttributeOperator(other.to_string())),
        }
    }

    /// The operator as written in selector text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// An attribute test such as `[xlink|href^="#"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// `None` for any namespace (`[*|att]`), `Some("")` for no namespace.
    pub namespace: Option<String>,
    /// Attribute local name.
    pub name: String,
    /// `None` for a presence test (`[att]`).
    pub operator: Option<AttributeOperator>,
    /// Operand; empty for a presence test.
    pub value: String,
}

/// A functional pseudo-class such as `:nth-child(2n+1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalPseudoClassSelector {
    /// Lower-cased name, without the colon.
    pub name: String,
    /// Tokens between the parentheses, whitespace included.
    pub arguments: Vec<CssToken>,
}

/// A single atomic test.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    LocalName(String),
    /// [§ 5.3 Namespaces in elemental selectors](https://www.w3.org/TR/selectors-4/#type-nmsp).
    /// `""` selects elements in no namespace.
    Namespace(String),
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),
    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),
    /// A pseudo-class without arguments, lower-cased, without the colon.
    PseudoClass(String),
    /// A pseudo-class with arguments.
    FunctionalPseudoClass(FunctionalPseudoClassSelector),
    /// [§ 4.3 The negation pseudo-class](https://www.w3.org/TR/selectors-3/#negation)
    Negation(CompoundSelector),
}

/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator." An empty compound stands for `*`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    /// Conjunction members, in source order.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// Two selectors joined by a combinator. `right` is the subject side.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedSelector {
    /// Pattern for the ancestor or sibling side.
    pub left: Box<SelectorNode>,
    /// Relationship between `left` and `right`.
    pub combinator: Combinator,
    /// Pattern for the element itself.
    pub right: CompoundSelector,
}

/// Root of a complex selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorNode {
    /// A combinator chain, nested to the left.
    Combined(CombinedSelector),
    /// A lone compound selector.
    Compound(CompoundSelector),
}

impl SelectorNode {
    /// The subject compound: the rightmost compound of the chain.
    #[must_use]
    pub const fn subject(&self) -> &CompoundSelector {
        match self {
            Self::Combined(combined) => &combined.right,
            Self::Compound(compound) => compound,
        }
    }
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl std::ops::Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

impl std::ops::AddAssign for Specificity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for Specificity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// A complex selector with its parse-time metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSelector {
    /// The selector tree.
    pub parsed_tree: SelectorNode,
    /// Specificity of the whole selector, pseudo-element included.
    pub specificity: Specificity,
    /// Trailing pseudo-element name, lower-cased (`before` for `::before`).
    pub pseudo_element: Option<String>,
}
