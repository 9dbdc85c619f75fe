//! [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
//! under static semantics: no user interaction, no navigation history and
//! no live form state.

use std::str::FromStr;

use strum_macros::{Display, EnumString};

use crate::error::CompileError;
use crate::nth::parse_nth;
use crate::selector::FunctionalPseudoClassSelector;
use crate::tokenizer::CssToken;

use super::expression::Expression;
use super::predicate::{AttributeTest, NthKind, Predicate};

/// HTML elements that can be a hyperlink.
const LINK_ELEMENTS: &[&str] = &["a", "area", "link"];

/// HTML elements that take part in `:enabled` / `:disabled`.
const FORM_CONTROL_ELEMENTS: &[&str] = &[
    "button", "input", "select", "textarea", "option", "optgroup", "menuitem", "fieldset",
];

/// Pseudo-classes without arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PseudoClassName {
    /// `:link`
    Link,
    /// `:enabled`
    Enabled,
    /// `:disabled`
    Disabled,
    /// `:checked`
    Checked,
    /// `:visited`
    Visited,
    /// `:hover`
    Hover,
    /// `:active`
    Active,
    /// `:focus`
    Focus,
    /// `:target`
    Target,
    /// `:root`
    Root,
    /// `:first-child`
    FirstChild,
    /// `:last-child`
    LastChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:last-of-type`
    LastOfType,
    /// `:only-child`
    OnlyChild,
    /// `:only-of-type`
    OnlyOfType,
    /// `:empty`
    Empty,
}

/// Pseudo-classes written as functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FunctionalPseudoClassName {
    /// `:lang()`
    Lang,
    /// `:nth-child()`
    NthChild,
    /// `:nth-last-child()`
    NthLastChild,
    /// `:nth-of-type()`
    NthOfType,
    /// `:nth-last-of-type()`
    NthLastOfType,
}

fn html_element(names: &'static [&'static str]) -> Expression {
    Expression::General(Predicate::HtmlElement(names))
}

fn has_attribute(name: &str) -> Expression {
    Expression::General(Predicate::Attribute {
        namespace: String::new(),
        name: name.to_string(),
        test: AttributeTest::Exists,
    })
}

pub(super) fn build_pseudo_class(name: &str) -> Result<Expression, CompileError> {
    let pseudo = PseudoClassName::from_str(name)
        .map_err(|_| CompileError::UnknownPseudoClass(name.to_string()))?;

    Ok(match pseudo {
        // [§ 8.1 :any-link / :link](https://www.w3.org/TR/selectors-4/#the-any-link-pseudo)
        // Every link is unvisited in a static context.
        PseudoClassName::Link => Expression::all([html_element(LINK_ELEMENTS), has_attribute("href")]),

        // [HTML § 4.16.3 Pseudo-classes](https://html.spec.whatwg.org/multipage/semantics-other.html#pseudo-classes)
        // Approximated from attributes: the fieldset-ancestor rule of
        // "actually disabled" is not applied.
        PseudoClassName::Enabled => Expression::any([
            Expression::all([
                html_element(FORM_CONTROL_ELEMENTS),
                has_attribute("disabled").negate(),
            ]),
            Expression::all([html_element(LINK_ELEMENTS), has_attribute("href")]),
        ]),
        PseudoClassName::Disabled => {
            Expression::all([html_element(FORM_CONTROL_ELEMENTS), has_attribute("disabled")])
        }
        PseudoClassName::Checked => Expression::any([
            Expression::all([html_element(&["input", "menuitem"]), has_attribute("checked")]),
            Expression::all([html_element(&["option"]), has_attribute("selected")]),
        ]),

        // Need live navigation or interaction state.
        PseudoClassName::Visited
        | PseudoClassName::Hover
        | PseudoClassName::Active
        | PseudoClassName::Focus
        | PseudoClassName::Target => Expression::False,

        // [§ 14 Tree-Structural pseudo-classes](https://www.w3.org/TR/selectors-4/#structural-pseudos)
        PseudoClassName::Root => Expression::General(Predicate::Root),
        PseudoClassName::FirstChild => Expression::General(Predicate::FirstChild),
        PseudoClassName::LastChild => Expression::General(Predicate::LastChild),
        PseudoClassName::FirstOfType => Expression::General(Predicate::FirstOfType),
        PseudoClassName::LastOfType => Expression::General(Predicate::LastOfType),
        PseudoClassName::OnlyChild => Expression::General(Predicate::OnlyChild),
        PseudoClassName::OnlyOfType => Expression::General(Predicate::OnlyOfType),
        PseudoClassName::Empty => Expression::General(Predicate::Empty),
    })
}

pub(super) fn build_functional(
    function: &FunctionalPseudoClassSelector,
) -> Result<Expression, CompileError> {
    let name = FunctionalPseudoClassName::from_str(&function.name)
        .map_err(|_| CompileError::UnknownPseudoClass(function.name.clone()))?;
    let invalid = |reason: &str| CompileError::InvalidArguments {
        name: function.name.clone(),
        reason: reason.to_string(),
    };

    let kind = match name {
        // [§ 7.2 :lang()](https://www.w3.org/TR/selectors-4/#the-lang-pseudo)
        // Compared case-sensitively.
        FunctionalPseudoClassName::Lang => {
            let mut significant = function.arguments.iter().filter(|t| !t.is_whitespace());
            return match (significant.next(), significant.next()) {
                (Some(CssToken::Ident(tag)), None) => Ok(Expression::General(Predicate::Lang(tag.clone()))),
                _ => Err(invalid("expected a single identifier")),
            };
        }
        FunctionalPseudoClassName::NthChild => NthKind::Child,
        FunctionalPseudoClassName::NthLastChild => NthKind::LastChild,
        FunctionalPseudoClassName::NthOfType => NthKind::OfType,
        FunctionalPseudoClassName::NthLastOfType => NthKind::LastOfType,
    };

    let (a, b) = parse_nth(&function.arguments).ok_or_else(|| invalid("expected An+B"))?;
    Ok(Expression::General(Predicate::Nth { kind, a, b }))
}
