//! [Selectors Level 3 § 10 The grammar of Selectors](https://www.w3.org/TR/selectors-3/#w3cselgrammar)
//!
//! Recursive descent over the token stream produced by
//! [`tokenize`](crate::tokenizer::tokenize).
//!
//! ```text
//! selector-list = complex [ ',' complex ]*
//! complex       = compound [ combinator compound ]* pseudo-element?
//! compound      = type-selector? [ id | class | attribute | pseudo-class | negation ]*
//! ```

use crate::error::ParseError;
use crate::tokenizer::{CssToken, HashType, tokenize};

use super::NamespaceMap;
use super::ast::{
    AttributeOperator, AttributeSelector, CombinedSelector, Combinator, CompoundSelector,
    FunctionalPseudoClassSelector, ParsedSelector, SelectorNode, SimpleSelector, Specificity,
};

/// Pseudo-elements that may be written with a single colon.
///
/// [Selectors Level 3 § 7](https://www.w3.org/TR/selectors-3/#pseudo-elements)
/// "For compatibility with existing style sheets, user agents must also
/// accept the previous one-colon notation for pseudo-elements introduced in
/// CSS levels 1 and 2 (namely, :first-line, :first-letter, :before and :after)."
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

/// Parse a comma-separated selector list.
///
/// # Errors
///
/// Returns a [`ParseError`] for any syntax error, including an empty list
/// and namespace prefixes missing from `namespaces`.
pub fn parse(text: &str, namespaces: &NamespaceMap) -> Result<Vec<ParsedSelector>, ParseError> {
    SelectorParser::new(tokenize(text), namespaces).parse_selector_list()
}

/// `None` namespace means "any namespace"; `None` local name means `*`.
type QualifiedName = (Option<String>, Option<String>);

struct SelectorParser<'a> {
    tokens: Vec<CssToken>,
    position: usize,
    namespaces: &'a NamespaceMap,
}

impl<'a> SelectorParser<'a> {
    const fn new(tokens: Vec<CssToken>, namespaces: &'a NamespaceMap) -> Self {
        Self {
            tokens,
            position: 0,
            namespaces,
        }
    }

    fn peek_at(&self, offset: usize) -> &CssToken {
        self.tokens
            .get(self.position + offset)
            .unwrap_or(&CssToken::EOF)
    }

    fn peek(&self) -> &CssToken {
        self.peek_at(0)
    }

    fn next(&mut self) -> CssToken {
        let token = self.peek().clone();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_whitespace() {
            self.position += 1;
        }
        self.position != start
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.position)
    }

    fn parse_selector_list(&mut self) -> Result<Vec<ParsedSelector>, ParseError> {
        let mut selectors = Vec::new();
        loop {
            selectors.push(self.parse_complex()?);
            match self.peek() {
                CssToken::Comma => {
                    let _ = self.next();
                }
                CssToken::EOF => return Ok(selectors),
                other => return Err(self.error(format!("unexpected {other}"))),
            }
        }
    }

    fn parse_complex(&mut self) -> Result<ParsedSelector, ParseError> {
        let _ = self.skip_whitespace();
        let start = self.position;
        let (first, mut pseudo_element) = self.parse_compound()?;
        if self.position == start {
            return Err(self.error(format!("expected selector, got {}", self.peek())));
        }

        let mut tree = SelectorNode::Compound(first);
        // A pseudo-element ends the selector.
        while pseudo_element.is_none() {
            let Some(combinator) = self.parse_combinator() else {
                break;
            };
            let start = self.position;
            let (right, pseudo) = self.parse_compound()?;
            if self.position == start {
                return Err(self.error(format!(
                    "expected selector after combinator, got {}",
                    self.peek()
                )));
            }
            tree = SelectorNode::Combined(CombinedSelector {
                left: Box::new(tree),
                combinator,
                right,
            });
            pseudo_element = pseudo;
        }
        let _ = self.skip_whitespace();

        let mut specificity = tree_specificity(&tree);
        if pseudo_element.is_some() {
            specificity.2 += 1;
        }
        Ok(ParsedSelector {
            parsed_tree: tree,
            specificity,
            pseudo_element,
        })
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    fn parse_combinator(&mut self) -> Option<Combinator> {
        let had_whitespace = self.skip_whitespace();
        let combinator = match self.peek() {
            CssToken::Delim('>') => Combinator::Child,
            CssToken::Delim('+') => Combinator::NextSibling,
            CssToken::Delim('~') => Combinator::SubsequentSibling,
            CssToken::Comma | CssToken::EOF => return None,
            _ if had_whitespace => return Some(Combinator::Descendant),
            _ => return None,
        };
        let _ = self.next();
        let _ = self.skip_whitespace();
        Some(combinator)
    }

    /// Parse one compound selector and an optional trailing pseudo-element.
    fn parse_compound(&mut self) -> Result<(CompoundSelector, Option<String>), ParseError> {
        let mut simple_selectors = self.parse_type_selector()?;
        let mut pseudo_element = None;

        while pseudo_element.is_none() {
            match self.peek().clone() {
                CssToken::Hash { value, hash_type } => {
                    if hash_type != HashType::Id {
                        return Err(self.error(format!("invalid ID selector '#{value}'")));
                    }
                    let _ = self.next();
                    simple_selectors.push(SimpleSelector::Id(value));
                }
                CssToken::Delim('.') => {
                    let _ = self.next();
                    match self.next() {
                        CssToken::Ident(name) => simple_selectors.push(SimpleSelector::Class(name)),
                        other => return Err(self.error(format!("expected class name, got {other}"))),
                    }
                }
                CssToken::LeftBracket => {
                    let _ = self.next();
                    simple_selectors.push(SimpleSelector::Attribute(self.parse_attribute()?));
                }
                CssToken::Colon => {
                    let _ = self.next();
                    match self.parse_pseudo()? {
                        Pseudo::Class(selector) => simple_selectors.push(selector),
                        Pseudo::Element(name) => pseudo_element = Some(name),
                    }
                }
                _ => break,
            }
        }

        Ok((CompoundSelector { simple_selectors }, pseudo_element))
    }

    /// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
    ///
    /// "If a default namespace is declared, a type selector without a
    /// namespace component represents only elements in that namespace."
    fn parse_type_selector(&mut self) -> Result<Vec<SimpleSelector>, ParseError> {
        let Some((namespace, local_name)) = self.parse_qualified_name(true)? else {
            return Ok(Vec::new());
        };
        let mut selectors = Vec::new();
        if let Some(name) = local_name {
            selectors.push(SimpleSelector::LocalName(name));
        }
        if let Some(url) = namespace {
            selectors.push(SimpleSelector::Namespace(url));
        }
        Ok(selectors)
    }

    /// `prefix|name`, `*|name`, `|name` or `name`; `*` stands in for `name`
    /// in type selectors.
    fn parse_qualified_name(&mut self, is_type: bool) -> Result<Option<QualifiedName>, ParseError> {
        let name_follows = |token: &CssToken| match token {
            CssToken::Ident(_) => true,
            CssToken::Delim('*') => is_type,
            _ => false,
        };

        let namespace = match (self.peek().clone(), self.peek_at(1).is_delim('|')) {
            (CssToken::Ident(prefix), true) if name_follows(self.peek_at(2)) => {
                self.position += 2;
                let Some(url) = self.namespaces.resolve(&prefix) else {
                    return Err(self.error(format!("undeclared namespace prefix '{prefix}'")));
                };
                Some(url.to_string())
            }
            (CssToken::Delim('*'), true) if name_follows(self.peek_at(2)) => {
                self.position += 2;
                None
            }
            (CssToken::Delim('|'), _) if name_follows(self.peek_at(1)) => {
                self.position += 1;
                Some(String::new())
            }
            (CssToken::Ident(_), _) | (CssToken::Delim('*'), _) if name_follows(self.peek()) => {
                if is_type {
                    self.namespaces.default.clone()
                } else {
                    // "The default namespace does not apply to attributes."
                    Some(String::new())
                }
            }
            _ => return Ok(None),
        };

        let local_name = match self.next() {
            CssToken::Ident(name) => Some(name),
            _ => None,
        };
        Ok(Some((namespace, local_name)))
    }

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors),
    /// after the opening bracket.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, ParseError> {
        let _ = self.skip_whitespace();
        let Some((namespace, Some(name))) = self.parse_qualified_name(false)? else {
            return Err(self.error(format!("expected attribute name, got {}", self.peek())));
        };
        let _ = self.skip_whitespace();

        let operator = match (self.peek().clone(), self.peek_at(1).is_delim('=')) {
            (CssToken::RightBracket, _) => {
                let _ = self.next();
                return Ok(AttributeSelector {
                    namespace,
                    name,
                    operator: None,
                    value: String::new(),
                });
            }
            (CssToken::Delim('='), _) => {
                let _ = self.next();
                AttributeOperator::Equals
            }
            (CssToken::Delim(c), true) => {
                let operator = match c {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    '*' => AttributeOperator::Substring,
                    other => return Err(self.error(format!("unknown attribute operator '{other}='"))),
                };
                self.position += 2;
                operator
            }
            (other, _) => {
                return Err(self.error(format!("expected ']' or attribute operator, got {other}")));
            }
        };

        let _ = self.skip_whitespace();
        let value = match self.next() {
            CssToken::Ident(value) | CssToken::String(value) => value,
            other => return Err(self.error(format!("expected attribute value, got {other}"))),
        };
        let _ = self.skip_whitespace();
        match self.next() {
            CssToken::RightBracket => Ok(AttributeSelector {
                namespace,
                name,
                operator: Some(operator),
                value,
            }),
            CssToken::Ident(flag) => Err(self.error(format!(
                "attribute selector flag '{flag}' is not supported"
            ))),
            other => Err(self.error(format!("expected ']', got {other}"))),
        }
    }

    /// Everything after a `:`.
    fn parse_pseudo(&mut self) -> Result<Pseudo, ParseError> {
        match self.next() {
            CssToken::Colon => match self.next() {
                CssToken::Ident(name) => Ok(Pseudo::Element(name.to_ascii_lowercase())),
                other => Err(self.error(format!("expected pseudo-element name, got {other}"))),
            },
            CssToken::Ident(name) => {
                let name = name.to_ascii_lowercase();
                if LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
                    Ok(Pseudo::Element(name))
                } else {
                    Ok(Pseudo::Class(SimpleSelector::PseudoClass(name)))
                }
            }
            CssToken::Function(name) => {
                let name = name.to_ascii_lowercase();
                if name == "not" {
                    self.parse_negation().map(Pseudo::Class)
                } else {
                    let arguments = self.consume_arguments()?;
                    Ok(Pseudo::Class(SimpleSelector::FunctionalPseudoClass(
                        FunctionalPseudoClassSelector { name, arguments },
                    )))
                }
            }
            other => Err(self.error(format!("expected pseudo-class name, got {other}"))),
        }
    }

    /// [Selectors Level 3 § 6.6.7](https://www.w3.org/TR/selectors-3/#negation)
    ///
    /// "The negation pseudo-class, :not(X), is a functional notation taking a
    /// simple selector ... as an argument." Compounds are accepted too.
    fn parse_negation(&mut self) -> Result<SimpleSelector, ParseError> {
        let _ = self.skip_whitespace();
        let start = self.position;
        let (argument, pseudo_element) = self.parse_compound()?;
        if pseudo_element.is_some() {
            return Err(self.error("pseudo-elements are not allowed inside :not()"));
        }
        if self.position == start {
            return Err(self.error(format!("expected selector in :not(), got {}", self.peek())));
        }
        let _ = self.skip_whitespace();
        match self.next() {
            CssToken::RightParen => Ok(SimpleSelector::Negation(argument)),
            other => Err(self.error(format!("expected ')' after :not() argument, got {other}"))),
        }
    }

    /// Tokens up to the matching `)`, which is consumed but not returned.
    fn consume_arguments(&mut self) -> Result<Vec<CssToken>, ParseError> {
        let mut arguments = Vec::new();
        let mut depth = 0_usize;
        loop {
            let token = self.next();
            match token {
                CssToken::EOF => return Err(self.error("unclosed functional pseudo-class")),
                CssToken::RightParen if depth == 0 => return Ok(arguments),
                CssToken::RightParen => depth -= 1,
                CssToken::LeftParen | CssToken::Function(_) => depth += 1,
                _ => {}
            }
            arguments.push(token);
        }
    }
}

enum Pseudo {
    Class(SimpleSelector),
    Element(String),
}

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
fn tree_specificity(node: &SelectorNode) -> Specificity {
    match node {
        SelectorNode::Combined(combined) => {
            tree_specificity(&combined.left) + compound_specificity(&combined.right)
        }
        SelectorNode::Compound(compound) => compound_specificity(compound),
    }
}

fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();
    for simple in &compound.simple_selectors {
        match simple {
            // "count the number of ID selectors in the selector (= A)"
            SimpleSelector::Id(_) => spec.0 += 1,

            // "count the number of class selectors, attributes selectors,
            // and pseudo-classes in the selector (= B)"
            SimpleSelector::Class(_)
            | SimpleSelector::Attribute(_)
            | SimpleSelector::PseudoClass(_)
            | SimpleSelector::FunctionalPseudoClass(_) => spec.1 += 1,

            // "count the number of type selectors and pseudo-elements
            // in the selector (= C)"
            SimpleSelector::LocalName(_) => spec.2 += 1,

            // "Selectors inside the negation pseudo-class are counted like any
            // other, but the negation itself does not count as a pseudo-class."
            SimpleSelector::Negation(inner) => spec += compound_specificity(inner),

            // "ignore the universal selector"
            SimpleSelector::Namespace(_) => {}
        }
    }
    spec
}
