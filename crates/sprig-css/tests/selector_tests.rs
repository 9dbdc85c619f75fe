//! Tests for selector tokenizing and parsing.

use sprig_css::selector::{
    AttributeOperator, AttributeSelector, Combinator, CompoundSelector, NamespaceMap,
    ParsedSelector, SelectorNode, SimpleSelector, Specificity, parse,
};
use sprig_css::tokenizer::{CssToken, HashType, tokenize};

fn parse_one(text: &str) -> ParsedSelector {
    let mut list = parse(text, &NamespaceMap::new()).unwrap();
    assert_eq!(list.len(), 1, "{text}");
    list.remove(0)
}

fn compound(simple_selectors: Vec<SimpleSelector>) -> CompoundSelector {
    CompoundSelector { simple_selectors }
}

// Tokenizer

#[test]
fn test_tokenize_compound_selector() {
    let tokens = tokenize("div#main.note[data-x=\"1\"]");
    assert_eq!(
        tokens,
        vec![
            CssToken::ident("div"),
            CssToken::Hash {
                value: "main".to_string(),
                hash_type: HashType::Id,
            },
            CssToken::Delim('.'),
            CssToken::ident("note"),
            CssToken::LeftBracket,
            CssToken::ident("data-x"),
            CssToken::Delim('='),
            CssToken::String("1".to_string()),
            CssToken::RightBracket,
            CssToken::EOF,
        ]
    );
}

#[test]
fn test_tokenize_skips_comments_and_decodes_escapes() {
    let tokens = tokenize("/* x */.a\\31 b");
    assert_eq!(
        tokens,
        vec![CssToken::Delim('.'), CssToken::ident("a1b"), CssToken::EOF]
    );
    assert_eq!(tokenize("#\\0"), vec![
        CssToken::Hash {
            value: "\u{FFFD}".to_string(),
            hash_type: HashType::Id,
        },
        CssToken::EOF,
    ]);
}

#[test]
fn test_tokenize_numbers_record_sign() {
    let tokens = tokenize("2n+1");
    let CssToken::Dimension { number, unit } = &tokens[0] else {
        panic!("expected a dimension, got {}", tokens[0]);
    };
    assert_eq!((number.integer(), unit.as_str(), number.signed), (Some(2), "n", false));
    let CssToken::Number(b) = &tokens[1] else {
        panic!("expected a number, got {}", tokens[1]);
    };
    assert_eq!((b.integer(), b.signed), (Some(1), true));

    let tokens = tokenize("1.5e2 7%");
    assert!(matches!(&tokens[0], CssToken::Number(n) if n.integer().is_none() && (n.value - 150.0).abs() < f64::EPSILON));
    assert!(matches!(&tokens[2], CssToken::Percentage(n) if n.integer() == Some(7)));

    assert_eq!(tokenize("42"), vec![CssToken::integer(42), CssToken::EOF]);
}

#[test]
fn test_tokenize_bad_string_and_unrestricted_hash() {
    assert_eq!(tokenize("'a\nb'")[0], CssToken::BadString);
    assert!(matches!(
        &tokenize("#1a")[0],
        CssToken::Hash { hash_type: HashType::Unrestricted, .. }
    ));
    assert_eq!(tokenize("lang(")[0], CssToken::Function("lang".to_string()));
}

// Structure

#[test]
fn test_parse_combinators_nest_to_the_left() {
    let parsed = parse_one("a > b + c ~ d e");
    let mut node = &parsed.parsed_tree;
    let mut seen = Vec::new();
    while let SelectorNode::Combined(combined) = node {
        seen.push(combined.combinator);
        node = &combined.left;
    }
    assert_eq!(
        seen,
        vec![
            Combinator::Descendant,
            Combinator::SubsequentSibling,
            Combinator::NextSibling,
            Combinator::Child,
        ]
    );
    assert_eq!(
        node,
        &SelectorNode::Compound(compound(vec![SimpleSelector::LocalName("a".to_string())]))
    );
    assert_eq!(
        parsed.parsed_tree.subject(),
        &compound(vec![SimpleSelector::LocalName("e".to_string())])
    );
}

#[test]
fn test_parse_list_and_whitespace() {
    let list = parse("  p ,\n\tdiv>span , *  ", &NamespaceMap::new()).unwrap();
    assert_eq!(list.len(), 3);
    assert!(matches!(list[1].parsed_tree, SelectorNode::Combined(_)));
    assert_eq!(list[2].parsed_tree, SelectorNode::Compound(CompoundSelector::default()));
}

#[test]
fn test_parse_attribute_selectors() {
    let parsed = parse_one("[ title ][lang|=en][href^='http']");
    let simple = &parsed.parsed_tree.subject().simple_selectors;
    assert_eq!(
        simple[0],
        SimpleSelector::Attribute(AttributeSelector {
            namespace: Some(String::new()),
            name: "title".to_string(),
            operator: None,
            value: String::new(),
        })
    );
    assert_eq!(
        simple[1],
        SimpleSelector::Attribute(AttributeSelector {
            namespace: Some(String::new()),
            name: "lang".to_string(),
            operator: Some(AttributeOperator::DashMatch),
            value: "en".to_string(),
        })
    );
    assert!(matches!(
        &simple[2],
        SimpleSelector::Attribute(AttributeSelector { operator: Some(AttributeOperator::Prefix), value, .. })
            if value == "http"
    ));
}

#[test]
fn test_parse_any_namespace_attribute() {
    let parsed = parse_one("[*|href]");
    assert!(matches!(
        &parsed.parsed_tree.subject().simple_selectors[0],
        SimpleSelector::Attribute(AttributeSelector { namespace: None, .. })
    ));
}

#[test]
fn test_parse_namespaces() {
    let namespaces = NamespaceMap::new()
        .with_default("urn:default")
        .with_prefix("svg", "http://www.w3.org/2000/svg");

    let list = parse("svg|rect, *|rect, |rect, rect, *", &namespaces).unwrap();
    let subjects: Vec<_> = list
        .iter()
        .map(|p| p.parsed_tree.subject().simple_selectors.clone())
        .collect();
    let name = || SimpleSelector::LocalName("rect".to_string());
    let ns = |url: &str| SimpleSelector::Namespace(url.to_string());

    assert_eq!(subjects[0], vec![name(), ns("http://www.w3.org/2000/svg")]);
    assert_eq!(subjects[1], vec![name()]);
    assert_eq!(subjects[2], vec![name(), ns("")]);
    assert_eq!(subjects[3], vec![name(), ns("urn:default")]);
    assert_eq!(subjects[4], vec![ns("urn:default")]);
}

#[test]
fn test_parse_pseudo_classes() {
    let parsed = parse_one("li:FIRST-child:nth-child( 2n + 1 ):not(.a)");
    let simple = &parsed.parsed_tree.subject().simple_selectors;
    assert_eq!(simple[1], SimpleSelector::PseudoClass("first-child".to_string()));
    let SimpleSelector::FunctionalPseudoClass(function) = &simple[2] else {
        panic!("expected a functional pseudo-class, got {:?}", simple[2]);
    };
    assert_eq!(function.name, "nth-child");
    assert_eq!(function.arguments.iter().filter(|t| !t.is_whitespace()).count(), 3);
    assert_eq!(
        simple[3],
        SimpleSelector::Negation(compound(vec![SimpleSelector::Class("a".to_string())]))
    );
}

#[test]
fn test_parse_pseudo_elements() {
    assert_eq!(parse_one("p::First-Line").pseudo_element.as_deref(), Some("first-line"));
    assert_eq!(parse_one("p:before").pseudo_element.as_deref(), Some("before"));
    assert_eq!(parse_one("::after").pseudo_element.as_deref(), Some("after"));
    assert_eq!(parse_one("p:hover").pseudo_element, None);
}

// Specificity

#[test]
fn test_specificity() {
    let cases = [
        ("*", Specificity(0, 0, 0)),
        ("li", Specificity(0, 0, 1)),
        ("ul li", Specificity(0, 0, 2)),
        ("ul ol+li", Specificity(0, 0, 3)),
        ("h1 + *[rel=up]", Specificity(0, 1, 1)),
        ("ul ol li.red", Specificity(0, 1, 3)),
        ("li.red.level", Specificity(0, 2, 1)),
        ("#x34y", Specificity(1, 0, 0)),
        ("#s12:not(FOO)", Specificity(1, 0, 1)),
        ("p::before", Specificity(0, 0, 2)),
        ("svg|*:nth-child(2)", Specificity(0, 1, 0)),
    ];
    let namespaces = NamespaceMap::new().with_prefix("svg", "http://www.w3.org/2000/svg");
    for (text, expected) in cases {
        let parsed = parse(text, &namespaces).unwrap().remove(0);
        assert_eq!(parsed.specificity, expected, "{text}");
    }
    assert!(Specificity(1, 0, 0) > Specificity(0, 9, 9));
}

// Errors

#[test]
fn test_parse_errors() {
    for text in [
        "",
        "   ",
        "p,",
        ",p",
        "p >",
        "> p",
        "p..a",
        "#1a",
        "[",
        "[=x]",
        "[a=]",
        "[a=b i]",
        "[a!=b]",
        "p::before span",
        "p::before.a",
        ":not(::before)",
        ":not()",
        ":nth-child(2",
        "ns|p",
        "p)",
        "'str'",
    ] {
        assert!(parse(text, &NamespaceMap::new()).is_err(), "{text:?} should not parse");
    }
}

#[test]
fn test_parse_error_position() {
    let error = parse("a b )", &NamespaceMap::new()).unwrap_err();
    assert_eq!(error.position, 4);
    assert!(error.message.contains("<)>"), "{error}");
}
