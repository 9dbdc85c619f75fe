//! Tests for selector compilation and matching semantics.

use sprig_css::compiler::{Expression, Matcher, Predicate};
use sprig_css::selector::{
    CombinedSelector, Combinator, CompoundSelector, ParsedSelector, SelectorNode, SimpleSelector,
};
use sprig_css::{
    CompileError, CompiledSelector, NamespaceMap, SelectorError, Specificity,
    compile_selector_list,
};
use sprig_dom::{DomTree, ElementData, ElementRef, NodeId, ns};

fn compile(text: &str) -> CompiledSelector {
    compile_selector_list(text, &NamespaceMap::new())
        .unwrap()
        .remove(0)
}

fn compile_error(text: &str) -> CompileError {
    match compile_selector_list(text, &NamespaceMap::new()) {
        Err(SelectorError::Compile(error)) => error,
        other => panic!("expected a compile error for {text:?}, got {other:?}"),
    }
}

/// Ids of every element matched by `selector`, in tree order.
fn matching(tree: &DomTree, selector: &str) -> Vec<NodeId> {
    let compiled = compile(selector);
    tree.elements()
        .filter(|el| compiled.matches(el))
        .map(|el| el.node_id())
        .collect()
}

fn el(tree: &DomTree, id: NodeId) -> ElementRef<'_> {
    tree.element(id).unwrap()
}

/// `a > b > b`, returned as (a, b, c) from the outside in.
fn chain() -> (DomTree, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let a = tree.append_element(NodeId::ROOT, ElementData::new("a"));
    let b = tree.append_element(a, ElementData::new("b"));
    let c = tree.append_element(b, ElementData::new("b"));
    (tree, a, b, c)
}

/// An HTML list: `ul > li * count`.
fn list(count: usize) -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new_html();
    let ul = tree.append_element(NodeId::ROOT, ElementData::html("ul"));
    let items = (0..count)
        .map(|_| tree.append_element(ul, ElementData::html("li")))
        .collect();
    (tree, items)
}

// Constants

#[test]
fn test_universal_always_matches() {
    let compiled = compile("*");
    assert_eq!(compiled.matcher, Matcher::Always);
    assert!(!compiled.never_matches);

    let (tree, a, _, c) = chain();
    assert!(compiled.matches(&el(&tree, a)));
    assert!(compiled.matches(&el(&tree, c)));
}

#[test]
fn test_never_matches_is_exactly_literal_false() {
    for text in [
        "a:hover",
        "[class~='foo bar']",
        "[title^='']",
        "[title$='']",
        "[title*='']",
        "a:visited b",
        "a b:focus",
        ":not(*)",
        "p:target > span",
    ] {
        let compiled = compile(text);
        assert!(compiled.never_matches, "{text} should never match");
        assert_eq!(compiled.matcher, Matcher::Never);

        let (tree, ..) = chain();
        assert!(tree.elements().all(|e| !compiled.matches(&e)));
    }

    for text in ["p", "[class~=foo]", "[title^=a]", "a b", ":not(:hover)"] {
        assert!(!compile(text).never_matches, "{text} can match");
    }
}

#[test]
fn test_negated_constant_swaps() {
    assert_eq!(compile(":not(:hover)").matcher, Matcher::Always);
    assert_eq!(compile(":not(*)").matcher, Matcher::Never);
}

// Simple selectors

#[test]
fn test_id_ignores_tag_and_namespace() {
    let mut tree = DomTree::new();
    let root = tree.append_element(NodeId::ROOT, ElementData::new("root").with_attr("id", "foo"));
    let svg = tree.append_element(
        root,
        ElementData::new("rect").in_namespace(ns::SVG).with_attr("id", "foo"),
    );
    let _ = tree.append_element(root, ElementData::new("rect").with_attr("id", "food"));

    assert_eq!(matching(&tree, "#foo"), vec![root, svg]);
}

#[test]
fn test_class_membership() {
    let mut tree = DomTree::new();
    let root = tree.append_element(NodeId::ROOT, ElementData::new("r").with_attr("class", "x foo\ty"));
    let _ = tree.append_element(root, ElementData::new("r").with_attr("class", "foobar"));

    assert_eq!(matching(&tree, ".foo"), vec![root]);
    assert_eq!(matching(&tree, ".foo.y"), vec![root]);
    assert!(matching(&tree, ".foo.z").is_empty());
}

#[test]
fn test_namespace_selectors() {
    let mut tree = DomTree::new();
    let root = tree.append_element(NodeId::ROOT, ElementData::new("doc"));
    let svg = tree.append_element(root, ElementData::new("svg").in_namespace(ns::SVG));
    let namespaces = NamespaceMap::new().with_prefix("svg", ns::SVG);

    let svg_any = compile_selector_list("svg|*", &namespaces).unwrap().remove(0);
    assert!(svg_any.matches(&el(&tree, svg)));
    assert!(!svg_any.matches(&el(&tree, root)));

    let no_ns = compile("|*");
    assert!(no_ns.matches(&el(&tree, root)));
    assert!(!no_ns.matches(&el(&tree, svg)));

    let any_ns = compile("*|svg");
    assert!(any_ns.matches(&el(&tree, svg)));

    let defaulted = compile_selector_list("svg", &NamespaceMap::new().with_default(ns::HTML))
        .unwrap()
        .remove(0);
    assert!(!defaulted.matches(&el(&tree, svg)));
}

// Attribute selectors

fn attribute_tree(value: &str) -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let id = tree.append_element(NodeId::ROOT, ElementData::new("e").with_attr("lang", value));
    (tree, id)
}

fn attr_matches(selector: &str, value: &str) -> bool {
    let (tree, id) = attribute_tree(value);
    compile(selector).matches(&el(&tree, id))
}

#[test]
fn test_attribute_presence_and_equality() {
    assert!(attr_matches("[lang]", ""));
    assert!(!attr_matches("[title]", ""));
    assert!(attr_matches("[lang=en]", "en"));
    assert!(!attr_matches("[lang=en]", "EN"));
    assert!(!attr_matches("[title=en]", "en"));
}

#[test]
fn test_attribute_includes() {
    assert!(attr_matches("[lang~=b]", "a b\tc"));
    assert!(!attr_matches("[lang~=b]", "abc"));
    assert!(!attr_matches("[lang~='']", ""));
    assert!(compile("[lang~='a b']").never_matches);
    assert!(compile("[lang~='']").never_matches);
}

#[test]
fn test_attribute_dash_match() {
    assert!(attr_matches("[lang|=en]", "en"));
    assert!(attr_matches("[lang|=en]", "en-US"));
    assert!(!attr_matches("[lang|=en]", "english"));
    assert!(!attr_matches("[lang|=en]", "EN-us"));
}

#[test]
fn test_attribute_substring_operators() {
    assert!(attr_matches("[lang^=fr]", "fr-CA"));
    assert!(!attr_matches("[lang^=CA]", "fr-CA"));
    assert!(attr_matches("[lang$=CA]", "fr-CA"));
    assert!(attr_matches("[lang*='r-C']", "fr-CA"));
    assert!(!attr_matches("[lang*=x]", "fr-CA"));
    assert!(!attr_matches("[lang^='']", "fr-CA"));
}

#[test]
fn test_attribute_namespaces() {
    let mut tree = DomTree::new();
    let id = tree.append_element(
        NodeId::ROOT,
        ElementData::new("use").with_ns_attr("http://www.w3.org/1999/xlink", "href", "#a"),
    );
    let namespaces = NamespaceMap::new().with_prefix("xlink", "http://www.w3.org/1999/xlink");

    let qualified = compile_selector_list("[xlink|href='#a']", &namespaces).unwrap().remove(0);
    assert!(qualified.matches(&el(&tree, id)));
    // Unprefixed attribute selectors only see attributes in no namespace.
    assert!(!compile("[href]").matches(&el(&tree, id)));
    assert!(!compile("[|href]").matches(&el(&tree, id)));
}

#[test]
fn test_any_namespace_attribute_is_unsupported() {
    assert_eq!(
        compile_error("[*|href]"),
        CompileError::AnyNamespaceAttribute("href".to_string())
    );
}

// Combinators

#[test]
fn test_descendant_and_child_on_three_levels() {
    let (tree, a, b, c) = chain();

    assert_eq!(matching(&tree, "a b"), vec![b, c]);
    assert_eq!(matching(&tree, "a > b"), vec![b]);
    assert_eq!(matching(&tree, "b > b"), vec![c]);
    assert_eq!(matching(&tree, "b b"), vec![c]);
    assert!(matching(&tree, "b a").is_empty());
    let _ = a;
}

#[test]
fn test_sibling_combinators() {
    let mut tree = DomTree::new();
    let root = tree.append_element(NodeId::ROOT, ElementData::new("r"));
    let h = tree.append_element(root, ElementData::new("h"));
    let _ = tree.append_text(root, "text between");
    let p1 = tree.append_element(root, ElementData::new("p"));
    let p2 = tree.append_element(root, ElementData::new("p"));
    let _ = h;

    assert_eq!(matching(&tree, "h + p"), vec![p1]);
    assert_eq!(matching(&tree, "h ~ p"), vec![p1, p2]);
    assert_eq!(matching(&tree, "p + p"), vec![p2]);
    assert!(matching(&tree, "p ~ h").is_empty());
}

#[test]
fn test_universal_left_side_only_requires_existence() {
    let (tree, a, b, c) = chain();
    let compiled = compile("* > b");
    assert_eq!(
        compiled.matcher,
        Matcher::Predicate(Predicate::And(vec![
            Predicate::LocalName("b".to_string()),
            Predicate::HasParent,
        ]))
    );
    assert_eq!(matching(&tree, "* > b"), vec![b, c]);
    assert_eq!(matching(&tree, "* a"), Vec::<NodeId>::new());
    let _ = a;

    let mut siblings = DomTree::new();
    let root = siblings.append_element(NodeId::ROOT, ElementData::new("r"));
    let first = siblings.append_element(root, ElementData::new("x"));
    let second = siblings.append_element(root, ElementData::new("x"));
    let _ = first;
    assert_eq!(matching(&siblings, "* + x"), vec![second]);
    assert_eq!(matching(&siblings, "* ~ *"), vec![second]);
}

#[test]
fn test_universal_right_side_keeps_left_test() {
    let compiled = compile("a > *");
    assert_eq!(
        compiled.matcher,
        Matcher::Predicate(Predicate::Parent(Box::new(Predicate::LocalName(
            "a".to_string()
        ))))
    );
    let (tree, _, b, _) = chain();
    assert_eq!(matching(&tree, "a > *"), vec![b]);
}

#[test]
fn test_unknown_combinator_symbol() {
    assert_eq!(
        Combinator::from_symbol('/'),
        Err(CompileError::UnknownCombinator("/".to_string()))
    );
    assert_eq!(Combinator::from_symbol('~'), Ok(Combinator::SubsequentSibling));
}

#[test]
fn test_both_combinator_sides_are_validated() {
    assert_eq!(
        compile_error(":hover :bogus"),
        CompileError::UnknownPseudoClass("bogus".to_string())
    );
}

#[test]
fn test_hand_built_tree_compiles() {
    let parsed = ParsedSelector {
        parsed_tree: SelectorNode::Combined(CombinedSelector {
            left: Box::new(SelectorNode::Compound(CompoundSelector::default())),
            combinator: Combinator::from_symbol('+').unwrap(),
            right: CompoundSelector {
                simple_selectors: vec![SimpleSelector::Class("x".to_string())],
            },
        }),
        specificity: Specificity(0, 1, 0),
        pseudo_element: None,
    };
    let compiled = CompiledSelector::new(&parsed).unwrap();
    assert_eq!(compiled.class_name.as_deref(), Some("x"));
    assert_eq!(
        sprig_css::compiler::expression::build(&parsed.parsed_tree).unwrap(),
        Expression::General(Predicate::And(vec![
            Predicate::Class("x".to_string()),
            Predicate::HasPrevious,
        ]))
    );
}

// Negation

#[test]
fn test_negation() {
    let mut tree = DomTree::new();
    let root = tree.append_element(NodeId::ROOT, ElementData::new("r"));
    let a = tree.append_element(root, ElementData::new("e").with_attr("class", "a"));
    let b = tree.append_element(root, ElementData::new("e").with_attr("class", "b"));
    let ab = tree.append_element(root, ElementData::new("e").with_attr("class", "a b"));
    let none = tree.append_element(root, ElementData::new("e"));
    let _ = (a, ab);

    assert_eq!(matching(&tree, "e:not(.a)"), vec![b, none]);
    assert_eq!(matching(&tree, "e:not(.a):not(.b)"), vec![none]);
    assert_eq!(matching(&tree, "e:not(.a.b)"), vec![a, b, none]);
}

// Pseudo-classes

#[test]
fn test_link_and_form_states() {
    let mut tree = DomTree::new_html();
    let body = tree.append_element(NodeId::ROOT, ElementData::html("body"));
    let link = tree.append_element(body, ElementData::html("a").with_attr("href", "#"));
    let anchor = tree.append_element(body, ElementData::html("a"));
    let enabled = tree.append_element(body, ElementData::html("input"));
    let disabled = tree.append_element(body, ElementData::html("button").with_attr("disabled", ""));
    let checked = tree.append_element(body, ElementData::html("input").with_attr("checked", ""));
    let selected = tree.append_element(body, ElementData::html("option").with_attr("selected", ""));
    let foreign = tree.append_element(
        body,
        ElementData::new("a").in_namespace(ns::SVG).with_attr("href", "#"),
    );
    let _ = (anchor, foreign);

    assert_eq!(matching(&tree, ":link"), vec![link]);
    assert_eq!(matching(&tree, ":enabled"), vec![link, enabled, checked, selected]);
    assert_eq!(matching(&tree, ":disabled"), vec![disabled]);
    assert_eq!(matching(&tree, ":checked"), vec![checked, selected]);
}

#[test]
fn test_live_pseudo_classes_never_match() {
    for name in ["visited", "hover", "active", "focus", "target"] {
        assert!(compile(&format!("a:{name}")).never_matches);
    }
}

#[test]
fn test_structural_pseudo_classes() {
    let mut tree = DomTree::new();
    let root = tree.append_element(NodeId::ROOT, ElementData::new("r"));
    let p1 = tree.append_element(root, ElementData::new("p"));
    let div = tree.append_element(root, ElementData::new("div"));
    let p2 = tree.append_element(root, ElementData::new("p"));
    let only = tree.append_element(div, ElementData::new("span"));
    let _ = tree.append_text(p2, "text");

    assert_eq!(matching(&tree, ":root"), vec![root]);
    assert_eq!(matching(&tree, ":first-child"), vec![root, p1, only]);
    assert_eq!(matching(&tree, ":last-child"), vec![root, only, p2]);
    assert_eq!(matching(&tree, "p:first-of-type"), vec![p1]);
    assert_eq!(matching(&tree, "p:last-of-type"), vec![p2]);
    assert_eq!(matching(&tree, ":only-child"), vec![root, only]);
    assert_eq!(matching(&tree, ":only-of-type"), vec![root, div, only]);
    assert_eq!(matching(&tree, ":empty"), vec![p1, only]);
}

#[test]
fn test_of_type_compares_namespace() {
    let mut tree = DomTree::new();
    let root = tree.append_element(NodeId::ROOT, ElementData::new("r"));
    let svg_a = tree.append_element(root, ElementData::new("a").in_namespace(ns::SVG));
    let a = tree.append_element(root, ElementData::new("a"));

    assert_eq!(matching(&tree, "a:first-of-type"), vec![svg_a, a]);
    assert_eq!(matching(&tree, "a:only-of-type"), vec![svg_a, a]);
}

#[test]
fn test_lang() {
    let mut tree = DomTree::new_html();
    let html = tree.append_element(NodeId::ROOT, ElementData::html("html").with_attr("lang", "en-US"));
    let de = tree.append_element(html, ElementData::html("p").with_attr("lang", "de"));
    let inherit = tree.append_element(html, ElementData::html("p"));
    let english = tree.append_element(html, ElementData::html("p").with_attr("lang", "english"));
    let _ = (de, english);

    assert_eq!(matching(&tree, ":lang(en)"), vec![html, inherit]);
    assert_eq!(matching(&tree, ":lang(en-US)"), vec![html, inherit]);
    assert_eq!(matching(&tree, ":lang( de )"), vec![de]);
    // Case-sensitive.
    assert!(matching(&tree, ":lang(EN)").is_empty());
}

#[test]
fn test_lang_rejects_non_identifier() {
    for text in [":lang(\"en\")", ":lang(en fr)", ":lang()", ":lang(1)"] {
        assert!(
            matches!(compile_error(text), CompileError::InvalidArguments { .. }),
            "{text}"
        );
    }
}

#[test]
fn test_unknown_pseudo_classes() {
    assert_eq!(
        compile_error(":bogus"),
        CompileError::UnknownPseudoClass("bogus".to_string())
    );
    assert_eq!(
        compile_error(":contains(x)"),
        CompileError::UnknownPseudoClass("contains".to_string())
    );
}

// nth-*

#[test]
fn test_nth_child_odd_positions() {
    let (tree, items) = list(6);
    assert_eq!(matching(&tree, "li:nth-child(2n+1)"), vec![items[0], items[2], items[4]]);
    assert_eq!(matching(&tree, "li:nth-child(odd)"), vec![items[0], items[2], items[4]]);
    assert_eq!(matching(&tree, "li:nth-child(even)"), vec![items[1], items[3], items[5]]);
}

#[test]
fn test_nth_child_constant() {
    let (tree, items) = list(5);
    assert_eq!(matching(&tree, "li:nth-child(3)"), vec![items[2]]);
    assert!(matching(&tree, "li:nth-child(0)").is_empty());
}

#[test]
fn test_nth_child_negative_step() {
    let (tree, items) = list(5);
    assert_eq!(matching(&tree, "li:nth-child(-n+3)"), items[..3].to_vec());
    assert_eq!(matching(&tree, "li:nth-last-child(-n+2)"), items[3..].to_vec());
}

#[test]
fn test_nth_last_child() {
    let (tree, items) = list(5);
    assert_eq!(matching(&tree, "li:nth-last-child(1)"), vec![items[4]]);
    assert_eq!(matching(&tree, "li:nth-last-child(2n)"), vec![items[1], items[3]]);
}

#[test]
fn test_nth_of_type() {
    let mut tree = DomTree::new();
    let root = tree.append_element(NodeId::ROOT, ElementData::new("r"));
    let p1 = tree.append_element(root, ElementData::new("p"));
    let _ = tree.append_element(root, ElementData::new("div"));
    let p2 = tree.append_element(root, ElementData::new("p"));
    let _ = tree.append_element(root, ElementData::new("div"));
    let p3 = tree.append_element(root, ElementData::new("p"));

    assert_eq!(matching(&tree, "p:nth-of-type(2)"), vec![p2]);
    assert_eq!(matching(&tree, "p:nth-of-type(2n+1)"), vec![p1, p3]);
    assert_eq!(matching(&tree, "p:nth-last-of-type(1)"), vec![p3]);
    assert_eq!(matching(&tree, "p:nth-last-of-type(n+2)"), vec![p1, p2]);
}

#[test]
fn test_nth_invalid_arguments() {
    for text in [":nth-child()", ":nth-child(foo)", ":nth-child(2n+)", ":nth-of-type(1 2)"] {
        assert!(
            matches!(compile_error(text), CompileError::InvalidArguments { .. }),
            "{text}"
        );
    }
}

// Metadata

#[test]
fn test_fast_reject_hints_from_subject() {
    let compiled = compile("div.foo#bar");
    assert_eq!(compiled.local_name.as_deref(), Some("div"));
    assert_eq!(compiled.class_name.as_deref(), Some("foo"));
    assert_eq!(compiled.id.as_deref(), Some("bar"));
    assert_eq!(compiled.namespace, None);

    let combined = compile("section#top .x.y > p:not(.z)");
    assert_eq!(combined.local_name.as_deref(), Some("p"));
    assert_eq!(combined.class_name, None);
    assert_eq!(combined.id, None);

    let namespaced = compile("|p.first.second");
    assert_eq!(namespaced.namespace.as_deref(), Some(""));
    assert_eq!(namespaced.class_name.as_deref(), Some("first"));
}

#[test]
fn test_specificity_and_pseudo_element_pass_through() {
    let compiled = compile("ul li.item::before");
    assert_eq!(compiled.specificity, Specificity(0, 1, 3));
    assert_eq!(compiled.pseudo_element.as_deref(), Some("before"));
}

#[test]
fn test_list_preserves_order() {
    let compiled = compile_selector_list("p, #a, .b", &NamespaceMap::new()).unwrap();
    let ids: Vec<_> = compiled.iter().map(|c| c.specificity).collect();
    assert_eq!(
        ids,
        vec![Specificity(0, 0, 1), Specificity(1, 0, 0), Specificity(0, 1, 0)]
    );
}

#[test]
fn test_compilation_is_deterministic() {
    let (tree, ..) = list(7);
    for text in ["li:nth-child(3n-1)", "ul > li:not(:first-child)", "li + li"] {
        let first = compile(text);
        let second = compile(text);
        for element in tree.elements() {
            assert_eq!(first.matches(&element), second.matches(&element), "{text}");
        }
    }
}

#[test]
fn test_compiled_selector_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CompiledSelector>();

    let compiled = std::sync::Arc::new(compile("li:nth-child(odd)"));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let compiled = std::sync::Arc::clone(&compiled);
            std::thread::spawn(move || {
                let (tree, items) = list(4);
                items
                    .iter()
                    .filter(|&&id| compiled.matches(&tree.element(id).unwrap()))
                    .count()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}

#[test]
fn test_syntax_errors_surface_unchanged() {
    assert!(matches!(
        compile_selector_list("p >", &NamespaceMap::new()),
        Err(SelectorError::Parse(_))
    ));
}
