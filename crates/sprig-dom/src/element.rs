//! The element capability set consumed by selector matching.
//!
//! Matching never owns or mutates a document: it asks an [`Element`] handle
//! for its name, attributes and neighbours. [`ElementRef`] answers those
//! questions for a [`DomTree`]; other document representations only need to
//! implement the trait.

use std::iter;

use crate::{DomTree, ElementData, NodeId, NodeType, ns, split_whitespace};

/// Read-only navigation over an element of some document tree.
///
/// Handles are expected to be cheap to clone (a reference or an index).
/// Every relationship is between *elements*: text and comment nodes are
/// invisible, and the document node is not a parent. All iterators must be
/// finite and restartable, i.e. calling the method again starts over.
pub trait Element: Clone {
    /// The parent element, or `None` for the root element.
    fn parent(&self) -> Option<Self>;

    /// The element immediately before this one among its siblings.
    fn previous_sibling(&self) -> Option<Self>;

    /// Strict ancestors, nearest first.
    fn ancestors(&self) -> impl Iterator<Item = Self>;

    /// Preceding siblings, nearest first.
    fn preceding_siblings(&self) -> impl Iterator<Item = Self>;

    /// All siblings in document order, including this element.
    fn siblings(&self) -> impl Iterator<Item = Self>;

    /// 0-based position of this element in [`Element::siblings`].
    fn sibling_index(&self) -> usize;

    /// Length of [`Element::siblings`].
    fn sibling_count(&self) -> usize;

    /// Local name (tag name without prefix).
    fn local_name(&self) -> &str;

    /// Namespace URL, `None` for elements in no namespace.
    fn namespace_url(&self) -> Option<&str>;

    /// Value of the ID attribute.
    fn id(&self) -> Option<&str>;

    /// Class names, in attribute order.
    fn classes(&self) -> impl Iterator<Item = &str>;

    /// Whether `name` is one of [`Element::classes`].
    fn has_class(&self, name: &str) -> bool {
        self.classes().any(|class| class == name)
    }

    /// Attribute lookup; `namespace` is `""` for attributes in no namespace.
    fn attribute(&self, namespace: &str, local_name: &str) -> Option<&str>;

    /// Attribute lookup falling back to `default` when absent.
    fn attribute_or<'s>(&'s self, namespace: &str, local_name: &str, default: &'s str) -> &'s str {
        self.attribute(namespace, local_name).unwrap_or(default)
    }

    /// The element's language, `None` when unknown.
    fn lang(&self) -> Option<&str>;

    /// Whether the element has child elements or non-empty text.
    fn has_content(&self) -> bool;

    /// Same expanded name (local name and namespace), as used by `*-of-type`.
    fn is_same_type(&self, other: &Self) -> bool {
        self.local_name() == other.local_name()
            && self.namespace_url().unwrap_or("") == other.namespace_url().unwrap_or("")
    }
}

/// An element of a [`DomTree`].
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
    data: &'a ElementData,
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for ElementRef<'_> {}

impl<'a> ElementRef<'a> {
    /// Wrap `id`, or `None` if it is not an element node.
    #[must_use]
    pub fn new(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        tree.as_element(id).map(|data| Self { tree, id, data })
    }

    /// The node this handle points at.
    #[must_use]
    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    /// The tree this element belongs to.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The element's stored data.
    #[must_use]
    pub const fn data(&self) -> &'a ElementData {
        self.data
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .filter_map(move |&id| tree.element(id))
    }

    /// This element followed by its descendant elements, in tree order.
    pub fn subtree(&self) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
        let tree = self.tree;
        iter::once(*self).chain(
            tree.descendants(self.id)
                .filter_map(move |id| tree.element(id)),
        )
    }

    fn element_siblings(&self) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
        let tree = self.tree;
        let children = tree.parent(self.id).map_or(&[][..], |p| tree.children(p));
        // A detached element is its own only sibling.
        let lone = children.is_empty().then_some(*self);
        children
            .iter()
            .filter_map(move |&id| tree.element(id))
            .chain(lone)
    }

    /// [HTML § 3.2.6.2 The lang and xml:lang attributes](https://html.spec.whatwg.org/multipage/dom.html#the-lang-and-xml:lang-attributes)
    ///
    /// "To determine the language of a node, user agents must look at the
    /// nearest ancestor element (including the element itself if the node is
    /// an element) that has a lang attribute in the XML namespace set or is an
    /// HTML element and has a lang in no namespace attribute set."
    ///
    /// "If none of the node's ancestors, including the root element, have
    /// either attribute set, but there is a pragma-set default language set,
    /// then that is the language of the node. If there is no pragma-set
    /// default language set, then language information from a higher-level
    /// protocol (such as HTTP), if any, must be used as the final fallback
    /// language instead."
    fn resolve_lang(&self) -> Option<&'a str> {
        let mut current = *self;
        loop {
            if let Some(lang) = current.data.attribute(ns::XML, "lang") {
                return Some(lang);
            }
            if self.tree.is_html() || current.data.is_html() {
                if let Some(lang) = current.data.attribute("", "lang") {
                    return Some(lang);
                }
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // `current` is now the root element.
        if self.tree.is_html() || current.data.is_html() {
            let pragma = if self.tree.document_element() == Some(current.id) {
                self.tree
                    .pragma_lang(|| pragma_lang(current).map(str::to_string))
            } else {
                // Detached subtrees are not cached.
                pragma_lang(current)
            };
            if pragma.is_some() {
                return pragma;
            }
        }

        parse_content_language(self.tree.default_lang())
    }
}

/// "If there are multiple meta elements with an http-equiv attribute in the
/// Content Language state, only the last content is used."
fn pragma_lang(root: ElementRef<'_>) -> Option<&str> {
    let meta = root
        .subtree()
        .filter(|el| el.data.is_html() && el.data.local_name == "meta")
        .filter(|el| {
            el.data
                .attribute("", "http-equiv")
                .is_some_and(|v| v.eq_ignore_ascii_case("content-language"))
        })
        .last()?;
    parse_content_language(meta.data.attribute("", "content"))
}

/// [HTML § 4.2.5.3 Content language state](https://html.spec.whatwg.org/multipage/semantics.html#attr-meta-http-equiv-content-language)
///
/// "If the element's content attribute contains a U+002C COMMA character (,)
/// then return." ... "If candidate is the empty string, return."
fn parse_content_language(value: Option<&str>) -> Option<&str> {
    let value = value?;
    if value.contains(',') {
        return None;
    }
    let mut parts = split_whitespace(value);
    match (parts.next(), parts.next()) {
        (Some(lang), None) => Some(lang),
        _ => None,
    }
}

impl Element for ElementRef<'_> {
    fn parent(&self) -> Option<Self> {
        self.tree
            .parent(self.id)
            .and_then(|parent| self.tree.element(parent))
    }

    fn previous_sibling(&self) -> Option<Self> {
        self.preceding_siblings().next()
    }

    fn ancestors(&self) -> impl Iterator<Item = Self> {
        let tree = self.tree;
        // The walk ends at the document node, the only non-element ancestor.
        tree.ancestors(self.id).map_while(move |id| tree.element(id))
    }

    fn preceding_siblings(&self) -> impl Iterator<Item = Self> {
        let tree = self.tree;
        tree.preceding_siblings(self.id)
            .filter_map(move |id| tree.element(id))
    }

    fn siblings(&self) -> impl Iterator<Item = Self> {
        self.element_siblings()
    }

    fn sibling_index(&self) -> usize {
        self.element_siblings()
            .position(|sibling| sibling.id == self.id)
            .unwrap_or(0)
    }

    fn sibling_count(&self) -> usize {
        self.element_siblings().count()
    }

    fn local_name(&self) -> &str {
        &self.data.local_name
    }

    fn namespace_url(&self) -> Option<&str> {
        self.data.namespace.as_deref()
    }

    fn id(&self) -> Option<&str> {
        self.data.id()
    }

    fn classes(&self) -> impl Iterator<Item = &str> {
        self.data.classes()
    }

    fn attribute(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.data.attribute(namespace, local_name)
    }

    fn lang(&self) -> Option<&str> {
        self.resolve_lang()
    }

    fn has_content(&self) -> bool {
        self.tree
            .children(self.id)
            .iter()
            .any(|&child| match self.tree.get(child).map(|n| &n.node_type) {
                Some(NodeType::Element(_)) => true,
                Some(NodeType::Text(text)) => !text.is_empty(),
                _ => false,
            })
    }
}
