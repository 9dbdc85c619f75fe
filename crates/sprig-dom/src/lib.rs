//! Document tree and element access for the sprig selector engine.
//!
//! This crate provides two things:
//! - the [`Element`] trait, the read-only capability set selector matching
//!   needs from any document representation;
//! - an arena-based [`DomTree`] following the
//!   [DOM Living Standard](https://dom.spec.whatwg.org/) node model, with
//!   [`ElementRef`] implementing [`Element`] over it.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Element
//! handles are `Copy` views borrowing the tree for the duration of a traversal.

/// The [`Element`] trait and its [`ElementRef`] implementation.
use std::sync::OnceLock;

pub mod element;
/// Loading documents from a JSON description.
pub mod json;

pub use element::{Element, ElementRef};
pub use json::{DocumentOptions, DomError};

/// Well-known namespace URLs.
pub mod ns {
    /// [HTML namespace](https://infra.spec.whatwg.org/#html-namespace)
    pub const HTML: &str = "http://www.w3.org/1999/xhtml";
    /// [XML namespace](https://infra.spec.whatwg.org/#xml-namespace), home of `xml:lang`
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    /// [SVG namespace](https://infra.spec.whatwg.org/#svg-namespace)
    pub const SVG: &str = "http://www.w3.org/2000/svg";
    /// [MathML namespace](https://infra.spec.whatwg.org/#mathml-namespace)
    pub const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
}

/// [Selectors § 3.9 Whitespace](https://www.w3.org/TR/selectors-3/#whitespace)
///
/// "Only the characters "space" (U+0020), "tab" (U+0009), "line feed"
/// (U+000A), "carriage return" (U+000D), and "form feed" (U+000C) can occur
/// in whitespace."
#[must_use]
pub const fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Split a string on CSS whitespace, dropping empty pieces.
///
/// Used for class lists and `[attr~=value]` matching. Unlike
/// [`str::split_whitespace`], non-ASCII spaces are part of a token.
pub fn split_whitespace(value: &str) -> impl Iterator<Item = &str> {
    value.split(is_css_whitespace).filter(|piece| !piece.is_empty())
}

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// "Attr nodes are simply known as attributes. ... Attributes have a
/// namespace (null or a non-empty string), namespace prefix, local name,
/// value, and element."
///
/// The null namespace is stored as the empty string, which is also how
/// selectors spell "no namespace".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace URL, empty for attributes in no namespace.
    pub namespace: String,
    /// Local name of the attribute.
    pub local_name: String,
    /// Attribute value.
    pub value: String,
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name, ..."
///
/// Prefixes are not stored; selectors resolve prefixes to URLs before matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// "An element's local name"
    pub local_name: String,
    /// "An element's namespace", `None` for elements in no namespace.
    pub namespace: Option<String>,
    /// "An element has an associated attribute list"
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// An element in no namespace.
    #[must_use]
    pub fn new(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            namespace: None,
            attrs: Vec::new(),
        }
    }

    /// An element in the HTML namespace.
    #[must_use]
    pub fn html(local_name: impl Into<String>) -> Self {
        Self::new(local_name).in_namespace(ns::HTML)
    }

    /// Move the element into `namespace`.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add (or replace) an attribute in no namespace.
    #[must_use]
    pub fn with_attr(self, local_name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_ns_attr("", local_name, value)
    }

    /// Add (or replace) a namespaced attribute.
    #[must_use]
    pub fn with_ns_attr(
        mut self,
        namespace: impl Into<String>,
        local_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set_attribute(namespace, local_name, value);
        self
    }

    /// [§ 4.9 set an attribute value](https://dom.spec.whatwg.org/#concept-element-attributes-set-value)
    ///
    /// "If attribute is null, create an attribute ... and then append this
    /// attribute to element. Otherwise change attribute to value."
    pub fn set_attribute(
        &mut self,
        namespace: impl Into<String>,
        local_name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let namespace = namespace.into();
        let local_name = local_name.into();
        let value = value.into();
        if let Some(existing) = self
            .attrs
            .iter_mut()
            .find(|a| a.namespace == namespace && a.local_name == local_name)
        {
            existing.value = value;
        } else {
            self.attrs.push(Attribute {
                namespace,
                local_name,
                value,
            });
        }
    }

    /// [§ 4.9 get an attribute by namespace and local name](https://dom.spec.whatwg.org/#concept-element-attributes-get-by-namespace)
    ///
    /// `namespace` is `""` for attributes in no namespace.
    #[must_use]
    pub fn attribute(&self, namespace: &str, local_name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.namespace == namespace && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attribute("", "id")
    }

    /// Returns the class names from the class attribute.
    ///
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        split_whitespace(self.attribute("", "class").unwrap_or(""))
    }

    /// Whether this element is in the HTML namespace.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.namespace.as_deref() == Some(ns::HTML)
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
    /// [§ 4.5](https://dom.spec.whatwg.org/#concept-document-type)
    /// "A document is said to be an XML document if its type is "xml";
    /// otherwise an HTML document."
    html: bool,
    /// Language supplied by the transport layer (a `Content-Language`
    /// header), used when nothing in the document declares one.
    default_lang: Option<String>,
    /// Language set by the last `Content-Language` pragma under the document
    /// element, computed on first use and reset by any mutation.
    pragma_lang: OnceLock<Option<String>>,
}

impl DomTree {
    /// Create a new XML DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
            html: false,
            default_lang: None,
            pragma_lang: OnceLock::new(),
        }
    }

    /// Create a new tree whose type is "html".
    #[must_use]
    pub fn new_html() -> Self {
        let mut tree = Self::new();
        tree.html = true;
        tree
    }

    /// Whether this is an HTML document.
    #[must_use]
    pub const fn is_html(&self) -> bool {
        self.html
    }

    /// The transport-level language, if any.
    #[must_use]
    pub fn default_lang(&self) -> Option<&str> {
        self.default_lang.as_deref()
    }

    /// Set the transport-level language used as a last resort by `:lang()`.
    pub fn set_default_lang(&mut self, lang: Option<String>) {
        self.default_lang = lang;
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.pragma_lang = OnceLock::new();
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.pragma_lang = OnceLock::new();
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Allocate an element and append it to `parent` in one step.
    pub fn append_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        let id = self.alloc(NodeType::Element(data));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node and append it to `parent` in one step.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeType::Text(text.into()));
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// [§ 4.2 tree order](https://dom.spec.whatwg.org/#concept-tree-order)
    ///
    /// "preorder, depth-first traversal of a tree."
    ///
    /// Iterate over the strict descendants of `id` in tree order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// An [`Element`] handle for `id`, or `None` if it is not an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        ElementRef::new(self, id)
    }

    /// Every element of the document, in tree order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.descendants(NodeId::ROOT)
            .filter_map(move |id| self.element(id))
    }

    /// [§ 4.2.4 document element](https://dom.spec.whatwg.org/#document-element)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// The cached pragma-set default language, running `compute` on first use.
    pub(crate) fn pragma_lang(&self, compute: impl FnOnce() -> Option<String>) -> Option<&str> {
        self.pragma_lang.get_or_init(compute).as_deref()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
