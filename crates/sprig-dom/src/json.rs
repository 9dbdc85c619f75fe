//! Build a [`DomTree`] from a JSON description of a document.
//!
//! ```json
//! {
//!   "name": "html",
//!   "attributes": { "lang": "en", "{http://www.w3.org/XML/1998/namespace}space": "preserve" },
//!   "children": [
//!     { "name": "p", "children": ["Hello ", { "name": "b", "children": ["world"] }] },
//!     { "comment": "not an element" }
//!   ]
//! }
//! ```
//!
//! Names and attribute keys may use Clark notation (`{namespace-url}local`).
//! A JSON string child is a text node.

use std::collections::BTreeMap;

use serde::Deserialize;
use sprig_common::warning::warn_once;
use thiserror::Error;

use crate::{DomTree, ElementData, NodeId, NodeType, ns};

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum DomError {
    /// The input is not valid JSON or does not have the expected shape.
    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON is well-formed but does not describe a document.
    #[error("invalid document node: {0}")]
    InvalidNode(String),
}

/// How a JSON document is turned into a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Treat the document as HTML: elements without an explicit namespace are
    /// placed in the HTML namespace and the `lang` attribute is honored.
    pub html: bool,
    /// Transport-level language (a `Content-Language` header).
    pub default_lang: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonNode {
    Text(String),
    // Tried before `Comment`: an element with a stray `comment` key stays an
    // element and the key is reported as unknown.
    Element(JsonElement),
    Comment { comment: String },
}

#[derive(Debug, Deserialize)]
struct JsonElement {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    #[serde(default)]
    children: Vec<JsonNode>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

/// Split `{url}local` into `("url", "local")`; plain names have no namespace.
fn split_clark(name: &str) -> Result<(&str, &str), DomError> {
    let Some(rest) = name.strip_prefix('{') else {
        return Ok(("", name));
    };
    let (namespace, local) = rest
        .split_once('}')
        .ok_or_else(|| DomError::InvalidNode(format!("unterminated namespace in '{name}'")))?;
    if local.is_empty() {
        return Err(DomError::InvalidNode(format!("missing local name in '{name}'")));
    }
    Ok((namespace, local))
}

impl DomTree {
    /// Parse a JSON document whose top-level value is the root element.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Json`] for malformed JSON and
    /// [`DomError::InvalidNode`] when the root is not an element or a name
    /// uses broken Clark notation.
    pub fn from_json(source: &str, options: &DocumentOptions) -> Result<Self, DomError> {
        let root: JsonNode = serde_json::from_str(source)?;
        let JsonNode::Element(root) = root else {
            return Err(DomError::InvalidNode(
                "document root must be an element".to_string(),
            ));
        };

        let mut tree = if options.html {
            Self::new_html()
        } else {
            Self::new()
        };
        tree.set_default_lang(options.default_lang.clone());
        let _ = tree.append_json_element(NodeId::ROOT, root, options)?;
        Ok(tree)
    }

    fn append_json_element(
        &mut self,
        parent: NodeId,
        element: JsonElement,
        options: &DocumentOptions,
    ) -> Result<NodeId, DomError> {
        for key in element.unknown.keys() {
            warn_once("DOM", &format!("ignoring unknown element field '{key}'"));
        }

        let (clark_ns, local_name) = split_clark(&element.name)?;
        let namespace = match (element.namespace, clark_ns) {
            (Some(explicit), _) => Some(explicit),
            (None, "") if options.html => Some(ns::HTML.to_string()),
            (None, "") => None,
            (None, clark) => Some(clark.to_string()),
        }
        .filter(|url| !url.is_empty());

        let mut data = ElementData::new(local_name);
        data.namespace = namespace;
        for (key, value) in element.attributes {
            let (attr_ns, attr_name) = split_clark(&key)?;
            data.set_attribute(attr_ns, attr_name, value);
        }

        let id = self.append_element(parent, data);
        for child in element.children {
            match child {
                JsonNode::Text(text) => {
                    let _ = self.append_text(id, text);
                }
                JsonNode::Comment { comment } => {
                    let comment_id = self.alloc(NodeType::Comment(comment));
                    self.append_child(id, comment_id);
                }
                JsonNode::Element(child) => {
                    let _ = self.append_json_element(id, child, options)?;
                }
            }
        }
        Ok(id)
    }
}
