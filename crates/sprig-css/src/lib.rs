//! Static CSS selector compilation and matching.
//!
//! Selector text goes through the [`tokenizer`] and the [`selector`] parser,
//! then the [`compiler`] turns each selector into a reusable
//! [`CompiledSelector`]. Matching works over any [`sprig_dom::Element`].
//!
//! ```
//! use sprig_css::{NamespaceMap, compile_selector_list};
//! use sprig_dom::{DomTree, ElementData, NodeId};
//!
//! let mut tree = DomTree::new_html();
//! let html = tree.append_element(NodeId::ROOT, ElementData::html("html"));
//! let p = tree.append_element(html, ElementData::html("p").with_attr("class", "intro"));
//!
//! let selectors = compile_selector_list("html > p.intro", &NamespaceMap::new()).unwrap();
//! assert!(selectors[0].matches(&tree.element(p).unwrap()));
//! assert!(!selectors[0].matches(&tree.element(html).unwrap()));
//! ```

pub mod compiler;
pub mod error;
pub mod index;
pub mod nth;
pub mod query;
pub mod selector;
pub mod tokenizer;

pub use compiler::{CompiledSelector, Matcher, compile_selector_list};
pub use error::{CompileError, ParseError, SelectorError};
pub use index::{Match, SelectorIndex};
pub use query::{query, query_all};
pub use selector::{NamespaceMap, ParsedSelector, Specificity};
