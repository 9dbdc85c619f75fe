//! `querySelector`-style helpers over a [`DomTree`](sprig_dom::DomTree) subtree.

use sprig_dom::ElementRef;

use crate::compiler::CompiledSelector;

/// [DOM § 4.2.6 `querySelectorAll`](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
///
/// Elements of the subtree rooted at `root` (inclusive) matched by at least
/// one of `selectors`, in tree order. Selectors with a pseudo-element target
/// a part of an element rather than the element, so they are skipped.
pub fn query_all<'a>(
    root: ElementRef<'a>,
    selectors: &'a [CompiledSelector],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let applicable: Vec<&CompiledSelector> = selectors
        .iter()
        .filter(|s| s.pseudo_element.is_none() && !s.never_matches)
        .collect();
    root.subtree()
        .filter(move |element| applicable.iter().any(|s| s.matches(element)))
}

/// The first element [`query_all`] would yield.
#[must_use]
pub fn query<'a>(root: ElementRef<'a>, selectors: &'a [CompiledSelector]) -> Option<ElementRef<'a>> {
    query_all(root, selectors).next()
}
