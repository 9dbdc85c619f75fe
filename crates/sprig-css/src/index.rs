//! Rule lookup by fast-reject hints.
//!
//! A stylesheet has many selectors and most of them cannot apply to a given
//! element. [`SelectorIndex`] buckets compiled selectors by the most
//! selective hint of their subject compound (id, then class, then local
//! name, then namespace) so that matching an element only runs the
//! selectors from the buckets that element can fall into.

use std::collections::HashMap;

use sprig_common::warning::warn_once;
use sprig_dom::Element;

use crate::compiler::CompiledSelector;
use crate::selector::Specificity;

struct Entry<T> {
    selector: CompiledSelector,
    order: usize,
    payload: T,
}

/// A selector that matched, with the data it was registered with.
#[derive(Debug, PartialEq, Eq)]
pub struct Match<'a, T> {
    /// Specificity of the matching selector.
    pub specificity: Specificity,
    /// Registration order, for the cascade's "last declared wins" tie-break.
    pub order: usize,
    /// The pseudo-element the selector targets, if any.
    pub pseudo_element: Option<&'a str>,
    /// Caller data registered with the selector.
    pub payload: &'a T,
}

/// Compiled selectors bucketed by their fast-reject hints.
pub struct SelectorIndex<T> {
    entries: Vec<Entry<T>>,
    by_id: HashMap<String, Vec<usize>>,
    by_class: HashMap<String, Vec<usize>>,
    by_local_name: HashMap<String, Vec<usize>>,
    by_namespace: HashMap<String, Vec<usize>>,
    other: Vec<usize>,
    next_order: usize,
}

impl<T> Default for SelectorIndex<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
            by_class: HashMap::new(),
            by_local_name: HashMap::new(),
            by_namespace: HashMap::new(),
            other: Vec::new(),
            next_order: 0,
        }
    }
}

impl<T> SelectorIndex<T> {
    /// An empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of selectors stored (never-matching ones are not stored).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no selector is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register `selector` with `payload`.
    ///
    /// Selectors that can never match are dropped with a warning but still
    /// consume an order number, so orders follow registration.
    pub fn add_selector(&mut self, selector: &CompiledSelector, payload: T) {
        let order = self.next_order;
        self.next_order += 1;

        if selector.never_matches {
            warn_once(
                "Selectors",
                &format!("dropping selector #{order} with specificity {}: it can never match", selector.specificity),
            );
            return;
        }

        let slot = self.entries.len();
        let bucket = if let Some(id) = &selector.id {
            self.by_id.entry(id.clone()).or_default()
        } else if let Some(class_name) = &selector.class_name {
            self.by_class.entry(class_name.clone()).or_default()
        } else if let Some(local_name) = &selector.local_name {
            self.by_local_name.entry(local_name.clone()).or_default()
        } else if let Some(namespace) = &selector.namespace {
            self.by_namespace.entry(namespace.clone()).or_default()
        } else {
            &mut self.other
        };
        bucket.push(slot);

        self.entries.push(Entry {
            selector: selector.clone(),
            order,
            payload,
        });
    }

    /// Every stored selector matching `element`, sorted by specificity and
    /// then registration order (lowest first).
    #[must_use]
    pub fn match_element<E: Element>(&self, element: &E) -> Vec<Match<'_, T>> {
        let mut candidates: Vec<usize> = self.other.clone();
        let mut extend = |bucket: Option<&Vec<usize>>| {
            if let Some(slots) = bucket {
                candidates.extend_from_slice(slots);
            }
        };
        if let Some(id) = element.id() {
            extend(self.by_id.get(id));
        }
        for class in element.classes() {
            extend(self.by_class.get(class));
        }
        extend(self.by_local_name.get(element.local_name()));
        extend(self.by_namespace.get(element.namespace_url().unwrap_or("")));

        // `class="a a"` visits the same bucket twice.
        candidates.sort_unstable();
        candidates.dedup();

        let mut matches: Vec<_> = candidates
            .into_iter()
            .filter_map(|slot| self.entries.get(slot))
            .filter(|entry| entry.selector.matches(element))
            .map(|entry| Match {
                specificity: entry.selector.specificity,
                order: entry.order,
                pseudo_element: entry.selector.pseudo_element.as_deref(),
                payload: &entry.payload,
            })
            .collect();
        matches.sort_by_key(|m| (m.specificity, m.order));
        matches
    }
}
