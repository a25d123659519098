//! Skip predicates: nodes (and their subtrees) that addressing ignores.
//!
//! The same predicate must be used for computing an address and for
//! resolving it again, otherwise word counts and block ordinals drift.
//! [`Locator`](crate::Locator) carries one predicate for both directions.

use std::collections::HashSet;

use crate::document::{Document, NodeId};

/// Decides whether a node is invisible to walking and addressing.
pub trait Skip {
    fn skip(&self, doc: &Document, node: NodeId) -> bool;
}

impl<F> Skip for F
where
    F: Fn(&Document, NodeId) -> bool,
{
    fn skip(&self, doc: &Document, node: NodeId) -> bool {
        self(doc, node)
    }
}

/// Skips nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSkip;

impl Skip for NoSkip {
    fn skip(&self, _doc: &Document, _node: NodeId) -> bool {
        false
    }
}

/// Skips elements by tag name or by class.
///
/// Tag names compare case-insensitively; a class matches when it is one of
/// the whitespace-separated tokens of the element's `class` attribute.
#[derive(Debug, Default, Clone)]
pub struct SkipRules {
    tags: HashSet<String>,
    classes: HashSet<String>,
}

impl SkipRules {
    pub fn new<T, C>(tags: T, classes: C) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self {
            tags: tags
                .into_iter()
                .map(|t| t.as_ref().to_ascii_lowercase())
                .collect(),
            classes: classes
                .into_iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_ascii_lowercase());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.classes.is_empty()
    }
}

impl Skip for SkipRules {
    fn skip(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if self.tags.contains(&tag.to_ascii_lowercase()) {
            return true;
        }
        doc.attr(node, "class")
            .is_some_and(|class| class.split_whitespace().any(|c| self.classes.contains(c)))
    }
}
