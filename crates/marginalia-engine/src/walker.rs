//! # Tree Walker
//!
//! Forward and backward traversal exposing open/close events.
//!
//! An element with children is visited twice: once `entering` and once
//! `leaving`. Childless elements, text and comments are visited once. Walking
//! backward mirrors this: an element is first met at its close (`leaving`),
//! then its children in reverse, then its open (`entering`).
//!
//! The walker knows nothing about skip predicates. Callers decide whether to
//! descend by passing `into_children`, usually `!skip(node)`; see
//! [`Walker::step`].

use crate::document::{Document, NodeId};
use crate::skip::Skip;

#[derive(Debug, Clone)]
pub struct Walker<'d> {
    doc: &'d Document,
    current: Option<NodeId>,
    entering: bool,
    leaving: bool,
}

impl<'d> Walker<'d> {
    /// A walker positioned on the open event of `node`.
    pub fn new(doc: &'d Document, node: NodeId) -> Self {
        Self {
            doc,
            current: Some(node),
            entering: true,
            leaving: false,
        }
    }

    /// A walker positioned on the close event of `node`.
    ///
    /// Walking forward from here continues after `node`; walking backward
    /// descends into its last child.
    pub fn at_close(doc: &'d Document, node: NodeId) -> Self {
        Self {
            doc,
            current: Some(node),
            entering: false,
            leaving: true,
        }
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn entering(&self) -> bool {
        self.entering
    }

    pub fn leaving(&self) -> bool {
        self.leaving
    }

    /// True when the current visit is the last one for this node: its close
    /// event, or its only visit when it has no children to descend into.
    pub fn closes(&self, into_children: bool) -> bool {
        match self.current {
            Some(node) => {
                self.leaving || !into_children || self.doc.first_child(node).is_none()
            }
            None => false,
        }
    }

    /// Moves one step. Returns `false` once the walk has left the tree.
    pub fn walk(&mut self, into_children: bool, reverse: bool) -> bool {
        let Some(node) = self.current else {
            return false;
        };
        if reverse {
            self.step_backward(node, into_children);
        } else {
            self.step_forward(node, into_children);
        }
        self.current.is_some()
    }

    /// Moves one step, descending only into elements `skip` does not match.
    pub fn step(&mut self, skip: &dyn Skip, reverse: bool) -> bool {
        let into = self
            .current
            .is_some_and(|node| self.doc.is_element(node) && !skip.skip(self.doc, node));
        self.walk(into, reverse)
    }

    fn step_forward(&mut self, node: NodeId, into_children: bool) {
        if self.entering && into_children && self.doc.is_element(node) {
            if let Some(child) = self.doc.first_child(node) {
                self.visit(Some(child), true);
                return;
            }
        }
        match self.doc.next_sibling(node) {
            Some(next) => self.visit(Some(next), true),
            None => self.visit(self.doc.parent(node), false),
        }
    }

    fn step_backward(&mut self, node: NodeId, into_children: bool) {
        if self.leaving && into_children && self.doc.is_element(node) {
            if let Some(child) = self.doc.last_child(node) {
                self.visit(Some(child), false);
                return;
            }
        }
        match self.doc.prev_sibling(node) {
            Some(prev) => self.visit(Some(prev), false),
            None => self.visit(self.doc.parent(node), true),
        }
    }

    fn visit(&mut self, node: Option<NodeId>, entering: bool) {
        self.current = node;
        self.entering = entering;
        self.leaving = !entering;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skip::NoSkip;
    use pretty_assertions::assert_eq;

    /// `<div><p>a<b>b</b></p><hr/>c</div>`
    fn sample() -> Document {
        let mut doc = Document::new("div");
        let root = doc.root();
        let p = doc.append_element(root, "p");
        doc.append_text(p, "a");
        let b = doc.append_element(p, "b");
        doc.append_text(b, "b");
        doc.append_element(root, "hr");
        doc.append_text(root, "c");
        doc
    }

    fn label(doc: &Document, w: &Walker<'_>) -> String {
        let node = w.current().unwrap();
        let name = match doc.tag(node) {
            Some(tag) => tag.to_string(),
            None => doc.text(node).unwrap_or("#").to_string(),
        };
        if doc.is_element(node) && doc.first_child(node).is_some() {
            format!("{}{name}", if w.entering() { "+" } else { "-" })
        } else {
            name
        }
    }

    fn events(doc: &Document, mut w: Walker<'_>, reverse: bool) -> Vec<String> {
        let mut out = vec![label(doc, &w)];
        while w.step(&NoSkip, reverse) {
            out.push(label(doc, &w));
        }
        out
    }

    #[test]
    fn forward_walk_visits_open_and_close() {
        let doc = sample();
        let w = Walker::new(&doc, doc.root());
        assert_eq!(
            events(&doc, w, false),
            vec!["+div", "+p", "a", "+b", "b", "-b", "-p", "hr", "c", "-div"]
        );
    }

    #[test]
    fn backward_walk_mirrors_forward() {
        let doc = sample();
        let w = Walker::at_close(&doc, doc.root());
        assert_eq!(
            events(&doc, w, true),
            vec!["-div", "c", "hr", "-p", "-b", "b", "+b", "a", "+p", "+div"]
        );
    }

    #[test]
    fn not_descending_skips_the_subtree() {
        let doc = sample();
        let p = doc.first_child(doc.root()).unwrap();
        let mut w = Walker::new(&doc, p);
        assert!(w.walk(false, false));
        assert_eq!(doc.tag(w.current().unwrap()), Some("hr"));
    }

    #[test]
    fn walk_reports_leaving_the_tree() {
        let doc = sample();
        let mut w = Walker::at_close(&doc, doc.root());
        assert!(!w.walk(true, false));
        assert_eq!(w.current(), None);
        assert!(!w.walk(true, false));
    }
}
