use std::fmt;

use crate::blocks::is_breaking;
use crate::document::{Document, NodeId};
use crate::ranges::Position;
use crate::skip::Skip;
use crate::trace::Trace;
use crate::walker::Walker;

/// Everything an address conversion needs: the document, the root addresses
/// are relative to, the skip predicate, and the enabled trace topics.
///
/// Forward conversions (selection to address) and inverse ones (address to
/// selection) must see the same root and skip predicate. Bundling them here
/// keeps them paired.
#[derive(Clone)]
pub struct Locator<'a> {
    doc: &'a Document,
    root: NodeId,
    skip: &'a dyn Skip,
    trace: Trace,
    id_anchors: bool,
}

impl<'a> Locator<'a> {
    pub fn new(doc: &'a Document, root: NodeId, skip: &'a dyn Skip) -> Self {
        Self {
            doc,
            root,
            skip,
            trace: Trace::none(),
            id_anchors: false,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.trace = trace;
        self
    }

    /// Lets XPath addresses start from the nearest ancestor carrying an `id`.
    pub fn with_id_anchors(mut self, enabled: bool) -> Self {
        self.id_anchors = enabled;
        self
    }

    pub fn doc(&self) -> &'a Document {
        self.doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn skip(&self) -> &'a dyn Skip {
        self.skip
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn id_anchors(&self) -> bool {
        self.id_anchors
    }

    pub fn walker(&self, node: NodeId) -> Walker<'a> {
        Walker::new(self.doc, node)
    }

    pub fn is_skipped(&self, node: NodeId) -> bool {
        self.skip.skip(self.doc, node)
    }

    /// A non-skipped element with a breaking tag.
    pub fn is_breaking(&self, node: NodeId) -> bool {
        self.doc.tag(node).is_some_and(is_breaking) && !self.is_skipped(node)
    }

    /// Whether `node` lies inside the root and outside any skipped subtree.
    pub fn is_visible(&self, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.is_skipped(n) {
                return false;
            }
            if n == self.root {
                return true;
            }
            cur = self.doc.parent(n);
        }
        false
    }

    /// The nearest breaking ancestor-or-self of `node`, or the root when
    /// there is none below it. `None` when `node` is outside the root.
    pub fn rel_for(&self, node: NodeId) -> Option<NodeId> {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == self.root || self.is_breaking(n) {
                return Some(n);
            }
            cur = self.doc.parent(n);
        }
        None
    }

    /// Visible text nodes under `scope`, in document order.
    pub fn text_nodes(&self, scope: NodeId) -> Vec<NodeId> {
        if self.is_skipped(scope) {
            return Vec::new();
        }
        if self.doc.is_text(scope) {
            return vec![scope];
        }
        let mut out = Vec::new();
        if self.doc.first_child(scope).is_none() {
            return out;
        }
        let mut w = self.walker(scope);
        while w.step(self.skip, false) {
            let Some(node) = w.current() else {
                break;
            };
            if node == scope {
                break;
            }
            if self.doc.is_text(node) && !self.is_skipped(node) {
                out.push(node);
            }
        }
        out
    }

    /// Converts a character offset into the visible text of `block` into a
    /// text-node position.
    ///
    /// An offset equal to the text length maps to the end of the last text
    /// node. Returns `None` for offsets past the end, or when `block` holds
    /// no visible text.
    pub fn text_position(&self, block: NodeId, offset: usize) -> Option<Position> {
        let mut remaining = offset;
        let mut last = None;
        for node in self.text_nodes(block) {
            let len = self.doc.text_len(node);
            if remaining < len {
                return Some(Position::new(node, remaining));
            }
            remaining -= len;
            last = Some(Position::new(node, len));
        }
        if remaining == 0 { last } else { None }
    }
}

impl fmt::Debug for Locator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("root", &self.root)
            .field("trace", &self.trace)
            .field("id_anchors", &self.id_anchors)
            .finish_non_exhaustive()
    }
}
