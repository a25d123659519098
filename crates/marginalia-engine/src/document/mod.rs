//! # Document Tree
//!
//! An ordered, rooted tree of elements, text and comments, stored in a flat
//! arena. Nodes are addressed by [`NodeId`], a plain index that is only
//! meaningful for the [`Document`] that produced it and is never persisted:
//! persisted addresses always go through block paths or XPath strings.
//!
//! The engine reads the tree; the only mutation it performs is
//! [`Document::normalize`], and only when a host asks for it.

pub mod markup;

use std::cmp::Ordering;

pub use markup::to_markup;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Index of this node in its document's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    /// Inline noise: never text, never breaking.
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Arena-backed document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Creates a document whose root is an element named `root_tag`.
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Element {
                tag: root_tag.to_string(),
                attrs: Vec::new(),
            })],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever allocated, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_child(self.root()).is_none()
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    // Construction

    /// Appends a new element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append(
            parent,
            NodeKind::Element {
                tag: tag.to_string(),
                attrs: Vec::new(),
            },
        )
    }

    /// Appends a new text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Text(text.to_string()))
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Comment(text.to_string()))
    }

    fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = Node::new(kind);
        node.parent = Some(parent);
        node.prev_sibling = self.node(parent).last_child;
        self.nodes.push(node);

        match self.node(parent).last_child {
            Some(last) => self.node_mut(last).next_sibling = Some(id),
            None => self.node_mut(parent).first_child = Some(id),
        }
        self.node_mut(parent).last_child = Some(id);
        id
    }

    /// Sets (or replaces) an attribute. Ignored for non-elements.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.node_mut(node).kind {
            match attrs.iter_mut().find(|(n, _)| n == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    /// Unlinks `node` from its parent and siblings. The arena slot stays allocated.
    fn detach(&mut self, node: NodeId) {
        let Node {
            parent,
            prev_sibling,
            next_sibling,
            ..
        } = *self.node(node);

        match prev_sibling {
            Some(prev) => self.node_mut(prev).next_sibling = next_sibling,
            None => {
                if let Some(p) = parent {
                    self.node_mut(p).first_child = next_sibling;
                }
            }
        }
        match next_sibling {
            Some(next) => self.node_mut(next).prev_sibling = prev_sibling,
            None => {
                if let Some(p) = parent {
                    self.node_mut(p).last_child = prev_sibling;
                }
            }
        }

        let n = self.node_mut(node);
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
    }

    /// Merges adjacent text nodes and drops empty ones beneath `node`.
    ///
    /// Addresses computed before and after normalizing agree, because text
    /// node boundaries never count as word separators.
    pub fn normalize(&mut self, node: NodeId) {
        let mut elements = vec![node];
        let mut i = 0;
        while i < elements.len() {
            let el = elements[i];
            i += 1;
            let mut child = self.first_child(el);
            while let Some(c) = child {
                if self.is_element(c) {
                    elements.push(c);
                    child = self.next_sibling(c);
                    continue;
                }
                if !self.is_text(c) {
                    child = self.next_sibling(c);
                    continue;
                }

                let mut next = self.next_sibling(c);
                while let Some(t) = next.filter(|&t| self.is_text(t)) {
                    next = self.next_sibling(t);
                    let extra = match &mut self.node_mut(t).kind {
                        NodeKind::Text(s) => std::mem::take(s),
                        _ => String::new(),
                    };
                    if let NodeKind::Text(s) = &mut self.node_mut(c).kind {
                        s.push_str(&extra);
                    }
                    self.detach(t);
                }
                if self.text(c).is_some_and(str::is_empty) {
                    self.detach(c);
                }
                child = next;
            }
        }
    }

    // Node access

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.node(node).kind
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.node(node).kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.node(node).kind, NodeKind::Text(_))
    }

    /// Tag name of an element, as stored.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id").filter(|id| !id.is_empty())
    }

    /// Value of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Length of a text node in characters (0 for other nodes).
    pub fn text_len(&self, node: NodeId) -> usize {
        self.text(node).map_or(0, |s| s.chars().count())
    }

    /// Concatenated text of every text node under `node`, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.node(node).kind {
            NodeKind::Text(s) => out.push_str(s),
            NodeKind::Element { .. } => {
                for child in self.children(node) {
                    self.collect_text(child, out);
                }
            }
            NodeKind::Comment(_) => {}
        }
    }

    // Navigation

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).first_child
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).last_child
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).next_sibling
    }

    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).prev_sibling
    }

    pub fn children(&self, node: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.first_child(node),
        }
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.children(node).count()
    }

    pub fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.children(node).nth(index)
    }

    /// Position of `node` among its parent's children.
    pub fn index_in_parent(&self, node: NodeId) -> usize {
        let mut index = 0;
        let mut prev = self.prev_sibling(node);
        while let Some(p) = prev {
            index += 1;
            prev = self.prev_sibling(p);
        }
        index
    }

    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// First element under `scope` (inclusive) whose `id` attribute equals `id`.
    pub fn element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        let mut stack = vec![scope];
        while let Some(node) = stack.pop() {
            if self.id_of(node) == Some(id) {
                return Some(node);
            }
            // Push in reverse so the leftmost child is examined first.
            let children: Vec<_> = self.children(node).collect();
            stack.extend(children.into_iter().rev());
        }
        None
    }

    /// Compares two boundary points in document order.
    ///
    /// A point is `(container, offset)`: a character offset when the
    /// container is a text node, a child index when it is an element.
    pub fn compare_boundaries(&self, a: (NodeId, usize), b: (NodeId, usize)) -> Ordering {
        self.boundary_key(a).cmp(&self.boundary_key(b))
    }

    fn boundary_key(&self, (container, offset): (NodeId, usize)) -> Vec<usize> {
        let mut key = Vec::new();
        let mut cur = container;
        while let Some(parent) = self.parent(cur) {
            key.push(self.index_in_parent(cur));
            cur = parent;
        }
        key.reverse();
        key.push(offset);
        key
    }
}

/// Iterator over the children of a node.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.doc.next_sibling(cur);
        Some(cur)
    }
}
