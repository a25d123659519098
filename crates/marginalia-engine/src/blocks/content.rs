use crate::document::{Document, NodeId, NodeKind};

use super::classify::{DisplayRole, display_role};

/// What an element may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentModel {
    /// Blocks, inlines and text.
    Flow,
    /// Inlines and text only.
    Phrasing,
    /// Nothing.
    Empty,
    /// Unknown element: anything goes.
    Any,
}

impl ContentModel {
    pub fn of(tag: &str) -> Self {
        match display_role(tag) {
            DisplayRole::Block => match tag.to_ascii_lowercase().as_str() {
                "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "pre" | "dt" | "legend"
                | "summary" | "caption" => ContentModel::Phrasing,
                "hr" => ContentModel::Empty,
                _ => ContentModel::Flow,
            },
            DisplayRole::Inline => ContentModel::Phrasing,
            DisplayRole::None => ContentModel::Empty,
            DisplayRole::Unknown => ContentModel::Any,
        }
    }

    /// Whether an element with this model may hold a `child_tag` element.
    pub fn allows(self, child_tag: &str) -> bool {
        match self {
            ContentModel::Flow | ContentModel::Any => true,
            ContentModel::Phrasing => display_role(child_tag) != DisplayRole::Block,
            ContentModel::Empty => false,
        }
    }

    pub fn allows_text(self) -> bool {
        self != ContentModel::Empty
    }
}

/// A child that its parent's content model does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    pub parent: NodeId,
    pub child: NodeId,
}

/// Lists misnested children under `scope`, in document order.
///
/// Misnested blocks are still addressable: block paths look through inline
/// parents, so a `p` inside a `span` counts at the level of the span's
/// nearest block ancestor. The report is for authors tidying markup.
pub fn violations(doc: &Document, scope: NodeId) -> Vec<Violation> {
    let mut out = Vec::new();
    let mut stack = vec![scope];
    while let Some(parent) = stack.pop() {
        let Some(tag) = doc.tag(parent) else {
            continue;
        };
        let model = ContentModel::of(tag);
        let children: Vec<_> = doc.children(parent).collect();
        for &child in &children {
            let ok = match doc.kind(child) {
                NodeKind::Element { tag, .. } => model.allows(tag),
                NodeKind::Text(s) => model.allows_text() || s.trim().is_empty(),
                NodeKind::Comment(_) => true,
            };
            if !ok {
                out.push(Violation { parent, child });
            }
        }
        stack.extend(children.into_iter().rev());
    }
    out
}
