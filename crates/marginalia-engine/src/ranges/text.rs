use std::cmp::Ordering;

use crate::document::{Document, NodeId};

/// A raw boundary point: a character offset inside a text node, or a child
/// index inside an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub container: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(container: NodeId, offset: usize) -> Self {
        Self { container, offset }
    }

    /// Document-order comparison of two positions.
    pub fn cmp_in(&self, doc: &Document, other: &Position) -> Ordering {
        doc.compare_boundaries((self.container, self.offset), (other.container, other.offset))
    }
}

/// Raw selection endpoints as a host's selection API reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start_container: NodeId,
    pub start_offset: usize,
    pub end_container: NodeId,
    pub end_offset: usize,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            start_container: start.container,
            start_offset: start.offset,
            end_container: end.container,
            end_offset: end.offset,
        }
    }

    /// A range covering all of `node`'s content.
    pub fn select_contents(doc: &Document, node: NodeId) -> Self {
        let end = if doc.is_text(node) {
            doc.text_len(node)
        } else {
            doc.child_count(node)
        };
        Self::new(Position::new(node, 0), Position::new(node, end))
    }

    pub fn start(&self) -> Position {
        Position::new(self.start_container, self.start_offset)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_container, self.end_offset)
    }

    /// True when the end does not come after the start.
    pub fn is_collapsed(&self, doc: &Document) -> bool {
        self.start().cmp_in(doc, &self.end()) != Ordering::Less
    }

    /// Text of a range whose endpoints share one text node. Other ranges
    /// return `None`; use [`partition`](crate::partition::partition) for those.
    pub fn single_node_text<'d>(&self, doc: &'d Document) -> Option<&'d str> {
        if self.start_container != self.end_container || self.start_offset > self.end_offset {
            return None;
        }
        let text = doc.text(self.start_container)?;
        let from = char_to_byte(text, self.start_offset);
        let to = char_to_byte(text, self.end_offset);
        Some(&text[from..to])
    }
}

/// Byte index of the `chars`-th character, clamped to the string length.
pub(crate) fn char_to_byte(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_node_text_counts_characters() {
        let mut doc = Document::new("p");
        let t = doc.append_text(doc.root(), "naïve café");
        let range = TextRange::new(Position::new(t, 2), Position::new(t, 9));
        assert_eq!(range.single_node_text(&doc), Some("ïve caf"));
        assert!(!range.is_collapsed(&doc));
    }

    #[test]
    fn collapsed_and_inverted_ranges() {
        let mut doc = Document::new("p");
        let t = doc.append_text(doc.root(), "abc");
        let collapsed = TextRange::new(Position::new(t, 1), Position::new(t, 1));
        let inverted = TextRange::new(Position::new(t, 2), Position::new(t, 1));
        assert!(collapsed.is_collapsed(&doc));
        assert!(inverted.is_collapsed(&doc));
        assert_eq!(inverted.single_node_text(&doc), None);
    }

    #[test]
    fn select_contents_spans_children() {
        let mut doc = Document::new("div");
        let root = doc.root();
        doc.append_element(root, "p");
        doc.append_element(root, "p");
        let range = TextRange::select_contents(&doc, root);
        assert_eq!(range.end(), Position::new(root, 2));
    }
}
