//! Splits a range into one raw sub-range per text node, for highlighting,
//! and rebuilds its quote.

use std::cmp::Ordering;

use crate::document::NodeId;
use crate::error::AddressError;
use crate::locator::Locator;
use crate::ranges::{Position, TextRange, WordRange};
use crate::shrinkwrap::{at_root_end, walker_before};
use crate::trace::{Topic, trace_event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Non-empty sub-ranges, each inside a single text node, in document order.
    pub ranges: Vec<TextRange>,
    /// Covered text, one space per block boundary, whitespace collapsed.
    pub quote: String,
}

impl Partition {
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Resolves `range` and partitions it.
pub fn partition(loc: &Locator<'_>, range: &WordRange) -> Result<Partition, AddressError> {
    let text_range = range.to_text_range(loc)?;
    let doc = loc.doc();
    if text_range.start().cmp_in(doc, &text_range.end()) == Ordering::Greater {
        return Err(AddressError::Inverted);
    }
    Ok(partition_text_range(loc, &text_range))
}

/// Partitions an already-resolved raw range.
pub fn partition_text_range(loc: &Locator<'_>, range: &TextRange) -> Partition {
    let doc = loc.doc();
    let start = range.start();
    let end = range.end();
    let mut builder = Builder::default();

    if doc.is_text(start.container) && loc.is_visible(start.container) {
        let to = if end.container == start.container {
            end.offset
        } else {
            doc.text_len(start.container)
        };
        builder.push(loc, start.container, start.offset, to);
    }

    let mut w = walker_before(loc, start);
    loop {
        if at_root_end(loc, &w, false) || !w.step(loc.skip(), false) {
            break;
        }
        let Some(node) = w.current() else {
            break;
        };
        if w.entering() && begins_at_or_after(loc, node, end) {
            break;
        }
        if loc.is_skipped(node) {
            continue;
        }
        if loc.is_breaking(node) {
            builder.pending_break = true;
        } else if doc.is_text(node) {
            let to = if node == end.container { end.offset } else { doc.text_len(node) };
            builder.push(loc, node, 0, to);
        }
    }

    let result = builder.finish();
    trace_event!(
        loc.trace(),
        Topic::Partition,
        "{range:?} -> {} part(s), quote {:?}",
        result.ranges.len(),
        result.quote
    );
    result
}

/// Whether the boundary just before `node` is at or past `end`.
fn begins_at_or_after(loc: &Locator<'_>, node: NodeId, end: Position) -> bool {
    let doc = loc.doc();
    let before = match doc.parent(node) {
        Some(parent) => (parent, doc.index_in_parent(node)),
        None => (node, 0),
    };
    doc.compare_boundaries(before, (end.container, end.offset)) != Ordering::Less
}

#[derive(Debug, Default)]
struct Builder {
    ranges: Vec<TextRange>,
    raw: String,
    pending_break: bool,
}

impl Builder {
    fn push(&mut self, loc: &Locator<'_>, node: NodeId, from: usize, to: usize) {
        if from >= to {
            return;
        }
        let range = TextRange::new(Position::new(node, from), Position::new(node, to));
        if self.pending_break && !self.raw.is_empty() {
            self.raw.push(' ');
        }
        self.pending_break = false;
        if let Some(text) = range.single_node_text(loc.doc()) {
            self.raw.push_str(text);
        }
        self.ranges.push(range);
    }

    fn finish(self) -> Partition {
        Partition {
            ranges: self.ranges,
            quote: collapse_whitespace(&self.raw),
        }
    }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
