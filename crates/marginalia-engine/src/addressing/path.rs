use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::document::NodeId;
use crate::error::ParseError;
use crate::locator::Locator;
use crate::trace::{Topic, trace_event};

/// Ordinals of breaking elements from the root down to a reference element.
///
/// Each segment is a 1-based position counted among the breaking,
/// non-skipped elements one block level down, looking through non-breaking
/// wrappers. Serialized as `/2/1/3`; the root itself is `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlockPath(Vec<u32>);

impl BlockPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_segments(segments: Vec<u32>) -> Result<Self, ParseError> {
        if segments.contains(&0) {
            return Err(ParseError::BlockPath(format!("{segments:?}")));
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// True when `self` is a strict prefix of `other`.
    pub fn is_ancestor_of(&self, other: &BlockPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for seg in &self.0 {
            write!(f, "/{seg}")?;
        }
        Ok(())
    }
}

impl FromStr for BlockPath {
    type Err = ParseError;

    /// Accepts `/`, `/2/1/3`, and the trailing-slash form `/2/1/3/`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::BlockPath(s.to_string());
        let body = s.strip_prefix('/').ok_or_else(err)?;
        let body = body.strip_suffix('/').unwrap_or(body);
        if body.is_empty() {
            return Ok(Self::root());
        }
        let segments = body
            .split('/')
            .map(|seg| match seg.parse::<u32>() {
                Ok(n) if n > 0 && seg.bytes().all(|b| b.is_ascii_digit()) => Ok(n),
                _ => Err(err()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(segments))
    }
}

impl Ord for BlockPath {
    /// Segment-wise numeric comparison; a strict prefix (an ancestor) sorts
    /// before every path that extends it.
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(&other.0) {
            match a.cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for BlockPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Breaking, non-skipped elements directly under `parent` at block level,
/// in document order.
///
/// Non-breaking elements (`span`, `a`, unknown tags) are transparent: blocks
/// nested inside them count as children of the nearest breaking ancestor.
fn block_children(loc: &Locator<'_>, parent: NodeId) -> Vec<NodeId> {
    let doc = loc.doc();
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = doc.children(parent).collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        if !doc.is_element(node) || loc.is_skipped(node) {
            continue;
        }
        if loc.is_breaking(node) {
            out.push(node);
        } else {
            let start = stack.len();
            stack.extend(doc.children(node));
            stack[start..].reverse();
        }
    }
    out
}

/// The nearest ancestor of `node` that is breaking or the root.
fn block_parent(loc: &Locator<'_>, node: NodeId) -> Option<NodeId> {
    let mut cur = loc.doc().parent(node)?;
    while cur != loc.root() && !loc.is_breaking(cur) {
        cur = loc.doc().parent(cur)?;
    }
    Some(cur)
}

/// Computes the block path from the locator's root down to `rel`.
///
/// Only breaking ancestors contribute segments. A non-breaking `rel` gets
/// the path of its nearest breaking ancestor. Returns `None` when `rel` is
/// not inside the root or sits in a skipped subtree.
pub fn path_from_node(loc: &Locator<'_>, rel: NodeId) -> Option<BlockPath> {
    let mut segments = Vec::new();
    let mut node = rel;
    while node != loc.root() {
        let parent = block_parent(loc, node)?;
        if loc.is_breaking(node) {
            let index = block_children(loc, parent)
                .iter()
                .position(|&child| child == node)?;
            segments.push(index as u32 + 1);
        }
        node = parent;
    }
    segments.reverse();
    let path = BlockPath(segments);
    trace_event!(loc.trace(), Topic::Path, "{rel:?} -> {path}");
    Some(path)
}

/// Resolves a block path back to an element under the locator's root.
///
/// `None` means the anchor is lost: some segment asks for more breaking
/// children than its parent has.
pub fn resolve_path(loc: &Locator<'_>, path: &BlockPath) -> Option<NodeId> {
    let mut node = loc.root();
    for &seg in path.segments() {
        let found = (seg as usize)
            .checked_sub(1)
            .and_then(|index| block_children(loc, node).get(index).copied());
        match found {
            Some(child) => node = child,
            None => {
                trace_event!(loc.trace(), Topic::Path, "{path} lost at segment {seg}");
                return None;
            }
        }
    }
    Some(node)
}
