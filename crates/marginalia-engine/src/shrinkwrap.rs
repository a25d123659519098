//! Range normalization ("shrink-wrap").
//!
//! Moves a raw selection's start forward onto its first visible
//! non-whitespace character and its end backward to just after its last one.
//! Skipped subtrees are stepped over whole. A selection holding nothing but
//! whitespace or skipped content is rejected instead of being guessed at.

use std::cmp::Ordering;

use crate::document::NodeId;
use crate::error::{AddressError, SelectionError};
use crate::locator::Locator;
use crate::ranges::{Position, TextRange};
use crate::trace::{Topic, trace_event};
use crate::walker::Walker;

pub fn shrink_wrap(loc: &Locator<'_>, range: &TextRange) -> Result<TextRange, SelectionError> {
    let doc = loc.doc();
    for container in [range.start_container, range.end_container] {
        if !doc.is_ancestor_or_self(loc.root(), container) {
            return Err(AddressError::NotInRoot.into());
        }
    }
    if range.is_collapsed(doc) {
        return Err(SelectionError::Collapsed);
    }

    let start = first_visible_char(loc, range.start()).ok_or(SelectionError::WhitespaceOnly)?;
    let end = last_visible_char_end(loc, range.end()).ok_or(SelectionError::WhitespaceOnly)?;
    if start.cmp_in(doc, &end) != Ordering::Less {
        trace_event!(loc.trace(), Topic::ShrinkWrap, "{range:?} holds no visible text");
        return Err(SelectionError::WhitespaceOnly);
    }

    let wrapped = TextRange::new(start, end);
    trace_event!(loc.trace(), Topic::ShrinkWrap, "{range:?} -> {wrapped:?}");
    Ok(wrapped)
}

/// The first non-whitespace character at or after `pos`.
fn first_visible_char(loc: &Locator<'_>, pos: Position) -> Option<Position> {
    let doc = loc.doc();
    let mut w = match outermost_skipped(loc, pos.container) {
        Some(skipped) => Walker::at_close(doc, skipped),
        None => {
            if let Some(text) = doc.text(pos.container)
                && let Some(i) = text
                    .chars()
                    .enumerate()
                    .skip(pos.offset)
                    .find_map(|(i, c)| (!c.is_whitespace()).then_some(i))
            {
                return Some(Position::new(pos.container, i));
            }
            walker_before(loc, pos)
        }
    };

    loop {
        if at_root_end(loc, &w, false) || !w.step(loc.skip(), false) {
            return None;
        }
        let node = w.current()?;
        if loc.is_skipped(node) {
            continue;
        }
        if let Some(i) = doc
            .text(node)
            .and_then(|text| text.chars().position(|c| !c.is_whitespace()))
        {
            return Some(Position::new(node, i));
        }
    }
}

/// Just after the last non-whitespace character at or before `pos`.
fn last_visible_char_end(loc: &Locator<'_>, pos: Position) -> Option<Position> {
    let doc = loc.doc();
    let mut w = match outermost_skipped(loc, pos.container) {
        Some(skipped) => Walker::new(doc, skipped),
        None => {
            if let Some(text) = doc.text(pos.container)
                && let Some(i) = last_non_space(text, pos.offset)
            {
                return Some(Position::new(pos.container, i + 1));
            }
            walker_after(loc, pos)
        }
    };

    loop {
        if at_root_end(loc, &w, true) || !w.step(loc.skip(), true) {
            return None;
        }
        let node = w.current()?;
        if loc.is_skipped(node) {
            continue;
        }
        if let Some(i) = doc.text(node).and_then(|text| last_non_space(text, usize::MAX)) {
            return Some(Position::new(node, i + 1));
        }
    }
}

/// Index of the last non-whitespace char among the first `limit` chars.
fn last_non_space(text: &str, limit: usize) -> Option<usize> {
    text.chars()
        .take(limit)
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .last()
}

/// A walker whose next forward step visits the first node after `pos`.
pub(crate) fn walker_before<'a>(loc: &Locator<'a>, pos: Position) -> Walker<'a> {
    let doc = loc.doc();
    if doc.is_text(pos.container) {
        return Walker::at_close(doc, pos.container);
    }
    let k = pos.offset.min(doc.child_count(pos.container));
    match k.checked_sub(1).and_then(|i| doc.child_at(pos.container, i)) {
        Some(prev) => Walker::at_close(doc, prev),
        None => Walker::new(doc, pos.container),
    }
}

/// A walker whose next backward step visits the last node before `pos`.
fn walker_after<'a>(loc: &Locator<'a>, pos: Position) -> Walker<'a> {
    let doc = loc.doc();
    if doc.is_text(pos.container) {
        return Walker::new(doc, pos.container);
    }
    match doc.child_at(pos.container, pos.offset) {
        Some(next) => Walker::new(doc, next),
        None => Walker::at_close(doc, pos.container),
    }
}

/// True when the next step in the given direction would leave the root.
pub(crate) fn at_root_end(loc: &Locator<'_>, w: &Walker<'_>, reverse: bool) -> bool {
    let Some(node) = w.current() else {
        return true;
    };
    if node != loc.root() {
        return false;
    }
    let childless = loc.doc().first_child(node).is_none();
    if reverse {
        w.entering() || childless
    } else {
        w.leaving() || childless
    }
}

/// The outermost skipped ancestor-or-self of `node` below the root.
fn outermost_skipped(loc: &Locator<'_>, node: NodeId) -> Option<NodeId> {
    let mut found = None;
    let mut cur = Some(node);
    while let Some(n) = cur {
        if n == loc.root() {
            break;
        }
        if loc.is_skipped(n) {
            found = Some(n);
        }
        cur = loc.doc().parent(n);
    }
    found
}
