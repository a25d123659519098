//! In-memory canonical ranges: a reference element plus word offsets.
//!
//! A [`WordPoint`] holds a [`NodeId`], which only means something for the
//! document it came from. Everything persisted goes through
//! [`SequenceRange`] or [`XPathRange`].

use crate::addressing::{
    WordPointWalker, path_from_node, resolve_path, resolve_xpath, word_offset, xpath_from_node,
};
use crate::document::NodeId;
use crate::error::AddressError;
use crate::locator::Locator;

use super::sequence::{SequencePoint, SequenceRange};
use super::text::{Position, TextRange};
use super::xpath::{XPathPoint, XPathRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordPoint {
    pub rel: NodeId,
    pub words: u32,
    pub chars: u32,
}

impl WordPoint {
    pub fn new(rel: NodeId, words: u32, chars: u32) -> Self {
        Self { rel, words, chars }
    }

    /// Addresses `pos` relative to its nearest breaking ancestor.
    pub fn from_position(
        loc: &Locator<'_>,
        pos: Position,
        fall_forward: bool,
    ) -> Result<Self, AddressError> {
        if !loc.doc().is_ancestor_or_self(loc.root(), pos.container) {
            return Err(AddressError::NotInRoot);
        }
        let rel = loc.rel_for(pos.container).ok_or(AddressError::NotInRoot)?;
        let offset = word_offset(loc, rel, pos, fall_forward)?;
        Ok(Self::new(rel, offset.words, offset.chars))
    }

    pub fn to_position(&self, loc: &Locator<'_>) -> Result<Position, AddressError> {
        WordPointWalker::new(loc, self.rel).resolve(self.words, self.chars)
    }

    pub fn to_sequence_point(&self, loc: &Locator<'_>) -> Result<SequencePoint, AddressError> {
        let path = path_from_node(loc, self.rel).ok_or(AddressError::NotInRoot)?;
        Ok(SequencePoint::new(path, self.words, self.chars))
    }

    pub fn to_xpath_point(&self, loc: &Locator<'_>) -> Result<XPathPoint, AddressError> {
        let path = xpath_from_node(loc, self.rel).ok_or(AddressError::NotInRoot)?;
        Ok(XPathPoint::new(path, self.words, self.chars))
    }

    pub fn from_sequence_point(
        loc: &Locator<'_>,
        point: &SequencePoint,
    ) -> Result<Self, AddressError> {
        let rel = resolve_path(loc, &point.path)
            .ok_or_else(|| AddressError::PathUnresolved(point.path.to_string()))?;
        Ok(Self::new(rel, point.words, point.chars))
    }

    pub fn from_xpath_point(loc: &Locator<'_>, point: &XPathPoint) -> Result<Self, AddressError> {
        let rel = resolve_xpath(loc, &point.path)
            .ok_or_else(|| AddressError::PathUnresolved(point.path.to_string()))?;
        Ok(Self::new(rel, point.words, point.chars))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordRange {
    pub start: WordPoint,
    pub end: WordPoint,
}

impl WordRange {
    pub fn new(start: WordPoint, end: WordPoint) -> Self {
        Self { start, end }
    }

    /// Converts a raw selection. The start snaps forward to the next word
    /// when it sits between words; the end never moves.
    pub fn from_text_range(loc: &Locator<'_>, range: &TextRange) -> Result<Self, AddressError> {
        let start = WordPoint::from_position(loc, range.start(), true)?;
        let end = WordPoint::from_position(loc, range.end(), false)?;
        Ok(Self::new(start, end))
    }

    /// Resolves both points back to raw positions.
    ///
    /// Points sharing a `rel` are resolved in one walk.
    pub fn to_text_range(&self, loc: &Locator<'_>) -> Result<TextRange, AddressError> {
        let mut walker = WordPointWalker::new(loc, self.start.rel);
        let start = walker.resolve(self.start.words, self.start.chars)?;
        let shared = self.end.rel == self.start.rel
            && self.start.words != 0
            && (self.end.words, self.end.chars) > (self.start.words, self.start.chars);
        let end = if self.end == self.start {
            start
        } else if shared {
            walker.resolve(self.end.words, self.end.chars)?
        } else {
            self.end.to_position(loc)?
        };
        Ok(TextRange::new(start, end))
    }

    pub fn to_sequence_range(&self, loc: &Locator<'_>) -> Result<SequenceRange, AddressError> {
        let normalized = self.is_normalized(loc).unwrap_or(false);
        self.sequence_range_with(loc, normalized)
    }

    pub(crate) fn sequence_range_with(
        &self,
        loc: &Locator<'_>,
        normalized: bool,
    ) -> Result<SequenceRange, AddressError> {
        Ok(SequenceRange::new(
            self.start.to_sequence_point(loc)?,
            self.end.to_sequence_point(loc)?,
            normalized,
        ))
    }

    pub fn to_xpath_range(&self, loc: &Locator<'_>) -> Result<XPathRange, AddressError> {
        Ok(XPathRange::new(
            self.start.to_xpath_point(loc)?,
            self.end.to_xpath_point(loc)?,
        ))
    }

    pub fn from_sequence_range(
        loc: &Locator<'_>,
        range: &SequenceRange,
    ) -> Result<Self, AddressError> {
        Ok(Self::new(
            WordPoint::from_sequence_point(loc, &range.start)?,
            WordPoint::from_sequence_point(loc, &range.end)?,
        ))
    }

    pub fn from_xpath_range(loc: &Locator<'_>, range: &XPathRange) -> Result<Self, AddressError> {
        Ok(Self::new(
            WordPoint::from_xpath_point(loc, &range.start)?,
            WordPoint::from_xpath_point(loc, &range.end)?,
        ))
    }

    /// The same range re-addressed from the nearest breaking ancestor of each
    /// resolved position.
    pub fn normalized(&self, loc: &Locator<'_>) -> Result<Self, AddressError> {
        Self::from_text_range(loc, &self.to_text_range(loc)?)
    }

    pub fn is_normalized(&self, loc: &Locator<'_>) -> Result<bool, AddressError> {
        Ok(self.normalized(loc)? == *self)
    }
}
