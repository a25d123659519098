//! Orderable, persisted ranges: block path plus word/char offsets.
//!
//! Current format: `/2/1.0;/2/1.3`. Two older formats still parse:
//! `/5/2 1.0 1.5` (one path shared by both points) and `1.0 1.5` (implicit
//! root path). Those come back with `normalized = false`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::addressing::BlockPath;
use crate::error::{AddressError, ParseError};
use crate::locator::Locator;

use super::word::WordRange;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequencePoint {
    pub path: BlockPath,
    pub words: u32,
    pub chars: u32,
}

impl SequencePoint {
    pub fn new(path: BlockPath, words: u32, chars: u32) -> Self {
        Self { path, words, chars }
    }
}

impl fmt::Display for SequencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.words == 0 {
            return write!(f, "{}", self.path);
        }
        if self.path.is_root() {
            write!(f, "/{}.{}", self.words, self.chars)
        } else {
            write!(f, "{}/{}.{}", self.path, self.words, self.chars)
        }
    }
}

/// Parses `words.chars`.
fn parse_offsets(s: &str) -> Option<(u32, u32)> {
    let (words, chars) = s.split_once('.')?;
    if words.is_empty() || chars.is_empty() {
        return None;
    }
    if !words.bytes().chain(chars.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((words.parse().ok()?, chars.parse().ok()?))
}

impl FromStr for SequencePoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::SequencePoint(s.to_string());
        let (head, last) = s.rsplit_once('/').ok_or_else(err)?;
        if last.contains('.') {
            let (words, chars) = parse_offsets(last).ok_or_else(err)?;
            let path = if head.is_empty() {
                BlockPath::root()
            } else {
                head.parse().map_err(|_| err())?
            };
            return Ok(Self::new(path, words, chars));
        }
        let path = s.parse().map_err(|_| err())?;
        Ok(Self::new(path, 0, 0))
    }
}

/// Two sequence points plus whether their paths are known to be the lowest
/// ones valid for their offsets.
///
/// Equality and ordering look at the points only.
#[derive(Debug, Clone)]
pub struct SequenceRange {
    pub start: SequencePoint,
    pub end: SequencePoint,
    pub normalized: bool,
}

fn legacy_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^/[/0-9]*$").expect("Invalid legacy path regex"))
}

impl SequenceRange {
    pub fn new(start: SequencePoint, end: SequencePoint, normalized: bool) -> Self {
        Self { start, end, normalized }
    }

    /// Rewrites both points against their lowest valid block paths.
    pub fn normalize(&self, loc: &Locator<'_>) -> Result<SequenceRange, AddressError> {
        WordRange::from_sequence_range(loc, self)?
            .normalized(loc)?
            .sequence_range_with(loc, true)
    }
}

impl PartialEq for SequenceRange {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for SequenceRange {}

impl Ord for SequenceRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl PartialOrd for SequenceRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SequenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.start, self.end)
    }
}

impl FromStr for SequenceRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::SequenceRange(s.to_string());
        if let Some((start, end)) = s.split_once(';') {
            let start = start.parse().map_err(|_| err())?;
            let end = end.parse().map_err(|_| err())?;
            return Ok(Self::new(start, end, true));
        }

        let parts: Vec<&str> = s.split_whitespace().collect();
        let (path, start, end) = match parts.as_slice() {
            [path, start, end] if legacy_path_regex().is_match(path) => {
                (path.parse().map_err(|_| err())?, *start, *end)
            }
            [start, end] => (BlockPath::root(), *start, *end),
            _ => return Err(err()),
        };
        let (sw, sc) = parse_offsets(start).ok_or_else(err)?;
        let (ew, ec) = parse_offsets(end).ok_or_else(err)?;
        Ok(Self::new(
            SequencePoint::new(path.clone(), sw, sc),
            SequencePoint::new(path, ew, ec),
            false,
        ))
    }
}
