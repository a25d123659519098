//! Readable persisted ranges: `div[3]/p[5]/word(2)/char(0);...`.
//!
//! These resolve like sequence ranges but carry no ordering: tag-indexed
//! steps from different starting ids cannot be compared without resolving
//! them first.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::addressing::XPathExpr;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathPoint {
    pub path: XPathExpr,
    pub words: u32,
    pub chars: u32,
}

impl XPathPoint {
    pub fn new(path: XPathExpr, words: u32, chars: u32) -> Self {
        Self { path, words, chars }
    }
}

fn offsets_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.*?)/word\(([0-9]+)\)/char\(([0-9]+)\)$").expect("Invalid xpath point regex")
    })
}

impl fmt::Display for XPathPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.words == 0 {
            return write!(f, "{}", self.path);
        }
        write!(f, "{}/word({})/char({})", self.path, self.words, self.chars)
    }
}

impl FromStr for XPathPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::XPathRange(s.to_string());
        match offsets_regex().captures(s) {
            Some(caps) => {
                let path = caps[1].parse().map_err(|_| err())?;
                let words = caps[2].parse().map_err(|_| err())?;
                let chars = caps[3].parse().map_err(|_| err())?;
                Ok(Self::new(path, words, chars))
            }
            None => Ok(Self::new(s.parse().map_err(|_| err())?, 0, 0)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathRange {
    pub start: XPathPoint,
    pub end: XPathPoint,
}

impl XPathRange {
    pub fn new(start: XPathPoint, end: XPathPoint) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for XPathRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.start, self.end)
    }
}

impl FromStr for XPathRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(';')
            .ok_or_else(|| ParseError::XPathRange(s.to_string()))?;
        Ok(Self::new(start.parse()?, end.parse()?))
    }
}
