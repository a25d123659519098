//! Error types shared across the engine.
//!
//! Failures are split by how a host should react to them:
//!
//! - [`ParseError`]: a persisted string is corrupt. Skip that annotation.
//! - [`AddressError`]: an address no longer resolves against the document.
//!   Show the annotation as "anchor lost" instead of highlighting it.
//! - [`SelectionError`]: a raw selection cannot become an annotation.
//!   Abort the create action and tell the user.

use thiserror::Error;

/// A persisted range or point string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid block path: {0:?}")]
    BlockPath(String),
    #[error("invalid sequence point: {0:?}")]
    SequencePoint(String),
    #[error("invalid sequence range: {0:?}")]
    SequenceRange(String),
    #[error("invalid xpath expression: {0:?}")]
    XPath(String),
    #[error("invalid xpath range: {0:?}")]
    XPathRange(String),
    #[error("unknown trace topic: {0:?}")]
    TraceTopic(String),
}

/// An address could not be computed from, or resolved against, a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("node is not inside the addressing root")]
    NotInRoot,
    #[error("path {0} does not resolve to an element")]
    PathUnresolved(String),
    #[error("word {words} char {chars} lies beyond the end of the content")]
    PointNotFound { words: u32, chars: u32 },
    #[error("walk ended before the selection position was reached")]
    TargetNotReached,
    #[error("range end precedes its start")]
    Inverted,
}

/// A raw selection could not be turned into an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection is collapsed")]
    Collapsed,
    #[error("selection contains only whitespace or ignored content")]
    WhitespaceOnly,
    #[error("selection quote is empty")]
    EmptyQuote,
    #[error(transparent)]
    Address(#[from] AddressError),
}
