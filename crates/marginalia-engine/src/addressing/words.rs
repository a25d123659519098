//! Word/character addressing.
//!
//! A position is described relative to a reference element `rel` as
//! `(words, chars)`: the 1-based word counted forward from the start of
//! `rel`'s content, and the number of characters consumed inside that word.
//! `(0, 0)` is the start of `rel` itself. Breaking element boundaries end
//! words even without whitespace; whitespace runs count as one separator;
//! text node boundaries and inline elements are invisible.
//!
//! [`word_offset`] computes an address from a raw position in one forward
//! walk. [`WordPointWalker`] does the inverse and can resolve several
//! increasing points from the same `rel` in a single pass.

use crate::document::{Document, NodeId};
use crate::error::AddressError;
use crate::locator::Locator;
use crate::ranges::Position;
use crate::trace::{Topic, trace_event};
use crate::walker::Walker;

/// A raw position expressed against tree structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// Character offset inside a text node.
    InText { node: NodeId, offset: usize },
    /// Immediately before `node` (an element offset naming a child).
    Before(NodeId),
    /// At the end of `node`'s content (an element offset past its last child).
    EndOf(NodeId),
}

impl Target {
    pub(crate) fn from_position(doc: &Document, pos: Position) -> Self {
        if doc.is_text(pos.container) {
            return Target::InText {
                node: pos.container,
                offset: pos.offset.min(doc.text_len(pos.container)),
            };
        }
        match doc.child_at(pos.container, pos.offset) {
            Some(child) => Target::Before(child),
            None => Target::EndOf(pos.container),
        }
    }
}

/// Scanner states.
///
/// `TargetSpace`/`TargetWord` are `Space`/`Word` while inside the text node
/// holding the target, before its offset is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Space,
    Word,
    TargetSpace,
    TargetWord,
    /// Target reached between words; looking for the next word to start at.
    FallForward,
    Done,
}

/// Output of [`word_offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordOffset {
    pub words: u32,
    pub chars: u32,
    /// Fall-forward hit a block boundary (or the end of the document) before
    /// finding another word. The offset then names the end of the previous
    /// word, which is still a valid point.
    pub fell_off_block: bool,
}

#[derive(Debug)]
struct Scanner {
    target: Target,
    fall_forward: bool,
    state: ScanState,
    words: u32,
    chars: u32,
    fell_off_block: bool,
}

impl Scanner {
    fn new(target: Target, fall_forward: bool) -> Self {
        Self {
            target,
            fall_forward,
            state: ScanState::Space,
            words: 0,
            chars: 0,
            fell_off_block: false,
        }
    }

    fn done(&self) -> bool {
        self.state == ScanState::Done
    }

    /// A breaking element opened or closed.
    fn boundary(&mut self) {
        self.state = match self.state {
            ScanState::Word | ScanState::TargetWord => ScanState::Space,
            ScanState::FallForward => {
                self.fell_off_block = true;
                ScanState::Done
            }
            state => state,
        };
    }

    /// The walk arrived at the raw position.
    fn reached(&mut self) {
        self.state = match self.state {
            ScanState::Space | ScanState::TargetSpace if self.fall_forward => ScanState::FallForward,
            ScanState::FallForward => ScanState::FallForward,
            _ => ScanState::Done,
        };
    }

    fn char(&mut self, c: char) {
        let space = c.is_whitespace();
        self.state = match (self.state, space) {
            (ScanState::Word, true) => ScanState::Space,
            (ScanState::TargetWord, true) => ScanState::TargetSpace,
            (ScanState::Space, false) => {
                self.words += 1;
                self.chars = 1;
                ScanState::Word
            }
            (ScanState::TargetSpace, false) => {
                self.words += 1;
                self.chars = 1;
                ScanState::TargetWord
            }
            (ScanState::Word | ScanState::TargetWord, false) => {
                self.chars += 1;
                self.state
            }
            (ScanState::FallForward, false) => {
                self.words += 1;
                self.chars = 0;
                ScanState::Done
            }
            (state, _) => state,
        };
    }

    fn text(&mut self, node: NodeId, text: &str) {
        let target = match self.target {
            Target::InText { node: t, offset } if t == node => Some(offset),
            _ => None,
        };
        if target.is_some() {
            self.state = match self.state {
                ScanState::Space => ScanState::TargetSpace,
                ScanState::Word => ScanState::TargetWord,
                state => state,
            };
        }

        let mut len = 0;
        for (i, c) in text.chars().enumerate() {
            if target == Some(i) {
                self.reached();
            }
            if self.done() {
                return;
            }
            self.char(c);
            if self.done() {
                return;
            }
            len = i + 1;
        }
        if target == Some(len) {
            self.reached();
        }

        self.state = match self.state {
            ScanState::TargetSpace => ScanState::Space,
            ScanState::TargetWord => ScanState::Word,
            state => state,
        };
    }
}

/// Computes `(words, chars)` of `pos` relative to `rel` in one forward walk.
///
/// With `fall_forward`, a position between words snaps to the start of the
/// next word; this is the policy for selection starts. End points never fall
/// forward.
pub fn word_offset(
    loc: &Locator<'_>,
    rel: NodeId,
    pos: Position,
    fall_forward: bool,
) -> Result<WordOffset, AddressError> {
    let doc = loc.doc();
    let mut scan = Scanner::new(Target::from_position(doc, pos), fall_forward);
    let mut w = loc.walker(rel);

    while let Some(node) = w.current() {
        let skipped = loc.is_skipped(node);
        let into = doc.is_element(node) && !skipped;

        if w.entering() && scan.target == Target::Before(node) {
            scan.reached();
        }
        if !skipped && !scan.done() {
            if doc.is_element(node) {
                let breaking = loc.is_breaking(node);
                if breaking && w.entering() {
                    scan.boundary();
                }
                if w.closes(into) && scan.target == Target::EndOf(node) {
                    scan.reached();
                }
                if breaking && w.leaving() {
                    scan.boundary();
                }
            } else if let Some(text) = doc.text(node) {
                scan.text(node, text);
            }
        }
        trace_event!(
            loc.trace(),
            Topic::Walk,
            "{} {node:?}: {:?} {}.{}",
            if w.entering() { "enter" } else { "leave" },
            scan.state,
            scan.words,
            scan.chars
        );
        let at_end = node == loc.root() && w.closes(into);
        if scan.done() || at_end || !w.walk(into, false) {
            break;
        }
    }

    let result = match scan.state {
        ScanState::Done => WordOffset {
            words: scan.words,
            chars: scan.chars,
            fell_off_block: scan.fell_off_block,
        },
        ScanState::FallForward => WordOffset {
            words: scan.words,
            chars: scan.chars,
            fell_off_block: true,
        },
        _ => return Err(AddressError::TargetNotReached),
    };
    trace_event!(
        loc.trace(),
        Topic::Words,
        "{pos:?} from {rel:?} (fall forward: {fall_forward}) -> {}.{}{}",
        result.words,
        result.chars,
        if result.fell_off_block { " [fell off block]" } else { "" }
    );
    Ok(result)
}

/// Resolves word offsets back to raw positions by walking forward from `rel`.
///
/// Points must be requested in increasing order; the walk resumes where the
/// previous one stopped.
#[derive(Debug)]
pub struct WordPointWalker<'a> {
    loc: Locator<'a>,
    walker: Walker<'a>,
    rel: NodeId,
    words: u32,
    chars: u32,
    in_word: bool,
    /// Text node being consumed: `(node, byte index, char index)`.
    text: Option<(NodeId, usize, usize)>,
    started: bool,
    eof: bool,
}

impl<'a> WordPointWalker<'a> {
    pub fn new(loc: &Locator<'a>, rel: NodeId) -> Self {
        Self {
            loc: loc.clone(),
            walker: loc.walker(rel),
            rel,
            words: 0,
            chars: 0,
            in_word: false,
            text: None,
            started: false,
            eof: false,
        }
    }

    pub fn rel(&self) -> NodeId {
        self.rel
    }

    /// True once the walk has run off the end of the document.
    pub fn eof(&self) -> bool {
        self.eof
    }

    /// Finds the raw position of `(words, chars)`.
    ///
    /// `(w, 0)` is just before the first character of word `w`; `(w, c)` with
    /// `c > 0` is just after its `c`-th character. `(0, _)` is the start of
    /// `rel`.
    pub fn resolve(&mut self, words: u32, chars: u32) -> Result<Position, AddressError> {
        if words == 0 {
            return Ok(Position::new(self.rel, 0));
        }
        let not_found = AddressError::PointNotFound { words, chars };
        loop {
            if let Some(pos) = self.consume_text(words, chars)? {
                trace_event!(
                    self.loc.trace(),
                    Topic::Words,
                    "{words}.{chars} from {:?} -> {pos:?}",
                    self.rel
                );
                return Ok(pos);
            }
            if self.eof {
                return Err(not_found);
            }
            if !self.advance() {
                self.eof = true;
            }
        }
    }

    /// Moves to the next visible node, noting word breaks and text nodes.
    fn advance(&mut self) -> bool {
        if self.started {
            let at_end = self.walker.current().is_some_and(|node| {
                node == self.loc.root()
                    && self.walker.closes(self.loc.doc().is_element(node) && !self.loc.is_skipped(node))
            });
            if at_end || !self.walker.step(self.loc.skip(), false) {
                return false;
            }
        } else {
            self.started = true;
        }
        let Some(node) = self.walker.current() else {
            return false;
        };
        if self.loc.is_skipped(node) {
            trace_event!(self.loc.trace(), Topic::Walk, "skip {node:?}");
            return true;
        }
        if self.loc.is_breaking(node) {
            self.in_word = false;
        } else if self.loc.doc().is_text(node) {
            self.text = Some((node, 0, 0));
        }
        true
    }

    fn consume_text(&mut self, words: u32, chars: u32) -> Result<Option<Position>, AddressError> {
        let Some((node, mut byte, mut ch)) = self.text.take() else {
            return Ok(None);
        };
        let text = self.loc.doc().text(node).unwrap_or_default();

        while let Some(c) = text[byte..].chars().next() {
            if c.is_whitespace() {
                self.in_word = false;
            } else {
                if !self.in_word {
                    self.in_word = true;
                    self.words += 1;
                    self.chars = 0;
                    if self.words > words {
                        return Err(AddressError::PointNotFound { words, chars });
                    }
                    if self.words == words && chars == 0 {
                        self.text = Some((node, byte, ch));
                        return Ok(Some(Position::new(node, ch)));
                    }
                }
                self.chars += 1;
                if self.words == words && self.chars == chars {
                    self.text = Some((node, byte + c.len_utf8(), ch + 1));
                    return Ok(Some(Position::new(node, ch + 1)));
                }
            }
            byte += c.len_utf8();
            ch += 1;
        }
        Ok(None)
    }
}
