pub mod addressing;
pub mod anchor;
pub mod blocks;
pub mod document;
pub mod error;
pub mod io;
pub mod locator;
pub mod partition;
pub mod ranges;
pub mod shrinkwrap;
pub mod skip;
pub mod trace;
pub mod walker;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use addressing::{
    BlockPath, WordOffset, WordPointWalker, XPathExpr, path_from_node, resolve_path,
    resolve_xpath, word_offset, xpath_from_node,
};
pub use anchor::{AnchorReport, Outcome, StoredAnnotation, anchor_batch, anchor_one, create};
pub use blocks::{ContentModel, DisplayRole, MODEL_VERSION, display_role, is_breaking, violations};
pub use document::{Document, NodeId, NodeKind, to_markup};
pub use error::{AddressError, ParseError, SelectionError};
pub use io::{IoError, load_markdown, load_xml, read_annotations, read_document, write_annotations};
pub use locator::Locator;
pub use partition::{Partition, partition, partition_text_range};
pub use ranges::{
    Position, SequencePoint, SequenceRange, TextRange, WordPoint, WordRange, XPathPoint,
    XPathRange,
};
pub use shrinkwrap::shrink_wrap;
pub use skip::{NoSkip, Skip, SkipRules};
pub use trace::{Topic, Trace};
pub use walker::Walker;
