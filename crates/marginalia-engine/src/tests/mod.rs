//! Shared helpers for unit tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::document::{Document, NodeId};
use crate::io::load_xml;

/// Parses an XML fragment, panicking on malformed test input.
pub fn xml(source: &str) -> Document {
    load_xml(source).expect("test document should be well-formed")
}

/// The element carrying `id`.
pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.element_by_id(doc.root(), id)
        .unwrap_or_else(|| panic!("no element with id {id:?}"))
}

/// The first text node whose value is exactly `text`.
pub fn find_text(doc: &Document, text: &str) -> NodeId {
    let mut stack = vec![doc.root()];
    while let Some(node) = stack.pop() {
        if doc.text(node) == Some(text) {
            return node;
        }
        let children: Vec<_> = doc.children(node).collect();
        stack.extend(children.into_iter().rev());
    }
    panic!("no text node {text:?}")
}

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}
