// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use marginalia_engine::{Document, Position, TextRange, load_markdown};

#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *some* content and a [link](https://example.com).\n\n- Bullet point\n  - Nested item\n- Another item\n\n> Quoted text\n> over two lines\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_document(size: usize) -> Document {
    load_markdown(&generate_markdown_content(size))
}

/// Text nodes in document order.
#[allow(dead_code)]
pub fn text_nodes(doc: &Document) -> Vec<marginalia_engine::NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![doc.root()];
    while let Some(node) = stack.pop() {
        if doc.is_text(node) {
            out.push(node);
        }
        let children: Vec<_> = doc.children(node).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// A selection covering the whole of the `n`-th text node.
#[allow(dead_code)]
pub fn select_text_node(doc: &Document, n: usize) -> TextRange {
    let nodes = text_nodes(doc);
    let node = nodes[n % nodes.len()];
    TextRange::new(Position::new(node, 0), Position::new(node, doc.text_len(node)))
}
