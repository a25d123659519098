use roxmltree::NodeType;

use crate::document::{Document, NodeId};

use super::IoError;

/// Builds a document tree from an XML or XHTML fragment.
///
/// The root element of the input becomes the document root. Text is kept
/// as-is, whitespace-only runs included; comments are kept as comments.
/// Processing instructions are dropped.
pub fn load_xml(source: &str) -> Result<Document, IoError> {
    let xml = roxmltree::Document::parse(source)?;
    let source_root = xml.root_element();
    let mut doc = Document::new(source_root.tag_name().name());
    let root = doc.root();
    copy_attributes(&mut doc, root, source_root);
    copy_children(&mut doc, root, source_root);
    Ok(doc)
}

fn copy_attributes(doc: &mut Document, el: NodeId, node: roxmltree::Node<'_, '_>) {
    for attr in node.attributes() {
        doc.set_attr(el, attr.name(), attr.value());
    }
}

fn copy_children(doc: &mut Document, parent: NodeId, node: roxmltree::Node<'_, '_>) {
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => {
                let el = doc.append_element(parent, child.tag_name().name());
                copy_attributes(doc, el, child);
                copy_children(doc, el, child);
            }
            NodeType::Text => {
                doc.append_text(parent, child.text().unwrap_or_default());
            }
            NodeType::Comment => {
                doc.append_comment(parent, child.text().unwrap_or_default());
            }
            NodeType::Root | NodeType::PI => {}
        }
    }
}
