use super::{Document, NodeId, NodeKind};

/// Serializes `node` and its subtree as XHTML-style markup.
///
/// Used for debugging output and snapshot tests. Childless elements are
/// written self-closing.
pub fn to_markup(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.kind(node) {
        NodeKind::Text(s) => out.push_str(&html_escape::encode_text(s)),
        NodeKind::Comment(s) => {
            out.push_str("<!--");
            out.push_str(s);
            out.push_str("-->");
        }
        NodeKind::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            if doc.first_child(node).is_none() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in doc.children(node) {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn escapes_text_and_self_closes_empty_elements() {
        let mut doc = Document::new("div");
        let root = doc.root();
        let p = doc.append_element(root, "p");
        doc.set_attr(p, "class", "lead");
        doc.append_text(p, "x < y & z");
        doc.append_element(p, "br");
        doc.append_comment(root, "note");
        assert_snapshot!(
            to_markup(&doc, root),
            @r#"<div><p class="lead">x &lt; y &amp; z<br/></p><!--note--></div>"#
        );
    }
}
