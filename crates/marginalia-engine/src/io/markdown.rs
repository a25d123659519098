use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::document::{Document, NodeId};

/// Builds a document tree from Markdown.
///
/// Blocks map onto their HTML counterparts under an `article` root. Raw HTML
/// is kept as comments so it never contributes words.
pub fn load_markdown(source: &str) -> Document {
    let mut doc = Document::new("article");
    let root = doc.root();
    let mut stack: Vec<NodeId> = vec![root];
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES;

    for event in Parser::new_ext(source, options) {
        let parent = stack.last().copied().unwrap_or(root);
        match event {
            Event::Start(tag) => {
                let el = doc.append_element(parent, element_for(&tag));
                match &tag {
                    Tag::Heading { id: Some(id), .. } => doc.set_attr(el, "id", id),
                    Tag::CodeBlock(CodeBlockKind::Fenced(lang)) if !lang.is_empty() => {
                        doc.set_attr(el, "class", &format!("language-{lang}"))
                    }
                    Tag::Link { dest_url, .. } => doc.set_attr(el, "href", dest_url),
                    Tag::Image { dest_url, .. } => doc.set_attr(el, "src", dest_url),
                    _ => {}
                }
                stack.push(el);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Event::Text(text) => {
                doc.append_text(parent, &text);
            }
            Event::Code(code) => {
                let el = doc.append_element(parent, "code");
                doc.append_text(el, &code);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                doc.append_comment(parent, &html);
            }
            Event::SoftBreak => {
                doc.append_text(parent, "\n");
            }
            Event::HardBreak => {
                doc.append_element(parent, "br");
            }
            Event::Rule => {
                doc.append_element(parent, "hr");
            }
            Event::FootnoteReference(label) => {
                let el = doc.append_element(parent, "sup");
                doc.append_text(el, &label);
            }
            Event::TaskListMarker(checked) => {
                let el = doc.append_element(parent, "input");
                doc.set_attr(el, "type", "checkbox");
                if checked {
                    doc.set_attr(el, "checked", "checked");
                }
            }
            _ => {}
        }
    }

    doc.normalize(root);
    doc
}

fn element_for(tag: &Tag<'_>) -> &'static str {
    match tag {
        Tag::Paragraph => "p",
        Tag::Heading { level, .. } => match level {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
            HeadingLevel::H5 => "h5",
            HeadingLevel::H6 => "h6",
        },
        Tag::BlockQuote(_) => "blockquote",
        Tag::CodeBlock(_) => "pre",
        Tag::HtmlBlock => "div",
        Tag::List(Some(_)) => "ol",
        Tag::List(None) => "ul",
        Tag::Item => "li",
        Tag::FootnoteDefinition(_) => "aside",
        Tag::Table(_) => "table",
        Tag::TableHead => "thead",
        Tag::TableRow => "tr",
        Tag::TableCell => "td",
        Tag::Emphasis => "em",
        Tag::Strong => "strong",
        Tag::Strikethrough => "del",
        Tag::Link { .. } => "a",
        Tag::Image { .. } => "img",
        _ => "span",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::to_markup;

    #[test]
    fn blocks_and_inlines_map_to_html_elements() {
        let doc = load_markdown("# Title\n\nSome *emphasis* and `code`.\n\n- one\n- two\n");
        insta::assert_snapshot!(
            to_markup(&doc, doc.root()),
            @r#"<article><h1>Title</h1><p>Some <em>emphasis</em> and <code>code</code>.</p><ul><li>one</li><li>two</li></ul></article>"#
        );
    }

    #[test]
    fn soft_breaks_stay_inside_the_paragraph() {
        let doc = load_markdown("first line\nsecond line\n");
        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.tag(p), Some("p"));
        assert_eq!(doc.child_count(p), 1);
        assert_eq!(doc.text_content(p), "first line\nsecond line");
    }

    #[test]
    fn raw_html_becomes_a_comment() {
        let doc = load_markdown("a <span>b</span> c\n");
        let p = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.text_content(p), "a b c");
    }
}
