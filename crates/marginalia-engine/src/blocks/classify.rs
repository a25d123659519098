/// Version of the breaking-element table below.
///
/// Stored addresses count breaking elements, so any change to which tags are
/// `Block` changes the meaning of every address already persisted.
pub const MODEL_VERSION: u32 = 1;

/// How an element participates in layout, as far as addressing cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayRole {
    /// Starts a new block; separates words; counted in block paths.
    Block,
    /// Flows with surrounding text.
    Inline,
    /// Has no content of its own (void or metadata elements).
    None,
    /// Not in the table. Treated as non-breaking.
    Unknown,
}

/// Classifies a tag name. Case-insensitive.
pub fn display_role(tag: &str) -> DisplayRole {
    match tag.to_ascii_lowercase().as_str() {
        // Sectioning and grouping content
        "address" | "article" | "aside" | "blockquote" | "body" | "center" | "dd" | "details"
        | "dialog" | "dir" | "div" | "dl" | "dt" | "fieldset" | "figcaption" | "figure"
        | "footer" | "form" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "header" | "hgroup"
        | "hr" | "html" | "legend" | "li" | "main" | "menu" | "nav" | "ol" | "p" | "pre"
        | "section" | "summary" | "ul" => DisplayRole::Block,
        // Tables fold into block
        "table" | "caption" | "colgroup" | "thead" | "tbody" | "tfoot" | "tr" | "td" | "th" => {
            DisplayRole::Block
        }
        "a" | "abbr" | "acronym" | "b" | "bdi" | "bdo" | "big" | "cite" | "code" | "data"
        | "del" | "dfn" | "em" | "font" | "i" | "ins" | "kbd" | "label" | "mark" | "q" | "rp"
        | "rt" | "ruby" | "s" | "samp" | "small" | "span" | "strike" | "strong" | "sub"
        | "sup" | "time" | "tt" | "u" | "var" => DisplayRole::Inline,
        "area" | "base" | "br" | "col" | "embed" | "head" | "img" | "input" | "link" | "meta"
        | "param" | "script" | "source" | "style" | "title" | "track" | "wbr" => DisplayRole::None,
        _ => DisplayRole::Unknown,
    }
}

/// True for tags whose boundaries separate words.
pub fn is_breaking(tag: &str) -> bool {
    display_role(tag) == DisplayRole::Block
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("p", DisplayRole::Block)]
    #[case("P", DisplayRole::Block)]
    #[case("td", DisplayRole::Block)]
    #[case("TR", DisplayRole::Block)]
    #[case("em", DisplayRole::Inline)]
    #[case("Span", DisplayRole::Inline)]
    #[case("br", DisplayRole::None)]
    #[case("marginalia-note", DisplayRole::Unknown)]
    fn roles(#[case] tag: &str, #[case] role: DisplayRole) {
        assert_eq!(display_role(tag), role);
    }

    #[test]
    fn only_blocks_break() {
        assert!(is_breaking("li"));
        assert!(is_breaking("Blockquote"));
        assert!(!is_breaking("strong"));
        assert!(!is_breaking("br"));
        assert!(!is_breaking("custom"));
    }
}
