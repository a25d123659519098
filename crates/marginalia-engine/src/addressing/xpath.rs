use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::document::NodeId;
use crate::error::ParseError;
use crate::locator::Locator;
use crate::trace::{Topic, trace_event};

/// A parsed tag-indexed path such as `div[3]/p[5]` or `//*[@id='intro']/p[2]`.
///
/// Unlike [`BlockPath`](super::BlockPath) these steps count same-tag siblings,
/// so they are readable but not orderable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathExpr {
    /// Id of the element the steps start from; `None` means the root.
    pub id: Option<String>,
    /// `(tag, 1-based index among same-tag siblings)`.
    pub steps: Vec<(String, u32)>,
}

fn id_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^//\*\[@id='([^';]+)'\]").expect("Invalid id regex"))
}

fn step_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_.-]*)(?:\[([1-9][0-9]*)\])?$").expect("Invalid step regex")
    })
}

/// Whether an id can be embedded in the `//*[@id='...']` short form.
fn is_addressable_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['\'', ';', '/'])
}

impl FromStr for XPathExpr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::XPath(s.to_string());
        let (id, rest) = match id_prefix_regex().captures(s) {
            Some(caps) => {
                let whole = caps.get(0).ok_or_else(err)?;
                (Some(caps[1].to_string()), &s[whole.end()..])
            }
            None => (None, s),
        };

        if rest.is_empty() || rest == "." {
            if id.is_none() && rest.is_empty() {
                return Err(err());
            }
            return Ok(Self { id, steps: Vec::new() });
        }

        let rest = match id {
            Some(_) => rest.strip_prefix('/').ok_or_else(err)?,
            None => rest,
        };
        let steps = rest
            .split('/')
            .map(|step| {
                let caps = step_regex().captures(step).ok_or_else(err)?;
                let index = match caps.get(2) {
                    Some(m) => m.as_str().parse().map_err(|_| err())?,
                    None => 1,
                };
                Ok((caps[1].to_string(), index))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { id, steps })
    }
}

impl fmt::Display for XPathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "//*[@id='{id}']")?,
            None if self.steps.is_empty() => return f.write_str("."),
            None => {}
        }
        for (i, (tag, index)) in self.steps.iter().enumerate() {
            if i > 0 || self.id.is_some() {
                f.write_str("/")?;
            }
            write!(f, "{tag}[{index}]")?;
        }
        Ok(())
    }
}

/// Computes the XPath expression from the locator's root down to `rel`.
///
/// With id anchors enabled, the walk up stops at the first ancestor-or-self
/// (below the root) carrying a usable `id`.
pub fn xpath_from_node(loc: &Locator<'_>, rel: NodeId) -> Option<XPathExpr> {
    let doc = loc.doc();
    let mut steps = Vec::new();
    let mut id = None;
    let mut node = rel;
    while node != loc.root() {
        if loc.id_anchors()
            && let Some(node_id) = doc.id_of(node).filter(|i| is_addressable_id(i))
        {
            id = Some(node_id.to_string());
            break;
        }
        let parent = doc.parent(node)?;
        let tag = doc.tag(node)?;
        let mut index = 1;
        let mut prev = doc.prev_sibling(node);
        while let Some(p) = prev {
            if doc.tag(p).is_some_and(|t| t.eq_ignore_ascii_case(tag)) && !loc.is_skipped(p) {
                index += 1;
            }
            prev = doc.prev_sibling(p);
        }
        steps.push((tag.to_ascii_lowercase(), index));
        node = parent;
    }
    steps.reverse();
    let expr = XPathExpr { id, steps };
    trace_event!(loc.trace(), Topic::XPath, "{rel:?} -> {expr}");
    Some(expr)
}

/// Resolves an XPath expression against the locator's root.
pub fn resolve_xpath(loc: &Locator<'_>, expr: &XPathExpr) -> Option<NodeId> {
    let doc = loc.doc();
    let mut node = match &expr.id {
        Some(id) => doc.element_by_id(loc.root(), id)?,
        None => loc.root(),
    };
    for (tag, index) in &expr.steps {
        let mut count = *index;
        let mut found = None;
        for child in doc.children(node) {
            if doc.tag(child).is_some_and(|t| t.eq_ignore_ascii_case(tag)) && !loc.is_skipped(child) {
                count -= 1;
                if count == 0 {
                    found = Some(child);
                    break;
                }
            }
        }
        match found {
            Some(child) => node = child,
            None => {
                trace_event!(loc.trace(), Topic::XPath, "{expr} lost at step {tag}[{index}]");
                return None;
            }
        }
    }
    Some(node)
}
