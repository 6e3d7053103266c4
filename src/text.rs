//! visible text of a parsed page

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

use crate::util::truncate_chars;

const NBSP: char = '\u{a0}';

/// Flattens the visible text of a page the way a reader would skim it.
///
/// `&nbsp;` comes back from the parser as U+00A0, which the ASCII `\s` of
/// the extraction patterns does not match, so it is turned into a plain space.
pub struct TextView {
    body_sel: Selector,
    caption_sel: Selector,
}

impl TextView {
    pub fn new() -> Self {
        TextView {
            body_sel: Selector::parse("body").unwrap(),
            caption_sel: Selector::parse("caption").unwrap(),
        }
    }

    /// text nodes of `<body>` (or the whole document), trimmed and joined with
    /// single spaces, cut to `max_chars` characters
    pub fn body_text(&self, html: &Html, max_chars: usize) -> String {
        let mut strings = Vec::new();
        match html.select(&self.body_sel).next() {
            Some(body) => collect_strings(*body, &mut strings),
            None => collect_strings(html.tree.root(), &mut strings),
        }
        let joined = strings.join(" ").replace(NBSP, " ");
        truncate_chars(&joined, max_chars).to_owned()
    }

    /// non-empty trimmed lines of the first `<caption>`
    pub fn caption_lines(&self, html: &Html) -> Vec<String> {
        let Some(caption) = html.select(&self.caption_sel).next() else {
            return Vec::new();
        };
        let mut strings = Vec::new();
        collect_strings(*caption, &mut strings);
        strings
            .iter()
            .flat_map(|s| s.lines())
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| l.replace(NBSP, " "))
            .collect()
    }
}

impl Default for TextView {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_strings<'a>(node: NodeRef<'a, Node>, out: &mut Vec<&'a str>) {
    match node.value() {
        Node::Text(txt) => {
            let t = txt.trim();
            if !t.is_empty() {
                out.push(t);
            }
        }
        Node::Element(e) if matches!(e.name(), "script" | "style" | "template") => (),
        Node::Element(_) | Node::Document | Node::Fragment => {
            for child in node.children() {
                collect_strings(child, out);
            }
        }
        Node::Doctype(_) | Node::Comment(_) | Node::ProcessingInstruction(_) => (),
    }
}
