//! outbound local references of a page

use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use scraper::{Html, Selector};

/// How a page cites a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Href,
    ImgSrc,
    LinkHref,
    ScriptSrc,
    FrameSrc,
    BgAttr,
}

impl RefKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            RefKind::Href => "href",
            RefKind::ImgSrc => "img_src",
            RefKind::LinkHref => "link_href",
            RefKind::ScriptSrc => "script_src",
            RefKind::FrameSrc => "frame_src",
            RefKind::BgAttr => "bg_attr",
        }
    }

    const fn attr(self) -> &'static str {
        match self {
            RefKind::Href | RefKind::LinkHref => "href",
            RefKind::ImgSrc | RefKind::ScriptSrc | RefKind::FrameSrc => "src",
            RefKind::BgAttr => "background",
        }
    }
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

/// Normalize a raw `href`/`src` into the lowercase archive-relative key used
/// for lookups, e.g. `Results/13University.htm#TRIALS` becomes
/// `results/13university.htm`.
///
/// Absolute urls, `mailto:`, `javascript:` and same-page anchors are not local
/// references and yield `None`.
pub fn normalize_ref(raw: &str) -> Option<String> {
    let r = raw.trim();
    if r.starts_with('#') {
        return None;
    }
    let head = r.get(..10).unwrap_or(r).to_ascii_lowercase();
    if ["http", "mailto", "javascript"]
        .iter()
        .any(|scheme| head.starts_with(scheme))
    {
        return None;
    }
    let r = r.split('#').next().unwrap_or_default();
    let r = r.split('?').next().unwrap_or_default();
    let r = r.replace('\\', "/");
    let r = r.strip_prefix("./").unwrap_or(&r).to_lowercase();
    if r.is_empty() {
        return None;
    }
    Some(r)
}

/// separator of [`kinds_label`]
pub const KINDS_SEP: &str = "; ";

/// `href; img_src` style label of a file's reference kinds
pub fn kinds_label(kinds: &[RefKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(KINDS_SEP)
}

/// normalized path to the kinds of reference, each kind once in first-seen order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct References {
    refs: HashMap<String, Vec<RefKind>>,
}

impl References {
    pub fn new() -> Self {
        References {
            refs: HashMap::new(),
        }
    }

    pub fn add(&mut self, raw: &str, kind: RefKind) {
        let Some(key) = normalize_ref(raw) else {
            return;
        };
        let kinds = self.refs.entry(key).or_default();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    pub fn get(&self, path: &str) -> &[RefKind] {
        self.refs.get(path).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// sorted by path
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RefKind])> {
        let mut v: Vec<_> = self
            .refs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        v.sort_unstable_by(|a, b| a.0.cmp(b.0));
        v.into_iter()
    }
}

pub struct RefExtractor {
    /// scanned in order, which fixes the kind order per path
    scans: Vec<(RefKind, Selector)>,
    anchor_sel: Selector,
}

impl RefExtractor {
    pub fn new() -> Self {
        let scans = [
            (RefKind::Href, "a[href]"),
            (RefKind::ImgSrc, "img[src]"),
            (RefKind::LinkHref, "link[href]"),
            (RefKind::ScriptSrc, "script[src]"),
            (RefKind::FrameSrc, "frame[src], iframe[src]"),
            (RefKind::BgAttr, "[background]"),
        ]
        .into_iter()
        .map(|(kind, sel)| (kind, Selector::parse(sel).unwrap()))
        .collect();
        RefExtractor {
            scans,
            anchor_sel: Selector::parse("a[href]").unwrap(),
        }
    }

    pub fn references(&self, html: &Html) -> References {
        let mut refs = References::new();
        for (kind, sel) in &self.scans {
            for el in html.select(sel) {
                if let Some(v) = el.attr(kind.attr()) {
                    refs.add(v, *kind);
                }
            }
        }
        refs
    }

    /// normalized `a[href]` targets only
    pub fn nav_links(&self, html: &Html) -> HashSet<String> {
        let mut links = HashSet::new();
        for el in html.select(&self.anchor_sel) {
            if let Some(key) = el.attr("href").and_then(normalize_ref) {
                links.insert(key);
            }
        }
        links
    }
}

impl Default for RefExtractor {
    fn default() -> Self {
        Self::new()
    }
}
