//! Minimal HTML document model.
//!
//! Rustdoc pages are parsed into this tree, mutated, and rendered back.
//!
//! - [`parse`]: `tl` parse tree -> [`Document`]
//! - [`render`]: [`Document`] / [`Element`] -> HTML string
//!
//! Parsed text is kept as [`Node::Raw`] (already valid HTML source), while
//! text produced by this crate is [`Node::Text`] and gets escaped on render.
//! The bodies of `<script>`, `<style>`, `<textarea>` and `<title>` are a
//! single `Raw` node, never parsed as markup.

mod parse;
mod render;

pub use parse::parse_document;
pub use render::{render_document, render_element};

use serde::Serialize;
use smallvec::SmallVec;

/// Child list of an element.
pub type Children = SmallVec<[Node; 4]>;

/// A crate page as written by rustdoc.
#[cfg(test)]
pub(crate) const RUSTDOC_PAGE: &str = include_str!("testdata/std_detect_index.html");

// =============================================================================
// Nodes
// =============================================================================

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    /// Text content, escaped when rendered.
    Text(String),
    /// HTML source emitted verbatim (parsed text, comments, raw-text
    /// element bodies).
    Raw(String),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Self::Element(Box::new(elem))
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Ordered attribute list. Values are stored unescaped.
///
/// Parsed attributes also keep the tag's source text between the name and
/// `>`, which is rendered as is until the list changes. Equality only looks
/// at the name/value pairs.
#[derive(Debug, Clone, Default)]
pub struct Attrs {
    pairs: Vec<(String, String)>,
    source: Option<String>,
}

impl Attrs {
    pub const fn new() -> Self {
        Self {
            pairs: Vec::new(),
            source: None,
        }
    }

    /// Attributes read from `source`, the text after the tag name.
    pub fn parsed(pairs: Vec<(String, String)>, source: impl Into<String>) -> Self {
        Self {
            pairs,
            source: Some(source.into()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set(&mut self, name: &str, value: &str) {
        self.source = None;
        match self.pairs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Source text of unmodified parsed attributes.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether the source tag ends in `/>`.
    pub fn is_self_closing(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|s| s.trim_end().ends_with('/'))
    }
}

impl PartialEq for Attrs {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs
    }
}

impl Eq for Attrs {}

impl<const N: usize> From<[(&str, &str); N]> for Attrs {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

impl FromIterator<(String, String)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
            source: None,
        }
    }
}

// =============================================================================
// Elements
// =============================================================================

/// An HTML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name.
    pub tag: String,
    pub attrs: Attrs,
    pub children: Children,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self::with_attrs(tag, Attrs::new())
    }

    pub fn with_attrs(tag: &str, attrs: impl Into<Attrs>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: attrs.into(),
            children: Children::new(),
        }
    }

    /// Builder-style child append.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Builder-style text child append.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::text(text))
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn prepend(&mut self, node: impl Into<Node>) {
        self.children.insert(0, node.into());
    }

    /// Whether the whitespace-separated `class` attribute contains `name`.
    pub fn has_class(&self, name: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == name))
    }

    /// Child elements with their indices in `children`.
    pub fn child_elements(&self) -> impl Iterator<Item = (usize, &Element)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_element().map(|e| (i, e)))
    }

    /// Concatenated text of all descendants (raw text included as-is).
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(elem: &Element, out: &mut String) {
    for child in &elem.children {
        match child {
            Node::Element(e) => collect_text(e, out),
            Node::Text(t) | Node::Raw(t) => out.push_str(t),
        }
    }
}

// =============================================================================
// Paths
// =============================================================================

/// Location of an element as child indices starting from the root.
///
/// The empty path is the root element itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Path of the parent and this node's index in it (`None` for root).
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        let (last, parent) = self.0.split_last()?;
        Some((Self(parent.to_vec()), *last))
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

// =============================================================================
// Document
// =============================================================================

/// A parsed HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Original doctype declaration, re-emitted on render.
    pub doctype: Option<String>,
    /// Synthetic root holding the top-level nodes.
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            doctype: None,
            root,
        }
    }

    pub fn get(&self, path: &NodePath) -> Option<&Element> {
        path.indices()
            .iter()
            .try_fold(&self.root, |elem, &i| elem.children.get(i)?.as_element())
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Element> {
        path.indices().iter().try_fold(&mut self.root, |elem, &i| {
            elem.children.get_mut(i)?.as_element_mut()
        })
    }

    /// First element in document order matching `pred`.
    pub fn find_first(&self, pred: impl Fn(&Element) -> bool) -> Option<NodePath> {
        find_first_in(&self.root, NodePath::root(), &pred)
    }

    /// All elements below `path` matching `pred`, in document order.
    ///
    /// The element at `path` itself is not considered.
    pub fn find_all_below(&self, path: &NodePath, pred: impl Fn(&Element) -> bool) -> Vec<NodePath> {
        let mut found = Vec::new();
        if let Some(start) = self.get(path) {
            collect_matches(start, path.clone(), &pred, &mut found);
        }
        found
    }

    pub fn find_first_by_class(&self, class: &str) -> Option<NodePath> {
        self.find_first(|e| e.has_class(class))
    }
}

fn find_first_in(
    elem: &Element,
    path: NodePath,
    pred: &impl Fn(&Element) -> bool,
) -> Option<NodePath> {
    for (i, child) in elem.child_elements() {
        let child_path = path.child(i);
        if pred(child) {
            return Some(child_path);
        }
        if let Some(found) = find_first_in(child, child_path, pred) {
            return Some(found);
        }
    }
    None
}

fn collect_matches(
    elem: &Element,
    path: NodePath,
    pred: &impl Fn(&Element) -> bool,
    found: &mut Vec<NodePath>,
) {
    for (i, child) in elem.child_elements() {
        let child_path = path.child(i);
        if pred(child) {
            found.push(child_path.clone());
        }
        collect_matches(child, child_path, pred, found);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let inner = Element::with_attrs("h2", [("class", "section-header")]).text("Inner");
        let block = Element::with_attrs("div", [("class", "docblock big")]).child(inner);
        let body = Element::new("body")
            .child(Element::with_attrs("h1", [("class", "fqn")]).text("Crate"))
            .child(block);
        Document::new(Element::new("#root").child(body))
    }

    #[test]
    fn test_has_class_splits_on_whitespace() {
        let elem = Element::with_attrs("div", [("class", "docblock  big")]);
        assert!(elem.has_class("docblock"));
        assert!(elem.has_class("big"));
        assert!(!elem.has_class("doc"));
    }

    #[test]
    fn test_find_first_by_class() {
        let doc = sample();
        assert_eq!(doc.find_first_by_class("fqn"), Some(NodePath::from(vec![0, 0])));
        assert_eq!(
            doc.find_first_by_class("docblock"),
            Some(NodePath::from(vec![0, 1]))
        );
        assert_eq!(doc.find_first_by_class("missing"), None);
    }

    #[test]
    fn test_find_all_below_excludes_start() {
        let doc = sample();
        let block = doc.find_first_by_class("docblock").unwrap();
        let headers = doc.find_all_below(&block, |e| e.has_class("section-header"));
        assert_eq!(headers, vec![NodePath::from(vec![0, 1, 0])]);
        assert!(doc.find_all_below(&block, |e| e.has_class("docblock")).is_empty());
    }

    #[test]
    fn test_get_mut_and_split_last() {
        let mut doc = sample();
        let path = NodePath::from(vec![0, 1, 0]);
        doc.get_mut(&path).unwrap().tag = "h3".to_string();
        assert_eq!(doc.get(&path).unwrap().tag, "h3");

        let (parent, index) = path.split_last().unwrap();
        assert_eq!(parent, NodePath::from(vec![0, 1]));
        assert_eq!(index, 0);
        assert!(NodePath::root().split_last().is_none());
    }

    #[test]
    fn test_attrs_set_replaces_in_place() {
        let mut attrs = Attrs::from([("id", "a"), ("class", "b")]);
        attrs.set("id", "c");
        attrs.set("open", "");
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("id", "c"), ("class", "b"), ("open", "")]);
    }

    #[test]
    fn test_attrs_source_dropped_on_change() {
        let pairs = vec![("id".to_string(), "a".to_string())];
        let mut attrs = Attrs::parsed(pairs, r#"  id='a' "#);
        assert_eq!(attrs.source(), Some(r#"  id='a' "#));
        assert_eq!(attrs, Attrs::from([("id", "a")]));
        assert!(!attrs.is_self_closing());

        attrs.set("id", "b");
        assert_eq!(attrs.source(), None);
        assert!(Attrs::parsed(Vec::new(), " d=\"x\" /").is_self_closing());
    }
}
