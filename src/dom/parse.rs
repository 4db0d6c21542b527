//! HTML parsing via `tl`.
//!
//! `tl` builds the element tree, with two corrections made around it:
//!
//! - Bodies of raw-text elements (`<script>`, `<style>`, ...) are cut out
//!   before parsing and put back as a single [`Node::Raw`], since `tl` reads
//!   any `<` in them as markup.
//! - Attributes are re-read from each open tag in source order and keep
//!   their source text, since `tl` reorders `id` and `class`.

use super::{Attrs, Children, Document, Element, Node};
use crate::utils::html::unescape;

/// Tag name of the synthetic root that holds top-level nodes.
pub const ROOT_TAG: &str = "#root";

/// Elements whose content is text, not markup.
const RAW_TEXT_TAGS: [&str; 4] = ["script", "style", "textarea", "title"];

/// Parse an HTML page into a [`Document`].
///
/// Returns `None` when `tl` rejects the input.
pub fn parse_document(html: &str) -> Option<Document> {
    let raw_text = mask_raw_text(html);
    let dom = tl::parse(&raw_text.masked, tl::ParserOptions::default()).ok()?;
    let parser = dom.parser();

    let mut root = Element::new(ROOT_TAG);
    for handle in dom.children() {
        if let Some(node) = tl_node_to_dom(*handle, parser, &raw_text.bodies) {
            root.push(node);
        }
    }

    Some(Document {
        doctype: detect_doctype(html),
        root,
    })
}

/// Convert a tl node handle to our node type.
fn tl_node_to_dom(handle: tl::NodeHandle, parser: &tl::Parser, bodies: &[String]) -> Option<Node> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let raw = tag.raw().as_utf8_str();
            let (tag_name, attrs) = match scan_open_tag(&raw) {
                Some(open) => (open.name, Attrs::parsed(parse_attrs(open.attrs), open.attrs)),
                None => (tag.name().as_utf8_str().to_lowercase(), tl_attrs(tag)),
            };
            // Declarations are re-emitted from `Document::doctype`
            if tag_name.starts_with('!') {
                return None;
            }

            let children: Children = if RAW_TEXT_TAGS.contains(&tag_name.as_str()) {
                raw_text_body(tag, parser, bodies).map(Node::Raw).into_iter().collect()
            } else {
                tag.children()
                    .top()
                    .iter()
                    .filter_map(|child| tl_node_to_dom(*child, parser, bodies))
                    .collect()
            };

            Some(Node::Element(Box::new(Element {
                tag: tag_name,
                attrs,
                children,
            })))
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            (!text.is_empty()).then(|| Node::Raw(text.into_owned()))
        }
        tl::Node::Comment(bytes) => {
            let text = bytes.as_utf8_str();
            let comment = if text.starts_with("<!--") {
                text.into_owned()
            } else {
                format!("<!--{text}-->")
            };
            Some(Node::Raw(comment))
        }
    }
}

/// Attributes as `tl` reports them, for tags the scanner does not accept.
fn tl_attrs(tag: &tl::HTMLTag) -> Attrs {
    tag.attributes()
        .iter()
        .map(|(key, value)| {
            let value = value.map(|v| unescape(&v).into_owned()).unwrap_or_default();
            (key.to_string(), value)
        })
        .collect()
}

/// Body of a masked raw-text element, looked up by the index left in its place.
fn raw_text_body(tag: &tl::HTMLTag, parser: &tl::Parser, bodies: &[String]) -> Option<String> {
    let index: usize = tag.inner_text(parser).trim().parse().ok()?;
    bodies.get(index).cloned()
}

// =============================================================================
// Raw text
// =============================================================================

/// Page source with raw-text bodies replaced by their index in `bodies`.
struct RawText {
    masked: String,
    bodies: Vec<String>,
}

fn mask_raw_text(html: &str) -> RawText {
    let mut masked = String::with_capacity(html.len());
    let mut bodies = Vec::new();
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        masked.push_str(&rest[..lt]);
        rest = &rest[lt..];

        if rest.starts_with("<!--") {
            let end = rest.find("-->").map_or(rest.len(), |i| i + 3);
            masked.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        let Some(open) = scan_open_tag(rest) else {
            masked.push('<');
            rest = &rest[1..];
            continue;
        };
        // Whole tag at once, so a `<` in a quoted value is never a tag start
        masked.push_str(&rest[..open.len]);
        rest = &rest[open.len..];

        if !RAW_TEXT_TAGS.contains(&open.name.as_str()) || open.is_self_closing() {
            continue;
        }
        let body_len = find_end_tag(rest, &open.name).unwrap_or(rest.len());
        if body_len > 0 {
            masked.push_str(&bodies.len().to_string());
            bodies.push(rest[..body_len].to_string());
        }
        rest = &rest[body_len..];
    }

    masked.push_str(rest);
    RawText { masked, bodies }
}

/// Offset of the `</name` that ends a raw-text body (ASCII case-insensitive).
fn find_end_tag(body: &str, name: &str) -> Option<usize> {
    let lower = body.to_ascii_lowercase();
    let needle = format!("</{name}");
    let mut from = 0;
    while let Some(i) = lower[from..].find(&needle) {
        let at = from + i;
        let next = lower.as_bytes().get(at + needle.len());
        if matches!(next, None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')) {
            return Some(at);
        }
        from = at + needle.len();
    }
    None
}

// =============================================================================
// Open tags
// =============================================================================

/// An open tag at the start of some source text.
struct OpenTag<'a> {
    /// Lowercase tag name.
    name: String,
    /// Source between the name and the closing `>`.
    attrs: &'a str,
    /// Length of the whole tag, `<` and `>` included.
    len: usize,
}

impl OpenTag<'_> {
    fn is_self_closing(&self) -> bool {
        self.attrs.trim_end().ends_with('/')
    }
}

fn scan_open_tag(src: &str) -> Option<OpenTag<'_>> {
    let after = src.strip_prefix('<')?;
    if !after.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    let name_len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')))
        .unwrap_or(after.len());
    let tail = &after[name_len..];
    let end = tag_end(tail)?;

    Some(OpenTag {
        name: after[..name_len].to_ascii_lowercase(),
        attrs: &tail[..end],
        len: 1 + name_len + end + 1,
    })
}

/// Offset of the `>` closing a tag, skipping quoted attribute values.
fn tag_end(tail: &str) -> Option<usize> {
    let mut quote = None;
    let mut after_eq = false;
    for (i, &b) in tail.as_bytes().iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'>' => return Some(i),
            b'=' => after_eq = true,
            b'"' | b'\'' if after_eq => {
                quote = Some(b);
                after_eq = false;
            }
            b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' => {}
            _ => after_eq = false,
        }
    }
    None
}

/// Name/value pairs of an attribute source, in order. Values are unescaped;
/// names are lowercased.
fn parse_attrs(source: &str) -> Vec<(String, String)> {
    let is_space = |c: char| c.is_ascii_whitespace();
    let mut pairs = Vec::new();
    let mut rest = source;

    loop {
        rest = rest.trim_start_matches(|c: char| is_space(c) || c == '/');
        if rest.is_empty() {
            break;
        }

        let name_len = rest
            .find(|c: char| is_space(c) || matches!(c, '=' | '/'))
            .unwrap_or(rest.len());
        if name_len == 0 {
            // stray `=`
            rest = &rest[1..];
            continue;
        }
        let name = rest[..name_len].to_ascii_lowercase();
        rest = &rest[name_len..];

        let value = match rest.trim_start_matches(is_space).strip_prefix('=') {
            Some(after_eq) => {
                let after_eq = after_eq.trim_start_matches(is_space);
                let (value, remaining) = split_value(after_eq);
                rest = remaining;
                value
            }
            None => "",
        };
        pairs.push((name, unescape(value).into_owned()));
    }
    pairs
}

/// Split an attribute value (quoted or not) from the text following it.
fn split_value(src: &str) -> (&str, &str) {
    match src.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = &src[1..];
            match inner.find(quote) {
                Some(end) => (&inner[..end], &inner[end + 1..]),
                None => (inner, ""),
            }
        }
        _ => {
            let end = src.find(|c: char| c.is_ascii_whitespace()).unwrap_or(src.len());
            src.split_at(end)
        }
    }
}

/// Extract a leading `<!DOCTYPE ...>` declaration, if any.
fn detect_doctype(html: &str) -> Option<String> {
    let trimmed = html.trim_start();
    let head = trimmed.get(..9)?;
    if !head.eq_ignore_ascii_case("<!doctype") {
        return None;
    }
    let end = trimmed.find('>')?;
    Some(trimmed[..=end].to_string())
}
