//! HTML rendering.

use super::parse::ROOT_TAG;
use super::{Document, Element, Node};
use crate::utils::html::{escape, escape_attr, is_void_element};

/// Render a whole document, including its doctype.
pub fn render_document(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(doctype) = &doc.doctype {
        out.push_str(doctype);
    }
    write_children(&doc.root, &mut out);
    out
}

/// Render a single element and its subtree.
pub fn render_element(elem: &Element) -> String {
    let mut out = String::new();
    write_element(elem, &mut out);
    out
}

fn write_children(elem: &Element, out: &mut String) {
    for child in &elem.children {
        match child {
            Node::Element(e) => write_element(e, out),
            Node::Text(t) => out.push_str(&escape(t)),
            Node::Raw(r) => out.push_str(r),
        }
    }
}

fn write_element(elem: &Element, out: &mut String) {
    if elem.tag == ROOT_TAG {
        write_children(elem, out);
        return;
    }

    out.push('<');
    out.push_str(&elem.tag);
    match elem.attrs.source() {
        Some(source) => out.push_str(source),
        None => write_attrs(elem, out),
    }
    out.push('>');

    // Anything `tl` nested below a void or `/>` tag follows it in the source
    if is_void_element(&elem.tag) || elem.attrs.is_self_closing() {
        write_children(elem, out);
        return;
    }

    write_children(elem, out);
    out.push_str("</");
    out.push_str(&elem.tag);
    out.push('>');
}

fn write_attrs(elem: &Element, out: &mut String) {
    for (name, value) in elem.attrs.iter() {
        out.push(' ');
        out.push_str(name);
        // Boolean attributes (`open`, `disabled`) carry no value
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{RUSTDOC_PAGE, parse_document};

    #[test]
    fn test_render_escapes_text_and_attrs() {
        let elem = Element::with_attrs("a", [("href", "?a=1&b=\"2\"")]).text("<x>");
        assert_eq!(
            render_element(&elem),
            r#"<a href="?a=1&amp;b=&quot;2&quot;">&lt;x&gt;</a>"#
        );
    }

    #[test]
    fn test_render_void_and_boolean() {
        let elem = Element::with_attrs("details", [("open", "")])
            .child(Element::with_attrs("img", [("src", "a.png")]));
        assert_eq!(render_element(&elem), r#"<details open><img src="a.png"></details>"#);
    }

    #[test]
    fn test_rustdoc_page_round_trip() {
        let doc = parse_document(RUSTDOC_PAGE).unwrap();
        assert_eq!(render_document(&doc), RUSTDOC_PAGE);
    }

    #[test]
    fn test_parsed_attributes_render_as_written() {
        let html = r#"<h2 id="a" class="section-header" data-x="1"  title='t' lang="en">x</h2><link rel="preload" as="font" type="font/woff2"href="a.woff2"><path d="M0 0"/>"#;
        let doc = parse_document(html).unwrap();
        assert_eq!(render_document(&doc), html);
    }

    #[test]
    fn test_parse_render_keeps_markup() {
        let html = r#"<!DOCTYPE html><html><body><div class="docblock"><p>a &lt; b</p></div></body></html>"#;
        let doc = parse_document(html).unwrap();
        assert_eq!(render_document(&doc), html);
    }
}
