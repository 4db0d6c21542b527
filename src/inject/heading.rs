//! Section headings.

use super::Mutation;
use crate::dom::{Document, Element, NodePath};

/// Class rustdoc puts on headings inside doc comments.
pub const SECTION_HEADER_CLASS: &str = "section-header";

/// Build a level-1 section heading linking to itself.
///
/// ```text
/// <h1 id="{id}" class="section-header"><a href="#{id}">{name}</a></h1>
/// ```
pub fn heading(name: &str, id: &str) -> Element {
    let href = format!("#{id}");
    let link = Element::with_attrs("a", [("href", href.as_str())]).text(name);
    Element::with_attrs("h1", [("id", id), ("class", SECTION_HEADER_CLASS)]).child(link)
}

/// Level of an `h1`..`h6` tag.
pub fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Level a heading moves to, or `None` if it stays as is.
pub fn downgraded_tag(tag: &str) -> Option<(u8, u8)> {
    match heading_level(tag)? {
        6 => None,
        level => Some((level, level + 1)),
    }
}

/// Downgrade every section header inside the container by one level.
pub(super) fn downgrade_mutations(doc: &Document, container: &NodePath) -> Vec<Mutation> {
    doc.find_all_below(container, |e| e.has_class(SECTION_HEADER_CLASS))
        .into_iter()
        .filter_map(|path| {
            let (from, to) = downgraded_tag(&doc.get(&path)?.tag)?;
            Some(Mutation::DowngradeHeading { path, from, to })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_document, render_document, render_element};
    use crate::inject::apply;
    use crate::inject::Plan;

    #[test]
    fn test_heading_markup() {
        assert_eq!(
            render_element(&heading("Verified with", "verified-with")),
            r##"<h1 id="verified-with" class="section-header"><a href="#verified-with">Verified with</a></h1>"##
        );
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(downgraded_tag("h1"), Some((1, 2)));
        assert_eq!(downgraded_tag("h2"), Some((2, 3)));
        assert_eq!(downgraded_tag("h3"), Some((3, 4)));
        assert_eq!(downgraded_tag("h4"), Some((4, 5)));
        assert_eq!(downgraded_tag("h5"), Some((5, 6)));
        assert_eq!(downgraded_tag("h6"), None);
        assert_eq!(downgraded_tag("div"), None);
    }

    #[test]
    fn test_downgrade_preserves_attrs_and_children() {
        let mut doc = parse_document(concat!(
            r#"<div class="docblock">"#,
            r##"<h3 id="x" class="section-header" data-k="v"><a href="#x">X <code>y</code></a></h3>"##,
            r#"<h6 class="section-header">deep</h6>"#,
            r#"<span class="section-header">odd</span>"#,
            r#"<h2>plain</h2>"#,
            r#"</div>"#,
        ))
        .unwrap();
        let container = NodePath::from(vec![0]);
        let before = doc.get(&container).unwrap().clone();

        let mutations = downgrade_mutations(&doc, &container);
        assert_eq!(mutations.len(), 1);

        let plan = Plan {
            container: container.clone(),
            mutations,
        };
        apply(&mut doc, &plan).unwrap();
        let after = doc.get(&container).unwrap();

        let (old, new) = (
            before.children[0].as_element().unwrap(),
            after.children[0].as_element().unwrap(),
        );
        assert_eq!(new.tag, "h4");
        assert_eq!(new.attrs, old.attrs);
        assert_eq!(new.children, old.children);

        // h6, non-heading section headers and plain headings are untouched
        assert_eq!(after.children[1..], before.children[1..]);

        assert!(render_document(&doc).starts_with(concat!(
            r#"<div class="docblock">"#,
            r##"<h4 id="x" class="section-header" data-k="v"><a href="#x">X <code>y</code></a></h4>"##,
        )));
    }

    #[test]
    fn test_downgrade_renders_attributes_as_written() {
        let input = concat!(
            r#"<div class="docblock">"#,
            r#"<h2 id="a" class="section-header" data-x="1"  title='t' lang="en">A</h2>"#,
            r#"</div>"#,
        );
        let mut doc = parse_document(input).unwrap();
        let container = NodePath::from(vec![0]);
        let plan = Plan {
            mutations: downgrade_mutations(&doc, &container),
            container,
        };
        apply(&mut doc, &plan).unwrap();

        assert_eq!(render_document(&doc), input.replace("h2", "h3"));
    }
}
