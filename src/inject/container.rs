//! Container resolution.
//!
//! The top-level documentation of a rustdoc page lives in the first
//! `.docblock`. Pages without crate-level docs have none, in which case one
//! is created after the `.fqn` heading, wrapped in a collapse toggle.

use super::Variant;
use crate::dom::{Document, Element, NodePath};

pub const CONTAINER_CLASS: &str = "docblock";
pub const ANCHOR_CLASS: &str = "fqn";

/// Index of the container inside the toggle built by [`collapse_toggle`].
const CONTAINER_INDEX: usize = 1;

#[derive(Debug)]
pub enum Resolved {
    Existing(NodePath),
    Created {
        anchor: NodePath,
        toggle: Element,
        /// Container path once `toggle` is inserted after `anchor`.
        container: NodePath,
    },
}

pub fn resolve(doc: &Document, variant: &Variant) -> Option<Resolved> {
    if let Some(path) = doc.find_first_by_class(CONTAINER_CLASS) {
        return Some(Resolved::Existing(path));
    }
    if !variant.create_container {
        return None;
    }

    let anchor = doc.find_first_by_class(ANCHOR_CLASS)?;
    let (parent, index) = anchor.split_last()?;
    let container = parent.child(index + 1).child(CONTAINER_INDEX);

    Some(Resolved::Created {
        anchor,
        toggle: collapse_toggle(),
        container,
    })
}

/// `<details>` toggle holding an empty container, expanded by default.
fn collapse_toggle() -> Element {
    let summary = Element::with_attrs("summary", [("class", "hideme")])
        .child(Element::new("span").text("Expand description"));

    Element::with_attrs("details", [("class", "rustdoc-toggle top-doc"), ("open", "")])
        .child(summary)
        .child(Element::with_attrs("div", [("class", CONTAINER_CLASS)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    #[test]
    fn test_existing_container_wins_over_anchor() {
        let doc = parse_document(
            r#"<h1 class="fqn">x</h1><div class="docblock"></div><div class="docblock"></div>"#,
        )
        .unwrap();
        match resolve(&doc, &Variant::default()) {
            Some(Resolved::Existing(path)) => assert_eq!(path, NodePath::from(vec![1])),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_created_container_path_points_into_toggle() {
        let doc = parse_document(r#"<main><h1 class="fqn">x</h1></main>"#).unwrap();
        let Some(Resolved::Created {
            anchor,
            toggle,
            container,
        }) = resolve(&doc, &Variant::default())
        else {
            panic!("expected a created container");
        };

        assert_eq!(anchor, NodePath::from(vec![0, 0]));
        assert_eq!(container, NodePath::from(vec![0, 1, 1]));
        let inner = toggle.children[CONTAINER_INDEX].as_element().unwrap();
        assert!(inner.has_class(CONTAINER_CLASS));
    }

    #[test]
    fn test_missing_anchor() {
        let doc = parse_document("<main><h1>x</h1></main>").unwrap();
        assert!(resolve(&doc, &Variant::default()).is_none());
    }
}
