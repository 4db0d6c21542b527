//! Generated fragments.
//!
//! [`fragments`] returns the injected elements in presentation order:
//!
//! ```text
//! metadata         <ul> source link + license
//! dependencies     <pre> install command | <ul> dependency list
//! code size        <h1> + <ul>                  (only with a code size)
//! verified with    <h1> + <p> status line + <ul> solutions (when any)
//! description      <h1>                         (heads the crate's own docs)
//! ```

use super::heading::heading;
use super::{DependencyItem, DependencyStyle, PageInputs, SourceLink, Variant, Verification};
use crate::dom::Element;
use crate::utils::plural_s;

const CHECK_MARK: Marker = Marker {
    src: "https://github.githubassets.com/images/icons/emoji/unicode/2714.png",
    alt: "\u{2714}",
};
const WARNING: Marker = Marker {
    src: "https://github.githubassets.com/images/icons/emoji/unicode/26a0.png",
    alt: "\u{26a0}",
};

struct Marker {
    src: &'static str,
    alt: &'static str,
}

impl Marker {
    fn element(&self) -> Element {
        Element::with_attrs(
            "img",
            [
                ("src", self.src),
                ("alt", self.alt),
                ("title", self.alt),
                ("width", "20"),
                ("height", "20"),
            ],
        )
    }
}

/// Check mark for verified crates, warning sign otherwise.
pub fn status_marker(verified: bool) -> Element {
    if verified {
        CHECK_MARK.element()
    } else {
        WARNING.element()
    }
}

/// All injected fragments, top to bottom.
pub fn fragments(inputs: &PageInputs, variant: &Variant) -> Vec<Element> {
    let mut out = vec![
        metadata_block(&inputs.source, &inputs.license),
        dependency_block(inputs, variant.dependencies),
    ];

    if let Some(size) = &inputs.code_size {
        out.push(heading("Code size", "code-size"));
        out.push(code_size_block(&size.display()));
    }

    out.push(heading("Verified with", "verified-with"));
    out.extend(verification_block(&inputs.verifications));
    out.push(heading("Description", "description"));
    out
}

fn list_item(content: impl Into<crate::dom::Node>) -> Element {
    Element::new("li").child(content)
}

fn link(href: &str, label: &str) -> Element {
    Element::with_attrs("a", [("href", href)]).text(label)
}

fn code(text: &str) -> Element {
    Element::new("code").text(text)
}

fn metadata_block(source: &SourceLink, license: &str) -> Element {
    let source_item = match source {
        SourceLink::GitHub(blob_url) => list_item(link(blob_url, "View on GitHub")),
        SourceLink::Manifest { path, href } => {
            list_item(Element::with_attrs("a", [("href", href.as_str())]).child(code(path)))
        }
    };
    let license_item = Element::new("li").text("License: ").child(code(license));

    Element::new("ul").child(source_item).child(license_item)
}

fn dependency_block(inputs: &PageInputs, style: DependencyStyle) -> Element {
    match style {
        DependencyStyle::Install => install_block(&inputs.install),
        DependencyStyle::List => dependency_list(inputs.dependencies.as_deref().unwrap_or_default()),
    }
}

fn install_block(command: &str) -> Element {
    Element::with_attrs("pre", [("class", "language-console")])
        .child(code(&format!("$ {command}")))
}

fn dependency_list(items: &[DependencyItem]) -> Element {
    if items.is_empty() {
        return Element::new("p").text("No dependencies.");
    }

    items.iter().fold(Element::new("ul"), |ul, item| {
        let li = if item.link.is_empty() {
            Element::new("li").text(&item.label)
        } else {
            list_item(link(&item.link, &item.label))
        };
        ul.child(li)
    })
}

fn code_size_block(unmodified: &str) -> Element {
    Element::new("ul")
        .child(Element::new("li").text("Unmodified: ").child(code(unmodified)))
        .child(Element::new("li").text("Resolved macros: not yet implemented"))
        .child(Element::new("li").text("Minified: not yet implemented"))
}

/// Status line text for a number of solutions.
pub fn verification_status(count: usize) -> String {
    match count {
        0 => "Not verified".to_string(),
        n => format!("Verified with {n} solution{}", plural_s(n)),
    }
}

/// Status line, followed by the solution list when there is one.
fn verification_block(verifications: &[Verification]) -> Vec<Element> {
    let status = Element::new("p")
        .child(status_marker(!verifications.is_empty()))
        .text(format!(" {}", verification_status(verifications.len())));
    if verifications.is_empty() {
        return vec![status];
    }

    let list = verifications.iter().fold(Element::new("ul"), |ul, v| {
        let li = Element::new("li")
            .child(link(&v.problem, &v.problem))
            .text(" (")
            .child(link(&v.solution, "code"))
            .text(")");
        ul.child(li)
    });
    vec![status, list]
}
