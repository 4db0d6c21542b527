//! Markdown table of contents of all configured crates.
//!
//! Crates are grouped by the directories above their package directory:
//! `algo/graph/dijkstra/Cargo.toml` lands under `📁 algo` → `📁 graph`.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use crate::dom::render_element;
use crate::inject::status_marker;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct TableOfContents {
    /// Crate name → verified.
    crates: BTreeMap<String, bool>,
    children: BTreeMap<String, TableOfContents>,
}

impl TableOfContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a crate under the categories of `manifest_path`.
    ///
    /// `None` (or a manifest without enclosing directories) keeps the crate
    /// at the top level.
    pub fn insert(&mut self, manifest_path: Option<&Path>, krate: &str, verified: bool) {
        let categories: Vec<String> = manifest_path
            .and_then(Path::parent)
            .and_then(Path::parent)
            .map(|dir| {
                dir.components()
                    .filter_map(|c| match c {
                        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let entry = categories
            .into_iter()
            .fold(self, |entry, category| entry.children.entry(category).or_default());
        entry.crates.insert(krate.to_string(), verified);
    }

    pub fn is_empty(&self) -> bool {
        self.crates.is_empty() && self.children.is_empty()
    }

    /// Nested markdown list, 4 spaces per level.
    pub fn to_md(&self) -> String {
        let check = render_element(&status_marker(true));
        let warning = render_element(&status_marker(false));
        let mut out = String::new();
        self.write_md(0, (&check, &warning), &mut out);
        out
    }

    fn write_md(&self, depth: usize, markers: (&str, &str), out: &mut String) {
        let indent = " ".repeat(4 * depth);
        for (krate, verified) in &self.crates {
            let marker = if *verified { markers.0 } else { markers.1 };
            out.push_str(&format!(
                "{indent}- {marker} [{krate}](../{krate}/index.html)\n"
            ));
        }
        for (category, children) in &self.children {
            out.push_str(&format!("{indent}- 📁 {category}\n"));
            children.write_md(depth + 1, markers, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_follow_manifest_dirs() {
        let mut toc = TableOfContents::new();
        toc.insert(Some(Path::new("algo/graph/dijkstra/Cargo.toml")), "dijkstra", true);
        toc.insert(Some(Path::new("algo/graph/bfs/Cargo.toml")), "bfs", false);
        toc.insert(Some(Path::new("algo/gcd/Cargo.toml")), "gcd", true);
        toc.insert(Some(Path::new("io/Cargo.toml")), "io", false);
        toc.insert(None, "loose", false);

        let md = toc.to_md();
        let lines: Vec<_> = md.lines().collect();
        assert_eq!(lines.len(), 7);

        assert!(lines[0].starts_with("- ") && lines[0].ends_with("[io](../io/index.html)"));
        assert!(lines[1].ends_with("[loose](../loose/index.html)"));
        assert_eq!(lines[2], "- 📁 algo");
        assert!(lines[3].starts_with("    - ") && lines[3].ends_with("[gcd](../gcd/index.html)"));
        assert_eq!(lines[4], "    - 📁 graph");
        assert!(lines[5].starts_with("        - ") && lines[5].contains("[bfs]"));
        assert!(lines[6].contains("[dijkstra]"));
    }

    #[test]
    fn test_markers() {
        let mut toc = TableOfContents::new();
        toc.insert(Some(Path::new("a/Cargo.toml")), "a", true);
        toc.insert(Some(Path::new("b/Cargo.toml")), "b", false);

        let md = toc.to_md();
        let (a, b) = md.split_once('\n').unwrap();
        assert!(a.contains("2714.png"));
        assert!(b.contains("26a0.png"));
    }

    #[test]
    fn test_empty() {
        let toc = TableOfContents::new();
        assert!(toc.is_empty());
        assert_eq!(toc.to_md(), "");
    }
}
