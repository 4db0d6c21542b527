//! Page modification: plan and apply the injected documentation sections.
//!
//! # Flow
//!
//! ```text
//! Document ──resolve──> container ──downgrade──> headings one level deeper
//!                                  ──prepend──> generated fragments
//! ```
//!
//! [`plan`] is pure: it inspects a [`Document`] and returns the [`Plan`]
//! (a list of [`Mutation`]s) without touching the page. [`apply`] then
//! performs the mutations. [`inject_page`] chains parse, plan, apply and
//! render for a single HTML string.
//!
//! # Modules
//!
//! - `container`: locate or create the `.docblock` container
//! - `heading`: section heading factory and level downgrade
//! - `blocks`: metadata, dependency, code size and verification fragments
//! - `size`: code size values and KiB formatting

mod blocks;
mod container;
mod heading;
mod size;

pub use blocks::{fragments, status_marker, verification_status};
pub use heading::{downgraded_tag, heading, heading_level};
pub use size::{CodeSize, format_kib};

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::debug;
use crate::dom::{Document, Element, NodePath, parse_document, render_document, render_element};
use container::Resolved;

// =============================================================================
// Inputs
// =============================================================================

/// Where the "first" metadata block links to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceLink {
    /// Blob URL of the crate directory on GitHub ("View on GitHub").
    #[serde(rename = "github")]
    GitHub(String),
    /// Manifest path shown as code, linked to `href`.
    #[serde(rename = "manifest")]
    Manifest { path: String, href: String },
}

/// A `(label, link)` dependency entry. An empty link renders the label only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct DependencyItem {
    pub label: String,
    pub link: String,
}

impl DependencyItem {
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.into(),
        }
    }
}

impl From<(String, String)> for DependencyItem {
    fn from((label, link): (String, String)) -> Self {
        Self { label, link }
    }
}

impl From<DependencyItem> for (String, String) {
    fn from(item: DependencyItem) -> Self {
        (item.label, item.link)
    }
}

/// A `(problem, solution)` pair: a judge problem and the code solving it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Verification {
    pub problem: String,
    pub solution: String,
}

impl Verification {
    pub fn new(problem: impl Into<String>, solution: impl Into<String>) -> Self {
        Self {
            problem: problem.into(),
            solution: solution.into(),
        }
    }
}

impl From<(String, String)> for Verification {
    fn from((problem, solution): (String, String)) -> Self {
        Self { problem, solution }
    }
}

impl From<Verification> for (String, String) {
    fn from(v: Verification) -> Self {
        (v.problem, v.solution)
    }
}

/// Page-specific values rendered into the injected sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInputs {
    pub source: SourceLink,
    pub license: String,
    /// Install command, e.g. `cargo add foo --git https://github.com/u/r`.
    pub install: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<DependencyItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_size: Option<CodeSize>,
    #[serde(default)]
    pub verifications: Vec<Verification>,
}

// =============================================================================
// Variant
// =============================================================================

/// Which representation the dependency block uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStyle {
    /// Shell prompt code block with the install command.
    #[default]
    Install,
    /// Linked list of dependencies.
    List,
}

/// Behavior switches shared by all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    /// Create `.docblock` (with a collapse toggle) after `.fqn` when missing.
    pub create_container: bool,
    pub dependencies: DependencyStyle,
}

impl Default for Variant {
    fn default() -> Self {
        Self {
            create_container: true,
            dependencies: DependencyStyle::default(),
        }
    }
}

// =============================================================================
// Plan
// =============================================================================

/// A single described change to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Insert `toggle` (which holds the new container) right after `anchor`.
    CreateContainer {
        anchor: NodePath,
        #[serde(serialize_with = "serialize_html")]
        toggle: Element,
    },
    /// Retag the heading at `path` from `h{from}` to `h{to}`.
    DowngradeHeading { path: NodePath, from: u8, to: u8 },
    /// Insert `fragment` as the first child of the container.
    Prepend {
        #[serde(serialize_with = "serialize_html")]
        fragment: Element,
    },
}

/// Mutations for one page, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Container path once all `CreateContainer` mutations are applied.
    pub container: NodePath,
    pub mutations: Vec<Mutation>,
}

fn serialize_html<S: Serializer>(elem: &Element, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&render_element(elem))
}

/// Describe the modification of `doc`.
///
/// Returns `None` when the page has neither a container nor (with
/// `create_container`) an anchor to create one after.
pub fn plan(doc: &Document, inputs: &PageInputs, variant: &Variant) -> Option<Plan> {
    let mut mutations = Vec::new();

    let container = match container::resolve(doc, variant)? {
        Resolved::Existing(path) => {
            mutations.extend(heading::downgrade_mutations(doc, &path));
            path
        }
        Resolved::Created {
            anchor,
            toggle,
            container,
        } => {
            mutations.push(Mutation::CreateContainer { anchor, toggle });
            container
        }
    };

    // Each prepend lands on top, so the last fragment ends up first
    mutations.extend(
        blocks::fragments(inputs, variant)
            .into_iter()
            .rev()
            .map(|fragment| Mutation::Prepend { fragment }),
    );

    Some(Plan {
        container,
        mutations,
    })
}

// =============================================================================
// Apply
// =============================================================================

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("no element at {0:?}")]
    MissingNode(NodePath),

    #[error("`{tag}` at {path:?} is not h{expected}")]
    UnexpectedTag {
        path: NodePath,
        tag: String,
        expected: u8,
    },
}

/// Perform the mutations of `plan` on `doc`.
pub fn apply(doc: &mut Document, plan: &Plan) -> Result<(), ApplyError> {
    for mutation in &plan.mutations {
        match mutation {
            Mutation::CreateContainer { anchor, toggle } => {
                let (parent_path, index) = anchor
                    .split_last()
                    .ok_or_else(|| ApplyError::MissingNode(anchor.clone()))?;
                let parent = doc
                    .get_mut(&parent_path)
                    .ok_or_else(|| ApplyError::MissingNode(parent_path.clone()))?;
                if index >= parent.children.len() {
                    return Err(ApplyError::MissingNode(anchor.clone()));
                }
                parent.children.insert(index + 1, toggle.clone().into());
            }
            Mutation::DowngradeHeading { path, from, to } => {
                let elem = doc
                    .get_mut(path)
                    .ok_or_else(|| ApplyError::MissingNode(path.clone()))?;
                if heading_level(&elem.tag) != Some(*from) {
                    return Err(ApplyError::UnexpectedTag {
                        path: path.clone(),
                        tag: elem.tag.clone(),
                        expected: *from,
                    });
                }
                elem.tag = format!("h{to}");
            }
            Mutation::Prepend { fragment } => {
                let container = doc
                    .get_mut(&plan.container)
                    .ok_or_else(|| ApplyError::MissingNode(plan.container.clone()))?;
                container.prepend(fragment.clone());
            }
        }
    }
    Ok(())
}

/// Parse, modify and render one page.
///
/// Returns `None` when the page is not applicable; the caller leaves it
/// untouched.
pub fn inject_page(html: &str, inputs: &PageInputs, variant: &Variant) -> Option<String> {
    let mut doc = parse_document(html)?;
    let plan = plan(&doc, inputs, variant)?;
    if let Err(e) = apply(&mut doc, &plan) {
        debug!("inject"; "plan rejected: {}", e);
        return None;
    }
    Some(render_document(&doc))
}
