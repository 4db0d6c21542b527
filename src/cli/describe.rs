//! `describe`: derive a `[[pages]]` entry from a library manifest.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use url::Url;

use crate::config::{PageEntry, slash_path};
use crate::inject::{PageInputs, SourceLink};
use crate::log;
use crate::manifest::{Manifest, blob_url, discover_repo, github_repo_url};

/// Where the generated links point.
#[derive(Debug, Clone)]
pub struct Origin {
    pub repo_url: Url,
    pub rev: String,
    /// Working tree root the manifest path is made relative to.
    pub root: PathBuf,
}

#[derive(Serialize)]
struct Pages {
    pages: Vec<PageEntry>,
}

/// Print the entry for `manifest_path` as TOML on stdout.
pub fn describe(manifest_path: &Path, git_url: Option<&str>, rev: Option<&str>) -> Result<()> {
    let manifest_path = manifest_path
        .canonicalize()
        .with_context(|| format!("`{}` not found", manifest_path.display()))?;
    let manifest = Manifest::load(&manifest_path)?;

    let manifest_dir = manifest_path
        .parent()
        .ok_or_else(|| anyhow!("`{}` has no parent", manifest_path.display()))?;
    let origin = resolve_origin(manifest_dir, git_url, rev)?;

    let entry = page_entry(&manifest, &origin)?;
    let toml = toml::to_string_pretty(&Pages { pages: vec![entry] })
        .context("failed to serialize the page entry")?;
    print!("{toml}");
    Ok(())
}

/// Link target of the crate in `manifest_dir`.
///
/// The enclosing repository is opened only for the values not given.
pub fn resolve_origin(
    manifest_dir: &Path,
    git_url: Option<&str>,
    rev: Option<&str>,
) -> Result<Origin> {
    if let (Some(url), Some(rev)) = (git_url, rev) {
        return Ok(Origin {
            repo_url: github_repo_url(url)?,
            rev: rev.to_string(),
            root: worktree_root(manifest_dir).to_path_buf(),
        });
    }

    let repo = discover_repo(manifest_dir)?;
    Ok(Origin {
        repo_url: match git_url {
            Some(url) => github_repo_url(url)?,
            None => repo.github_url()?,
        },
        rev: rev.map_or(repo.rev, str::to_string),
        root: repo.root,
    })
}

/// Nearest directory holding `.git`, or `dir` itself outside of a repository.
fn worktree_root(dir: &Path) -> &Path {
    dir.ancestors()
        .find(|d| d.join(".git").exists())
        .unwrap_or(dir)
}

/// Build the page entry of `manifest`, linking into `origin`.
pub fn page_entry(manifest: &Manifest, origin: &Origin) -> Result<PageEntry> {
    let rel_manifest = manifest
        .manifest_path
        .strip_prefix(&origin.root)
        .with_context(|| {
            format!(
                "`{}` is outside of `{}`",
                manifest.manifest_path.display(),
                origin.root.display()
            )
        })?;
    let rel_dir = rel_manifest.parent().unwrap_or(Path::new(""));

    let license = manifest.license.clone().unwrap_or_else(|| {
        log!("warning"; "`{}` has no `package.license`", rel_manifest.display());
        String::new()
    });

    Ok(PageEntry {
        krate: manifest.krate.clone(),
        suffix: None,
        manifest_path: Some(slash_path(rel_manifest)),
        inputs: PageInputs {
            source: SourceLink::GitHub(blob_url(&origin.repo_url, &origin.rev, rel_dir)?.into()),
            license,
            install: manifest.install_command(origin.repo_url.as_str()),
            dependencies: Some(manifest.dependency_items()),
            code_size: Some(manifest.code_size()),
            verifications: Vec::new(),
        },
    })
}
