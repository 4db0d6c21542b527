//! Repository discovery for GitHub links.

use anyhow::{Context, Result, anyhow, bail, ensure};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// The repository a manifest lives in.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Working tree root.
    pub root: PathBuf,
    /// Fetch URL of `origin`, as configured.
    pub origin: Option<String>,
    /// Commit `HEAD` points to.
    pub rev: String,
}

impl RepoInfo {
    /// `https://github.com/{user}/{repo}` of `origin`.
    pub fn github_url(&self) -> Result<Url> {
        let origin = self
            .origin
            .as_deref()
            .ok_or_else(|| anyhow!("the repository has no `origin` remote"))?;
        github_repo_url(origin)
    }
}

/// Discover the enclosing repository, its `origin` remote and `HEAD`.
pub fn discover_repo(start: &Path) -> Result<RepoInfo> {
    let repo = gix::discover(start)
        .with_context(|| format!("no git repository at or above `{}`", start.display()))?;

    let root = repo
        .path()
        .parent()
        .ok_or_else(|| anyhow!("Invalid repository path"))?
        .to_path_buf();

    let rev = repo.head_id().context("could not resolve `HEAD`")?.to_string();

    let origin = repo.find_remote("origin").ok().and_then(|remote| {
        remote
            .url(gix::remote::Direction::Fetch)
            .map(|url| url.to_bstring().to_string())
    });

    Ok(RepoInfo { root, origin, rev })
}

/// Normalize a GitHub remote (`https` or `git@github.com:` form).
pub fn github_repo_url(remote: &str) -> Result<Url> {
    let normalized = match remote.strip_prefix("git@github.com:") {
        Some(rest) => format!("https://github.com/{rest}"),
        None => remote.to_string(),
    };
    let url = Url::parse(&normalized).with_context(|| format!("invalid URL: {remote}"))?;
    ensure!(
        url.host_str() == Some("github.com"),
        "expected GitHub, got `{}`",
        url
    );

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let [user, repo] = segments.as_slice() else {
        bail!("expected 2 path segments: `{}`", url.path());
    };

    let repo = repo.trim_end_matches(".git");
    Url::parse(&format!("https://github.com/{user}/{repo}"))
        .with_context(|| format!("invalid URL: {remote}"))
}

/// `{repo_url}/blob/{rev}/{rel_path...}`.
pub fn blob_url(repo_url: &Url, rev: &str, rel_path: &Path) -> Result<Url> {
    let mut url = repo_url.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| anyhow!("`{}` cannot be a base URL", repo_url))?;
        segments.push("blob").push(rev);
        for component in rel_path.components() {
            match component {
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .with_context(|| format!("`{}` is not UTF-8", rel_path.display()))?;
                    segments.push(part);
                }
                Component::CurDir => {}
                _ => bail!("`{}` is not a relative path", rel_path.display()),
            }
        }
    }
    Ok(url)
}
