//! `inject`: modify every configured page of a rustdoc output directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use jwalk::WalkDir;
use rayon::prelude::*;

use crate::config::{Config, PageEntry, slash_path};
use crate::inject::{Variant, inject_page};
use crate::logger::ProgressLine;
use crate::utils::plural_count;
use crate::{debug, log};

/// What happened to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Modified,
    /// Neither container nor anchor: the file is left untouched.
    Skipped,
}

/// Inject all configured pages found under `config.doc_dir`.
pub fn inject_all(config: &Config, dry: bool) -> Result<()> {
    let doc_dir = &config.doc_dir;
    ensure!(
        doc_dir.is_dir(),
        "doc directory `{}` not found (run `cargo doc` first)",
        doc_dir.display()
    );

    let targets = collect_targets(doc_dir, config);
    warn_unmatched(config, &targets);
    if targets.is_empty() {
        log!("inject"; "no configured page found in `{}`", doc_dir.display());
        return Ok(());
    }

    let progress = ProgressLine::new("inject", &[("pages", targets.len())]);
    let results: Vec<_> = targets
        .par_iter()
        .map(|(path, page)| {
            let result = inject_file(path, page, &config.variant, dry)
                .with_context(|| format!("failed to inject `{}`", path.display()));
            progress.inc("pages");
            result
        })
        .collect();
    progress.finish();

    let mut modified = 0;
    let mut errors = 0;
    for ((path, _), result) in targets.iter().zip(results) {
        let rel = path.strip_prefix(doc_dir).unwrap_or(path).display();
        match result {
            Ok(Outcome::Modified) => {
                modified += 1;
                debug!("inject"; "modified: {}", rel);
            }
            Ok(Outcome::Skipped) => log!("warning"; "`{}` has no `.docblock` or `.fqn`, skipped", rel),
            Err(e) => {
                errors += 1;
                log!("error"; "{:#}", e);
            }
        }
    }

    if errors > 0 {
        bail!("{} could not be injected", plural_count(errors, "page"));
    }
    let verb = if dry { "would modify" } else { "modified" };
    log!("inject"; "{} {} of {}", verb, modified, plural_count(targets.len(), "page"));
    Ok(())
}

/// HTML files under `doc_dir` paired with their configured page.
fn collect_targets<'a>(doc_dir: &Path, config: &'a Config) -> Vec<(PathBuf, &'a PageEntry)> {
    let mut targets: Vec<_> = WalkDir::new(doc_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
        .filter_map(|e| {
            let path = e.path();
            let rel = slash_path(path.strip_prefix(doc_dir).ok()?);
            let page = config.page_for(&rel)?;
            Some((path, page))
        })
        .collect();
    targets.sort_by(|a, b| a.0.cmp(&b.0));
    targets
}

fn warn_unmatched(config: &Config, targets: &[(PathBuf, &PageEntry)]) {
    for page in &config.pages {
        if !targets.iter().any(|(_, p)| std::ptr::eq(*p, page)) {
            log!("warning"; "no page ends with `{}` (crate `{}`)", page.suffix(), page.krate);
        }
    }
}

/// Inject one page in place.
pub fn inject_file(path: &Path, page: &PageEntry, variant: &Variant, dry: bool) -> Result<Outcome> {
    let html = fs::read_to_string(path)?;
    let Some(modified) = inject_page(&html, &page.inputs, variant) else {
        return Ok(Outcome::Skipped);
    };
    if !dry {
        fs::write(path, modified)?;
    }
    Ok(Outcome::Modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::{PageInputs, SourceLink};

    const PAGE: &str = r#"<!DOCTYPE html><html><body><section id="main-content"><h1 class="fqn">Crate <a>foo</a></h1><div class="docblock"><p>Docs.</p></div></section></body></html>"#;

    fn entry(krate: &str) -> PageEntry {
        PageEntry {
            krate: krate.to_string(),
            suffix: None,
            manifest_path: None,
            inputs: PageInputs {
                source: SourceLink::GitHub("https://github.com/u/r/blob/HEAD/foo".to_string()),
                license: "MIT".to_string(),
                install: "cargo add foo --git https://github.com/u/r".to_string(),
                dependencies: None,
                code_size: None,
                verifications: Vec::new(),
            },
        }
    }

    fn doc_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("foo")).unwrap();
        fs::write(dir.path().join("foo").join("index.html"), PAGE).unwrap();
        fs::write(dir.path().join("foo").join("struct.Bar.html"), PAGE).unwrap();
        fs::write(dir.path().join("search-index.js"), "").unwrap();
        dir
    }

    fn config(doc_dir: &Path) -> Config {
        Config {
            doc_dir: doc_dir.to_path_buf(),
            pages: vec![entry("foo")],
            ..Config::default()
        }
    }

    #[test]
    fn test_collect_targets_matches_suffix_only() {
        let dir = doc_dir();
        let config = config(dir.path());
        let targets = collect_targets(dir.path(), &config);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0, dir.path().join("foo").join("index.html"));
    }

    #[test]
    fn test_inject_all_writes_matching_page() {
        let dir = doc_dir();
        inject_all(&config(dir.path()), false).unwrap();

        let index = fs::read_to_string(dir.path().join("foo").join("index.html")).unwrap();
        assert!(index.contains(r#"id="verified-with""#));
        assert!(index.starts_with("<!DOCTYPE html>"));

        let other = fs::read_to_string(dir.path().join("foo").join("struct.Bar.html")).unwrap();
        assert_eq!(other, PAGE);
    }

    #[test]
    fn test_inject_all_dry_run() {
        let dir = doc_dir();
        inject_all(&config(dir.path()), true).unwrap();
        let index = fs::read_to_string(dir.path().join("foo").join("index.html")).unwrap();
        assert_eq!(index, PAGE);
    }

    #[test]
    fn test_inject_file_skips_foreign_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<html><body><p>no rustdoc</p></body></html>").unwrap();

        let outcome = inject_file(&path, &entry("foo"), &Variant::default(), false).unwrap();
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<html><body><p>no rustdoc</p></body></html>"
        );
    }

    #[test]
    fn test_missing_doc_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(inject_all(&config(&dir.path().join("missing")), false).is_err());
    }
}
