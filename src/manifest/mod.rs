//! `Cargo.toml` analysis.
//!
//! Derives the page inputs of a library crate from its manifest: the
//! dependency list, the install command, the GitHub link of the crate
//! directory and the unmodified code size.

mod git;
mod modules;

pub use git::{RepoInfo, blob_url, discover_repo, github_repo_url};
pub use modules::{SourceFile, module_files};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::inject::{CodeSize, DependencyItem};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid manifest `{0}`")]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("`{0}` has no [package] table")]
    NoPackage(PathBuf),
}

// =============================================================================
// Raw manifest
// =============================================================================

#[derive(Deserialize)]
struct RawManifest {
    package: Option<RawPackage>,
    lib: Option<RawLib>,
    #[serde(default)]
    dependencies: BTreeMap<String, RawDependency>,
}

#[derive(Deserialize)]
struct RawPackage {
    name: String,
    /// `license = "MIT"` or `license.workspace = true`.
    license: Option<toml::Value>,
}

#[derive(Deserialize)]
struct RawLib {
    name: Option<String>,
    path: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependency {
    Version(String),
    Detailed {
        version: Option<String>,
        git: Option<String>,
        path: Option<String>,
        registry: Option<String>,
        package: Option<String>,
    },
}

// =============================================================================
// Manifest
// =============================================================================

/// Where a dependency comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    CratesIo { req: String },
    Registry { registry: String },
    Git { url: String },
    Path { path: String },
    Unknown,
}

/// A normal (`[dependencies]`) dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Package name (the `package` key when renamed).
    pub name: String,
    pub source: DependencySource,
}

impl Dependency {
    /// Label and link shown in the dependency list.
    pub fn to_list_item(&self) -> DependencyItem {
        let name = &self.name;
        match &self.source {
            DependencySource::CratesIo { req } => DependencyItem::new(
                format!("{name} {req}"),
                format!("https://docs.rs/{name}/{req}"),
            ),
            DependencySource::Registry { registry } => {
                DependencyItem::new(format!("{name} (registry+{registry})"), "")
            }
            DependencySource::Git { url } => {
                DependencyItem::new(format!("{name} (git+{url})"), url.clone())
            }
            DependencySource::Path { path } => DependencyItem::new(
                format!("{name} (path+{path})"),
                format!("../{}/index.html", crate_name(name)),
            ),
            DependencySource::Unknown => DependencyItem::new(format!("{name} (unknown)"), ""),
        }
    }
}

/// The parts of a library manifest the injected sections need.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub manifest_path: PathBuf,
    pub package: String,
    pub license: Option<String>,
    /// Crate name of the library target (`-` replaced by `_`).
    pub krate: String,
    /// Absolute path of the library root source file.
    pub lib_path: PathBuf,
    pub dependencies: Vec<Dependency>,
}

impl Manifest {
    pub fn load(manifest_path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(manifest_path)
            .map_err(|e| ManifestError::Io(manifest_path.to_path_buf(), e))?;
        Self::parse(manifest_path, &content)
    }

    pub fn parse(manifest_path: &Path, content: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(content)
            .map_err(|e| ManifestError::Toml(manifest_path.to_path_buf(), e))?;
        let package = raw
            .package
            .ok_or_else(|| ManifestError::NoPackage(manifest_path.to_path_buf()))?;

        let manifest_dir = manifest_path.parent().unwrap_or(Path::new("."));
        let (lib_name, lib_path) = match raw.lib {
            Some(RawLib { name, path }) => (name, path),
            None => (None, None),
        };
        let krate = crate_name(lib_name.as_deref().unwrap_or(&package.name));
        let lib_path = manifest_dir.join(lib_path.as_deref().unwrap_or("src/lib.rs"));

        let dependencies = raw
            .dependencies
            .into_iter()
            .map(|(name_in_toml, dep)| to_dependency(name_in_toml, dep))
            .collect();

        Ok(Self {
            manifest_path: manifest_path.to_path_buf(),
            license: package.license.as_ref().and_then(|v| v.as_str()).map(str::to_string),
            package: package.name,
            krate,
            lib_path,
            dependencies,
        })
    }

    pub fn dependency_items(&self) -> Vec<DependencyItem> {
        self.dependencies.iter().map(Dependency::to_list_item).collect()
    }

    /// `cargo add` invocation pulling this package from `git_url`.
    pub fn install_command(&self, git_url: &str) -> String {
        format!("cargo add {} --git {}", self.package, git_url)
    }

    /// Total size of the files in the library's module tree.
    ///
    /// Failures are reported as text, shown verbatim on the page.
    pub fn code_size(&self) -> CodeSize {
        match module_files(&self.lib_path) {
            Ok(files) => CodeSize::Raw(files.iter().map(|f| f.len).sum()),
            Err(message) => CodeSize::Preformatted(message),
        }
    }
}

fn to_dependency(name_in_toml: String, dep: RawDependency) -> Dependency {
    match dep {
        RawDependency::Version(version) => Dependency {
            name: name_in_toml,
            source: DependencySource::CratesIo {
                req: short_req(&version),
            },
        },
        RawDependency::Detailed {
            version,
            git,
            path,
            registry,
            package,
        } => {
            let source = if let Some(url) = git {
                DependencySource::Git { url }
            } else if let Some(path) = path {
                DependencySource::Path { path }
            } else if let Some(registry) = registry {
                DependencySource::Registry { registry }
            } else if let Some(version) = version {
                DependencySource::CratesIo {
                    req: short_req(&version),
                }
            } else {
                DependencySource::Unknown
            };
            Dependency {
                name: package.unwrap_or(name_in_toml),
                source,
            }
        }
    }
}

/// Bare versions (`1.2`) are caret requirements; anything else stays as is.
fn short_req(version: &str) -> String {
    if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit() || c == '.') {
        format!("^{version}")
    } else {
        version.to_string()
    }
}

/// Rust crate name of a package or target name.
pub fn crate_name(name: &str) -> String {
    name.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[package]
name = "my-lib"
version = "0.1.0"
license = "CC0-1.0"

[dependencies]
num = "0.4"
rand = { version = "=0.8.5", default-features = false }
sibling = { path = "../sibling-lib", package = "sibling-lib" }
remote = { git = "https://github.com/u/remote" }
inhouse = { version = "1", registry = "mine" }
shared = { workspace = true }
"#;

    fn manifest() -> Manifest {
        Manifest::parse(Path::new("/repo/crates/my-lib/Cargo.toml"), MANIFEST).unwrap()
    }

    fn item<'a>(items: &'a [DependencyItem], prefix: &str) -> &'a DependencyItem {
        items.iter().find(|i| i.label.starts_with(prefix)).unwrap()
    }

    #[test]
    fn test_package_fields() {
        let m = manifest();
        assert_eq!(m.package, "my-lib");
        assert_eq!(m.krate, "my_lib");
        assert_eq!(m.license.as_deref(), Some("CC0-1.0"));
        assert_eq!(m.lib_path, Path::new("/repo/crates/my-lib/src/lib.rs"));
        assert_eq!(
            m.install_command("https://github.com/u/r"),
            "cargo add my-lib --git https://github.com/u/r"
        );
    }

    #[test]
    fn test_registry_dependencies() {
        let items = manifest().dependency_items();

        let num = item(&items, "num");
        assert_eq!(num.label, "num ^0.4");
        assert_eq!(num.link, "https://docs.rs/num/^0.4");

        let rand = item(&items, "rand");
        assert_eq!(rand.label, "rand =0.8.5");
        assert_eq!(rand.link, "https://docs.rs/rand/=0.8.5");

        let inhouse = item(&items, "inhouse");
        assert_eq!(inhouse.label, "inhouse (registry+mine)");
        assert!(inhouse.link.is_empty());
    }

    #[test]
    fn test_git_path_and_unknown_dependencies() {
        let items = manifest().dependency_items();

        let sibling = item(&items, "sibling-lib");
        assert_eq!(sibling.label, "sibling-lib (path+../sibling-lib)");
        assert_eq!(sibling.link, "../sibling_lib/index.html");

        let remote = item(&items, "remote");
        assert_eq!(remote.label, "remote (git+https://github.com/u/remote)");
        assert_eq!(remote.link, "https://github.com/u/remote");

        let shared = item(&items, "shared");
        assert_eq!(shared.label, "shared (unknown)");
    }

    #[test]
    fn test_workspace_license_is_absent() {
        let m = Manifest::parse(
            Path::new("Cargo.toml"),
            "[package]\nname = \"a\"\nlicense.workspace = true\n",
        )
        .unwrap();
        assert_eq!(m.license, None);
        assert!(m.dependencies.is_empty());
    }

    #[test]
    fn test_missing_package_table() {
        let err = Manifest::parse(Path::new("Cargo.toml"), "[workspace]\nmembers = []\n");
        assert!(matches!(err, Err(ManifestError::NoPackage(_))));
    }

    #[test]
    fn test_code_size_sums_sources() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("lib.rs"), "mod inner;\n").unwrap();
        fs::write(src.join("inner").join("mod.rs"), "pub fn f() {}\n").unwrap();
        fs::write(src.join("notes.txt"), "ignored").unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"a\"\n",
        )
        .unwrap();

        let m = Manifest::load(&dir.path().join("Cargo.toml")).unwrap();
        assert_eq!(m.code_size(), CodeSize::Raw(11 + 14));
    }

    #[test]
    fn test_code_size_skips_files_outside_module_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("bin")).unwrap();
        fs::write(src.join("lib.rs"), "pub fn f() {}\n").unwrap();
        fs::write(src.join("main.rs"), "fn main() { my_lib::f() }\n").unwrap();
        fs::write(src.join("bin").join("tool.rs"), "fn main() {}\n").unwrap();
        fs::write(src.join("orphan.rs"), "pub fn unused() {}\n").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"my-lib\"\n").unwrap();

        let m = Manifest::load(&dir.path().join("Cargo.toml")).unwrap();
        assert_eq!(m.code_size(), CodeSize::Raw(14));
    }

    #[test]
    fn test_code_size_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("lib.rs"), "pub fn (").unwrap();
        fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"a\"\n").unwrap();

        let m = Manifest::load(&dir.path().join("Cargo.toml")).unwrap();
        let CodeSize::Preformatted(message) = m.code_size() else {
            panic!("expected a message");
        };
        assert!(message.starts_with("could not parse `"));
        assert!(message.contains("lib.rs"));
    }

    #[test]
    fn test_code_size_missing_lib() {
        let m = Manifest::parse(Path::new("/nowhere/Cargo.toml"), "[package]\nname = \"a\"\n")
            .unwrap();
        assert!(matches!(m.code_size(), CodeSize::Preformatted(_)));
    }
}
