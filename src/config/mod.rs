//! Configuration management for `docsplice.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error     # ConfigError, ConfigDiagnostics
//! ├── util      # config file lookup, path helpers
//! └── mod.rs    # Config, PageEntry (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `doc_dir`    | Rustdoc output directory (relative to the file)  |
//! | `[variant]`  | Container creation and dependency block style    |
//! | `[[pages]]`  | One entry per crate page and its injected inputs |

mod error;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use util::{find_config_file, slash_path};

use crate::{
    cli::{Cli, Commands},
    inject::{CodeSize, DependencyItem, PageInputs, SourceLink, Variant, Verification},
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing docsplice.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory of the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Rustdoc output directory
    pub doc_dir: PathBuf,

    pub variant: Variant,

    pub pages: Vec<PageEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            doc_dir: PathBuf::from("target/doc"),
            variant: Variant::default(),
            pages: Vec::new(),
        }
    }
}

/// A configured crate page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageTable", into = "PageTable")]
pub struct PageEntry {
    /// Crate name as rustdoc spells it (`my_crate`).
    pub krate: String,

    /// Path suffix (relative to `doc_dir`) of the page to modify.
    pub suffix: Option<String>,

    /// Manifest path relative to the config file, used for grouping.
    pub manifest_path: Option<String>,

    pub inputs: PageInputs,
}

/// A `[[pages]]` table as written in the file.
///
/// Kept flat so `serde_ignored` sees every key of the table.
#[derive(Serialize, Deserialize)]
struct PageTable {
    krate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    manifest_path: Option<String>,
    source: SourceLink,
    license: String,
    install: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dependencies: Option<Vec<DependencyItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code_size: Option<CodeSize>,
    #[serde(default)]
    verifications: Vec<Verification>,
}

impl From<PageTable> for PageEntry {
    fn from(table: PageTable) -> Self {
        Self {
            krate: table.krate,
            suffix: table.suffix,
            manifest_path: table.manifest_path,
            inputs: PageInputs {
                source: table.source,
                license: table.license,
                install: table.install,
                dependencies: table.dependencies,
                code_size: table.code_size,
                verifications: table.verifications,
            },
        }
    }
}

impl From<PageEntry> for PageTable {
    fn from(entry: PageEntry) -> Self {
        let PageInputs {
            source,
            license,
            install,
            dependencies,
            code_size,
            verifications,
        } = entry.inputs;
        Self {
            krate: entry.krate,
            suffix: entry.suffix,
            manifest_path: entry.manifest_path,
            source,
            license,
            install,
            dependencies,
            code_size,
            verifications,
        }
    }
}

impl PageEntry {
    /// Configured suffix, or `{krate}/index.html`.
    pub fn suffix(&self) -> String {
        match &self.suffix {
            Some(suffix) => suffix.clone(),
            None => format!("{}/index.html", self.krate),
        }
    }

    /// Whether the page at `rel_path` (`/`-separated, relative to the doc
    /// root) is this entry's page.
    pub fn matches(&self, rel_path: &str) -> bool {
        rel_path.ends_with(&self.suffix())
    }
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; the root is the config
    /// file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let Some(config_path) = find_config_file(&cwd, &cli.config) else {
            bail!(
                "config file `{}` not found in `{}` or any parent directory",
                cli.config.display(),
                cwd.display()
            );
        };

        let mut config = Self::from_path(&config_path)?;
        config.finalize(config_path, cli);
        config.validate()?;
        Ok(config)
    }

    /// Set paths and apply CLI overrides.
    fn finalize(&mut self, config_path: PathBuf, cli: &Cli) {
        self.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.config_path = config_path;

        if let Commands::Inject {
            doc_dir: Some(dir), ..
        } = &cli.command
        {
            // CLI paths are relative to cwd, not to the config file
            self.doc_dir = std::env::current_dir().unwrap_or_default().join(dir);
        } else {
            self.doc_dir = self.root.join(&self.doc_dir);
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Validate all pages, collecting every error at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for (i, page) in self.pages.iter().enumerate() {
            if page.krate.trim().is_empty() {
                diag.error(format!("pages[{i}].krate"), "must not be empty");
            }
            if page.inputs.license.trim().is_empty() {
                diag.error(format!("pages[{i}].license"), "must not be empty");
            }

            let suffix = page.suffix();
            if let Some(first) = seen.insert(suffix.clone(), i) {
                diag.error_with_hint(
                    format!("pages[{i}].suffix"),
                    format!("`{suffix}` is already used by pages[{first}]"),
                    "set `suffix` explicitly to tell the pages apart",
                );
            }
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// First page whose suffix matches `rel_path`.
    pub fn page_for(&self, rel_path: &str) -> Option<&PageEntry> {
        self.pages.iter().find(|page| page.matches(rel_path))
    }
}

// ============================================================================
// tests
// ============================================================================
