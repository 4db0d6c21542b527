//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Inject manifest, dependency, code size and verification sections into
/// rustdoc pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: docsplice.toml)
    #[arg(short = 'C', long, global = true, default_value = "docsplice.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Modify every configured page of the rustdoc output
    #[command(visible_alias = "i")]
    Inject {
        /// Rustdoc output directory (overrides `doc_dir`)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        doc_dir: Option<PathBuf>,

        /// Report what would change without writing any file
        #[arg(long)]
        dry: bool,
    },

    /// Print the mutations planned for one page as JSON
    #[command(visible_alias = "p")]
    Plan {
        /// Rustdoc HTML page
        #[arg(value_name = "PAGE", value_hint = clap::ValueHint::FilePath)]
        page: PathBuf,

        /// Configured crate whose inputs are injected
        #[arg(short, long)]
        krate: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print a `[[pages]]` entry derived from a Cargo.toml
    #[command(visible_alias = "d")]
    Describe {
        /// Path to the library's Cargo.toml
        #[arg(long, default_value = "Cargo.toml", value_hint = clap::ValueHint::FilePath)]
        manifest_path: PathBuf,

        /// GitHub repository URL (default: `origin` of the enclosing repository)
        #[arg(long)]
        git_url: Option<String>,

        /// Revision used in blob links (default: `HEAD` commit)
        #[arg(long)]
        rev: Option<String>,
    },

    /// Print a markdown table of contents of the configured crates
    #[command(visible_alias = "t")]
    Toc,
}
